#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        if let Ok((manifest, _unknown)) =
            modhost::infrastructure::discovery::ModuleManifest::parse(content, Path::new("module.toml"))
        {
            // Conversion trims and filters dependency names
            let _ = manifest.into_descriptor("Fuzz", "~/Modules");
        }
    }
});
