//! Property tests for virtual path helpers.

use proptest::prelude::*;

use modhost::domain::value_objects::virtual_path;

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_-]{1,12}").unwrap()
}

proptest! {
    /// PROPERTY: Helpers never panic on arbitrary input.
    #[test]
    fn property_helpers_never_panic(s in "(?s).{0,128}") {
        let _ = virtual_path::directory_name(&s);
        let _ = virtual_path::file_name(&s);
        let _ = virtual_path::file_stem(&s);
        let _ = virtual_path::extension(&s);
        let _ = virtual_path::relative_to_root(&s);
    }

    /// PROPERTY: A combined binary path splits back into its parts.
    #[test]
    fn property_binary_path_splits_back(
        module in segment(),
        stem in segment(),
    ) {
        let file = format!("{stem}.dll");
        let path = virtual_path::combine(&["~/Modules", module.as_str(), "bin", file.as_str()]);
        prop_assert_eq!(virtual_path::file_name(&path), file.as_str());
        prop_assert_eq!(virtual_path::file_stem(&path), stem.as_str());
        prop_assert_eq!(virtual_path::extension(&path), Some("dll"));
        let expected_dir = format!("~/Modules/{module}/bin");
        prop_assert_eq!(virtual_path::directory_name(&path), expected_dir.as_str());
    }
}
