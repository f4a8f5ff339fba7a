//! Extension loader strategies
//!
//! Each loader implements `ExtensionLoader`. The host registers the ones it
//! supports and the rebuild coordinator arbitrates between them.

mod precompiled;

pub use precompiled::{PrecompiledExtensionLoader, PrecompiledOptions, PRECOMPILED_LOADER_ORDER};
