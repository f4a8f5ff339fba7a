//! File System Implementations
//!
//! Concrete implementation of the VirtualPathProvider port.

mod local_virtual_path;

pub use local_virtual_path::LocalVirtualPathProvider;
