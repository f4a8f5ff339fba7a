//! Assembly Identity Value Object
//!
//! Names a loaded binary by module name plus a short SHA-256 of its bytes,
//! e.g. `Foo, sha256=3f2a9c01d4e7`. Two copies with the same identity are
//! interchangeable; a rebuilt binary gets a new one.

use std::fmt;

use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssemblyIdentity {
    name: String,
    digest: String,
}

impl AssemblyIdentity {
    /// Number of hex characters kept from the digest
    pub const SHORT_LEN: usize = 12;

    /// Compute the identity of `bytes` published under `name`
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Self {
        let hash = format!("{:x}", Sha256::digest(bytes));
        Self {
            name: name.to_string(),
            digest: hash[..Self::SHORT_LEN].to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Short hex digest
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

impl fmt::Display for AssemblyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, sha256={}", self.name, self.digest)
    }
}
