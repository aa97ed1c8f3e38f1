//! Content hashing for cache invalidation and incremental compilation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit content hash computed using XXH3 for cache invalidation.
///
/// Two programs with the same `ContentHash` are assumed to compile to
/// identical output. The hash is persisted as raw bytes next to each
/// compiled artifact and compared on later runs to decide staleness.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes a content hash from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Returns the raw digest bytes as persisted in `.hash` files.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Reconstructs a hash from previously persisted raw bytes.
    ///
    /// Returns `None` if the slice is not exactly the digest length.
    pub fn from_raw(bytes: &[u8]) -> Option<Self> {
        Some(Self(bytes.try_into().ok()?))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

/// A streaming builder for hashing a composed program piece by piece.
///
/// Feeds dependency file contents, entry point names, and session options
/// into a single XXH3 state so the resulting digest changes whenever any
/// input to compilation changes.
pub struct HashBuilder {
    state: xxhash_rust::xxh3::Xxh3,
}

impl HashBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            state: xxhash_rust::xxh3::Xxh3::new(),
        }
    }

    /// Mixes a length-prefixed byte chunk into the hash state.
    ///
    /// The length prefix keeps adjacent chunks from aliasing each other
    /// (e.g. `"ab" + "c"` vs `"a" + "bc"`).
    pub fn update(&mut self, data: &[u8]) {
        self.state.update(&(data.len() as u64).to_le_bytes());
        self.state.update(data);
    }

    /// Finalizes the state into a [`ContentHash`].
    pub fn finish(self) -> ContentHash {
        ContentHash(self.state.digest128().to_le_bytes())
    }
}

impl Default for HashBuilder {
    fn default() -> Self {
        Self::new()
    }
}
