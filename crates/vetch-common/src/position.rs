//! Program-point identity.

use rustc_hash::FxHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of one program point, derived from the statement's flow block
/// and its index within that block.
///
/// Unique within one function/method body; points in different bodies are
/// disambiguated by the resolution store's outer key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionKey(u64);

impl PositionKey {
    pub fn from_parts(block: u32, statement: u32) -> Self {
        let mut hasher = FxHasher::default();
        block.hash(&mut hasher);
        statement.hash(&mut hasher);
        PositionKey(hasher.finish())
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl fmt::Debug for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PositionKey({:016x})", self.0)
    }
}
