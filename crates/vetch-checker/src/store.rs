//! Shared position-keyed resolution store.

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use vetch_common::{CheckError, PositionKey, QualifiedName, TypeSnapshot};

/// Keyed store mapping a definition to its ordered (program point, snapshot)
/// records for the current checking run.
///
/// The map is partitioned by definition name and each checking task appends
/// only to its own definition's list, so writers never contend on one entry.
/// Reads are only valid after every writer of the run has finished - the
/// driver's completion is that barrier. The store spans exactly one run over
/// a fixed source set; [`TypeResolutionStore::reset`] clears it for the
/// next one.
#[derive(Debug, Default)]
pub struct TypeResolutionStore {
    entries: DashMap<QualifiedName, Vec<(PositionKey, TypeSnapshot)>, FxBuildHasher>,
}

impl TypeResolutionStore {
    pub fn new() -> Self {
        TypeResolutionStore::default()
    }

    /// Append one record to a definition's list.
    ///
    /// Fails with [`CheckError::DuplicateKey`] if the key was already
    /// published for this definition - a key-generation bug, not user input.
    pub fn append(
        &self,
        define: &QualifiedName,
        key: PositionKey,
        snapshot: TypeSnapshot,
    ) -> Result<(), CheckError> {
        let mut records = self.entries.entry(define.clone()).or_default();
        if records.iter().any(|(existing, _)| *existing == key) {
            return Err(CheckError::DuplicateKey {
                define: define.clone(),
                key,
            });
        }
        records.push((key, snapshot));
        Ok(())
    }

    /// A definition's records in publication order, or `None` if it was not
    /// checked in the current run.
    pub fn get(&self, define: &QualifiedName) -> Option<Vec<(PositionKey, TypeSnapshot)>> {
        self.entries.get(define).map(|records| records.value().clone())
    }

    pub fn contains(&self, define: &QualifiedName) -> bool {
        self.entries.contains_key(define)
    }

    /// Number of definitions with records this run.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all records. Must be called between runs; records never carry
    /// over implicitly.
    pub fn reset(&self) {
        self.entries.clear();
    }
}
