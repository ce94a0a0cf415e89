//! The closed error set of the semantic core.
//!
//! Only structural/declaration problems are errors; a chain step that cannot
//! be resolved is data (`Unknown`) and flows through derived structures as a
//! silent omission.

use crate::{PositionKey, QualifiedName};
use thiserror::Error;

/// Fatal errors aborting a population or checking run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// Two sources declare the same qualified name.
    #[error("duplicate declaration of `{name}`")]
    DuplicateDeclaration { name: QualifiedName },

    /// The same program point was published twice for one definition.
    /// Invariant violation in key generation, not a user error.
    #[error("duplicate position key {key} while checking `{define}`")]
    DuplicateKey {
        define: QualifiedName,
        key: PositionKey,
    },

    /// A class participates in a base-list cycle.
    #[error("cycle in base classes involving `{name}`")]
    CycleInBases { name: QualifiedName },
}
