//! Qualified names.
//!
//! A `QualifiedName` is a dotted identifier scoped by module path
//! (`app.models.User`, `app.models.User.save`). It is the primary key for
//! every declaration table in the environment and for the resolution store.

use std::fmt;
use std::sync::Arc;

/// Dotted identifier, unique across the whole checked program.
///
/// Backed by `Arc<str>` so clones are cheap; qualified names are cloned into
/// hash-map keys on every hot path of population and resolution.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName(Arc<str>);

impl QualifiedName {
    pub fn new(name: impl AsRef<str>) -> Self {
        QualifiedName(Arc::from(name.as_ref()))
    }

    /// The empty path, used as the module qualifier of single-module
    /// programs and test fixtures.
    pub fn root() -> Self {
        QualifiedName(Arc::from(""))
    }

    /// The qualified name of a member declared inside `self` - a class in a
    /// module, a method in a class.
    pub fn member(&self, name: &str) -> Self {
        if self.0.is_empty() {
            QualifiedName::new(name)
        } else {
            QualifiedName(Arc::from(format!("{}.{name}", self.0)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the textual form carries a module separator.
    pub fn is_dotted(&self) -> bool {
        self.0.contains('.')
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|s| !s.is_empty())
    }

    /// Last segment (`save` in `app.User.save`).
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or("")
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`", self.0)
    }
}

impl From<&str> for QualifiedName {
    fn from(name: &str) -> Self {
        QualifiedName::new(name)
    }
}
