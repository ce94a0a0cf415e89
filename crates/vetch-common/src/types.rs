//! Type values and flow snapshots.

use crate::QualifiedName;
use rustc_hash::FxHashMap;
use std::fmt;

/// A resolved type value.
///
/// Closed set with exhaustive matching everywhere: either an instance of a
/// class known to the environment, or an opaque builtin such as `int`.
/// Attribute steps only make progress on `Class`; members of a `Builtin` are
/// outside the knowledge base.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ty {
    /// Instance of a class declared in the environment.
    Class(QualifiedName),
    /// Opaque named type the environment holds no declaration for.
    Builtin(QualifiedName),
}

impl Ty {
    pub fn class(name: impl Into<QualifiedName>) -> Self {
        Ty::Class(name.into())
    }

    pub fn builtin(name: impl Into<QualifiedName>) -> Self {
        Ty::Builtin(name.into())
    }

    /// The class name if this is a class instance type.
    pub fn class_name(&self) -> Option<&QualifiedName> {
        match self {
            Ty::Class(name) => Some(name),
            Ty::Builtin(_) => None,
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Class(name) | Ty::Builtin(name) => write!(f, "{name}"),
        }
    }
}

/// Flow-sensitive mapping from local variable to inferred type, valid at
/// exactly one program point.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeSnapshot {
    bindings: FxHashMap<String, Ty>,
}

impl TypeSnapshot {
    pub fn new() -> Self {
        TypeSnapshot::default()
    }

    pub fn get(&self, name: &str) -> Option<&Ty> {
        self.bindings.get(name)
    }

    pub fn bind(&mut self, name: impl Into<String>, ty: Ty) {
        self.bindings.insert(name.into(), ty);
    }

    pub fn unbind(&mut self, name: &str) {
        self.bindings.remove(name);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Ty)> {
        self.bindings.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    /// Keep only the bindings `other` agrees on. This is the snapshot join:
    /// a binding survives a control-flow merge only if every merged
    /// predecessor binds the same type.
    pub fn retain_agreeing(&mut self, other: &TypeSnapshot) {
        self.bindings.retain(|name, ty| other.get(name) == Some(ty));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_and_unbind() {
        let mut snapshot = TypeSnapshot::new();
        snapshot.bind("a", Ty::class("Foo"));
        assert_eq!(snapshot.get("a"), Some(&Ty::class("Foo")));
        snapshot.bind("a", Ty::class("Bar"));
        assert_eq!(snapshot.get("a"), Some(&Ty::class("Bar")));
        snapshot.unbind("a");
        assert!(snapshot.get("a").is_none());
    }

    #[test]
    fn retain_agreeing_drops_disagreements() {
        let mut left = TypeSnapshot::new();
        left.bind("same", Ty::class("Foo"));
        left.bind("differs", Ty::class("Foo"));
        left.bind("only_left", Ty::builtin("int"));

        let mut right = TypeSnapshot::new();
        right.bind("same", Ty::class("Foo"));
        right.bind("differs", Ty::class("Bar"));

        left.retain_agreeing(&right);
        assert_eq!(left.get("same"), Some(&Ty::class("Foo")));
        assert!(left.get("differs").is_none());
        assert!(left.get("only_left").is_none());
    }
}
