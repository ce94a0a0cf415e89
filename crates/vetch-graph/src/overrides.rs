//! Override-set computation.
//!
//! For every method directly defined on a class, finds the first declared
//! base that also directly defines a method of that name and records the
//! immediate override edge under the base method's key. Edges are never
//! propagated past the immediate definition: a grandparent's entry never
//! lists a grandchild's override.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use vetch_common::{QualifiedName, Source};
use vetch_env::{ClassDeclaration, Environment};

/// Base method -> immediate overriding methods, in class/method enumeration
/// order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverrideMap {
    edges: IndexMap<QualifiedName, Vec<QualifiedName>>,
}

impl OverrideMap {
    pub fn overrides_of(&self, base_method: &QualifiedName) -> Option<&[QualifiedName]> {
        self.edges.get(base_method).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QualifiedName, &[QualifiedName])> {
        self.edges
            .iter()
            .map(|(base, overriding)| (base, overriding.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Computes override maps from the environment's class hierarchy.
///
/// Stateless and recomputed per request; assumes the hierarchy was validated
/// acyclic at population.
pub struct OverrideAnalyzer<'a> {
    env: &'a Environment,
}

impl<'a> OverrideAnalyzer<'a> {
    pub fn new(env: &'a Environment) -> Self {
        OverrideAnalyzer { env }
    }

    /// Override edges for every class reachable from the classes declared in
    /// `source`.
    pub fn overrides_of_source(&self, source: &Source) -> OverrideMap {
        let mut map = OverrideMap::default();
        for class_name in self.reachable_classes(source) {
            let Some(class) = self.env.class(&class_name) else {
                continue;
            };
            for (method, define_name) in &class.methods {
                if let Some(base_method) = self.base_definition(class, method) {
                    map.edges
                        .entry(base_method)
                        .or_default()
                        .push(define_name.clone());
                }
            }
        }
        map
    }

    /// Classes declared in the source, then their bases breadth-first,
    /// deduplicated.
    fn reachable_classes(&self, source: &Source) -> Vec<QualifiedName> {
        let mut seen = FxHashSet::default();
        let mut order: Vec<QualifiedName> = Vec::new();
        for class in source.classes() {
            let name = source.module.member(&class.name);
            if seen.insert(name.clone()) {
                order.push(name);
            }
        }
        let mut cursor = 0;
        while cursor < order.len() {
            let name = order[cursor].clone();
            cursor += 1;
            if let Some(class) = self.env.class(&name) {
                for base in &class.bases {
                    if seen.insert(base.clone()) {
                        order.push(base.clone());
                    }
                }
            }
        }
        order
    }

    /// The method this class's `method` overrides: scan the declared bases
    /// in order for the first that directly defines it. `None` for a root
    /// definition.
    fn base_definition(&self, class: &ClassDeclaration, method: &str) -> Option<QualifiedName> {
        for base in &class.bases {
            if let Some(base_class) = self.env.class(base) {
                if let Some(base_method) = base_class.methods.get(method) {
                    return Some(base_method.clone());
                }
            }
        }
        None
    }
}
