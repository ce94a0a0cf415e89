//! Access-chain resolution.
//!
//! Resolves ordered attribute/call chains strictly left-to-right against the
//! environment and a local snapshot. Pure: no mutation, no diagnostics. A
//! step that cannot be resolved yields [`ResolvedElement::Unknown`], which
//! absorbs every later step of the same chain.

use rustc_hash::FxHashSet;
use vetch_common::ast::{AccessChain, Step};
use vetch_common::{QualifiedName, Ty, TypeSnapshot};
use vetch_env::Environment;

/// Outcome of resolving a chain prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedElement {
    /// Nothing known. Absorbing: a chain never recovers from it.
    Unknown,
    /// A value of a known type.
    Value(Ty),
    /// A callable looked up on a class, not yet invoked.
    Signature(SignatureResolution),
}

/// What an attribute step found when it matched a method slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignatureResolution {
    Found {
        /// Qualified name of the matched definition.
        callable: QualifiedName,
        /// Declared return type, resolved against the defining module.
        return_type: Option<Ty>,
    },
    /// The member table names a definition the environment does not hold.
    Unresolved,
}

impl ResolvedElement {
    pub fn is_unknown(&self) -> bool {
        matches!(self, ResolvedElement::Unknown)
    }

    pub fn value(&self) -> Option<&Ty> {
        match self {
            ResolvedElement::Value(ty) => Some(ty),
            _ => None,
        }
    }

    /// The matched callable, if this element is a found signature.
    pub fn callable(&self) -> Option<&QualifiedName> {
        match self {
            ResolvedElement::Signature(SignatureResolution::Found { callable, .. }) => {
                Some(callable)
            }
            _ => None,
        }
    }
}

/// Resolves chains written in one module against a populated environment.
pub struct AccessResolver<'a> {
    env: &'a Environment,
    module: &'a QualifiedName,
}

impl<'a> AccessResolver<'a> {
    pub fn new(env: &'a Environment, module: &'a QualifiedName) -> Self {
        AccessResolver { env, module }
    }

    /// Resolve a whole chain; the final element is the chain's type.
    pub fn resolve(&self, chain: &AccessChain, snapshot: &TypeSnapshot) -> ResolvedElement {
        self.resolve_steps(chain, snapshot)
            .pop()
            .unwrap_or(ResolvedElement::Unknown)
    }

    /// Resolve a chain, reporting the element after every step.
    ///
    /// `result[i]` is what the prefix `steps[..=i]` resolves to; the element
    /// a `Call` step applies to is therefore `result[i - 1]`.
    pub fn resolve_steps(
        &self,
        chain: &AccessChain,
        snapshot: &TypeSnapshot,
    ) -> Vec<ResolvedElement> {
        let mut elements = Vec::with_capacity(chain.steps.len());
        let mut current = ResolvedElement::Unknown;
        for (index, step) in chain.steps.iter().enumerate() {
            current = if index == 0 {
                self.resolve_head(step, snapshot)
            } else {
                self.resolve_step(current, step)
            };
            elements.push(current.clone());
        }
        elements
    }

    /// First step: bound local, then class name, then declared global.
    fn resolve_head(&self, step: &Step, snapshot: &TypeSnapshot) -> ResolvedElement {
        let Step::Ident(name) = step else {
            // A well-formed chain leads with an identifier.
            return ResolvedElement::Unknown;
        };
        if let Some(ty) = snapshot.get(name) {
            return ResolvedElement::Value(ty.clone());
        }
        if let Some(class) = self.env.resolve_class_name(self.module, name) {
            return ResolvedElement::Value(Ty::Class(class.name.clone()));
        }
        if let Some(global) = self.env.resolve_global_name(self.module, name) {
            return ResolvedElement::Value(
                self.env.resolve_type_name(&global.module, &global.ty),
            );
        }
        ResolvedElement::Unknown
    }

    fn resolve_step(&self, current: ResolvedElement, step: &Step) -> ResolvedElement {
        match step {
            // An identifier past the head never resolves.
            Step::Ident(_) => ResolvedElement::Unknown,
            Step::Attr(name) => match current {
                ResolvedElement::Value(Ty::Class(class)) => self.resolve_member(&class, name),
                _ => ResolvedElement::Unknown,
            },
            Step::Call(_) => match current {
                ResolvedElement::Signature(SignatureResolution::Found {
                    return_type: Some(ty),
                    ..
                }) => ResolvedElement::Value(ty),
                // Calling a class value instantiates it.
                ResolvedElement::Value(Ty::Class(class)) => {
                    ResolvedElement::Value(Ty::Class(class))
                }
                _ => ResolvedElement::Unknown,
            },
        }
    }

    /// Search a class for a member: directly-defined members first, then the
    /// declared bases depth-first in declaration order, first match wins.
    fn resolve_member(&self, class: &QualifiedName, attr: &str) -> ResolvedElement {
        let mut visited = FxHashSet::default();
        self.lookup_member(class, attr, &mut visited)
    }

    fn lookup_member(
        &self,
        class: &QualifiedName,
        attr: &str,
        visited: &mut FxHashSet<QualifiedName>,
    ) -> ResolvedElement {
        if !visited.insert(class.clone()) {
            // Hierarchy is validated at population; refuse to loop anyway.
            return ResolvedElement::Unknown;
        }
        let Some(decl) = self.env.class(class) else {
            return ResolvedElement::Unknown;
        };

        if let Some(define_name) = decl.methods.get(attr) {
            let Some(define) = self.env.define(define_name) else {
                return ResolvedElement::Signature(SignatureResolution::Unresolved);
            };
            let return_type = define
                .return_type
                .as_ref()
                .map(|ty| self.env.resolve_type_name(&decl.module, ty));
            return ResolvedElement::Signature(SignatureResolution::Found {
                callable: define_name.clone(),
                return_type,
            });
        }

        if let Some(field_ty) = decl.fields.get(attr) {
            return ResolvedElement::Value(self.env.resolve_type_name(&decl.module, field_ty));
        }

        for base in &decl.bases {
            match self.lookup_member(base, attr, visited) {
                ResolvedElement::Unknown => continue,
                found => return found,
            }
        }
        ResolvedElement::Unknown
    }
}
