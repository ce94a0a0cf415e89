//! The per-definition checking pass.
//!
//! Walks every statement of a definition body in flow order, maintains the
//! flow-sensitive snapshot, resolves every contained chain, and publishes
//! one (program point, snapshot) record per statement to the store.
//! Definitions are independent (bindings never cross a definition
//! boundary), so one pass per definition can run on its own worker.

use tracing::{debug, info_span};
use vetch_common::ast::{AccessChain, Step};
use vetch_common::{CheckError, Configuration, Ty, TypeSnapshot};
use vetch_env::{Define, Environment};

use crate::flow::{BlockId, FlowGraph, FlowStmt, join_snapshots};
use crate::resolver::{AccessResolver, ResolvedElement};
use crate::store::TypeResolutionStore;

/// The bindings in force at body entry: the receiver for methods, plus every
/// parameter with a declared type.
pub fn entry_snapshot(env: &Environment, define: &Define) -> TypeSnapshot {
    let mut snapshot = TypeSnapshot::new();
    if let Some(owner) = &define.owner {
        snapshot.bind("self", Ty::Class(owner.clone()));
    }
    for param in &define.params {
        if let Some(ty) = &param.ty {
            snapshot.bind(param.name.clone(), env.resolve_type_name(&define.module, ty));
        }
    }
    snapshot
}

/// Drives the resolver over one definition and publishes to the store.
pub struct TypeChecker<'a> {
    env: &'a Environment,
    config: &'a Configuration,
    store: &'a TypeResolutionStore,
}

impl<'a> TypeChecker<'a> {
    pub fn new(
        env: &'a Environment,
        config: &'a Configuration,
        store: &'a TypeResolutionStore,
    ) -> Self {
        TypeChecker { env, config, store }
    }

    /// Check one definition body.
    ///
    /// Blocks are walked in allocation order; a block inherits the join of
    /// its already-walked predecessors' exit snapshots (straight-line
    /// carry-over for a single predecessor). After each statement the
    /// snapshot valid at that point is appended to the store.
    pub fn check_define(&self, define: &Define) -> Result<(), CheckError> {
        let _span = info_span!("check_define", define = %define.name).entered();
        let resolver = AccessResolver::new(self.env, &define.module);
        let graph = FlowGraph::build(&define.body);
        let mut exits: Vec<Option<TypeSnapshot>> = vec![None; graph.len()];

        for (block_id, block) in graph.blocks() {
            let mut snapshot = if block_id == BlockId::ENTRY {
                entry_snapshot(self.env, define)
            } else {
                join_snapshots(&block.predecessors, &exits)
            };
            for (index, statement) in block.statements.iter().enumerate() {
                self.check_statement(&resolver, statement, &mut snapshot);
                let key = FlowGraph::position_key(block_id, index);
                self.store.append(&define.name, key, snapshot.clone())?;
            }
            exits[block_id.index()] = Some(snapshot);
        }
        Ok(())
    }

    fn check_statement(
        &self,
        resolver: &AccessResolver<'_>,
        statement: &FlowStmt<'_>,
        snapshot: &mut TypeSnapshot,
    ) {
        match statement {
            FlowStmt::Assign { target, value } => {
                let resolved = self.resolve_chain(resolver, value, snapshot);
                if self.config.debug {
                    debug!(local = *target, ?resolved, "assignment resolved");
                }
                if self.config.infer {
                    match resolved {
                        ResolvedElement::Value(ty) => snapshot.bind(*target, ty),
                        // A rebinding we cannot resolve invalidates what was
                        // known about the target.
                        _ => snapshot.unbind(target),
                    }
                }
            }
            FlowStmt::Expr(chain) | FlowStmt::Cond(chain) => {
                let resolved = self.resolve_chain(resolver, chain, snapshot);
                if self.config.debug {
                    debug!(?resolved, "expression resolved");
                }
            }
            FlowStmt::Return(Some(chain)) => {
                self.resolve_chain(resolver, chain, snapshot);
            }
            FlowStmt::Return(None) => {}
        }
    }

    /// Resolve a chain and, recursively, every argument chain it carries.
    fn resolve_chain(
        &self,
        resolver: &AccessResolver<'_>,
        chain: &AccessChain,
        snapshot: &TypeSnapshot,
    ) -> ResolvedElement {
        for step in chain.steps() {
            if let Step::Call(args) = step {
                for arg in args {
                    self.resolve_chain(resolver, arg, snapshot);
                }
            }
        }
        resolver.resolve(chain, snapshot)
    }
}
