//! Caller -> callee extraction.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::debug;
use vetch_common::ast::{AccessChain, Step};
use vetch_common::{PositionKey, QualifiedName, Source, TypeSnapshot};
use vetch_env::{Define, Environment};

use vetch_checker::flow::{BlockId, FlowGraph, join_snapshots};
use vetch_checker::resolver::AccessResolver;
use vetch_checker::store::TypeResolutionStore;
use vetch_checker::entry_snapshot;

/// Caller -> ordered callees. Order is order of appearance; duplicate calls
/// are retained. Callers with no resolved calls have no entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallGraph {
    edges: IndexMap<QualifiedName, Vec<QualifiedName>>,
}

impl CallGraph {
    pub fn callees(&self, caller: &QualifiedName) -> Option<&[QualifiedName]> {
        self.edges.get(caller).map(Vec::as_slice)
    }

    pub fn callers(&self) -> impl Iterator<Item = &QualifiedName> {
        self.edges.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QualifiedName, &[QualifiedName])> {
        self.edges
            .iter()
            .map(|(caller, callees)| (caller, callees.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Builds call graphs from checked sources.
///
/// Hard ordering dependency on the checking pass: the builder replays each
/// definition's statements against the snapshots the pass published. A
/// definition without store records resolves nothing and is omitted.
pub struct CallGraphBuilder<'a> {
    env: &'a Environment,
    store: &'a TypeResolutionStore,
}

impl<'a> CallGraphBuilder<'a> {
    pub fn new(env: &'a Environment, store: &'a TypeResolutionStore) -> Self {
        CallGraphBuilder { env, store }
    }

    /// Extract the call graph of one checked source, one linear walk per
    /// definition.
    pub fn of_source(&self, source: &Source) -> CallGraph {
        let mut graph = CallGraph::default();
        for define in self.env.defines_of_source(source) {
            let callees = self.callees_of_define(&define);
            if !callees.is_empty() {
                graph.edges.insert(define.name.clone(), callees);
            }
        }
        graph
    }

    fn callees_of_define(&self, define: &Define) -> Vec<QualifiedName> {
        let Some(records) = self.store.get(&define.name) else {
            debug!(define = %define.name, "no resolution records, skipping");
            return Vec::new();
        };
        let stored: FxHashMap<PositionKey, TypeSnapshot> = records.into_iter().collect();

        let resolver = AccessResolver::new(self.env, &define.module);
        let flow = FlowGraph::build(&define.body);
        let mut exits: Vec<Option<TypeSnapshot>> = vec![None; flow.len()];
        let mut callees = Vec::new();

        for (block_id, block) in flow.blocks() {
            let mut snapshot = if block_id == BlockId::ENTRY {
                entry_snapshot(self.env, define)
            } else {
                join_snapshots(&block.predecessors, &exits)
            };
            for (index, statement) in block.statements.iter().enumerate() {
                if let Some(chain) = statement.chain() {
                    collect_calls(&resolver, chain, &snapshot, &mut callees);
                }
                // The stored record for this point is the snapshot in force
                // after the statement - the next statement's input.
                if let Some(after) = stored.get(&FlowGraph::position_key(block_id, index)) {
                    snapshot = after.clone();
                }
            }
            exits[block_id.index()] = Some(snapshot);
        }
        callees
    }
}

/// Collect resolved callees of one chain in appearance order: steps left to
/// right, a call's target before its argument chains.
fn collect_calls(
    resolver: &AccessResolver<'_>,
    chain: &AccessChain,
    snapshot: &TypeSnapshot,
    out: &mut Vec<QualifiedName>,
) {
    let elements = resolver.resolve_steps(chain, snapshot);
    for (index, step) in chain.steps().iter().enumerate() {
        let Step::Call(args) = step else { continue };
        if index > 0 {
            if let Some(callable) = elements[index - 1].callable() {
                out.push(callable.clone());
            }
        }
        for arg in args {
            collect_calls(resolver, arg, snapshot, out);
        }
    }
}
