//! Flow-sensitive type resolution.
//!
//! This crate holds the middle of the pipeline:
//! - `resolver` - pure access-chain resolution against the environment and a
//!   local snapshot
//! - `flow` - lowering of bodies into straight-line blocks and the snapshot
//!   walk order
//! - `checker` - the per-definition checking pass that drives the resolver
//!   and publishes snapshots
//! - `store` - the shared position-keyed resolution store

pub mod checker;
pub mod flow;
pub mod resolver;
pub mod store;

pub use checker::{TypeChecker, entry_snapshot};
pub use flow::{Block, BlockId, FlowGraph, FlowStmt, join_snapshots};
pub use resolver::{AccessResolver, ResolvedElement, SignatureResolution};
pub use store::TypeResolutionStore;

#[cfg(test)]
mod tests;
