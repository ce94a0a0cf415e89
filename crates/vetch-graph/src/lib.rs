//! Derived graphs over a checked program.
//!
//! Both builders are stateless consumers: they read the environment and the
//! resolution store the checking pass produced and emit immutable data.
//! They must only run after every checking task has finished - partial
//! store contents would silently shrink the graphs.

mod call_graph;
pub use call_graph::{CallGraph, CallGraphBuilder};

mod overrides;
pub use overrides::{OverrideAnalyzer, OverrideMap};
