//! Semantic-analysis core of the vetch static checker.
//!
//! vetch checks a dynamically-typed, class-based language. An external
//! parser produces [`Source`]s; this core builds the whole-program
//! [`Environment`], runs the flow-sensitive checking pass over every
//! function/method body, and serves the results through a position-keyed
//! store and two derived graphs:
//!
//! - [`check_program`] - populate, fan the pass out across definitions,
//!   return a [`CheckedProgram`]
//! - [`CheckedProgram::call_graph`] - caller -> ordered callees
//! - [`CheckedProgram::overrides`] - base method -> immediate overriders
//! - [`CheckedProgram::resolutions`] - per-program-point type snapshots
//!
//! The core produces pure data. Parsing, diagnostics rendering, file
//! discovery and persistence are external collaborators.

mod program;
pub use program::{CheckedProgram, check_program};

pub use vetch_common::ast;
pub use vetch_common::{
    CheckError, Configuration, PositionKey, QualifiedName, Source, SourceFlags, Ty, TypeSnapshot,
};

pub use vetch_env::{ClassDeclaration, Define, Environment, GlobalDeclaration};

pub use vetch_checker::{
    AccessResolver, ResolvedElement, SignatureResolution, TypeChecker, TypeResolutionStore,
};

pub use vetch_graph::{CallGraph, CallGraphBuilder, OverrideAnalyzer, OverrideMap};
