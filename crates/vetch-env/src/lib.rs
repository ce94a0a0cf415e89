//! Whole-program declaration environment.
//!
//! `Environment::populate` merges every class, function/method and global
//! declared across a set of sources into keyed tables, fail-fast on
//! duplicate qualified names, and validates the base-class hierarchy. The
//! environment is write-once: after population it is only read.

mod environment;
pub use environment::{ClassDeclaration, Define, Environment, GlobalDeclaration};
