//! Common types for the vetch semantic-analysis core.
//!
//! This crate provides the foundational data model shared by all vetch
//! crates:
//! - Qualified names (`QualifiedName`)
//! - The parsed statement tree consumed from the external parser (`ast`)
//! - Source units and checking policy (`Source`, `SourceFlags`, `Configuration`)
//! - Type values and flow snapshots (`Ty`, `TypeSnapshot`)
//! - Program-point identity (`PositionKey`)
//! - The closed error set (`CheckError`)

pub mod ast;

mod error;
pub use error::CheckError;

mod position;
pub use position::PositionKey;

mod qualified_name;
pub use qualified_name::QualifiedName;

mod source;
pub use source::{Configuration, Source, SourceFlags};

mod types;
pub use types::{Ty, TypeSnapshot};
