//! Foundation for samekind.
//!
//! This crate holds everything the operation catalog builds on:
//!
//! - [`Traverse`]: the capability a host container implements to opt in
//! - [`Arg`], [`Arity`] and [`split`]: dividing a combined argument list
//!   between the traversal and the operation
//! - [`Configuration`]: the per-type record holding the reconstruction
//!   factory and the mapping rewrap settings
//! - [`Reconstructor`] and [`construct`]: building a new host instance from
//!   produced elements
//! - [`RewrapError`]: the error taxonomy shared by all samekind crates

pub mod arg;
pub mod config;
pub mod engine;
pub mod error;
pub mod registry;
pub mod traverse;

pub use arg::{split, Arg, Arity, ArityAmbiguity, Split};
pub use config::{ConfigSnapshot, Configuration, Factory, MapOp, MappingGate, MappingSettings};
pub use engine::{construct, Reconstructor};
pub use error::{RewrapError, RewrapResult};
pub use traverse::{Elements, Traverse};
