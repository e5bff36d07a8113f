//! Sequence operations that rebuild the caller's own container type.
//!
//! Any type implementing [`Traverse`] gets the operation catalog through the
//! blanket [`Rewrap`] trait. Operations that logically return "a collection
//! of the same kind" (filtering, sorting, slicing, partitioning, grouping)
//! hand back instances of the host type, built by the factory configured for
//! that type, instead of a plain `Vec`.
//!
//! # Quick Start
//!
//! ```rust
//! use samekind::{Arg, Elements, Rewrap, RewrapResult, Traverse};
//!
//! #[derive(Debug, PartialEq)]
//! struct Bag(Vec<i64>);
//!
//! impl Traverse for Bag {
//!     type Item = i64;
//!
//!     fn traverse(&self, _args: &[Arg]) -> RewrapResult<Elements<'_, i64>> {
//!         Ok(Box::new(self.0.iter().copied()))
//!     }
//!
//!     fn from_elements(elements: Vec<i64>) -> RewrapResult<Self> {
//!         Ok(Bag(elements))
//!     }
//! }
//!
//! let bag = Bag(vec![1, 2, 3, 4, 5]);
//! assert_eq!(bag.select(|x| x % 2 == 1).unwrap(), Bag(vec![1, 3, 5]));
//! assert_eq!(bag.max_n(3).unwrap(), Bag(vec![5, 4, 3]));
//! assert_eq!(bag.first().unwrap(), Some(1));
//! ```
//!
//! # Policies
//!
//! Each operation in the [`catalog`] carries a [`Policy`]:
//!
//! - `Single`: one host instance (`select`, `sort`, `take`, ...)
//! - `MultiSplit`: a pair of host instances (`partition`)
//! - `Keyed`: host instances per key, in encounter order (`group_by`, `chunk`)
//! - `LazyChunks`: a restartable lazy sequence of host instances
//!   (`slice_when`, `each_slice`, ...)
//! - `Scalar`: a raw element (`first`, `min`, `max` without a count)
//! - `MappingFamily`: rewrapped only when configured for the host type

pub mod catalog;
pub mod dispatch;
pub mod lazy;
pub mod output;
pub mod pattern;
pub mod rewrap;

// Re-exports for convenience.
pub use catalog::{catalog, OpDescriptor, OpName, Policy, Positional};
pub use dispatch::Call;
pub use lazy::{Descriptor, Lazy, LazyChunks, WrappedChunks};
pub use output::{Mapped, Outcome};
pub use pattern::Pattern;
pub use rewrap::Rewrap;

pub use indexmap::IndexMap;
pub use samekind_core::registry;
pub use samekind_core::{
    construct, split, Arg, Arity, ArityAmbiguity, ConfigSnapshot, Configuration, Elements, Factory,
    MapOp, MappingGate, MappingSettings, Reconstructor, RewrapError, RewrapResult, Split,
    Traverse,
};
