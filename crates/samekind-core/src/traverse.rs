//! The capability a host container implements to opt in.

use std::sync::Arc;

use crate::arg::{Arg, Arity};
use crate::config::Configuration;
use crate::error::RewrapResult;
use crate::registry;

/// Elements produced by one traversal of a host.
pub type Elements<'a, T> = Box<dyn Iterator<Item = T> + 'a>;

/// A sequential container that can be traversed and rebuilt.
///
/// Implementing this trait is the whole registration step: every type that
/// implements it gets the operation catalog from the `samekind` crate.
///
/// ```rust
/// use samekind_core::{Arg, Elements, RewrapResult, Traverse};
///
/// struct Bag(Vec<i64>);
///
/// impl Traverse for Bag {
///     type Item = i64;
///
///     fn traverse(&self, _args: &[Arg]) -> RewrapResult<Elements<'_, i64>> {
///         Ok(Box::new(self.0.iter().copied()))
///     }
///
///     fn from_elements(elements: Vec<i64>) -> RewrapResult<Self> {
///         Ok(Bag(elements))
///     }
/// }
/// ```
pub trait Traverse: Sized + 'static {
    /// The element type produced by traversal.
    type Item: Clone + 'static;

    /// How many leading arguments [`Traverse::traverse`] accepts.
    const ARITY: Arity = Arity::Fixed(0);

    /// Produce every element once, in a fixed deterministic order.
    ///
    /// Each call must start over from the first element.
    fn traverse(&self, args: &[Arg]) -> RewrapResult<Elements<'_, Self::Item>>;

    /// The conventional constructor, used when no custom factory is set.
    fn from_elements(elements: Vec<Self::Item>) -> RewrapResult<Self>;

    /// The configuration record shared by every instance of this type.
    ///
    /// Defaults to the process-wide registry. Override to hand out an
    /// explicitly shared handle instead.
    fn configuration() -> Arc<Configuration<Self>> {
        registry::configuration::<Self>()
    }
}
