//! Reconstruction: turning produced elements back into a host instance.

use std::any::type_name;

use tracing::trace;

use crate::config::Factory;
use crate::error::RewrapResult;
use crate::traverse::Traverse;

/// Builds instances of `H` with the factory resolved from its configuration.
///
/// The factory is resolved once, when the reconstructor is created, so every
/// instance built by one operation uses the same factory.
pub struct Reconstructor<H: Traverse> {
    factory: Factory<H>,
}

impl<H: Traverse> Reconstructor<H> {
    /// Resolve `H`'s configuration record and capture its factory.
    pub fn for_host() -> Self {
        Self {
            factory: H::configuration().factory(),
        }
    }

    /// Build one host instance. A factory rejection is returned unchanged.
    pub fn build(&self, elements: Vec<H::Item>) -> RewrapResult<H> {
        let len = elements.len();
        let host = (self.factory)(elements)?;
        trace!(host = type_name::<H>(), len, "host reconstructed");
        Ok(host)
    }
}

impl<H: Traverse> Clone for Reconstructor<H> {
    fn clone(&self) -> Self {
        Self {
            factory: self.factory.clone(),
        }
    }
}

/// Build a new `H` from `elements` using its configured factory.
pub fn construct<H: Traverse>(elements: Vec<H::Item>) -> RewrapResult<H> {
    Reconstructor::<H>::for_host().build(elements)
}
