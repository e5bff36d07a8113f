//! Error types shared by every samekind crate.

use std::any::type_name;

/// Errors produced while configuring hosts or running catalog operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RewrapError {
    /// An invalid mapping-operation name or a malformed configuration document.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The configured factory refused the produced element sequence.
    #[error("cannot reconstruct {host}: {reason}")]
    Reconstruction { host: &'static str, reason: String },

    /// The operation needs a positional argument that was not supplied.
    #[error("{op} requires an operation argument")]
    MissingArgument { op: &'static str },

    /// The operation received a positional argument it cannot use.
    #[error("invalid argument for {op}: {reason}")]
    InvalidArgument { op: &'static str, reason: String },

    /// A lazy handle was requested for an operation that takes no action.
    #[error("{op} takes no action and has no lazy form")]
    NotLazy { op: &'static str },

    /// The host's traversal capability rejected its arguments.
    #[error("traversal failed: {0}")]
    Traversal(String),
}

impl RewrapError {
    /// Build a reconstruction error attributed to host type `H`.
    pub fn reconstruction<H>(reason: impl Into<String>) -> Self {
        Self::Reconstruction {
            host: type_name::<H>(),
            reason: reason.into(),
        }
    }

    /// Build a traversal error.
    pub fn traversal(reason: impl Into<String>) -> Self {
        Self::Traversal(reason.into())
    }
}

/// Convenience alias for samekind results.
pub type RewrapResult<T> = Result<T, RewrapError>;
