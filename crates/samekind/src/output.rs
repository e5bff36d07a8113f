//! Result shapes for operations whose output depends on their arguments or
//! on the host's configuration.

/// Result of `first`, `min`, `max`, `min_by` and `max_by`.
///
/// Without a count these return a raw element (or `None` on an empty host);
/// with a count they return a reconstructed host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<H, T> {
    Scalar(Option<T>),
    Host(H),
}

impl<H, T> Outcome<H, T> {
    pub fn is_host(&self) -> bool {
        matches!(self, Self::Host(_))
    }

    pub fn into_host(self) -> Option<H> {
        match self {
            Self::Host(host) => Some(host),
            Self::Scalar(_) => None,
        }
    }

    /// The scalar result; the outer `None` means this was a host result.
    pub fn into_scalar(self) -> Option<Option<T>> {
        match self {
            Self::Scalar(value) => Some(value),
            Self::Host(_) => None,
        }
    }
}

/// Result of the mapping family (`map`, `collect`, `flat_map`,
/// `collect_concat`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mapped<H, U> {
    /// Rewrapped into the host type.
    Host(H),
    /// The produced sequence, unchanged.
    Raw(Vec<U>),
}

impl<H, U> Mapped<H, U> {
    pub fn is_host(&self) -> bool {
        matches!(self, Self::Host(_))
    }

    pub fn into_host(self) -> Option<H> {
        match self {
            Self::Host(host) => Some(host),
            Self::Raw(_) => None,
        }
    }

    pub fn into_raw(self) -> Option<Vec<U>> {
        match self {
            Self::Raw(values) => Some(values),
            Self::Host(_) => None,
        }
    }
}
