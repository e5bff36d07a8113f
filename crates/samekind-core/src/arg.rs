//! Positional arguments and the traversal/operation argument split.
//!
//! Callers hand an operation one flat argument list. The leading part belongs
//! to the host's traversal capability (for example an offset added to every
//! element), the rest belongs to the operation itself (for example the count
//! of `take`). [`split`] divides the list using the traversal's declared
//! [`Arity`].
//!
//! # Limitation
//!
//! When the traversal is [`Arity::Variable`] the split point is undecidable,
//! so the whole list goes to the traversal and the operation receives
//! nothing. [`Split::ambiguity`] reports this case so dispatch can log it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single positional argument value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Arg {
    Int(i64),
    Bool(bool),
    Text(String),
}

impl Arg {
    /// The integer payload, if this is an [`Arg::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The argument as a non-negative count.
    pub fn as_count(&self) -> Option<usize> {
        self.as_int().and_then(|v| usize::try_from(v).ok())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<i64> for Arg {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Arg {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for Arg {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<usize> for Arg {
    fn from(v: usize) -> Self {
        Self::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Arg {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Number of leading arguments a traversal capability accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arity {
    /// Exactly this many leading arguments.
    Fixed(usize),
    /// Unbounded or unknown.
    Variable,
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "{n}"),
            Self::Variable => f.write_str("variable"),
        }
    }
}

/// A combined argument list divided between traversal and operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Split<'a> {
    pub traversal: &'a [Arg],
    pub operation: &'a [Arg],
    pub arity: Arity,
}

impl<'a> Split<'a> {
    /// Report whether an operation taking positional arguments may have had
    /// them swallowed by a variadic traversal.
    pub fn ambiguity(&self, operation_takes_args: bool) -> Option<ArityAmbiguity> {
        if operation_takes_args && self.arity == Arity::Variable && !self.traversal.is_empty() {
            Some(ArityAmbiguity {
                arity: self.arity,
                supplied: self.traversal.len(),
            })
        } else {
            None
        }
    }
}

/// Divide `args` into traversal arguments and operation arguments.
pub fn split(args: &[Arg], arity: Arity) -> Split<'_> {
    let at = match arity {
        Arity::Variable => args.len(),
        Arity::Fixed(n) => n.min(args.len()),
    };
    let (traversal, operation) = args.split_at(at);
    Split {
        traversal,
        operation,
        arity,
    }
}

/// Advisory: the traversal's arity could not tell which arguments belong to
/// the operation. Logged, never returned as an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArityAmbiguity {
    pub arity: Arity,
    pub supplied: usize,
}

impl fmt::Display for ArityAmbiguity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "traversal arity is {}; all {} argument(s) were given to the traversal",
            self.arity, self.supplied
        )
    }
}
