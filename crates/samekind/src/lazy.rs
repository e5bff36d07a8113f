//! Restartable lazy sequences.
//!
//! [`LazyChunks`] wraps each chunk produced by a chunking operation into a
//! host instance as it is pulled. [`Descriptor`] is the handle returned when
//! an operation is requested without its terminal action. Both re-drive the
//! host's traversal from the first element every time they are iterated, and
//! neither holds more than the chunk currently being assembled.

use std::collections::VecDeque;
use std::fmt;
use std::iter::Peekable;

use samekind_core::{Arg, Elements, Reconstructor, RewrapResult, Traverse};

use crate::catalog::OpName;

// ---------------------------------------------------------------------------
// Boundary
// ---------------------------------------------------------------------------

/// Where one chunk ends and the next begins.
pub(crate) enum Boundary<'f, T> {
    /// Keep adjacent elements together while the predicate holds.
    While(Box<dyn Fn(&T, &T) -> bool + 'f>),
    /// Split between adjacent elements when the predicate holds.
    When(Box<dyn Fn(&T, &T) -> bool + 'f>),
    /// Start a new chunk before each matching element.
    Before(Box<dyn Fn(&T) -> bool + 'f>),
    /// End the chunk after each matching element.
    After(Box<dyn Fn(&T) -> bool + 'f>),
    /// Consecutive chunks of `size`; the last may be shorter.
    Slice(usize),
    /// Overlapping windows of `size`.
    Cons(usize),
}

/// Raw chunks pulled from one traversal.
struct RawChunks<'s, 'f, T> {
    source: Peekable<Elements<'s, T>>,
    boundary: &'s Boundary<'f, T>,
    window: VecDeque<T>,
}

impl<'s, 'f, T> RawChunks<'s, 'f, T> {
    fn new(source: Elements<'s, T>, boundary: &'s Boundary<'f, T>) -> Self {
        Self {
            source: source.peekable(),
            boundary,
            window: VecDeque::new(),
        }
    }

    fn adjacent(&mut self, split: impl Fn(&T, &T) -> bool) -> Option<Vec<T>> {
        let mut last = self.source.next()?;
        let mut chunk = Vec::new();
        while let Some(next) = self.source.next_if(|next| !split(&last, next)) {
            chunk.push(std::mem::replace(&mut last, next));
        }
        chunk.push(last);
        Some(chunk)
    }
}

impl<T: Clone> Iterator for RawChunks<'_, '_, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        let boundary = self.boundary;
        match boundary {
            Boundary::While(keep) => self.adjacent(|a, b| !keep(a, b)),
            Boundary::When(split) => self.adjacent(|a, b| split(a, b)),
            Boundary::Before(starts) => {
                let mut chunk = vec![self.source.next()?];
                while let Some(next) = self.source.next_if(|x| !starts(x)) {
                    chunk.push(next);
                }
                Some(chunk)
            }
            Boundary::After(ends) => {
                let mut chunk = Vec::new();
                for element in self.source.by_ref() {
                    let done = ends(&element);
                    chunk.push(element);
                    if done {
                        break;
                    }
                }
                (!chunk.is_empty()).then_some(chunk)
            }
            Boundary::Slice(size) => {
                let chunk: Vec<T> = self.source.by_ref().take(*size).collect();
                (!chunk.is_empty()).then_some(chunk)
            }
            Boundary::Cons(size) => {
                if !self.window.is_empty() {
                    self.window.pop_front();
                }
                while self.window.len() < *size {
                    self.window.push_back(self.source.next()?);
                }
                Some(self.window.iter().cloned().collect())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// LazyChunks
// ---------------------------------------------------------------------------

/// A restartable lazy sequence of host instances, one per chunk.
pub struct LazyChunks<'a, H: Traverse> {
    host: &'a H,
    op: OpName,
    traversal: Vec<Arg>,
    boundary: Boundary<'a, H::Item>,
}

impl<'a, H: Traverse> LazyChunks<'a, H> {
    pub(crate) fn new(
        host: &'a H,
        op: OpName,
        traversal: Vec<Arg>,
        boundary: Boundary<'a, H::Item>,
    ) -> Self {
        Self {
            host,
            op,
            traversal,
            boundary,
        }
    }

    /// The operation that produced this sequence.
    pub fn op(&self) -> OpName {
        self.op
    }

    /// Start a fresh pass over the host.
    pub fn iter(&self) -> RewrapResult<WrappedChunks<'_, 'a, H>> {
        let source = self.host.traverse(&self.traversal)?;
        Ok(WrappedChunks {
            chunks: RawChunks::new(source, &self.boundary),
            reconstructor: Reconstructor::for_host(),
        })
    }

    /// Run a full pass and collect every host instance.
    pub fn to_vec(&self) -> RewrapResult<Vec<H>> {
        self.iter()?.collect()
    }
}

impl<H: Traverse> fmt::Debug for LazyChunks<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyChunks")
            .field("op", &self.op)
            .field("traversal", &self.traversal)
            .finish_non_exhaustive()
    }
}

/// One pass of a [`LazyChunks`] sequence.
pub struct WrappedChunks<'s, 'a, H: Traverse> {
    chunks: RawChunks<'s, 'a, H::Item>,
    reconstructor: Reconstructor<H>,
}

impl<H: Traverse> fmt::Debug for WrappedChunks<'_, '_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrappedChunks")
            .field("buffered", &self.chunks.window.len())
            .finish_non_exhaustive()
    }
}

impl<H: Traverse> Iterator for WrappedChunks<'_, '_, H> {
    type Item = RewrapResult<H>;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.chunks.next()?;
        Some(self.reconstructor.build(chunk))
    }
}

// ---------------------------------------------------------------------------
// Descriptor
// ---------------------------------------------------------------------------

/// An operation bound to its host and arguments, not yet executed.
///
/// Iterating it yields the elements the operation would consume.
pub struct Descriptor<'a, H: Traverse> {
    host: &'a H,
    op: OpName,
    traversal: Vec<Arg>,
    operation: Vec<Arg>,
}

impl<'a, H: Traverse> Descriptor<'a, H> {
    pub(crate) fn new(host: &'a H, op: OpName, traversal: Vec<Arg>, operation: Vec<Arg>) -> Self {
        Self {
            host,
            op,
            traversal,
            operation,
        }
    }

    pub fn op(&self) -> OpName {
        self.op
    }

    pub fn traversal_args(&self) -> &[Arg] {
        &self.traversal
    }

    pub fn operation_args(&self) -> &[Arg] {
        &self.operation
    }

    /// Start a fresh pass over the host.
    pub fn iter(&self) -> RewrapResult<Elements<'a, H::Item>> {
        self.host.traverse(&self.traversal)
    }

    pub fn to_vec(&self) -> RewrapResult<Vec<H::Item>> {
        Ok(self.iter()?.collect())
    }
}

impl<H: Traverse> fmt::Debug for Descriptor<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("op", &self.op)
            .field("traversal", &self.traversal)
            .field("operation", &self.operation)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Lazy
// ---------------------------------------------------------------------------

/// What an operation returns when no action is supplied.
#[derive(Debug)]
pub enum Lazy<'a, H: Traverse> {
    /// The elements the operation would consume.
    Elements(Descriptor<'a, H>),
    /// Wrapped chunks (`each_slice`, `each_cons`).
    Chunks(LazyChunks<'a, H>),
}

impl<'a, H: Traverse> Lazy<'a, H> {
    pub fn op(&self) -> OpName {
        match self {
            Self::Elements(d) => d.op(),
            Self::Chunks(c) => c.op(),
        }
    }

    pub fn into_elements(self) -> Option<Descriptor<'a, H>> {
        match self {
            Self::Elements(d) => Some(d),
            Self::Chunks(_) => None,
        }
    }

    pub fn into_chunks(self) -> Option<LazyChunks<'a, H>> {
        match self {
            Self::Chunks(c) => Some(c),
            Self::Elements(_) => None,
        }
    }
}
