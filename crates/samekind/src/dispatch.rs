//! Dispatch: running catalog operations against a host.
//!
//! A [`Call`] binds a host to a combined argument list, already divided
//! between the traversal and the operation. Every catalog operation drives
//! the traversal once (or, for lazy results, once per pass) and passes the
//! produced elements through the reconstruction engine according to its
//! [`Policy`](crate::catalog::Policy).

use std::any::{type_name, Any};
use std::cmp::Reverse;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use samekind_core::{
    split, Arg, Arity, Elements, MapOp, Reconstructor, RewrapError, RewrapResult, Split, Traverse,
};

use crate::catalog::{OpDescriptor, OpName, Positional};
use crate::lazy::{Boundary, Descriptor, Lazy, LazyChunks};
use crate::output::{Mapped, Outcome};
use crate::pattern::Pattern;

/// A host bound to its traversal and operation arguments.
pub struct Call<'a, H: Traverse> {
    host: &'a H,
    traversal: Vec<Arg>,
    operation: Vec<Arg>,
    arity: Arity,
}

impl<'a, H: Traverse> Call<'a, H> {
    /// Split `args` by the host's traversal arity.
    ///
    /// With a variadic traversal every argument goes to the traversal; an
    /// operation that needs its own argument (a count) will then report it
    /// missing.
    pub fn new(host: &'a H, args: &[Arg]) -> Self {
        let Split {
            traversal,
            operation,
            arity,
        } = split(args, H::ARITY);
        Self {
            host,
            traversal: traversal.to_vec(),
            operation: operation.to_vec(),
            arity,
        }
    }

    /// Arguments that are already divided; no splitting happens.
    pub fn with_parts(host: &'a H, traversal: Vec<Arg>, operation: Vec<Arg>) -> Self {
        let arity = Arity::Fixed(traversal.len());
        Self {
            host,
            traversal,
            operation,
            arity,
        }
    }

    pub(crate) fn plain(host: &'a H) -> Self {
        Self::with_parts(host, Vec::new(), Vec::new())
    }

    pub(crate) fn counted(host: &'a H, n: usize) -> Self {
        Self::with_parts(host, Vec::new(), vec![Arg::from(n)])
    }

    pub fn traversal_args(&self) -> &[Arg] {
        &self.traversal
    }

    pub fn operation_args(&self) -> &[Arg] {
        &self.operation
    }

    // ---------------------------------------------------------------
    // Plumbing
    // ---------------------------------------------------------------

    fn enter(&self, op: OpName) -> RewrapResult<OpDescriptor> {
        let descriptor = op.descriptor();
        let split = Split {
            traversal: &self.traversal,
            operation: &self.operation,
            arity: self.arity,
        };
        if let Some(ambiguity) = split.ambiguity(descriptor.takes_operation_args()) {
            warn!(host = type_name::<H>(), op = %op, %ambiguity, "ambiguous argument split");
        }

        let accepted = match descriptor.positional {
            Positional::None => 0,
            Positional::OptionalCount | Positional::RequiredCount => 1,
        };
        if self.operation.len() > accepted {
            return Err(RewrapError::InvalidArgument {
                op: op.as_str(),
                reason: format!(
                    "takes at most {accepted} operation argument(s), got {}",
                    self.operation.len()
                ),
            });
        }

        trace!(
            host = type_name::<H>(),
            op = %op,
            policy = ?descriptor.policy_with(&self.operation),
            "dispatch"
        );
        Ok(descriptor)
    }

    fn elements(&self) -> RewrapResult<Elements<'a, H::Item>> {
        self.host.traverse(&self.traversal)
    }

    fn count(&self, op: OpName) -> RewrapResult<Option<usize>> {
        match self.operation.first() {
            None => Ok(None),
            Some(arg) => arg.as_count().map(Some).ok_or_else(|| RewrapError::InvalidArgument {
                op: op.as_str(),
                reason: format!("expected a non-negative count, got {arg}"),
            }),
        }
    }

    fn required_count(&self, op: OpName) -> RewrapResult<usize> {
        self.count(op)?
            .ok_or(RewrapError::MissingArgument { op: op.as_str() })
    }

    fn chunk_size(&self, op: OpName) -> RewrapResult<usize> {
        match self.required_count(op)? {
            0 => Err(RewrapError::InvalidArgument {
                op: op.as_str(),
                reason: "size must be positive".into(),
            }),
            n => Ok(n),
        }
    }

    fn single(
        &self,
        op: OpName,
        produce: impl FnOnce(Elements<'a, H::Item>) -> Vec<H::Item>,
    ) -> RewrapResult<H> {
        self.enter(op)?;
        Reconstructor::for_host().build(produce(self.elements()?))
    }

    fn chunks(&self, op: OpName, boundary: Boundary<'a, H::Item>) -> LazyChunks<'a, H> {
        LazyChunks::new(self.host, op, self.traversal.clone(), boundary)
    }

    // ---------------------------------------------------------------
    // Single
    // ---------------------------------------------------------------

    pub fn select<P>(&self, mut pred: P) -> RewrapResult<H>
    where
        P: FnMut(&H::Item) -> bool,
    {
        self.single(OpName::Select, |items| items.filter(|x| pred(x)).collect())
    }

    pub fn filter<P>(&self, mut pred: P) -> RewrapResult<H>
    where
        P: FnMut(&H::Item) -> bool,
    {
        self.single(OpName::Filter, |items| items.filter(|x| pred(x)).collect())
    }

    pub fn reject<P>(&self, mut pred: P) -> RewrapResult<H>
    where
        P: FnMut(&H::Item) -> bool,
    {
        self.single(OpName::Reject, |items| items.filter(|x| !pred(x)).collect())
    }

    pub fn sort(&self) -> RewrapResult<H>
    where
        H::Item: Ord,
    {
        self.single(OpName::Sort, |items| {
            let mut sorted: Vec<H::Item> = items.collect();
            sorted.sort();
            sorted
        })
    }

    /// Sort by a key computed once per element.
    pub fn sort_by<K, F>(&self, key: F) -> RewrapResult<H>
    where
        K: Ord,
        F: FnMut(&H::Item) -> K,
    {
        self.single(OpName::SortBy, |items| {
            let mut sorted: Vec<H::Item> = items.collect();
            sorted.sort_by_cached_key(key);
            sorted
        })
    }

    pub fn take(&self) -> RewrapResult<H> {
        self.enter(OpName::Take)?;
        let n = self.required_count(OpName::Take)?;
        Reconstructor::for_host().build(self.elements()?.take(n).collect())
    }

    pub fn take_while<P>(&self, mut pred: P) -> RewrapResult<H>
    where
        P: FnMut(&H::Item) -> bool,
    {
        self.single(OpName::TakeWhile, |items| items.take_while(|x| pred(x)).collect())
    }

    pub fn drop(&self) -> RewrapResult<H> {
        self.enter(OpName::Drop)?;
        let n = self.required_count(OpName::Drop)?;
        Reconstructor::for_host().build(self.elements()?.skip(n).collect())
    }

    pub fn drop_while<P>(&self, mut pred: P) -> RewrapResult<H>
    where
        P: FnMut(&H::Item) -> bool,
    {
        self.single(OpName::DropWhile, |items| items.skip_while(|x| pred(x)).collect())
    }

    /// Keep the first occurrence of each element.
    pub fn uniq(&self) -> RewrapResult<H>
    where
        H::Item: Eq + Hash,
    {
        self.single(OpName::Uniq, |items| {
            let mut seen = HashSet::new();
            items.filter(|x| seen.insert(x.clone())).collect()
        })
    }

    /// Keep the first element for each distinct key.
    pub fn uniq_by<K, F>(&self, mut key: F) -> RewrapResult<H>
    where
        K: Eq + Hash,
        F: FnMut(&H::Item) -> K,
    {
        self.single(OpName::UniqBy, |items| {
            let mut seen = HashSet::new();
            items.filter(|x| seen.insert(key(x))).collect()
        })
    }

    pub fn grep<P>(&self, pattern: P) -> RewrapResult<H>
    where
        P: Pattern<H::Item>,
    {
        self.single(OpName::Grep, |items| items.filter(|x| pattern.matches(x)).collect())
    }

    pub fn grep_v<P>(&self, pattern: P) -> RewrapResult<H>
    where
        P: Pattern<H::Item>,
    {
        self.single(OpName::GrepV, |items| items.filter(|x| !pattern.matches(x)).collect())
    }

    // ---------------------------------------------------------------
    // Scalar, or Single with a count
    // ---------------------------------------------------------------

    pub fn first(&self) -> RewrapResult<Outcome<H, H::Item>> {
        match self.count(OpName::First)? {
            None => self.first_one().map(Outcome::Scalar),
            Some(n) => self.first_many(n).map(Outcome::Host),
        }
    }

    pub(crate) fn first_one(&self) -> RewrapResult<Option<H::Item>> {
        self.enter(OpName::First)?;
        Ok(self.elements()?.next())
    }

    pub(crate) fn first_many(&self, n: usize) -> RewrapResult<H> {
        self.single(OpName::First, |items| items.take(n).collect())
    }

    pub fn min(&self) -> RewrapResult<Outcome<H, H::Item>>
    where
        H::Item: Ord,
    {
        match self.count(OpName::Min)? {
            None => self.min_one().map(Outcome::Scalar),
            Some(n) => self.min_many(n).map(Outcome::Host),
        }
    }

    pub(crate) fn min_one(&self) -> RewrapResult<Option<H::Item>>
    where
        H::Item: Ord,
    {
        self.enter(OpName::Min)?;
        Ok(self.elements()?.reduce(|best, x| if x < best { x } else { best }))
    }

    pub(crate) fn min_many(&self, n: usize) -> RewrapResult<H>
    where
        H::Item: Ord,
    {
        self.single(OpName::Min, |items| {
            let mut sorted: Vec<H::Item> = items.collect();
            sorted.sort();
            sorted.truncate(n);
            sorted
        })
    }

    pub fn max(&self) -> RewrapResult<Outcome<H, H::Item>>
    where
        H::Item: Ord,
    {
        match self.count(OpName::Max)? {
            None => self.max_one().map(Outcome::Scalar),
            Some(n) => self.max_many(n).map(Outcome::Host),
        }
    }

    pub(crate) fn max_one(&self) -> RewrapResult<Option<H::Item>>
    where
        H::Item: Ord,
    {
        self.enter(OpName::Max)?;
        Ok(self.elements()?.reduce(|best, x| if x > best { x } else { best }))
    }

    /// The `n` largest elements, largest first; equal elements keep their
    /// encounter order.
    pub(crate) fn max_many(&self, n: usize) -> RewrapResult<H>
    where
        H::Item: Ord,
    {
        self.single(OpName::Max, |items| {
            let mut sorted: Vec<H::Item> = items.collect();
            sorted.sort_by(|a, b| b.cmp(a));
            sorted.truncate(n);
            sorted
        })
    }

    pub fn min_by<K, F>(&self, key: F) -> RewrapResult<Outcome<H, H::Item>>
    where
        K: Ord,
        F: FnMut(&H::Item) -> K,
    {
        match self.count(OpName::MinBy)? {
            None => self.min_by_one(key).map(Outcome::Scalar),
            Some(n) => self.min_by_many(n, key).map(Outcome::Host),
        }
    }

    pub(crate) fn min_by_one<K, F>(&self, mut key: F) -> RewrapResult<Option<H::Item>>
    where
        K: Ord,
        F: FnMut(&H::Item) -> K,
    {
        self.enter(OpName::MinBy)?;
        Ok(extreme(self.elements()?, &mut key, |candidate, best| candidate < best))
    }

    pub(crate) fn min_by_many<K, F>(&self, n: usize, key: F) -> RewrapResult<H>
    where
        K: Ord,
        F: FnMut(&H::Item) -> K,
    {
        self.single(OpName::MinBy, |items| {
            let mut sorted: Vec<H::Item> = items.collect();
            sorted.sort_by_cached_key(key);
            sorted.truncate(n);
            sorted
        })
    }

    pub fn max_by<K, F>(&self, key: F) -> RewrapResult<Outcome<H, H::Item>>
    where
        K: Ord,
        F: FnMut(&H::Item) -> K,
    {
        match self.count(OpName::MaxBy)? {
            None => self.max_by_one(key).map(Outcome::Scalar),
            Some(n) => self.max_by_many(n, key).map(Outcome::Host),
        }
    }

    pub(crate) fn max_by_one<K, F>(&self, mut key: F) -> RewrapResult<Option<H::Item>>
    where
        K: Ord,
        F: FnMut(&H::Item) -> K,
    {
        self.enter(OpName::MaxBy)?;
        Ok(extreme(self.elements()?, &mut key, |candidate, best| candidate > best))
    }

    pub(crate) fn max_by_many<K, F>(&self, n: usize, mut key: F) -> RewrapResult<H>
    where
        K: Ord,
        F: FnMut(&H::Item) -> K,
    {
        self.single(OpName::MaxBy, |items| {
            let mut sorted: Vec<H::Item> = items.collect();
            sorted.sort_by_cached_key(|x| Reverse(key(x)));
            sorted.truncate(n);
            sorted
        })
    }

    // ---------------------------------------------------------------
    // MultiSplit and Keyed
    // ---------------------------------------------------------------

    /// Elements satisfying `pred`, then the rest.
    pub fn partition<P>(&self, mut pred: P) -> RewrapResult<(H, H)>
    where
        P: FnMut(&H::Item) -> bool,
    {
        self.enter(OpName::Partition)?;
        let (matched, rest): (Vec<H::Item>, Vec<H::Item>) = self.elements()?.partition(|x| pred(x));
        let engine = Reconstructor::for_host();
        Ok((engine.build(matched)?, engine.build(rest)?))
    }

    /// Group elements by key; keys keep first-occurrence order.
    pub fn group_by<K, F>(&self, mut key: F) -> RewrapResult<IndexMap<K, H>>
    where
        K: Eq + Hash,
        F: FnMut(&H::Item) -> K,
    {
        self.enter(OpName::GroupBy)?;
        let mut groups: IndexMap<K, Vec<H::Item>> = IndexMap::new();
        for element in self.elements()? {
            groups.entry(key(&element)).or_default().push(element);
        }

        let engine = Reconstructor::for_host();
        groups
            .into_iter()
            .map(|(k, members)| engine.build(members).map(|host| (k, host)))
            .collect()
    }

    /// Runs of consecutive elements sharing a key.
    pub fn chunk<K, F>(&self, mut key: F) -> RewrapResult<Vec<(K, H)>>
    where
        K: PartialEq,
        F: FnMut(&H::Item) -> K,
    {
        self.enter(OpName::Chunk)?;
        let mut runs: Vec<(K, Vec<H::Item>)> = Vec::new();
        for element in self.elements()? {
            let k = key(&element);
            match runs.last_mut() {
                Some((current, members)) if *current == k => members.push(element),
                _ => runs.push((k, vec![element])),
            }
        }

        let engine = Reconstructor::for_host();
        runs.into_iter()
            .map(|(k, members)| engine.build(members).map(|host| (k, host)))
            .collect()
    }

    // ---------------------------------------------------------------
    // LazyChunks
    // ---------------------------------------------------------------

    pub fn chunk_while<P>(&self, pred: P) -> RewrapResult<LazyChunks<'a, H>>
    where
        P: Fn(&H::Item, &H::Item) -> bool + 'a,
    {
        self.enter(OpName::ChunkWhile)?;
        Ok(self.chunks(OpName::ChunkWhile, Boundary::While(Box::new(pred))))
    }

    pub fn slice_when<P>(&self, pred: P) -> RewrapResult<LazyChunks<'a, H>>
    where
        P: Fn(&H::Item, &H::Item) -> bool + 'a,
    {
        self.enter(OpName::SliceWhen)?;
        Ok(self.chunks(OpName::SliceWhen, Boundary::When(Box::new(pred))))
    }

    pub fn slice_before<P>(&self, pred: P) -> RewrapResult<LazyChunks<'a, H>>
    where
        P: Fn(&H::Item) -> bool + 'a,
    {
        self.enter(OpName::SliceBefore)?;
        Ok(self.chunks(OpName::SliceBefore, Boundary::Before(Box::new(pred))))
    }

    pub fn slice_after<P>(&self, pred: P) -> RewrapResult<LazyChunks<'a, H>>
    where
        P: Fn(&H::Item) -> bool + 'a,
    {
        self.enter(OpName::SliceAfter)?;
        Ok(self.chunks(OpName::SliceAfter, Boundary::After(Box::new(pred))))
    }

    /// Hand each consecutive slice of `n` elements to `action`.
    pub fn each_slice<F>(&self, action: F) -> RewrapResult<()>
    where
        F: FnMut(H),
    {
        deliver(&self.slices()?, action)
    }

    /// Hand each window of `n` consecutive elements to `action`.
    pub fn each_cons<F>(&self, action: F) -> RewrapResult<()>
    where
        F: FnMut(H),
    {
        deliver(&self.windows()?, action)
    }

    fn slices(&self) -> RewrapResult<LazyChunks<'a, H>> {
        self.enter(OpName::EachSlice)?;
        let size = self.chunk_size(OpName::EachSlice)?;
        Ok(self.chunks(OpName::EachSlice, Boundary::Slice(size)))
    }

    fn windows(&self) -> RewrapResult<LazyChunks<'a, H>> {
        self.enter(OpName::EachCons)?;
        let size = self.chunk_size(OpName::EachCons)?;
        Ok(self.chunks(OpName::EachCons, Boundary::Cons(size)))
    }

    // ---------------------------------------------------------------
    // MappingFamily
    // ---------------------------------------------------------------

    pub fn map<U, F>(&self, f: F) -> RewrapResult<Mapped<H, U>>
    where
        U: 'static,
        F: FnMut(H::Item) -> U,
    {
        self.mapping(OpName::Map, |items| items.map(f).collect())
    }

    pub fn collect<U, F>(&self, f: F) -> RewrapResult<Mapped<H, U>>
    where
        U: 'static,
        F: FnMut(H::Item) -> U,
    {
        self.mapping(OpName::Collect, |items| items.map(f).collect())
    }

    pub fn flat_map<U, I, F>(&self, f: F) -> RewrapResult<Mapped<H, U>>
    where
        U: 'static,
        I: IntoIterator<Item = U>,
        F: FnMut(H::Item) -> I,
    {
        self.mapping(OpName::FlatMap, |items| items.flat_map(f).collect())
    }

    pub fn collect_concat<U, I, F>(&self, f: F) -> RewrapResult<Mapped<H, U>>
    where
        U: 'static,
        I: IntoIterator<Item = U>,
        F: FnMut(H::Item) -> I,
    {
        self.mapping(OpName::CollectConcat, |items| items.flat_map(f).collect())
    }

    fn mapping<U: 'static>(
        &self,
        op: OpName,
        produce: impl FnOnce(Elements<'a, H::Item>) -> Vec<U>,
    ) -> RewrapResult<Mapped<H, U>> {
        self.enter(op)?;
        let produced = produce(self.elements()?);

        let config = H::configuration();
        let rewraps = op.map_op().is_some_and(|map_op: MapOp| config.rewraps(map_op));
        if !rewraps {
            return Ok(Mapped::Raw(produced));
        }
        if let Some(gate) = config.gate() {
            if !produced.iter().all(|value| gate.allows(value as &dyn Any)) {
                debug!(host = type_name::<H>(), op = %op, "mapping gate refused; returning raw sequence");
                return Ok(Mapped::Raw(produced));
            }
        }

        let mut slot = Some(produced);
        if let Some(items) = (&mut slot as &mut dyn Any).downcast_mut::<Option<Vec<H::Item>>>() {
            if let Some(items) = items.take() {
                return Reconstructor::for_host().build(items).map(Mapped::Host);
            }
        }
        debug!(
            host = type_name::<H>(),
            op = %op,
            produced = type_name::<U>(),
            "mapped elements are not host elements; returning raw sequence"
        );
        Ok(Mapped::Raw(slot.unwrap_or_default()))
    }

    // ---------------------------------------------------------------
    // Lazy form
    // ---------------------------------------------------------------

    /// The operation without its action: a restartable handle bound to the
    /// operation and its arguments. Nothing is executed until it is iterated.
    pub fn lazy(&self, op: OpName) -> RewrapResult<Lazy<'a, H>> {
        match op {
            OpName::EachSlice => return self.slices().map(Lazy::Chunks),
            OpName::EachCons => return self.windows().map(Lazy::Chunks),
            _ => {}
        }

        let descriptor = self.enter(op)?;
        if !descriptor.requires_action {
            return Err(RewrapError::NotLazy { op: op.as_str() });
        }
        Ok(Lazy::Elements(Descriptor::new(
            self.host,
            op,
            self.traversal.clone(),
            self.operation.clone(),
        )))
    }
}

impl<H: Traverse> fmt::Debug for Call<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call")
            .field("host", &type_name::<H>())
            .field("traversal", &self.traversal)
            .field("operation", &self.operation)
            .field("arity", &self.arity)
            .finish()
    }
}

/// The first element whose key beats every earlier one.
fn extreme<T, K>(
    items: impl Iterator<Item = T>,
    key: &mut impl FnMut(&T) -> K,
    beats: impl Fn(&K, &K) -> bool,
) -> Option<T> {
    let mut best: Option<(K, T)> = None;
    for item in items {
        let k = key(&item);
        let replace = match &best {
            Some((best_key, _)) => beats(&k, best_key),
            None => true,
        };
        if replace {
            best = Some((k, item));
        }
    }
    best.map(|(_, item)| item)
}

fn deliver<H: Traverse>(chunks: &LazyChunks<'_, H>, mut action: impl FnMut(H)) -> RewrapResult<()> {
    for host in chunks.iter()? {
        action(host?);
    }
    Ok(())
}
