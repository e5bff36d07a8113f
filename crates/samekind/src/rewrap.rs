//! The catalog as methods on every host.

use std::hash::Hash;

use indexmap::IndexMap;

use samekind_core::{Arg, Elements, RewrapResult, Traverse};

use crate::catalog::OpName;
use crate::dispatch::Call;
use crate::lazy::{Lazy, LazyChunks};
use crate::output::Mapped;
use crate::pattern::Pattern;

/// Catalog operations for any [`Traverse`] host.
///
/// Methods here traverse with no arguments and take counts as typed
/// parameters. For a parameterized traversal use [`Rewrap::call`], which
/// splits one combined argument list by the host's arity.
pub trait Rewrap: Traverse {
    /// Bind a combined argument list (traversal arguments first).
    fn call(&self, args: &[Arg]) -> Call<'_, Self> {
        Call::new(self, args)
    }

    /// The raw traversal, for anything outside the catalog.
    fn elements(&self) -> RewrapResult<Elements<'_, Self::Item>> {
        self.traverse(&[])
    }

    fn to_vec(&self) -> RewrapResult<Vec<Self::Item>> {
        Ok(self.elements()?.collect())
    }

    fn select<P>(&self, pred: P) -> RewrapResult<Self>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        Call::plain(self).select(pred)
    }

    fn filter<P>(&self, pred: P) -> RewrapResult<Self>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        Call::plain(self).filter(pred)
    }

    fn reject<P>(&self, pred: P) -> RewrapResult<Self>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        Call::plain(self).reject(pred)
    }

    fn sort(&self) -> RewrapResult<Self>
    where
        Self::Item: Ord,
    {
        Call::plain(self).sort()
    }

    fn sort_by<K, F>(&self, key: F) -> RewrapResult<Self>
    where
        K: Ord,
        F: FnMut(&Self::Item) -> K,
    {
        Call::plain(self).sort_by(key)
    }

    fn take(&self, n: usize) -> RewrapResult<Self> {
        Call::counted(self, n).take()
    }

    fn take_while<P>(&self, pred: P) -> RewrapResult<Self>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        Call::plain(self).take_while(pred)
    }

    fn drop(&self, n: usize) -> RewrapResult<Self> {
        Call::counted(self, n).drop()
    }

    fn drop_while<P>(&self, pred: P) -> RewrapResult<Self>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        Call::plain(self).drop_while(pred)
    }

    fn uniq(&self) -> RewrapResult<Self>
    where
        Self::Item: Eq + Hash,
    {
        Call::plain(self).uniq()
    }

    fn uniq_by<K, F>(&self, key: F) -> RewrapResult<Self>
    where
        K: Eq + Hash,
        F: FnMut(&Self::Item) -> K,
    {
        Call::plain(self).uniq_by(key)
    }

    fn grep<P>(&self, pattern: P) -> RewrapResult<Self>
    where
        P: Pattern<Self::Item>,
    {
        Call::plain(self).grep(pattern)
    }

    fn grep_v<P>(&self, pattern: P) -> RewrapResult<Self>
    where
        P: Pattern<Self::Item>,
    {
        Call::plain(self).grep_v(pattern)
    }

    /// The first element, or `None` when empty.
    fn first(&self) -> RewrapResult<Option<Self::Item>> {
        Call::plain(self).first_one()
    }

    /// The first `n` elements as a new host; `n == 0` gives an empty host.
    fn first_n(&self, n: usize) -> RewrapResult<Self> {
        Call::plain(self).first_many(n)
    }

    fn min(&self) -> RewrapResult<Option<Self::Item>>
    where
        Self::Item: Ord,
    {
        Call::plain(self).min_one()
    }

    /// The `n` smallest elements, smallest first.
    fn min_n(&self, n: usize) -> RewrapResult<Self>
    where
        Self::Item: Ord,
    {
        Call::plain(self).min_many(n)
    }

    fn max(&self) -> RewrapResult<Option<Self::Item>>
    where
        Self::Item: Ord,
    {
        Call::plain(self).max_one()
    }

    /// The `n` largest elements, largest first.
    fn max_n(&self, n: usize) -> RewrapResult<Self>
    where
        Self::Item: Ord,
    {
        Call::plain(self).max_many(n)
    }

    fn min_by<K, F>(&self, key: F) -> RewrapResult<Option<Self::Item>>
    where
        K: Ord,
        F: FnMut(&Self::Item) -> K,
    {
        Call::plain(self).min_by_one(key)
    }

    fn min_by_n<K, F>(&self, n: usize, key: F) -> RewrapResult<Self>
    where
        K: Ord,
        F: FnMut(&Self::Item) -> K,
    {
        Call::plain(self).min_by_many(n, key)
    }

    fn max_by<K, F>(&self, key: F) -> RewrapResult<Option<Self::Item>>
    where
        K: Ord,
        F: FnMut(&Self::Item) -> K,
    {
        Call::plain(self).max_by_one(key)
    }

    fn max_by_n<K, F>(&self, n: usize, key: F) -> RewrapResult<Self>
    where
        K: Ord,
        F: FnMut(&Self::Item) -> K,
    {
        Call::plain(self).max_by_many(n, key)
    }

    fn partition<P>(&self, pred: P) -> RewrapResult<(Self, Self)>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        Call::plain(self).partition(pred)
    }

    fn group_by<K, F>(&self, key: F) -> RewrapResult<IndexMap<K, Self>>
    where
        K: Eq + Hash,
        F: FnMut(&Self::Item) -> K,
    {
        Call::plain(self).group_by(key)
    }

    fn chunk<K, F>(&self, key: F) -> RewrapResult<Vec<(K, Self)>>
    where
        K: PartialEq,
        F: FnMut(&Self::Item) -> K,
    {
        Call::plain(self).chunk(key)
    }

    fn chunk_while<'a, P>(&'a self, pred: P) -> RewrapResult<LazyChunks<'a, Self>>
    where
        P: Fn(&Self::Item, &Self::Item) -> bool + 'a,
    {
        Call::plain(self).chunk_while(pred)
    }

    fn slice_when<'a, P>(&'a self, pred: P) -> RewrapResult<LazyChunks<'a, Self>>
    where
        P: Fn(&Self::Item, &Self::Item) -> bool + 'a,
    {
        Call::plain(self).slice_when(pred)
    }

    fn slice_before<'a, P>(&'a self, pred: P) -> RewrapResult<LazyChunks<'a, Self>>
    where
        P: Fn(&Self::Item) -> bool + 'a,
    {
        Call::plain(self).slice_before(pred)
    }

    fn slice_after<'a, P>(&'a self, pred: P) -> RewrapResult<LazyChunks<'a, Self>>
    where
        P: Fn(&Self::Item) -> bool + 'a,
    {
        Call::plain(self).slice_after(pred)
    }

    fn each_slice<F>(&self, n: usize, action: F) -> RewrapResult<()>
    where
        F: FnMut(Self),
    {
        Call::counted(self, n).each_slice(action)
    }

    fn each_cons<F>(&self, n: usize, action: F) -> RewrapResult<()>
    where
        F: FnMut(Self),
    {
        Call::counted(self, n).each_cons(action)
    }

    fn map<U, F>(&self, f: F) -> RewrapResult<Mapped<Self, U>>
    where
        U: 'static,
        F: FnMut(Self::Item) -> U,
    {
        Call::plain(self).map(f)
    }

    fn collect<U, F>(&self, f: F) -> RewrapResult<Mapped<Self, U>>
    where
        U: 'static,
        F: FnMut(Self::Item) -> U,
    {
        Call::plain(self).collect(f)
    }

    fn flat_map<U, I, F>(&self, f: F) -> RewrapResult<Mapped<Self, U>>
    where
        U: 'static,
        I: IntoIterator<Item = U>,
        F: FnMut(Self::Item) -> I,
    {
        Call::plain(self).flat_map(f)
    }

    fn collect_concat<U, I, F>(&self, f: F) -> RewrapResult<Mapped<Self, U>>
    where
        U: 'static,
        I: IntoIterator<Item = U>,
        F: FnMut(Self::Item) -> I,
    {
        Call::plain(self).collect_concat(f)
    }

    /// `op` without its action; see [`Call::lazy`].
    fn lazy(&self, op: OpName) -> RewrapResult<Lazy<'_, Self>> {
        Call::plain(self).lazy(op)
    }
}

impl<H: Traverse> Rewrap for H {}
