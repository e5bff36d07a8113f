//! Every catalog operation against a host backed by `[1, 2, 3, 4, 5]`.

use std::cell::Cell;

use proptest::prelude::*;
use samekind::{Arg, Elements, Outcome, Rewrap, RewrapError, RewrapResult, Traverse};

#[derive(Debug, Clone, PartialEq)]
struct Collection(Vec<i64>);

impl Traverse for Collection {
    type Item = i64;

    fn traverse(&self, _args: &[Arg]) -> RewrapResult<Elements<'_, i64>> {
        Ok(Box::new(self.0.iter().copied()))
    }

    fn from_elements(elements: Vec<i64>) -> RewrapResult<Self> {
        Ok(Collection(elements))
    }
}

fn collection() -> Collection {
    Collection(vec![1, 2, 3, 4, 5])
}

fn odd(x: &i64) -> bool {
    x % 2 != 0
}

fn even(x: &i64) -> bool {
    x % 2 == 0
}

fn contents(hosts: Vec<Collection>) -> Vec<Vec<i64>> {
    hosts.into_iter().map(|c| c.0).collect()
}

// ---------------------------------------------------------------------------
// Single
// ---------------------------------------------------------------------------

#[test]
fn select_and_reject() {
    assert_eq!(collection().select(odd).unwrap(), Collection(vec![1, 3, 5]));
    assert_eq!(collection().filter(odd).unwrap(), Collection(vec![1, 3, 5]));
    assert_eq!(collection().reject(odd).unwrap(), Collection(vec![2, 4]));
}

#[test]
fn sorting() {
    let shuffled = Collection(vec![3, 1, 5, 2, 4]);
    assert_eq!(shuffled.sort().unwrap(), collection());
    assert_eq!(
        collection().sort_by(|x| -x).unwrap(),
        Collection(vec![5, 4, 3, 2, 1])
    );
}

#[test]
fn sort_by_is_stable() {
    let mixed = Collection(vec![4, 1, 2, 3]);
    assert_eq!(
        mixed.sort_by(|x| x % 2).unwrap(),
        Collection(vec![4, 2, 1, 3])
    );
}

#[test]
fn take_and_drop() {
    assert_eq!(collection().take(2).unwrap(), Collection(vec![1, 2]));
    assert_eq!(collection().drop(4).unwrap(), Collection(vec![5]));
    assert_eq!(collection().take(0).unwrap(), Collection(vec![]));
    assert_eq!(collection().drop(10).unwrap(), Collection(vec![]));
    assert_eq!(collection().take_while(odd).unwrap(), Collection(vec![1]));
    assert_eq!(
        collection().drop_while(odd).unwrap(),
        Collection(vec![2, 3, 4, 5])
    );
}

#[test]
fn uniq_keeps_first_occurrence() {
    let repeated = Collection(vec![1, 2, 1, 3, 2]);
    assert_eq!(repeated.uniq().unwrap(), Collection(vec![1, 2, 3]));
    assert_eq!(collection().uniq_by(|x| x % 2).unwrap(), Collection(vec![1, 2]));
}

#[test]
fn grep_with_closures_and_ranges() {
    assert_eq!(collection().grep(odd).unwrap(), Collection(vec![1, 3, 5]));
    assert_eq!(collection().grep_v(odd).unwrap(), Collection(vec![2, 4]));
    assert_eq!(collection().grep(2..=3).unwrap(), Collection(vec![2, 3]));
    assert_eq!(collection().grep_v(2..).unwrap(), Collection(vec![1]));
}

// ---------------------------------------------------------------------------
// Scalar and counted
// ---------------------------------------------------------------------------

#[test]
fn first_with_and_without_count() {
    assert_eq!(collection().first().unwrap(), Some(1));
    assert_eq!(collection().first_n(2).unwrap(), Collection(vec![1, 2]));
    assert_eq!(collection().first_n(0).unwrap(), Collection(vec![]));
}

#[test]
fn min_and_max() {
    assert_eq!(collection().min().unwrap(), Some(1));
    assert_eq!(collection().max().unwrap(), Some(5));
    assert_eq!(collection().min_n(3).unwrap(), Collection(vec![1, 2, 3]));
    assert_eq!(collection().max_n(3).unwrap(), Collection(vec![5, 4, 3]));
    assert_eq!(collection().max_n(0).unwrap(), Collection(vec![]));
    assert_eq!(collection().min_n(0).unwrap(), Collection(vec![]));
}

#[test]
fn min_by_and_max_by() {
    assert_eq!(collection().min_by(|x| -x).unwrap(), Some(5));
    assert_eq!(collection().max_by(|x| -x).unwrap(), Some(1));
    assert_eq!(collection().max_by_n(3, |x| -x).unwrap(), Collection(vec![1, 2, 3]));
    assert_eq!(collection().min_by_n(3, |x| -x).unwrap(), Collection(vec![5, 4, 3]));
}

#[test]
fn counted_extremes_break_ties_by_encounter_order() {
    let pairs = Collection(vec![10, 21, 30, 41]);
    // Keys by parity: 0, 1, 0, 1.
    assert_eq!(pairs.max_by_n(2, |x| x % 2).unwrap(), Collection(vec![21, 41]));
    assert_eq!(pairs.min_by_n(3, |x| x % 2).unwrap(), Collection(vec![10, 30, 21]));
    assert_eq!(pairs.max_by(|x| x % 2).unwrap(), Some(21));
    assert_eq!(pairs.min_by(|x| x % 2).unwrap(), Some(10));
}

#[test]
fn empty_host() {
    let empty = Collection(vec![]);
    assert_eq!(empty.first().unwrap(), None);
    assert_eq!(empty.min().unwrap(), None);
    assert_eq!(empty.max_by(|x| *x).unwrap(), None);
    assert_eq!(empty.select(odd).unwrap(), Collection(vec![]));
    assert_eq!(
        empty.partition(odd).unwrap(),
        (Collection(vec![]), Collection(vec![]))
    );
    assert!(empty.group_by(odd).unwrap().is_empty());
    assert_eq!(empty.first_n(2).unwrap(), Collection(vec![]));
}

#[test]
fn call_switches_policy_on_count() {
    let c = collection();
    assert_eq!(c.call(&[]).first().unwrap(), Outcome::Scalar(Some(1)));
    assert_eq!(
        c.call(&[Arg::from(2)]).first().unwrap(),
        Outcome::Host(Collection(vec![1, 2]))
    );
    assert_eq!(
        c.call(&[Arg::from(3)]).max().unwrap(),
        Outcome::Host(Collection(vec![5, 4, 3]))
    );
    assert_eq!(
        c.call(&[Arg::from(0)]).max().unwrap(),
        Outcome::Host(Collection(vec![]))
    );
    assert_eq!(
        c.call(&[Arg::from(3)]).min_by(|x| -x).unwrap(),
        Outcome::Host(Collection(vec![5, 4, 3]))
    );
}

#[test]
fn call_rejects_bad_operation_arguments() {
    let c = collection();
    assert_eq!(
        c.call(&[]).take().unwrap_err(),
        RewrapError::MissingArgument { op: "take" }
    );
    assert!(matches!(
        c.call(&[Arg::from(-1)]).take().unwrap_err(),
        RewrapError::InvalidArgument { op: "take", .. }
    ));
    assert!(matches!(
        c.call(&[Arg::from("two")]).first().unwrap_err(),
        RewrapError::InvalidArgument { op: "first", .. }
    ));
    assert!(matches!(
        c.call(&[Arg::from(1)]).select(odd).unwrap_err(),
        RewrapError::InvalidArgument { op: "select", .. }
    ));
    assert!(matches!(
        c.call(&[Arg::from(1), Arg::from(2)]).drop().unwrap_err(),
        RewrapError::InvalidArgument { op: "drop", .. }
    ));
}

// ---------------------------------------------------------------------------
// MultiSplit and Keyed
// ---------------------------------------------------------------------------

#[test]
fn partition_returns_two_hosts() {
    let (odds, evens) = collection().partition(odd).unwrap();
    assert_eq!(odds, Collection(vec![1, 3, 5]));
    assert_eq!(evens, Collection(vec![2, 4]));
}

#[test]
fn group_by_preserves_key_order() {
    let groups = collection().group_by(odd).unwrap();
    assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![true, false]);
    assert_eq!(groups[&true], Collection(vec![1, 3, 5]));
    assert_eq!(groups[&false], Collection(vec![2, 4]));
}

#[test]
fn chunk_collects_consecutive_runs() {
    let runs = collection().chunk(odd).unwrap();
    let keys: Vec<bool> = runs.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![true, false, true, false, true]);
    let values: Vec<Vec<i64>> = runs.into_iter().map(|(_, c)| c.0).collect();
    assert_eq!(values, vec![vec![1], vec![2], vec![3], vec![4], vec![5]]);

    let merged = Collection(vec![1, 3, 2, 4, 5]).chunk(odd).unwrap();
    assert_eq!(merged.len(), 3);
    assert_eq!(merged[0].1, Collection(vec![1, 3]));
}

// ---------------------------------------------------------------------------
// LazyChunks
// ---------------------------------------------------------------------------

fn is_prime(n: i64) -> bool {
    n > 1 && (2..n).take_while(|d| d * d <= n).all(|d| n % d != 0)
}

#[test]
fn chunk_while_and_slice_when() {
    let c = collection();
    let primes = c.chunk_while(|a, b| is_prime(a + b)).unwrap();
    assert_eq!(contents(primes.to_vec().unwrap()), vec![vec![1, 2, 3, 4], vec![5]]);

    let thirds = c.slice_when(|a, b| (a + b) % 3 == 0).unwrap();
    assert_eq!(
        contents(thirds.to_vec().unwrap()),
        vec![vec![1], vec![2, 3, 4], vec![5]]
    );
}

#[test]
fn slice_before_and_after() {
    let c = collection();
    assert_eq!(
        contents(c.slice_before(even).unwrap().to_vec().unwrap()),
        vec![vec![1], vec![2, 3], vec![4, 5]]
    );
    assert_eq!(
        contents(c.slice_after(even).unwrap().to_vec().unwrap()),
        vec![vec![1, 2], vec![3, 4], vec![5]]
    );
}

#[test]
fn lazy_chunks_restart_and_wrap_each_chunk() {
    let c = collection();
    let chunks = c.slice_before(even).unwrap();

    let mut pass = chunks.iter().unwrap();
    assert_eq!(pass.next().unwrap().unwrap(), Collection(vec![1]));

    let first: Vec<Collection> = chunks.iter().unwrap().collect::<RewrapResult<_>>().unwrap();
    let second: Vec<Collection> = chunks.iter().unwrap().collect::<RewrapResult<_>>().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

/// Traverses the unbounded sequence `1, 2, 3, ...`, counting every element
/// it hands out. Instances built from chunks keep their elements in `kept`.
#[derive(Debug, Default)]
struct Naturals {
    pulled: Cell<usize>,
    kept: Vec<i64>,
}

impl Traverse for Naturals {
    type Item = i64;

    fn traverse(&self, _args: &[Arg]) -> RewrapResult<Elements<'_, i64>> {
        Ok(Box::new((1..).inspect(move |_| self.pulled.set(self.pulled.get() + 1))))
    }

    fn from_elements(elements: Vec<i64>) -> RewrapResult<Self> {
        Ok(Naturals {
            pulled: Cell::new(0),
            kept: elements,
        })
    }
}

#[test]
fn lazy_chunks_read_at_most_one_element_ahead() {
    let naturals = Naturals::default();

    let by_three = naturals.slice_before(|x| x % 3 == 0).unwrap();
    let mut pass = by_three.iter().unwrap();
    let mut consumed = 0;
    for expected in [vec![1, 2], vec![3, 4, 5], vec![6, 7, 8]] {
        let chunk = pass.next().unwrap().unwrap();
        consumed += chunk.kept.len();
        assert_eq!(chunk.kept, expected);
        assert!(naturals.pulled.get() <= consumed + 1);
    }

    naturals.pulled.set(0);
    let runs = naturals.slice_when(|a, b| b % 4 == 0 && a < b).unwrap();
    let first = runs.iter().unwrap().next().unwrap().unwrap();
    assert_eq!(first.kept, vec![1, 2, 3]);
    assert!(naturals.pulled.get() <= first.kept.len() + 1);

    naturals.pulled.set(0);
    let mut windows = Vec::new();
    let lazy = naturals.call(&[Arg::from(3)]).lazy(samekind::OpName::EachCons).unwrap();
    for window in lazy.into_chunks().unwrap().iter().unwrap().take(2) {
        windows.push(window.unwrap().kept);
    }
    assert_eq!(windows, vec![vec![1, 2, 3], vec![2, 3, 4]]);
    assert_eq!(naturals.pulled.get(), 4);
}

#[test]
fn each_slice_and_each_cons() {
    let c = collection();

    let mut slices = Vec::new();
    c.each_slice(2, |s| slices.push(s)).unwrap();
    assert_eq!(contents(slices), vec![vec![1, 2], vec![3, 4], vec![5]]);

    let mut windows = Vec::new();
    c.each_cons(2, |w| windows.push(w)).unwrap();
    assert_eq!(
        contents(windows),
        vec![vec![1, 2], vec![2, 3], vec![3, 4], vec![4, 5]]
    );
}

#[test]
fn each_slice_rejects_zero_size() {
    let err = collection().each_slice(0, |_| {}).unwrap_err();
    assert!(matches!(err, RewrapError::InvalidArgument { op: "each_slice", .. }));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn select_and_reject_split_the_host(values in proptest::collection::vec(-50i64..50, 0..40)) {
        let host = Collection(values.clone());
        let selected = host.select(odd).unwrap();
        let rejected = host.reject(odd).unwrap();
        let (p_odd, p_even) = host.partition(odd).unwrap();

        prop_assert_eq!(&selected, &p_odd);
        prop_assert_eq!(&rejected, &p_even);
        prop_assert_eq!(selected.0.len() + rejected.0.len(), values.len());
    }

    #[test]
    fn counted_max_is_a_sorted_prefix(values in proptest::collection::vec(-50i64..50, 0..40), n in 0usize..10) {
        let host = Collection(values.clone());
        let mut expected = values;
        expected.sort_by(|a, b| b.cmp(a));
        expected.truncate(n);
        prop_assert_eq!(host.max_n(n).unwrap(), Collection(expected));
    }
}
