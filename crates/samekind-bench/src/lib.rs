//! Fixtures shared by the samekind benchmarks.

use std::collections::BTreeSet;

use samekind::{Arg, Elements, RewrapResult, Traverse};
use tracing_subscriber::EnvFilter;

/// An ordered set of integers; traversal yields them in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedSet(pub BTreeSet<i64>);

impl OrderedSet {
    /// The set `1..=n`.
    pub fn up_to(n: i64) -> Self {
        Self((1..=n).collect())
    }
}

impl Traverse for OrderedSet {
    type Item = i64;

    fn traverse(&self, _args: &[Arg]) -> RewrapResult<Elements<'_, i64>> {
        Ok(Box::new(self.0.iter().copied()))
    }

    fn from_elements(elements: Vec<i64>) -> RewrapResult<Self> {
        Ok(Self(elements.into_iter().collect()))
    }
}

/// Install a fmt subscriber filtered by `RUST_LOG` (default `warn`).
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use samekind::Rewrap;

    #[test]
    fn reject_rebuilds_the_set() {
        let set = OrderedSet::up_to(10);
        let odd = set.reject(|x| x % 2 == 0).unwrap();
        assert_eq!(odd, OrderedSet([1, 3, 5, 7, 9].into_iter().collect()));
    }
}
