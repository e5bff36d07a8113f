//! Patterns accepted by `grep` and `grep_v`.

use std::ops::{Range, RangeFrom, RangeInclusive, RangeTo};

/// Something an element can be matched against.
pub trait Pattern<T> {
    fn matches(&self, element: &T) -> bool;
}

impl<T, F> Pattern<T> for F
where
    F: Fn(&T) -> bool,
{
    fn matches(&self, element: &T) -> bool {
        self(element)
    }
}

impl<T: PartialOrd> Pattern<T> for Range<T> {
    fn matches(&self, element: &T) -> bool {
        self.contains(element)
    }
}

impl<T: PartialOrd> Pattern<T> for RangeInclusive<T> {
    fn matches(&self, element: &T) -> bool {
        self.contains(element)
    }
}

impl<T: PartialOrd> Pattern<T> for RangeFrom<T> {
    fn matches(&self, element: &T) -> bool {
        self.contains(element)
    }
}

impl<T: PartialOrd> Pattern<T> for RangeTo<T> {
    fn matches(&self, element: &T) -> bool {
        self.contains(element)
    }
}
