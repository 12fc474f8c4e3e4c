//! Lets the merge algorithms read and write plain ascending values and encoded ranges alike.
//!
//! A plain value `v` is read as the range `v..v + 1`, a `(first, last)` pair as `first..last`.
//! When writing, a range is either enumerated into individual values (for a `Vec<T>`) or
//! appended with coalescing (for a [RangeSet]).
use crate::elem::Elem;
use crate::range_set::{self, RangeSet, RangeSetRef};
use smallvec::Array;
use std::iter::Copied;
use std::ops::Range;

/// An element of an input set: either a single value or a range.
pub trait RangeItem {
    /// The unsigned word type
    type Elem: Elem;

    /// First value of the range
    fn first(&self) -> Self::Elem;

    /// One past the last value of the range
    fn last(&self) -> Self::Elem;
}

macro_rules! impl_range_item {
    ($($t:ty),*) => {
        $(
            impl RangeItem for $t {
                type Elem = $t;

                #[inline]
                fn first(&self) -> $t {
                    *self
                }

                #[inline]
                fn last(&self) -> $t {
                    *self + 1
                }
            }
        )*
    };
}

impl_range_item!(u8, u16, u32, u64, u128, usize);

impl<T: Elem> RangeItem for (T, T) {
    type Elem = T;

    #[inline]
    fn first(&self) -> T {
        self.0
    }

    #[inline]
    fn last(&self) -> T {
        self.1
    }
}

impl<T: Elem> RangeItem for Range<T> {
    type Elem = T;

    #[inline]
    fn first(&self) -> T {
        self.start
    }

    #[inline]
    fn last(&self) -> T {
        self.end
    }
}

impl<'a, I: RangeItem + ?Sized> RangeItem for &'a I {
    type Elem = I::Elem;

    #[inline]
    fn first(&self) -> I::Elem {
        (**self).first()
    }

    #[inline]
    fn last(&self) -> I::Elem {
        (**self).last()
    }
}

/// First value of the range at an input position
#[inline]
pub fn first_at<I: RangeItem>(item: &I) -> I::Elem {
    item.first()
}

/// One past the last value of the range at an input position
#[inline]
pub fn last_at<I: RangeItem>(item: &I) -> I::Elem {
    item.last()
}

/// An output container that ranges can be appended to, in ascending order.
pub trait InsertBack {
    type Elem: Elem;

    /// Appends the range `first..last`. `first` must not be below anything already stored.
    fn insert_back(&mut self, range: (Self::Elem, Self::Elem));
}

impl<T: Elem> InsertBack for Vec<T> {
    type Elem = T;

    fn insert_back(&mut self, (first, last): (T, T)) {
        if first < last {
            self.reserve((last - first).to_count());
        }
        let mut value = first;
        while value < last {
            self.push(value);
            value = value + T::one();
        }
    }
}

impl<T: Elem, A: Array<Item = T>> InsertBack for RangeSet<T, A> {
    type Elem = T;

    fn insert_back(&mut self, (first, last): (T, T)) {
        self.push_range(first, last);
    }
}

/// Appends `range` to `output`, enumerating or coalescing depending on the container
#[inline]
pub fn insert_back<C: InsertBack + ?Sized>(output: &mut C, range: (C::Elem, C::Elem)) {
    output.insert_back(range)
}

/// A set that can be read by the merge algorithms.
///
/// The items must be ascending, non-overlapping ranges (or ascending values).
pub trait RangeInput {
    type Item: RangeItem;
    type Iter<'a>: Iterator<Item = Self::Item>
    where
        Self: 'a;

    /// Iterates over the ranges or values of the set
    fn range_items(&self) -> Self::Iter<'_>;
}

/// The word type of a [RangeInput]
pub type ElemOf<C> = <<C as RangeInput>::Item as RangeItem>::Elem;

impl<T: Elem + RangeItem<Elem = T>> RangeInput for [T] {
    type Item = T;
    type Iter<'a> = Copied<std::slice::Iter<'a, T>>
    where
        Self: 'a;

    fn range_items(&self) -> Self::Iter<'_> {
        self.iter().copied()
    }
}

impl<T: Elem + RangeItem<Elem = T>> RangeInput for Vec<T> {
    type Item = T;
    type Iter<'a> = Copied<std::slice::Iter<'a, T>>
    where
        Self: 'a;

    fn range_items(&self) -> Self::Iter<'_> {
        self.as_slice().iter().copied()
    }
}

impl<T: Elem> RangeInput for RangeSetRef<T> {
    type Item = (T, T);
    type Iter<'a> = range_set::Iter<'a, T>
    where
        Self: 'a;

    fn range_items(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl<T: Elem, A: Array<Item = T>> RangeInput for RangeSet<T, A> {
    type Item = (T, T);
    type Iter<'a> = range_set::Iter<'a, T>
    where
        Self: 'a;

    fn range_items(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl<'b, R: RangeInput + ?Sized> RangeInput for &'b R {
    type Item = R::Item;
    type Iter<'a> = R::Iter<'a>
    where
        Self: 'a;

    fn range_items(&self) -> Self::Iter<'_> {
        (**self).range_items()
    }
}
