//! # About
//!
//! A compact set of unsigned integers, stored as non-overlapping half-open ranges
//!
//! ```
//! # use integral_ranges::RangeSet;
//! let mut a: RangeSet<u16> = RangeSet::new();
//! a.push_range(0, 7);
//! a.push_value(9);
//! a.push_range(10, 17);
//! // 9 and 10..17 touch, so they are coalesced on append
//! assert_eq!(a.iter().collect::<Vec<_>>(), vec![(0, 7), (9, 17)]);
//! assert_eq!(a.length(), 15);
//! ```
//!
//! The element type `T` must be an unsigned integer. Its most significant bit (the *tag bit*,
//! [Elem::MASK]) is reserved for the encoding and must never be set in a value.
//!
//! The set is stored as a flat `SmallVec<A>` of words. A word without the tag bit is a single
//! value `w`, i.e. the range `w..w + 1`. Two consecutive words with the tag bit set are the
//! range `a..b`. Ranges are appended in ascending order only, and a range that starts exactly
//! where the last one ends is merged into it. This makes the stored words a function of the
//! content alone, so two sets are equal exactly if their words are equal.
//!
//! The one exception to full coalescing is the top value `MASK - 1`. A tagged pair can not
//! express the end `MASK`, so the top value is always kept as a trailing singleton word.
//!
//! There is no random access. Iteration is forward only, either through the [Iter] iterator
//! or through a positional [Cursor].
//!
//! # Complexity
//!
//! |operation    | complexity |
//! |-------------|------------|
//! |push         | O(1) amortized |
//! |length       | O(N) first call, then O(1) until the words are replaced |
//! |iteration    | O(N)       |
//! |equality     | O(N)       |
//!
//! # Testing
//!
//! Testing is done by the concrete scenarios the encoding was designed for, as well as
//! quickcheck tests of canonicity and of the cached length.
use crate::elem::Elem;
use crate::error::EncodingError;
use once_cell::sync::OnceCell;
use ref_cast::RefCast;
use smallvec::{Array, SmallVec};
use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};
use std::iter::{FromIterator, FusedIterator};
use std::ops::Deref;

/// Decodes the range at `base`. Returns the range and the number of words it occupies.
#[inline]
fn decode<T: Elem>(words: &[T], base: usize) -> ((T, T), usize) {
    let w = words[base];
    if w.is_tagged() {
        ((w.untagged(), words[base + 1].untagged()), 2)
    } else {
        ((w, w + T::one()), 1)
    }
}

fn validate<T: Elem>(words: &[T]) -> Result<(), EncodingError> {
    let top = T::MASK - T::one();
    let mut prev: Option<T> = None;
    let mut index = 0;
    while index < words.len() {
        let w = words[index];
        let (first, last, n) = if w.is_tagged() {
            match words.get(index + 1) {
                Some(&v) if v.is_tagged() => (w.untagged(), v.untagged(), 2),
                _ => return Err(EncodingError::UnpairedTag { index }),
            }
        } else {
            (w, w + T::one(), 1)
        };
        if first >= last {
            return Err(EncodingError::EmptyRange { index });
        }
        if let Some(prev) = prev {
            if first < prev {
                return Err(EncodingError::Unordered { index });
            }
            // the top value may only be a trailing singleton, so it is allowed to touch
            if first == prev && !(n == 1 && first == top) {
                return Err(EncodingError::Touching { index });
            }
        }
        prev = Some(last);
        index += n;
    }
    Ok(())
}

/// A borrowed range set, a view over a slice of encoded words.
///
/// All read-only operations of [RangeSet] are implemented here, and a [RangeSet]
/// dereferences to a `RangeSetRef`.
#[derive(RefCast, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct RangeSetRef<T>([T]);

impl<T: Elem> RangeSetRef<T> {
    /// Creates a view over `words`, checking that they are a canonical encoding.
    pub fn new(words: &[T]) -> Result<&Self, EncodingError> {
        validate(words)?;
        Ok(Self::new_unchecked(words))
    }

    /// Creates a view over `words` without checking the encoding.
    ///
    /// Iterating a malformed encoding will give garbage or panic, but it will not cause UB.
    pub fn new_unchecked(words: &[T]) -> &Self {
        Self::ref_cast(words)
    }

    /// The encoded words
    pub fn words(&self) -> &[T] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// true if the words are a canonical encoding
    pub fn is_canonical(&self) -> bool {
        validate(&self.0).is_ok()
    }

    /// Total number of values in all ranges. This is not cached, see [RangeSet::length].
    pub fn length(&self) -> usize {
        self.iter().map(|(a, b)| (b - a).to_count()).sum()
    }

    /// Number of decoded ranges
    pub fn range_count(&self) -> usize {
        self.iter().count()
    }

    /// A cursor at the first range
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(&self.0, 0)
    }

    /// A cursor one past the last range
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::new(&self.0, self.0.len())
    }

    /// Iterates over the ranges as `(first, last)` pairs, `last` excluded
    pub fn iter(&self) -> Iter<'_, T> {
        Iter(self.begin())
    }

    /// Iterates over all individual values in ascending order
    pub fn values(&self) -> Values<'_, T> {
        Values {
            ranges: self.iter(),
            next: T::zero(),
            last: T::zero(),
        }
    }

    /// Expands all ranges into a vector of ascending values
    pub fn to_enumerated(&self) -> Vec<T> {
        let mut res = Vec::with_capacity(self.0.len());
        for (first, last) in self.iter() {
            res.reserve((last - first).to_count());
            res.extend(Values::single(first, last));
        }
        res
    }
}

impl<T: Elem> Debug for RangeSetRef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RangeSet{{")?;
        for (i, (a, b)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}..{:?}", a, b)?;
        }
        write!(f, "}}")
    }
}

impl<'a, T: Elem> IntoIterator for &'a RangeSetRef<T> {
    type Item = (T, T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A position in the words of a range set, together with the decoded range at that position.
///
/// This is the low level way to walk a set. Cursors of the same set compare by position.
/// Comparing cursors of different sets is meaningless.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a, T> {
    words: &'a [T],
    base: usize,
    current: (T, T),
}

impl<'a, T: Elem> Cursor<'a, T> {
    fn new(words: &'a [T], base: usize) -> Self {
        let mut res = Self {
            words,
            base,
            current: (T::zero(), T::zero()),
        };
        res.decode();
        res
    }

    fn decode(&mut self) {
        self.current = if self.is_end() {
            (T::zero(), T::zero())
        } else {
            decode(self.words, self.base).0
        };
    }

    /// true if the cursor is past the last range
    pub fn is_end(&self) -> bool {
        self.base >= self.words.len()
    }

    /// position in the word slice
    pub fn position(&self) -> usize {
        self.base
    }

    /// The range at the cursor.
    ///
    /// # Panics
    ///
    /// When called on an end cursor.
    pub fn get(&self) -> (T, T) {
        assert!(!self.is_end(), "dereferenced an end cursor");
        self.current
    }

    /// The range at the cursor, or None at the end
    pub fn try_get(&self) -> Option<(T, T)> {
        if self.is_end() {
            None
        } else {
            Some(self.current)
        }
    }

    /// Moves to the next range and returns the moved cursor.
    ///
    /// # Panics
    ///
    /// When called on an end cursor.
    pub fn advance(&mut self) -> &mut Self {
        assert!(!self.is_end(), "advanced an end cursor");
        self.base += if self.words[self.base].is_tagged() { 2 } else { 1 };
        self.decode();
        self
    }

    /// Moves to the next range and returns the cursor as it was before the move.
    ///
    /// # Panics
    ///
    /// When called on an end cursor.
    pub fn post_advance(&mut self) -> Self {
        let res = *self;
        self.advance();
        res
    }
}

impl<'a, T> PartialEq for Cursor<'a, T> {
    fn eq(&self, that: &Self) -> bool {
        debug_assert!(std::ptr::eq(self.words.as_ptr(), that.words.as_ptr()));
        self.base == that.base
    }
}

impl<'a, T> Eq for Cursor<'a, T> {}

impl<'a, T> PartialOrd for Cursor<'a, T> {
    fn partial_cmp(&self, that: &Self) -> Option<Ordering> {
        Some(self.cmp(that))
    }
}

impl<'a, T> Ord for Cursor<'a, T> {
    fn cmp(&self, that: &Self) -> Ordering {
        debug_assert!(std::ptr::eq(self.words.as_ptr(), that.words.as_ptr()));
        self.base.cmp(&that.base)
    }
}

/// Iterator over the ranges of a set
#[derive(Debug, Clone)]
pub struct Iter<'a, T>(Cursor<'a, T>);

impl<'a, T: Elem> Iter<'a, T> {
    /// The cursor at the next range to be returned
    pub fn cursor(&self) -> Cursor<'a, T> {
        self.0
    }
}

impl<'a, T: Elem> Iterator for Iter<'a, T> {
    type Item = (T, T);

    fn next(&mut self) -> Option<Self::Item> {
        let res = self.0.try_get()?;
        self.0.advance();
        Some(res)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.0.words.len().saturating_sub(self.0.base);
        ((rest + 1) / 2, Some(rest))
    }
}

impl<'a, T: Elem> FusedIterator for Iter<'a, T> {}

/// Iterator over the individual values of a set
#[derive(Debug, Clone)]
pub struct Values<'a, T> {
    ranges: Iter<'a, T>,
    next: T,
    last: T,
}

impl<'a, T: Elem> Values<'a, T> {
    fn single(first: T, last: T) -> Self {
        Self {
            ranges: Iter(Cursor::new(&[], 0)),
            next: first,
            last,
        }
    }
}

impl<'a, T: Elem> Iterator for Values<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.next == self.last {
            let (first, last) = self.ranges.next()?;
            self.next = first;
            self.last = last;
        }
        let res = self.next;
        self.next = res + T::one();
        Some(res)
    }
}

impl<'a, T: Elem> FusedIterator for Values<'a, T> {}

/// A set of unsigned integers, stored as tag-bit encoded ranges in a `SmallVec<A>`.
///
/// See the [module level docs](self) for the encoding.
pub struct RangeSet<T, A: Array<Item = T> = [T; 2]> {
    words: SmallVec<A>,
    /// cached total number of values, unset when not known
    length: OnceCell<usize>,
}

impl<T: Elem, A: Array<Item = T>> RangeSet<T, A> {
    /// note that this does not check the invariants!
    fn with_words(words: SmallVec<A>, length: OnceCell<usize>) -> Self {
        Self { words, length }
    }

    pub fn new() -> Self {
        Self::with_words(SmallVec::new(), OnceCell::with_value(0))
    }

    pub fn empty() -> Self {
        Self::new()
    }

    /// Adopts pre-encoded words without checking them.
    ///
    /// The caller guarantees that the words are a canonical encoding. Use
    /// [RangeSet::try_from_words] for untrusted input.
    pub fn from_words<I: IntoIterator<Item = T>>(words: I) -> Self {
        Self::from_smallvec(words.into_iter().collect())
    }

    /// Adopts pre-encoded words without copying or checking them.
    pub fn from_smallvec(words: SmallVec<A>) -> Self {
        Self::with_words(words, OnceCell::new())
    }

    /// Adopts pre-encoded words, checking that they are a canonical encoding.
    pub fn try_from_words<I: IntoIterator<Item = T>>(words: I) -> Result<Self, EncodingError> {
        let words: SmallVec<A> = words.into_iter().collect();
        validate(&words)?;
        Ok(Self::from_smallvec(words))
    }

    /// Builds a set from ascending values
    pub fn from_values<I: IntoIterator<Item = T>>(values: I) -> Self {
        let mut res = Self::new();
        for value in values {
            res.push_value(value);
        }
        res
    }

    /// Total number of values in all ranges.
    ///
    /// Computed on first use and then kept up to date by appends.
    pub fn length(&self) -> usize {
        *self.length.get_or_init(|| self.as_ref_set().length())
    }

    /// Reserves space for `ranges` more ranges.
    pub fn reserve(&mut self, ranges: usize) {
        assert!(ranges < (usize::MAX >> 1));
        self.words.reserve(2 * ranges);
    }

    /// Appends the range `first..last`.
    ///
    /// An empty range is ignored. A range that starts where the last stored range ends
    /// is merged into it.
    ///
    /// # Panics
    ///
    /// When `first` has the tag bit set, when `last > MASK` or `last < first`, or when
    /// a non-empty range starts before the end of the last stored range.
    pub fn push_range(&mut self, first: T, last: T) {
        assert!(first < T::MASK, "value {:?} has the tag bit set", first);
        assert!(last <= T::MASK, "range end {:?} is out of bounds", last);
        assert!(first <= last, "inverted range {:?}..{:?}", first, last);
        if first == last {
            return;
        }
        let top = T::MASK - T::one();
        if last == T::MASK && first < top {
            self.push_range(first, top);
            self.push_range(top, last);
            return;
        }
        if let Some(length) = self.length.get_mut() {
            *length += (last - first).to_count();
        }
        self.append(first, last);
    }

    /// Appends the single value `value`
    ///
    /// # Panics
    ///
    /// Same as [RangeSet::push_range] for `value..value + 1`.
    pub fn push_value(&mut self, value: T) {
        assert!(value < T::MASK, "value {:?} has the tag bit set", value);
        self.push_range(value, value + T::one());
    }

    fn append(&mut self, first: T, last: T) {
        let one = T::one();
        if let Some(&back) = self.words.last() {
            let tail_last = if back.is_tagged() {
                back.untagged()
            } else {
                back + one
            };
            assert!(
                first >= tail_last,
                "append of {:?}..{:?} before the end {:?}",
                first,
                last,
                tail_last
            );
            // a range ending at MASK can not be tagged, the top value stays separate
            if first == tail_last && last < T::MASK {
                let n = self.words.len();
                if back.is_tagged() {
                    self.words[n - 1] = last.tagged();
                } else {
                    self.words[n - 1] = back.tagged();
                    self.words.push(last.tagged());
                }
                return;
            }
        }
        if last - first == one {
            self.words.push(first);
        } else {
            self.words.push(first.tagged());
            self.words.push(last.tagged());
        }
    }

    /// The word storage
    pub fn into_inner(self) -> SmallVec<A> {
        self.words
    }

    fn as_ref_set(&self) -> &RangeSetRef<T> {
        RangeSetRef::new_unchecked(self.words.as_slice())
    }
}

impl<T: Elem, A: Array<Item = T>> Default for RangeSet<T, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Elem, A: Array<Item = T>> Clone for RangeSet<T, A> {
    fn clone(&self) -> Self {
        Self::with_words(self.words.clone(), self.length.clone())
    }
}

impl<T: Elem, A: Array<Item = T>> Deref for RangeSet<T, A> {
    type Target = RangeSetRef<T>;

    fn deref(&self) -> &Self::Target {
        self.as_ref_set()
    }
}

impl<T: Elem, A: Array<Item = T>> AsRef<[T]> for RangeSet<T, A> {
    fn as_ref(&self) -> &[T] {
        self.words.as_slice()
    }
}

impl<T: Elem, A: Array<Item = T>> PartialEq for RangeSet<T, A> {
    fn eq(&self, that: &Self) -> bool {
        self.words.as_slice() == that.words.as_slice()
    }
}

impl<T: Elem, A: Array<Item = T>> Eq for RangeSet<T, A> {}

impl<T: Elem, A: Array<Item = T>> Hash for RangeSet<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.words.as_slice().hash(state)
    }
}

impl<T: Elem, A: Array<Item = T>> Debug for RangeSet<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self.as_ref_set(), f)
    }
}

impl<'a, T: Elem, A: Array<Item = T>> IntoIterator for &'a RangeSet<T, A> {
    type Item = (T, T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Elem, A: Array<Item = T>> Extend<(T, T)> for RangeSet<T, A> {
    fn extend<I: IntoIterator<Item = (T, T)>>(&mut self, iter: I) {
        for (first, last) in iter {
            self.push_range(first, last);
        }
    }
}

impl<T: Elem, A: Array<Item = T>> FromIterator<(T, T)> for RangeSet<T, A> {
    fn from_iter<I: IntoIterator<Item = (T, T)>>(iter: I) -> Self {
        let mut res = Self::new();
        res.extend(iter);
        res
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;

    pub(crate) type Test = RangeSet<u16>;

    impl Arbitrary for RangeSet<u16> {
        fn arbitrary<G: Gen>(g: &mut G) -> Self {
            let mut bounds: Vec<u16> = Arbitrary::arbitrary(g);
            let singletons: bool = Arbitrary::arbitrary(g);
            for b in bounds.iter_mut() {
                *b %= 1024;
            }
            bounds.sort();
            bounds.dedup();
            if singletons {
                Self::from_values(bounds)
            } else {
                bounds.chunks_exact(2).map(|c| (c[0], c[1])).collect()
            }
        }
    }

    /// checks all invariants of a set built through the public api
    pub(crate) fn assert_canonical<T: Elem, A: Array<Item = T>>(set: &RangeSet<T, A>) {
        assert_eq!(validate(set.words()), Ok(()), "{:?}", set.words());
        let sum: usize = set.iter().map(|(a, b)| (b - a).to_count()).sum();
        assert_eq!(set.length(), sum);
    }

    #[test]
    fn smoke_test() {
        let mut a = Test::new();
        a.push_range(0, 7);
        a.push_value(9);
        a.push_range(10, 17);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![(0, 7), (9, 17)]);
        assert_eq!(a.words(), &[0x8000, 0x8007, 0x8009, 0x8011]);
        assert_eq!(a.length(), 15);
        assert_canonical(&a);
    }

    #[test]
    fn plain_values_iterate() {
        let count = 32u8;
        let set: RangeSet<u8> = RangeSet::from_words(0..count);
        assert_eq!(set.length(), 32);
        let mut it = set.begin();
        for i in 0..count {
            assert_eq!(it.get(), (i, i + 1));
            it.advance();
        }
        assert!(it == set.end());

        let mut it = set.begin();
        for i in 0..count {
            assert_eq!(it.get().0, i);
            assert_eq!(it.post_advance().get().1, i + 1);
        }
        assert!(it == set.end());

        for (i, (a, b)) in (&set).into_iter().enumerate() {
            assert_eq!((a as usize, b as usize), (i, i + 1));
        }
    }

    #[test]
    fn pushed_values_coalesce() {
        let mut set: RangeSet<u8> = RangeSet::new();
        for i in 0..32 {
            set.push_value(i);
        }
        assert_eq!(set.length(), 32);
        assert_eq!(set.words(), &[0x80, 32 | 0x80]);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![(0, 32)]);
        assert_canonical(&set);
    }

    #[test]
    fn tagged_pairs_iterate() {
        let count = 64u16;
        let mut words = Vec::new();
        for i in 0..count {
            words.push(i | 0x8000);
            words.push((2 * i + 7) | 0x8000);
        }
        let set: RangeSet<u16> = RangeSet::from_words(words);
        assert_eq!(set.length(), 2464);
        let mut it = set.begin();
        for i in 0..count {
            assert_eq!(it.post_advance().get(), (i, 2 * i + 7));
        }
        assert!(it == set.end());
        assert_eq!(set.range_count(), 64);
    }

    #[test]
    fn mixed_words_iterate() {
        type U = u64;
        let mask = U::MASK;
        let count: U = 64;
        let mut words = Vec::new();
        let mut i: U = 0;
        while i < count {
            words.push(i);
            i += 1;
            words.push(i);
            i += 1;
            words.push(i | mask);
            words.push((i * 2 + 7) | mask);
            i += 1;
            words.push(i);
            i += 1;
            words.push(i | mask);
            words.push((i * 2 + 8) | mask);
            i += 1;
            words.push(i | mask);
            words.push((i * 2 + 9) | mask);
            i += 1;
        }
        let total = i;
        let set: RangeSet<U> = RangeSet::from_words(words);
        let mut it = set.begin();
        let mut i: U = 0;
        while i < total {
            let expected = match i % 6 {
                2 => (i, 2 * i + 7),
                4 => (i, 2 * i + 8),
                5 => (i, 2 * i + 9),
                _ => (i, i + 1),
            };
            assert_eq!(it.post_advance().get(), expected);
            i += 1;
        }
        assert!(it == set.end());
    }

    #[test]
    fn push_squares() {
        let count = 1024u32;
        let mut set: RangeSet<u32> = RangeSet::new();
        for i in 0..count {
            set.push_range(i * i, (i + 1) * (i + 1) - 1);
        }
        // the first range is empty
        let mut it = set.begin();
        for i in 1..count {
            assert_eq!(it.post_advance().get(), (i * i, (i + 1) * (i + 1) - 1));
        }
        assert!(it == set.end());
        assert_canonical(&set);
    }

    #[test]
    fn push_concatenated_squares() {
        let count = 1024u32;
        let mut set: RangeSet<u32> = RangeSet::new();
        for i in 0..count {
            set.push_range(i * i, (i + 1) * (i + 1));
        }
        assert_eq!(set.length(), (count * count) as usize);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![(0, count * count)]);
    }

    #[test]
    fn push_strided_values() {
        let count = 1024u32;
        let mut set: RangeSet<u32> = RangeSet::new();
        for i in 0..count {
            set.push_value(i * 2);
        }
        assert_eq!(set.words().len(), count as usize);
        for (i, r) in set.iter().enumerate() {
            let i = i as u32;
            assert_eq!(r, (i * 2, i * 2 + 1));
        }
        assert_eq!(set.range_count(), count as usize);
    }

    #[test]
    fn push_concatenated_values() {
        let count = 1024u32;
        let set: RangeSet<u32> = RangeSet::from_values(0..count);
        assert_eq!(set.length(), count as usize);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![(0, count)]);
    }

    #[test]
    fn cursor_comparisons() {
        let mut words = vec![];
        let set: RangeSet<u8> = RangeSet::from_words(words.clone());
        assert!(set.begin() == set.end());
        assert!(set.begin().try_get().is_none());

        words.resize(32, 1);
        let set: RangeSet<u8> = RangeSet::from_words(words.clone());
        assert!(set.begin() < set.end());
        let mut it = set.begin();
        assert!(it == set.begin());
        assert!(set.begin() <= it);
        assert!(set.begin() >= it);
        it.advance();
        assert!(it > set.begin());
        assert!(it != set.begin());
        assert!(set.begin() < it);
        assert_eq!(set.words(), words.as_slice());
    }

    #[test]
    fn cursor_positions() {
        let mut set = Test::new();
        set.push_range(2, 5);
        set.push_value(9);
        set.push_range(20, 30);
        let mut it = set.iter();
        assert!(it.cursor() == set.begin());
        assert_eq!(it.cursor().position(), 0);
        assert_eq!(it.next(), Some((2, 5)));
        assert_eq!(it.cursor().position(), 2);
        assert_eq!(it.cursor().get(), (9, 10));
        assert_eq!(it.next(), Some((9, 10)));
        assert_eq!(it.cursor().position(), 3);
        assert_eq!(it.next(), Some((20, 30)));
        assert!(it.cursor().is_end());
        assert_eq!(it.cursor().position(), set.words().len());
        assert!(it.cursor() == set.end());
    }

    #[test]
    fn into_inner_keeps_words() {
        let mut set = Test::new();
        set.push_value(1);
        set.push_range(4, 8);
        let words = set.clone().into_inner();
        assert_eq!(words.as_slice(), &[1, 0x8004, 0x8008]);
        assert!(words.spilled());
        assert_eq!(Test::from_smallvec(words), set);
        let pair = Test::from_values(4..8).into_inner();
        assert!(!pair.spilled());
        assert_eq!(pair.as_slice(), &[0x8004, 0x8008]);
    }

    #[test]
    #[should_panic]
    fn deref_end_cursor() {
        let set: RangeSet<u8> = RangeSet::new();
        set.end().get();
    }

    #[test]
    #[should_panic]
    fn advance_end_cursor() {
        let set: RangeSet<u8> = RangeSet::from_values(vec![1, 2]);
        set.end().post_advance();
    }

    #[test]
    fn singleton_range_is_value() {
        let mut a: RangeSet<u16> = RangeSet::new();
        let mut b: RangeSet<u16> = RangeSet::new();
        for v in &[3u16, 10, 12, 100] {
            a.push_range(*v, *v + 1);
            b.push_value(*v);
        }
        assert_eq!(a.words(), b.words());
        assert_eq!(a.words(), &[3, 10, 12, 100]);
    }

    #[test]
    fn abutting_ranges_merge() {
        let mut set: RangeSet<u16> = RangeSet::new();
        set.push_range(3, 8);
        set.push_range(8, 11);
        set.push_value(11);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![(3, 12)]);
        assert_eq!(set.words().len(), 2);
        set.push_value(13);
        set.push_range(14, 20);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![(3, 12), (13, 20)]);
    }

    #[test]
    fn empty_range_is_ignored() {
        let mut set: RangeSet<u16> = RangeSet::new();
        set.push_range(5, 5);
        assert!(set.is_empty());
        set.push_range(5, 9);
        set.push_range(9, 9);
        assert_eq!(set.words(), &[5 | 0x8000, 9 | 0x8000]);
        assert_eq!(set.length(), 4);
    }

    #[test]
    fn top_value() {
        let mut set: RangeSet<u8> = RangeSet::new();
        set.push_value(0x7f);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![(0x7f, 0x80)]);

        let mut a: RangeSet<u8> = RangeSet::new();
        a.push_range(0x70, 0x80);
        let b: RangeSet<u8> = RangeSet::from_values(0x70..0x80);
        assert_eq!(a, b);
        assert_eq!(a.words(), &[0xf0, 0xff, 0x7f]);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![(0x70, 0x7f), (0x7f, 0x80)]);
        assert_eq!(a.length(), 16);
        assert_eq!(a.to_enumerated(), (0x70..0x80).collect::<Vec<u8>>());
        assert_canonical(&a);
    }

    #[test]
    #[should_panic]
    fn tagged_value_rejected() {
        let mut set: RangeSet<u8> = RangeSet::new();
        set.push_value(0x80);
    }

    #[test]
    #[should_panic]
    fn tagged_range_start_rejected() {
        let mut set: RangeSet<u16> = RangeSet::new();
        set.push_range(0x8000, 0x8000);
    }

    #[test]
    #[should_panic]
    fn non_monotone_push_rejected() {
        let mut set: RangeSet<u16> = RangeSet::new();
        set.push_range(10, 20);
        set.push_range(15, 30);
    }

    #[test]
    #[should_panic]
    fn push_after_top_rejected() {
        let mut set: RangeSet<u8> = RangeSet::new();
        set.push_value(0x7f);
        set.push_value(0x7f);
    }

    #[test]
    fn length_cache() {
        let mut set: RangeSet<u16> = RangeSet::from_words(vec![1, 0x8003, 0x8010]);
        assert_eq!(set.length.get(), None);
        assert_eq!(set.length(), 14);
        set.reserve(10);
        assert_eq!(set.length.get(), Some(&14));
        set.push_range(16, 20);
        assert_eq!(set.length.get(), Some(&18));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![(1, 2), (3, 20)]);
        assert_eq!(set.length(), set.as_ref_set().length());
        assert_eq!(Test::new().length.get(), Some(&0));
    }

    #[test]
    fn checked_construction() {
        assert!(Test::try_from_words(vec![1, 0x8003, 0x8010]).is_ok());
        assert_eq!(
            Test::try_from_words(vec![1, 0x8003]),
            Err(EncodingError::UnpairedTag { index: 1 })
        );
        assert_eq!(
            Test::try_from_words(vec![0x8003, 5]),
            Err(EncodingError::UnpairedTag { index: 0 })
        );
        assert_eq!(
            Test::try_from_words(vec![0x8005, 0x8005]),
            Err(EncodingError::EmptyRange { index: 0 })
        );
        assert_eq!(
            Test::try_from_words(vec![4, 2]),
            Err(EncodingError::Unordered { index: 1 })
        );
        assert_eq!(
            Test::try_from_words(vec![1, 0x8002, 0x8005]),
            Err(EncodingError::Touching { index: 1 })
        );
        assert_eq!(RangeSetRef::new(&[0x7eu8, 0x7f]).map(|r| r.length()), Ok(2));
        assert!(!RangeSetRef::new_unchecked(&[1u8, 1]).is_canonical());
    }

    #[test]
    fn debug_format() {
        let set: Test = vec![(0, 7), (9, 17), (20, 21)].into_iter().collect();
        assert_eq!(format!("{:?}", set), "RangeSet{0..7, 9..17, 20..21}");
    }

    #[test]
    fn values_iterator() {
        let set: Test = vec![(0, 3), (5, 6), (9, 12)].into_iter().collect();
        assert_eq!(set.values().collect::<Vec<_>>(), vec![0, 1, 2, 5, 9, 10, 11]);
        assert_eq!(set.values().collect::<Vec<_>>(), set.to_enumerated());
        assert_eq!(Test::new().values().next(), None);
    }

    #[quickcheck]
    fn length_matches_ranges(a: Test) -> bool {
        let sum: usize = a.iter().map(|(f, l)| (l - f) as usize).sum();
        a.length() == sum && a.to_enumerated().len() == sum
    }

    #[quickcheck]
    fn enumeration_ascending(a: Test) -> bool {
        a.to_enumerated().windows(2).all(|w| w[0] < w[1])
    }

    #[quickcheck]
    fn arbitrary_is_canonical(a: Test) -> bool {
        a.is_canonical()
    }

    #[quickcheck]
    fn canonical_regardless_of_pushes(a: Test, split: bool) -> bool {
        // push the same content as values, or as ranges split in halves
        let by_values = Test::from_values(a.to_enumerated());
        let mut by_halves = Test::new();
        for (f, l) in a.iter() {
            let mid = if split { f + (l - f) / 2 } else { l };
            by_halves.push_range(f, mid);
            by_halves.push_range(mid, l);
        }
        by_values == a && by_halves == a && Test::try_from_words(a.words().to_vec()).is_ok()
    }

    #[quickcheck]
    fn equality_agrees_with_values(a: Test, b: Test) -> bool {
        (a == b) == (a.to_enumerated() == b.to_enumerated())
    }

    proptest! {
        #[test]
        fn wide_ranges_roundtrip(gaps in prop::collection::vec((1u32..100_000, 1u32..100_000), 0..64)) {
            let mut expected = Vec::new();
            let mut pos = 0u32;
            for (gap, len) in gaps {
                expected.push((pos + gap, pos + gap + len));
                pos += gap + len;
            }
            let set: RangeSet<u32> = expected.iter().cloned().collect();
            prop_assert_eq!(set.iter().collect::<Vec<_>>(), expected.clone());
            let sum: usize = expected.iter().map(|(a, b)| (b - a) as usize).sum();
            prop_assert_eq!(set.length(), sum);
            prop_assert!(set.is_canonical());
        }
    }
}
