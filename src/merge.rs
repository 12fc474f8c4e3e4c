//! N-ary intersection and union of range sets.
//!
//! Both algorithms keep one iterator per input and advance them in a coordinated way, so
//! every input range is visited exactly once. Inputs can be plain ascending values or
//! encoded ranges, see [RangeInput](crate::adaptor::RangeInput). Output ranges are fused
//! with the previous output range when they touch (intersection) or overlap (union), so
//! the output is canonical.
//!
//! ```
//! # use integral_ranges::{intersect, unite, RangeSet};
//! let a: RangeSet<u16> = vec![(0, 7), (9, 17)].into_iter().collect();
//! let b: RangeSet<u16> = vec![(3, 5), (6, 12)].into_iter().collect();
//! let i = intersect(&[a.clone(), b.clone()]);
//! let u = unite(&[a, b]);
//! assert_eq!(i.iter().collect::<Vec<_>>(), vec![(3, 5), (6, 7), (9, 12)]);
//! assert_eq!(u.iter().collect::<Vec<_>>(), vec![(0, 17)]);
//! ```
use crate::adaptor::{first_at, insert_back, last_at, ElemOf, InsertBack, RangeInput, RangeItem};
use crate::elem::Elem;

/// One input of a merge, with its current range decoded.
struct Head<T, I> {
    iter: I,
    current: Option<(T, T)>,
}

impl<T: Elem, I: Iterator> Head<T, I>
where
    I::Item: RangeItem<Elem = T>,
{
    fn new(mut iter: I) -> Self {
        let current = iter.next().map(|x| (first_at(&x), last_at(&x)));
        Self { iter, current }
    }

    /// moves to the next range, returns false if the input is exhausted
    fn advance(&mut self) -> bool {
        let next = self.iter.next().map(|x| (first_at(&x), last_at(&x)));
        if let (Some((_, prev_last)), Some((next_first, _))) = (self.current, next) {
            debug_assert!(prev_last <= next_first, "merge input is not ascending");
        }
        self.current = next;
        self.current.is_some()
    }
}

/// The output range that is still being grown, and the output it will be written to.
struct Pending<'o, T, O: ?Sized> {
    range: Option<(T, T)>,
    output: &'o mut O,
    emitted: usize,
}

impl<'o, T: Elem, O: InsertBack<Elem = T> + ?Sized> Pending<'o, T, O> {
    fn new(output: &'o mut O) -> Self {
        Self {
            range: None,
            output,
            emitted: 0,
        }
    }

    fn flush(&mut self) {
        if let Some(range) = self.range.take() {
            insert_back(&mut *self.output, range);
            self.emitted += 1;
        }
    }

    /// extends the pending range if `first..last` continues it
    fn append(&mut self, first: T, last: T) {
        if let Some((_, end)) = &mut self.range {
            if *end == first {
                *end = last;
                return;
            }
        }
        self.flush();
        self.range = Some((first, last));
    }

    /// extends the pending range if `first..last` overlaps or touches it
    fn merge(&mut self, first: T, last: T) {
        if let Some((_, end)) = &mut self.range {
            if *end >= first {
                *end = (*end).max(last);
                return;
            }
        }
        self.flush();
        self.range = Some((first, last));
    }

    /// flushes the pending range, returns the number of ranges written
    fn finish(mut self) -> usize {
        self.flush();
        self.emitted
    }
}

/// Intersects the ascending inputs produced by `inputs`, appending the result to `output`.
///
/// No input may contain the value `T::LAST`, which is used as a sentinel.
pub fn intersect_iters<T, I, O>(inputs: impl IntoIterator<Item = I>, output: &mut O)
where
    T: Elem,
    I: Iterator,
    I::Item: RangeItem<Elem = T>,
    O: InsertBack<Elem = T> + ?Sized,
{
    let mut heads: Vec<Head<T, I>> = inputs.into_iter().map(Head::new).collect();
    if heads.is_empty() || heads.iter().any(|head| head.current.is_none()) {
        return;
    }
    tracing::trace!(inputs = heads.len(), "intersecting");
    let mut pending = Pending::new(output);
    // only grows, since every input is ascending
    let mut window_begin = T::zero();
    loop {
        let mut window_end = T::LAST;
        let mut k = 0;
        for (i, head) in heads.iter().enumerate() {
            if let Some((first, last)) = head.current {
                debug_assert!(first < T::LAST, "input contains the sentinel value");
                if first > window_begin {
                    window_begin = first;
                }
                if last < window_end {
                    window_end = last;
                    k = i;
                }
            }
        }
        if window_begin < window_end {
            pending.append(window_begin, window_end);
        }
        if !heads[k].advance() {
            break;
        }
    }
    let emitted = pending.finish();
    tracing::trace!(inputs = heads.len(), ranges = emitted, "intersected");
}

/// Unites the ascending inputs produced by `inputs`, appending the result to `output`.
pub fn unite_iters<T, I, O>(inputs: impl IntoIterator<Item = I>, output: &mut O)
where
    T: Elem,
    I: Iterator,
    I::Item: RangeItem<Elem = T>,
    O: InsertBack<Elem = T> + ?Sized,
{
    let mut heads: Vec<Head<T, I>> = inputs.into_iter().map(Head::new).collect();
    tracing::trace!(inputs = heads.len(), "uniting");
    let mut pending = Pending::new(output);
    loop {
        // the input whose current range starts first, ties go to the lowest index
        let mut next: Option<(usize, (T, T))> = None;
        for (i, head) in heads.iter().enumerate() {
            if let Some(range) = head.current {
                match next {
                    Some((_, (first, _))) if first <= range.0 => {}
                    _ => next = Some((i, range)),
                }
            }
        }
        let (k, (first, last)) = match next {
            Some(next) => next,
            None => break,
        };
        pending.merge(first, last);
        heads[k].advance();
    }
    let emitted = pending.finish();
    tracing::trace!(inputs = heads.len(), ranges = emitted, "united");
}

/// Appends the intersection of `inputs` to `output`.
///
/// The output can be of a different kind than the inputs, e.g. plain value inputs can be
/// intersected into a [RangeSet](crate::RangeSet).
pub fn intersect_into<C, O>(inputs: &[C], output: &mut O)
where
    C: RangeInput,
    O: InsertBack<Elem = ElemOf<C>> + ?Sized,
{
    intersect_iters(inputs.iter().map(|input| input.range_items()), output)
}

/// Appends the union of `inputs` to `output`.
pub fn unite_into<C, O>(inputs: &[C], output: &mut O)
where
    C: RangeInput,
    O: InsertBack<Elem = ElemOf<C>> + ?Sized,
{
    unite_iters(inputs.iter().map(|input| input.range_items()), output)
}

/// The values present in every input.
///
/// Returns an empty set for no inputs, and a copy of the input for a single input.
pub fn intersect<C>(inputs: &[C]) -> C
where
    C: RangeInput + InsertBack<Elem = ElemOf<C>> + Default + Clone,
{
    match inputs {
        [] => C::default(),
        [single] => single.clone(),
        _ => {
            let mut res = C::default();
            intersect_into(inputs, &mut res);
            res
        }
    }
}

/// The values present in at least one input.
///
/// Returns an empty set for no inputs, and a copy of the input for a single input.
pub fn unite<C>(inputs: &[C]) -> C
where
    C: RangeInput + InsertBack<Elem = ElemOf<C>> + Default + Clone,
{
    match inputs {
        [] => C::default(),
        [single] => single.clone(),
        _ => {
            let mut res = C::default();
            unite_into(inputs, &mut res);
            res
        }
    }
}
