//! The unsigned word type stored in a [RangeSet](crate::RangeSet).
use num_traits::{PrimInt, Unsigned};
use std::fmt::Debug;
use std::hash::Hash;

/// An unsigned integer that can be stored in a range set.
///
/// The most significant bit is reserved as a tag and marks the two words of an encoded
/// range. Values must therefore be below [Elem::MASK].
pub trait Elem: PrimInt + Unsigned + Debug + Hash + Send + Sync + 'static {
    /// The tag bit, `1 << (BITS - 1)`.
    const MASK: Self;
    /// The largest value of the type. Used as a sentinel by the merger.
    const LAST: Self;
    /// Number of bits in the type.
    const BITS: u32;

    /// Widens a (small) difference of two values to a count.
    fn to_count(self) -> usize;

    /// true if the tag bit is set
    #[inline]
    fn is_tagged(self) -> bool {
        self & Self::MASK != Self::zero()
    }

    #[inline]
    fn tagged(self) -> Self {
        self | Self::MASK
    }

    #[inline]
    fn untagged(self) -> Self {
        self & !Self::MASK
    }
}

macro_rules! impl_elem {
    ($($t:ty),*) => {
        $(
            impl Elem for $t {
                const MASK: Self = 1 << (<$t>::BITS - 1);
                const LAST: Self = <$t>::MAX;
                const BITS: u32 = <$t>::BITS;

                #[inline]
                fn to_count(self) -> usize {
                    self as usize
                }
            }
        )*
    };
}

impl_elem!(u8, u16, u32, u64, u128, usize);
