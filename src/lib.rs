//! Compact sets of unsigned integers, stored as tag-bit encoded ranges, together with
//! n-ary intersection and union.
//!
//! ```
//! # use integral_ranges::{intersect, RangeSet};
//! let mut a: RangeSet<u32> = RangeSet::new();
//! a.push_range(0, 100);
//! a.push_value(200);
//! let b: RangeSet<u32> = RangeSet::from_values(vec![5, 6, 7, 200, 300]);
//! let c = intersect(&[a, b]);
//! assert_eq!(c.iter().collect::<Vec<_>>(), vec![(5, 8), (200, 201)]);
//! assert_eq!(c.to_enumerated(), vec![5, 6, 7, 200]);
//! ```
//!
//! The merge functions work just as well on plain ascending values:
//!
//! ```
//! # use integral_ranges::unite;
//! let sets: Vec<Vec<u16>> = vec![vec![1, 2, 3], vec![3, 4], vec![]];
//! assert_eq!(unite(&sets), vec![1, 2, 3, 4]);
//! ```
mod elem;
mod error;

pub mod adaptor;
pub mod merge;
pub mod range_set;

pub use adaptor::{first_at, insert_back, last_at, InsertBack, RangeInput, RangeItem};
pub use elem::Elem;
pub use error::EncodingError;
pub use merge::{intersect, intersect_into, unite, unite_into};
pub use range_set::{Cursor, RangeSet, RangeSetRef};
