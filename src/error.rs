//! Errors returned by the checked constructors

/// A word sequence that is not a canonical range encoding.
///
/// The index is the position in the word slice where the problem was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// A tagged word that is not followed by a second tagged word.
    #[error("tagged word at {index} has no tagged partner")]
    UnpairedTag {
        /// position of the lone tagged word
        index: usize,
    },
    /// A tagged pair that decodes to an empty or inverted range.
    #[error("range at {index} is empty")]
    EmptyRange {
        /// position of the first word of the pair
        index: usize,
    },
    /// A range that does not start after the previous one.
    #[error("range at {index} is not in ascending order")]
    Unordered {
        /// position of the first word of the range
        index: usize,
    },
    /// A range that starts where the previous one ends, so the two should have been coalesced.
    #[error("range at {index} touches the previous range")]
    Touching {
        /// position of the first word of the range
        index: usize,
    },
}
