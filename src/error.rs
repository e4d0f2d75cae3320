//! Error types and result utilities for audio buffer operations.

use thiserror::Error;

/// Convenience type alias for results that may contain AudioBufferError
pub type AudioBufferResult<T> = Result<T, AudioBufferError>;

/// Error types that can occur while building or accessing an audio buffer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AudioBufferError {
    /// Malformed or contradictory constructor input.
    ///
    /// Raised for a channel count below one, a non-positive sample rate, a byte
    /// buffer whose size is not a whole number of frames, or (in strict mode) a
    /// channel count that contradicts the shape of planar input.
    #[error("Invalid argument '{argument}': {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        argument: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A channel index outside `[0, number_of_channels)`.
    #[error("Channel index {index} out of range for buffer with {number_of_channels} channel(s)")]
    IndexOutOfRange {
        /// The requested channel index.
        index: usize,
        /// Number of channels in the buffer.
        number_of_channels: usize,
    },
}

impl AudioBufferError {
    /// Create an invalid argument error.
    pub fn invalid_argument(argument: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }

    /// Create an index out of range error.
    pub const fn index_out_of_range(index: usize, number_of_channels: usize) -> Self {
        Self::IndexOutOfRange {
            index,
            number_of_channels,
        }
    }

    /// Returns true if this error was caused by bad constructor input.
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Returns true if this error was caused by a bad channel index.
    pub const fn is_index_out_of_range(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. })
    }
}
