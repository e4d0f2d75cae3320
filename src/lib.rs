// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)]
// Duplicate match arms

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![deny(missing_docs)] // Documentation is a must for release

//! # AudioBuffer
//!
//! Multichannel, planar, floating-point audio sample buffers.
//!
//! An [`AudioBuffer`] holds one sample sequence per channel, all of the same
//! length, together with a sample rate. Buffers can be built from many kinds of
//! input, which the [`resolver`] normalises into a canonical
//! [`BufferDescriptor`] before the channel storage is allocated:
//!
//! - nothing at all (a short stereo silence buffer),
//! - a bare length (silence of that length),
//! - a flat, interleaved sample sequence,
//! - one sample sequence per channel, copied or borrowed as a live view,
//! - a two-dimensional `ndarray` grid with one row per channel,
//! - raw bytes holding packed `f32` or `f64` samples,
//! - any existing buffer implementing [`ChannelBuffer`].
//!
//! ## Quick Start
//!
//! ```rust
//! use audio_buffer::AudioBuffer;
//!
//! // Interleaved input is split frame by frame
//! let buffer = AudioBuffer::<f32>::from_samples(2, &[0.0, 1.0, 0.0, 1.0, 0.0, 1.0]).unwrap();
//! assert_eq!(buffer.length(), 3);
//! assert_eq!(buffer.channel_data(0).unwrap().to_vec(), vec![0.0, 0.0, 0.0]);
//! assert_eq!(buffer.channel_data(1).unwrap().to_vec(), vec![1.0, 1.0, 1.0]);
//! ```
//!
//! ## Order-flexible construction
//!
//! ```rust
//! use audio_buffer::AudioBuffer;
//!
//! let buffer = AudioBuffer::<f32>::builder()
//!     .sample_rate(48_000.0)
//!     .number_of_channels(3)
//!     .length(480)
//!     .build()
//!     .unwrap();
//! assert_eq!(buffer.number_of_channels(), 3);
//! assert_eq!(buffer.duration(), 0.01);
//! ```
//!
//! ## Copying channel ranges
//!
//! ```rust
//! use audio_buffer::AudioBuffer;
//!
//! let mut buffer = AudioBuffer::<f32>::silence(2, 8, 44_100.0).unwrap();
//! buffer.copy_to_channel(&[0.5; 4], 1, 6).unwrap(); // clamped to the last two samples
//!
//! let mut out = [0.0f32; 3];
//! buffer.copy_from_channel(&mut out, 1, 5).unwrap();
//! assert_eq!(out, [0.0, 0.5, 0.5]);
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use audio_buffer::{AudioBuffer, AudioBufferError};
//!
//! let buffer = AudioBuffer::<f32>::default();
//! match buffer.channel_data(2) {
//!     Err(AudioBufferError::IndexOutOfRange { index, .. }) => assert_eq!(index, 2),
//!     _ => unreachable!(),
//! }
//! ```

pub mod builder;
pub mod conversions;
mod error;
mod repr;
pub mod resolver;
/// Core traits for audio buffers.
pub mod traits;
pub mod utils;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

pub use crate::builder::BufferBuilder;
pub use crate::error::{AudioBufferError, AudioBufferResult};
pub use crate::repr::{AudioBuffer, ChannelData};
pub use crate::resolver::{BufferDescriptor, BufferOptions, BufferSource, ChannelInput, resolve};
pub use crate::traits::{ChannelBuffer, RealFloat, SampleFormat};
pub use crate::utils::{samples_to_seconds, seconds_to_samples};

/// Sample rate used when none is given, in Hz.
pub const DEFAULT_SAMPLE_RATE: f64 = 44_100.0;
/// Channel count used when none is given.
pub const DEFAULT_NUMBER_OF_CHANNELS: usize = 2;
/// Length of a buffer constructed without any data or length.
pub const DEFAULT_LENGTH: usize = 1;

/// Maximum channel count accepted in strict mode.
pub const MAX_STRICT_CHANNELS: usize = 32;
/// Lowest sample rate accepted in strict mode, in Hz.
pub const MIN_STRICT_SAMPLE_RATE: f64 = 3_000.0;
/// Highest sample rate accepted in strict mode, in Hz.
pub const MAX_STRICT_SAMPLE_RATE: f64 = 768_000.0;

/// Describes how flat multi-channel input is organized in memory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelLayout {
    /// Samples from different channels are stored frame by frame (LRLRLR...)
    /// This is the most common format for audio files and streaming
    #[default]
    Interleaved,
    /// Samples from each channel are stored in separate contiguous blocks (LLL...RRR...)
    NonInterleaved,
}
