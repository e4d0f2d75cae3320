use bytemuck::Pod;
use ndarray::ArrayView1;
use num_traits::{Float, NumCast};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};

use crate::AudioBufferResult;
use crate::utils::samples_to_seconds;

/// Width of the packed floating-point samples held in a raw byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleFormat {
    /// 32-bit IEEE 754 samples.
    F32,
    /// 64-bit IEEE 754 samples.
    F64,
}

impl SampleFormat {
    /// Number of bytes occupied by one sample.
    pub const fn bytes_per_sample(&self) -> usize {
        match self {
            SampleFormat::F32 => std::mem::size_of::<f32>(),
            SampleFormat::F64 => std::mem::size_of::<f64>(),
        }
    }
}

/// Floating-point type used for channel storage (`f32` or `f64`).
///
/// The storage type plays the role of the "float array constructor" of
/// host audio APIs: `AudioBuffer<f32>` stores 32-bit samples and
/// `AudioBuffer<f64>` stores 64-bit samples.
pub trait RealFloat:
    Float + NumCast + Pod + Default + Debug + Display + Send + Sync + 'static
{
    /// Packed byte format matching this storage type.
    const FORMAT: SampleFormat;
}

impl RealFloat for f32 {
    const FORMAT: SampleFormat = SampleFormat::F32;
}

impl RealFloat for f64 {
    const FORMAT: SampleFormat = SampleFormat::F64;
}

/// Capability shared by every channel-bearing audio buffer.
///
/// [`AudioBuffer`](crate::AudioBuffer) implements this trait, and any host
/// buffer type implementing it can be used as a clone source through
/// [`BufferSource::Buffer`](crate::BufferSource::Buffer). This is what lets
/// buffers round-trip between this crate and a host API without the crate
/// knowing the host's concrete type.
///
/// # Example
/// ```rust
/// use audio_buffer::{AudioBuffer, AudioBufferError, AudioBufferResult, ChannelBuffer};
/// use ndarray::ArrayView1;
///
/// struct HostBuffer {
///     planes: Vec<Vec<f32>>,
///     rate: f64,
/// }
///
/// impl ChannelBuffer<f32> for HostBuffer {
///     fn number_of_channels(&self) -> usize {
///         self.planes.len()
///     }
///     fn length(&self) -> usize {
///         self.planes.first().map_or(0, Vec::len)
///     }
///     fn sample_rate(&self) -> f64 {
///         self.rate
///     }
///     fn channel_data(&self, channel: usize) -> AudioBufferResult<ArrayView1<'_, f32>> {
///         self.planes
///             .get(channel)
///             .map(|plane| ArrayView1::from(plane.as_slice()))
///             .ok_or(AudioBufferError::index_out_of_range(channel, self.planes.len()))
///     }
/// }
///
/// let host = HostBuffer { planes: vec![vec![1.0, 1.0], vec![-1.0, -1.0]], rate: 22_050.0 };
/// let copy = AudioBuffer::from_buffer(&host).unwrap();
/// assert_eq!(copy.sample_rate(), 22_050.0);
/// assert_eq!(copy.channel_data(1).unwrap().to_vec(), vec![-1.0, -1.0]);
/// ```
pub trait ChannelBuffer<F: RealFloat> {
    /// Returns the number of channels.
    fn number_of_channels(&self) -> usize;

    /// Returns the number of samples per channel.
    fn length(&self) -> usize;

    /// Returns the sample rate in Hz.
    fn sample_rate(&self) -> f64;

    /// Returns a read view of one channel's samples.
    ///
    /// # Errors
    /// Implementations return [`AudioBufferError::IndexOutOfRange`](crate::AudioBufferError::IndexOutOfRange)
    /// when `channel` is not below [`number_of_channels`](Self::number_of_channels).
    fn channel_data(&self, channel: usize) -> AudioBufferResult<ArrayView1<'_, F>>;

    /// Returns the duration in seconds.
    fn duration(&self) -> f64 {
        samples_to_seconds(self.length(), self.sample_rate())
    }
}
