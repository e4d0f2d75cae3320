//! Fluent, order-independent construction of [`AudioBuffer`]s.
//!
//! The builder collects the same inputs as [`AudioBuffer::new`] (a positional
//! channel count, one data source and explicit options) and hands them to the
//! resolver on [`build`](BufferBuilder::build). Setters can be called in any
//! order; setting the same thing twice keeps the last value.

use ndarray::ArrayView2;

use crate::resolver::{BufferOptions, BufferSource, ChannelInput};
use crate::utils::seconds_to_samples;
use crate::{
    AudioBuffer, AudioBufferResult, ChannelBuffer, ChannelLayout, DEFAULT_SAMPLE_RATE, RealFloat,
    SampleFormat,
};

/// Builder for [`AudioBuffer`].
///
/// # Example
/// ```rust
/// use audio_buffer::{AudioBuffer, ChannelLayout};
///
/// let samples = [0.0f32, 1.0, 0.0, 1.0, 0.0, 1.0];
/// let buffer = AudioBuffer::<f32>::builder()
///     .layout(ChannelLayout::NonInterleaved)
///     .samples(&samples)
///     .number_of_channels(2)
///     .build()
///     .unwrap();
/// assert_eq!(buffer.channel_data(0).unwrap().to_vec(), vec![0.0, 1.0, 0.0]);
/// ```
pub struct BufferBuilder<'a, F: RealFloat = f32> {
    number_of_channels: Option<usize>,
    source: BufferSource<'a, F>,
    options: BufferOptions,
    duration: Option<f64>,
}

impl<'a, F: RealFloat> BufferBuilder<'a, F> {
    /// Create a builder with no source and default options.
    pub fn new() -> Self {
        Self {
            number_of_channels: None,
            source: BufferSource::Empty,
            options: BufferOptions::default(),
            duration: None,
        }
    }

    /// Set the channel count.
    ///
    /// This is the positional count: an explicit count in
    /// [`options`](Self::options) still takes precedence.
    pub fn number_of_channels(mut self, number_of_channels: usize) -> Self {
        self.number_of_channels = Some(number_of_channels);
        self
    }

    /// Set the number of samples per channel.
    pub fn length(mut self, length: usize) -> Self {
        self.options.length = Some(length);
        self
    }

    /// Set the length as a duration in seconds, rounded down to whole samples.
    ///
    /// Converted at [`build`](Self::build) time using the effective sample rate.
    /// Ignored when an explicit [`length`](Self::length) is set.
    pub fn duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Set the sample rate in Hz.
    pub fn sample_rate(mut self, sample_rate: f64) -> Self {
        self.options.sample_rate = Some(sample_rate);
        self
    }

    /// Enable or disable strict mode.
    pub fn strict(mut self, strict: bool) -> Self {
        self.options.strict = strict;
        self
    }

    /// Set the width of the samples in a byte source.
    pub fn sample_format(mut self, format: SampleFormat) -> Self {
        self.options.sample_format = Some(format);
        self
    }

    /// Set how flat sample and byte sources are split into channels.
    pub fn layout(mut self, layout: ChannelLayout) -> Self {
        self.options.layout = layout;
        self
    }

    /// Replace all options at once.
    ///
    /// A previously set [`duration`](Self::duration) is kept.
    pub fn options(mut self, options: BufferOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a flat sample sequence as the source.
    pub fn samples(mut self, samples: &'a [F]) -> Self {
        self.source = BufferSource::Samples(samples);
        self
    }

    /// Use one input per channel as the source.
    pub fn channels<I>(mut self, channels: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ChannelInput<'a, F>>,
    {
        self.source = BufferSource::Channels(channels.into_iter().map(Into::into).collect());
        self
    }

    /// Use a grid with one row per channel as the source.
    pub fn grid(mut self, grid: ArrayView2<'a, F>) -> Self {
        self.source = BufferSource::Grid(grid);
        self
    }

    /// Use packed bytes as the source.
    pub fn bytes(mut self, bytes: &'a [u8]) -> Self {
        self.source = BufferSource::Bytes(bytes);
        self
    }

    /// Copy an existing buffer.
    pub fn buffer(mut self, buffer: &'a dyn ChannelBuffer<F>) -> Self {
        self.source = BufferSource::Buffer(buffer);
        self
    }

    /// Set the source directly.
    pub fn source(mut self, source: BufferSource<'a, F>) -> Self {
        self.source = source;
        self
    }

    /// Resolve the collected arguments and allocate the buffer.
    ///
    /// # Errors
    /// Returns whatever [`AudioBuffer::new`] returns for the collected arguments.
    pub fn build(self) -> AudioBufferResult<AudioBuffer<'a, F>> {
        let mut options = self.options;
        if let (None, Some(seconds)) = (options.length, self.duration) {
            let sample_rate = options.sample_rate.unwrap_or(match &self.source {
                BufferSource::Buffer(buffer) => buffer.sample_rate(),
                _ => DEFAULT_SAMPLE_RATE,
            });
            options.length = Some(seconds_to_samples(seconds, sample_rate));
        }
        AudioBuffer::new(self.number_of_channels, self.source, options)
    }
}

impl<F: RealFloat> Default for BufferBuilder<'_, F> {
    fn default() -> Self {
        Self::new()
    }
}
