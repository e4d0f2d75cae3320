//! Parameter resolution for audio buffer construction.
//!
//! Buffer constructors accept many shapes of input. This module turns an
//! optional positional channel count, a tagged [`BufferSource`] and a
//! [`BufferOptions`] struct into a canonical [`BufferDescriptor`]
//! (`number_of_channels`, `length`, `sample_rate`). [`resolve`] is a pure
//! function: it never allocates channel storage and never mutates its input.
//!
//! # Resolution rules
//!
//! | Source | Channels | Length |
//! |---|---|---|
//! | `Empty` | explicit or 2 | 1 |
//! | `Length(n)` | explicit or 2 | `n` |
//! | `Samples(seq)` | explicit or 2 | `seq.len() / channels` |
//! | `Channels(subs)` | `subs.len()` (or explicit) | first sub-sequence |
//! | `Grid(view)` | rows (or explicit) | columns |
//! | `Bytes(bytes)` | explicit or 2 | `bytes.len() / (channels * width)` |
//! | `Buffer(src)` | source's (or explicit) | source's |
//!
//! An option set in [`BufferOptions`] always wins over the positional or
//! inferred value. The sample rate comes from the options, then from a clone
//! source, then [`DEFAULT_SAMPLE_RATE`].

use ndarray::{ArrayView1, ArrayView2, ArrayViewMut1};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    AudioBufferError, AudioBufferResult, ChannelBuffer, ChannelLayout, DEFAULT_LENGTH,
    DEFAULT_NUMBER_OF_CHANNELS, DEFAULT_SAMPLE_RATE, MAX_STRICT_CHANNELS, MAX_STRICT_SAMPLE_RATE,
    MIN_STRICT_SAMPLE_RATE, RealFloat, SampleFormat,
};

/// Recognised construction options.
///
/// Every field is optional in spirit: the [`Default`] value leaves all shape
/// decisions to the resolver and selects permissive mode.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferOptions {
    /// Emulate host audio API strictness.
    ///
    /// Strict mode rejects shape contradictions instead of adjusting, enforces
    /// host limits (1 to 32 channels, at least one sample, 3 kHz to 768 kHz)
    /// and always copies channel views into owned storage.
    pub strict: bool,
    /// Width of the samples packed in a byte source. Defaults to the storage type's width.
    pub sample_format: Option<SampleFormat>,
    /// How flat sample and byte sources are split into channels.
    pub layout: ChannelLayout,
    /// Channel count, overriding any positional or inferred count.
    pub number_of_channels: Option<usize>,
    /// Samples per channel, overriding the inferred length.
    pub length: Option<usize>,
    /// Sample rate in Hz.
    pub sample_rate: Option<f64>,
}

impl BufferOptions {
    /// Options with only the sample rate set.
    pub fn with_sample_rate(sample_rate: f64) -> Self {
        Self {
            sample_rate: Some(sample_rate),
            ..Self::default()
        }
    }

    /// Strict (host API compatible) options.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }
}

/// One channel of planar input.
#[derive(Debug)]
pub enum ChannelInput<'a, F: RealFloat> {
    /// Samples copied into storage owned by the new buffer.
    Copy(ArrayView1<'a, F>),
    /// Samples the new buffer aliases: writes through the buffer land in the
    /// caller's storage. Strict mode copies views instead.
    View(ArrayViewMut1<'a, F>),
}

impl<F: RealFloat> ChannelInput<'_, F> {
    /// Number of samples supplied for this channel.
    pub fn len(&self) -> usize {
        match self {
            ChannelInput::Copy(view) => view.len(),
            ChannelInput::View(view) => view.len(),
        }
    }

    /// Returns true if no samples were supplied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if this input aliases caller storage.
    pub const fn is_view(&self) -> bool {
        matches!(self, ChannelInput::View(_))
    }
}

impl<'a, F: RealFloat> From<&'a [F]> for ChannelInput<'a, F> {
    fn from(samples: &'a [F]) -> Self {
        ChannelInput::Copy(ArrayView1::from(samples))
    }
}

impl<'a, F: RealFloat> From<&'a Vec<F>> for ChannelInput<'a, F> {
    fn from(samples: &'a Vec<F>) -> Self {
        ChannelInput::Copy(ArrayView1::from(samples.as_slice()))
    }
}

impl<'a, F: RealFloat> From<ArrayView1<'a, F>> for ChannelInput<'a, F> {
    fn from(view: ArrayView1<'a, F>) -> Self {
        ChannelInput::Copy(view)
    }
}

impl<'a, F: RealFloat> From<&'a mut [F]> for ChannelInput<'a, F> {
    fn from(samples: &'a mut [F]) -> Self {
        ChannelInput::View(ArrayViewMut1::from(samples))
    }
}

impl<'a, F: RealFloat> From<ArrayViewMut1<'a, F>> for ChannelInput<'a, F> {
    fn from(view: ArrayViewMut1<'a, F>) -> Self {
        ChannelInput::View(view)
    }
}

/// The data argument of a buffer constructor, classified up front.
pub enum BufferSource<'a, F: RealFloat> {
    /// No data argument at all.
    Empty,
    /// A bare length: the buffer is silence of that many samples per channel.
    Length(usize),
    /// A flat sample sequence, split according to [`BufferOptions::layout`].
    Samples(&'a [F]),
    /// One sample sequence per channel.
    Channels(Vec<ChannelInput<'a, F>>),
    /// A two-dimensional grid with one row per channel.
    Grid(ArrayView2<'a, F>),
    /// Packed floating-point samples, split according to [`BufferOptions::layout`].
    Bytes(&'a [u8]),
    /// An existing buffer to clone.
    Buffer(&'a dyn ChannelBuffer<F>),
}

impl<F: RealFloat> BufferSource<'_, F> {
    /// Short name of the source kind, used in diagnostics.
    pub const fn kind(&self) -> &'static str {
        match self {
            BufferSource::Empty => "empty",
            BufferSource::Length(_) => "length",
            BufferSource::Samples(_) => "samples",
            BufferSource::Channels(_) => "channels",
            BufferSource::Grid(_) => "grid",
            BufferSource::Bytes(_) => "bytes",
            BufferSource::Buffer(_) => "buffer",
        }
    }
}

impl<F: RealFloat> Default for BufferSource<'_, F> {
    fn default() -> Self {
        BufferSource::Empty
    }
}

impl<F: RealFloat> From<usize> for BufferSource<'_, F> {
    fn from(length: usize) -> Self {
        BufferSource::Length(length)
    }
}

impl<'a, F: RealFloat> From<&'a [F]> for BufferSource<'a, F> {
    fn from(samples: &'a [F]) -> Self {
        BufferSource::Samples(samples)
    }
}

impl<'a, F: RealFloat> From<&'a Vec<F>> for BufferSource<'a, F> {
    fn from(samples: &'a Vec<F>) -> Self {
        BufferSource::Samples(samples.as_slice())
    }
}

impl<'a, F: RealFloat> From<Vec<ChannelInput<'a, F>>> for BufferSource<'a, F> {
    fn from(channels: Vec<ChannelInput<'a, F>>) -> Self {
        BufferSource::Channels(channels)
    }
}

impl<'a, F: RealFloat> From<ArrayView2<'a, F>> for BufferSource<'a, F> {
    fn from(grid: ArrayView2<'a, F>) -> Self {
        BufferSource::Grid(grid)
    }
}

impl<'a, F: RealFloat> From<&'a dyn ChannelBuffer<F>> for BufferSource<'a, F> {
    fn from(buffer: &'a dyn ChannelBuffer<F>) -> Self {
        BufferSource::Buffer(buffer)
    }
}

/// Canonical buffer shape produced by [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BufferDescriptor {
    /// Number of channels, at least one.
    pub number_of_channels: usize,
    /// Samples per channel.
    pub length: usize,
    /// Sample rate in Hz, positive and finite.
    pub sample_rate: f64,
}

impl Default for BufferDescriptor {
    fn default() -> Self {
        Self {
            number_of_channels: DEFAULT_NUMBER_OF_CHANNELS,
            length: DEFAULT_LENGTH,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

/// Resolves constructor arguments into a canonical [`BufferDescriptor`].
///
/// # Arguments
/// * `number_of_channels` - Positional channel count, if one was given
/// * `source` - The classified data argument
/// * `options` - Explicit options; these override positional and inferred values
///
/// # Errors
/// Returns [`AudioBufferError::InvalidArgument`] when:
/// - the channel count is zero,
/// - the sample rate is not positive and finite,
/// - a byte source is not a whole number of frames,
/// - in strict mode, a channel count contradicts planar or grid input, planar
///   channels differ in length, or a host limit is exceeded.
///
/// # Examples
/// ```
/// use audio_buffer::{BufferOptions, BufferSource, resolve};
///
/// let samples = vec![0.0f32; 12];
/// let descriptor = resolve(Some(3), &BufferSource::Samples(&samples[..]), &BufferOptions::default()).unwrap();
/// assert_eq!(descriptor.number_of_channels, 3);
/// assert_eq!(descriptor.length, 4);
/// assert_eq!(descriptor.sample_rate, 44_100.0);
/// ```
pub fn resolve<F: RealFloat>(
    number_of_channels: Option<usize>,
    source: &BufferSource<'_, F>,
    options: &BufferOptions,
) -> AudioBufferResult<BufferDescriptor> {
    let explicit_channels = options.number_of_channels.or(number_of_channels);

    let inferred_rate = match source {
        BufferSource::Buffer(buffer) => buffer.sample_rate(),
        _ => DEFAULT_SAMPLE_RATE,
    };
    let sample_rate = options.sample_rate.unwrap_or(inferred_rate);
    validate_sample_rate(sample_rate)?;

    let (channels, length) = match source {
        BufferSource::Empty => (
            channel_count(explicit_channels, DEFAULT_NUMBER_OF_CHANNELS)?,
            options.length.unwrap_or(DEFAULT_LENGTH),
        ),
        BufferSource::Length(length) => (
            channel_count(explicit_channels, DEFAULT_NUMBER_OF_CHANNELS)?,
            options.length.unwrap_or(*length),
        ),
        BufferSource::Samples(samples) => {
            let channels = channel_count(explicit_channels, DEFAULT_NUMBER_OF_CHANNELS)?;
            (channels, options.length.unwrap_or(samples.len() / channels))
        }
        BufferSource::Channels(inputs) => {
            let lengths: Vec<usize> = inputs.iter().map(ChannelInput::len).collect();
            planar_shape(explicit_channels, &lengths, options)?
        }
        BufferSource::Grid(grid) => {
            let lengths = vec![grid.ncols(); grid.nrows()];
            planar_shape(explicit_channels, &lengths, options)?
        }
        BufferSource::Bytes(bytes) => {
            let channels = channel_count(explicit_channels, DEFAULT_NUMBER_OF_CHANNELS)?;
            let format = options.sample_format.unwrap_or(F::FORMAT);
            let frame_size = channels * format.bytes_per_sample();
            if bytes.len() % frame_size != 0 {
                return Err(AudioBufferError::invalid_argument(
                    "data",
                    format!(
                        "byte length {} is not a multiple of the frame size {} ({} channel(s) x {} byte(s))",
                        bytes.len(),
                        frame_size,
                        channels,
                        format.bytes_per_sample()
                    ),
                ));
            }
            (channels, options.length.unwrap_or(bytes.len() / frame_size))
        }
        BufferSource::Buffer(buffer) => (
            channel_count(explicit_channels, buffer.number_of_channels())?,
            options.length.unwrap_or(buffer.length()),
        ),
    };

    let descriptor = BufferDescriptor {
        number_of_channels: channels,
        length,
        sample_rate,
    };

    if options.strict {
        validate_host_limits(&descriptor)?;
    }

    if let BufferSource::Samples(samples) = source {
        let remainder = samples.len() % channels;
        if remainder != 0 {
            warn!(
                samples = samples.len(),
                channels,
                remainder,
                "flat input is not a whole number of frames; trailing samples dropped"
            );
        }
    }

    debug!(
        source = source.kind(),
        number_of_channels = descriptor.number_of_channels,
        length = descriptor.length,
        sample_rate = descriptor.sample_rate,
        strict = options.strict,
        "resolved buffer descriptor"
    );

    Ok(descriptor)
}

fn channel_count(explicit: Option<usize>, inferred: usize) -> AudioBufferResult<usize> {
    let channels = explicit.unwrap_or(inferred);
    if channels == 0 {
        return Err(AudioBufferError::invalid_argument(
            "number_of_channels",
            "must be at least 1",
        ));
    }
    Ok(channels)
}

fn validate_sample_rate(sample_rate: f64) -> AudioBufferResult<()> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(AudioBufferError::invalid_argument(
            "sample_rate",
            format!("must be positive and finite, got {sample_rate}"),
        ));
    }
    Ok(())
}

/// Shape of planar input: one entry per supplied channel holding its length.
fn planar_shape(
    explicit: Option<usize>,
    lengths: &[usize],
    options: &BufferOptions,
) -> AudioBufferResult<(usize, usize)> {
    let channels = channel_count(explicit, lengths.len())?;

    if channels != lengths.len() {
        if options.strict {
            return Err(AudioBufferError::invalid_argument(
                "number_of_channels",
                format!(
                    "{} channel(s) requested but {} channel sequence(s) supplied",
                    channels,
                    lengths.len()
                ),
            ));
        }
        warn!(
            requested = channels,
            supplied = lengths.len(),
            "channel count differs from planar input; extra channels dropped, missing channels silent"
        );
    }

    let natural_length = lengths.first().copied().unwrap_or(0);
    let used = &lengths[..channels.min(lengths.len())];
    if options.strict && used.iter().any(|&len| len != natural_length) {
        return Err(AudioBufferError::invalid_argument(
            "data",
            format!("channel sequences differ in length: {used:?}"),
        ));
    }

    Ok((channels, options.length.unwrap_or(natural_length)))
}

fn validate_host_limits(descriptor: &BufferDescriptor) -> AudioBufferResult<()> {
    if descriptor.number_of_channels > MAX_STRICT_CHANNELS {
        return Err(AudioBufferError::invalid_argument(
            "number_of_channels",
            format!(
                "{} exceeds the maximum of {}",
                descriptor.number_of_channels, MAX_STRICT_CHANNELS
            ),
        ));
    }
    if descriptor.length == 0 {
        return Err(AudioBufferError::invalid_argument(
            "length",
            "must be at least 1",
        ));
    }
    if !(MIN_STRICT_SAMPLE_RATE..=MAX_STRICT_SAMPLE_RATE).contains(&descriptor.sample_rate) {
        return Err(AudioBufferError::invalid_argument(
            "sample_rate",
            format!(
                "{} Hz is outside [{}, {}]",
                descriptor.sample_rate, MIN_STRICT_SAMPLE_RATE, MAX_STRICT_SAMPLE_RATE
            ),
        ));
    }
    Ok(())
}
