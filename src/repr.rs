//! Channel storage and the core [`AudioBuffer`] type.
//!
//! Every channel is held in a [`ChannelData`], which either owns its samples
//! (`ndarray::Array1`) or is a mutable view into storage owned by someone else
//! (`ndarray::ArrayViewMut1`). Views only come into existence when the caller
//! explicitly passes [`ChannelInput::View`](crate::ChannelInput::View); the
//! borrow shows up as the buffer's lifetime parameter, so a view-carrying
//! buffer can never outlive the storage it aliases. Buffers that own all of
//! their channels are `AudioBuffer<'static, F>`.
//!
//! # Examples
//!
//! ```rust
//! use audio_buffer::{AudioBuffer, ChannelInput};
//! use ndarray::s;
//!
//! let mut source = AudioBuffer::<f32>::from_samples(1, &[0.0, 0.1, 0.2, 0.3]).unwrap();
//! {
//!     let window = source.channel_data_mut(0).unwrap().slice_move(s![1..2]);
//!     let mut view = AudioBuffer::from_channels(vec![ChannelInput::View(window)]).unwrap();
//!     assert!(view.is_view(0).unwrap());
//!     view.channel_data_mut(0).unwrap()[0] = 0.4;
//! }
//! assert_eq!(source.channel_data(0).unwrap().to_vec(), vec![0.0, 0.4, 0.2, 0.3]);
//! ```

use ndarray::{Array1, ArrayView1, ArrayView2, ArrayViewMut1, s};
use tracing::{debug, trace, warn};

use crate::conversions::{decode_bytes, deinterleave, fit, interleave, split_blocks, to_bytes};
use crate::resolver::{BufferDescriptor, BufferOptions, BufferSource, ChannelInput, resolve};
use crate::utils::samples_to_seconds;
use crate::{
    AudioBufferError, AudioBufferResult, BufferBuilder, ChannelBuffer, ChannelLayout,
    DEFAULT_LENGTH, DEFAULT_NUMBER_OF_CHANNELS, DEFAULT_SAMPLE_RATE, RealFloat, SampleFormat,
};

#[derive(Debug)]
pub(crate) enum ChannelRepr<'a, F: RealFloat> {
    Borrowed(ArrayViewMut1<'a, F>),
    Owned(Array1<F>),
}

/// Sample storage for a single channel.
///
/// Equality compares samples only, so a view equals an owned copy of it.
#[derive(Debug)]
pub struct ChannelData<'a, F: RealFloat>(ChannelRepr<'a, F>);

impl<'a, F: RealFloat> ChannelData<'a, F> {
    /// Create ChannelData that owns its samples.
    pub const fn from_owned(samples: Array1<F>) -> Self {
        ChannelData(ChannelRepr::Owned(samples))
    }

    /// Create ChannelData that aliases the given storage.
    pub const fn from_view(view: ArrayViewMut1<'a, F>) -> Self {
        ChannelData(ChannelRepr::Borrowed(view))
    }

    /// Silent channel of the given length.
    pub fn zeros(length: usize) -> Self {
        Self::from_owned(Array1::zeros(length))
    }

    /// Number of samples in the channel.
    #[inline]
    pub fn len(&self) -> usize {
        self.view().len()
    }

    /// Returns true if the channel holds no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the channel aliases storage it does not own.
    #[inline]
    pub const fn is_view(&self) -> bool {
        matches!(self.0, ChannelRepr::Borrowed(_))
    }

    /// Read view of the samples.
    #[inline]
    pub fn view(&self) -> ArrayView1<'_, F> {
        match &self.0 {
            ChannelRepr::Borrowed(v) => v.view(),
            ChannelRepr::Owned(a) => a.view(),
        }
    }

    /// Mutable view of the samples. Writes reach aliased storage for views.
    #[inline]
    pub fn view_mut(&mut self) -> ArrayViewMut1<'_, F> {
        match &mut self.0 {
            ChannelRepr::Borrowed(v) => v.view_mut(),
            ChannelRepr::Owned(a) => a.view_mut(),
        }
    }

    /// Copies a view into owned storage; owned channels are moved as-is.
    pub fn into_owned<'b>(self) -> ChannelData<'b, F> {
        match self.0 {
            ChannelRepr::Borrowed(v) => ChannelData(ChannelRepr::Owned(v.to_owned())),
            ChannelRepr::Owned(a) => ChannelData(ChannelRepr::Owned(a)),
        }
    }
}

impl<'b, F: RealFloat> PartialEq<ChannelData<'b, F>> for ChannelData<'_, F> {
    fn eq(&self, other: &ChannelData<'b, F>) -> bool {
        self.view() == other.view()
    }
}

impl<F: RealFloat> Clone for ChannelData<'_, F> {
    fn clone(&self) -> Self {
        ChannelData::from_owned(self.view().to_owned())
    }
}

/// A multichannel buffer of planar floating-point samples.
///
/// Shape (channel count, length, sample rate) is fixed at construction; sample
/// values are freely mutable. `F` is the storage type, `f32` unless stated.
///
/// # Examples
/// ```
/// use audio_buffer::AudioBuffer;
///
/// let buffer = AudioBuffer::<f32>::from_samples(1, &vec![0.0; 441]).unwrap();
/// assert_eq!(buffer.number_of_channels(), 1);
/// assert_eq!(buffer.length(), 441);
/// assert_eq!(buffer.duration(), 0.01);
/// ```
#[derive(Debug)]
pub struct AudioBuffer<'a, F: RealFloat = f32> {
    channels: Vec<ChannelData<'a, F>>,
    length: usize,
    sample_rate: f64,
}

impl<'a, F: RealFloat> AudioBuffer<'a, F> {
    /// Creates a buffer from constructor arguments.
    ///
    /// The arguments are resolved into a [`BufferDescriptor`] first (see
    /// [`resolve`]), then the channel storage is allocated from `source`.
    ///
    /// # Arguments
    /// * `number_of_channels` - Positional channel count, if one was given
    /// * `source` - The data to build the channels from
    /// * `options` - Explicit options, overriding positional and inferred values
    ///
    /// # Errors
    /// Returns [`AudioBufferError::InvalidArgument`] when the arguments cannot be
    /// resolved into a valid shape.
    ///
    /// # Examples
    /// ```
    /// use audio_buffer::{AudioBuffer, BufferOptions, BufferSource};
    ///
    /// let samples = vec![0.0f32; 12];
    /// let buffer = AudioBuffer::new(Some(3), BufferSource::Samples(&samples[..]), BufferOptions::default()).unwrap();
    /// assert_eq!(buffer.length(), 4);
    /// ```
    pub fn new(
        number_of_channels: Option<usize>,
        source: BufferSource<'a, F>,
        options: BufferOptions,
    ) -> AudioBufferResult<Self> {
        let descriptor = resolve(number_of_channels, &source, &options)?;
        Self::allocate(descriptor, source, &options)
    }

    /// Starts an order-flexible [`BufferBuilder`].
    pub fn builder() -> BufferBuilder<'a, F> {
        BufferBuilder::new()
    }

    /// Creates a silent buffer.
    ///
    /// # Errors
    /// Returns [`AudioBufferError::InvalidArgument`] for zero channels or an
    /// invalid sample rate.
    pub fn silence(
        number_of_channels: usize,
        length: usize,
        sample_rate: f64,
    ) -> AudioBufferResult<Self> {
        Self::new(
            Some(number_of_channels),
            BufferSource::Length(length),
            BufferOptions::with_sample_rate(sample_rate),
        )
    }

    /// Creates a buffer with one channel per input, at the default sample rate.
    ///
    /// Channels are padded or truncated to the first input's length.
    ///
    /// # Errors
    /// Returns [`AudioBufferError::InvalidArgument`] if `channels` is empty.
    pub fn from_channels(channels: Vec<ChannelInput<'a, F>>) -> AudioBufferResult<Self> {
        Self::new(None, BufferSource::Channels(channels), BufferOptions::default())
    }

    /// Allocates channel storage for a resolved descriptor.
    fn allocate(
        descriptor: BufferDescriptor,
        source: BufferSource<'a, F>,
        options: &BufferOptions,
    ) -> AudioBufferResult<Self> {
        let BufferDescriptor {
            number_of_channels,
            length,
            sample_rate,
        } = descriptor;
        debug!(
            source = source.kind(),
            number_of_channels, length, "allocating channel storage"
        );

        let channels = match source {
            BufferSource::Empty | BufferSource::Length(_) => (0..number_of_channels)
                .map(|_| ChannelData::zeros(length))
                .collect(),
            BufferSource::Samples(samples) => {
                split_flat(samples, number_of_channels, length, options.layout)
            }
            BufferSource::Bytes(bytes) => {
                let format = options.sample_format.unwrap_or(F::FORMAT);
                let samples = decode_bytes::<F>(bytes, format)?;
                split_flat(&samples, number_of_channels, length, options.layout)
            }
            BufferSource::Channels(inputs) => {
                planar_channels(inputs, number_of_channels, length, options.strict)
            }
            BufferSource::Grid(grid) => pad_channels(
                grid.rows()
                    .into_iter()
                    .take(number_of_channels)
                    .map(|row| ChannelData::from_owned(fit(row, length)))
                    .collect(),
                number_of_channels,
                length,
            ),
            BufferSource::Buffer(buffer) => {
                let available = buffer.number_of_channels().min(number_of_channels);
                let copied = (0..available)
                    .map(|channel| {
                        buffer
                            .channel_data(channel)
                            .map(|samples| ChannelData::from_owned(fit(samples, length)))
                    })
                    .collect::<AudioBufferResult<Vec<_>>>()?;
                pad_channels(copied, number_of_channels, length)
            }
        };

        Ok(Self {
            channels,
            length,
            sample_rate,
        })
    }

    /// Returns the number of channels.
    #[inline]
    pub fn number_of_channels(&self) -> usize {
        self.channels.len()
    }

    /// Returns the number of samples per channel.
    #[inline]
    pub const fn length(&self) -> usize {
        self.length
    }

    /// Returns the sample rate in Hz.
    #[inline]
    pub const fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Returns the duration in seconds, `length / sample_rate`.
    #[inline]
    pub fn duration(&self) -> f64 {
        samples_to_seconds(self.length, self.sample_rate)
    }

    /// Returns the shape of this buffer.
    pub fn descriptor(&self) -> BufferDescriptor {
        BufferDescriptor {
            number_of_channels: self.number_of_channels(),
            length: self.length,
            sample_rate: self.sample_rate,
        }
    }

    fn channel(&self, index: usize) -> AudioBufferResult<&ChannelData<'a, F>> {
        let number_of_channels = self.channels.len();
        self.channels
            .get(index)
            .ok_or(AudioBufferError::index_out_of_range(index, number_of_channels))
    }

    fn channel_mut(&mut self, index: usize) -> AudioBufferResult<&mut ChannelData<'a, F>> {
        let number_of_channels = self.channels.len();
        self.channels
            .get_mut(index)
            .ok_or(AudioBufferError::index_out_of_range(index, number_of_channels))
    }

    /// Returns a live read view of one channel.
    ///
    /// The view is the backing storage, not a copy; repeated calls observe the
    /// same samples.
    ///
    /// # Errors
    /// Returns [`AudioBufferError::IndexOutOfRange`] if `channel` is not below
    /// [`number_of_channels`](Self::number_of_channels).
    pub fn channel_data(&self, channel: usize) -> AudioBufferResult<ArrayView1<'_, F>> {
        Ok(self.channel(channel)?.view())
    }

    /// Returns a live mutable view of one channel.
    ///
    /// # Errors
    /// Returns [`AudioBufferError::IndexOutOfRange`] if `channel` is not below
    /// [`number_of_channels`](Self::number_of_channels).
    pub fn channel_data_mut(&mut self, channel: usize) -> AudioBufferResult<ArrayViewMut1<'_, F>> {
        Ok(self.channel_mut(channel)?.view_mut())
    }

    /// Iterates over read views of every channel, in order.
    pub fn channels(&self) -> impl Iterator<Item = ArrayView1<'_, F>> + '_ {
        self.channels.iter().map(ChannelData::view)
    }

    /// Returns true if the given channel aliases storage owned elsewhere.
    ///
    /// # Errors
    /// Returns [`AudioBufferError::IndexOutOfRange`] for an invalid channel.
    pub fn is_view(&self, channel: usize) -> AudioBufferResult<bool> {
        Ok(self.channel(channel)?.is_view())
    }

    /// Copies samples from `source` into a channel, starting at `start_offset`.
    ///
    /// Writes `min(source.len(), length - start_offset)` samples; the copy is
    /// silently truncated at the end of the channel and an offset at or past the
    /// end copies nothing. Samples outside the written range are untouched.
    ///
    /// # Errors
    /// Returns [`AudioBufferError::IndexOutOfRange`] for an invalid channel.
    ///
    /// # Examples
    /// ```
    /// use audio_buffer::AudioBuffer;
    ///
    /// let mut buffer = AudioBuffer::<f32>::silence(1, 4, 44_100.0).unwrap();
    /// buffer.copy_to_channel(&[1.0, 2.0, 3.0], 0, 2).unwrap();
    /// assert_eq!(buffer.channel_data(0).unwrap().to_vec(), vec![0.0, 0.0, 1.0, 2.0]);
    /// ```
    pub fn copy_to_channel(
        &mut self,
        source: &[F],
        channel: usize,
        start_offset: usize,
    ) -> AudioBufferResult<()> {
        let count = source.len().min(self.length.saturating_sub(start_offset));
        let target = self.channel_mut(channel)?;
        if count < source.len() {
            trace!(
                channel,
                start_offset,
                requested = source.len(),
                copied = count,
                "copy_to_channel clamped to buffer length"
            );
        }
        if count == 0 {
            return Ok(());
        }
        target
            .view_mut()
            .slice_mut(s![start_offset..start_offset + count])
            .assign(&ArrayView1::from(&source[..count]));
        Ok(())
    }

    /// Copies samples from a channel, starting at `start_offset`, into `destination`.
    ///
    /// Writes `min(destination.len(), length - start_offset)` samples to the front
    /// of `destination`; the rest of `destination` is untouched.
    ///
    /// # Errors
    /// Returns [`AudioBufferError::IndexOutOfRange`] for an invalid channel.
    pub fn copy_from_channel(
        &self,
        destination: &mut [F],
        channel: usize,
        start_offset: usize,
    ) -> AudioBufferResult<()> {
        let samples = self.channel(channel)?.view();
        let count = destination
            .len()
            .min(self.length.saturating_sub(start_offset));
        if count < destination.len() {
            trace!(
                channel,
                start_offset,
                requested = destination.len(),
                copied = count,
                "copy_from_channel clamped to buffer length"
            );
        }
        if count == 0 {
            return Ok(());
        }
        ArrayViewMut1::from(&mut destination[..count])
            .assign(&samples.slice(s![start_offset..start_offset + count]));
        Ok(())
    }

    /// Detaches this buffer from any aliased storage by copying its views.
    pub fn into_owned(self) -> AudioBuffer<'static, F> {
        AudioBuffer {
            channels: self
                .channels
                .into_iter()
                .map(ChannelData::into_owned)
                .collect(),
            length: self.length,
            sample_rate: self.sample_rate,
        }
    }

    /// Returns the samples frame by frame (`c0[0], c1[0], ..., c0[1], ...`).
    pub fn to_interleaved_vec(&self) -> Vec<F> {
        interleave(self.channels())
    }

    /// Returns the interleaved samples as native-endian bytes.
    ///
    /// Feeding the result back through [`AudioBuffer::from_bytes`] with
    /// `F::FORMAT` reproduces the buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        to_bytes(&self.to_interleaved_vec())
    }
}

/// Constructors that copy their input and so never borrow from it.
impl<F: RealFloat> AudioBuffer<'static, F> {
    /// Creates a buffer from interleaved samples at the default sample rate.
    ///
    /// The length is `samples.len() / number_of_channels`, rounded down.
    ///
    /// # Errors
    /// Returns [`AudioBufferError::InvalidArgument`] for zero channels.
    pub fn from_samples(number_of_channels: usize, samples: &[F]) -> AudioBufferResult<Self> {
        AudioBuffer::new(
            Some(number_of_channels),
            BufferSource::Samples(samples),
            BufferOptions::default(),
        )
        .map(AudioBuffer::into_owned)
    }

    /// Creates a buffer from a grid with one row per channel, at the default sample rate.
    ///
    /// # Errors
    /// Returns [`AudioBufferError::InvalidArgument`] if the grid has no rows.
    pub fn from_grid(grid: ArrayView2<'_, F>) -> AudioBufferResult<Self> {
        AudioBuffer::new(None, BufferSource::Grid(grid), BufferOptions::default())
            .map(AudioBuffer::into_owned)
    }

    /// Creates a buffer from packed interleaved samples of the given format.
    ///
    /// # Errors
    /// Returns [`AudioBufferError::InvalidArgument`] if `bytes` is not a whole
    /// number of frames.
    pub fn from_bytes(
        number_of_channels: usize,
        bytes: &[u8],
        format: SampleFormat,
    ) -> AudioBufferResult<Self> {
        let options = BufferOptions {
            sample_format: Some(format),
            ..BufferOptions::default()
        };
        AudioBuffer::new(Some(number_of_channels), BufferSource::Bytes(bytes), options)
            .map(AudioBuffer::into_owned)
    }

    /// Creates an independent copy of any channel-bearing buffer.
    ///
    /// # Errors
    /// Returns [`AudioBufferError::InvalidArgument`] if the source reports an
    /// invalid shape, or whatever error its channel accessor returns.
    pub fn from_buffer(buffer: &dyn ChannelBuffer<F>) -> AudioBufferResult<Self> {
        AudioBuffer::new(None, BufferSource::Buffer(buffer), BufferOptions::default())
            .map(AudioBuffer::into_owned)
    }
}

/// Buffers are equal when their shape and samples match, whether or not the
/// channels are views.
impl<'b, F: RealFloat> PartialEq<AudioBuffer<'b, F>> for AudioBuffer<'_, F> {
    fn eq(&self, other: &AudioBuffer<'b, F>) -> bool {
        self.length == other.length
            && self.sample_rate == other.sample_rate
            && self.channels.len() == other.channels.len()
            && self
                .channels
                .iter()
                .zip(&other.channels)
                .all(|(a, b)| a == b)
    }
}

impl<F: RealFloat> Default for AudioBuffer<'_, F> {
    /// A two-channel buffer of one silent sample at the default rate.
    fn default() -> Self {
        Self {
            channels: (0..DEFAULT_NUMBER_OF_CHANNELS)
                .map(|_| ChannelData::zeros(DEFAULT_LENGTH))
                .collect(),
            length: DEFAULT_LENGTH,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

impl<F: RealFloat> Clone for AudioBuffer<'_, F> {
    /// Clones into owned storage; views are copied, never shared.
    fn clone(&self) -> Self {
        Self {
            channels: self.channels.clone(),
            length: self.length,
            sample_rate: self.sample_rate,
        }
    }
}

impl<F: RealFloat> ChannelBuffer<F> for AudioBuffer<'_, F> {
    fn number_of_channels(&self) -> usize {
        AudioBuffer::number_of_channels(self)
    }

    fn length(&self) -> usize {
        self.length
    }

    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn channel_data(&self, channel: usize) -> AudioBufferResult<ArrayView1<'_, F>> {
        AudioBuffer::channel_data(self, channel)
    }
}

fn split_flat<'a, F: RealFloat>(
    samples: &[F],
    number_of_channels: usize,
    length: usize,
    layout: ChannelLayout,
) -> Vec<ChannelData<'a, F>> {
    let planes = match layout {
        ChannelLayout::Interleaved => deinterleave(samples, number_of_channels, length),
        ChannelLayout::NonInterleaved => split_blocks(samples, number_of_channels, length),
    };
    planes.into_iter().map(ChannelData::from_owned).collect()
}

fn planar_channels<'a, F: RealFloat>(
    inputs: Vec<ChannelInput<'a, F>>,
    number_of_channels: usize,
    length: usize,
    strict: bool,
) -> Vec<ChannelData<'a, F>> {
    let channels = inputs
        .into_iter()
        .take(number_of_channels)
        .enumerate()
        .map(|(index, input)| match input {
            ChannelInput::Copy(samples) => ChannelData::from_owned(fit(samples, length)),
            ChannelInput::View(view) if strict => ChannelData::from_owned(fit(view.view(), length)),
            ChannelInput::View(view) if view.len() >= length => {
                ChannelData::from_view(view.slice_move(s![..length]))
            }
            ChannelInput::View(view) => {
                warn!(
                    channel = index,
                    view_length = view.len(),
                    length,
                    "channel view shorter than buffer length; copying into padded storage"
                );
                ChannelData::from_owned(fit(view.view(), length))
            }
        })
        .collect();
    pad_channels(channels, number_of_channels, length)
}

/// Appends silent channels until there are `number_of_channels`.
fn pad_channels<F: RealFloat>(
    mut channels: Vec<ChannelData<'_, F>>,
    number_of_channels: usize,
    length: usize,
) -> Vec<ChannelData<'_, F>> {
    channels.resize_with(number_of_channels, || ChannelData::zeros(length));
    channels
}
