//! # Sample layout conversions
//!
//! Helpers that move samples between the packed, flat and planar layouts an
//! [`AudioBuffer`](crate::AudioBuffer) is built from or exported to:
//!
//! - [`decode_bytes`] reads packed `f32`/`f64` samples out of a raw byte buffer,
//! - [`deinterleave`] splits a frame-ordered sequence into one plane per channel,
//! - [`split_blocks`] splits a channel-ordered (block) sequence into planes,
//! - [`interleave`] and [`to_bytes`] go the other way.
//!
//! Byte buffers use the platform's native byte order, the same convention as
//! typed-array views over an `ArrayBuffer`.

use bytemuck::Pod;
use ndarray::{Array1, ArrayView1, s};
use num_traits::ToPrimitive;

use crate::{AudioBufferError, AudioBufferResult, RealFloat, SampleFormat};

/// Decodes packed samples of the given format into the storage type `F`.
///
/// Trailing bytes that do not form a whole sample are ignored; callers that
/// need whole frames validate the byte length first.
///
/// # Errors
/// Returns [`AudioBufferError::InvalidArgument`] if a decoded sample cannot be
/// represented in `F`.
///
/// # Examples
/// ```
/// use audio_buffer::SampleFormat;
/// use audio_buffer::conversions::decode_bytes;
///
/// let bytes: &[u8] = bytemuck::cast_slice(&[1.0f64, -0.5]);
/// let samples: Vec<f32> = decode_bytes(bytes, SampleFormat::F64).unwrap();
/// assert_eq!(samples, vec![1.0, -0.5]);
/// ```
pub fn decode_bytes<F: RealFloat>(bytes: &[u8], format: SampleFormat) -> AudioBufferResult<Vec<F>> {
    match format {
        SampleFormat::F32 => decode_as::<f32, F>(bytes),
        SampleFormat::F64 => decode_as::<f64, F>(bytes),
    }
}

fn decode_as<S, F>(bytes: &[u8]) -> AudioBufferResult<Vec<F>>
where
    S: Pod + ToPrimitive,
    F: RealFloat,
{
    let width = std::mem::size_of::<S>();
    let whole = bytes.len() - bytes.len() % width;
    let bytes = &bytes[..whole];

    // Aligned input is reinterpreted in place; otherwise read sample by sample.
    match bytemuck::try_cast_slice::<u8, S>(bytes) {
        Ok(samples) => samples.iter().map(|&sample| cast_sample(sample)).collect(),
        Err(_) => bytes
            .chunks_exact(width)
            .map(|chunk| cast_sample(bytemuck::pod_read_unaligned::<S>(chunk)))
            .collect(),
    }
}

fn cast_sample<S: ToPrimitive, F: RealFloat>(sample: S) -> AudioBufferResult<F> {
    <F as num_traits::NumCast>::from(sample).ok_or_else(|| {
        AudioBufferError::invalid_argument(
            "data",
            format!(
                "sample is not representable as {}",
                std::any::type_name::<F>()
            ),
        )
    })
}

/// Splits frame-ordered samples into `number_of_channels` planes of `length`
/// samples each.
///
/// A read cursor advances one frame (one sample per channel) at a time.
/// Planes are zero-padded when the input holds fewer than `length` whole frames;
/// an incomplete trailing frame is dropped.
pub fn deinterleave<F: RealFloat>(
    samples: &[F],
    number_of_channels: usize,
    length: usize,
) -> Vec<Array1<F>> {
    let mut planes: Vec<Vec<F>> = (0..number_of_channels)
        .map(|_| Vec::with_capacity(length))
        .collect();

    if number_of_channels > 0 {
        for frame in samples.chunks_exact(number_of_channels).take(length) {
            for (plane, &sample) in planes.iter_mut().zip(frame) {
                plane.push(sample);
            }
        }
    }

    planes
        .into_iter()
        .map(|mut plane| {
            plane.resize(length, F::zero());
            Array1::from(plane)
        })
        .collect()
}

/// Splits channel-ordered samples (all of channel 0, then all of channel 1, ...)
/// into `number_of_channels` planes of `length` samples each.
///
/// Missing samples are zero-filled.
pub fn split_blocks<F: RealFloat>(
    samples: &[F],
    number_of_channels: usize,
    length: usize,
) -> Vec<Array1<F>> {
    (0..number_of_channels)
        .map(|channel| {
            let start = (channel * length).min(samples.len());
            let end = (start + length).min(samples.len());
            fit(ArrayView1::from(&samples[start..end]), length)
        })
        .collect()
}

/// Copies `samples` into a new plane of exactly `length` samples, truncating or
/// zero-padding as needed.
pub fn fit<F: RealFloat>(samples: ArrayView1<'_, F>, length: usize) -> Array1<F> {
    let mut plane = Array1::zeros(length);
    let count = samples.len().min(length);
    plane
        .slice_mut(s![..count])
        .assign(&samples.slice(s![..count]));
    plane
}

/// Interleaves equally long planes into a single frame-ordered vector.
///
/// Planes shorter than the first one are treated as zero-padded.
pub fn interleave<'p, F, I>(planes: I) -> Vec<F>
where
    F: RealFloat,
    I: IntoIterator<Item = ArrayView1<'p, F>>,
{
    let planes: Vec<ArrayView1<'p, F>> = planes.into_iter().collect();
    let length = planes.first().map_or(0, |plane| plane.len());

    let mut out = Vec::with_capacity(planes.len() * length);
    for frame in 0..length {
        for plane in &planes {
            out.push(plane.get(frame).copied().unwrap_or_else(F::zero));
        }
    }
    out
}

/// Serializes samples into native-endian bytes.
pub fn to_bytes<F: RealFloat>(samples: &[F]) -> Vec<u8> {
    Vec::from(bytemuck::cast_slice::<F, u8>(samples))
}
