//! End-to-end construction scenarios exercising the resolver and the channel
//! store together.

use approx_eq::assert_approx_eq;
use ndarray::{Array2, array, s};

use crate::{
    AudioBuffer, AudioBufferError, BufferOptions, BufferSource, ChannelBuffer, ChannelInput,
    ChannelLayout, SampleFormat,
};

fn channel(buffer: &AudioBuffer<'_, f32>, index: usize) -> Vec<f32> {
    buffer.channel_data(index).unwrap().to_vec()
}

#[test]
fn test_from_flat_samples_default_stereo() {
    let samples = [0.0f32, 1.0, 0.0, 1.0, 0.0, 1.0];
    let buffer =
        AudioBuffer::<f32>::new(None, BufferSource::Samples(&samples), BufferOptions::default())
            .unwrap();

    assert_eq!(buffer.number_of_channels(), 2);
    assert_eq!(channel(&buffer, 0), vec![0.0, 0.0, 0.0]);
    assert_eq!(channel(&buffer, 1), vec![1.0, 1.0, 1.0]);
}

#[test]
fn test_from_flat_samples_non_interleaved() {
    let samples = [0.0f32, 1.0, 0.0, 1.0, 0.0, 1.0];
    let options = BufferOptions {
        layout: ChannelLayout::NonInterleaved,
        ..BufferOptions::default()
    };
    let buffer = AudioBuffer::<f32>::new(None, BufferSource::Samples(&samples), options).unwrap();

    assert_eq!(channel(&buffer, 0), vec![0.0, 1.0, 0.0]);
    assert_eq!(channel(&buffer, 1), vec![1.0, 0.0, 1.0]);
}

#[test]
fn test_from_flat_samples_three_channels() {
    let samples = [0.0f32, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0];
    let buffer = AudioBuffer::<f32>::from_samples(3, &samples).unwrap();

    assert_eq!(buffer.length(), 3);
    assert_eq!(channel(&buffer, 0), vec![0.0, 1.0, 0.0]);
    assert_eq!(channel(&buffer, 1), vec![1.0, 0.0, 1.0]);
    assert_eq!(channel(&buffer, 2), vec![0.0, 1.0, 0.0]);
}

#[test]
fn test_bare_length_is_silence() {
    let buffer =
        AudioBuffer::<f32>::new(None, BufferSource::Length(2), BufferOptions::default()).unwrap();
    assert_eq!(buffer.length(), 2);
    assert_eq!(buffer.number_of_channels(), 2);
    assert_eq!(channel(&buffer, 1), vec![0.0, 0.0]);
}

#[test]
fn test_minimal_buffer() {
    let buffer =
        AudioBuffer::<f32>::new(None, BufferSource::Empty, BufferOptions::default()).unwrap();
    assert_eq!(buffer.length(), 1);
    assert_eq!(buffer.number_of_channels(), 2);
    assert_eq!(buffer.sample_rate(), 44_100.0);
}

#[test]
fn test_from_bytes_interleaved() {
    let packed = [1.0f32, -1.0, 0.5, -0.5, -1.0, 0.5];
    let bytes: &[u8] = bytemuck::cast_slice(&packed);
    let buffer = AudioBuffer::<f32>::from_bytes(3, bytes, SampleFormat::F32).unwrap();

    assert_eq!(buffer.length(), 2);
    assert_eq!(channel(&buffer, 0), vec![1.0, -0.5]);
    assert_eq!(channel(&buffer, 1), vec![-1.0, -1.0]);
    assert_eq!(channel(&buffer, 2), vec![0.5, 0.5]);
}

#[test]
fn test_from_bytes_non_interleaved() {
    let packed = [1.0f32, -1.0, 0.5, -0.5, -1.0, 0.5];
    let bytes: &[u8] = bytemuck::cast_slice(&packed);
    let options = BufferOptions {
        sample_format: Some(SampleFormat::F32),
        layout: ChannelLayout::NonInterleaved,
        ..BufferOptions::default()
    };
    let buffer = AudioBuffer::<f32>::new(Some(3), BufferSource::Bytes(bytes), options).unwrap();

    assert_eq!(buffer.length(), 2);
    assert_eq!(channel(&buffer, 0), vec![1.0, -1.0]);
    assert_eq!(channel(&buffer, 1), vec![0.5, -0.5]);
    assert_eq!(channel(&buffer, 2), vec![-1.0, 0.5]);
}

#[test]
fn test_from_bytes_default_format_follows_storage() {
    let packed = [1.0f64, -1.0, 0.5, -0.5];
    let bytes: &[u8] = bytemuck::cast_slice(&packed);
    let buffer =
        AudioBuffer::<f64>::new(None, BufferSource::Bytes(bytes), BufferOptions::default())
            .unwrap();

    assert_eq!(buffer.length(), 2);
    assert_eq!(buffer.channel_data(0).unwrap().to_vec(), vec![1.0, 0.5]);
    assert_eq!(buffer.channel_data(1).unwrap().to_vec(), vec![-1.0, -0.5]);
}

#[test]
fn test_from_bytes_rejects_partial_frame() {
    let bytes = [0u8; 12];
    let err = AudioBuffer::<f32>::from_bytes(2, &bytes, SampleFormat::F32).unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn test_from_buffer_is_independent() {
    let mut original = AudioBuffer::<f32>::from_samples(2, &[1.0, 0.5, -1.0, -0.5]).unwrap();
    let first = AudioBuffer::<f32>::from_buffer(&original).unwrap();
    let second = AudioBuffer::<f32>::from_buffer(&original).unwrap();
    assert_eq!(channel(&second, 1), vec![0.5, -0.5]);

    original.channel_data_mut(0).unwrap()[0] = 0.0;
    assert_eq!(channel(&original, 0), vec![0.0, -1.0]);
    assert_eq!(channel(&first, 0), vec![1.0, -1.0]);
}

#[test]
fn test_clone_overrides_count_and_rate() {
    let original = AudioBuffer::<f32>::silence(3, 10, 3000.0).unwrap();
    let copy = AudioBuffer::<f32>::from_buffer(&original).unwrap();
    assert_eq!(copy.number_of_channels(), 3);
    assert_eq!(copy.sample_rate(), 3000.0);
    assert_eq!(copy.channel_data(2).unwrap(), original.channel_data(2).unwrap());

    let narrowed = AudioBuffer::<f32>::new(
        Some(2),
        BufferSource::Buffer(&original),
        BufferOptions::with_sample_rate(4000.0),
    )
    .unwrap();
    assert_eq!(narrowed.number_of_channels(), 2);
    assert_eq!(narrowed.sample_rate(), 4000.0);
    assert_eq!(narrowed.channel_data(1).unwrap(), original.channel_data(1).unwrap());
}

#[test]
fn test_from_grid() {
    let grid = Array2::from_shape_vec((2, 2), vec![1.0f32, -1.0, 0.5, -0.5]).unwrap();
    let buffer = AudioBuffer::from_grid(grid.view()).unwrap();
    assert_eq!(channel(&buffer, 0), vec![1.0, -1.0]);
    assert_eq!(channel(&buffer, 1), vec![0.5, -0.5]);
}

#[test]
fn test_from_channel_sequences() {
    let planes = [vec![1.0f32, -1.0], vec![0.5, -0.5], vec![-1.0, 0.5]];
    let inputs = || planes.iter().map(ChannelInput::<f32>::from).collect::<Vec<_>>();

    let two = AudioBuffer::new(Some(2), BufferSource::Channels(inputs()), BufferOptions::default())
        .unwrap();
    assert_eq!(two.number_of_channels(), 2);
    assert_eq!(channel(&two, 0), vec![1.0, -1.0]);
    assert_eq!(channel(&two, 1), vec![0.5, -0.5]);

    let three = AudioBuffer::from_channels(inputs()).unwrap();
    assert_eq!(three.number_of_channels(), 3);
    assert_eq!(channel(&three, 2), vec![-1.0, 0.5]);
}

#[test]
fn test_strict_rejects_channel_contradiction() {
    let planes = [vec![1.0f32, -1.0], vec![0.5, -0.5], vec![-1.0, 0.5]];
    let inputs = planes.iter().map(ChannelInput::<f32>::from).collect();
    let err = AudioBuffer::new(Some(2), BufferSource::Channels(inputs), BufferOptions::strict())
        .unwrap_err();
    assert!(matches!(
        err,
        AudioBufferError::InvalidArgument {
            argument: "number_of_channels",
            ..
        }
    ));
}

#[test]
fn test_subbuffer_aliases_parent() {
    let mut parent = AudioBuffer::<f32>::from_samples(1, &[0.0, 0.1, 0.2, 0.3]).unwrap();
    {
        let window = parent.channel_data_mut(0).unwrap().slice_move(s![1..2]);
        let mut child = AudioBuffer::new(
            Some(1),
            BufferSource::Channels(vec![ChannelInput::View(window)]),
            BufferOptions::default(),
        )
        .unwrap();
        assert_eq!(child.length(), 1);
        child.channel_data_mut(0).unwrap()[0] = 0.4;
    }
    assert_eq!(channel(&parent, 0), vec![0.0, 0.4, 0.2, 0.3]);
}

#[test]
fn test_duration() {
    let silent = vec![0.0f32; 441];
    let buffer = AudioBuffer::<f32>::from_samples(1, &silent).unwrap();
    assert_eq!(buffer.duration(), 0.01);
    assert_eq!(ChannelBuffer::duration(&buffer), 0.01);

    let doubled = AudioBuffer::<f32>::new(
        Some(1),
        BufferSource::Samples(&silent),
        BufferOptions::with_sample_rate(88_200.0),
    )
    .unwrap();
    assert_approx_eq!(doubled.duration(), 0.005, 1e-12);
}

#[test]
fn test_length_from_flat_input() {
    let samples = vec![0.0f32; 12];
    for (channels, expected) in [(1, 12), (2, 6), (3, 4), (4, 3), (6, 2)] {
        let buffer = AudioBuffer::<f32>::from_samples(channels, &samples).unwrap();
        assert_eq!(buffer.length(), expected, "{channels} channel(s)");
    }
}

#[test]
fn test_flat_input_remainder_is_dropped() {
    let samples = [1.0f32, 2.0, 3.0, 4.0, 5.0];
    let buffer = AudioBuffer::<f32>::from_samples(2, &samples).unwrap();
    assert_eq!(buffer.length(), 2);
    assert_eq!(channel(&buffer, 0), vec![1.0, 3.0]);
    assert_eq!(channel(&buffer, 1), vec![2.0, 4.0]);
}

#[test]
fn test_channel_data_of_silent_input() {
    let buffer = AudioBuffer::<f32>::from_samples(1, &[0.0; 4]).unwrap();
    assert_eq!(buffer.channel_data(0).unwrap(), array![0.0, 0.0, 0.0, 0.0]);
}

#[test]
fn test_channel_data_is_idempotent() {
    let mut buffer = AudioBuffer::<f32>::silence(2, 3, 44_100.0).unwrap();
    buffer.channel_data_mut(1).unwrap()[2] = 0.75;
    let first = buffer.channel_data(1).unwrap().to_vec();
    let second = buffer.channel_data(1).unwrap().to_vec();
    assert_eq!(first, second);
    assert_eq!(buffer.channel_data(1).unwrap().as_ptr(), buffer.channel_data(1).unwrap().as_ptr());
}

#[test]
fn test_copy_to_channel_scenario() {
    let mut buffer =
        AudioBuffer::<f32>::new(Some(2), BufferSource::Length(40), BufferOptions::default())
            .unwrap();
    let mut source = vec![-0.5f32; 40];

    buffer.copy_to_channel(&source, 0, 0).unwrap();
    assert_eq!(channel(&buffer, 0), source);

    buffer.copy_to_channel(&source, 1, 10).unwrap();
    source[..10].fill(0.0);
    assert_eq!(channel(&buffer, 1), source);
}

#[test]
fn test_copy_from_channel_scenario() {
    let mut buffer = AudioBuffer::<f32>::silence(2, 40, 44_100.0).unwrap();
    buffer.channel_data_mut(0).unwrap().fill(-0.5);
    buffer.channel_data_mut(1).unwrap().fill(0.5);
    buffer
        .channel_data_mut(1)
        .unwrap()
        .slice_mut(s![20..])
        .fill(-0.5);

    let mut out = vec![0.0f32; 40];
    buffer.copy_from_channel(&mut out, 0, 0).unwrap();
    assert_eq!(out, channel(&buffer, 0));

    buffer.copy_from_channel(&mut out, 1, 10).unwrap();
    let mut fixture = vec![0.5f32; 10];
    fixture.extend(std::iter::repeat_n(-0.5f32, 30));
    assert_eq!(out, fixture);
}

#[test]
fn test_invalid_channel_index() {
    let buffer = AudioBuffer::<f32>::silence(2, 4, 44_100.0).unwrap();
    assert_eq!(
        buffer.channel_data(2).unwrap_err(),
        AudioBufferError::IndexOutOfRange {
            index: 2,
            number_of_channels: 2
        }
    );
}

#[test]
fn test_invalid_arguments() {
    assert!(
        AudioBuffer::<f32>::silence(0, 4, 44_100.0)
            .unwrap_err()
            .is_invalid_argument()
    );
    assert!(
        AudioBuffer::<f32>::silence(1, 4, -1.0)
            .unwrap_err()
            .is_invalid_argument()
    );
    assert!(
        AudioBuffer::<f32>::new(
            Some(33),
            BufferSource::Length(4),
            BufferOptions::strict()
        )
        .unwrap_err()
        .is_invalid_argument()
    );
}

#[test]
fn test_f64_storage() {
    let mut buffer = AudioBuffer::<f64>::silence(1, 3, 44_100.0).unwrap();
    buffer.copy_to_channel(&[0.1, 0.2, 0.3], 0, 0).unwrap();
    let total: f64 = buffer.channel_data(0).unwrap().sum();
    assert_approx_eq!(total, 0.6, 1e-12);
    assert_eq!(buffer.to_bytes().len(), 24);
}

#[test]
fn test_option_constructors() {
    let options = BufferOptions {
        strict: true,
        sample_rate: Some(48_000.0),
        ..BufferOptions::default()
    };
    assert!(options.strict);
    assert_eq!(BufferOptions::strict().sample_rate, None);
    assert_eq!(
        BufferOptions::with_sample_rate(48_000.0).sample_rate,
        options.sample_rate
    );
}
