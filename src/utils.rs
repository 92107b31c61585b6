/// Channel layout and sample format helpers for feeding the engines from
/// external signal sources.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use num_traits::ToPrimitive;

use crate::Scalar;

/// Split interleaved multi-channel data (`[L, R, L, R, ...]` for stereo)
/// into one `Vec` per channel.
///
/// # Panics
///
/// Panics if `num_channels` is zero or does not divide `data.len()`.
pub fn deinterleave<T: Scalar>(data: &[T], num_channels: usize) -> Vec<Vec<T>> {
    assert!(num_channels > 0, "deinterleave(): num_channels must be > 0");
    assert_eq!(
        data.len() % num_channels,
        0,
        "deinterleave(): data length must be divisible by num_channels"
    );

    let samples_per_channel = data.len() / num_channels;
    let mut channels = vec![Vec::with_capacity(samples_per_channel); num_channels];

    for (i, &sample) in data.iter().enumerate() {
        channels[i % num_channels].push(sample);
    }

    channels
}

/// Merge per-channel data back into interleaved layout.
///
/// # Panics
///
/// Panics if `channels` is empty or the channels have different lengths.
pub fn interleave<T: Scalar>(channels: &[Vec<T>]) -> Vec<T> {
    assert!(!channels.is_empty(), "interleave(): channels must not be empty");

    let samples_per_channel = channels[0].len();
    for channel in channels {
        assert_eq!(
            channel.len(),
            samples_per_channel,
            "interleave(): channels must have equal lengths"
        );
    }

    let mut data = Vec::with_capacity(channels.len() * samples_per_channel);
    for i in 0..samples_per_channel {
        for channel in channels {
            data.push(channel[i]);
        }
    }

    data
}

/// Convert signed 16-bit PCM samples to scalars in `-1.0..1.0`.
pub fn pcm16_to_scalar<T: Scalar>(samples: &[i16]) -> Vec<T> {
    let scale = T::from(1.0 / 32768.0).unwrap();
    samples
        .iter()
        .map(|&s| T::from_i16(s).unwrap() * scale)
        .collect()
}

/// Convert scalars back to signed 16-bit PCM, clamping to the valid range.
pub fn scalar_to_pcm16<T: Scalar>(samples: &[T]) -> Vec<i16> {
    let scale = T::from(32768.0).unwrap();
    let min = T::from(i16::MIN).unwrap();
    let max = T::from(i16::MAX).unwrap();

    samples
        .iter()
        .map(|&s| {
            let scaled = (s * scale).round().max(min).min(max);
            scaled.to_i16().unwrap()
        })
        .collect()
}
