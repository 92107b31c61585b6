//! Shared helpers for the integration tests.
#![allow(dead_code)]

pub fn calculate_snr(original: &[f32], processed: &[f32]) -> f32 {
    assert_eq!(original.len(), processed.len());

    let signal_power: f32 = original.iter().map(|x| x.powi(2)).sum();
    let noise_power: f32 = original
        .iter()
        .zip(processed.iter())
        .map(|(o, p)| (o - p).powi(2))
        .sum();

    if noise_power == 0.0 {
        f32::INFINITY
    } else {
        10.0 * (signal_power / noise_power).log10()
    }
}

pub fn max_abs_error(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .max_by(|x, y| x.partial_cmp(y).unwrap())
        .unwrap_or(0.0)
}

/// Reference time-domain linear convolution, truncated or zero-padded to
/// `out_len` samples.
pub fn linear_convolve(input: &[f32], ir: &[f32], out_len: usize) -> Vec<f32> {
    let mut output = vec![0.0f32; out_len];
    for (i, &x) in input.iter().enumerate() {
        for (j, &h) in ir.iter().enumerate() {
            if i + j < out_len {
                output[i + j] += x * h;
            }
        }
    }
    output
}

pub fn sine(len: usize, freq: f32, sample_rate: f32, amplitude: f32) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let t = i as f32 / sample_rate;
            amplitude * (2.0 * std::f32::consts::PI * freq * t).sin()
        })
        .collect()
}

pub fn rms(samples: &[f32]) -> f32 {
    let power: f32 = samples.iter().map(|x| x.powi(2)).sum();
    (power / samples.len() as f32).sqrt()
}

/// Deterministic pseudo-random samples in `-1.0..1.0`.
pub fn noise(len: usize, mut seed: u64) -> Vec<f32> {
    (0..len)
        .map(|_| {
            seed = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((seed >> 33) as f64 / (1u64 << 31) as f64 - 1.0) as f32
        })
        .collect()
}
