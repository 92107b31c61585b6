//! Filters an interleaved stereo stream by packing the left channel into
//! the real part and the right channel into the imaginary part of a single
//! complex convolution.

use convolver_rs::prelude::*;

fn main() {
    let block_size = 512;
    let sample_rate = 44100.0f32;

    let mut conv = ConvolutionComplexF32::new(block_size).unwrap();

    // Keep only the low band on both channels.
    let mut response = conv.new_frequency_response();
    response.fill(0.0);
    response.fill_band_hz(sample_rate, 41.2, 392.0, 1.0, 0.0);
    response.fill_band_hz(sample_rate, -392.0, -41.2, 1.0, 0.0);

    let mut kernel = conv.new_filter_kernel();
    kernel.set_frequency_response(&response);
    conv.set_filter_kernel(&mut kernel);

    // Simulated 16-bit PCM input: 110 Hz on the left, 1760 Hz on the right.
    let total_samples = sample_rate as usize;
    let pcm: Vec<i16> = (0..total_samples)
        .flat_map(|i| {
            let t = i as f32 / sample_rate;
            let left = 0.6 * (2.0 * std::f32::consts::PI * 110.0 * t).sin();
            let right = 0.6 * (2.0 * std::f32::consts::PI * 1760.0 * t).sin();
            [(left * 32767.0) as i16, (right * 32767.0) as i16]
        })
        .collect();

    let samples: Vec<f32> = pcm16_to_scalar(&pcm);
    let channels = deinterleave(&samples, 2);

    let mut out_left = Vec::with_capacity(total_samples);
    let mut out_right = Vec::with_capacity(total_samples);
    let mut block_left = vec![0.0f32; block_size];
    let mut block_right = vec![0.0f32; block_size];

    let blocks = total_samples / block_size;
    for block in 0..blocks {
        let range = block * block_size..(block + 1) * block_size;
        conv.convolve(
            &channels[0][range.clone()],
            &channels[1][range],
            &mut block_left,
            &mut block_right,
        );
        out_left.extend_from_slice(&block_left);
        out_right.extend_from_slice(&block_right);
    }

    conv.drain(&mut block_left, &mut block_right);
    out_left.extend_from_slice(&block_left);
    out_right.extend_from_slice(&block_right);

    // Back to interleaved 16-bit PCM.
    let interleaved = interleave(&[out_left.clone(), out_right.clone()]);
    let _pcm_out: Vec<i16> = scalar_to_pcm16(&interleaved);

    let steady = out_left.len() / 2;
    println!("110 Hz (passband) left RMS:  {:.4}", rms(&out_left[steady..]));
    println!("1760 Hz (stopband) right RMS: {:.4}", rms(&out_right[steady..]));
}

fn rms(samples: &[f32]) -> f32 {
    let power: f32 = samples.iter().map(|x| x * x).sum();
    (power / samples.len() as f32).sqrt()
}
