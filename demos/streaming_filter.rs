use convolver_rs::prelude::*;

fn main() {
    let block_size = 1024;
    let sample_rate = 44100.0f32;

    println!("Streaming FFT convolution demo");
    println!("Block size: {} real samples\n", block_size);

    let mut conv = ConvolutionRealF32::new(block_size).unwrap();

    // Band-pass 200..2000 Hz: zero the response, then raise both sidebands.
    let mut response = conv.new_frequency_response();
    response.fill(0.0);
    response.fill_band_hz(sample_rate, 200.0, 2000.0, 1.0, 0.0);
    response.fill_band_hz(sample_rate, -2000.0, -200.0, 1.0, 0.0);

    let mut kernel = conv.new_filter_kernel();
    kernel.set_frequency_response(&response);
    conv.set_filter_kernel(&mut kernel);

    // Two seconds of chirp sweeping from 50 Hz to 5 kHz.
    let total_samples = (sample_rate as usize) * 2;
    let audio: Vec<f32> = (0..total_samples)
        .map(|i| {
            let t = i as f32 / sample_rate;
            let freq = 50.0 + 2475.0 * t;
            0.5 * (2.0 * std::f32::consts::PI * freq * t).sin()
        })
        .collect();

    let mut output = vec![0.0f32; block_size];
    let mut blocks_processed = 0;

    for block in audio.chunks_exact(block_size) {
        conv.convolve(block, &mut output);
        blocks_processed += 1;

        if blocks_processed % 8 == 0 {
            let in_rms = rms(block);
            let out_rms = rms(&output);
            let t = blocks_processed * block_size;
            println!(
                "t = {:.2}s  sweep at {:>6.0} Hz  in {:.3}  out {:.3}",
                t as f32 / sample_rate,
                50.0 + 2475.0 * (t as f32 / sample_rate),
                in_rms,
                out_rms
            );
        }
    }

    let mut tail = vec![0.0f32; block_size / 2];
    conv.drain(&mut tail);

    println!(
        "\nProcessed {} blocks, drained {} tail samples",
        blocks_processed,
        tail.len()
    );
}

fn rms(samples: &[f32]) -> f32 {
    let power: f32 = samples.iter().map(|x| x * x).sum();
    (power / samples.len() as f32).sqrt()
}
