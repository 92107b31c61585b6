mod common;

use convolver_rs::prelude::*;

fn noise_f64(len: usize, mut seed: u64) -> Vec<f64> {
    (0..len)
        .map(|_| {
            seed = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (seed >> 33) as f64 / (1u64 << 31) as f64 - 1.0
        })
        .collect()
}

#[test]
fn test_rejects_non_power_of_two() {
    assert_eq!(
        FourierTransformF32::new(12, Scale::None).unwrap_err(),
        ConfigError::InvalidFftSize { size: 12 }
    );
    assert_eq!(
        FourierTransformF64::new(0, Scale::Both).unwrap_err(),
        ConfigError::InvalidFftSize { size: 0 }
    );
    assert!(FourierTransformF32::new(64, Scale::Inverse).is_ok());
}

#[test]
fn test_impulse_has_flat_spectrum() {
    let n = 16;
    let fft = FourierTransformF64::new(n, Scale::None).unwrap();

    let mut input = ComplexBufferF64::new(n);
    input.real[0] = 1.0;
    let mut output = ComplexBufferF64::new(n);

    fft.forward(&input, &mut output);

    for k in 0..n {
        assert!((output.real[k] - 1.0).abs() < 1e-12, "bin {}", k);
        assert!(output.imag[k].abs() < 1e-12, "bin {}", k);
    }
}

#[test]
fn test_single_tone_lands_in_its_bin() {
    let n = 64;
    let fft = FourierTransformF64::new(n, Scale::None).unwrap();

    // cos(2*pi*5*t/64) concentrates in bins 5 and 59 with amplitude n/2.
    let mut input = ComplexBufferF64::new(n);
    for i in 0..n {
        input.real[i] = (2.0 * std::f64::consts::PI * 5.0 * i as f64 / n as f64).cos();
    }
    let mut output = ComplexBufferF64::new(n);

    fft.forward(&input, &mut output);

    for k in 0..n {
        let expected = if k == 5 || k == n - 5 { n as f64 / 2.0 } else { 0.0 };
        assert!(
            (output.real[k] - expected).abs() < 1e-9,
            "bin {}: {}",
            k,
            output.real[k]
        );
        assert!(output.imag[k].abs() < 1e-9, "bin {}", k);
    }
}

#[test]
fn test_roundtrip_both_scaling_f64() {
    let n = 256;
    let fft = FourierTransformF64::new(n, Scale::Both).unwrap();

    let input = ComplexBufferF64::from_parts(noise_f64(n, 1), noise_f64(n, 2));
    let mut spectrum = ComplexBufferF64::new(n);
    let mut back = ComplexBufferF64::new(n);

    fft.forward(&input, &mut spectrum);
    fft.inverse(&spectrum, &mut back);

    for i in 0..n {
        assert!((input.real[i] - back.real[i]).abs() < 1e-12, "sample {}", i);
        assert!((input.imag[i] - back.imag[i]).abs() < 1e-12, "sample {}", i);
    }
}

#[test]
fn test_roundtrip_both_scaling_f32() {
    let n = 256;
    let fft = FourierTransformF32::new(n, Scale::Both).unwrap();

    let input = ComplexBufferF32::from_parts(common::noise(n, 3), common::noise(n, 4));
    let mut spectrum = ComplexBufferF32::new(n);
    let mut back = ComplexBufferF32::new(n);

    fft.forward(&input, &mut spectrum);
    fft.inverse(&spectrum, &mut back);

    for i in 0..n {
        assert!((input.real[i] - back.real[i]).abs() < 1e-5, "sample {}", i);
        assert!((input.imag[i] - back.imag[i]).abs() < 1e-5, "sample {}", i);
    }
}

#[test]
fn test_roundtrip_inverse_scaling() {
    // Scale::Inverse applies 1/n on the inverse only, so an unscaled
    // forward pass followed by an inverse pass restores the input.
    let n = 128;
    let fft = FourierTransformF64::new(n, Scale::Inverse).unwrap();

    let input = ComplexBufferF64::from_parts(noise_f64(n, 5), noise_f64(n, 6));
    let mut spectrum = ComplexBufferF64::new(n);
    let mut back = ComplexBufferF64::new(n);

    fft.forward(&input, &mut spectrum);
    fft.inverse(&spectrum, &mut back);

    for i in 0..n {
        assert!((input.real[i] - back.real[i]).abs() < 1e-12, "sample {}", i);
    }
}

#[test]
fn test_parseval() {
    // For the raw transform, sum |x|^2 == sum |X|^2 / n.
    let n = 512;
    let fft = FourierTransformF64::new(n, Scale::None).unwrap();

    let input = ComplexBufferF64::from_parts(noise_f64(n, 7), noise_f64(n, 8));
    let mut spectrum = ComplexBufferF64::new(n);
    fft.forward(&input, &mut spectrum);

    let time_energy: f64 = (0..n).map(|i| input.squared(i)).sum();
    let freq_energy: f64 = (0..n).map(|k| spectrum.squared(k)).sum();

    assert!(
        (time_energy - freq_energy / n as f64).abs() < 1e-9 * time_energy,
        "time {} freq/n {}",
        time_energy,
        freq_energy / n as f64
    );
}

#[test]
fn test_forward_scale_factor() {
    let n = 32;
    let fft = FourierTransformF64::new(n, Scale::Forward).unwrap();
    assert!((fft.scale_factor() - 1.0 / n as f64).abs() < 1e-15);

    // A scaled-forward transform of an impulse puts 1/n in every bin.
    let mut input = ComplexBufferF64::new(n);
    input.real[0] = 1.0;
    let mut output = ComplexBufferF64::new(n);
    fft.forward(&input, &mut output);

    for k in 0..n {
        assert!((output.real[k] - 1.0 / n as f64).abs() < 1e-14, "bin {}", k);
    }

    // The inverse direction of a Scale::Forward instance is unscaled.
    let mut back = ComplexBufferF64::new(n);
    fft.inverse(&output, &mut back);
    assert!((back.real[0] - 1.0).abs() < 1e-12);
}

#[test]
fn test_matches_rustfft_forward() {
    use rustfft::num_complex::Complex;
    use rustfft::FftPlanner;

    let n = 256;
    let real = noise_f64(n, 9);
    let imag = noise_f64(n, 10);

    let mut reference: Vec<Complex<f64>> = real
        .iter()
        .zip(imag.iter())
        .map(|(&re, &im)| Complex::new(re, im))
        .collect();
    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(n).process(&mut reference);

    let fft = FourierTransformF64::new(n, Scale::None).unwrap();
    let input = ComplexBufferF64::from_parts(real, imag);
    let mut output = ComplexBufferF64::new(n);
    fft.forward(&input, &mut output);

    for k in 0..n {
        assert!(
            (output.real[k] - reference[k].re).abs() < 1e-9,
            "bin {}: {} vs {}",
            k,
            output.real[k],
            reference[k].re
        );
        assert!(
            (output.imag[k] - reference[k].im).abs() < 1e-9,
            "bin {}: {} vs {}",
            k,
            output.imag[k],
            reference[k].im
        );
    }
}

#[test]
fn test_matches_rustfft_inverse() {
    use rustfft::num_complex::Complex;
    use rustfft::FftPlanner;

    let n = 128;
    let real = noise_f64(n, 11);
    let imag = noise_f64(n, 12);

    let mut reference: Vec<Complex<f64>> = real
        .iter()
        .zip(imag.iter())
        .map(|(&re, &im)| Complex::new(re, im))
        .collect();
    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_inverse(n).process(&mut reference);

    // rustfft's inverse is unnormalised, matching Scale::None.
    let fft = FourierTransformF64::new(n, Scale::None).unwrap();
    let input = ComplexBufferF64::from_parts(real, imag);
    let mut output = ComplexBufferF64::new(n);
    fft.inverse(&input, &mut output);

    for k in 0..n {
        assert!((output.real[k] - reference[k].re).abs() < 1e-9, "bin {}", k);
        assert!((output.imag[k] - reference[k].im).abs() < 1e-9, "bin {}", k);
    }
}

#[test]
fn test_transform_slices_on_longer_arrays() {
    // Arrays longer than the FFT size are allowed; the excess is ignored.
    let n = 8;
    let fft = FourierTransformF64::new(n, Scale::None).unwrap();

    let in_real = vec![1.0; n + 4];
    let in_imag = vec![0.0; n + 4];
    let mut out_real = vec![9.0; n + 4];
    let mut out_imag = vec![9.0; n + 4];

    fft.transform_slices(&in_real, &in_imag, &mut out_real, &mut out_imag, Direction::Forward);

    assert!((out_real[0] - n as f64).abs() < 1e-12);
    for k in 1..n {
        assert!(out_real[k].abs() < 1e-12, "bin {}", k);
    }
    // Samples past the transform size are untouched.
    assert_eq!(out_real[n], 9.0);
}

#[test]
#[should_panic(expected = "in_real must be at least size() long")]
fn test_short_input_rejected() {
    let fft = FourierTransformF32::new(16, Scale::None).unwrap();
    let in_real = vec![0.0f32; 8];
    let in_imag = vec![0.0f32; 16];
    let mut out_real = vec![0.0f32; 16];
    let mut out_imag = vec![0.0f32; 16];
    fft.transform_slices(&in_real, &in_imag, &mut out_real, &mut out_imag, Direction::Forward);
}
