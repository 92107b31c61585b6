/*MIT License

Copyright (c) 2026 convolver-rs contributors

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Fixed-size radix-2 decimation-in-time FFT.
//!
//! [`FourierTransform`] precomputes the bit-reversal permutation and the
//! half-length twiddle tables at construction, so a transform performs no
//! trigonometry and no allocation. Scaling is a property of the instance
//! ([`Scale`]) and is fused into the bit-reversed copy, the only pass that
//! multiplies every sample anyway.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::buffer::ComplexBuffer;
use crate::{ConfigError, Scalar};

/// How transforms of a [`FourierTransform`] instance are scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scale {
    /// No scaling, raw transform in both directions.
    None,
    /// Scale the forward transform by `1 / size`.
    Forward,
    /// Scale the inverse transform by `1 / size`.
    Inverse,
    /// Symmetrical scaling, `1 / sqrt(size)` in both directions.
    Both,
}

/// Transform direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Inverse,
}

/// Radix-2 decimation-in-time FFT of a fixed power-of-two size.
///
/// The lookup tables are immutable after construction, so one instance can
/// be shared read-only between engines (and threads).
#[derive(Debug, Clone)]
pub struct FourierTransform<T> {
    size: usize,
    log2_size: usize,
    scale: Scale,
    scale_factor: T,
    reversed: Vec<usize>,
    twiddle_real: Vec<T>,
    twiddle_imag: Vec<T>,
}

impl<T: Scalar> FourierTransform<T> {
    /// Create a transform for `size` samples with the given [`Scale`].
    ///
    /// Returns [`ConfigError::InvalidFftSize`] unless `size` is a power of
    /// two.
    pub fn new(size: usize, scale: Scale) -> Result<Self, ConfigError> {
        if !size.is_power_of_two() {
            return Err(ConfigError::InvalidFftSize { size });
        }

        let log2_size = size.trailing_zeros() as usize;

        let scale_factor = match scale {
            Scale::None => T::one(),
            Scale::Forward | Scale::Inverse => T::one() / T::from_usize(size).unwrap(),
            Scale::Both => T::one() / T::from_usize(size).unwrap().sqrt(),
        };

        let mut reversed = vec![0usize; size];
        for (i, slot) in reversed.iter_mut().enumerate() {
            let mut r = 0usize;
            for bit in 0..log2_size {
                if i & (1 << bit) != 0 {
                    r |= 1 << (log2_size - 1 - bit);
                }
            }
            *slot = r;
        }

        let half = size / 2;
        let mut twiddle_real = Vec::with_capacity(half);
        let mut twiddle_imag = Vec::with_capacity(half);
        let minus_two_pi = T::from(-2.0 * core::f64::consts::PI).unwrap();
        let size_t = T::from_usize(size).unwrap();
        for i in 0..half {
            let angle = minus_two_pi * T::from_usize(i).unwrap() / size_t;
            twiddle_real.push(angle.cos());
            twiddle_imag.push(angle.sin());
        }

        Ok(Self {
            size,
            log2_size,
            scale,
            scale_factor,
            reversed,
            twiddle_real,
            twiddle_imag,
        })
    }

    /// The number of samples processed per transform.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The [`Scale`] this instance was constructed with.
    #[inline]
    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// The scale factor applied in (scaled) transforms.
    #[inline]
    pub fn scale_factor(&self) -> T {
        self.scale_factor
    }

    /// Transform `input` into `output`.
    ///
    /// Both buffers must be at least [`size()`](Self::size) long. Input and
    /// output storage is necessarily disjoint here; the borrow checker
    /// rejects passing one buffer as both arguments.
    pub fn transform(&self, input: &ComplexBuffer<T>, output: &mut ComplexBuffer<T>, direction: Direction) {
        self.transform_slices(&input.real, &input.imag, &mut output.real, &mut output.imag, direction);
    }

    /// Forward transform, `output[k] = scale * sum x[n] * exp(-2*pi*j*k*n / size)`.
    pub fn forward(&self, input: &ComplexBuffer<T>, output: &mut ComplexBuffer<T>) {
        self.transform(input, output, Direction::Forward);
    }

    /// Inverse transform (conjugated twiddles).
    pub fn inverse(&self, input: &ComplexBuffer<T>, output: &mut ComplexBuffer<T>) {
        self.transform(input, output, Direction::Inverse);
    }

    /// Transform raw channel slices.
    ///
    /// All four slices must be at least [`size()`](Self::size) long. As
    /// with [`transform`](Self::transform), a channel cannot be its own
    /// output: `&`/`&mut` exclusivity rules out same-slice aliasing.
    pub fn transform_slices(
        &self,
        in_real: &[T],
        in_imag: &[T],
        out_real: &mut [T],
        out_imag: &mut [T],
        direction: Direction,
    ) {
        assert!(
            in_real.len() >= self.size,
            "FourierTransform::transform(): in_real must be at least size() long"
        );
        assert!(
            in_imag.len() >= self.size,
            "FourierTransform::transform(): in_imag must be at least size() long"
        );
        assert!(
            out_real.len() >= self.size,
            "FourierTransform::transform(): out_real must be at least size() long"
        );
        assert!(
            out_imag.len() >= self.size,
            "FourierTransform::transform(): out_imag must be at least size() long"
        );

        let scale_factor = match (self.scale, direction) {
            (Scale::Forward, Direction::Forward) => self.scale_factor,
            (Scale::Inverse, Direction::Inverse) => self.scale_factor,
            (Scale::Both, _) => self.scale_factor,
            _ => T::one(),
        };

        // Bit-reversed decomposition, fused with the only scaling pass.
        for i in 0..self.size {
            let r = self.reversed[i];
            out_real[i] = in_real[r] * scale_factor;
            out_imag[i] = in_imag[r] * scale_factor;
        }

        // Twiddle factors are conjugated for the inverse transform.
        let sign = match direction {
            Direction::Forward => T::one(),
            Direction::Inverse => -T::one(),
        };

        for stage in 0..self.log2_size {
            let n1 = 1 << stage;
            let n2 = n1 * 2;
            let twiddle_step = 1 << (self.log2_size - stage - 1);

            for j in 0..n1 {
                let w_real = self.twiddle_real[j * twiddle_step];
                let w_imag = self.twiddle_imag[j * twiddle_step] * sign;

                let mut k = j;
                while k < self.size {
                    let k2 = k + n1;

                    let temp_real = w_real * out_real[k2] - w_imag * out_imag[k2];
                    let temp_imag = w_imag * out_real[k2] + w_real * out_imag[k2];

                    out_real[k2] = out_real[k] - temp_real;
                    out_imag[k2] = out_imag[k] - temp_imag;

                    out_real[k] = out_real[k] + temp_real;
                    out_imag[k] = out_imag[k] + temp_imag;

                    k += n2;
                }
            }
        }
    }
}
