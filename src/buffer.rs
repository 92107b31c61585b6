//! Complex sample storage and spectral editing.
//!
//! [`ComplexBuffer`] keeps a fixed number of complex samples as two parallel
//! real arrays. The arrays are public for loose coupling with external
//! signal sources (converters, ring buffers, file readers); all operations
//! work in place and never reallocate.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use core::mem;
use core::ops::Range;

use num_traits::ToPrimitive;

use crate::Scalar;

/// Which parts of a bin a band fill writes to.
#[derive(Clone, Copy)]
enum BandComponent {
    Both,
    Real,
    Imag,
}

/// A fixed-size buffer of complex samples stored as two parallel arrays.
///
/// When the buffer holds a length-`N` spectrum, bin `0` is DC, bin `N/2` is
/// the Nyquist bin, bins `1..N/2` are the positive frequencies and bins
/// `N/2+1..N` their mirrored negatives. The `set_bin*` and `fill_band*`
/// editors maintain Hermitian symmetry automatically so that the buffer
/// stays the spectrum of a real signal.
///
/// Modifying methods return `&mut Self` so edits can be chained.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexBuffer<T> {
    /// Real parts. Do not resize; the length is fixed at construction.
    pub real: Vec<T>,
    /// Imaginary parts. Do not resize; the length is fixed at construction.
    pub imag: Vec<T>,
}

impl<T: Scalar> ComplexBuffer<T> {
    /// Create a zeroed buffer of `size` complex samples.
    pub fn new(size: usize) -> Self {
        Self {
            real: vec![T::zero(); size],
            imag: vec![T::zero(); size],
        }
    }

    /// Take ownership of a pair of caller-supplied arrays.
    ///
    /// # Panics
    ///
    /// Panics if the arrays have different lengths.
    pub fn from_parts(real: Vec<T>, imag: Vec<T>) -> Self {
        assert_eq!(
            real.len(),
            imag.len(),
            "ComplexBuffer::from_parts(): real and imag arrays must be of equal length"
        );
        Self { real, imag }
    }

    /// Number of complex samples held.
    #[inline]
    pub fn size(&self) -> usize {
        self.real.len()
    }

    /// Squared magnitude of the sample at `index`.
    #[inline]
    pub fn squared(&self, index: usize) -> T {
        self.real[index] * self.real[index] + self.imag[index] * self.imag[index]
    }

    /// Magnitude of the sample at `index`.
    #[inline]
    pub fn magnitude(&self, index: usize) -> T {
        self.squared(index).sqrt()
    }

    /// Phase in radians of the sample at `index`.
    #[inline]
    pub fn phase(&self, index: usize) -> T {
        self.imag[index].atan2(self.real[index])
    }

    /// Fill every real and imaginary element with `value`.
    pub fn fill(&mut self, value: T) -> &mut Self {
        self.real.fill(value);
        self.imag.fill(value);
        self
    }

    /// Fill a range of both real and imaginary elements with `value`.
    pub fn fill_range(&mut self, range: Range<usize>, value: T) -> &mut Self {
        self.real[range.clone()].fill(value);
        self.imag[range].fill(value);
        self
    }

    /// Fill every real element with `value`.
    pub fn fill_real(&mut self, value: T) -> &mut Self {
        self.real.fill(value);
        self
    }

    /// Fill a range of real elements with `value`.
    pub fn fill_real_range(&mut self, range: Range<usize>, value: T) -> &mut Self {
        self.real[range].fill(value);
        self
    }

    /// Fill every imaginary element with `value`.
    pub fn fill_imag(&mut self, value: T) -> &mut Self {
        self.imag.fill(value);
        self
    }

    /// Fill a range of imaginary elements with `value`.
    pub fn fill_imag_range(&mut self, range: Range<usize>, value: T) -> &mut Self {
        self.imag[range].fill(value);
        self
    }

    /// Store the elementwise complex product of `left` and `right` in this
    /// buffer.
    ///
    /// # Panics
    ///
    /// Panics if either operand is shorter than this buffer.
    pub fn cross(&mut self, left: &Self, right: &Self) -> &mut Self {
        let size = self.size();
        assert!(
            left.size() >= size && right.size() >= size,
            "ComplexBuffer::cross(): operands must be at least size() long"
        );

        for i in 0..size {
            let lr = left.real[i];
            let li = left.imag[i];
            let rr = right.real[i];
            let ri = right.imag[i];

            self.real[i] = lr * rr - li * ri;
            self.imag[i] = lr * ri + li * rr;
        }

        self
    }

    /// Multiply this buffer elementwise by `rhs`, in place.
    ///
    /// Complex multiplication commutes, so this covers both the
    /// self-as-left and self-as-right uses of [`cross`](Self::cross).
    pub fn cross_assign(&mut self, rhs: &Self) -> &mut Self {
        let size = self.size();
        assert!(
            rhs.size() >= size,
            "ComplexBuffer::cross_assign(): rhs must be at least size() long"
        );

        for i in 0..size {
            let lr = self.real[i];
            let li = self.imag[i];
            let rr = rhs.real[i];
            let ri = rhs.imag[i];

            self.real[i] = lr * rr - li * ri;
            self.imag[i] = lr * ri + li * rr;
        }

        self
    }

    /// Exchange the real and imaginary arrays.
    pub fn swap(&mut self) -> &mut Self {
        mem::swap(&mut self.real, &mut self.imag);
        self
    }

    /// Circularly shift the buffer by `delta` samples, so that
    /// `new[i] = old[(i + delta) mod size]`.
    ///
    /// Positive `delta` shifts to the left, negative to the right. Any
    /// magnitude of `delta` is accepted and normalised modulo the size.
    pub fn shift(&mut self, delta: isize) -> &mut Self {
        let size = self.size();
        if size == 0 {
            return self;
        }

        let delta = delta.rem_euclid(size as isize) as usize;
        if delta == 0 {
            return self;
        }

        self.real.rotate_left(delta);
        self.imag.rotate_left(delta);
        self
    }

    /// Energy at `bin`, counting both the positive and the mirrored
    /// negative frequency.
    ///
    /// The DC and Nyquist bins have no mirror and contribute alone.
    pub fn energy(&self, bin: usize) -> T {
        let size = self.size();
        if bin == 0 || bin == size / 2 {
            return self.squared(bin);
        }

        self.squared(bin) + self.squared(size - bin)
    }

    /// Energy contained in the band between `start_freq` and `end_freq`,
    /// both expressed as fractions of the sample rate in `-0.5..=0.5`.
    ///
    /// The band endpoints are weighted by how close the fractional bin
    /// position falls to its rounded bin, matching the blending used by the
    /// band fills. A band that collapses onto a single bin returns that
    /// bin's energy scaled by the combined endpoint weights.
    ///
    /// # Panics
    ///
    /// Panics if the frequencies have opposite signs (the two sidebands
    /// must be integrated separately) or lie beyond the Nyquist frequency.
    pub fn band_energy(&self, start_freq: T, end_freq: T) -> T {
        assert_eq!(
            start_freq < T::zero(),
            end_freq < T::zero(),
            "ComplexBuffer::band_energy(): start_freq and end_freq overlap, \
             both must be positive or negative"
        );

        // Negative frequencies are covered by energy() itself.
        let mut start = start_freq.abs();
        let mut end = end_freq.abs();
        if end < start {
            mem::swap(&mut start, &mut end);
        }
        assert!(
            end <= T::from(0.5).unwrap(),
            "ComplexBuffer::band_energy(): frequencies cannot exceed the Nyquist \
             frequency, -0.5 or +0.5 of the sample rate"
        );

        let size = T::from_usize(self.size()).unwrap();

        let (start_bin, _, start_contribution) = endpoint_weights(start * size);
        let (end_bin, _, end_contribution) = endpoint_weights(end * size);

        let mut result = self.energy(start_bin) * start_contribution;
        result = result + self.energy(end_bin) * end_contribution;

        for bin in start_bin + 1..end_bin {
            result = result + self.energy(bin);
        }

        result
    }

    /// Same as [`band_energy`](Self::band_energy) with the band expressed
    /// in physical units.
    pub fn band_energy_hz(&self, sample_rate: T, start_freq: T, end_freq: T) -> T {
        self.band_energy(start_freq / sample_rate, end_freq / sample_rate)
    }

    /// Split this spectrum into the spectra of the real and imaginary
    /// components of the underlying time-domain signal.
    ///
    /// If this buffer is the spectrum of a complex signal `r + j*s` (with
    /// `r` and `s` real), then on return `out_real` holds the Hermitian
    /// spectrum of `r` and `out_imag` the spectrum of `j*s`, each still in
    /// its original channel: `out_real` has even symmetry in its real part
    /// and odd in its imaginary part, `out_imag` the opposite.
    ///
    /// # Panics
    ///
    /// Panics if either output buffer is shorter than this buffer.
    pub fn decompose_even_odd(&self, out_real: &mut Self, out_imag: &mut Self) {
        let size = self.size();
        assert!(
            out_real.size() >= size && out_imag.size() >= size,
            "ComplexBuffer::decompose_even_odd(): output buffers must be at least size() long"
        );

        let half = size / 2;
        let two = T::from(2.0).unwrap();

        // DC and Nyquist are their own mirrors.
        out_real.real[0] = self.real[0];
        out_real.imag[0] = T::zero();
        out_real.real[half] = self.real[half];
        out_real.imag[half] = T::zero();

        out_imag.real[0] = T::zero();
        out_imag.imag[0] = self.imag[0];
        out_imag.real[half] = T::zero();
        out_imag.imag[half] = self.imag[half];

        for i in 1..half {
            let k = size - i;

            let real_even = (self.real[i] + self.real[k]) / two;
            let real_odd = (self.real[i] - self.real[k]) / two;

            let imag_even = (self.imag[i] + self.imag[k]) / two;
            let imag_odd = (self.imag[i] - self.imag[k]) / two;

            out_real.real[i] = real_even;
            out_real.imag[i] = imag_odd;
            out_real.real[k] = real_even;
            out_real.imag[k] = -imag_odd;

            out_imag.real[i] = real_odd;
            out_imag.imag[i] = imag_even;
            out_imag.real[k] = -real_odd;
            out_imag.imag[k] = imag_even;
        }
    }

    /// Store `real_value` and `imag_value` in the bin at `bin`, mirroring
    /// into the negative-frequency bin with Hermitian symmetry.
    pub fn set_bin(&mut self, bin: usize, real_value: T, imag_value: T) -> &mut Self {
        self.set_bin_real(bin, real_value);
        self.set_bin_imag(bin, imag_value);
        self
    }

    /// Store `value` in the real part of the bin at `bin`.
    ///
    /// Even symmetry: the mirrored bin `size - bin` receives the same
    /// value. The DC and Nyquist bins have no mirror.
    pub fn set_bin_real(&mut self, bin: usize, value: T) -> &mut Self {
        let size = self.size();
        self.real[bin] = value;

        if bin != 0 && bin != size / 2 {
            self.real[size - bin] = value;
        }

        self
    }

    /// Store `value` in the imaginary part of the bin at `bin`.
    ///
    /// Odd symmetry: the mirrored bin `size - bin` receives the negated
    /// value. The DC and Nyquist bins have no mirror.
    pub fn set_bin_imag(&mut self, bin: usize, value: T) -> &mut Self {
        let size = self.size();
        self.imag[bin] = value;

        if bin != 0 && bin != size / 2 {
            self.imag[size - bin] = -value;
        }

        self
    }

    /// Same as [`set_bin`](Self::set_bin) with the value in polar notation.
    pub fn set_bin_polar(&mut self, bin: usize, magnitude: T, phase: T) -> &mut Self {
        self.set_bin(bin, magnitude * phase.cos(), magnitude * phase.sin())
    }

    /// Fill the band between (and including) `start_freq` and `end_freq`
    /// with the given real and imaginary values.
    ///
    /// Frequencies are fractions of the sample rate in `-0.5..=0.5` and
    /// must share a sign; a negative band writes the imaginary value with
    /// flipped sign (odd symmetry). The two bins at the band edges are
    /// blended with the previous content in proportion to how close the
    /// exact fractional bin position falls to them; interior bins are
    /// overwritten outright. Symmetry into the mirrored sideband is
    /// handled automatically.
    ///
    /// # Example
    ///
    /// ```
    /// use convolver_rs::prelude::*;
    ///
    /// let mut spectrum = ComplexBufferF64::new(8);
    /// spectrum.fill_band(0.25, 0.5, 1.0, 0.0);
    ///
    /// assert_eq!(spectrum.real[2], 1.0); // band start
    /// assert_eq!(spectrum.real[3], 1.0); // interior
    /// assert_eq!(spectrum.real[4], 1.0); // Nyquist
    /// assert_eq!(spectrum.real[6], 1.0); // mirrored band start
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the frequencies have opposite signs or exceed the Nyquist
    /// frequency.
    pub fn fill_band(&mut self, start_freq: T, end_freq: T, real_value: T, imag_value: T) -> &mut Self {
        self.fill_band_impl(start_freq, end_freq, real_value, imag_value, BandComponent::Both);
        self
    }

    /// Same as [`fill_band`](Self::fill_band) with the value in polar
    /// notation.
    pub fn fill_band_polar(&mut self, start_freq: T, end_freq: T, magnitude: T, phase: T) -> &mut Self {
        let real_value = magnitude * phase.cos();
        let imag_value = magnitude * phase.sin();
        self.fill_band_impl(start_freq, end_freq, real_value, imag_value, BandComponent::Both);
        self
    }

    /// Fill only the real parts of the band between `start_freq` and
    /// `end_freq` with `value`.
    pub fn fill_band_real(&mut self, start_freq: T, end_freq: T, value: T) -> &mut Self {
        self.fill_band_impl(start_freq, end_freq, value, T::zero(), BandComponent::Real);
        self
    }

    /// Fill only the imaginary parts of the band between `start_freq` and
    /// `end_freq` with `value`.
    pub fn fill_band_imag(&mut self, start_freq: T, end_freq: T, value: T) -> &mut Self {
        self.fill_band_impl(start_freq, end_freq, T::zero(), value, BandComponent::Imag);
        self
    }

    /// Same as [`fill_band`](Self::fill_band) with the band expressed in
    /// physical units.
    pub fn fill_band_hz(
        &mut self,
        sample_rate: T,
        start_freq: T,
        end_freq: T,
        real_value: T,
        imag_value: T,
    ) -> &mut Self {
        self.fill_band(start_freq / sample_rate, end_freq / sample_rate, real_value, imag_value)
    }

    /// Same as [`fill_band_polar`](Self::fill_band_polar) with the band
    /// expressed in physical units.
    pub fn fill_band_polar_hz(
        &mut self,
        sample_rate: T,
        start_freq: T,
        end_freq: T,
        magnitude: T,
        phase: T,
    ) -> &mut Self {
        self.fill_band_polar(start_freq / sample_rate, end_freq / sample_rate, magnitude, phase)
    }

    /// Same as [`fill_band_real`](Self::fill_band_real) with the band
    /// expressed in physical units.
    pub fn fill_band_real_hz(&mut self, sample_rate: T, start_freq: T, end_freq: T, value: T) -> &mut Self {
        self.fill_band_real(start_freq / sample_rate, end_freq / sample_rate, value)
    }

    /// Same as [`fill_band_imag`](Self::fill_band_imag) with the band
    /// expressed in physical units.
    pub fn fill_band_imag_hz(&mut self, sample_rate: T, start_freq: T, end_freq: T, value: T) -> &mut Self {
        self.fill_band_imag(start_freq / sample_rate, end_freq / sample_rate, value)
    }

    fn fill_band_impl(
        &mut self,
        start_freq: T,
        end_freq: T,
        real_value: T,
        imag_value: T,
        component: BandComponent,
    ) {
        assert_eq!(
            start_freq < T::zero(),
            end_freq < T::zero(),
            "ComplexBuffer::fill_band(): start_freq and end_freq overlap, \
             both must be positive or negative"
        );

        // Work with positive frequencies, flipping the imaginary value for
        // the negative sideband (odd symmetry).
        let sign = if start_freq < T::zero() { -T::one() } else { T::one() };
        let mut start = start_freq * sign;
        let mut end = end_freq * sign;
        let imag_value = imag_value * sign;

        if end < start {
            mem::swap(&mut start, &mut end);
        }
        assert!(
            end <= T::from(0.5).unwrap(),
            "ComplexBuffer::fill_band(): frequencies cannot exceed the Nyquist \
             frequency, -0.5 or +0.5 of the sample rate"
        );

        let size = T::from_usize(self.size()).unwrap();

        let (start_bin, start_remainder, start_innovation) = endpoint_weights(start * size);
        let (end_bin, end_remainder, end_innovation) = endpoint_weights(end * size);

        match component {
            BandComponent::Both => {
                self.set_bin(
                    start_bin,
                    self.real[start_bin] * start_remainder + real_value * start_innovation,
                    self.imag[start_bin] * start_remainder + imag_value * start_innovation,
                );
                self.set_bin(
                    end_bin,
                    self.real[end_bin] * end_remainder + real_value * end_innovation,
                    self.imag[end_bin] * end_remainder + imag_value * end_innovation,
                );

                for bin in start_bin + 1..end_bin {
                    self.set_bin(bin, real_value, imag_value);
                }
            }
            BandComponent::Real => {
                self.set_bin_real(
                    start_bin,
                    self.real[start_bin] * start_remainder + real_value * start_innovation,
                );
                self.set_bin_real(
                    end_bin,
                    self.real[end_bin] * end_remainder + real_value * end_innovation,
                );

                for bin in start_bin + 1..end_bin {
                    self.set_bin_real(bin, real_value);
                }
            }
            BandComponent::Imag => {
                self.set_bin_imag(
                    start_bin,
                    self.imag[start_bin] * start_remainder + imag_value * start_innovation,
                );
                self.set_bin_imag(
                    end_bin,
                    self.imag[end_bin] * end_remainder + imag_value * end_innovation,
                );

                for bin in start_bin + 1..end_bin {
                    self.set_bin_imag(bin, imag_value);
                }
            }
        }
    }
}

/// Round a fractional bin position and weight the endpoint by its distance
/// to the rounded bin: `(bin, remainder, 1 - remainder)`.
fn endpoint_weights<T: Scalar>(bin_fraction: T) -> (usize, T, T) {
    let bin = bin_fraction.round().to_usize().unwrap();
    let remainder = (bin_fraction - T::from_usize(bin).unwrap()).abs();
    (bin, remainder, T::one() - remainder)
}
