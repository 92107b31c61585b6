//! Amplitude-envelope windows.
//!
//! A [`Window`] holds precomputed coefficients and applies them by
//! elementwise multiplication. New window shapes plug in by implementing
//! [`WindowFunction`], which only has to produce the coefficients; the
//! application logic is shared.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::buffer::ComplexBuffer;
use crate::Scalar;

/// Produces the coefficients of a window shape.
pub trait WindowFunction<T: Scalar> {
    /// Compute the `size` coefficients of this window shape.
    fn coefficients(&self, size: usize) -> Vec<T>;
}

/// Blackman window, `w[i] = a0 - a1*cos(2*pi*i/(M-1)) + a2*cos(4*pi*i/(M-1))`
/// with the exact-zero-at-the-edges coefficient set `a0 = 7938/18608`,
/// `a1 = 9240/18608`, `a2 = 1430/18608`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blackman;

impl<T: Scalar> WindowFunction<T> for Blackman {
    fn coefficients(&self, size: usize) -> Vec<T> {
        assert!(size >= 2, "Blackman::coefficients(): size must be at least 2");

        let a0 = T::from(7938.0 / 18608.0).unwrap();
        let a1 = T::from(9240.0 / 18608.0).unwrap();
        let a2 = T::from(1430.0 / 18608.0).unwrap();
        let two_pi = T::from(2.0 * core::f64::consts::PI).unwrap();
        let four_pi = T::from(4.0 * core::f64::consts::PI).unwrap();
        let m = T::from_usize(size - 1).unwrap();

        (0..size)
            .map(|i| {
                let x = T::from_usize(i).unwrap() / m;
                a0 - a1 * (two_pi * x).cos() + a2 * (four_pi * x).cos()
            })
            .collect()
    }
}

/// Hann window, `w[i] = 0.5 - 0.5*cos(2*pi*i/(M-1))`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hann;

impl<T: Scalar> WindowFunction<T> for Hann {
    fn coefficients(&self, size: usize) -> Vec<T> {
        assert!(size >= 2, "Hann::coefficients(): size must be at least 2");

        let half = T::from(0.5).unwrap();
        let two_pi = T::from(2.0 * core::f64::consts::PI).unwrap();
        let m = T::from_usize(size - 1).unwrap();

        (0..size)
            .map(|i| {
                let x = T::from_usize(i).unwrap() / m;
                half - half * (two_pi * x).cos()
            })
            .collect()
    }
}

/// Hamming window, `w[i] = 0.54 - 0.46*cos(2*pi*i/(M-1))`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hamming;

impl<T: Scalar> WindowFunction<T> for Hamming {
    fn coefficients(&self, size: usize) -> Vec<T> {
        assert!(size >= 2, "Hamming::coefficients(): size must be at least 2");

        let a0 = T::from(0.54).unwrap();
        let a1 = T::from(0.46).unwrap();
        let two_pi = T::from(2.0 * core::f64::consts::PI).unwrap();
        let m = T::from_usize(size - 1).unwrap();

        (0..size)
            .map(|i| {
                let x = T::from_usize(i).unwrap() / m;
                a0 - a1 * (two_pi * x).cos()
            })
            .collect()
    }
}

/// Precomputed window coefficients with in-place application.
///
/// The coefficients depend only on the shape and the size; once built they
/// never change, so a window can be shared read-only between engines.
#[derive(Debug, Clone)]
pub struct Window<T> {
    coefficients: Vec<T>,
}

impl<T: Scalar> Window<T> {
    /// Build a window of `size` coefficients from the given shape.
    pub fn from_function(function: &dyn WindowFunction<T>, size: usize) -> Self {
        Self {
            coefficients: function.coefficients(size),
        }
    }

    /// Blackman window of `size` coefficients.
    pub fn blackman(size: usize) -> Self {
        Self::from_function(&Blackman, size)
    }

    /// Hann window of `size` coefficients.
    pub fn hann(size: usize) -> Self {
        Self::from_function(&Hann, size)
    }

    /// Hamming window of `size` coefficients.
    pub fn hamming(size: usize) -> Self {
        Self::from_function(&Hamming, size)
    }

    /// Number of coefficients.
    #[inline]
    pub fn size(&self) -> usize {
        self.coefficients.len()
    }

    /// The precomputed coefficients.
    #[inline]
    pub fn coefficients(&self) -> &[T] {
        &self.coefficients
    }

    /// Multiply the first [`size()`](Self::size) samples of `real` by the
    /// coefficients, in place.
    ///
    /// # Panics
    ///
    /// Panics if the slice is shorter than the window.
    pub fn apply_real(&self, real: &mut [T]) {
        assert!(
            real.len() >= self.size(),
            "Window::apply_real(): real must be at least size() long"
        );

        for (sample, &w) in real.iter_mut().zip(self.coefficients.iter()) {
            *sample = *sample * w;
        }
    }

    /// Multiply the first [`size()`](Self::size) samples of both channels
    /// by the coefficients, in place.
    pub fn apply(&self, real: &mut [T], imag: &mut [T]) {
        assert!(
            real.len() >= self.size() && imag.len() >= self.size(),
            "Window::apply(): real and imag must be at least size() long"
        );

        for i in 0..self.size() {
            real[i] = real[i] * self.coefficients[i];
            imag[i] = imag[i] * self.coefficients[i];
        }
    }

    /// Apply the window to both channels of a [`ComplexBuffer`].
    pub fn apply_buffer(&self, buffer: &mut ComplexBuffer<T>) {
        self.apply(&mut buffer.real, &mut buffer.imag);
    }
}
