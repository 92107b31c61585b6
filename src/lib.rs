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

//! Streaming FFT convolution for one-dimensional signals.
//!
//! The engine accepts a continuous sequence of fixed-size blocks, convolves
//! each block with a user-specified linear filter in the frequency domain,
//! and emits an output stream whose samples match the linear convolution of
//! the whole input with the filter's impulse response. Overlap-add stitching
//! across block boundaries is handled internally; [`ConvolutionReal`]
//! processes `2N` real samples per block through a single `N`-point complex
//! FFT, while [`ConvolutionComplex`] processes `N` complex samples (often
//! two independent real channels packed into the real and imaginary parts).
//!
//! Filters are described either directly as an impulse response
//! ([`FilterKernel`]) or as a desired frequency response
//! ([`FrequencyResponse`]); the conversion from a frequency response to a
//! causal, windowed, anti-aliased kernel is automatic.
//!
//! # Example
//!
//! ```
//! use convolver_rs::prelude::*;
//!
//! // 16-sample real blocks through the identity filter.
//! let mut conv = ConvolutionRealF32::new(16).unwrap();
//!
//! let input: Vec<f32> = (1..=16).map(|i| i as f32).collect();
//! let mut output = vec![0.0f32; 16];
//! conv.convolve(&input, &mut output);
//!
//! for (x, y) in input.iter().zip(output.iter()) {
//!     assert!((x - y).abs() < 1e-3);
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

use core::fmt;

use num_traits::{Float, FromPrimitive};

pub mod buffer;
pub mod convolution;
pub mod fft;
pub mod multichannel;
pub mod window;

mod utils;
pub use utils::{deinterleave, interleave, pcm16_to_scalar, scalar_to_pcm16};

pub use buffer::ComplexBuffer;
pub use convolution::{
    ConvolutionComplex, ConvolutionReal, ConvolveObserver, FilterKernel, FrequencyResponse,
};
pub use fft::{Direction, FourierTransform, Scale};
pub use multichannel::MultiChannelConvolutionReal;
pub use window::{Blackman, Hamming, Hann, Window, WindowFunction};

pub mod prelude {
    pub use crate::buffer::ComplexBuffer;
    pub use crate::convolution::{
        ConvolutionComplex, ConvolutionReal, ConvolveObserver, FilterKernel, FrequencyResponse,
    };
    pub use crate::fft::{Direction, FourierTransform, Scale};
    pub use crate::multichannel::MultiChannelConvolutionReal;
    pub use crate::utils::{deinterleave, interleave, pcm16_to_scalar, scalar_to_pcm16};
    pub use crate::window::{Blackman, Hamming, Hann, Window, WindowFunction};
    pub use crate::{
        ComplexBufferF32, ComplexBufferF64, ConfigError, ConvolutionComplexF32,
        ConvolutionComplexF64, ConvolutionRealF32, ConvolutionRealF64, FilterKernelF32,
        FilterKernelF64, FourierTransformF32, FourierTransformF64, FrequencyResponseF32,
        FrequencyResponseF64, MultiChannelConvolutionRealF32, MultiChannelConvolutionRealF64,
        Scalar, WindowF32, WindowF64,
    };
}

/// Scalar element type the engine is generic over.
///
/// Implemented exactly for `f32` and `f64`; every engine type comes in the
/// two corresponding monomorphised forms (see the `*F32` / `*F64` aliases).
pub trait Scalar: Float + FromPrimitive + fmt::Debug + Send + Sync + 'static {}

impl Scalar for f32 {}
impl Scalar for f64 {}

/// Construction-time validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigError {
    /// The FFT size is not a power of two.
    InvalidFftSize { size: usize },
    /// The per-block sample count is not a valid power of two.
    InvalidBlockSize { size: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidFftSize { size } => {
                write!(f, "FFT size must be a power of two, got {}", size)
            }
            ConfigError::InvalidBlockSize { size } => {
                write!(f, "block size must be a power of two, got {}", size)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

// Type aliases for common float types
pub type ComplexBufferF32 = ComplexBuffer<f32>;
pub type ComplexBufferF64 = ComplexBuffer<f64>;

pub type FourierTransformF32 = FourierTransform<f32>;
pub type FourierTransformF64 = FourierTransform<f64>;

pub type WindowF32 = Window<f32>;
pub type WindowF64 = Window<f64>;

pub type FrequencyResponseF32 = FrequencyResponse<f32>;
pub type FrequencyResponseF64 = FrequencyResponse<f64>;

pub type FilterKernelF32 = FilterKernel<f32>;
pub type FilterKernelF64 = FilterKernel<f64>;

pub type ConvolutionComplexF32 = ConvolutionComplex<f32>;
pub type ConvolutionComplexF64 = ConvolutionComplex<f64>;

pub type ConvolutionRealF32 = ConvolutionReal<f32>;
pub type ConvolutionRealF64 = ConvolutionReal<f64>;

pub type MultiChannelConvolutionRealF32 = MultiChannelConvolutionReal<f32>;
pub type MultiChannelConvolutionRealF64 = MultiChannelConvolutionReal<f64>;
