//! Multi-channel fan-out over independent real convolution streams.
//!
//! One [`ConvolutionReal`] per channel, all sharing a single set of FFT
//! tables and one default window. Channels are independent streams; with
//! the `rayon` feature enabled they are processed in parallel (one stream
//! is never split across threads).

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::convolution::{ConvolutionReal, FilterKernel, FrequencyResponse};
use crate::utils::{deinterleave, interleave};
use crate::{ConfigError, Scalar};

/// A bank of identical real convolution engines, one per channel.
#[derive(Debug)]
pub struct MultiChannelConvolutionReal<T: Scalar> {
    channels: Vec<ConvolutionReal<T>>,
}

impl<T: Scalar> MultiChannelConvolutionReal<T> {
    /// Create `num_channels` engines of `size` real samples per block,
    /// sharing FFT tables and the default window.
    ///
    /// # Panics
    ///
    /// Panics if `num_channels` is zero.
    pub fn new(size: usize, num_channels: usize) -> Result<Self, ConfigError> {
        assert!(
            num_channels > 0,
            "MultiChannelConvolutionReal::new(): num_channels must be > 0"
        );

        let mut channels = Vec::with_capacity(num_channels);
        channels.push(ConvolutionReal::new(size)?);
        for _ in 1..num_channels {
            let shared = ConvolutionReal::sharing(&channels[0]);
            channels.push(shared);
        }

        Ok(Self { channels })
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Real samples per block and channel.
    pub fn size(&self) -> usize {
        self.channels[0].size()
    }

    /// Create an identity [`FrequencyResponse`] usable with
    /// [`set_filter_kernel`](Self::set_filter_kernel) (bound to the first
    /// channel's engine).
    pub fn new_frequency_response(&self) -> FrequencyResponse<T> {
        self.channels[0].new_frequency_response()
    }

    /// Create an identity [`FilterKernel`] usable with
    /// [`set_filter_kernel`](Self::set_filter_kernel) (bound to the first
    /// channel's engine).
    pub fn new_filter_kernel(&self) -> FilterKernel<T> {
        self.channels[0].new_filter_kernel()
    }

    /// Attach one kernel to every channel.
    ///
    /// # Panics
    ///
    /// Panics if the kernel was not created by this bank.
    pub fn set_filter_kernel(&mut self, kernel: &mut FilterKernel<T>) {
        // The first channel performs the identity check and zeroes the
        // kernel's imaginary part; the remaining channels have identical
        // geometry by construction.
        self.channels[0].set_filter_kernel(kernel);
        for channel in &mut self.channels[1..] {
            channel.set_filter_kernel_unchecked(kernel);
        }
    }

    /// Convolve one block per channel, returning one output block per
    /// channel.
    ///
    /// # Panics
    ///
    /// Panics if `inputs` does not hold one block of at least
    /// [`size()`](Self::size) samples per channel.
    pub fn convolve(&mut self, inputs: &[Vec<T>]) -> Vec<Vec<T>> {
        assert_eq!(
            inputs.len(),
            self.channels.len(),
            "MultiChannelConvolutionReal::convolve(): expected one input block per channel"
        );

        let size = self.size();

        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            self.channels
                .par_iter_mut()
                .zip(inputs.par_iter())
                .map(|(channel, input)| {
                    let mut output = vec![T::zero(); size];
                    channel.convolve(input, &mut output);
                    output
                })
                .collect()
        }
        #[cfg(not(feature = "rayon"))]
        {
            self.channels
                .iter_mut()
                .zip(inputs.iter())
                .map(|(channel, input)| {
                    let mut output = vec![T::zero(); size];
                    channel.convolve(input, &mut output);
                    output
                })
                .collect()
        }
    }

    /// Convolve one interleaved block covering all channels.
    pub fn convolve_interleaved(&mut self, input: &[T]) -> Vec<T> {
        let channels = deinterleave(input, self.channels.len());
        let outputs = self.convolve(&channels);
        interleave(&outputs)
    }

    /// Emit every channel's pending tail (half a block each) and reset
    /// them.
    pub fn drain(&mut self) -> Vec<Vec<T>> {
        let half = self.size() / 2;

        self.channels
            .iter_mut()
            .map(|channel| {
                let mut tail = vec![T::zero(); half];
                channel.drain(&mut tail);
                tail
            })
            .collect()
    }

    /// Discard every channel's pending tail.
    pub fn flush(&mut self) {
        for channel in &mut self.channels {
            channel.flush();
        }
    }
}
