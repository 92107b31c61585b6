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

//! Streaming overlap-add convolution engines.
//!
//! Each block is zero-padded to twice the block size, multiplied against
//! the stored frequency response in the frequency domain, and stitched to
//! the previous block's tail. [`ConvolutionComplex`] processes `N` complex
//! samples per block; [`ConvolutionReal`] packs `2N` real samples into one
//! `N`-point complex transform. Both share the same frequency-domain core.
//!
//! Filters are attached through [`FilterKernel`] (an impulse response) and
//! [`FrequencyResponse`] (a spectrum). Kernels and responses are created by
//! the engine they belong to and carry its identity; handing one to a
//! different engine is rejected.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, sync::Arc, vec, vec::Vec};

#[cfg(feature = "std")]
use std::sync::Arc;

use core::fmt;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicU64, Ordering};

use crate::buffer::ComplexBuffer;
use crate::fft::{Direction, FourierTransform, Scale};
use crate::window::{Window, WindowFunction};
use crate::{ConfigError, Scalar};

/// Source of per-engine identities used to tie kernels and responses to the
/// convolution they were created for.
static NEXT_CONVOLUTION_ID: AtomicU64 = AtomicU64::new(0);

fn next_convolution_id() -> u64 {
    NEXT_CONVOLUTION_ID.fetch_add(1, Ordering::Relaxed)
}

/// Hooks into the frequency-domain step of a convolution.
///
/// Both callbacks receive live references to the engine's internal buffers,
/// and mutations are authoritative: writing to the pre-convolution spectrum
/// (or the time-domain block) before the spectral multiply changes this
/// block's output, and writing to the post-convolution time buffer changes
/// the emitted samples. Writing to the post-convolution spectrum has no
/// effect on the current block and is typically done for analysis only.
pub trait ConvolveObserver<T: Scalar> {
    /// Called after the forward FFT, before the spectral multiply.
    fn on_pre_convolve(&mut self, _time: &mut ComplexBuffer<T>, _spectrum: &mut ComplexBuffer<T>) {}

    /// Called after the inverse FFT, before overlap-add unpacking.
    fn on_post_convolve(&mut self, _time: &mut ComplexBuffer<T>, _spectrum: &mut ComplexBuffer<T>) {}
}

/// State shared by the real and complex engine variants: the FFT, the
/// default window, the active frequency response, the two spectral scratch
/// buffers and the observer. Per-variant block packing lives outside.
struct ConvolutionCore<T: Scalar> {
    id: u64,
    size: usize,
    fft_size: usize,
    window_size: usize,
    fft: Arc<FourierTransform<T>>,
    default_window: Arc<Window<T>>,
    frequency_response: FrequencyResponse<T>,
    pre_spectrum: ComplexBuffer<T>,
    post_spectrum: ComplexBuffer<T>,
    observer: Option<Box<dyn ConvolveObserver<T> + Send>>,
}

impl<T: Scalar> ConvolutionCore<T> {
    fn new(size: usize) -> Result<Self, ConfigError> {
        if size == 0 || !size.is_power_of_two() {
            return Err(ConfigError::InvalidBlockSize { size });
        }

        let fft_size = size * 2;
        // Output block length = input block + kernel - 1, hence kernel
        // length is capped at one sample over the block size.
        let window_size = size + 1;

        let fft = Arc::new(FourierTransform::new(fft_size, Scale::Inverse)?);
        let default_window = Arc::new(Window::blackman(window_size));

        let id = next_convolution_id();
        let frequency_response = FrequencyResponse::new(id, Arc::clone(&fft));

        Ok(Self {
            id,
            size,
            fft_size,
            window_size,
            fft,
            default_window,
            frequency_response,
            pre_spectrum: ComplexBuffer::new(fft_size),
            post_spectrum: ComplexBuffer::new(fft_size),
            observer: None,
        })
    }

    /// Fresh per-stream state reusing another core's FFT tables and
    /// default window.
    fn sharing(other: &Self) -> Self {
        let id = next_convolution_id();

        Self {
            id,
            size: other.size,
            fft_size: other.fft_size,
            window_size: other.window_size,
            fft: Arc::clone(&other.fft),
            default_window: Arc::clone(&other.default_window),
            frequency_response: FrequencyResponse::new(id, Arc::clone(&other.fft)),
            pre_spectrum: ComplexBuffer::new(other.fft_size),
            post_spectrum: ComplexBuffer::new(other.fft_size),
            observer: None,
        }
    }

    fn new_frequency_response(&self) -> FrequencyResponse<T> {
        FrequencyResponse::new(self.id, Arc::clone(&self.fft))
    }

    fn new_filter_kernel(&self) -> FilterKernel<T> {
        FilterKernel::new(self.id, Arc::clone(&self.fft), Arc::clone(&self.default_window))
    }

    fn filter_kernel(&self) -> FilterKernel<T> {
        let mut kernel = self.new_filter_kernel();
        kernel.set_frequency_response(&self.frequency_response);
        kernel
    }

    fn set_filter_kernel(&mut self, kernel: &FilterKernel<T>) {
        assert_eq!(
            kernel.convolution, self.id,
            "Convolution::set_filter_kernel(): filter kernel was created for \
             another convolution instance"
        );
        self.frequency_response.set_filter_kernel(kernel);
    }

    /// The shared frequency-domain step: forward FFT, pre hook, spectral
    /// multiply, inverse FFT, post hook.
    fn convolve_freq_domain(&mut self, in_time: &mut ComplexBuffer<T>, out_time: &mut ComplexBuffer<T>) {
        self.fft.transform(in_time, &mut self.pre_spectrum, Direction::Forward);

        if let Some(observer) = self.observer.as_mut() {
            observer.on_pre_convolve(in_time, &mut self.pre_spectrum);
        }

        self.post_spectrum.cross(&self.pre_spectrum, &self.frequency_response);

        self.fft.transform(&self.post_spectrum, out_time, Direction::Inverse);

        if let Some(observer) = self.observer.as_mut() {
            observer.on_post_convolve(out_time, &mut self.post_spectrum);
        }
    }
}

impl<T: Scalar> fmt::Debug for ConvolutionCore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvolutionCore")
            .field("id", &self.id)
            .field("size", &self.size)
            .field("fft_size", &self.fft_size)
            .field("window_size", &self.window_size)
            .field("observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

/// A frequency response bound to one convolution engine.
///
/// The default state is the identity response (`real = 1`, `imag = 0`
/// everywhere). All [`ComplexBuffer`] operations are available through
/// deref, so a response is edited with `set_bin*`, `fill_band*` and
/// friends, then turned into a kernel via
/// [`FilterKernel::set_frequency_response`].
#[derive(Debug, Clone)]
pub struct FrequencyResponse<T: Scalar> {
    buffer: ComplexBuffer<T>,
    convolution: u64,
    fft: Arc<FourierTransform<T>>,
}

impl<T: Scalar> FrequencyResponse<T> {
    fn new(convolution: u64, fft: Arc<FourierTransform<T>>) -> Self {
        let mut buffer = ComplexBuffer::new(fft.size());
        buffer.fill_real(T::one());

        Self {
            buffer,
            convolution,
            fft,
        }
    }

    /// Recompute this response as the spectrum of `kernel`.
    ///
    /// # Panics
    ///
    /// Panics if the kernel was created for a different convolution.
    pub fn set_filter_kernel(&mut self, kernel: &FilterKernel<T>) {
        assert_eq!(
            self.convolution, kernel.convolution,
            "FrequencyResponse::set_filter_kernel(): filter kernel was created \
             for another convolution instance"
        );
        self.set_filter_kernel_unchecked(kernel);
    }

    /// Identity-check-free variant for engines that replicate one kernel
    /// across channels of identical geometry.
    pub(crate) fn set_filter_kernel_unchecked(&mut self, kernel: &FilterKernel<T>) {
        self.fft.transform(&kernel.buffer, &mut self.buffer, Direction::Forward);
    }
}

impl<T: Scalar> Deref for FrequencyResponse<T> {
    type Target = ComplexBuffer<T>;

    fn deref(&self) -> &Self::Target {
        &self.buffer
    }
}

impl<T: Scalar> DerefMut for FrequencyResponse<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buffer
    }
}

/// A filter impulse response bound to one convolution engine.
///
/// The default state is the identity delta function (`real[0] = 1`,
/// everything else zero). The buffer may be edited directly through deref,
/// or derived from a [`FrequencyResponse`] via
/// [`set_frequency_response`](Self::set_frequency_response), which produces
/// a windowed, causal kernel suitable for artifact-free overlap-add
/// convolution.
#[derive(Debug, Clone)]
pub struct FilterKernel<T: Scalar> {
    buffer: ComplexBuffer<T>,
    convolution: u64,
    fft: Arc<FourierTransform<T>>,
    window: Arc<Window<T>>,
}

impl<T: Scalar> FilterKernel<T> {
    fn new(convolution: u64, fft: Arc<FourierTransform<T>>, window: Arc<Window<T>>) -> Self {
        let mut buffer = ComplexBuffer::new(fft.size());
        buffer.real[0] = T::one();

        Self {
            buffer,
            convolution,
            fft,
            window,
        }
    }

    /// Replace the window applied by
    /// [`set_frequency_response`](Self::set_frequency_response).
    ///
    /// # Panics
    ///
    /// Panics if the window size differs from the convolution's window
    /// size.
    pub fn set_window(&mut self, window: Window<T>) {
        assert_eq!(
            window.size(),
            self.window.size(),
            "FilterKernel::set_window(): window size must match the convolution's \
             window size"
        );
        self.window = Arc::new(window);
    }

    /// Replace the window by building one of the right size from `function`.
    pub fn set_window_function(&mut self, function: &dyn WindowFunction<T>) {
        self.window = Arc::new(Window::from_function(function, self.window.size()));
    }

    /// Derive this kernel from a frequency response.
    ///
    /// The response is inverse-transformed (yielding an impulse response
    /// centred around index 0, wrapped around the buffer end), circularly
    /// shifted so the response sits centred in the first half of the
    /// buffer, faded to zero at its edges by the window, and zero-padded
    /// over the remaining samples. The resulting kernel is strictly
    /// shorter than half the FFT size plus one sample, which is what makes
    /// block convolution linear rather than circular.
    ///
    /// # Panics
    ///
    /// Panics if the response was created for a different convolution.
    pub fn set_frequency_response(&mut self, response: &FrequencyResponse<T>) -> &mut Self {
        assert_eq!(
            self.convolution, response.convolution,
            "FilterKernel::set_frequency_response(): frequency response was \
             created for another convolution instance"
        );

        self.fft.transform(&response.buffer, &mut self.buffer, Direction::Inverse);

        let fft_size = self.buffer.size();
        self.buffer.shift(-((fft_size / 4) as isize));

        self.window.apply_buffer(&mut self.buffer);
        self.buffer.fill_range(self.window.size()..fft_size, T::zero());

        self
    }
}

impl<T: Scalar> Deref for FilterKernel<T> {
    type Target = ComplexBuffer<T>;

    fn deref(&self) -> &Self::Target {
        &self.buffer
    }
}

impl<T: Scalar> DerefMut for FilterKernel<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buffer
    }
}

/// Streaming overlap-add convolution of complex blocks.
///
/// Processes `size` complex samples per call. A common use is filtering
/// two independent real channels at once by packing one into the real and
/// one into the imaginary channel; the kernel's imaginary part is forced
/// to zero on attachment so the channels cannot leak into each other.
///
/// A single instance is not safe for concurrent use; distinct instances
/// (including ones created with [`sharing`](Self::sharing)) may run on
/// distinct threads.
#[derive(Debug)]
pub struct ConvolutionComplex<T: Scalar> {
    core: ConvolutionCore<T>,
    pre_time: ComplexBuffer<T>,
    post_time: ComplexBuffer<T>,
    pending: ComplexBuffer<T>,
}

impl<T: Scalar> ConvolutionComplex<T> {
    /// Create an engine processing `size` complex samples per block.
    ///
    /// Returns [`ConfigError::InvalidBlockSize`] unless `size` is a power
    /// of two.
    pub fn new(size: usize) -> Result<Self, ConfigError> {
        let core = ConvolutionCore::new(size)?;

        Ok(Self {
            pre_time: ComplexBuffer::new(core.fft_size),
            post_time: ComplexBuffer::new(core.fft_size),
            pending: ComplexBuffer::new(core.size),
            core,
        })
    }

    /// Create an engine with fresh stream state that shares `other`'s FFT
    /// tables and default window.
    pub fn sharing(other: &Self) -> Self {
        let core = ConvolutionCore::sharing(&other.core);

        Self {
            pre_time: ComplexBuffer::new(core.fft_size),
            post_time: ComplexBuffer::new(core.fft_size),
            pending: ComplexBuffer::new(core.size),
            core,
        }
    }

    /// Complex samples per block.
    #[inline]
    pub fn size(&self) -> usize {
        self.core.size
    }

    /// Size of the zero-padded transforms, twice [`size()`](Self::size).
    #[inline]
    pub fn fft_size(&self) -> usize {
        self.core.fft_size
    }

    /// Size of the kernel window, [`size()`](Self::size) plus one.
    #[inline]
    pub fn window_size(&self) -> usize {
        self.core.window_size
    }

    /// Create an identity [`FrequencyResponse`] bound to this engine.
    pub fn new_frequency_response(&self) -> FrequencyResponse<T> {
        self.core.new_frequency_response()
    }

    /// Create an identity [`FilterKernel`] bound to this engine.
    pub fn new_filter_kernel(&self) -> FilterKernel<T> {
        self.core.new_filter_kernel()
    }

    /// Reconstruct the active filter as a windowed kernel.
    pub fn filter_kernel(&self) -> FilterKernel<T> {
        self.core.filter_kernel()
    }

    /// Attach a filter kernel, replacing the active frequency response for
    /// all subsequent blocks. No crossfading is performed; the change takes
    /// effect on the next block boundary.
    ///
    /// The kernel's imaginary part is forced to zero first: the complex
    /// variant convolves two interleaved real streams that share the same
    /// kernel.
    ///
    /// # Panics
    ///
    /// Panics if the kernel was created for a different convolution.
    pub fn set_filter_kernel(&mut self, kernel: &mut FilterKernel<T>) {
        kernel.fill_imag(T::zero());
        self.core.set_filter_kernel(kernel);
    }

    /// Install or remove the [`ConvolveObserver`]. Absent observers cost a
    /// single branch per block.
    pub fn set_observer(&mut self, observer: Option<Box<dyn ConvolveObserver<T> + Send>>) {
        self.core.observer = observer;
    }

    /// Convolve one block of `size()` complex samples.
    ///
    /// The first half of the block's convolution is added to the pending
    /// tail from the previous block and emitted; the second half becomes
    /// the new pending tail.
    ///
    /// # Panics
    ///
    /// Panics if any slice is shorter than [`size()`](Self::size).
    pub fn convolve(&mut self, in_real: &[T], in_imag: &[T], out_real: &mut [T], out_imag: &mut [T]) {
        let n = self.core.size;
        assert!(
            in_real.len() >= n,
            "ConvolutionComplex::convolve(): in_real must be at least size() long"
        );
        assert!(
            in_imag.len() >= n,
            "ConvolutionComplex::convolve(): in_imag must be at least size() long"
        );
        assert!(
            out_real.len() >= n,
            "ConvolutionComplex::convolve(): out_real must be at least size() long"
        );
        assert!(
            out_imag.len() >= n,
            "ConvolutionComplex::convolve(): out_imag must be at least size() long"
        );

        // First halves carry the block; second halves stay zero-padded
        // (they are never written outside construction).
        self.pre_time.real[..n].copy_from_slice(&in_real[..n]);
        self.pre_time.imag[..n].copy_from_slice(&in_imag[..n]);

        self.core.convolve_freq_domain(&mut self.pre_time, &mut self.post_time);

        for i in 0..n {
            out_real[i] = self.post_time.real[i] + self.pending.real[i];
            out_imag[i] = self.post_time.imag[i] + self.pending.imag[i];

            self.pending.real[i] = self.post_time.real[i + n];
            self.pending.imag[i] = self.post_time.imag[i + n];
        }
    }

    /// [`convolve`](Self::convolve) over [`ComplexBuffer`]s.
    pub fn convolve_buffer(&mut self, input: &ComplexBuffer<T>, output: &mut ComplexBuffer<T>) {
        self.convolve(&input.real, &input.imag, &mut output.real, &mut output.imag);
    }

    /// Emit the pending overlap-add tail and reset it to zero.
    ///
    /// Call once after the last block to complete the convolved stream.
    ///
    /// # Panics
    ///
    /// Panics if either slice is shorter than [`size()`](Self::size).
    pub fn drain(&mut self, out_real: &mut [T], out_imag: &mut [T]) {
        let n = self.core.size;
        assert!(
            out_real.len() >= n,
            "ConvolutionComplex::drain(): out_real must be at least size() long"
        );
        assert!(
            out_imag.len() >= n,
            "ConvolutionComplex::drain(): out_imag must be at least size() long"
        );

        out_real[..n].copy_from_slice(&self.pending.real);
        out_imag[..n].copy_from_slice(&self.pending.imag);
        self.pending.fill(T::zero());
    }

    /// [`drain`](Self::drain) into a [`ComplexBuffer`].
    pub fn drain_buffer(&mut self, output: &mut ComplexBuffer<T>) {
        self.drain(&mut output.real, &mut output.imag);
    }

    /// Discard the pending overlap-add tail.
    pub fn flush(&mut self) {
        self.pending.fill(T::zero());
    }
}

/// Streaming overlap-add convolution of real blocks.
///
/// Processes `size` real samples per call through a single complex FFT of
/// the same length, by packing the block's first half into the real channel
/// and its second half into the imaginary channel. The attached kernel is
/// forced real-only, which keeps the two packed halves from coupling.
#[derive(Debug)]
pub struct ConvolutionReal<T: Scalar> {
    core: ConvolutionCore<T>,
    pre_time: ComplexBuffer<T>,
    post_time: ComplexBuffer<T>,
    pending: Vec<T>,
}

impl<T: Scalar> ConvolutionReal<T> {
    /// Create an engine processing `size` real samples per block.
    ///
    /// Returns [`ConfigError::InvalidBlockSize`] unless `size` is a power
    /// of two of at least 2; the internal complex block size is `size / 2`.
    pub fn new(size: usize) -> Result<Self, ConfigError> {
        if size < 2 || !size.is_power_of_two() {
            return Err(ConfigError::InvalidBlockSize { size });
        }

        let core = ConvolutionCore::new(size / 2)?;

        Ok(Self {
            pre_time: ComplexBuffer::new(core.fft_size),
            post_time: ComplexBuffer::new(core.fft_size),
            pending: vec![T::zero(); core.size],
            core,
        })
    }

    /// Create an engine with fresh stream state that shares `other`'s FFT
    /// tables and default window.
    pub fn sharing(other: &Self) -> Self {
        let core = ConvolutionCore::sharing(&other.core);

        Self {
            pre_time: ComplexBuffer::new(core.fft_size),
            post_time: ComplexBuffer::new(core.fft_size),
            pending: vec![T::zero(); core.size],
            core,
        }
    }

    /// Real samples per block (twice the internal complex block size).
    #[inline]
    pub fn size(&self) -> usize {
        self.core.size * 2
    }

    /// Size of the zero-padded transforms; equals [`size()`](Self::size)
    /// for this variant.
    #[inline]
    pub fn fft_size(&self) -> usize {
        self.core.fft_size
    }

    /// Size of the kernel window, half of [`size()`](Self::size) plus one.
    #[inline]
    pub fn window_size(&self) -> usize {
        self.core.window_size
    }

    /// Create an identity [`FrequencyResponse`] bound to this engine.
    pub fn new_frequency_response(&self) -> FrequencyResponse<T> {
        self.core.new_frequency_response()
    }

    /// Create an identity [`FilterKernel`] bound to this engine.
    pub fn new_filter_kernel(&self) -> FilterKernel<T> {
        self.core.new_filter_kernel()
    }

    /// Reconstruct the active filter as a windowed kernel.
    pub fn filter_kernel(&self) -> FilterKernel<T> {
        self.core.filter_kernel()
    }

    /// Attach a filter kernel, replacing the active frequency response for
    /// all subsequent blocks. No crossfading is performed.
    ///
    /// The kernel's imaginary part is forced to zero first: the output
    /// unpacking assumes a real-only filter with no cross-coupling between
    /// the two packed input halves.
    ///
    /// # Panics
    ///
    /// Panics if the kernel was created for a different convolution.
    pub fn set_filter_kernel(&mut self, kernel: &mut FilterKernel<T>) {
        kernel.fill_imag(T::zero());
        self.core.set_filter_kernel(kernel);
    }

    /// Identity-check-free kernel attachment for multi-channel fan-out over
    /// engines of identical geometry. The caller zeroes the kernel's
    /// imaginary part once up front.
    pub(crate) fn set_filter_kernel_unchecked(&mut self, kernel: &FilterKernel<T>) {
        self.core.frequency_response.set_filter_kernel_unchecked(kernel);
    }

    /// Install or remove the [`ConvolveObserver`].
    pub fn set_observer(&mut self, observer: Option<Box<dyn ConvolveObserver<T> + Send>>) {
        self.core.observer = observer;
    }

    /// Convolve one block of `size()` real samples.
    ///
    /// # Panics
    ///
    /// Panics if either slice is shorter than [`size()`](Self::size).
    pub fn convolve(&mut self, input: &[T], output: &mut [T]) {
        let n = self.core.size;
        assert!(
            input.len() >= n * 2,
            "ConvolutionReal::convolve(): input must be at least size() long"
        );
        assert!(
            output.len() >= n * 2,
            "ConvolutionReal::convolve(): output must be at least size() long"
        );

        // Pack the first input half into the real channel and the second
        // into the imaginary channel; the second halves of both channels
        // stay zero-padded.
        self.pre_time.real[..n].copy_from_slice(&input[..n]);
        self.pre_time.imag[..n].copy_from_slice(&input[n..n * 2]);

        self.core.convolve_freq_domain(&mut self.pre_time, &mut self.post_time);

        for i in 0..n {
            let j = i + n;

            // The convolved real channel contributes across the whole
            // output block; the first imaginary half belongs to the second
            // half of this block, and the second imaginary half is the
            // overlap-add tail for the next one.
            output[i] = self.post_time.real[i] + self.pending[i];
            output[j] = self.post_time.real[j] + self.post_time.imag[i];

            self.pending[i] = self.post_time.imag[j];
        }
    }

    /// Emit the pending overlap-add tail and reset it to zero.
    ///
    /// The tail is half a block long: `output` receives `size() / 2`
    /// samples.
    ///
    /// # Panics
    ///
    /// Panics if `output` is shorter than `size() / 2`.
    pub fn drain(&mut self, output: &mut [T]) {
        let n = self.core.size;
        assert!(
            output.len() >= n,
            "ConvolutionReal::drain(): output must be at least size() / 2 long"
        );

        output[..n].copy_from_slice(&self.pending);
        self.pending.fill(T::zero());
    }

    /// Discard the pending overlap-add tail.
    pub fn flush(&mut self) {
        self.pending.fill(T::zero());
    }
}
