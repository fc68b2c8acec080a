//! Radix-2 FFT with stage-parallel butterflies.
//!
//! [`ParallelRadix2Fft`] runs the same decimation-in-time algorithm as
//! [`Radix2Fft`](crate::radix2::Radix2Fft). When a stage has at least
//! `threshold` butterflies, the global butterfly index range `0..N/2` is
//! cut into one contiguous range per worker and the ranges run on the
//! instance's own worker pool. Stages are separated by a barrier since
//! each stage reads what the previous one wrote. Within a stage no two
//! butterflies share an index, so the buffer is shared without locks.
//!
//! Defaults can be tuned through the environment:
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `SPECFFT_PAR_FFT_THREADS` | worker threads | `num_cpus::get()` |
//! | `SPECFFT_PAR_FFT_THRESHOLD` | minimum butterflies per stage to parallelise | 2048 |
//! | `SPECFFT_PAR_FFT_GRACE_MS` | shutdown grace period in milliseconds | 1000 |

use core::marker::PhantomData;
use core::sync::atomic::{AtomicBool, Ordering};
use std::string::String;
use std::time::Duration;

use crate::fft::{
    check_capacity, check_len, check_power_of_two, ArgumentError, Direction, FftError, Transform,
};
use crate::logging::{fft_debug, fft_trace, fft_warn};
use crate::num::{index_to_float, Complex, Float};
use crate::pool::{PoolShutdown, WorkerPool};
use crate::radix2::{bit_reverse_permute, butterfly_stage, scale_by_len, stage_step};
use crate::spectrum::SpectrumBuffer;

pub const THREADS_ENV: &str = "SPECFFT_PAR_FFT_THREADS";
pub const THRESHOLD_ENV: &str = "SPECFFT_PAR_FFT_THRESHOLD";
pub const GRACE_MS_ENV: &str = "SPECFFT_PAR_FFT_GRACE_MS";

/// Butterflies per stage below which dispatch costs more than it saves.
pub const DEFAULT_THRESHOLD: usize = 2048;
pub const DEFAULT_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelConfig {
    pub threads: usize,
    pub threshold: usize,
    pub grace: Duration,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            threads: num_cpus::get().max(1),
            threshold: DEFAULT_THRESHOLD,
            grace: DEFAULT_GRACE,
        }
    }
}

impl ParallelConfig {
    /// Defaults overlaid with the `SPECFFT_PAR_FFT_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Apply settings from `lookup`; missing, unparsable, or zero values are ignored.
    pub fn overlay<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|&v| v != 0)
        };
        if let Some(threads) = read(THREADS_ENV) {
            self.threads = threads;
        }
        if let Some(threshold) = read(THRESHOLD_ENV) {
            self.threshold = threshold;
        }
        if let Some(ms) = read(GRACE_MS_ENV) {
            self.grace = Duration::from_millis(ms as u64);
        }
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }
}

/// Lock-free view of a split buffer shared by the workers of one stage.
///
/// Workers only touch the index pairs of their own butterfly range, and
/// ranges never overlap, so concurrent writes through the view never alias.
struct SharedSplit<'a, T> {
    re: *mut T,
    im: *mut T,
    len: usize,
    _buffer: PhantomData<&'a mut [T]>,
}

impl<T> Clone for SharedSplit<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SharedSplit<'_, T> {}

// SAFETY: see the type-level comment; each index is written by at most one
// worker per stage, and the stage barrier orders stages.
unsafe impl<T: Send> Send for SharedSplit<'_, T> {}
unsafe impl<T: Send> Sync for SharedSplit<'_, T> {}

impl<'a, T: Float> SharedSplit<'a, T> {
    fn new(re: &'a mut [T], im: &'a mut [T]) -> Self {
        debug_assert_eq!(re.len(), im.len());
        Self {
            re: re.as_mut_ptr(),
            im: im.as_mut_ptr(),
            len: re.len(),
            _buffer: PhantomData,
        }
    }

    /// # Safety
    /// `u < v < self.len`, and no other thread may access `u` or `v` for
    /// the duration of the call.
    #[inline(always)]
    unsafe fn butterfly(self, u: usize, v: usize, w: Complex<T>) {
        debug_assert!(u < v && v < self.len);
        let (ru, iu) = (self.re.add(u), self.im.add(u));
        let (rv, iv) = (self.re.add(v), self.im.add(v));
        let t = Complex::new(*rv, *iv) * w;
        let (ur, ui) = (*ru, *iu);
        *rv = ur - t.re;
        *iv = ui - t.im;
        *ru = ur + t.re;
        *iu = ui + t.im;
    }
}

/// Butterflies `start..end` of the global index space of a `len`-point stage.
///
/// Global index `g` is butterfly `k = g % (len/2)` of block `g / (len/2)`.
/// The twiddle is seeded from `k` directly at the start of the range and
/// of every block it crosses, then advanced by the stage rotation.
///
/// # Safety
/// No other thread may touch the indices of butterflies `start..end`.
unsafe fn butterfly_range<T: Float>(
    view: SharedSplit<'_, T>,
    len: usize,
    start: usize,
    end: usize,
    direction: Direction,
) {
    let half = len / 2;
    let step = stage_step::<T>(len, direction);
    let angle = direction.sign::<T>() * (T::pi() + T::pi()) / index_to_float(len);
    let mut g = start;
    while g < end {
        let block = g / half;
        let first_k = g % half;
        let block_end = ((block + 1) * half).min(end);
        let base = block * len;
        let mut w = Complex::expi(angle * index_to_float(first_k));
        for k in first_k..first_k + (block_end - g) {
            view.butterfly(base + k, base + k + half, w);
            w = w * step;
        }
        g = block_end;
    }
}

/// Resets the in-flight flag when a transform leaves, however it leaves.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ParallelRadix2Fft {
    pool: WorkerPool,
    threshold: usize,
    in_flight: AtomicBool,
    #[cfg(test)]
    fail_stage: AtomicBool,
}

impl ParallelRadix2Fft {
    /// Build an engine configured by [`ParallelConfig::from_env`].
    pub fn new() -> Result<Self, FftError> {
        Self::with_config(ParallelConfig::from_env())
    }

    pub fn with_config(config: ParallelConfig) -> Result<Self, FftError> {
        let pool = WorkerPool::new(config.threads, config.grace)?;
        fft_debug!(
            "parallel radix-2 engine: {} threads, threshold {} butterflies",
            config.threads,
            config.threshold
        );
        Ok(Self {
            pool,
            threshold: config.threshold,
            in_flight: AtomicBool::new(false),
            #[cfg(test)]
            fail_stage: AtomicBool::new(false),
        })
    }

    pub fn threads(&self) -> usize {
        self.pool.threads()
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Release the worker pool, waiting at most `grace` for the workers.
    ///
    /// Dropping the engine does the same with the configured grace period.
    pub fn shutdown(mut self, grace: Duration) -> PoolShutdown {
        self.pool.shutdown(grace)
    }

    /// In-place complex FFT over split arrays of equal power-of-two length.
    ///
    /// On failure both arrays are zeroed so no partial result is observable.
    pub fn transform_split<T: Float>(
        &self,
        re: &mut [T],
        im: &mut [T],
        direction: Direction,
    ) -> Result<(), FftError> {
        let n = re.len();
        if im.len() != n {
            return Err(ArgumentError::MismatchedLengths.into());
        }
        check_len::<T>(n)?;
        check_power_of_two(n)?;
        let _guard = self.enter()?;
        self.run_or_clear(re, im, direction)
    }

    /// Run the transform with the in-flight flag already held.
    fn run_or_clear<T: Float>(
        &self,
        re: &mut [T],
        im: &mut [T],
        direction: Direction,
    ) -> Result<(), FftError> {
        let result = self.run(re, im, direction);
        if let Err(_err) = result {
            fft_warn!("parallel transform of {} points failed: {}", re.len(), _err);
            re.fill(T::zero());
            im.fill(T::zero());
        }
        result
    }

    fn enter(&self) -> Result<InFlight<'_>, FftError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| FftError::Busy)?;
        Ok(InFlight(&self.in_flight))
    }

    fn run<T: Float>(&self, re: &mut [T], im: &mut [T], direction: Direction) -> Result<(), FftError> {
        let n = re.len();
        bit_reverse_permute(re, im);
        let butterflies = n / 2;
        let mut len = 2;
        while len <= n {
            if butterflies >= self.threshold {
                fft_trace!("stage len={} dispatched to {} workers", len, self.threads());
                self.parallel_stage(SharedSplit::new(&mut *re, &mut *im), len, direction)?;
            } else {
                butterfly_stage(re, im, len, stage_step(len, direction));
            }
            len <<= 1;
        }
        if direction == Direction::Inverse {
            scale_by_len(re, im);
        }
        Ok(())
    }

    fn parallel_stage<T: Float>(
        &self,
        view: SharedSplit<'_, T>,
        len: usize,
        direction: Direction,
    ) -> Result<(), FftError> {
        let total = view.len / 2;
        let parts = self.threads().min(total).max(1);
        let chunk = total.div_ceil(parts);
        self.pool.fan_out(parts, |part| {
            #[cfg(test)]
            {
                if part == 0 && self.fail_stage.load(Ordering::Relaxed) {
                    panic!("injected worker failure");
                }
            }
            let start = part * chunk;
            let end = (start + chunk).min(total);
            // SAFETY: part ranges are disjoint, and distinct butterflies of
            // one stage touch distinct index pairs.
            unsafe { butterfly_range(view, len, start, end, direction) }
        })
    }
}

impl<T: Float> Transform<T> for ParallelRadix2Fft {
    fn name(&self) -> &'static str {
        "parallel-radix2-fft"
    }

    fn spectrum_len(&self, signal_len: usize) -> usize {
        signal_len
    }

    fn forward(&self, signal: &[T], spectrum: &mut SpectrumBuffer<T>) -> Result<(), FftError> {
        let n = signal.len();
        check_len::<T>(n)?;
        check_power_of_two(n)?;
        check_capacity(n, spectrum.len())?;
        // claim the engine before the spectrum is touched
        let _guard = self.enter()?;
        let (re, im) = spectrum.as_mut_slices();
        let (re, im) = (&mut re[..n], &mut im[..n]);
        re.copy_from_slice(signal);
        im.fill(T::zero());
        self.run_or_clear(re, im, Direction::Forward)
    }

    fn inverse(&self, spectrum: &mut SpectrumBuffer<T>, signal: &mut [T]) -> Result<(), FftError> {
        let n = spectrum.len();
        check_len::<T>(n)?;
        check_power_of_two(n)?;
        check_capacity(n, signal.len())?;
        let _guard = self.enter()?;
        let (re, im) = spectrum.as_mut_slices();
        self.run_or_clear(re, im, Direction::Inverse)?;
        signal[..n].copy_from_slice(re);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radix2::{transform_split, Radix2Fft};
    use std::vec;
    use std::vec::Vec;

    fn forced(threads: usize) -> ParallelRadix2Fft {
        ParallelRadix2Fft::with_config(
            ParallelConfig::default()
                .with_threads(threads)
                .with_threshold(1)
                .with_grace(Duration::from_secs(5)),
        )
        .unwrap()
    }

    fn ramp(n: usize) -> (Vec<f64>, Vec<f64>) {
        let re = (0..n).map(|i| (i as f64 * 0.37).sin()).collect();
        let im = (0..n).map(|i| (i as f64 * 0.11).cos()).collect();
        (re, im)
    }

    #[test]
    fn matches_sequential_kernel_for_uneven_partitions() {
        // 3 workers never divide a power-of-two range evenly
        let engine = forced(3);
        for n in [2usize, 4, 8, 64, 1024] {
            let (mut re_par, mut im_par) = ramp(n);
            let (mut re_seq, mut im_seq) = (re_par.clone(), im_par.clone());
            engine
                .transform_split(&mut re_par, &mut im_par, Direction::Forward)
                .unwrap();
            transform_split(&mut re_seq, &mut im_seq, Direction::Forward).unwrap();
            for i in 0..n {
                assert!((re_par[i] - re_seq[i]).abs() < 1e-9, "n={n} i={i}");
                assert!((im_par[i] - im_seq[i]).abs() < 1e-9, "n={n} i={i}");
            }
        }
    }

    #[test]
    fn more_workers_than_butterflies() {
        let engine = forced(8);
        let signal = [1.0f64, 2.0, 3.0, 4.0];
        let mut spectrum = SpectrumBuffer::allocate(4);
        engine.forward(&signal, &mut spectrum).unwrap();
        let mut reference = SpectrumBuffer::allocate(4);
        Radix2Fft.forward(&signal, &mut reference).unwrap();
        for k in 0..4 {
            assert!((spectrum.re(k) - reference.re(k)).abs() < 1e-12);
            assert!((spectrum.im(k) - reference.im(k)).abs() < 1e-12);
        }
    }

    #[test]
    fn below_threshold_runs_on_caller() {
        let engine = ParallelRadix2Fft::with_config(
            ParallelConfig::default().with_threads(2).with_threshold(usize::MAX),
        )
        .unwrap();
        engine.fail_stage.store(true, Ordering::Relaxed);
        let mut spectrum = SpectrumBuffer::allocate(16);
        // no stage reaches the pool, so the injected fault never fires
        engine.forward(&[1.0f64; 16], &mut spectrum).unwrap();
        assert!((spectrum.re(0) - 16.0).abs() < 1e-12);
    }

    #[test]
    fn worker_failure_zeroes_output() {
        let engine = forced(2);
        engine.fail_stage.store(true, Ordering::Relaxed);
        let mut spectrum = SpectrumBuffer::allocate(8);
        let err = engine.forward(&[1.0f64; 8], &mut spectrum).unwrap_err();
        assert_eq!(err, FftError::WorkerFailed);
        assert!(spectrum.to_complex_vec().iter().all(|c| *c == Complex::zero()));
        // the in-flight guard was released and the engine still works
        engine.fail_stage.store(false, Ordering::Relaxed);
        engine.forward(&[1.0f64; 8], &mut spectrum).unwrap();
        assert!((spectrum.re(0) - 8.0).abs() < 1e-12);
    }

    #[test]
    fn inverse_failure_leaves_signal_untouched() {
        let engine = forced(2);
        let mut spectrum = SpectrumBuffer::allocate(8);
        engine.forward(&[0.5f64; 8], &mut spectrum).unwrap();
        engine.fail_stage.store(true, Ordering::Relaxed);
        let mut out = vec![7.0f64; 8];
        assert_eq!(
            engine.inverse(&mut spectrum, &mut out),
            Err(FftError::WorkerFailed)
        );
        assert_eq!(out, vec![7.0; 8]);
    }

    #[test]
    fn second_caller_is_refused_while_busy() {
        let engine = forced(2);
        let guard = engine.enter().unwrap();
        let mut re = vec![1.0f64; 4];
        let mut im = vec![0.0f64; 4];
        assert_eq!(
            engine.transform_split(&mut re, &mut im, Direction::Forward),
            Err(FftError::Busy)
        );
        assert_eq!(re, vec![1.0; 4]);
        drop(guard);
        engine
            .transform_split(&mut re, &mut im, Direction::Forward)
            .unwrap();
        assert!((re[0] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn busy_engine_leaves_caller_buffers_untouched() {
        let engine = forced(2);
        let guard = engine.enter().unwrap();
        let mut spectrum = SpectrumBuffer::from_complex(&[Complex::new(9.0f64, 9.0); 4]);
        let before = spectrum.clone();
        assert_eq!(
            engine.forward(&[1.0f64, 2.0, 3.0, 4.0], &mut spectrum),
            Err(FftError::Busy)
        );
        assert_eq!(spectrum, before);
        let mut out = vec![5.0f64; 4];
        assert_eq!(engine.inverse(&mut spectrum, &mut out), Err(FftError::Busy));
        assert_eq!(spectrum, before);
        assert_eq!(out, vec![5.0; 4]);
        drop(guard);
        engine.forward(&[1.0f64, 2.0, 3.0, 4.0], &mut spectrum).unwrap();
        assert!((spectrum.re(0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn zero_threads_rejected() {
        let err = ParallelRadix2Fft::with_config(ParallelConfig::default().with_threads(0))
            .err()
            .unwrap();
        assert_eq!(err, FftError::InvalidArgument(ArgumentError::ZeroThreads));
    }

    #[test]
    fn overlay_reads_known_keys() {
        let config = ParallelConfig::default().overlay(|key| match key {
            THREADS_ENV => Some("3".into()),
            THRESHOLD_ENV => Some(" 64 ".into()),
            GRACE_MS_ENV => Some("250".into()),
            _ => None,
        });
        assert_eq!(config.threads, 3);
        assert_eq!(config.threshold, 64);
        assert_eq!(config.grace, Duration::from_millis(250));
    }

    #[test]
    fn overlay_ignores_garbage_and_zero() {
        let base = ParallelConfig::default();
        let config = base.overlay(|key| match key {
            THREADS_ENV => Some("0".into()),
            THRESHOLD_ENV => Some("lots".into()),
            _ => None,
        });
        assert_eq!(config, base);
    }

    #[test]
    fn explicit_shutdown_is_graceful() {
        let engine = forced(2);
        assert_eq!(engine.threads(), 2);
        assert_eq!(engine.threshold(), 1);
        assert_eq!(engine.shutdown(Duration::from_secs(5)), PoolShutdown::Graceful);
    }
}
