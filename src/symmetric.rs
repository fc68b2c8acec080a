//! Half-spectrum DFT for real input.
//!
//! The spectrum of a real signal is Hermitian: bin `N-k` is the conjugate
//! of bin `k`. [`SymmetricDft`] therefore computes and stores only bins
//! `0..=N/2`, half the work of [`NaiveDft`](crate::dft::NaiveDft).
//!
//! `N/2 + 1` bins do not say whether `N` was even or odd, so the half
//! spectrum alone does not determine the signal length. `inverse` takes
//! `N` from the length of the output slice; the caller keeps track of it.

use crate::dft::{angle_step, dft_bin};
use crate::fft::{check_capacity, check_len, FftError, Transform};
use crate::num::{index_to_float, Float};
use crate::spectrum::SpectrumBuffer;

#[derive(Debug, Clone, Copy, Default)]
pub struct SymmetricDft;

/// Bins retained for a real signal of `n` samples.
#[inline]
pub fn half_spectrum_len(n: usize) -> usize {
    n / 2 + 1
}

impl<T: Float> Transform<T> for SymmetricDft {
    fn name(&self) -> &'static str {
        "symmetric-dft"
    }

    fn spectrum_len(&self, signal_len: usize) -> usize {
        half_spectrum_len(signal_len)
    }

    fn forward(&self, signal: &[T], spectrum: &mut SpectrumBuffer<T>) -> Result<(), FftError> {
        let n = signal.len();
        check_len::<T>(n)?;
        let bins = half_spectrum_len(n);
        check_capacity(bins, spectrum.len())?;
        let step = angle_step(n, -T::one());
        for k in 0..bins {
            spectrum.set(k, dft_bin(signal, k, step));
        }
        Ok(())
    }

    fn inverse(&self, spectrum: &mut SpectrumBuffer<T>, signal: &mut [T]) -> Result<(), FftError> {
        let n = signal.len();
        check_len::<T>(n)?;
        check_capacity(half_spectrum_len(n), spectrum.len())?;
        let step = angle_step(n, T::one());
        let scale = T::one() / index_to_float(n);
        let two = T::one() + T::one();
        // interior bins stand in for their conjugate partners as well
        let last_interior = (n - 1) / 2;
        let nyquist = if n % 2 == 0 { Some(n / 2) } else { None };
        let (re, im) = spectrum.as_slices();
        for (j, out) in signal.iter_mut().enumerate() {
            let mut acc = re[0];
            let mut phase = 0usize;
            for k in 1..=last_interior {
                phase += j;
                if phase >= n {
                    phase -= n;
                }
                let (sin, cos) = (step * index_to_float(phase)).sin_cos();
                acc = acc + two * (re[k] * cos - im[k] * sin);
            }
            if let Some(k) = nyquist {
                // cos(π·j) alternates sign; sin(π·j) vanishes
                let sign = if j % 2 == 0 { T::one() } else { -T::one() };
                acc = acc + re[k] * sign;
            }
            *out = acc * scale;
        }
        Ok(())
    }
}
