//! Reference discrete Fourier transform.
//!
//! [`NaiveDft`] evaluates every bin by direct summation. It accepts any
//! length and is the oracle the faster engines are checked against.

use crate::fft::{check_capacity, check_len, FftError, Transform};
use crate::num::{index_to_float, Complex, Float};
use crate::spectrum::SpectrumBuffer;

#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveDft;

/// `2π / n` with the sign of the exponent applied.
#[inline]
pub(crate) fn angle_step<T: Float>(n: usize, sign: T) -> T {
    sign * (T::pi() + T::pi()) / index_to_float(n)
}

/// `Σⱼ signal[j]·e^(i·step·k·j)` for one bin `k`.
///
/// The phase index `k·j mod n` is carried as an integer so the angle never
/// grows past one turn.
pub(crate) fn dft_bin<T: Float>(signal: &[T], k: usize, step: T) -> Complex<T> {
    let n = signal.len();
    let mut acc = Complex::zero();
    let mut phase = 0usize;
    for &x in signal {
        let (sin, cos) = (step * index_to_float(phase)).sin_cos();
        acc.re = x.mul_add(cos, acc.re);
        acc.im = x.mul_add(sin, acc.im);
        phase += k;
        if phase >= n {
            phase -= n;
        }
    }
    acc
}

impl<T: Float> Transform<T> for NaiveDft {
    fn name(&self) -> &'static str {
        "naive-dft"
    }

    fn spectrum_len(&self, signal_len: usize) -> usize {
        signal_len
    }

    fn forward(&self, signal: &[T], spectrum: &mut SpectrumBuffer<T>) -> Result<(), FftError> {
        let n = signal.len();
        check_len::<T>(n)?;
        check_capacity(n, spectrum.len())?;
        let step = angle_step(n, -T::one());
        for k in 0..n {
            spectrum.set(k, dft_bin(signal, k, step));
        }
        Ok(())
    }

    fn inverse(&self, spectrum: &mut SpectrumBuffer<T>, signal: &mut [T]) -> Result<(), FftError> {
        let n = spectrum.len();
        check_len::<T>(n)?;
        check_capacity(n, signal.len())?;
        let step = angle_step(n, T::one());
        let scale = T::one() / index_to_float(n);
        let (re, im) = spectrum.as_slices();
        for (j, out) in signal.iter_mut().take(n).enumerate() {
            let mut acc = T::zero();
            let mut phase = 0usize;
            for k in 0..n {
                let (sin, cos) = (step * index_to_float(phase)).sin_cos();
                // real part of (re + i·im)·(cos + i·sin)
                acc = re[k].mul_add(cos, acc) - im[k] * sin;
                phase += j;
                if phase >= n {
                    phase -= n;
                }
            }
            *out = acc * scale;
        }
        Ok(())
    }
}
