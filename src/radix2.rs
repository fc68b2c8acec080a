//! Iterative radix-2 decimation-in-time FFT.
//!
//! Based on the [Cooley–Tukey algorithm](https://en.wikipedia.org/wiki/Cooley%E2%80%93Tukey_FFT_algorithm):
//! a bit-reversal permutation followed by `log2(N)` butterfly stages. The
//! twiddle factor inside a stage is advanced by one complex multiply per
//! butterfly instead of a fresh `sin_cos`. The recurrence is never
//! renormalised, so rounding drift grows slowly with `N`.

use crate::fft::{check_capacity, check_len, check_power_of_two, Direction, FftError, Transform};
use crate::num::{index_to_float, Complex, Float};
use crate::spectrum::SpectrumBuffer;

#[derive(Debug, Clone, Copy, Default)]
pub struct Radix2Fft;

/// Reorder both component arrays so each value moves to its bit-reversed index.
pub fn bit_reverse_permute<T: Float>(re: &mut [T], im: &mut [T]) {
    debug_assert_eq!(re.len(), im.len());
    let n = re.len();
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            re.swap(i, j);
            im.swap(i, j);
        }
    }
}

/// Rotation that advances the twiddle of a `len`-point stage by one position.
#[inline]
pub(crate) fn stage_step<T: Float>(len: usize, direction: Direction) -> Complex<T> {
    Complex::expi(direction.sign::<T>() * (T::pi() + T::pi()) / index_to_float(len))
}

/// One butterfly on indices `u` and `v = u + len/2` with twiddle `w`.
#[inline(always)]
pub(crate) fn butterfly<T: Float>(re: &mut [T], im: &mut [T], u: usize, v: usize, w: Complex<T>) {
    let t = Complex::new(re[v], im[v]) * w;
    let (ur, ui) = (re[u], im[u]);
    re[v] = ur - t.re;
    im[v] = ui - t.im;
    re[u] = ur + t.re;
    im[u] = ui + t.im;
}

/// Run every block of one `len`-point stage on the calling thread.
pub(crate) fn butterfly_stage<T: Float>(re: &mut [T], im: &mut [T], len: usize, step: Complex<T>) {
    let n = re.len();
    let half = len / 2;
    let mut start = 0;
    while start < n {
        let mut w = Complex::one();
        for k in 0..half {
            butterfly(re, im, start + k, start + k + half, w);
            w = w * step;
        }
        start += len;
    }
}

/// Multiply every value by `1/n`.
pub(crate) fn scale_by_len<T: Float>(re: &mut [T], im: &mut [T]) {
    let scale = T::one() / index_to_float(re.len());
    for (r, i) in re.iter_mut().zip(im.iter_mut()) {
        *r = *r * scale;
        *i = *i * scale;
    }
}

/// In-place complex FFT over split real/imaginary arrays.
///
/// Both arrays must have the same power-of-two length. The inverse
/// direction includes the `1/N` scaling.
pub fn transform_split<T: Float>(
    re: &mut [T],
    im: &mut [T],
    direction: Direction,
) -> Result<(), FftError> {
    let n = re.len();
    if im.len() != n {
        return Err(crate::fft::ArgumentError::MismatchedLengths.into());
    }
    check_len::<T>(n)?;
    check_power_of_two(n)?;
    bit_reverse_permute(re, im);
    let mut len = 2;
    while len <= n {
        butterfly_stage(re, im, len, stage_step(len, direction));
        len <<= 1;
    }
    if direction == Direction::Inverse {
        scale_by_len(re, im);
    }
    Ok(())
}

impl<T: Float> Transform<T> for Radix2Fft {
    fn name(&self) -> &'static str {
        "radix2-fft"
    }

    fn spectrum_len(&self, signal_len: usize) -> usize {
        signal_len
    }

    fn forward(&self, signal: &[T], spectrum: &mut SpectrumBuffer<T>) -> Result<(), FftError> {
        let n = signal.len();
        check_len::<T>(n)?;
        check_power_of_two(n)?;
        check_capacity(n, spectrum.len())?;
        let (re, im) = spectrum.as_mut_slices();
        let (re, im) = (&mut re[..n], &mut im[..n]);
        re.copy_from_slice(signal);
        im.fill(T::zero());
        transform_split(re, im, Direction::Forward)
    }

    fn inverse(&self, spectrum: &mut SpectrumBuffer<T>, signal: &mut [T]) -> Result<(), FftError> {
        let n = spectrum.len();
        check_len::<T>(n)?;
        check_power_of_two(n)?;
        check_capacity(n, signal.len())?;
        let (re, im) = spectrum.as_mut_slices();
        transform_split(re, im, Direction::Inverse)?;
        signal[..n].copy_from_slice(re);
        Ok(())
    }
}
