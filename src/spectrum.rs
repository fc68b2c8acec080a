//! Structure-of-arrays storage for complex spectra.
//!
//! A [`SpectrumBuffer`] keeps the real and imaginary components in two
//! contiguous arrays of equal, fixed length. Butterfly passes walk each
//! component array linearly, and the length never changes after
//! allocation: only fixed-length slices are handed out.

use alloc::vec;
use alloc::vec::Vec;

use crate::fft::{ArgumentError, FftError};
use crate::num::{Complex, Float};

#[derive(Clone, Debug, PartialEq)]
pub struct SpectrumBuffer<T: Float> {
    re: Vec<T>,
    im: Vec<T>,
}

impl<T: Float> SpectrumBuffer<T> {
    /// Allocate a buffer of `n` bins with every component set to zero.
    pub fn allocate(n: usize) -> Self {
        Self {
            re: vec![T::zero(); n],
            im: vec![T::zero(); n],
        }
    }

    /// Take ownership of separate component arrays.
    pub fn from_parts(re: Vec<T>, im: Vec<T>) -> Result<Self, FftError> {
        if re.len() != im.len() {
            return Err(FftError::InvalidArgument(ArgumentError::MismatchedLengths));
        }
        Ok(Self { re, im })
    }

    pub fn from_complex(values: &[Complex<T>]) -> Self {
        let mut re = Vec::with_capacity(values.len());
        let mut im = Vec::with_capacity(values.len());
        for c in values {
            re.push(c.re);
            im.push(c.im);
        }
        Self { re, im }
    }

    pub fn into_parts(self) -> (Vec<T>, Vec<T>) {
        (self.re, self.im)
    }

    pub fn len(&self) -> usize {
        self.re.len()
    }

    pub fn is_empty(&self) -> bool {
        self.re.is_empty()
    }

    #[inline]
    pub fn re(&self, i: usize) -> T {
        self.re[i]
    }

    #[inline]
    pub fn im(&self, i: usize) -> T {
        self.im[i]
    }

    #[inline]
    pub fn set_re(&mut self, i: usize, value: T) {
        self.re[i] = value;
    }

    #[inline]
    pub fn set_im(&mut self, i: usize, value: T) {
        self.im[i] = value;
    }

    #[inline]
    pub fn get(&self, i: usize) -> Complex<T> {
        Complex::new(self.re[i], self.im[i])
    }

    #[inline]
    pub fn set(&mut self, i: usize, value: Complex<T>) {
        self.re[i] = value.re;
        self.im[i] = value.im;
    }

    /// `sqrt(re² + im²)` of bin `i`.
    #[inline]
    pub fn magnitude(&self, i: usize) -> T {
        self.get(i).norm()
    }

    /// `atan2(im, re)` of bin `i`, in radians.
    #[inline]
    pub fn phase(&self, i: usize) -> T {
        self.get(i).arg()
    }

    pub fn magnitudes(&self) -> Vec<T> {
        (0..self.len()).map(|i| self.magnitude(i)).collect()
    }

    pub fn phases(&self) -> Vec<T> {
        (0..self.len()).map(|i| self.phase(i)).collect()
    }

    pub fn to_complex_vec(&self) -> Vec<Complex<T>> {
        (0..self.len()).map(|i| self.get(i)).collect()
    }

    pub fn as_slices(&self) -> (&[T], &[T]) {
        (&self.re, &self.im)
    }

    pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        (&mut self.re, &mut self.im)
    }

    pub fn fill_zero(&mut self) {
        self.re.fill(T::zero());
        self.im.fill(T::zero());
    }
}
