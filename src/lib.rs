//! # specfft - interchangeable real-signal transform engines
//!
//! Converts real-valued signals to and from a complex spectrum with four
//! engines behind one [`Transform`](fft::Transform) trait:
//!
//! - [`NaiveDft`](dft::NaiveDft): O(N²) direct summation, any length.
//! - [`SymmetricDft`](symmetric::SymmetricDft): O(N²) over the `N/2 + 1`
//!   bins a real signal actually needs, any length.
//! - [`Radix2Fft`](radix2::Radix2Fft): iterative Cooley–Tukey, power-of-two lengths.
//! - `ParallelRadix2Fft`: the same FFT with each large stage split across
//!   an owned worker pool (`parallel` feature).
//!
//! Spectra live in a [`SpectrumBuffer`](spectrum::SpectrumBuffer), a
//! fixed-length structure-of-arrays buffer the caller allocates once and
//! reuses across calls.
//!
//! ## Cargo Features
//!
//! - `std` (default): `std::error::Error` for [`FftError`](fft::FftError)
//!   and environment-driven configuration.
//! - `parallel` (default): `ParallelRadix2Fft`, backed by Rayon.
//! - `verbose-logging`: emit debug/trace/warn records through the `log`
//!   facade. Without it the crate never logs.
//!
//! ## Example
//!
//! ```
//! use specfft::fft::Transform;
//! use specfft::radix2::Radix2Fft;
//! use specfft::spectrum::SpectrumBuffer;
//!
//! let signal = [1.0f64, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
//! let mut spectrum = SpectrumBuffer::allocate(signal.len());
//! Radix2Fft.forward(&signal, &mut spectrum).unwrap();
//! assert!((spectrum.magnitude(3) - 1.0).abs() < 1e-12);
//!
//! let mut restored = [0.0f64; 8];
//! Radix2Fft.inverse(&mut spectrum, &mut restored).unwrap();
//! assert!((restored[0] - 1.0).abs() < 1e-12);
//! ```
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 (https://www.apache.org/licenses/LICENSE-2.0)
//! - MIT license (https://opensource.org/licenses/MIT)
//!
//! at your option.

#![no_std]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod logging;

/// Scalar trait and complex value type.
pub mod num;

/// Structure-of-arrays complex spectrum storage.
pub mod spectrum;

/// Transform trait, errors, and the engine factory.
pub mod fft;

/// Direct-summation reference DFT.
pub mod dft;

/// Half-spectrum DFT for real input.
pub mod symmetric;

/// Single-threaded radix-2 FFT.
pub mod radix2;

/// Owned worker pool used by the parallel FFT.
#[cfg(feature = "parallel")]
pub mod pool;

/// Stage-parallel radix-2 FFT.
#[cfg(feature = "parallel")]
pub mod parallel;

pub use dft::NaiveDft;
pub use fft::{new_transform, ArgumentError, Direction, FftError, Transform, TransformKind};
pub use num::{Complex, Complex32, Complex64, Float};
#[cfg(feature = "parallel")]
pub use parallel::{ParallelConfig, ParallelRadix2Fft};
#[cfg(feature = "parallel")]
pub use pool::PoolShutdown;
pub use radix2::Radix2Fft;
pub use spectrum::SpectrumBuffer;
pub use symmetric::SymmetricDft;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn engines() -> Vec<alloc::boxed::Box<dyn Transform<f64>>> {
        TransformKind::ALL
            .iter()
            .map(|&kind| new_transform::<f64>(kind).unwrap())
            .collect()
    }

    #[test]
    fn impulse_is_flat_in_every_engine() {
        let mut signal = [0.0f64; 8];
        signal[0] = 1.0;
        for engine in engines() {
            let mut spectrum = engine.allocate_spectrum(8);
            engine.forward(&signal, &mut spectrum).unwrap();
            for k in 0..spectrum.len() {
                assert!((spectrum.re(k) - 1.0).abs() < 1e-12, "{}", engine.name());
                assert!(spectrum.im(k).abs() < 1e-12, "{}", engine.name());
            }
            let mut out = [0.0f64; 8];
            engine.inverse(&mut spectrum, &mut out).unwrap();
            for (a, b) in signal.iter().zip(out.iter()) {
                assert!((a - b).abs() < 1e-12, "{}", engine.name());
            }
        }
    }

    #[test]
    fn random_roundtrip_in_every_engine() {
        let mut rng = StdRng::seed_from_u64(42);
        let signal: Vec<f64> = (0..64).map(|_| rng.gen_range(-10.0..10.0)).collect();
        for engine in engines() {
            let mut spectrum = engine.forward_vec(&signal).unwrap();
            let mut out = vec![0.0; signal.len()];
            engine.inverse(&mut spectrum, &mut out).unwrap();
            for (a, b) in signal.iter().zip(out.iter()) {
                assert!((a - b).abs() < 1e-9, "{}: {a} vs {b}", engine.name());
            }
        }
    }

    #[test]
    fn f32_engines_roundtrip() {
        let signal: Vec<f32> = (0..16).map(|i| (i as f32 * 0.5) - 3.0).collect();
        for &kind in TransformKind::ALL {
            let engine = new_transform::<f32>(kind).unwrap();
            let mut spectrum = engine.forward_vec(&signal).unwrap();
            let mut out = vec![0.0f32; 16];
            engine.inverse(&mut spectrum, &mut out).unwrap();
            for (a, b) in signal.iter().zip(out.iter()) {
                assert!((a - b).abs() < 1e-4, "{kind:?}: {a} vs {b}");
            }
        }
    }
}
