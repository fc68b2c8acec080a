//! The transform contract shared by every engine.
//!
//! Each engine implements [`Transform`]: `forward` turns a real signal
//! into a complex [`SpectrumBuffer`], `inverse` turns it back. Buffers are
//! supplied by the caller, validated eagerly, and mutated in place.
//!
//! | Engine | Sizes | Spectrum bins | Cost |
//! |--------|-------|---------------|------|
//! | [`NaiveDft`](crate::dft::NaiveDft) | any N | N | O(N²) |
//! | [`SymmetricDft`](crate::symmetric::SymmetricDft) | any N | N/2+1 | O(N²)/2 |
//! | [`Radix2Fft`](crate::radix2::Radix2Fft) | power of two | N | O(N log N) |
//! | `ParallelRadix2Fft` | power of two | N | O(N log N) across threads |

use alloc::boxed::Box;
use core::fmt;

use crate::num::Float;
use crate::spectrum::SpectrumBuffer;

/// Why an argument was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentError {
    EmptyInput,
    NonPowerOfTwo { len: usize },
    BufferTooSmall { required: usize, actual: usize },
    /// The length cannot be represented exactly in the sample type.
    LengthNotRepresentable { len: usize },
    MismatchedLengths,
    ZeroThreads,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftError {
    InvalidArgument(ArgumentError),
    /// A worker panicked while running its share of a stage.
    WorkerFailed,
    /// The worker pool could not be created.
    PoolBuild,
    /// Another transform is already running on this instance.
    Busy,
}

impl FftError {
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, FftError::InvalidArgument(_))
    }
}

impl From<ArgumentError> for FftError {
    fn from(err: ArgumentError) -> Self {
        FftError::InvalidArgument(err)
    }
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentError::EmptyInput => write!(f, "input is empty"),
            ArgumentError::NonPowerOfTwo { len } => {
                write!(f, "length {len} is not a power of two")
            }
            ArgumentError::BufferTooSmall { required, actual } => {
                write!(f, "buffer holds {actual} values, {required} required")
            }
            ArgumentError::LengthNotRepresentable { len } => {
                write!(f, "length {len} is not exactly representable")
            }
            ArgumentError::MismatchedLengths => {
                write!(f, "real and imaginary parts differ in length")
            }
            ArgumentError::ZeroThreads => write!(f, "worker pool needs at least one thread"),
        }
    }
}

impl fmt::Display for FftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FftError::InvalidArgument(reason) => write!(f, "invalid argument: {reason}"),
            FftError::WorkerFailed => write!(f, "a worker failed during a butterfly stage"),
            FftError::PoolBuild => write!(f, "failed to build the worker pool"),
            FftError::Busy => write!(f, "a transform is already in flight on this instance"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FftError {}

/// Sign of the exponent in `e^(sign·2πi·k/len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Inverse,
}

impl Direction {
    #[inline(always)]
    pub fn sign<T: Float>(self) -> T {
        match self {
            Direction::Forward => -T::one(),
            Direction::Inverse => T::one(),
        }
    }
}

pub trait Transform<T: Float> {
    fn name(&self) -> &'static str;

    /// Number of bins `forward` writes for a signal of `signal_len` samples.
    fn spectrum_len(&self, signal_len: usize) -> usize;

    /// Transform `signal` into `spectrum[..self.spectrum_len(signal.len())]`.
    fn forward(&self, signal: &[T], spectrum: &mut SpectrumBuffer<T>) -> Result<(), FftError>;

    /// Reconstruct real samples from `spectrum` into `signal`.
    ///
    /// The full-spectrum engines take `N` from `spectrum.len()`, while
    /// [`SymmetricDft`](crate::symmetric::SymmetricDft) takes it from
    /// `signal.len()`. A buffer that `forward` filled only partially (one with
    /// more than `spectrum_len(N)` bins) is therefore read back as a longer
    /// transform; for the radix-2 engines that length is usually not a
    /// power of two and is rejected. Pass a buffer of exactly
    /// `spectrum_len(N)` bins to round-trip.
    ///
    /// The FFT engines use `spectrum` as in-place workspace: on return it
    /// holds the complex time-domain result, not the original bins.
    fn inverse(&self, spectrum: &mut SpectrumBuffer<T>, signal: &mut [T]) -> Result<(), FftError>;

    fn allocate_spectrum(&self, signal_len: usize) -> SpectrumBuffer<T> {
        SpectrumBuffer::allocate(self.spectrum_len(signal_len))
    }

    fn forward_vec(&self, signal: &[T]) -> Result<SpectrumBuffer<T>, FftError> {
        let mut spectrum = self.allocate_spectrum(signal.len());
        self.forward(signal, &mut spectrum)?;
        Ok(spectrum)
    }
}

/// Selects an engine for [`new_transform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    Naive,
    Symmetric,
    Radix2,
    #[cfg(feature = "parallel")]
    ParallelRadix2,
}

impl TransformKind {
    #[cfg(feature = "parallel")]
    pub const ALL: &'static [TransformKind] = &[
        TransformKind::Naive,
        TransformKind::Symmetric,
        TransformKind::Radix2,
        TransformKind::ParallelRadix2,
    ];
    #[cfg(not(feature = "parallel"))]
    pub const ALL: &'static [TransformKind] = &[
        TransformKind::Naive,
        TransformKind::Symmetric,
        TransformKind::Radix2,
    ];

    pub fn requires_power_of_two(self) -> bool {
        match self {
            TransformKind::Naive | TransformKind::Symmetric => false,
            TransformKind::Radix2 => true,
            #[cfg(feature = "parallel")]
            TransformKind::ParallelRadix2 => true,
        }
    }
}

/// Build the engine named by `kind`.
///
/// The parallel engine is configured from the environment, see
/// `ParallelConfig::from_env`.
pub fn new_transform<T: Float>(kind: TransformKind) -> Result<Box<dyn Transform<T>>, FftError> {
    Ok(match kind {
        TransformKind::Naive => Box::new(crate::dft::NaiveDft),
        TransformKind::Symmetric => Box::new(crate::symmetric::SymmetricDft),
        TransformKind::Radix2 => Box::new(crate::radix2::Radix2Fft),
        #[cfg(feature = "parallel")]
        TransformKind::ParallelRadix2 => Box::new(crate::parallel::ParallelRadix2Fft::new()?),
    })
}

/// Reject lengths the sample type cannot index exactly.
pub(crate) fn check_len<T: Float>(n: usize) -> Result<(), FftError> {
    if n == 0 {
        return Err(ArgumentError::EmptyInput.into());
    }
    if T::from_usize(n).is_none() {
        return Err(ArgumentError::LengthNotRepresentable { len: n }.into());
    }
    Ok(())
}

pub(crate) fn check_power_of_two(n: usize) -> Result<(), FftError> {
    if !n.is_power_of_two() {
        return Err(ArgumentError::NonPowerOfTwo { len: n }.into());
    }
    Ok(())
}

pub(crate) fn check_capacity(required: usize, actual: usize) -> Result<(), FftError> {
    if actual < required {
        return Err(ArgumentError::BufferTooSmall { required, actual }.into());
    }
    Ok(())
}
