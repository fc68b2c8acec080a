//! Internal logging hooks.
//!
//! With the `verbose-logging` feature the macros forward to the [`log`]
//! facade; without it they expand to nothing and the crate performs no
//! logging at all.

#[cfg(feature = "verbose-logging")]
macro_rules! fft_debug {
    ($($arg:tt)+) => { log::debug!(target: "specfft", $($arg)+) };
}

#[cfg(not(feature = "verbose-logging"))]
macro_rules! fft_debug {
    ($($arg:tt)+) => {};
}

#[cfg(feature = "verbose-logging")]
macro_rules! fft_trace {
    ($($arg:tt)+) => { log::trace!(target: "specfft", $($arg)+) };
}

#[cfg(not(feature = "verbose-logging"))]
macro_rules! fft_trace {
    ($($arg:tt)+) => {};
}

#[cfg(feature = "verbose-logging")]
macro_rules! fft_warn {
    ($($arg:tt)+) => { log::warn!(target: "specfft", $($arg)+) };
}

#[cfg(not(feature = "verbose-logging"))]
macro_rules! fft_warn {
    ($($arg:tt)+) => {};
}

pub(crate) use {fft_debug, fft_trace, fft_warn};
