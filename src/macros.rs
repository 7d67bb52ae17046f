#![allow(unused_imports)]
#![allow(unused_macros)]

// Logging macros for envstruct
//
// These forward to tracing when the `tracing` feature is enabled (and always
// under test), and expand to nothing otherwise.

// -----------------------------------------------------------------------------
// trace! - per-key lookups, per-element unmarshaling
// -----------------------------------------------------------------------------

#[cfg(any(feature = "tracing", test))]
macro_rules! trace {
    ($($arg:tt)*) => { ::tracing::trace!($($arg)*) }
}

#[cfg(not(any(feature = "tracing", test)))]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

// -----------------------------------------------------------------------------
// debug! - decision points: suppressed segments, matched keys, splits
// -----------------------------------------------------------------------------

#[cfg(any(feature = "tracing", test))]
macro_rules! debug {
    ($($arg:tt)*) => { ::tracing::debug!($($arg)*) }
}

#[cfg(not(any(feature = "tracing", test)))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

pub(crate) use debug;
pub(crate) use trace;
