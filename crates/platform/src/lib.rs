//! CPU capability detection for omnihash.
//!
//! This crate is the single source of truth for "which instructions can run
//! here". Dispatch and native providers consult it; nothing else probes the
//! CPU.
//!
//! ```
//! use platform::caps::x86;
//!
//! let caps = platform::caps();
//! if caps.has(x86::SHA_READY) {
//!   // SHA-NI path
//! }
//! ```
//!
//! # Design
//!
//! 1. **One API**: algorithms query [`caps()`] instead of doing ad-hoc detection.
//! 2. **Detected once**: the first call freezes the result for the process
//!    (`OnceLock` with `std`, compile-time features without).
//! 3. **Overridable before first use**: [`set_caps_override`] for bare metal
//!    and tests.
//! 4. **Miri-safe**: under Miri, always portable.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod caps;
mod detect;

pub use caps::{Arch, Caps};
pub use detect::{OverrideError, compile_time};

/// Detected CPU capabilities.
///
/// Detection runs once; every later call returns the same value.
#[inline]
#[must_use]
pub fn caps() -> Caps {
  detect::caps()
}

/// Whether [`caps()`] has already been called (the list is frozen).
#[inline]
#[must_use]
pub fn is_initialized() -> bool {
  detect::is_initialized()
}

/// Set or clear the capabilities override.
///
/// Must run before the first call to [`caps()`]; afterwards the list is
/// immutable and this returns [`OverrideError::AlreadyInitialized`].
///
/// ```
/// # use platform::{Caps, OverrideError};
/// let _ = platform::caps();
/// assert_eq!(platform::set_caps_override(Some(Caps::NONE)), Err(OverrideError::AlreadyInitialized));
/// ```
#[cold]
pub fn set_caps_override(value: Option<Caps>) -> Result<(), OverrideError> {
  detect::try_set_override(value)
}

/// Check if an override is currently set.
#[inline]
#[must_use]
pub fn has_override() -> bool {
  detect::has_override()
}
