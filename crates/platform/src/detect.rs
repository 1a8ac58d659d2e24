//! Capability detection, caching, and overrides.
//!
//! - Compile-time detection via `cfg!(target_feature = "...")` everywhere
//! - Runtime detection via `std::arch::is_*_feature_detected!` with `std`
//! - One detection per process (`OnceLock`); the result never changes after
//! - A pre-init override for bare metal and tests
//! - Miri always sees portable caps

#[cfg(feature = "std")]
use std::sync::{OnceLock, RwLock};

use crate::caps::Caps;
#[allow(unused_imports)]
use crate::caps::{aarch64, x86};

/// Why an override was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum OverrideError {
  /// Detection already ran; the capability list is frozen.
  #[error("capabilities already initialized")]
  AlreadyInitialized,
  /// Overrides need `std`.
  #[error("capability overrides are not supported on this target")]
  Unsupported,
}

// ─────────────────────────────────────────────────────────────────────────────
// Cache and Override
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "std")]
static CACHE: OnceLock<Caps> = OnceLock::new();

#[cfg(feature = "std")]
static OVERRIDE: RwLock<Option<Caps>> = RwLock::new(None);

/// Detected (or overridden) capabilities, computed once.
#[inline]
pub fn caps() -> Caps {
  #[cfg(miri)]
  {
    Caps::NONE
  }

  #[cfg(all(not(miri), feature = "std"))]
  {
    *CACHE.get_or_init(detect_with_override)
  }

  #[cfg(all(not(miri), not(feature = "std")))]
  {
    compile_time()
  }
}

/// Whether the capability list has been frozen by a first read.
#[inline]
pub fn is_initialized() -> bool {
  #[cfg(feature = "std")]
  {
    CACHE.get().is_some()
  }

  #[cfg(not(feature = "std"))]
  {
    true
  }
}

pub fn try_set_override(value: Option<Caps>) -> Result<(), OverrideError> {
  #[cfg(feature = "std")]
  {
    if CACHE.get().is_some() {
      return Err(OverrideError::AlreadyInitialized);
    }
    match OVERRIDE.write() {
      Ok(mut guard) => {
        *guard = value;
        Ok(())
      }
      Err(_) => Err(OverrideError::Unsupported),
    }
  }

  #[cfg(not(feature = "std"))]
  {
    let _ = value;
    Err(OverrideError::Unsupported)
  }
}

pub fn has_override() -> bool {
  #[cfg(feature = "std")]
  {
    OVERRIDE.read().map(|g| g.is_some()).unwrap_or(false)
  }

  #[cfg(not(feature = "std"))]
  {
    false
  }
}

#[cold]
#[cfg(all(not(miri), feature = "std"))]
fn detect_with_override() -> Caps {
  if let Ok(guard) = OVERRIDE.read()
    && let Some(ov) = *guard
  {
    tracing::debug!(caps = %ov, "using capability override");
    return ov;
  }
  let detected = compile_time().union(runtime());
  tracing::debug!(arch = %crate::Arch::current(), caps = %detected, "detected CPU capabilities");
  detected
}

// ─────────────────────────────────────────────────────────────────────────────
// Detection
// ─────────────────────────────────────────────────────────────────────────────

/// Features the compiler was told it may assume.
#[must_use]
pub const fn compile_time() -> Caps {
  let mut c = Caps::NONE;
  if cfg!(any(target_arch = "x86_64", target_arch = "x86")) {
    if cfg!(target_feature = "ssse3") {
      c = c.union(x86::SSSE3);
    }
    if cfg!(target_feature = "sse4.1") {
      c = c.union(x86::SSE41);
    }
    if cfg!(target_feature = "avx2") {
      c = c.union(x86::AVX2);
    }
    if cfg!(target_feature = "avx512f") {
      c = c.union(x86::AVX512F);
    }
    if cfg!(target_feature = "avx512vl") {
      c = c.union(x86::AVX512VL);
    }
    if cfg!(target_feature = "sha") {
      c = c.union(x86::SHA);
    }
    if cfg!(target_feature = "sha512") {
      c = c.union(x86::SHA512);
    }
  }
  if cfg!(target_arch = "aarch64") {
    if cfg!(target_feature = "neon") {
      c = c.union(aarch64::NEON);
    }
    if cfg!(target_feature = "sha2") {
      c = c.union(aarch64::SHA2);
    }
    // Rust's `sha3` target feature covers both FEAT_SHA3 and FEAT_SHA512.
    if cfg!(target_feature = "sha3") {
      c = c.union(aarch64::SHA3).union(aarch64::SHA512);
    }
  }
  c
}

#[cfg(all(feature = "std", any(target_arch = "x86_64", target_arch = "x86")))]
fn runtime() -> Caps {
  let mut c = Caps::NONE;
  if std::arch::is_x86_feature_detected!("ssse3") {
    c |= x86::SSSE3;
  }
  if std::arch::is_x86_feature_detected!("sse4.1") {
    c |= x86::SSE41;
  }
  if std::arch::is_x86_feature_detected!("avx2") {
    c |= x86::AVX2;
  }
  if std::arch::is_x86_feature_detected!("avx512f") {
    c |= x86::AVX512F;
  }
  if std::arch::is_x86_feature_detected!("avx512vl") {
    c |= x86::AVX512VL;
  }
  if std::arch::is_x86_feature_detected!("sha") {
    c |= x86::SHA;
  }
  c
}

#[cfg(all(feature = "std", target_arch = "aarch64"))]
fn runtime() -> Caps {
  let mut c = aarch64::NEON;
  if std::arch::is_aarch64_feature_detected!("sha2") {
    c |= aarch64::SHA2;
  }
  if std::arch::is_aarch64_feature_detected!("sha3") {
    c |= aarch64::SHA3 | aarch64::SHA512;
  }
  c
}

#[cfg(all(
  feature = "std",
  not(any(target_arch = "x86_64", target_arch = "x86", target_arch = "aarch64"))
))]
fn runtime() -> Caps {
  Caps::NONE
}

#[cfg(all(test, feature = "std", not(miri)))]
mod tests {
  use super::*;

  #[test]
  fn detection_is_stable_and_frozen() {
    let first = caps();
    assert_eq!(caps(), first);
    assert!(is_initialized());
    assert_eq!(try_set_override(Some(Caps::NONE)), Err(OverrideError::AlreadyInitialized));
    assert_eq!(caps(), first);
  }

  #[test]
  fn runtime_includes_compile_time() {
    assert!(caps().has(compile_time()) || has_override());
  }

  #[cfg(target_arch = "aarch64")]
  #[test]
  fn neon_is_baseline() {
    assert!(compile_time().union(runtime()).has(aarch64::NEON));
  }
}
