//! Runtime algorithm selection.
//!
//! A [`Descriptor`] names an algorithm plus its fixed parameters (output
//! length, key, context). The [`Registry`] turns it into a boxed
//! [`DynDigest`]: an installed native provider is asked first, and the
//! portable in-crate implementation is used when the native provider
//! declines.
//!
//! ```
//! use hashes::dispatch::{self, Algorithm, Descriptor};
//!
//! let mut h = dispatch::create(&Descriptor::new(Algorithm::Sha256))?;
//! h.update(b"abc");
//! assert_eq!(h.finalize_boxed()[..4], [0xba, 0x78, 0x16, 0xbf]);
//! # Ok::<(), hashes::dispatch::ProviderError>(())
//! ```

use alloc::{string::String, vec::Vec};
use core::{fmt, str::FromStr};

use thiserror::Error;
use traits::ConstructionError;

mod config;
mod provider;
mod registry;

pub use config::{DispatchConfig, DispatchForce};
pub use provider::{PortableProvider, Provider, ProviderError};
#[cfg(any(feature = "std", target_has_atomic = "ptr"))]
pub use registry::{create, global, install_native_provider};
pub use registry::{InstallError, Registry};

// ─────────────────────────────────────────────────────────────────────────────
// Algorithm
// ─────────────────────────────────────────────────────────────────────────────

/// Every algorithm the registry can build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Algorithm {
  Blake3,
  Sha1,
  Sha224,
  Sha256,
  Sha384,
  Sha512,
  Sha512_224,
  Sha512_256,
  /// SHA-512/t; `t` comes from [`Descriptor::with_output_len`].
  Sha512Trunc,
}

impl Algorithm {
  pub const ALL: [Self; 9] = [
    Self::Blake3,
    Self::Sha1,
    Self::Sha224,
    Self::Sha256,
    Self::Sha384,
    Self::Sha512,
    Self::Sha512_224,
    Self::Sha512_256,
    Self::Sha512Trunc,
  ];

  /// Canonical lower-case name.
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Blake3 => "blake3",
      Self::Sha1 => "sha1",
      Self::Sha224 => "sha224",
      Self::Sha256 => "sha256",
      Self::Sha384 => "sha384",
      Self::Sha512 => "sha512",
      Self::Sha512_224 => "sha512/224",
      Self::Sha512_256 => "sha512/256",
      Self::Sha512Trunc => "sha512/t",
    }
  }

  /// Natural output length in bytes, if fixed.
  #[must_use]
  pub const fn output_len(self) -> Option<usize> {
    match self {
      Self::Blake3 | Self::Sha256 | Self::Sha512_256 => Some(32),
      Self::Sha1 => Some(20),
      Self::Sha224 | Self::Sha512_224 => Some(28),
      Self::Sha384 => Some(48),
      Self::Sha512 => Some(64),
      Self::Sha512Trunc => None,
    }
  }
}

impl fmt::Display for Algorithm {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Name that does not match any [`Algorithm`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown algorithm: {0}")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for Algorithm {
  type Err = UnknownAlgorithm;

  /// Case-insensitive; accepts the `SHA-256` spelling as well as `sha256`.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let normalized: String = s
      .trim()
      .chars()
      .filter(|c| *c != '-' && *c != '_')
      .map(|c| c.to_ascii_lowercase())
      .collect();
    Self::ALL
      .into_iter()
      .find(|a| a.name() == normalized)
      .ok_or_else(|| UnknownAlgorithm(String::from(s)))
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Descriptor
// ─────────────────────────────────────────────────────────────────────────────

/// Algorithm plus the fixed parameters needed to construct it.
///
/// Parameter rules:
///
/// - `key` on a SHA algorithm selects HMAC over that algorithm; on BLAKE3 it
///   selects keyed mode and must be 32 bytes. SHA-512/t takes no key.
/// - `context` is BLAKE3-only (derive-key mode) and excludes `key`.
/// - `output_len` is required for SHA-512/t (bytes, `t / 8`), any positive
///   value for BLAKE3, and must equal the natural length elsewhere.
#[derive(Clone, PartialEq, Eq)]
pub struct Descriptor {
  pub algorithm: Algorithm,
  pub output_len: Option<usize>,
  pub key: Option<Vec<u8>>,
  pub context: Option<String>,
}

impl fmt::Debug for Descriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    // Key bytes stay out of logs.
    f.debug_struct("Descriptor")
      .field("algorithm", &self.algorithm)
      .field("output_len", &self.output_len)
      .field("keyed", &self.key.is_some())
      .field("context", &self.context)
      .finish()
  }
}

impl Descriptor {
  #[must_use]
  pub const fn new(algorithm: Algorithm) -> Self {
    Self {
      algorithm,
      output_len: None,
      key: None,
      context: None,
    }
  }

  #[must_use]
  pub fn with_output_len(mut self, len: usize) -> Self {
    self.output_len = Some(len);
    self
  }

  #[must_use]
  pub fn with_key(mut self, key: &[u8]) -> Self {
    self.key = Some(key.to_vec());
    self
  }

  #[must_use]
  pub fn with_context(mut self, context: &str) -> Self {
    self.context = Some(String::from(context));
    self
  }

  /// Check parameter combinations without building anything.
  ///
  /// # Errors
  ///
  /// The [`ConstructionError`] the portable provider would report.
  pub fn validate(&self) -> Result<(), ConstructionError> {
    if self.context.is_some() {
      if self.algorithm != Algorithm::Blake3 {
        return Err(ConstructionError::UnexpectedParameter("context"));
      }
      if self.key.is_some() {
        return Err(ConstructionError::UnexpectedParameter("key"));
      }
    }

    match self.algorithm {
      Algorithm::Blake3 => {
        if let Some(key) = &self.key
          && key.len() != 32
        {
          return Err(ConstructionError::InvalidKeyLength {
            expected: 32,
            actual: key.len(),
          });
        }
        if self.output_len == Some(0) {
          return Err(ConstructionError::InvalidOutputLength(0));
        }
      }
      Algorithm::Sha512Trunc => {
        if self.key.is_some() {
          return Err(ConstructionError::UnexpectedParameter("key"));
        }
        if self.output_len.is_none() {
          return Err(ConstructionError::UnsupportedOutputBits(0));
        }
      }
      fixed => {
        if let Some(len) = self.output_len
          && Some(len) != fixed.output_len()
        {
          return Err(ConstructionError::InvalidOutputLength(len));
        }
      }
    }
    Ok(())
  }
}
