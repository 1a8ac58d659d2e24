//! Error types for digest construction and output.
//!
//! Hashing itself never fails on valid input. Errors are reported for the
//! caller-controlled edges only: invalid fixed parameters at construction,
//! destinations too small for a digest, and out-of-range reads from composite
//! byte views. Invariant violations inside an engine are bugs and panic.

use thiserror::Error;

/// Invalid fixed parameters supplied when constructing a hasher.
///
/// Reported at construction time, never silently defaulted.
///
/// # Examples
///
/// ```
/// use traits::ConstructionError;
///
/// let err = ConstructionError::InvalidKeyLength { expected: 32, actual: 16 };
/// assert_eq!(err.to_string(), "invalid key length: expected 32 bytes, got 16");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[non_exhaustive]
pub enum ConstructionError {
  /// A fixed-size key had the wrong length.
  #[error("invalid key length: expected {expected} bytes, got {actual}")]
  InvalidKeyLength { expected: usize, actual: usize },

  /// A truncated-output parameter (in bits) is not supported by the algorithm.
  #[error("unsupported output length: {0} bits")]
  UnsupportedOutputBits(usize),

  /// A requested output length (in bytes) is not valid for the algorithm.
  #[error("invalid output length: {0} bytes")]
  InvalidOutputLength(usize),

  /// The mode requires a key but none was supplied.
  #[error("missing key")]
  MissingKey,

  /// The mode requires a customization/context string but none was supplied.
  #[error("missing context string")]
  MissingContext,

  /// A parameter was supplied that the algorithm does not accept.
  #[error("unexpected parameter: {0}")]
  UnexpectedParameter(&'static str),
}

/// Errors reported while producing output or reading composite byte views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[non_exhaustive]
pub enum DigestError {
  /// The destination region cannot hold the natural digest length.
  ///
  /// Nothing is written when this is returned.
  #[error("insufficient output space: digest needs {required} bytes, destination has {available}")]
  InsufficientOutputSpace { required: usize, available: usize },

  /// A logical offset past the end of a composite byte view was read.
  #[error("index {index} out of range for byte view of length {len}")]
  OutOfRangeIndex { index: usize, len: usize },
}

impl DigestError {
  /// Shorthand for [`DigestError::InsufficientOutputSpace`].
  #[inline]
  #[must_use]
  pub const fn insufficient(required: usize, available: usize) -> Self {
    Self::InsufficientOutputSpace { required, available }
  }
}

/// Check that `len` bytes starting at `offset` fit in a destination of
/// `dest_len` bytes and can hold a `required`-byte digest.
///
/// Returns the writable window length on success.
#[inline]
pub fn check_output_window(dest_len: usize, offset: usize, len: usize, required: usize) -> Result<usize, DigestError> {
  let room = dest_len.saturating_sub(offset);
  let available = core::cmp::min(room, len);
  if available < required {
    return Err(DigestError::insufficient(required, available));
  }
  Ok(available)
}

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::string::ToString;

  use super::*;

  #[test]
  fn out_of_range_message_names_index_and_length() {
    let msg = DigestError::OutOfRangeIndex { index: 12, len: 7 }.to_string();
    assert!(msg.contains("12"));
    assert!(msg.contains('7'));
  }

  #[test]
  fn insufficient_message() {
    assert_eq!(
      DigestError::insufficient(32, 31).to_string(),
      "insufficient output space: digest needs 32 bytes, destination has 31"
    );
  }

  #[test]
  fn output_window_checks_offset_and_length() {
    assert_eq!(check_output_window(64, 0, 64, 32), Ok(64));
    assert_eq!(check_output_window(64, 32, 64, 32), Ok(32));
    assert_eq!(check_output_window(64, 33, 64, 32), Err(DigestError::insufficient(32, 31)));
    assert_eq!(check_output_window(64, 0, 16, 32), Err(DigestError::insufficient(32, 16)));
    assert_eq!(check_output_window(8, 100, 64, 32), Err(DigestError::insufficient(32, 0)));
  }

  #[test]
  fn construction_errors_are_copy_and_comparable() {
    let e = ConstructionError::UnsupportedOutputBits(384);
    let e2 = e;
    assert_eq!(e, e2);
    assert_eq!(e.to_string(), "unsupported output length: 384 bits");
  }

  #[test]
  fn error_trait_impl() {
    fn assert_error<T: core::error::Error + Send + Sync + 'static>() {}
    assert_error::<ConstructionError>();
    assert_error::<DigestError>();
  }
}
