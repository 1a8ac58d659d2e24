//! Streaming digest traits.
//!
//! [`Digest`] is the static, zero-cost contract implemented by every hash in
//! the workspace. [`DynDigest`] is its object-safe counterpart used where the
//! concrete algorithm is only known at runtime (dispatch, keyed composition).

use core::fmt::Debug;

use crate::error::{DigestError, check_output_window};

/// Internal block length of a hash construction.
///
/// Keyed composition (HMAC) pads keys to the block length. Most algorithms
/// have a fixed block; block-less constructions instead ask for the key to be
/// padded to the smallest multiple of a base length that holds the key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockLen {
  /// A fixed block of `n` bytes.
  Fixed(usize),
  /// Effective block is the smallest multiple of `n` that is `>= key length`.
  KeyMultiple(usize),
}

impl BlockLen {
  /// Decode the signed convention: positive is a fixed block, negative means
  /// "multiple of `|raw|`". Zero is not a valid block length.
  #[inline]
  #[must_use]
  pub const fn from_raw(raw: i32) -> Option<Self> {
    if raw > 0 {
      Some(Self::Fixed(raw as usize))
    } else if raw < 0 {
      Some(Self::KeyMultiple(raw.unsigned_abs() as usize))
    } else {
      None
    }
  }

  /// Encode as the signed convention (see [`BlockLen::from_raw`]).
  ///
  /// Values that do not fit in an `i32` saturate.
  #[inline]
  #[must_use]
  pub const fn as_raw(self) -> i32 {
    match self {
      Self::Fixed(n) => {
        if n > i32::MAX as usize {
          i32::MAX
        } else {
          n as i32
        }
      }
      Self::KeyMultiple(n) => {
        if n > i32::MAX as usize {
          i32::MIN
        } else {
          -(n as i32)
        }
      }
    }
  }

  /// Block size to use when padding a key of `key_len` bytes.
  ///
  /// For [`BlockLen::KeyMultiple`] an empty key still gets one base block.
  #[inline]
  #[must_use]
  pub const fn effective_for_key(self, key_len: usize) -> usize {
    match self {
      Self::Fixed(n) => n,
      Self::KeyMultiple(n) => {
        if key_len == 0 {
          n
        } else {
          key_len.div_ceil(n) * n
        }
      }
    }
  }
}

/// Hash function producing a fixed-size digest, fed incrementally.
///
/// `finalize` completes the computation and returns the hasher to its
/// initial (possibly keyed) state, so a second `finalize` with no update in
/// between yields the digest of the empty continuation.
pub trait Digest: Clone + Default {
  /// Output size in bytes.
  const OUTPUT_SIZE: usize;

  /// Internal block length.
  const BLOCK_LEN: BlockLen;

  /// Stable lower-case algorithm name (e.g. `"sha256"`).
  const NAME: &'static str;

  /// The digest output type. Typically `[u8; N]`.
  type Output: Copy + Eq + Debug + AsRef<[u8]>;

  /// Create a new hasher in its initial state.
  #[must_use]
  fn new() -> Self;

  /// Update the hasher with additional data.
  fn update(&mut self, data: &[u8]);

  /// Update the hasher with a single byte.
  #[inline]
  fn update_byte(&mut self, byte: u8) {
    self.update(core::slice::from_ref(&byte));
  }

  /// Update the hasher with multiple non-contiguous buffers.
  #[inline]
  fn update_vectored(&mut self, bufs: &[&[u8]]) {
    for buf in bufs {
      self.update(buf);
    }
  }

  /// Update the hasher with `std::io::IoSlice` buffers.
  #[cfg(feature = "std")]
  #[inline]
  fn update_io_slices(&mut self, bufs: &[std::io::IoSlice<'_>]) {
    for buf in bufs {
      self.update(buf);
    }
  }

  /// Finalize, return the digest, and reset to the initial state.
  #[must_use]
  fn finalize(&mut self) -> Self::Output;

  /// Finalize into `out[offset..offset + len]`.
  ///
  /// Fails with [`DigestError::InsufficientOutputSpace`] when the window
  /// cannot hold [`Self::OUTPUT_SIZE`] bytes; nothing is written and the
  /// hasher state is left as it was. On success exactly `OUTPUT_SIZE` bytes
  /// are written at `offset`, the hasher is reset, and the byte count is
  /// returned.
  fn finalize_into(&mut self, out: &mut [u8], offset: usize, len: usize) -> Result<usize, DigestError> {
    check_output_window(out.len(), offset, len, Self::OUTPUT_SIZE)?;
    let Some(dst) = out.get_mut(offset..).and_then(|rest| rest.get_mut(..Self::OUTPUT_SIZE)) else {
      return Err(DigestError::insufficient(Self::OUTPUT_SIZE, out.len().saturating_sub(offset)));
    };
    let digest = self.finalize();
    dst.copy_from_slice(digest.as_ref());
    Ok(Self::OUTPUT_SIZE)
  }

  /// Reset the hasher to its initial state without producing output.
  fn reset(&mut self);

  /// Compute the digest of data in one shot.
  #[inline]
  #[must_use]
  fn digest(data: &[u8]) -> Self::Output {
    let mut h = Self::new();
    h.update(data);
    h.finalize()
  }

  /// Compute the digest of multiple buffers in one shot.
  #[inline]
  #[must_use]
  fn digest_vectored(bufs: &[&[u8]]) -> Self::Output {
    let mut h = Self::new();
    h.update_vectored(bufs);
    h.finalize()
  }

  /// Wrap a reader to compute the digest transparently during I/O.
  #[cfg(feature = "std")]
  #[inline]
  #[must_use]
  fn reader<R>(inner: R) -> crate::io::DigestReader<R, Self>
  where
    Self: Sized,
  {
    crate::io::DigestReader::new(inner)
  }

  /// Wrap a writer to compute the digest transparently during I/O.
  #[cfg(feature = "std")]
  #[inline]
  #[must_use]
  fn writer<W>(inner: W) -> crate::io::DigestWriter<W, Self>
  where
    Self: Sized,
  {
    crate::io::DigestWriter::new(inner)
  }
}

/// Object-safe digest interface.
///
/// Implemented for every [`Digest`] and directly by hashers whose output
/// length is a runtime parameter. `box_clone` is the deep copy: the clone
/// shares no buffers with the original.
pub trait DynDigest {
  /// Update with additional data.
  fn update(&mut self, data: &[u8]);

  /// Update with a single byte.
  #[inline]
  fn update_byte(&mut self, byte: u8) {
    self.update(core::slice::from_ref(&byte));
  }

  /// Finalize into `out[offset..offset + len]`; see [`Digest::finalize_into`].
  fn finalize_into(&mut self, out: &mut [u8], offset: usize, len: usize) -> Result<usize, DigestError>;

  /// Finalize into a freshly allocated buffer of [`DynDigest::output_len`] bytes.
  #[cfg(feature = "alloc")]
  fn finalize_boxed(&mut self) -> alloc::boxed::Box<[u8]> {
    let len = self.output_len();
    let mut out = alloc::vec![0u8; len].into_boxed_slice();
    match self.finalize_into(&mut out, 0, len) {
      Ok(_) => out,
      Err(_) => unreachable!("buffer sized to output_len"),
    }
  }

  /// Reset to the initial state.
  fn reset(&mut self);

  /// Independent deep copy.
  #[cfg(feature = "alloc")]
  fn box_clone(&self) -> alloc::boxed::Box<dyn DynDigest>;

  /// Natural digest length in bytes.
  fn output_len(&self) -> usize;

  /// Internal block length.
  fn block_len(&self) -> BlockLen;

  /// Algorithm name.
  fn algorithm_name(&self) -> &'static str;
}

impl<D: Digest + 'static> DynDigest for D {
  #[inline]
  fn update(&mut self, data: &[u8]) {
    Digest::update(self, data);
  }

  #[inline]
  fn update_byte(&mut self, byte: u8) {
    Digest::update_byte(self, byte);
  }

  #[inline]
  fn finalize_into(&mut self, out: &mut [u8], offset: usize, len: usize) -> Result<usize, DigestError> {
    Digest::finalize_into(self, out, offset, len)
  }

  #[inline]
  fn reset(&mut self) {
    Digest::reset(self);
  }

  #[cfg(feature = "alloc")]
  #[inline]
  fn box_clone(&self) -> alloc::boxed::Box<dyn DynDigest> {
    alloc::boxed::Box::new(self.clone())
  }

  #[inline]
  fn output_len(&self) -> usize {
    D::OUTPUT_SIZE
  }

  #[inline]
  fn block_len(&self) -> BlockLen {
    D::BLOCK_LEN
  }

  #[inline]
  fn algorithm_name(&self) -> &'static str {
    D::NAME
  }
}

#[cfg(feature = "alloc")]
impl Clone for alloc::boxed::Box<dyn DynDigest> {
  #[inline]
  fn clone(&self) -> Self {
    self.box_clone()
  }
}

#[cfg(test)]
mod tests {
  use super::{BlockLen, Digest, DigestError};

  /// Order-sensitive toy digest: h = h * 31 + b over all bytes.
  #[derive(Clone, Default)]
  struct Poly(u32);

  impl Digest for Poly {
    const OUTPUT_SIZE: usize = 4;
    const BLOCK_LEN: BlockLen = BlockLen::Fixed(8);
    const NAME: &'static str = "poly";
    type Output = [u8; 4];

    fn new() -> Self {
      Self(7)
    }

    fn update(&mut self, data: &[u8]) {
      for &b in data {
        self.0 = self.0.wrapping_mul(31).wrapping_add(u32::from(b));
      }
    }

    fn finalize(&mut self) -> Self::Output {
      let out = self.0.to_be_bytes();
      self.reset();
      out
    }

    fn reset(&mut self) {
      *self = Self::new();
    }
  }

  #[test]
  fn block_len_raw_round_trip() {
    assert_eq!(BlockLen::from_raw(64), Some(BlockLen::Fixed(64)));
    assert_eq!(BlockLen::from_raw(-32), Some(BlockLen::KeyMultiple(32)));
    assert_eq!(BlockLen::from_raw(0), None);
    assert_eq!(BlockLen::Fixed(128).as_raw(), 128);
    assert_eq!(BlockLen::KeyMultiple(32).as_raw(), -32);
  }

  #[test]
  fn key_multiple_rounds_up() {
    let b = BlockLen::KeyMultiple(32);
    assert_eq!(b.effective_for_key(0), 32);
    assert_eq!(b.effective_for_key(1), 32);
    assert_eq!(b.effective_for_key(32), 32);
    assert_eq!(b.effective_for_key(33), 64);
    assert_eq!(BlockLen::Fixed(64).effective_for_key(1000), 64);
  }

  #[test]
  fn finalize_resets() {
    let mut h = Poly::new();
    h.update(b"abc");
    let first = h.finalize();
    assert_eq!(first, Poly::digest(b"abc"));
    assert_eq!(h.finalize(), Poly::digest(b""));
  }

  #[test]
  fn finalize_into_rejects_short_window_without_writing() {
    let mut h = Poly::new();
    h.update(b"abc");
    let mut out = [0xAAu8; 6];

    assert_eq!(h.finalize_into(&mut out, 3, 6), Err(DigestError::insufficient(4, 3)));
    assert_eq!(h.finalize_into(&mut out, 0, 3), Err(DigestError::insufficient(4, 3)));
    assert_eq!(out, [0xAA; 6]);

    // State survived the failed attempts.
    assert_eq!(h.finalize_into(&mut out, 2, 4), Ok(4));
    assert_eq!(out[..2], [0xAA, 0xAA]);
    assert_eq!(out[2..], Poly::digest(b"abc"));
  }

  #[test]
  fn update_byte_matches_slice() {
    let mut a = Poly::new();
    for &b in b"hello" {
      a.update_byte(b);
    }
    assert_eq!(a.finalize(), Poly::digest(b"hello"));
  }

  #[cfg(feature = "alloc")]
  #[test]
  fn dyn_digest_box_clone_is_independent() {
    use super::DynDigest;

    let mut original: alloc::boxed::Box<dyn DynDigest> = alloc::boxed::Box::new(Poly::new());
    original.update(b"shared-");
    let mut branch = original.clone();
    original.update(b"left");
    branch.update(b"right");
    assert_eq!(&*original.finalize_boxed(), &Poly::digest(b"shared-left")[..]);
    assert_eq!(&*branch.finalize_boxed(), &Poly::digest(b"shared-right")[..]);
    assert_eq!(original.output_len(), 4);
    assert_eq!(original.block_len(), BlockLen::Fixed(8));
    assert_eq!(original.algorithm_name(), "poly");
  }
}
