//! HMAC (RFC 2104) over any [`Digest`].
//!
//! The keyed inner and outer states are computed once at construction and
//! cloned on every reset, so per-message cost is two finalizations plus the
//! message itself.

#![allow(clippy::indexing_slicing)] // Scratch slices bounded by `chunks(SCRATCH)`

use core::cmp::min;

use traits::{BlockLen, Digest, DigestError, error::check_output_window};

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;
const SCRATCH: usize = 64;

/// Keyed-hash message authentication code.
///
/// Keys longer than the hash's block are hashed first. Block-less
/// constructions pad the key to the smallest multiple of their base length
/// (see [`BlockLen::KeyMultiple`]).
///
/// ```
/// use hashes::{crypto::Sha256, hmac::Hmac};
///
/// let mut mac = Hmac::<Sha256>::new_from_slice(b"Jefe");
/// mac.update(b"what do ya want for nothing?");
/// let tag = mac.finalize();
/// assert_eq!(tag[..4], [0x5b, 0xdc, 0xc1, 0x46]);
/// ```
#[derive(Clone)]
pub struct Hmac<D: Digest> {
  inner: D,
  inner_init: D,
  outer_init: D,
}

impl<D: Digest> core::fmt::Debug for Hmac<D> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Hmac").field("digest", &D::NAME).finish_non_exhaustive()
  }
}

/// Feed `key ^ pad` followed by `pad` bytes up to `block` total bytes.
fn absorb_padded<D: Digest>(h: &mut D, key: &[u8], block: usize, pad: u8) {
  let mut scratch = [0u8; SCRATCH];
  for piece in key.chunks(SCRATCH) {
    for (dst, k) in scratch.iter_mut().zip(piece) {
      *dst = k ^ pad;
    }
    h.update(&scratch[..piece.len()]);
  }

  let fill = [pad; SCRATCH];
  let mut fed = key.len();
  while fed < block {
    let n = min(SCRATCH, block - fed);
    h.update(&fill[..n]);
    fed += n;
  }
}

impl<D: Digest> Hmac<D> {
  /// Create a MAC with `key`. Any key length is accepted.
  #[must_use]
  pub fn new_from_slice(key: &[u8]) -> Self {
    let hashed;
    let mut key = key;
    if key.len() > D::BLOCK_LEN.effective_for_key(key.len()) {
      hashed = D::digest(key);
      key = hashed.as_ref();
    }
    let block = D::BLOCK_LEN.effective_for_key(key.len());

    let mut inner = D::new();
    absorb_padded(&mut inner, key, block, IPAD);
    let mut outer = D::new();
    absorb_padded(&mut outer, key, block, OPAD);

    Self {
      inner: inner.clone(),
      inner_init: inner,
      outer_init: outer,
    }
  }

  #[inline]
  pub fn update(&mut self, data: &[u8]) {
    self.inner.update(data);
  }

  /// Produce the tag and return to the keyed initial state.
  #[must_use]
  pub fn finalize(&mut self) -> D::Output {
    let inner_hash = self.inner.finalize();
    self.inner = self.inner_init.clone();
    let mut outer = self.outer_init.clone();
    outer.update(inner_hash.as_ref());
    outer.finalize()
  }

  /// Write the tag into `out[offset..offset + len]` and reset.
  ///
  /// # Errors
  ///
  /// [`DigestError::InsufficientOutputSpace`] if the window is shorter than
  /// the tag; nothing is written and the state is kept.
  pub fn finalize_into(&mut self, out: &mut [u8], offset: usize, len: usize) -> Result<usize, DigestError> {
    check_output_window(out.len(), offset, len, D::OUTPUT_SIZE)?;
    let Some(dst) = out.get_mut(offset..).and_then(|rest| rest.get_mut(..D::OUTPUT_SIZE)) else {
      return Err(DigestError::insufficient(D::OUTPUT_SIZE, out.len().saturating_sub(offset)));
    };
    let tag = self.finalize();
    dst.copy_from_slice(tag.as_ref());
    Ok(D::OUTPUT_SIZE)
  }

  /// Discard buffered input, keeping the key.
  #[inline]
  pub fn reset(&mut self) {
    self.inner = self.inner_init.clone();
  }
}

impl<D: Digest + 'static> traits::DynDigest for Hmac<D> {
  #[inline]
  fn update(&mut self, data: &[u8]) {
    Hmac::update(self, data);
  }

  #[inline]
  fn finalize_into(&mut self, out: &mut [u8], offset: usize, len: usize) -> Result<usize, DigestError> {
    Hmac::finalize_into(self, out, offset, len)
  }

  #[inline]
  fn reset(&mut self) {
    Hmac::reset(self);
  }

  #[cfg(feature = "alloc")]
  fn box_clone(&self) -> alloc::boxed::Box<dyn traits::DynDigest> {
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
    "hmac"
  }
}
