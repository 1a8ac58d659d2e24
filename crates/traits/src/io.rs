//! `std::io` adapters that hash bytes as they pass through.
//!
//! [`DigestReader`] and [`DigestWriter`] wrap any reader or writer and feed
//! exactly the bytes actually transferred into a [`Digest`](crate::Digest),
//! handling short reads and short writes.
//!
//! # Example
//!
//! ```rust
//! # use traits::{BlockLen, Digest};
//! # #[derive(Clone, Default)]
//! # struct SumDigest(u8);
//! # impl Digest for SumDigest {
//! #   const OUTPUT_SIZE: usize = 4;
//! #   const BLOCK_LEN: BlockLen = BlockLen::Fixed(1);
//! #   const NAME: &'static str = "sum";
//! #   type Output = [u8; 4];
//! #   fn new() -> Self { Self(0) }
//! #   fn update(&mut self, data: &[u8]) {
//! #     self.0 = data.iter().fold(self.0, |acc, &b| acc.wrapping_add(b));
//! #   }
//! #   fn finalize(&mut self) -> Self::Output { let out = [self.0; 4]; self.0 = 0; out }
//! #   fn reset(&mut self) { self.0 = 0; }
//! # }
//! # use std::io::Cursor;
//! let mut reader = SumDigest::reader(Cursor::new(b"abc".to_vec()));
//! std::io::copy(&mut reader, &mut std::io::sink())?;
//! assert_eq!(reader.digest(), [b'a'.wrapping_add(b'b').wrapping_add(b'c'); 4]);
//! # Ok::<(), std::io::Error>(())
//! ```

use crate::Digest;

#[inline]
fn read_and_update<R>(inner: &mut R, buf: &mut [u8], mut on_data: impl FnMut(&[u8])) -> std::io::Result<usize>
where
  R: std::io::Read,
{
  let n = inner.read(buf)?;
  if let Some(data) = buf.get(..n) {
    on_data(data);
  }
  Ok(n)
}

#[inline]
fn read_vectored_and_update<R>(
  inner: &mut R,
  bufs: &mut [std::io::IoSliceMut<'_>],
  mut on_data: impl FnMut(&[u8]),
) -> std::io::Result<usize>
where
  R: std::io::Read,
{
  let n = inner.read_vectored(bufs)?;
  let mut remaining = n;
  for buf in bufs {
    let to_hash = remaining.min(buf.len());
    if to_hash == 0 {
      break;
    }
    if let Some(data) = buf.get(..to_hash) {
      on_data(data);
    }
    remaining -= to_hash;
  }
  Ok(n)
}

#[inline]
fn write_and_update<W>(inner: &mut W, buf: &[u8], mut on_data: impl FnMut(&[u8])) -> std::io::Result<usize>
where
  W: std::io::Write,
{
  // Only the accepted prefix is hashed; the caller retries the rest.
  let n = inner.write(buf)?;
  if let Some(data) = buf.get(..n) {
    on_data(data);
  }
  Ok(n)
}

/// Wraps a [`Read`](std::io::Read) and computes a digest transparently.
///
/// Every read passes through to the inner reader; the bytes actually read
/// are fed into the digest.
#[derive(Clone)]
pub struct DigestReader<R, D: Digest> {
  inner: R,
  hasher: D,
}

impl<R, D: Digest> DigestReader<R, D> {
  /// Create a new reader wrapper with a fresh hasher.
  #[inline]
  #[must_use]
  pub fn new(inner: R) -> Self {
    Self::with_hasher(inner, D::new())
  }

  /// Create a new reader wrapper around an existing (possibly keyed) hasher.
  #[inline]
  #[must_use]
  pub fn with_hasher(inner: R, hasher: D) -> Self {
    Self { inner, hasher }
  }

  /// Digest of everything read so far.
  ///
  /// The running state is left untouched; further reads keep hashing.
  #[inline]
  #[must_use]
  pub fn digest(&self) -> D::Output {
    self.hasher.clone().finalize()
  }

  /// Get a mutable reference to the underlying hasher.
  #[inline]
  pub fn hasher_mut(&mut self) -> &mut D {
    &mut self.hasher
  }

  /// Unwrap, returning the inner reader and the final digest.
  #[inline]
  pub fn into_parts(mut self) -> (R, D::Output) {
    let digest = self.hasher.finalize();
    (self.inner, digest)
  }

  /// Unwrap, returning the inner reader and discarding the digest.
  #[inline]
  pub fn into_inner(self) -> R {
    self.inner
  }

  /// Get a reference to the inner reader.
  #[inline]
  pub fn inner(&self) -> &R {
    &self.inner
  }
}

impl<R: std::io::Read, D: Digest> std::io::Read for DigestReader<R, D> {
  #[inline]
  fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
    read_and_update(&mut self.inner, buf, |data| self.hasher.update(data))
  }

  #[inline]
  fn read_vectored(&mut self, bufs: &mut [std::io::IoSliceMut<'_>]) -> std::io::Result<usize> {
    read_vectored_and_update(&mut self.inner, bufs, |data| self.hasher.update(data))
  }
}

/// Wraps a [`Write`](std::io::Write) and computes a digest transparently.
///
/// Only the bytes the inner writer accepted are hashed, so a short write
/// followed by a retry of the remainder hashes every byte exactly once.
#[derive(Clone)]
pub struct DigestWriter<W, D: Digest> {
  inner: W,
  hasher: D,
}

impl<W, D: Digest> DigestWriter<W, D> {
  /// Create a new writer wrapper with a fresh hasher.
  #[inline]
  #[must_use]
  pub fn new(inner: W) -> Self {
    Self::with_hasher(inner, D::new())
  }

  /// Create a new writer wrapper around an existing (possibly keyed) hasher.
  #[inline]
  #[must_use]
  pub fn with_hasher(inner: W, hasher: D) -> Self {
    Self { inner, hasher }
  }

  /// Digest of everything written so far.
  #[inline]
  #[must_use]
  pub fn digest(&self) -> D::Output {
    self.hasher.clone().finalize()
  }

  /// Get a mutable reference to the underlying hasher.
  #[inline]
  pub fn hasher_mut(&mut self) -> &mut D {
    &mut self.hasher
  }

  /// Unwrap, returning the inner writer and the final digest.
  #[inline]
  pub fn into_parts(mut self) -> (W, D::Output) {
    let digest = self.hasher.finalize();
    (self.inner, digest)
  }

  /// Unwrap, returning the inner writer and discarding the digest.
  #[inline]
  pub fn into_inner(self) -> W {
    self.inner
  }

  /// Get a reference to the inner writer.
  #[inline]
  pub fn inner(&self) -> &W {
    &self.inner
  }
}

impl<W: std::io::Write, D: Digest> std::io::Write for DigestWriter<W, D> {
  #[inline]
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    write_and_update(&mut self.inner, buf, |data| self.hasher.update(data))
  }

  #[inline]
  fn flush(&mut self) -> std::io::Result<()> {
    self.inner.flush()
  }
}
