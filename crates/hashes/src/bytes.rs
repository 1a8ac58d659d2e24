//! Read-only view over a sequence of byte slices.
//!
//! [`SegmentedBytes`] presents independently owned buffers (network frames,
//! rope nodes, scatter/gather I/O) as one logical byte string without copying
//! them together. Hashers consume it through
//! [`SegmentedUpdate::update_segmented`].

use traits::{Digest, DigestError};

/// Sequential concatenation of borrowed byte slices.
///
/// Logical offset `i` addresses the `i`th byte of the concatenation. Empty
/// segments are allowed and contribute nothing.
///
/// ```
/// use hashes::bytes::SegmentedBytes;
///
/// let parts: [&[u8]; 3] = [b"ab", b"", b"cde"];
/// let view = SegmentedBytes::new(&parts);
/// assert_eq!(view.len(), 5);
/// assert_eq!(view.get(3), Ok(b'd'));
/// assert!(view.get(5).is_err());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct SegmentedBytes<'a> {
  segments: &'a [&'a [u8]],
  len: usize,
}

impl<'a> SegmentedBytes<'a> {
  #[must_use]
  pub fn new(segments: &'a [&'a [u8]]) -> Self {
    let len = segments.iter().map(|s| s.len()).sum();
    Self { segments, len }
  }

  /// Total logical length.
  #[inline]
  #[must_use]
  pub const fn len(&self) -> usize {
    self.len
  }

  #[inline]
  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// The underlying slices, in order.
  #[inline]
  #[must_use]
  pub const fn segments(&self) -> &'a [&'a [u8]] {
    self.segments
  }

  /// Locate logical `index` as (segment, offset within segment).
  fn locate(&self, index: usize) -> Option<(usize, usize)> {
    let mut base = 0usize;
    for (i, seg) in self.segments.iter().enumerate() {
      if index < base + seg.len() {
        return Some((i, index - base));
      }
      base += seg.len();
    }
    None
  }

  /// Byte at logical offset `index`.
  ///
  /// # Errors
  ///
  /// [`DigestError::OutOfRangeIndex`] if `index >= self.len()`.
  pub fn get(&self, index: usize) -> Result<u8, DigestError> {
    self
      .locate(index)
      .and_then(|(seg, off)| self.segments.get(seg).and_then(|s| s.get(off)).copied())
      .ok_or(DigestError::OutOfRangeIndex { index, len: self.len })
  }

  /// Copy `dest.len()` bytes starting at logical `offset` into `dest`.
  ///
  /// # Errors
  ///
  /// [`DigestError::OutOfRangeIndex`] naming the first missing offset if the
  /// range runs past the end; `dest` is not modified in that case.
  pub fn copy_to(&self, offset: usize, dest: &mut [u8]) -> Result<(), DigestError> {
    if dest.is_empty() {
      return Ok(());
    }
    let end = offset.saturating_add(dest.len());
    if end > self.len {
      return Err(DigestError::OutOfRangeIndex {
        index: core::cmp::max(offset, self.len),
        len: self.len,
      });
    }

    let mut skip = offset;
    let mut dest = dest;
    for seg in self.segments {
      if skip >= seg.len() {
        skip -= seg.len();
        continue;
      }
      let avail = seg.get(skip..).unwrap_or_default();
      let take = core::cmp::min(avail.len(), dest.len());
      let (head, rest) = core::mem::take(&mut dest).split_at_mut(take);
      head.copy_from_slice(avail.get(..take).unwrap_or_default());
      dest = rest;
      skip = 0;
      if dest.is_empty() {
        break;
      }
    }
    debug_assert!(dest.is_empty());
    Ok(())
  }

  /// Iterate over every byte in logical order.
  pub fn iter(&self) -> impl Iterator<Item = u8> + 'a {
    self.segments.iter().flat_map(|s| s.iter().copied())
  }
}

/// Feed a [`SegmentedBytes`] view to a hasher segment by segment.
pub trait SegmentedUpdate {
  fn update_segmented(&mut self, bytes: &SegmentedBytes<'_>);
}

impl<D: Digest> SegmentedUpdate for D {
  #[inline]
  fn update_segmented(&mut self, bytes: &SegmentedBytes<'_>) {
    self.update_vectored(bytes.segments());
  }
}
