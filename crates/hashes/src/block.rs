//! Block-buffering engine shared by the Merkle–Damgård hashes.
//!
//! An algorithm supplies a [`BlockCore`]: a compression callback that eats one
//! full block and a finish callback that pads the tail and writes the digest.
//! [`BlockEngine`] owns the buffering, the length accounting, and the reset
//! that follows every finalize.
//!
//! ```text
//!   update(data) ──► BlockBuffer ──full block──► core.compress()
//!                         │
//!   finalize ─────────────┴─► core.finish(tail, total_len, out) ──► reset
//! ```

#![allow(clippy::indexing_slicing)] // Bounds proven by the cursor invariant (`pos < N`)

use core::cmp::min;

// ─────────────────────────────────────────────────────────────────────────────
// BlockBuffer
// ─────────────────────────────────────────────────────────────────────────────

/// Fixed-capacity block buffer with byte accounting.
///
/// Between calls the cursor is always in `[0, N)`: a buffer that fills is
/// handed to the compression callback immediately. `blocks * N + pos` is the
/// number of bytes fed since the last [`clear`](Self::clear).
#[derive(Clone)]
pub struct BlockBuffer<const N: usize> {
  buf: [u8; N],
  pos: usize,
  blocks: u128,
}

impl<const N: usize> Default for BlockBuffer<N> {
  fn default() -> Self {
    Self::new()
  }
}

impl<const N: usize> BlockBuffer<N> {
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self {
      buf: [0u8; N],
      pos: 0,
      blocks: 0,
    }
  }

  /// Feed `data`, calling `compress` once per completed block.
  ///
  /// Full blocks in `data` are passed straight from the caller's slice; only
  /// a leading partial block and the trailing remainder are copied.
  pub fn feed(&mut self, mut data: &[u8], mut compress: impl FnMut(&[u8; N])) {
    if self.pos != 0 {
      let take = min(N - self.pos, data.len());
      self.buf[self.pos..self.pos + take].copy_from_slice(&data[..take]);
      self.pos += take;
      data = &data[take..];

      if self.pos < N {
        return;
      }
      compress(&self.buf);
      self.blocks = self.blocks.wrapping_add(1);
      self.pos = 0;
    }

    let (blocks, rest) = data.as_chunks::<N>();
    for block in blocks {
      compress(block);
    }
    self.blocks = self.blocks.wrapping_add(blocks.len() as u128);

    self.buf[..rest.len()].copy_from_slice(rest);
    self.pos = rest.len();
    debug_assert!(self.pos < N);
  }

  /// Bytes buffered but not yet compressed.
  #[inline]
  #[must_use]
  pub fn pending(&self) -> &[u8] {
    &self.buf[..self.pos]
  }

  /// Total bytes fed since the last clear.
  #[inline]
  #[must_use]
  pub fn total_len(&self) -> u128 {
    self.blocks.wrapping_mul(N as u128).wrapping_add(self.pos as u128)
  }

  /// Number of blocks handed to the compression callback.
  #[inline]
  #[must_use]
  pub fn blocks_processed(&self) -> u128 {
    self.blocks
  }

  #[inline]
  pub fn clear(&mut self) {
    self.buf = [0u8; N];
    self.pos = 0;
    self.blocks = 0;
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Core + Engine
// ─────────────────────────────────────────────────────────────────────────────

/// Per-algorithm callbacks plugged into [`BlockEngine`].
///
/// The `Clone` value a core is constructed with is its initial state; the
/// engine restores it after every finalize.
pub trait BlockCore<const N: usize>: Clone {
  /// Fold one full block into the chaining state.
  fn compress(&mut self, block: &[u8; N]);

  /// Pad `tail` (fewer than `N` bytes), compress the final block(s), and
  /// write the digest into `out`.
  ///
  /// `total_len` is the exact number of message bytes, `tail` included.
  fn finish(&mut self, tail: &[u8], total_len: u128, out: &mut [u8]);
}

/// A [`BlockCore`] composed with a [`BlockBuffer`].
#[derive(Clone)]
pub struct BlockEngine<C, const N: usize> {
  core: C,
  initial: C,
  buffer: BlockBuffer<N>,
}

impl<C: BlockCore<N>, const N: usize> BlockEngine<C, N> {
  #[inline]
  #[must_use]
  pub fn new(core: C) -> Self {
    Self {
      initial: core.clone(),
      core,
      buffer: BlockBuffer::new(),
    }
  }

  #[inline]
  pub fn update(&mut self, data: &[u8]) {
    let core = &mut self.core;
    self.buffer.feed(data, |block| core.compress(block));
  }

  /// Complete the hash into `out`, then reset.
  #[inline]
  pub fn finalize_into(&mut self, out: &mut [u8]) {
    let total_len = self.buffer.total_len();
    self.core.finish(self.buffer.pending(), total_len, out);
    self.reset();
  }

  #[inline]
  pub fn reset(&mut self) {
    self.core = self.initial.clone();
    self.buffer.clear();
  }

  /// Total bytes absorbed since the last reset.
  #[inline]
  #[must_use]
  pub fn total_len(&self) -> u128 {
    self.buffer.total_len()
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Merkle–Damgård padding
// ─────────────────────────────────────────────────────────────────────────────

/// Byte order of the message-length field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LengthOrder {
  BigEndian,
  LittleEndian,
}

/// Append `0x80`, zero-fill, and store the bit length in the last
/// `length_bytes` bytes (8 or 16), compressing one or two final blocks.
///
/// Bit lengths wrap modulo `2^(8 * length_bytes)`.
pub fn md_pad<const N: usize>(
  tail: &[u8],
  total_len: u128,
  length_bytes: usize,
  order: LengthOrder,
  mut compress: impl FnMut(&[u8; N]),
) {
  debug_assert!(tail.len() < N);
  debug_assert!(length_bytes == 8 || length_bytes == 16);
  debug_assert!(length_bytes < N);

  let mut block = [0u8; N];
  block[..tail.len()].copy_from_slice(tail);
  block[tail.len()] = 0x80;

  if tail.len() + 1 > N - length_bytes {
    compress(&block);
    block = [0u8; N];
  }

  let bits = total_len.wrapping_mul(8);
  let field = &mut block[N - length_bytes..];
  match order {
    LengthOrder::BigEndian => field.copy_from_slice(&bits.to_be_bytes()[16 - length_bytes..]),
    LengthOrder::LittleEndian => field.copy_from_slice(&bits.to_le_bytes()[..length_bytes]),
  }
  compress(&block);
}
