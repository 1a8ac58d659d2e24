//! BLAKE3 compression function and output nodes.

#![allow(clippy::indexing_slicing)] // Fixed 16-word state and message arrays

use crate::util::{load_le_u32, store_le_u32};

pub(super) const OUT_LEN: usize = 32;
pub(super) const KEY_LEN: usize = 32;
pub(super) const BLOCK_LEN: usize = 64;
pub(super) const CHUNK_LEN: usize = 1024;

pub(super) const CHUNK_START: u32 = 1 << 0;
pub(super) const CHUNK_END: u32 = 1 << 1;
pub(super) const PARENT: u32 = 1 << 2;
pub(super) const ROOT: u32 = 1 << 3;
pub(super) const KEYED_HASH: u32 = 1 << 4;
pub(super) const DERIVE_KEY_CONTEXT: u32 = 1 << 5;
pub(super) const DERIVE_KEY_MATERIAL: u32 = 1 << 6;

pub(super) const IV: [u32; 8] = [
  0x6A09_E667,
  0xBB67_AE85,
  0x3C6E_F372,
  0xA54F_F53A,
  0x510E_527F,
  0x9B05_688C,
  0x1F83_D9AB,
  0x5BE0_CD19,
];

/// Applied to the message words between rounds.
const MSG_PERMUTATION: [usize; 16] = [2, 6, 3, 10, 7, 0, 4, 13, 1, 11, 12, 5, 9, 14, 15, 8];

#[inline(always)]
fn g(v: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize, mx: u32, my: u32) {
  v[a] = v[a].wrapping_add(v[b]).wrapping_add(mx);
  v[d] = (v[d] ^ v[a]).rotate_right(16);
  v[c] = v[c].wrapping_add(v[d]);
  v[b] = (v[b] ^ v[c]).rotate_right(12);
  v[a] = v[a].wrapping_add(v[b]).wrapping_add(my);
  v[d] = (v[d] ^ v[a]).rotate_right(8);
  v[c] = v[c].wrapping_add(v[d]);
  v[b] = (v[b] ^ v[c]).rotate_right(7);
}

#[inline(always)]
fn round(v: &mut [u32; 16], m: &[u32; 16]) {
  // Columns.
  g(v, 0, 4, 8, 12, m[0], m[1]);
  g(v, 1, 5, 9, 13, m[2], m[3]);
  g(v, 2, 6, 10, 14, m[4], m[5]);
  g(v, 3, 7, 11, 15, m[6], m[7]);
  // Diagonals.
  g(v, 0, 5, 10, 15, m[8], m[9]);
  g(v, 1, 6, 11, 12, m[10], m[11]);
  g(v, 2, 7, 8, 13, m[12], m[13]);
  g(v, 3, 4, 9, 14, m[14], m[15]);
}

#[inline(always)]
fn permute(m: &mut [u32; 16]) {
  let src = *m;
  for (dst, &i) in m.iter_mut().zip(MSG_PERMUTATION.iter()) {
    *dst = src[i];
  }
}

/// Full 16-word compression output.
///
/// Words `0..8` are the next chaining value; words `8..16` extend the output
/// for root nodes.
pub(super) fn compress(cv: &[u32; 8], block_words: &[u32; 16], counter: u64, block_len: u32, flags: u32) -> [u32; 16] {
  let mut v = [
    cv[0],
    cv[1],
    cv[2],
    cv[3],
    cv[4],
    cv[5],
    cv[6],
    cv[7],
    IV[0],
    IV[1],
    IV[2],
    IV[3],
    counter as u32,
    (counter >> 32) as u32,
    block_len,
    flags,
  ];
  let mut m = *block_words;

  for r in 0..7 {
    round(&mut v, &m);
    if r < 6 {
      permute(&mut m);
    }
  }

  for i in 0..8 {
    v[i] ^= v[i + 8];
    v[i + 8] ^= cv[i];
  }
  v
}

#[inline(always)]
pub(super) fn first_8_words(words: [u32; 16]) -> [u32; 8] {
  let mut out = [0u32; 8];
  out.copy_from_slice(&words[..8]);
  out
}

#[inline]
pub(super) fn key_words(key: &[u8; KEY_LEN]) -> [u32; 8] {
  load_le_u32(key)
}

/// A node whose compression has not yet been run.
///
/// Holding the inputs rather than the result lets the same node yield either
/// a chaining value (non-root) or any number of root output blocks.
#[derive(Clone, Copy)]
pub(super) struct Output {
  pub(super) input_cv: [u32; 8],
  pub(super) block_words: [u32; 16],
  pub(super) counter: u64,
  pub(super) block_len: u32,
  pub(super) flags: u32,
}

impl Output {
  #[inline]
  pub(super) fn chaining_value(&self) -> [u32; 8] {
    first_8_words(compress(
      &self.input_cv,
      &self.block_words,
      self.counter,
      self.block_len,
      self.flags,
    ))
  }

  /// 64 bytes of root output at output-block index `block`.
  #[inline]
  pub(super) fn root_output_block(&self, block: u64) -> [u8; 2 * OUT_LEN] {
    let words = compress(&self.input_cv, &self.block_words, block, self.block_len, self.flags | ROOT);
    let mut out = [0u8; 2 * OUT_LEN];
    store_le_u32(&words, &mut out);
    out
  }

  #[inline]
  pub(super) fn root_hash(&self) -> [u8; OUT_LEN] {
    let block = self.root_output_block(0);
    let mut out = [0u8; OUT_LEN];
    out.copy_from_slice(&block[..OUT_LEN]);
    out
  }
}

/// Parent node over two child chaining values.
#[inline]
pub(super) fn parent_output(left: [u32; 8], right: [u32; 8], key_words: [u32; 8], flags: u32) -> Output {
  let mut block_words = [0u32; 16];
  block_words[..8].copy_from_slice(&left);
  block_words[8..].copy_from_slice(&right);
  Output {
    input_cv: key_words,
    block_words,
    counter: 0,
    block_len: BLOCK_LEN as u32,
    flags: PARENT | flags,
  }
}
