//! BLAKE3 (hash, keyed hash, key derivation, XOF).
//!
//! Input is split into 1 KiB chunks. Each chunk is compressed 64 bytes at a
//! time into a chaining value; chunk chaining values are merged pairwise into
//! a binary tree whose root produces the output.
//!
//! ```text
//!                  root
//!               /       \
//!          parent       parent
//!          /    \        /    \
//!      chunk0 chunk1 chunk2 chunk3 ...
//! ```
//!
//! The tree is built incrementally with a stack of subtree chaining values.
//! After `k` completed chunks the stack holds one entry per set bit of `k`:
//! pushing chunk `k` merges with the stack top once for each trailing zero of
//! `k`, exactly like carry propagation in binary addition.
//!
//! The implementation is portable and safe; it works without `std` or
//! `alloc`.

#![allow(clippy::indexing_slicing)] // Fixed-size block/stack arrays with checked cursors

mod compress;

use core::cmp::min;

use traits::{BlockLen, ConstructionError, Digest, DigestError, Xof, error::check_output_window};

use self::compress::{
  BLOCK_LEN, CHUNK_END, CHUNK_LEN, CHUNK_START, DERIVE_KEY_CONTEXT, DERIVE_KEY_MATERIAL, IV, KEY_LEN, KEYED_HASH,
  OUT_LEN, Output, first_8_words, key_words, parent_output,
};
use crate::util::load_le_u32;

/// Maximum subtree count: one per bit of a 64-bit byte length above the chunk
/// size (2^54 chunks of 2^10 bytes).
const MAX_DEPTH: usize = 54;

// ─────────────────────────────────────────────────────────────────────────────
// Chunk state
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
struct ChunkState {
  chaining_value: [u32; 8],
  chunk_counter: u64,
  block: [u8; BLOCK_LEN],
  block_len: u8,
  blocks_compressed: u8,
  flags: u32,
}

impl ChunkState {
  #[inline]
  fn new(key_words: [u32; 8], chunk_counter: u64, flags: u32) -> Self {
    Self {
      chaining_value: key_words,
      chunk_counter,
      block: [0u8; BLOCK_LEN],
      block_len: 0,
      blocks_compressed: 0,
      flags,
    }
  }

  #[inline]
  fn len(&self) -> usize {
    BLOCK_LEN * self.blocks_compressed as usize + self.block_len as usize
  }

  #[inline]
  fn start_flag(&self) -> u32 {
    if self.blocks_compressed == 0 { CHUNK_START } else { 0 }
  }

  /// Absorb up to the rest of this chunk.
  ///
  /// A full block is compressed only once more input arrives, so the final
  /// block of the chunk is always still buffered when `output` runs.
  fn update(&mut self, mut input: &[u8]) {
    debug_assert!(self.len() + input.len() <= CHUNK_LEN);
    while !input.is_empty() {
      if self.block_len as usize == BLOCK_LEN {
        let block_words: [u32; 16] = load_le_u32(&self.block);
        self.chaining_value = first_8_words(compress::compress(
          &self.chaining_value,
          &block_words,
          self.chunk_counter,
          BLOCK_LEN as u32,
          self.flags | self.start_flag(),
        ));
        self.blocks_compressed += 1;
        self.block = [0u8; BLOCK_LEN];
        self.block_len = 0;
      }

      let start = self.block_len as usize;
      let take = min(BLOCK_LEN - start, input.len());
      self.block[start..start + take].copy_from_slice(&input[..take]);
      self.block_len += take as u8;
      input = &input[take..];
    }
  }

  /// Node for the last block of this chunk. Unused block bytes are zero.
  #[inline]
  fn output(&self) -> Output {
    Output {
      input_cv: self.chaining_value,
      block_words: load_le_u32(&self.block),
      counter: self.chunk_counter,
      block_len: u32::from(self.block_len),
      flags: self.flags | self.start_flag() | CHUNK_END,
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Chaining-value stack
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
struct CvStack {
  cvs: [[u32; 8]; MAX_DEPTH],
  len: u8,
}

impl CvStack {
  #[inline]
  const fn new() -> Self {
    Self {
      cvs: [[0u32; 8]; MAX_DEPTH],
      len: 0,
    }
  }

  #[inline]
  fn push(&mut self, cv: [u32; 8]) {
    self.cvs[self.len as usize] = cv;
    self.len += 1;
  }

  #[inline]
  fn pop(&mut self) -> [u32; 8] {
    debug_assert!(self.len > 0, "merge with an empty subtree stack");
    self.len -= 1;
    self.cvs[self.len as usize]
  }

  #[inline]
  fn as_slice(&self) -> &[[u32; 8]] {
    &self.cvs[..self.len as usize]
  }

  #[inline]
  fn clear(&mut self) {
    self.len = 0;
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Hasher
// ─────────────────────────────────────────────────────────────────────────────

/// Streaming BLAKE3 hasher.
///
/// The mode (plain, keyed, derive-key) is fixed at construction and survives
/// `reset` and every form of finalize.
///
/// ```
/// use hashes::{Digest, Xof, crypto::Blake3};
///
/// let mut h = Blake3::new();
/// h.update(b"hello ");
/// h.update(b"world");
/// let mut xof = h.finalize_xof();
/// let mut long = [0u8; 100];
/// xof.squeeze(&mut long);
/// assert_eq!(long[..32], Blake3::digest(b"hello world"));
/// ```
#[derive(Clone)]
pub struct Blake3 {
  key_words: [u32; 8],
  flags: u32,
  chunk: ChunkState,
  stack: CvStack,
}

impl Default for Blake3 {
  #[inline]
  fn default() -> Self {
    <Self as Digest>::new()
  }
}

impl core::fmt::Debug for Blake3 {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Blake3")
      .field("chunk_counter", &self.chunk.chunk_counter)
      .field("stack_depth", &self.stack.len)
      .finish_non_exhaustive()
  }
}

impl Blake3 {
  #[inline]
  fn new_internal(key_words: [u32; 8], flags: u32) -> Self {
    Self {
      key_words,
      flags,
      chunk: ChunkState::new(key_words, 0, flags),
      stack: CvStack::new(),
    }
  }

  /// Construct a hasher for the keyed hash function.
  #[must_use]
  #[inline]
  pub fn new_keyed(key: &[u8; KEY_LEN]) -> Self {
    Self::new_internal(key_words(key), KEYED_HASH)
  }

  /// Construct a keyed hasher from a key slice.
  ///
  /// # Errors
  ///
  /// [`ConstructionError::InvalidKeyLength`] unless `key` is exactly 32 bytes.
  pub fn new_keyed_from_slice(key: &[u8]) -> Result<Self, ConstructionError> {
    let key: &[u8; KEY_LEN] = key.try_into().map_err(|_| ConstructionError::InvalidKeyLength {
      expected: KEY_LEN,
      actual: key.len(),
    })?;
    Ok(Self::new_keyed(key))
  }

  /// Construct a hasher for the key derivation function.
  ///
  /// `context` should be hardcoded, globally unique, and application-specific.
  #[must_use]
  pub fn new_derive_key(context: &str) -> Self {
    let mut ctx = Self::new_internal(IV, DERIVE_KEY_CONTEXT);
    ctx.update(context.as_bytes());
    let context_key = ctx.root_output().root_hash();
    Self::new_internal(key_words(&context_key), DERIVE_KEY_MATERIAL)
  }

  /// Keyed hash of `data` in one shot.
  #[must_use]
  pub fn keyed_digest(key: &[u8; KEY_LEN], data: &[u8]) -> [u8; OUT_LEN] {
    let mut h = Self::new_keyed(key);
    h.update(data);
    h.finalize()
  }

  /// Derive a 32-byte key from `key_material` under `context`, in one shot.
  #[must_use]
  pub fn derive_key(context: &str, key_material: &[u8]) -> [u8; OUT_LEN] {
    let mut h = Self::new_derive_key(context);
    h.update(key_material);
    h.finalize()
  }

  /// Output reader over `data` in one shot.
  #[must_use]
  pub fn xof(data: &[u8]) -> Blake3Xof {
    let mut h = <Self as Digest>::new();
    h.update(data);
    h.finalize_xof()
  }

  /// Keyed output reader over `data` in one shot.
  #[must_use]
  pub fn keyed_xof(key: &[u8; KEY_LEN], data: &[u8]) -> Blake3Xof {
    let mut h = Self::new_keyed(key);
    h.update(data);
    h.finalize_xof()
  }

  /// Merge a sealed chunk into the stack.
  ///
  /// `total_chunks` counts chunks sealed so far, this one included. Each
  /// trailing zero bit is a completed subtree to the left that pairs with
  /// the new value.
  fn add_chunk_chaining_value(&mut self, mut new_cv: [u32; 8], mut total_chunks: u64) {
    while total_chunks & 1 == 0 {
      new_cv = parent_output(self.stack.pop(), new_cv, self.key_words, self.flags).chaining_value();
      total_chunks >>= 1;
    }
    self.stack.push(new_cv);
  }

  /// Fold the in-progress chunk and every stacked subtree into the root node.
  fn root_output(&self) -> Output {
    let mut output = self.chunk.output();
    for &left in self.stack.as_slice().iter().rev() {
      output = parent_output(left, output.chaining_value(), self.key_words, self.flags);
    }
    output
  }

  /// Finalize into an output reader and reset the hasher.
  #[must_use]
  pub fn finalize_xof(&mut self) -> Blake3Xof {
    let output = self.root_output();
    Digest::reset(self);
    Blake3Xof::new(output)
  }

  /// Write output bytes `[offset, offset + out.len())` of the XOF stream into
  /// `out`, then reset the hasher.
  pub fn finalize_xof_into(&mut self, offset: u64, out: &mut [u8]) {
    let mut xof = self.finalize_xof();
    xof.set_position(offset);
    xof.squeeze(out);
  }

  /// Number of subtree chaining values currently on the stack.
  #[cfg(test)]
  pub(crate) fn stack_depth(&self) -> usize {
    self.stack.len as usize
  }
}

impl Digest for Blake3 {
  const OUTPUT_SIZE: usize = OUT_LEN;
  const BLOCK_LEN: BlockLen = BlockLen::Fixed(BLOCK_LEN);
  const NAME: &'static str = "blake3";
  type Output = [u8; OUT_LEN];

  #[inline]
  fn new() -> Self {
    Self::new_internal(IV, 0)
  }

  fn update(&mut self, mut input: &[u8]) {
    while !input.is_empty() {
      // Seal the current chunk only when it is full and more input follows:
      // the last chunk must reach finalize unsealed.
      if self.chunk.len() == CHUNK_LEN {
        let chunk_cv = self.chunk.output().chaining_value();
        let total_chunks = self.chunk.chunk_counter + 1;
        self.add_chunk_chaining_value(chunk_cv, total_chunks);
        self.chunk = ChunkState::new(self.key_words, total_chunks, self.flags);
      }

      let take = min(CHUNK_LEN - self.chunk.len(), input.len());
      self.chunk.update(&input[..take]);
      input = &input[take..];
    }
  }

  #[inline]
  fn finalize(&mut self) -> Self::Output {
    let hash = self.root_output().root_hash();
    self.reset();
    hash
  }

  #[inline]
  fn reset(&mut self) {
    self.chunk = ChunkState::new(self.key_words, 0, self.flags);
    self.stack.clear();
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// XOF
// ─────────────────────────────────────────────────────────────────────────────

/// BLAKE3 output reader.
///
/// Output block `i` is the root compressed with counter `i`, so any byte
/// offset can be reached directly with [`set_position`](Self::set_position).
#[derive(Clone)]
pub struct Blake3Xof {
  output: Output,
  position: u64,
  buf: [u8; 2 * OUT_LEN],
  buf_block: Option<u64>,
}

impl core::fmt::Debug for Blake3Xof {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Blake3Xof").field("position", &self.position).finish_non_exhaustive()
  }
}

impl Blake3Xof {
  #[inline]
  fn new(output: Output) -> Self {
    Self {
      output,
      position: 0,
      buf: [0u8; 2 * OUT_LEN],
      buf_block: None,
    }
  }

  /// Seek to byte `position` of the output stream.
  #[inline]
  pub fn set_position(&mut self, position: u64) {
    self.position = position;
  }
}

impl Xof for Blake3Xof {
  fn squeeze(&mut self, mut out: &mut [u8]) {
    const OUTPUT_BLOCK_LEN: u64 = (2 * OUT_LEN) as u64;

    while !out.is_empty() {
      let block = self.position / OUTPUT_BLOCK_LEN;
      if self.buf_block != Some(block) {
        self.buf = self.output.root_output_block(block);
        self.buf_block = Some(block);
      }

      let within = (self.position % OUTPUT_BLOCK_LEN) as usize;
      let take = min(self.buf.len() - within, out.len());
      let (head, rest) = core::mem::take(&mut out).split_at_mut(take);
      head.copy_from_slice(&self.buf[within..within + take]);
      out = rest;
      self.position = self.position.wrapping_add(take as u64);
    }
  }

  #[inline]
  fn position(&self) -> u64 {
    self.position
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Variable-length output
// ─────────────────────────────────────────────────────────────────────────────

/// BLAKE3 producing a fixed, caller-chosen number of output bytes.
///
/// This is the object-safe form used when the output length comes from a
/// runtime descriptor. The first 32 bytes always equal the default hash.
#[derive(Clone, Debug)]
pub struct Blake3Sized {
  inner: Blake3,
  output_len: usize,
}

impl Blake3Sized {
  /// Unkeyed BLAKE3 with `output_len` bytes of output.
  ///
  /// # Errors
  ///
  /// [`ConstructionError::InvalidOutputLength`] if `output_len` is zero.
  pub fn new(output_len: usize) -> Result<Self, ConstructionError> {
    Self::from_hasher(<Blake3 as Digest>::new(), output_len)
  }

  /// Wrap a configured (keyed or derive-key) hasher.
  ///
  /// # Errors
  ///
  /// [`ConstructionError::InvalidOutputLength`] if `output_len` is zero.
  pub fn from_hasher(inner: Blake3, output_len: usize) -> Result<Self, ConstructionError> {
    if output_len == 0 {
      return Err(ConstructionError::InvalidOutputLength(0));
    }
    Ok(Self { inner, output_len })
  }
}

impl traits::DynDigest for Blake3Sized {
  #[inline]
  fn update(&mut self, data: &[u8]) {
    Digest::update(&mut self.inner, data);
  }

  fn finalize_into(&mut self, out: &mut [u8], offset: usize, len: usize) -> Result<usize, DigestError> {
    check_output_window(out.len(), offset, len, self.output_len)?;
    let Some(dst) = out.get_mut(offset..).and_then(|rest| rest.get_mut(..self.output_len)) else {
      return Err(DigestError::insufficient(self.output_len, out.len().saturating_sub(offset)));
    };
    self.inner.finalize_xof_into(0, dst);
    Ok(self.output_len)
  }

  #[inline]
  fn reset(&mut self) {
    Digest::reset(&mut self.inner);
  }

  #[cfg(feature = "alloc")]
  fn box_clone(&self) -> alloc::boxed::Box<dyn traits::DynDigest> {
    alloc::boxed::Box::new(self.clone())
  }

  #[inline]
  fn output_len(&self) -> usize {
    self.output_len
  }

  #[inline]
  fn block_len(&self) -> BlockLen {
    BlockLen::Fixed(BLOCK_LEN)
  }

  #[inline]
  fn algorithm_name(&self) -> &'static str {
    "blake3"
  }
}

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::vec::Vec;

  use traits::{ConstructionError, Digest, Xof};

  use super::{Blake3, CHUNK_LEN};

  const KEY: &[u8; 32] = b"whats the Elvish word for friend";
  const CONTEXT: &str = "BLAKE3 2019-12-27 16:29:52 test vectors context";

  /// Input pattern used by the official test vectors.
  fn input_pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
  }

  #[test]
  fn official_vectors_len0_hash_and_xof_prefix() {
    let mut hasher = Blake3::new();
    assert_eq!(
      hex::encode(hasher.finalize()),
      "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
    );

    let mut out = [0u8; 131];
    hasher.finalize_xof().squeeze(&mut out);
    assert_eq!(
      hex::encode(out),
      "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262e00f03e7b69af26b7faaf09fcd333050338ddfe085b8cc869ca98b206c08243a26f5487789e8f660afe6c99ef9e0c52b92e7393024a80459cf91f476f9ffdbda7001c22e159b402631f277ca96f2defdf1078282314e763699a31c5363165421cce14d"
    );
  }

  #[test]
  fn official_vectors_len0_keyed_and_derive() {
    assert_eq!(
      hex::encode(Blake3::keyed_digest(KEY, b"")),
      "92b2b75604ed3c761f9d6f62392c8a9227ad0ea3f09573e783f1498a4ed60d26"
    );
    assert_eq!(
      hex::encode(Blake3::derive_key(CONTEXT, b"")),
      "2cc39783c223154fea8dfb7c1b1660f2ac2dcbd1c1de8277b0b0dd39b7e50d7d"
    );
  }

  #[test]
  fn matches_reference_across_chunk_boundaries() {
    for len in [1, 63, 64, 65, 1023, 1024, 1025, 2048, 2049, 3072, 3073, 8192, 8193, 31_744] {
      let input = input_pattern(len);
      assert_eq!(Blake3::digest(&input), *blake3::hash(&input).as_bytes(), "len {len}");
      assert_eq!(
        Blake3::keyed_digest(KEY, &input),
        *blake3::keyed_hash(KEY, &input).as_bytes(),
        "keyed len {len}"
      );
      assert_eq!(
        Blake3::derive_key(CONTEXT, &input),
        blake3::derive_key(CONTEXT, &input),
        "derive len {len}"
      );
    }
  }

  #[test]
  fn keyed_abc_matches_reference() {
    assert_eq!(
      Blake3::keyed_digest(KEY, b"abc"),
      *blake3::keyed_hash(KEY, b"abc").as_bytes()
    );
  }

  #[test]
  fn stack_depth_is_popcount_of_sealed_chunks() {
    let mut h = Blake3::new();
    h.update(&[0x5a]);
    let chunk = [0x5au8; CHUNK_LEN];
    for k in 1..=2048u32 {
      // After k * 1024 + 1 bytes, k chunks are sealed and one byte is pending.
      h.update(&chunk);
      assert_eq!(h.stack_depth(), k.count_ones() as usize, "k = {k}");
    }
  }

  #[test]
  fn xof_prefix_consistency() {
    let input = input_pattern(5000);
    for l in [16usize, 32, 65, 130] {
      let mut short = alloc::vec![0u8; l];
      let mut long = alloc::vec![0u8; 2 * l];
      Blake3::xof(&input).squeeze(&mut short);
      Blake3::xof(&input).squeeze(&mut long);
      assert_eq!(short[..], long[..l], "L = {l}");
    }
  }

  #[test]
  fn split_squeeze_matches_single_read() {
    let mut whole = [0u8; 300];
    Blake3::xof(b"abc").squeeze(&mut whole);

    let mut xof = Blake3::xof(b"abc");
    let mut parts = [0u8; 300];
    for piece in parts.chunks_mut(37) {
      xof.squeeze(piece);
    }
    assert_eq!(parts, whole);
    assert_eq!(xof.position(), 300);
  }

  #[test]
  fn seek_equals_slice_of_longer_read() {
    let mut long = [0u8; 512];
    Blake3::xof(b"seek").squeeze(&mut long);

    for offset in [0u64, 1, 63, 64, 65, 200, 448] {
      let mut xof = Blake3::xof(b"seek");
      xof.set_position(offset);
      let mut out = [0u8; 64];
      xof.squeeze(&mut out);
      let o = offset as usize;
      assert_eq!(out[..], long[o..o + 64], "offset {offset}");
    }

    let mut h = Blake3::new();
    h.update(b"seek");
    let mut at = [0u8; 40];
    h.finalize_xof_into(100, &mut at);
    assert_eq!(at[..], long[100..140]);
  }

  #[test]
  fn xof_matches_reference_reader() {
    let input = input_pattern(4097);
    let mut ours = [0u8; 1000];
    Blake3::keyed_xof(KEY, &input).squeeze(&mut ours);

    let mut reference = [0u8; 1000];
    let mut r = blake3::Hasher::new_keyed(KEY);
    r.update(&input);
    r.finalize_xof().fill(&mut reference);
    assert_eq!(ours, reference);
  }

  #[test]
  fn finalize_resets_but_keeps_mode() {
    let mut h = Blake3::new_keyed(KEY);
    h.update(b"first");
    let _ = h.finalize();
    assert_eq!(h.finalize(), Blake3::keyed_digest(KEY, b""));

    h.update(b"abc");
    let _ = h.finalize_xof();
    h.update(b"abc");
    assert_eq!(h.finalize(), Blake3::keyed_digest(KEY, b"abc"));
  }

  #[test]
  fn keyed_from_slice_validates_length() {
    assert_eq!(
      Blake3::new_keyed_from_slice(&[0u8; 16]).map(|_| ()),
      Err(ConstructionError::InvalidKeyLength { expected: 32, actual: 16 })
    );
    let mut h = Blake3::new_keyed_from_slice(KEY).unwrap();
    h.update(b"abc");
    assert_eq!(h.finalize(), Blake3::keyed_digest(KEY, b"abc"));
  }

  #[test]
  fn sized_output() {
    use traits::{DigestError, DynDigest};

    assert_eq!(
      super::Blake3Sized::new(0).map(|_| ()),
      Err(ConstructionError::InvalidOutputLength(0))
    );

    let mut h = super::Blake3Sized::new(100).unwrap();
    DynDigest::update(&mut h, b"abc");
    let mut short = [0u8; 64];
    assert_eq!(
      DynDigest::finalize_into(&mut h, &mut short, 0, 64),
      Err(DigestError::insufficient(100, 64))
    );

    let mut out = [0u8; 100];
    assert_eq!(DynDigest::finalize_into(&mut h, &mut out, 0, 100), Ok(100));
    let mut expected = [0u8; 100];
    Blake3::xof(b"abc").squeeze(&mut expected);
    assert_eq!(out, expected);
  }
}
