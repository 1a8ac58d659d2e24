//! SHA-224 and SHA-256 (FIPS 180-4).
//!
//! Both share the 64-round compression function over 64-byte blocks; they
//! differ only in initial hash value and output truncation.

#![allow(clippy::indexing_slicing)] // Fixed 16-word message ring

use crate::{
  block::{BlockCore, LengthOrder, md_pad},
  util::{load_be_u32, store_be_u32},
};

const BLOCK_LEN: usize = 64;

const SHA256_H0: [u32; 8] = [
  0x6a09_e667,
  0xbb67_ae85,
  0x3c6e_f372,
  0xa54f_f53a,
  0x510e_527f,
  0x9b05_688c,
  0x1f83_d9ab,
  0x5be0_cd19,
];

const SHA224_H0: [u32; 8] = [
  0xc105_9ed8,
  0x367c_d507,
  0x3070_dd17,
  0xf70e_5939,
  0xffc0_0b31,
  0x6858_1511,
  0x64f9_8fa7,
  0xbefa_4fa4,
];

const K: [u32; 64] = [
  0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5, 0xd807aa98,
  0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174, 0xe49b69c1, 0xefbe4786,
  0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da, 0x983e5152, 0xa831c66d, 0xb00327c8,
  0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967, 0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13,
  0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85, 0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819,
  0xd6990624, 0xf40e3585, 0x106aa070, 0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a,
  0x5b9cca4f, 0x682e6ff3, 0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7,
  0xc67178f2,
];

#[inline(always)]
fn big_sigma0(x: u32) -> u32 {
  x.rotate_right(2) ^ x.rotate_right(13) ^ x.rotate_right(22)
}

#[inline(always)]
fn big_sigma1(x: u32) -> u32 {
  x.rotate_right(6) ^ x.rotate_right(11) ^ x.rotate_right(25)
}

#[inline(always)]
fn small_sigma0(x: u32) -> u32 {
  x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}

#[inline(always)]
fn small_sigma1(x: u32) -> u32 {
  x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}

/// One SHA-256 compression. The schedule lives in a 16-word ring:
/// `w[t]` is stored at `t & 15` and overwrites `w[t - 16]`.
pub(crate) fn compress(state: &mut [u32; 8], block: &[u8; BLOCK_LEN]) {
  let mut w: [u32; 16] = load_be_u32(block);
  let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;

  for (t, k) in K.iter().enumerate() {
    if t >= 16 {
      w[t & 15] = small_sigma1(w[(t + 14) & 15])
        .wrapping_add(w[(t + 9) & 15])
        .wrapping_add(small_sigma0(w[(t + 1) & 15]))
        .wrapping_add(w[t & 15]);
    }
    let t1 = h
      .wrapping_add(big_sigma1(e))
      .wrapping_add((e & f) ^ (!e & g))
      .wrapping_add(*k)
      .wrapping_add(w[t & 15]);
    let t2 = big_sigma0(a).wrapping_add((a & b) ^ (a & c) ^ (b & c));
    h = g;
    g = f;
    f = e;
    e = d.wrapping_add(t1);
    d = c;
    c = b;
    b = a;
    a = t1.wrapping_add(t2);
  }

  for (s, v) in state.iter_mut().zip([a, b, c, d, e, f, g, h]) {
    *s = s.wrapping_add(v);
  }
}

#[derive(Clone)]
pub(crate) struct Sha256Core {
  state: [u32; 8],
}

impl BlockCore<BLOCK_LEN> for Sha256Core {
  #[inline]
  fn compress(&mut self, block: &[u8; BLOCK_LEN]) {
    compress(&mut self.state, block);
  }

  fn finish(&mut self, tail: &[u8], total_len: u128, out: &mut [u8]) {
    let state = &mut self.state;
    md_pad::<BLOCK_LEN>(tail, total_len, 8, LengthOrder::BigEndian, |b| compress(state, b));
    store_be_u32(&self.state, out);
  }
}

md_digest! {
  /// SHA-256 hasher.
  ///
  /// ```
  /// use hashes::{Digest, crypto::Sha256};
  ///
  /// let mut h = Sha256::new();
  /// h.update(b"a");
  /// h.update(b"bc");
  /// assert_eq!(h.finalize(), Sha256::digest(b"abc"));
  /// ```
  Sha256 {
    core: Sha256Core = Sha256Core { state: SHA256_H0 },
    block: 64,
    output: 32,
    name: "sha256",
  }
}

md_digest! {
  /// SHA-224 hasher: SHA-256 with its own IV, truncated to 28 bytes.
  Sha224 {
    core: Sha256Core = Sha256Core { state: SHA224_H0 },
    block: 64,
    output: 28,
    name: "sha224",
  }
}
