//! SHA-1 (FIPS 180-4).
//!
//! Broken for collision resistance. Kept for legacy protocols and content
//! addressing that still require it.

#![allow(clippy::indexing_slicing)] // Fixed 16-word message ring

use crate::{
  block::{BlockCore, LengthOrder, md_pad},
  util::{load_be_u32, store_be_u32},
};

const BLOCK_LEN: usize = 64;

const H0: [u32; 5] = [0x6745_2301, 0xefcd_ab89, 0x98ba_dcfe, 0x1032_5476, 0xc3d2_e1f0];

const K: [u32; 4] = [0x5a82_7999, 0x6ed9_eba1, 0x8f1b_bcdc, 0xca62_c1d6];

fn compress(state: &mut [u32; 5], block: &[u8; BLOCK_LEN]) {
  let mut w: [u32; 16] = load_be_u32(block);
  let [mut a, mut b, mut c, mut d, mut e] = *state;

  for i in 0..80 {
    if i >= 16 {
      w[i & 15] = (w[(i + 13) & 15] ^ w[(i + 8) & 15] ^ w[(i + 2) & 15] ^ w[i & 15]).rotate_left(1);
    }
    let (f, k) = match i {
      0..=19 => ((b & c) | (!b & d), K[0]),
      20..=39 => (b ^ c ^ d, K[1]),
      40..=59 => ((b & c) | (b & d) | (c & d), K[2]),
      _ => (b ^ c ^ d, K[3]),
    };
    let t = a
      .rotate_left(5)
      .wrapping_add(f)
      .wrapping_add(e)
      .wrapping_add(k)
      .wrapping_add(w[i & 15]);
    e = d;
    d = c;
    c = b.rotate_left(30);
    b = a;
    a = t;
  }

  for (s, v) in state.iter_mut().zip([a, b, c, d, e]) {
    *s = s.wrapping_add(v);
  }
}

#[derive(Clone)]
pub(crate) struct Sha1Core {
  state: [u32; 5],
}

impl BlockCore<BLOCK_LEN> for Sha1Core {
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
  /// SHA-1 hasher.
  ///
  /// ```
  /// use hashes::{Digest, crypto::Sha1};
  ///
  /// assert_eq!(Sha1::digest(b"abc")[..4], [0xa9, 0x99, 0x3e, 0x36]);
  /// ```
  Sha1 {
    core: Sha1Core = Sha1Core { state: H0 },
    block: 64,
    output: 20,
    name: "sha1",
  }
}

#[cfg(test)]
mod tests {
  use traits::Digest;

  use super::Sha1;

  #[test]
  fn fips_vectors() {
    assert_eq!(hex::encode(Sha1::digest(b"")), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    assert_eq!(hex::encode(Sha1::digest(b"abc")), "a9993e364706816aba3e25717850c26c9cd0d89d");
    assert_eq!(
      hex::encode(Sha1::digest(
        b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq"
      )),
      "84983e441c3bd26ebaae4aa1f95129e5e54670f1"
    );
  }

  #[test]
  fn million_a() {
    let mut h = Sha1::new();
    let chunk = [b'a'; 1000];
    for _ in 0..1000 {
      h.update(&chunk);
    }
    assert_eq!(hex::encode(h.finalize()), "34aa973cd4c4daa4f61eeb2bdbad27316534016f");
  }
}
