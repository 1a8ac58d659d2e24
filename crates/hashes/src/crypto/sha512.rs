//! SHA-384, SHA-512, SHA-512/224, SHA-512/256 and SHA-512/t (FIPS 180-4).
//!
//! All variants share the 80-round compression over 128-byte blocks with a
//! 128-bit length field. They differ in initial hash value and truncation.
//! [`Sha512Trunc`] derives its initial value at construction using the
//! SHA-512/t IV generation function (FIPS 180-4 §5.3.6).

#![allow(clippy::indexing_slicing)] // Fixed 16-word message ring + label buffer

use traits::{BlockLen, ConstructionError, DigestError, error::check_output_window};

use crate::{
  block::{BlockCore, BlockEngine, LengthOrder, md_pad},
  util::{load_be_u64, store_be_u64},
};

const BLOCK_LEN: usize = 128;

const SHA512_H0: [u64; 8] = [
  0x6a09_e667_f3bc_c908,
  0xbb67_ae85_84ca_a73b,
  0x3c6e_f372_fe94_f82b,
  0xa54f_f53a_5f1d_36f1,
  0x510e_527f_ade6_82d1,
  0x9b05_688c_2b3e_6c1f,
  0x1f83_d9ab_fb41_bd6b,
  0x5be0_cd19_137e_2179,
];

const SHA384_H0: [u64; 8] = [
  0xcbbb_9d5d_c105_9ed8,
  0x629a_292a_367c_d507,
  0x9159_015a_3070_dd17,
  0x152f_ecd8_f70e_5939,
  0x6733_2667_ffc0_0b31,
  0x8eb4_4a87_6858_1511,
  0xdb0c_2e0d_64f9_8fa7,
  0x47b5_481d_befa_4fa4,
];

const SHA512_224_H0: [u64; 8] = [
  0x8c3d_37c8_1954_4da2,
  0x73e1_9966_89dc_d4d6,
  0x1dfa_b7ae_32ff_9c82,
  0x679d_d514_582f_9fcf,
  0x0f6d_2b69_7bd4_4da8,
  0x77e3_6f73_04c4_8942,
  0x3f9d_85a8_6a1d_36c8,
  0x1112_e6ad_91d6_92a1,
];

const SHA512_256_H0: [u64; 8] = [
  0x2231_2194_fc2b_f72c,
  0x9f55_5fa3_c84c_64c2,
  0x2393_b86b_6f53_b151,
  0x9638_7719_5940_eabd,
  0x9628_3ee2_a88e_ffe3,
  0xbe5e_1e25_5386_3992,
  0x2b01_99fc_2c85_b8aa,
  0x0eb7_2ddc_81c5_2ca2,
];

const K: [u64; 80] = [
  0x428a_2f98_d728_ae22,
  0x7137_4491_23ef_65cd,
  0xb5c0_fbcf_ec4d_3b2f,
  0xe9b5_dba5_8189_dbbc,
  0x3956_c25b_f348_b538,
  0x59f1_11f1_b605_d019,
  0x923f_82a4_af19_4f9b,
  0xab1c_5ed5_da6d_8118,
  0xd807_aa98_a303_0242,
  0x1283_5b01_4570_6fbe,
  0x2431_85be_4ee4_b28c,
  0x550c_7dc3_d5ff_b4e2,
  0x72be_5d74_f27b_896f,
  0x80de_b1fe_3b16_96b1,
  0x9bdc_06a7_25c7_1235,
  0xc19b_f174_cf69_2694,
  0xe49b_69c1_9ef1_4ad2,
  0xefbe_4786_384f_25e3,
  0x0fc1_9dc6_8b8c_d5b5,
  0x240c_a1cc_77ac_9c65,
  0x2de9_2c6f_592b_0275,
  0x4a74_84aa_6ea6_e483,
  0x5cb0_a9dc_bd41_fbd4,
  0x76f9_88da_8311_53b5,
  0x983e_5152_ee66_dfab,
  0xa831_c66d_2db4_3210,
  0xb003_27c8_98fb_213f,
  0xbf59_7fc7_beef_0ee4,
  0xc6e0_0bf3_3da8_8fc2,
  0xd5a7_9147_930a_a725,
  0x06ca_6351_e003_826f,
  0x1429_2967_0a0e_6e70,
  0x27b7_0a85_46d2_2ffc,
  0x2e1b_2138_5c26_c926,
  0x4d2c_6dfc_5ac4_2aed,
  0x5338_0d13_9d95_b3df,
  0x650a_7354_8baf_63de,
  0x766a_0abb_3c77_b2a8,
  0x81c2_c92e_47ed_aee6,
  0x9272_2c85_1482_353b,
  0xa2bf_e8a1_4cf1_0364,
  0xa81a_664b_bc42_3001,
  0xc24b_8b70_d0f8_9791,
  0xc76c_51a3_0654_be30,
  0xd192_e819_d6ef_5218,
  0xd699_0624_5565_a910,
  0xf40e_3585_5771_202a,
  0x106a_a070_32bb_d1b8,
  0x19a4_c116_b8d2_d0c8,
  0x1e37_6c08_5141_ab53,
  0x2748_774c_df8e_eb99,
  0x34b0_bcb5_e19b_48a8,
  0x391c_0cb3_c5c9_5a63,
  0x4ed8_aa4a_e341_8acb,
  0x5b9c_ca4f_7763_e373,
  0x682e_6ff3_d6b2_b8a3,
  0x748f_82ee_5def_b2fc,
  0x78a5_636f_4317_2f60,
  0x84c8_7814_a1f0_ab72,
  0x8cc7_0208_1a64_39ec,
  0x90be_fffa_2363_1e28,
  0xa450_6ceb_de82_bde9,
  0xbef9_a3f7_b2c6_7915,
  0xc671_78f2_e372_532b,
  0xca27_3ece_ea26_619c,
  0xd186_b8c7_21c0_c207,
  0xeada_7dd6_cde0_eb1e,
  0xf57d_4f7f_ee6e_d178,
  0x06f0_67aa_7217_6fba,
  0x0a63_7dc5_a2c8_98a6,
  0x113f_9804_bef9_0dae,
  0x1b71_0b35_131c_471b,
  0x28db_77f5_2304_7d84,
  0x32ca_ab7b_40c7_2493,
  0x3c9e_be0a_15c9_bebc,
  0x431d_67c4_9c10_0d4c,
  0x4cc5_d4be_cb3e_42b6,
  0x597f_299c_fc65_7e2a,
  0x5fcb_6fab_3ad6_faec,
  0x6c44_198c_4a47_5817,
];

#[inline(always)]
fn big_sigma0(x: u64) -> u64 {
  x.rotate_right(28) ^ x.rotate_right(34) ^ x.rotate_right(39)
}

#[inline(always)]
fn big_sigma1(x: u64) -> u64 {
  x.rotate_right(14) ^ x.rotate_right(18) ^ x.rotate_right(41)
}

#[inline(always)]
fn small_sigma0(x: u64) -> u64 {
  x.rotate_right(1) ^ x.rotate_right(8) ^ (x >> 7)
}

#[inline(always)]
fn small_sigma1(x: u64) -> u64 {
  x.rotate_right(19) ^ x.rotate_right(61) ^ (x >> 6)
}

pub(crate) fn compress(state: &mut [u64; 8], block: &[u8; BLOCK_LEN]) {
  let mut w: [u64; 16] = load_be_u64(block);
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
pub(crate) struct Sha512Core {
  state: [u64; 8],
}

impl BlockCore<BLOCK_LEN> for Sha512Core {
  #[inline]
  fn compress(&mut self, block: &[u8; BLOCK_LEN]) {
    compress(&mut self.state, block);
  }

  fn finish(&mut self, tail: &[u8], total_len: u128, out: &mut [u8]) {
    let state = &mut self.state;
    md_pad::<BLOCK_LEN>(tail, total_len, 16, LengthOrder::BigEndian, |b| compress(state, b));
    store_be_u64(&self.state, out);
  }
}

md_digest! {
  /// SHA-512 hasher.
  Sha512 {
    core: Sha512Core = Sha512Core { state: SHA512_H0 },
    block: 128,
    output: 64,
    name: "sha512",
  }
}

md_digest! {
  /// SHA-384 hasher.
  Sha384 {
    core: Sha512Core = Sha512Core { state: SHA384_H0 },
    block: 128,
    output: 48,
    name: "sha384",
  }
}

md_digest! {
  /// SHA-512/224 hasher.
  Sha512_224 {
    core: Sha512Core = Sha512Core { state: SHA512_224_H0 },
    block: 128,
    output: 28,
    name: "sha512/224",
  }
}

md_digest! {
  /// SHA-512/256 hasher.
  ///
  /// ```
  /// use hashes::{Digest, crypto::Sha512_256};
  ///
  /// let d = Sha512_256::digest(b"");
  /// assert_eq!(d[..4], [0xc6, 0x72, 0xb8, 0xd1]);
  /// ```
  Sha512_256 {
    core: Sha512Core = Sha512Core { state: SHA512_256_H0 },
    block: 128,
    output: 32,
    name: "sha512/256",
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// SHA-512/t
// ─────────────────────────────────────────────────────────────────────────────

/// Initial hash value for SHA-512/t: SHA-512 of the ASCII label `"SHA-512/t"`
/// under the SHA-512 IV with every word XORed with `0xa5a5a5a5a5a5a5a5`.
fn truncated_iv(bits: usize) -> [u64; 8] {
  let mut iv = SHA512_H0;
  for w in &mut iv {
    *w ^= 0xa5a5_a5a5_a5a5_a5a5;
  }

  let mut label = [0u8; 11];
  label[..8].copy_from_slice(b"SHA-512/");
  let mut digits = [0u8; 3];
  let mut n = bits;
  let mut len = 0;
  loop {
    digits[len] = b'0' + (n % 10) as u8;
    len += 1;
    n /= 10;
    if n == 0 || len == digits.len() {
      break;
    }
  }
  digits[..len].reverse();
  label[8..8 + len].copy_from_slice(&digits[..len]);

  let mut engine = BlockEngine::<_, BLOCK_LEN>::new(Sha512Core { state: iv });
  engine.update(&label[..8 + len]);
  let mut out = [0u8; 64];
  engine.finalize_into(&mut out);
  load_be_u64(&out)
}

/// SHA-512/t with the output length chosen at construction.
///
/// `t` must be a multiple of 8 in `8..512`, excluding 384 (FIPS 180-4 §5.3.6).
/// Output length is a runtime value, so this type implements
/// [`DynDigest`](traits::DynDigest) rather than `Digest`.
///
/// ```
/// use hashes::crypto::{Sha512Trunc, Sha512_256};
/// use hashes::Digest;
///
/// let mut h = Sha512Trunc::new(256)?;
/// h.update(b"abc");
/// let mut out = [0u8; 32];
/// h.finalize_into(&mut out, 0, 32)?;
/// assert_eq!(out, Sha512_256::digest(b"abc"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct Sha512Trunc {
  engine: BlockEngine<Sha512Core, BLOCK_LEN>,
  output_len: usize,
}

impl core::fmt::Debug for Sha512Trunc {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Sha512Trunc")
      .field("output_bits", &self.output_bits())
      .finish_non_exhaustive()
  }
}

impl Sha512Trunc {
  /// Create a SHA-512/t hasher for `output_bits` = t.
  ///
  /// # Errors
  ///
  /// [`ConstructionError::UnsupportedOutputBits`] if `t` is 0, at least 512,
  /// not a multiple of 8, or 384.
  pub fn new(output_bits: usize) -> Result<Self, ConstructionError> {
    if output_bits == 0 || output_bits >= 512 || !output_bits.is_multiple_of(8) || output_bits == 384 {
      return Err(ConstructionError::UnsupportedOutputBits(output_bits));
    }
    let iv = match output_bits {
      224 => SHA512_224_H0,
      256 => SHA512_256_H0,
      t => truncated_iv(t),
    };
    Ok(Self {
      engine: BlockEngine::new(Sha512Core { state: iv }),
      output_len: output_bits / 8,
    })
  }

  #[inline]
  pub fn update(&mut self, data: &[u8]) {
    self.engine.update(data);
  }

  /// Write the `t / 8` byte digest into `out[offset..offset + len]` and reset.
  ///
  /// # Errors
  ///
  /// [`DigestError::InsufficientOutputSpace`] if the window is shorter than
  /// the digest; nothing is written and the state is kept.
  pub fn finalize_into(&mut self, out: &mut [u8], offset: usize, len: usize) -> Result<usize, DigestError> {
    check_output_window(out.len(), offset, len, self.output_len)?;
    let Some(dst) = out.get_mut(offset..offset + self.output_len) else {
      return Err(DigestError::insufficient(self.output_len, out.len().saturating_sub(offset)));
    };
    self.engine.finalize_into(dst);
    Ok(self.output_len)
  }

  #[inline]
  pub fn reset(&mut self) {
    self.engine.reset();
  }

  /// Digest length in bytes (`t / 8`).
  #[inline]
  #[must_use]
  pub const fn output_len(&self) -> usize {
    self.output_len
  }

  #[inline]
  #[must_use]
  pub const fn output_bits(&self) -> usize {
    self.output_len * 8
  }
}

impl traits::DynDigest for Sha512Trunc {
  #[inline]
  fn update(&mut self, data: &[u8]) {
    Sha512Trunc::update(self, data);
  }

  #[inline]
  fn finalize_into(&mut self, out: &mut [u8], offset: usize, len: usize) -> Result<usize, DigestError> {
    Sha512Trunc::finalize_into(self, out, offset, len)
  }

  #[inline]
  fn reset(&mut self) {
    Sha512Trunc::reset(self);
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
    "sha512/t"
  }
}

#[cfg(test)]
mod tests {
  use traits::{ConstructionError, Digest};

  use super::*;

  #[test]
  fn fips_abc_vectors() {
    assert_eq!(
      hex::encode(Sha512::digest(b"abc")),
      "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
    );
    assert_eq!(
      hex::encode(Sha384::digest(b"abc")),
      "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed8086072ba1e7cc2358baeca134c825a7"
    );
    assert_eq!(
      hex::encode(Sha512_224::digest(b"abc")),
      "4634270f707b6a54daae7530460842e20e37ed265ceee9a43e8924aa"
    );
    assert_eq!(
      hex::encode(Sha512_256::digest(b"abc")),
      "53048e2681941ef99b2e29b76b4c7dabe4c2d0c634fc6d46e0e2f13107e7af23"
    );
  }

  #[test]
  fn empty_vectors() {
    assert_eq!(
      hex::encode(Sha512_256::digest(b"")),
      "c672b8d1ef56ed28ab87c3622c5114069bdd3ad7b8f9737498d0c01ecef0967a"
    );
    assert_eq!(
      hex::encode(Sha512::digest(b"")),
      "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e"
    );
    assert_eq!(
      hex::encode(Sha384::digest(b"")),
      "38b060a751ac96384cd9327eb1b1e36a21fdb71114be07434c0cc7bf63f6e1da274edebfe76f65fbd51ad2f14898b95b"
    );
  }

  #[test]
  fn generated_iv_matches_published_constants() {
    assert_eq!(truncated_iv(224), SHA512_224_H0);
    assert_eq!(truncated_iv(256), SHA512_256_H0);
  }

  #[test]
  fn truncated_matches_fixed_variants() {
    for (bits, expected) in [(224, &Sha512_224::digest(b"abc")[..]), (256, &Sha512_256::digest(b"abc")[..])] {
      let mut h = Sha512Trunc::new(bits).unwrap();
      h.update(b"abc");
      let mut out = [0u8; 64];
      assert_eq!(h.finalize_into(&mut out, 0, 64), Ok(bits / 8));
      assert_eq!(&out[..bits / 8], expected);
    }
  }

  #[test]
  fn rejects_invalid_t() {
    for bits in [0, 7, 12, 384, 512, 1024] {
      assert_eq!(
        Sha512Trunc::new(bits).map(|_| ()),
        Err(ConstructionError::UnsupportedOutputBits(bits))
      );
    }
    assert!(Sha512Trunc::new(8).is_ok());
    assert!(Sha512Trunc::new(504).is_ok());
  }

  #[test]
  fn odd_t_truncates_mid_word() {
    let mut h = Sha512Trunc::new(40).unwrap();
    assert_eq!(h.output_len(), 5);
    let mut out = [0xEEu8; 8];
    assert_eq!(h.finalize_into(&mut out, 3, 5), Ok(5));
    assert_eq!(out[..3], [0xEE; 3]);

    // Short window: untouched and state kept.
    let mut small = [0u8; 4];
    assert_eq!(h.finalize_into(&mut small, 0, 4), Err(DigestError::insufficient(5, 4)));
    assert_eq!(small, [0u8; 4]);
  }
}
