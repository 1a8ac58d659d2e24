//! Cryptographic hash functions.
//!
//! | Type | Construction | Block | Output |
//! |------|--------------|-------|--------|
//! | [`Sha1`] | Merkle–Damgård | 64 | 20 |
//! | [`Sha224`] / [`Sha256`] | Merkle–Damgård | 64 | 28 / 32 |
//! | [`Sha384`] / [`Sha512`] | Merkle–Damgård | 128 | 48 / 64 |
//! | [`Sha512_224`] / [`Sha512_256`] / [`Sha512Trunc`] | Merkle–Damgård | 128 | 28 / 32 / t |
//! | [`Blake3`] | Merkle tree over 1 KiB chunks | 64 | 32 or any (XOF) |
//!
//! SHA-1 is provided for interoperability only; it is not collision resistant.

/// Define a fixed-output Merkle–Damgård digest on top of `BlockEngine`.
macro_rules! md_digest {
  (
    $(#[$meta:meta])*
    $name:ident {
      core: $core:ty = $init:expr,
      block: $block:literal,
      output: $out:literal,
      name: $algo:literal $(,)?
    }
  ) => {
    $(#[$meta])*
    #[derive(Clone)]
    pub struct $name {
      engine: $crate::block::BlockEngine<$core, $block>,
    }

    impl Default for $name {
      #[inline]
      fn default() -> Self {
        <Self as traits::Digest>::new()
      }
    }

    impl core::fmt::Debug for $name {
      fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct(stringify!($name)).finish_non_exhaustive()
      }
    }

    impl traits::Digest for $name {
      const OUTPUT_SIZE: usize = $out;
      const BLOCK_LEN: traits::BlockLen = traits::BlockLen::Fixed($block);
      const NAME: &'static str = $algo;
      type Output = [u8; $out];

      #[inline]
      fn new() -> Self {
        Self {
          engine: $crate::block::BlockEngine::new($init),
        }
      }

      #[inline]
      fn update(&mut self, data: &[u8]) {
        self.engine.update(data);
      }

      #[inline]
      fn finalize(&mut self) -> Self::Output {
        let mut out = [0u8; $out];
        self.engine.finalize_into(&mut out);
        out
      }

      #[inline]
      fn reset(&mut self) {
        self.engine.reset();
      }
    }
  };
}

pub mod blake3;
pub mod sha1;
pub mod sha256;
pub mod sha512;

pub use blake3::{Blake3, Blake3Sized, Blake3Xof};
pub use sha1::Sha1;
pub use sha256::{Sha224, Sha256};
pub use sha512::{Sha384, Sha512, Sha512_224, Sha512_256, Sha512Trunc};
