//! Streaming digests behind one interface.
//!
//! `omnihash` bundles SHA-1, the SHA-2 family (including SHA-512/t), BLAKE3
//! with its keyed, derive-key and XOF modes, and HMAC over any of them. Every
//! hasher follows the same lifecycle: `update` any number of times, then
//! `finalize`, which also resets the hasher for reuse.
//!
//! # Quick Start
//!
//! ```
//! use omnihash::{Blake3, Digest, Sha256};
//!
//! // One-shot
//! let digest = Sha256::digest(b"abc");
//! assert_eq!(digest[..4], [0xba, 0x78, 0x16, 0xbf]);
//!
//! // Streaming
//! let mut hasher = Blake3::new();
//! hasher.update(b"hello ");
//! hasher.update(b"world");
//! assert_eq!(hasher.finalize(), Blake3::digest(b"hello world"));
//! ```
//!
//! # Choosing at runtime
//!
//! ```
//! # #[cfg(feature = "std")] {
//! use omnihash::dispatch::{self, Algorithm, Descriptor};
//!
//! let algorithm: Algorithm = "sha-512/256".parse().unwrap();
//! let mut hasher = dispatch::create(&Descriptor::new(algorithm)).unwrap();
//! hasher.update(b"");
//! assert_eq!(hasher.finalize_boxed()[..2], [0xc6, 0x72]);
//! # }
//! ```
//!
//! A platform integration can register a native provider once, before the
//! first `create`, with [`dispatch::install_native_provider`]. Descriptors it
//! declines are served by the portable implementations.
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `std` | Yes | Runtime CPU detection, `std::io` adapters, `OMNIHASH_DISPATCH_FORCE` |
//! | `alloc` | Yes | Object-safe hashers and the dispatch registry (implied by `std`) |
//!
//! ## `no_std` Usage
//!
//! ```toml
//! [dependencies]
//! omnihash = { version = "0.1", default-features = false }
//! ```
//!
//! Without `alloc` the concrete hashers, HMAC and the segmented byte view
//! remain available; dispatch does not.
#![cfg_attr(not(feature = "std"), no_std)]

// =============================================================================
// Contract
// =============================================================================

#[cfg(feature = "std")]
pub use traits::io::{DigestReader, DigestWriter};
pub use traits::{BlockLen, ConstructionError, Digest, DigestError, DynDigest, Xof};

// =============================================================================
// Algorithms
// =============================================================================

pub use hashes::{
  bytes::{SegmentedBytes, SegmentedUpdate},
  crypto::{
    Blake3, Blake3Sized, Blake3Xof, Sha1, Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256, Sha512Trunc,
  },
  hmac::Hmac,
};

/// Building blocks for plugging a new compression function into the
/// Merkle–Damgård engine, or a platform hash API into dispatch.
pub mod engine {
  pub use hashes::{
    block::{BlockBuffer, BlockCore, BlockEngine, LengthOrder},
    native::{NativeBackend, NativeContext, NativeDigest, NativeError},
  };
}

// =============================================================================
// Dispatch
// =============================================================================

#[cfg(feature = "alloc")]
pub use hashes::dispatch;

// =============================================================================
// Platform
// =============================================================================

pub use backend::OnceCache;
pub use platform::{Caps, caps};

#[cfg(test)]
mod tests {
  use super::{Blake3, Digest, Hmac, SegmentedBytes, SegmentedUpdate, Sha256};

  #[test]
  fn reexports_line_up() {
    let mut mac = Hmac::<Sha256>::new_from_slice(b"key");
    mac.update(b"The quick brown fox jumps over the lazy dog");
    assert_eq!(
      hex::encode(mac.finalize()),
      "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
    );

    let segments: [&[u8]; 2] = [b"hello ", b"world"];
    let mut h = Blake3::new();
    h.update_segmented(&SegmentedBytes::new(&segments));
    assert_eq!(h.finalize(), Blake3::digest(b"hello world"));
  }
}
