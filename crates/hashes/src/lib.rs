//! Streaming digests: SHA-1, the SHA-2 family, and BLAKE3.
//!
//! This crate is `no_std` compatible. `alloc` adds runtime dispatch and boxed
//! hashers; `std` adds the process-wide registry with environment
//! configuration. Dev-only dependencies are used for oracle testing and
//! benchmarking.
//!
//! # Modules
//!
//! - [`crypto`] - Hash functions, all implementing [`Digest`].
//! - [`block`] - Block-buffering engine shared by the Merkle–Damgård hashes.
//! - [`hmac`] - HMAC over any [`Digest`].
//! - [`bytes`] - Segmented byte views fed to hashers without flattening.
//! - [`native`] - Owned wrapper for externally provided hash contexts.
//! - `dispatch` (`alloc`) - Native-preferred, portable-fallback selection.
//!
//! # Lifecycle
//!
//! Every hasher follows the same contract: `update` any number of times,
//! then `finalize`, which also resets to the initial (possibly keyed) state.
//!
//! ```
//! use hashes::{Digest, crypto::Sha256};
//!
//! let mut h = Sha256::new();
//! h.update(b"abc");
//! let first = h.finalize();
//! assert_eq!(first, Sha256::digest(b"abc"));
//! assert_eq!(h.finalize(), Sha256::digest(b""));
//! ```
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod block;
pub mod bytes;
pub mod crypto;
#[cfg(feature = "alloc")]
pub mod dispatch;
pub mod hmac;
pub mod native;

mod util;

pub use traits::{BlockLen, ConstructionError, Digest, DigestError, DynDigest, Xof};
