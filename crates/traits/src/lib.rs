//! Streaming digest contract for omnihash.
//!
//! Every hash in the workspace implements [`Digest`]; code that picks the
//! algorithm at runtime works through the object-safe [`DynDigest`]. Both
//! share the same lifecycle: create, `update` any number of times, then
//! `finalize`, which also returns the hasher to its initial state.
//!
//! # Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`Digest`] | Fixed-output streaming hash (SHA-2, BLAKE3 hash mode) |
//! | [`DynDigest`] | Object-safe form used by dispatch and keyed composition |
//! | [`Xof`] | Extendable output (BLAKE3 XOF) |
//!
//! # Errors
//!
//! - [`ConstructionError`] - invalid fixed parameters (key length, output bits)
//! - [`DigestError`] - destination too small, composite-view index out of range
//!
//! # Fallibility Discipline
//!
//! This crate denies `unwrap`, `expect`, and indexing in non-test code.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod digest;
pub mod error;
#[cfg(feature = "std")]
pub mod io;
mod xof;

pub use digest::{BlockLen, Digest, DynDigest};
pub use error::{ConstructionError, DigestError};
pub use xof::Xof;
