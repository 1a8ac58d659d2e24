//! Backend crate: shared one-time state for omnihash dispatch.
//!
//! Dispatch resolves process-wide decisions exactly once (the provider
//! registry, the configured force mode) and then only reads them. This crate
//! provides the cell those decisions live in:
//!
//! - [`OnceCache`]: write-once cell with `OnceLock` semantics that also works
//!   on `no_std` targets (atomics, or recompute-per-call without atomics)
//!
//! ```
//! use backend::OnceCache;
//!
//! static ANSWER: OnceCache<u32> = OnceCache::new();
//! assert_eq!(ANSWER.get_or_init_copy(|| 42), 42);
//! assert_eq!(ANSWER.get_or_init_copy(|| 7), 42);
//! ```
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod cache;

pub use cache::OnceCache;
