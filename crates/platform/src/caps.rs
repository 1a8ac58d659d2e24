//! CPU capability representation.
//!
//! [`Caps`] answers one question: "which hash-relevant instructions can run
//! on this machine?" Each bit is one ISA extension. Bits are grouped per
//! architecture so a single value can describe any target.
//!
//! # Bit Layout
//!
//! - Bits 0-31: x86/x86_64 features
//! - Bits 32-63: aarch64 features
//!
//! ```
//! use platform::caps::{Caps, x86};
//!
//! let c = x86::SSE41 | x86::SHA;
//! assert!(c.has(x86::SHA));
//! assert!(!c.has(x86::SHA_READY));
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Core Capability Type
// ─────────────────────────────────────────────────────────────────────────────

/// CPU capabilities: a 64-bit feature bitset.
///
/// `Caps` is `Copy`, `Send` and `Sync`; pass it around by value.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Caps(u64);

impl Caps {
  /// Empty capability set. Only portable code paths are eligible.
  pub const NONE: Self = Self(0);

  /// Create a capability set with a single bit set.
  #[inline]
  #[must_use]
  pub const fn bit(bit: u8) -> Self {
    Self(1u64 << (bit % 64))
  }

  /// Build from the raw bit pattern.
  #[inline]
  #[must_use]
  pub const fn from_bits(bits: u64) -> Self {
    Self(bits)
  }

  /// The raw bit pattern.
  #[inline]
  #[must_use]
  pub const fn bits(self) -> u64 {
    self.0
  }

  /// Check if all features in `required` are present.
  #[inline(always)]
  #[must_use]
  pub const fn has(self, required: Self) -> bool {
    self.0 & required.0 == required.0
  }

  /// Union of two capability sets.
  #[inline]
  #[must_use]
  pub const fn union(self, other: Self) -> Self {
    Self(self.0 | other.0)
  }

  /// Intersection of two capability sets.
  #[inline]
  #[must_use]
  pub const fn intersection(self, other: Self) -> Self {
    Self(self.0 & other.0)
  }

  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0 == 0
  }

  /// Number of features present.
  #[inline]
  #[must_use]
  pub const fn count(self) -> u32 {
    self.0.count_ones()
  }

  /// Names of the features present, in bit order.
  pub fn feature_names(self) -> impl Iterator<Item = &'static str> {
    NAMES.iter().filter(move |(c, _)| self.has(*c)).map(|(_, name)| *name)
  }
}

impl core::ops::BitOr for Caps {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self::Output {
    self.union(rhs)
  }
}

impl core::ops::BitAnd for Caps {
  type Output = Self;

  #[inline]
  fn bitand(self, rhs: Self) -> Self::Output {
    self.intersection(rhs)
  }
}

impl core::ops::BitOrAssign for Caps {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    *self = self.union(rhs);
  }
}

impl core::fmt::Debug for Caps {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_set().entries(self.feature_names()).finish()
  }
}

impl core::fmt::Display for Caps {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    if self.is_empty() {
      return f.write_str("portable");
    }
    for (i, name) in self.feature_names().enumerate() {
      if i > 0 {
        f.write_str("+")?;
      }
      f.write_str(name)?;
    }
    Ok(())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Architecture Identification
// ─────────────────────────────────────────────────────────────────────────────

/// Target architecture of the current build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Arch {
  X86_64,
  X86,
  Aarch64,
  #[default]
  Other,
}

impl Arch {
  /// Get the architecture for the current compilation target.
  #[inline]
  #[must_use]
  pub const fn current() -> Self {
    if cfg!(target_arch = "x86_64") {
      Self::X86_64
    } else if cfg!(target_arch = "x86") {
      Self::X86
    } else if cfg!(target_arch = "aarch64") {
      Self::Aarch64
    } else {
      Self::Other
    }
  }

  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::X86 => "x86",
      Self::Aarch64 => "aarch64",
      Self::Other => "other",
    }
  }
}

impl core::fmt::Display for Arch {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// x86/x86_64 Features (bits 0-31)
// ─────────────────────────────────────────────────────────────────────────────

/// x86/x86_64 features relevant to SHA-1/SHA-2 and BLAKE3.
pub mod x86 {
  use super::Caps;

  pub const SSSE3: Caps = Caps::bit(0);
  pub const SSE41: Caps = Caps::bit(1);
  pub const AVX2: Caps = Caps::bit(2);
  pub const AVX512F: Caps = Caps::bit(3);
  pub const AVX512VL: Caps = Caps::bit(4);
  /// SHA-NI (SHA-1 and SHA-256 rounds).
  pub const SHA: Caps = Caps::bit(5);
  /// SHA512 extension (Arrow Lake / Lunar Lake).
  pub const SHA512: Caps = Caps::bit(6);

  /// SHA-NI needs SSSE3/SSE4.1 for the message shuffles around it.
  pub const SHA_READY: Caps = Caps::from_bits(SHA.bits() | SSSE3.bits() | SSE41.bits());
  pub const AVX512_READY: Caps = Caps::from_bits(AVX512F.bits() | AVX512VL.bits());
}

// ─────────────────────────────────────────────────────────────────────────────
// aarch64 Features (bits 32-63)
// ─────────────────────────────────────────────────────────────────────────────

/// aarch64 features relevant to SHA-1/SHA-2 and BLAKE3.
pub mod aarch64 {
  use super::Caps;

  /// Baseline on AArch64.
  pub const NEON: Caps = Caps::bit(32);
  /// SHA-1 and SHA-256 instructions.
  pub const SHA2: Caps = Caps::bit(33);
  /// SHA3 (EOR3/RAX1/XAR/BCAX).
  pub const SHA3: Caps = Caps::bit(34);
  pub const SHA512: Caps = Caps::bit(35);
}

static NAMES: [(Caps, &str); 11] = [
  (x86::SSSE3, "ssse3"),
  (x86::SSE41, "sse4.1"),
  (x86::AVX2, "avx2"),
  (x86::AVX512F, "avx512f"),
  (x86::AVX512VL, "avx512vl"),
  (x86::SHA, "sha"),
  (x86::SHA512, "sha512"),
  (aarch64::NEON, "neon"),
  (aarch64::SHA2, "sha2"),
  (aarch64::SHA3, "sha3"),
  (aarch64::SHA512, "sha512"),
];

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::{string::ToString, vec::Vec};

  use super::*;

  #[test]
  fn has_requires_every_bit() {
    let c = x86::SHA | x86::SSSE3;
    assert!(c.has(x86::SHA));
    assert!(c.has(Caps::NONE));
    assert!(!c.has(x86::SHA_READY));
    assert!((c | x86::SSE41).has(x86::SHA_READY));
  }

  #[test]
  fn feature_bits_are_distinct() {
    let all = NAMES.iter().fold(Caps::NONE, |acc, (c, _)| acc | *c);
    assert_eq!(all.count() as usize, NAMES.len());
  }

  #[test]
  fn names_follow_bit_order() {
    let c = aarch64::SHA2 | aarch64::NEON;
    let names: Vec<_> = c.feature_names().collect();
    assert_eq!(names, ["neon", "sha2"]);
    assert_eq!(c.to_string(), "neon+sha2");
    assert_eq!(Caps::NONE.to_string(), "portable");
  }

  #[test]
  fn current_arch_matches_cfg() {
    #[cfg(target_arch = "x86_64")]
    assert_eq!(Arch::current(), Arch::X86_64);
    #[cfg(target_arch = "aarch64")]
    assert_eq!(Arch::current(), Arch::Aarch64);
    assert!(!Arch::current().name().is_empty());
  }
}
