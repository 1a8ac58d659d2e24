//! Extendable-output function (XOF) trait.

/// Extendable-output function producing an arbitrary number of bytes.
///
/// Output is a single logical stream: squeezing `L` bytes twice yields the
/// same bytes as squeezing `2L` once. This trait has no `std::io::Read`
/// dependency and is usable in `no_std` environments.
pub trait Xof: Clone {
  /// Squeeze the next `out.len()` output bytes into `out`.
  fn squeeze(&mut self, out: &mut [u8]);

  /// Byte offset of the next squeezed byte within the output stream.
  fn position(&self) -> u64;
}
