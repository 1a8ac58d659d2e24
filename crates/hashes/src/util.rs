//! Word/byte conversion shared by the compression functions.

/// Load big-endian `u32` words from `bytes` (length `4 * W`).
#[inline(always)]
pub(crate) fn load_be_u32<const W: usize>(bytes: &[u8]) -> [u32; W] {
  let mut words = [0u32; W];
  let (chunks, _) = bytes.as_chunks::<4>();
  for (w, c) in words.iter_mut().zip(chunks) {
    *w = u32::from_be_bytes(*c);
  }
  words
}

/// Load big-endian `u64` words from `bytes` (length `8 * W`).
#[inline(always)]
pub(crate) fn load_be_u64<const W: usize>(bytes: &[u8]) -> [u64; W] {
  let mut words = [0u64; W];
  let (chunks, _) = bytes.as_chunks::<8>();
  for (w, c) in words.iter_mut().zip(chunks) {
    *w = u64::from_be_bytes(*c);
  }
  words
}

/// Load little-endian `u32` words from `bytes` (length `4 * W`).
#[inline(always)]
pub(crate) fn load_le_u32<const W: usize>(bytes: &[u8]) -> [u32; W] {
  let mut words = [0u32; W];
  let (chunks, _) = bytes.as_chunks::<4>();
  for (w, c) in words.iter_mut().zip(chunks) {
    *w = u32::from_le_bytes(*c);
  }
  words
}

/// Store `words` big-endian into `out`, truncating the last word if `out`
/// ends mid-word (SHA-224, SHA-512/224, SHA-512/t).
#[inline]
pub(crate) fn store_be_u32(words: &[u32], out: &mut [u8]) {
  for (dst, w) in out.chunks_mut(4).zip(words) {
    let bytes = w.to_be_bytes();
    dst.copy_from_slice(bytes.get(..dst.len()).unwrap_or(bytes.as_slice()));
  }
}

/// Store `words` big-endian into `out`, truncating like [`store_be_u32`].
#[inline]
pub(crate) fn store_be_u64(words: &[u64], out: &mut [u8]) {
  for (dst, w) in out.chunks_mut(8).zip(words) {
    let bytes = w.to_be_bytes();
    dst.copy_from_slice(bytes.get(..dst.len()).unwrap_or(bytes.as_slice()));
  }
}

/// Store `words` little-endian into `out`, truncating like [`store_be_u32`].
#[inline]
pub(crate) fn store_le_u32(words: &[u32], out: &mut [u8]) {
  for (dst, w) in out.chunks_mut(4).zip(words) {
    let bytes = w.to_le_bytes();
    dst.copy_from_slice(bytes.get(..dst.len()).unwrap_or(bytes.as_slice()));
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn truncating_store() {
    let mut out = [0u8; 6];
    store_be_u32(&[0x0102_0304, 0x0506_0708], &mut out);
    assert_eq!(out, [1, 2, 3, 4, 5, 6]);

    let mut out = [0u8; 3];
    store_le_u32(&[0x0102_0304], &mut out);
    assert_eq!(out, [4, 3, 2]);
  }

  #[test]
  fn load_round_trips_store() {
    let bytes: [u8; 16] = core::array::from_fn(|i| i as u8);
    let words: [u64; 2] = load_be_u64(&bytes);
    let mut back = [0u8; 16];
    store_be_u64(&words, &mut back);
    assert_eq!(back, bytes);
    assert_eq!(load_le_u32::<1>(&bytes[..4]), [0x0302_0100]);
    assert_eq!(load_be_u32::<1>(&bytes[..4]), [0x0001_0203]);
  }
}
