#![allow(dead_code)]

use core::hint::black_box;

use criterion::{BenchmarkGroup, Throughput, measurement::WallTime};

/// Deterministic, fast pseudo-random generator for benchmark inputs.
///
/// Not cryptographically secure; it only avoids all-zero inputs.
#[inline]
fn xorshift64star(state: &mut u64) -> u64 {
  let mut x = *state;
  x ^= x >> 12;
  x ^= x << 25;
  x ^= x >> 27;
  *state = x;
  x.wrapping_mul(0x2545F4914F6CDD1D)
}

pub fn pseudo_random_bytes(len: usize, seed: u64) -> Vec<u8> {
  let mut state = seed ^ (len as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
  let mut out = vec![0u8; len];
  for b in &mut out {
    *b = (xorshift64star(&mut state) >> 56) as u8;
  }
  black_box(&out);
  out
}

/// Edge sizes around the 64/128-byte block boundaries plus a few bulk sizes.
pub fn sized_inputs() -> Vec<(usize, Vec<u8>)> {
  [0usize, 1, 55, 56, 64, 111, 112, 128, 1024, 1025, 16 * 1024, 1024 * 1024]
    .into_iter()
    .map(|len| (len, pseudo_random_bytes(len, 0xD1CE_B00C_D15C_0FFE)))
    .collect()
}

pub fn set_throughput(group: &mut BenchmarkGroup<'_, WallTime>, len: usize) {
  if len == 0 {
    group.throughput(Throughput::Elements(1));
  } else {
    group.throughput(Throughput::Bytes(len as u64));
  }
}
