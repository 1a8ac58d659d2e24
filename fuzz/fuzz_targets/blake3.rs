//! Differential fuzzing of every BLAKE3 mode against the `blake3` crate.

#![no_main]

use arbitrary::Arbitrary;
use hashes::crypto::Blake3;
use libfuzzer_sys::fuzz_target;
use traits::{Digest as _, Xof as _};

#[derive(Arbitrary, Debug)]
struct Input {
  data: Vec<u8>,
  key: [u8; 32],
  context: String,
  out_len: u16,
  split: u16,
  seek: u32,
}

fuzz_target!(|input: Input| {
  let data = &input.data;

  assert_eq!(Blake3::digest(data), *blake3::hash(data).as_bytes());
  assert_eq!(
    Blake3::keyed_digest(&input.key, data),
    *blake3::keyed_hash(&input.key, data).as_bytes()
  );
  assert_eq!(
    Blake3::derive_key(&input.context, data),
    blake3::derive_key(&input.context, data)
  );

  // XOF, squeezed in two pieces.
  let out_len = input.out_len as usize % 2049;
  let split = input.split as usize % (out_len + 1);

  let mut ours = vec![0u8; out_len];
  let mut reader = Blake3::xof(data);
  reader.squeeze(&mut ours[..split]);
  reader.squeeze(&mut ours[split..]);

  let mut reference = blake3::Hasher::new();
  reference.update(data);
  let mut expected = vec![0u8; out_len];
  reference.finalize_xof().fill(&mut expected);
  assert_eq!(ours, expected, "xof split at {split}");

  // Seeking.
  let seek = u64::from(input.seek);
  let mut hasher = Blake3::new();
  hasher.update(data);
  let mut ours = vec![0u8; out_len.min(256)];
  hasher.finalize_xof_into(seek, &mut ours);

  let mut reader = reference.finalize_xof();
  reader.set_position(seek);
  let mut expected = vec![0u8; ours.len()];
  reader.fill(&mut expected);
  assert_eq!(ours, expected, "xof at {seek}");
});
