//! Arbitrary update schedules through the dispatch layer.
//!
//! Any split of the input, with a clone taken midway, must agree with the
//! one-shot digest of the same descriptor.

#![no_main]

use arbitrary::Arbitrary;
use hashes::dispatch::{Algorithm, Descriptor, PortableProvider, Provider};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  algorithm: u8,
  keyed: bool,
  data: Vec<u8>,
  chunk_sizes: Vec<u16>,
  clone_at: u8,
}

fuzz_target!(|input: Input| {
  let algorithm = Algorithm::ALL[input.algorithm as usize % Algorithm::ALL.len()];
  let mut descriptor = Descriptor::new(algorithm);
  if algorithm == Algorithm::Sha512Trunc {
    descriptor = descriptor.with_output_len(40);
  } else if input.keyed {
    descriptor = descriptor.with_key(&[0x5A; 32]);
  }

  let mut oneshot = PortableProvider.instantiate(&descriptor).unwrap();
  oneshot.update(&input.data);
  let expected = oneshot.finalize_boxed();

  let mut hasher = PortableProvider.instantiate(&descriptor).unwrap();
  let mut copy = None;
  let mut offset = 0;
  let mut step = 0;
  while offset < input.data.len() {
    let size = match input.chunk_sizes.get(step % input.chunk_sizes.len().max(1)) {
      Some(&s) => (s as usize % 2048).max(1),
      None => 1,
    };
    let end = (offset + size).min(input.data.len());
    hasher.update(&input.data[offset..end]);
    offset = end;
    step += 1;
    if step == input.clone_at as usize {
      copy = Some((hasher.clone(), offset));
    }
  }

  assert_eq!(hasher.finalize_boxed(), expected, "{descriptor:?}");
  if let Some((mut copy, at)) = copy {
    copy.update(&input.data[at..]);
    assert_eq!(copy.finalize_boxed(), expected, "clone of {descriptor:?}");
  }
});
