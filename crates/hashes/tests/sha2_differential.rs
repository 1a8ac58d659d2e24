use hashes::crypto::{Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256, Sha512Trunc};
use proptest::prelude::*;
use traits::Digest;

/// Reference digest from the `sha2` crate.
fn reference<R: sha2::Digest>(data: &[u8]) -> Vec<u8> {
  R::digest(data).to_vec()
}

/// Ours, fed in steps derived from the data itself.
fn ours_streaming<D: Digest>(data: &[u8], modulus: usize) -> Vec<u8> {
  let mut h = D::new();
  let mut i = 0usize;
  while i < data.len() {
    let step = (data[i] as usize % modulus) + 1;
    let end = core::cmp::min(data.len(), i + step);
    h.update(&data[i..end]);
    i = end;
  }
  h.finalize().as_ref().to_vec()
}

fn ours_one_shot<D: Digest>(data: &[u8]) -> Vec<u8> {
  D::digest(data).as_ref().to_vec()
}

proptest! {
  #[test]
  fn sha256_family_matches_sha2(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
    prop_assert_eq!(ours_one_shot::<Sha256>(&data), reference::<sha2::Sha256>(&data));
    prop_assert_eq!(ours_streaming::<Sha256>(&data, 67), reference::<sha2::Sha256>(&data));
    prop_assert_eq!(ours_one_shot::<Sha224>(&data), reference::<sha2::Sha224>(&data));
    prop_assert_eq!(ours_streaming::<Sha224>(&data, 13), reference::<sha2::Sha224>(&data));
  }

  #[test]
  fn sha512_family_matches_sha2(data in proptest::collection::vec(any::<u8>(), 0..8192)) {
    prop_assert_eq!(ours_one_shot::<Sha512>(&data), reference::<sha2::Sha512>(&data));
    prop_assert_eq!(ours_streaming::<Sha512>(&data, 131), reference::<sha2::Sha512>(&data));
    prop_assert_eq!(ours_one_shot::<Sha384>(&data), reference::<sha2::Sha384>(&data));
    prop_assert_eq!(ours_streaming::<Sha384>(&data, 97), reference::<sha2::Sha384>(&data));
    prop_assert_eq!(ours_one_shot::<Sha512_224>(&data), reference::<sha2::Sha512_224>(&data));
    prop_assert_eq!(ours_streaming::<Sha512_256>(&data, 29), reference::<sha2::Sha512_256>(&data));
  }

  #[test]
  fn sha512_t_matches_fixed_truncations(data in proptest::collection::vec(any::<u8>(), 0..1024)) {
    for (bits, expected) in [
      (224, reference::<sha2::Sha512_224>(&data)),
      (256, reference::<sha2::Sha512_256>(&data)),
    ] {
      let mut h = Sha512Trunc::new(bits).unwrap();
      h.update(&data);
      let mut out = vec![0u8; bits / 8];
      prop_assert_eq!(h.finalize_into(&mut out, 0, bits / 8), Ok(bits / 8));
      prop_assert_eq!(out, expected);
    }
  }
}
