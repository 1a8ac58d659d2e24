//! Differential fuzzing of the SHA-2 family against RustCrypto `sha2`.

#![no_main]

use hashes::crypto::{Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256};
use libfuzzer_sys::fuzz_target;
use traits::Digest;

fn check<D: Digest, R: sha2::Digest>(data: &[u8]) {
  assert_eq!(D::digest(data).as_ref(), R::digest(data).as_slice(), "{}", D::NAME);
}

fuzz_target!(|data: &[u8]| {
  check::<Sha224, sha2::Sha224>(data);
  check::<Sha256, sha2::Sha256>(data);
  check::<Sha384, sha2::Sha384>(data);
  check::<Sha512, sha2::Sha512>(data);
  check::<Sha512_224, sha2::Sha512_224>(data);
  check::<Sha512_256, sha2::Sha512_256>(data);
});
