//! Published known-answer vectors (FIPS 180-4 examples, BLAKE3 test vectors).

use hashes::crypto::{Blake3, Sha1, Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256};
use traits::{Digest, Xof as _};

const TWO_BLOCK: &[u8] = b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq";
const FOUR_BLOCK: &[u8] = b"abcdefghbcdefghicdefghijdefghijkefghijklfghijklmghijklmnhijklmnoijklmnopjklmnopqklmnopqrlmnopqrsmnopqrstnopqrstu";

fn check<D: Digest>(input: &[u8], expected: &str) {
  assert_eq!(hex::encode(D::digest(input)), expected, "{} of {} bytes", D::NAME, input.len());
}

#[test]
fn sha1_vectors() {
  check::<Sha1>(b"abc", "a9993e364706816aba3e25717850c26c9cd0d89d");
  check::<Sha1>(TWO_BLOCK, "84983e441c3bd26ebaae4aa1f95129e5e54670f1");
}

#[test]
fn sha256_family_vectors() {
  check::<Sha256>(b"abc", "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
  check::<Sha256>(TWO_BLOCK, "248d6a61d20638b8e5c026930c3e6039a33ce45964ff2167f6ecedd419db06c1");
  check::<Sha224>(b"abc", "23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7");
  check::<Sha224>(TWO_BLOCK, "75388b16512776cc5dba5da1fd890150b0c6455cb4f58b1952522525");
}

#[test]
fn sha512_family_vectors() {
  check::<Sha512>(
    b"abc",
    "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f",
  );
  check::<Sha512>(
    FOUR_BLOCK,
    "8e959b75dae313da8cf4f72814fc143f8f7779c6eb9f7fa17299aeadb6889018501d289e4900f7e4331b99dec4b5433ac7d329eeb6dd26545e96e55b874be909",
  );
  check::<Sha384>(
    b"abc",
    "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed8086072ba1e7cc2358baeca134c825a7",
  );
  check::<Sha384>(
    FOUR_BLOCK,
    "09330c33f71147e83d192fc782cd1b4753111b173b3b05d22fa08086e3b0f712fcc7c71a557e2db966c3e9fa91746039",
  );
  check::<Sha512_224>(b"abc", "4634270f707b6a54daae7530460842e20e37ed265ceee9a43e8924aa");
  check::<Sha512_256>(b"abc", "53048e2681941ef99b2e29b76b4c7dabe4c2d0c634fc6d46e0e2f13107e7af23");
}

#[test]
fn empty_input_vectors() {
  check::<Sha1>(b"", "da39a3ee5e6b4b0d3255bfef95601890afd80709");
  check::<Sha224>(b"", "d14a028c2a3a2bc9476102bb288234c415a2b01f828ea62ac5b3e42f");
  check::<Sha256>(b"", "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
  check::<Sha512_224>(b"", "6ed0dd02806fa89e25de060c19d3ac86cabb87d6a0ddd05c333b84f4");
  check::<Sha512_256>(b"", "c672b8d1ef56ed28ab87c3622c5114069bdd3ad7b8f9737498d0c01ecef0967a");
  check::<Blake3>(b"", "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262");
}

#[test]
fn blake3_keyed_and_derive_empty() {
  let key = b"whats the Elvish word for friend";
  assert_eq!(
    hex::encode(Blake3::keyed_digest(key, b"")),
    "92b2b75604ed3c761f9d6f62392c8a9227ad0ea3f09573e783f1498a4ed60d26"
  );
  assert_eq!(
    hex::encode(Blake3::derive_key("BLAKE3 2019-12-27 16:29:52 test vectors context", b"")),
    "2cc39783c223154fea8dfb7c1b1660f2ac2dcbd1c1de8277b0b0dd39b7e50d7d"
  );
}

#[test]
fn blake3_empty_xof_prefix() {
  let mut out = [0u8; 131];
  Blake3::xof(b"").squeeze(&mut out);
  assert_eq!(
    hex::encode(out),
    "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262e00f03e7b69af26b7faaf09fcd333050338ddfe085b8cc869ca98b206c08243a26f5487789e8f660afe6c99ef9e0c52b92e7393024a80459cf91f476f9ffdbda7001c22e159b402631f277ca96f2defdf1078282314e763699a31c5363165421cce14d"
  );
}

#[test]
fn sha256_million_a() {
  let mut h = Sha256::new();
  let chunk = [b'a'; 1000];
  for _ in 0..1000 {
    h.update(&chunk);
  }
  assert_eq!(
    hex::encode(h.finalize()),
    "cdc76e5c9914fb9281a1c7e284d73e67f1809a48a497200e046d39ccc7112cd0"
  );
}
