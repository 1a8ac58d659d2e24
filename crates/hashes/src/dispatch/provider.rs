//! Hash providers: sources of [`DynDigest`] instances.

use alloc::boxed::Box;

use platform::Caps;
use thiserror::Error;
use traits::{ConstructionError, Digest, DynDigest};

use super::{Algorithm, Descriptor};
use crate::{
  crypto::{Blake3, Blake3Sized, Sha1, Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256, Sha512Trunc},
  hmac::Hmac,
  native::NativeError,
};

/// Why a provider did not return a hasher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ProviderError {
  /// The provider declines this descriptor; another provider may accept it.
  #[error("{0} is not supported by this provider")]
  Unsupported(Algorithm),

  /// The descriptor's parameters are invalid for the algorithm.
  #[error(transparent)]
  Construction(#[from] ConstructionError),

  /// The native backend failed to set up a context.
  #[error(transparent)]
  Native(#[from] NativeError),
}

/// A source of hashers.
///
/// Returning [`ProviderError::Unsupported`] from `instantiate` is a decline:
/// the registry falls through to the next provider. Any other error is final.
pub trait Provider: Send + Sync {
  fn name(&self) -> &'static str;

  /// Algorithms this provider can build. Read once when the provider is
  /// installed.
  fn supported(&self) -> &[Algorithm];

  /// CPU features the provider needs. When [`platform::caps()`] lacks any of
  /// them the registry treats the provider as supporting nothing.
  fn required_caps(&self) -> Caps {
    Caps::NONE
  }

  fn instantiate(&self, descriptor: &Descriptor) -> Result<Box<dyn DynDigest>, ProviderError>;
}

/// The in-crate implementations. Supports every [`Algorithm`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PortableProvider;

/// Plain hasher, or HMAC when the descriptor carries a key.
fn plain_or_hmac<D: Digest + 'static>(descriptor: &Descriptor) -> Box<dyn DynDigest> {
  match &descriptor.key {
    Some(key) => Box::new(Hmac::<D>::new_from_slice(key)),
    None => Box::new(D::new()),
  }
}

impl Provider for PortableProvider {
  fn name(&self) -> &'static str {
    "portable"
  }

  fn supported(&self) -> &[Algorithm] {
    &Algorithm::ALL
  }

  fn instantiate(&self, d: &Descriptor) -> Result<Box<dyn DynDigest>, ProviderError> {
    d.validate()?;

    let hasher: Box<dyn DynDigest> = match d.algorithm {
      Algorithm::Blake3 => {
        let base = match (&d.key, &d.context) {
          (Some(key), _) => Blake3::new_keyed_from_slice(key)?,
          (None, Some(context)) => Blake3::new_derive_key(context),
          (None, None) => Blake3::new(),
        };
        match d.output_len {
          Some(len) if len != Blake3::OUTPUT_SIZE => Box::new(Blake3Sized::from_hasher(base, len)?),
          _ => Box::new(base),
        }
      }
      Algorithm::Sha1 => plain_or_hmac::<Sha1>(d),
      Algorithm::Sha224 => plain_or_hmac::<Sha224>(d),
      Algorithm::Sha256 => plain_or_hmac::<Sha256>(d),
      Algorithm::Sha384 => plain_or_hmac::<Sha384>(d),
      Algorithm::Sha512 => plain_or_hmac::<Sha512>(d),
      Algorithm::Sha512_224 => plain_or_hmac::<Sha512_224>(d),
      Algorithm::Sha512_256 => plain_or_hmac::<Sha512_256>(d),
      Algorithm::Sha512Trunc => {
        let bits = d.output_len.unwrap_or(0).saturating_mul(8);
        Box::new(Sha512Trunc::new(bits)?)
      }
    };
    Ok(hasher)
  }
}

#[cfg(test)]
mod tests {
  use traits::ConstructionError;

  use super::*;

  fn run(d: &Descriptor, data: &[u8]) -> alloc::vec::Vec<u8> {
    let mut h = PortableProvider.instantiate(d).unwrap();
    h.update(data);
    h.finalize_boxed().into_vec()
  }

  #[test]
  fn builds_every_algorithm() {
    for a in Algorithm::ALL {
      let d = match a {
        Algorithm::Sha512Trunc => Descriptor::new(a).with_output_len(20),
        _ => Descriptor::new(a),
      };
      let h = PortableProvider.instantiate(&d).unwrap();
      assert_eq!(Some(h.output_len()), a.output_len().or(Some(20)), "{a}");
    }
  }

  #[test]
  fn key_on_sha_selects_hmac() {
    let d = Descriptor::new(Algorithm::Sha256).with_key(b"Jefe");
    assert_eq!(
      hex::encode(run(&d, b"what do ya want for nothing?")),
      "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
    );
  }

  #[test]
  fn blake3_modes() {
    let key = *b"whats the Elvish word for friend";
    let keyed = Descriptor::new(Algorithm::Blake3).with_key(&key);
    assert_eq!(run(&keyed, b"abc"), Blake3::keyed_digest(&key, b"abc"));

    let derive = Descriptor::new(Algorithm::Blake3).with_context("ctx");
    assert_eq!(run(&derive, b"material"), Blake3::derive_key("ctx", b"material"));

    let long = Descriptor::new(Algorithm::Blake3).with_output_len(40);
    let out = run(&long, b"abc");
    assert_eq!(out.len(), 40);
    assert_eq!(out[..32], Blake3::digest(b"abc"));
  }

  #[test]
  fn invalid_parameters_are_construction_errors() {
    let err = PortableProvider
      .instantiate(&Descriptor::new(Algorithm::Sha512Trunc).with_output_len(48))
      .map(|_| ())
      .unwrap_err();
    assert_eq!(err, ProviderError::Construction(ConstructionError::UnsupportedOutputBits(384)));
  }
}
