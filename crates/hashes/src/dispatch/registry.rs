//! Provider registry and the process-wide instance.

use alloc::{boxed::Box, vec::Vec};

use thiserror::Error;
use traits::DynDigest;

use super::{Algorithm, Descriptor, DispatchConfig, DispatchForce, PortableProvider, Provider, ProviderError};

/// Native provider plus the algorithm list captured when it was installed.
struct NativeSlot {
  provider: Box<dyn Provider>,
  supported: Vec<Algorithm>,
}

/// Native-preferred, portable-fallback hasher factory.
///
/// ```
/// use hashes::dispatch::{Algorithm, Descriptor, Registry};
///
/// let registry = Registry::new();
/// let h = registry.create(&Descriptor::new(Algorithm::Blake3))?;
/// assert_eq!(h.algorithm_name(), "blake3");
/// # Ok::<(), hashes::dispatch::ProviderError>(())
/// ```
pub struct Registry {
  native: Option<NativeSlot>,
  portable: PortableProvider,
  config: DispatchConfig,
}

impl core::fmt::Debug for Registry {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Registry")
      .field("native", &self.native_name())
      .field("native_supported", &self.native_supported())
      .field("config", &self.config)
      .finish()
  }
}

impl Default for Registry {
  fn default() -> Self {
    Self::new()
  }
}

impl Registry {
  /// Portable-only registry using the environment configuration.
  #[must_use]
  pub fn new() -> Self {
    Self::with_config(DispatchConfig::from_env())
  }

  #[must_use]
  pub fn with_config(config: DispatchConfig) -> Self {
    Self {
      native: None,
      portable: PortableProvider,
      config,
    }
  }

  /// Attach a native provider, replacing any previous one.
  ///
  /// The provider's algorithm list is copied now and never re-read. A
  /// provider whose [`required_caps`](Provider::required_caps) are missing
  /// from [`platform::caps()`] is recorded as supporting nothing.
  #[must_use]
  pub fn with_native(mut self, provider: Box<dyn Provider>) -> Self {
    let caps = platform::caps();
    let required = provider.required_caps();
    let supported = if caps.has(required) {
      provider.supported().to_vec()
    } else {
      tracing::debug!(
        provider = provider.name(),
        required = %required,
        detected = %caps,
        "native provider disabled: missing CPU features"
      );
      Vec::new()
    };
    tracing::debug!(provider = provider.name(), algorithms = supported.len(), "installed native provider");
    self.native = Some(NativeSlot { provider, supported });
    self
  }

  #[must_use]
  pub fn config(&self) -> DispatchConfig {
    self.config
  }

  #[must_use]
  pub fn native_name(&self) -> Option<&'static str> {
    self.native.as_ref().map(|n| n.provider.name())
  }

  /// Algorithms the native provider was registered with.
  #[must_use]
  pub fn native_supported(&self) -> &[Algorithm] {
    match &self.native {
      Some(native) => &native.supported,
      None => &[],
    }
  }

  /// Build a hasher for `descriptor`.
  ///
  /// Under [`DispatchForce::Auto`] the native provider is tried first when
  /// it lists the algorithm; a decline falls back to the portable provider.
  ///
  /// # Errors
  ///
  /// - [`ProviderError::Construction`] for invalid parameters.
  /// - [`ProviderError::Native`] when the native backend fails outright.
  /// - [`ProviderError::Unsupported`] under [`DispatchForce::Native`] when the
  ///   native provider is absent or declines.
  pub fn create(&self, descriptor: &Descriptor) -> Result<Box<dyn DynDigest>, ProviderError> {
    let algorithm = descriptor.algorithm;

    if self.config.force != DispatchForce::Portable
      && let Some(native) = self.native.as_ref()
      && native.supported.contains(&algorithm)
    {
      match native.provider.instantiate(descriptor) {
        Ok(hasher) => {
          tracing::trace!(provider = native.provider.name(), %algorithm, "selected native provider");
          return Ok(hasher);
        }
        Err(ProviderError::Unsupported(_)) if self.config.force == DispatchForce::Auto => {
          tracing::debug!(
            provider = native.provider.name(),
            %algorithm,
            "native provider declined; using portable"
          );
        }
        Err(e) => return Err(e),
      }
    } else if self.config.force == DispatchForce::Native {
      return Err(ProviderError::Unsupported(algorithm));
    }

    tracing::trace!(provider = self.portable.name(), %algorithm, "selected portable provider");
    self.portable.instantiate(descriptor)
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Global registry
// ─────────────────────────────────────────────────────────────────────────────

/// The global registry was already in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum InstallError {
  #[error("dispatch registry already initialized")]
  AlreadyInitialized,
}

#[cfg(any(feature = "std", target_has_atomic = "ptr"))]
static GLOBAL: backend::OnceCache<Registry> = backend::OnceCache::new();

/// Install the process-wide native provider.
///
/// Must run before the first [`create`] or [`global`] call.
///
/// # Errors
///
/// [`InstallError::AlreadyInitialized`] once the global registry exists.
#[cfg(any(feature = "std", target_has_atomic = "ptr"))]
#[cold]
pub fn install_native_provider(provider: Box<dyn Provider>) -> Result<(), InstallError> {
  GLOBAL
    .set(Registry::new().with_native(provider))
    .map_err(|_| InstallError::AlreadyInitialized)
}

/// The process-wide registry, created on first use.
#[cfg(any(feature = "std", target_has_atomic = "ptr"))]
#[must_use]
pub fn global() -> &'static Registry {
  GLOBAL.get_or_init(Registry::new)
}

/// Build a hasher through the global registry.
///
/// # Errors
///
/// See [`Registry::create`].
#[cfg(any(feature = "std", target_has_atomic = "ptr"))]
pub fn create(descriptor: &Descriptor) -> Result<Box<dyn DynDigest>, ProviderError> {
  global().create(descriptor)
}

#[cfg(test)]
mod tests {
  extern crate std;

  use alloc::{boxed::Box, vec, vec::Vec};
  use core::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::{Arc, Mutex};

  use platform::Caps;
  use traits::{Digest, DynDigest};

  use super::*;
  use crate::{crypto::Sha256, native::{NativeDigest, mock::MockBackend}};

  /// SHA-256 through the mock native API; declines keyed descriptors.
  struct MockNative {
    supported: Arc<Mutex<Vec<Algorithm>>>,
    calls: Arc<AtomicUsize>,
    caps: Caps,
  }

  impl MockNative {
    fn new(supported: &[Algorithm]) -> Self {
      Self {
        supported: Arc::new(Mutex::new(supported.to_vec())),
        calls: Arc::new(AtomicUsize::new(0)),
        caps: Caps::NONE,
      }
    }
  }

  impl Provider for MockNative {
    fn name(&self) -> &'static str {
      "mock-native"
    }

    fn supported(&self) -> &[Algorithm] {
      // Leaks a snapshot so the live list can change under the registry.
      let list = self.supported.lock().unwrap().clone();
      Box::leak(list.into_boxed_slice())
    }

    fn required_caps(&self) -> Caps {
      self.caps
    }

    fn instantiate(&self, d: &Descriptor) -> Result<Box<dyn DynDigest>, ProviderError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      if d.algorithm != Algorithm::Sha256 || d.key.is_some() {
        return Err(ProviderError::Unsupported(d.algorithm));
      }
      Ok(Box::new(NativeDigest::new(MockBackend::default())?))
    }
  }

  fn auto() -> DispatchConfig {
    DispatchConfig {
      force: DispatchForce::Auto,
    }
  }

  #[test]
  fn native_provider_is_preferred() {
    let native = MockNative::new(&[Algorithm::Sha256]);
    let calls = native.calls.clone();
    let registry = Registry::with_config(auto()).with_native(Box::new(native));

    let mut h = registry.create(&Descriptor::new(Algorithm::Sha256)).unwrap();
    assert_eq!(h.algorithm_name(), "mock-sha256");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    h.update(b"abc");
    assert_eq!(&*h.finalize_boxed(), &Sha256::digest(b"abc")[..]);
  }

  #[test]
  fn declined_descriptor_falls_back_to_portable() {
    let native = MockNative::new(&[Algorithm::Sha256]);
    let calls = native.calls.clone();
    let registry = Registry::with_config(auto()).with_native(Box::new(native));

    let h = registry.create(&Descriptor::new(Algorithm::Sha256).with_key(b"k")).unwrap();
    assert_eq!(h.algorithm_name(), "hmac");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Not listed: the native provider is never asked.
    let h = registry.create(&Descriptor::new(Algorithm::Blake3)).unwrap();
    assert_eq!(h.algorithm_name(), "blake3");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn supported_list_is_snapshotted_at_install() {
    let native = MockNative::new(&[Algorithm::Sha256]);
    let live = native.supported.clone();
    let registry = Registry::with_config(auto()).with_native(Box::new(native));

    live.lock().unwrap().clear();
    assert_eq!(registry.native_supported(), &[Algorithm::Sha256]);
    let h = registry.create(&Descriptor::new(Algorithm::Sha256)).unwrap();
    assert_eq!(h.algorithm_name(), "mock-sha256");
  }

  #[test]
  fn missing_caps_disable_native_provider() {
    let mut native = MockNative::new(&[Algorithm::Sha256]);
    // A bit no real CPU reports.
    native.caps = Caps::bit(63);
    let registry = Registry::with_config(auto()).with_native(Box::new(native));
    assert!(registry.native_supported().is_empty());
    let h = registry.create(&Descriptor::new(Algorithm::Sha256)).unwrap();
    assert_eq!(h.algorithm_name(), "sha256");
  }

  #[test]
  fn force_portable_skips_native() {
    let native = MockNative::new(&[Algorithm::Sha256]);
    let calls = native.calls.clone();
    let registry = Registry::with_config(DispatchConfig {
      force: DispatchForce::Portable,
    })
    .with_native(Box::new(native));
    let h = registry.create(&Descriptor::new(Algorithm::Sha256)).unwrap();
    assert_eq!(h.algorithm_name(), "sha256");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn force_native_turns_decline_into_error() {
    let registry = Registry::with_config(DispatchConfig {
      force: DispatchForce::Native,
    })
    .with_native(Box::new(MockNative::new(&[Algorithm::Sha256])));

    assert!(registry.create(&Descriptor::new(Algorithm::Sha256)).is_ok());
    for d in [
      Descriptor::new(Algorithm::Sha256).with_key(b"k"),
      Descriptor::new(Algorithm::Blake3),
    ] {
      assert_eq!(
        registry.create(&d).map(|_| ()).unwrap_err(),
        ProviderError::Unsupported(d.algorithm)
      );
    }

    let bare = Registry::with_config(DispatchConfig {
      force: DispatchForce::Native,
    });
    assert_eq!(
      bare.create(&Descriptor::new(Algorithm::Sha1)).map(|_| ()).unwrap_err(),
      ProviderError::Unsupported(Algorithm::Sha1)
    );
  }

  #[test]
  fn portable_only_registry_builds_everything() {
    let registry = Registry::with_config(auto());
    assert_eq!(registry.native_name(), None);
    let names: Vec<&str> = [Algorithm::Sha1, Algorithm::Sha384, Algorithm::Sha512_224]
      .iter()
      .map(|a| registry.create(&Descriptor::new(*a)).unwrap().algorithm_name())
      .collect();
    assert_eq!(names, vec!["sha1", "sha384", "sha512/224"]);
  }
}
