//! Dispatch runtime configuration.
//!
//! `OMNIHASH_DISPATCH_FORCE` (`auto`, `portable`, `native`) pins provider
//! selection for the whole process. It is read once, on first use of the
//! global registry; a [`DispatchConfig`] passed to
//! [`Registry::with_config`](super::Registry::with_config) overrides it.

/// Forced provider selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DispatchForce {
  /// Native provider first, portable on decline.
  #[default]
  Auto,
  /// Never consult the native provider.
  Portable,
  /// Native provider only; a decline is an error.
  Native,
}

impl DispatchForce {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Auto => "auto",
      Self::Portable => "portable",
      Self::Native => "native",
    }
  }

  /// Parse a force value. Unknown or empty strings give `None`.
  #[must_use]
  pub fn parse(value: &str) -> Option<Self> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("auto") {
      return Some(Self::Auto);
    }
    if value.eq_ignore_ascii_case("portable") || value.eq_ignore_ascii_case("scalar") {
      return Some(Self::Portable);
    }
    if value.eq_ignore_ascii_case("native") || value.eq_ignore_ascii_case("hw") {
      return Some(Self::Native);
    }
    None
  }
}

/// Registry selection policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DispatchConfig {
  pub force: DispatchForce,
}

impl DispatchConfig {
  /// Configuration from the environment (`std`) or the default.
  #[must_use]
  pub fn from_env() -> Self {
    overrides()
  }
}

#[cfg(feature = "std")]
fn read_env_overrides() -> DispatchConfig {
  let force = std::env::var("OMNIHASH_DISPATCH_FORCE")
    .ok()
    .and_then(|v| {
      let parsed = DispatchForce::parse(&v);
      if parsed.is_none() && !v.trim().is_empty() {
        tracing::warn!(value = %v, "ignoring unrecognized OMNIHASH_DISPATCH_FORCE");
      }
      parsed
    })
    .unwrap_or_default();
  DispatchConfig { force }
}

#[cfg(feature = "std")]
fn overrides() -> DispatchConfig {
  use std::sync::OnceLock;
  static OVERRIDES: OnceLock<DispatchConfig> = OnceLock::new();
  *OVERRIDES.get_or_init(read_env_overrides)
}

#[cfg(not(feature = "std"))]
fn overrides() -> DispatchConfig {
  DispatchConfig::default()
}
