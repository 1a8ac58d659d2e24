//! Owned wrapper around externally provided hash contexts.
//!
//! Platform crypto libraries hand out opaque context handles that must be
//! created, duplicated and released through their own API. A
//! [`NativeBackend`] describes that API; [`NativeContext`] owns exactly one
//! live handle and releases it on drop, and [`NativeDigest`] exposes the
//! context as a [`DynDigest`](traits::DynDigest) so dispatch can hand it out
//! alongside the portable implementations.

use thiserror::Error;
use traits::{BlockLen, DigestError, error::check_output_window};

/// Failure reported by a native backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum NativeError {
  /// The backend could not allocate a new context.
  #[error("native context creation failed: {0}")]
  Create(&'static str),

  /// The backend could not copy an existing context.
  #[error("native context duplication failed: {0}")]
  Duplicate(&'static str),

  /// The backend is not usable on this machine.
  #[error("native backend unavailable")]
  Unavailable,
}

/// Operations an external hash implementation must provide.
///
/// Every handle returned by `create` or `duplicate` is passed to `release`
/// exactly once.
pub trait NativeBackend {
  /// Opaque per-context handle.
  type Handle;

  /// Allocate a context in the initial state.
  fn create(&self) -> Result<Self::Handle, NativeError>;

  /// Allocate an independent copy of `handle`.
  fn duplicate(&self, handle: &Self::Handle) -> Result<Self::Handle, NativeError>;

  fn update(&self, handle: &mut Self::Handle, data: &[u8]);

  /// Write [`output_len`](Self::output_len) bytes into `out` and return the
  /// context to its initial state.
  fn finish(&self, handle: &mut Self::Handle, out: &mut [u8]);

  /// Return the context to its initial state without producing output.
  fn reset(&self, handle: &mut Self::Handle);

  /// Free the context.
  fn release(&self, handle: Self::Handle);

  fn output_len(&self) -> usize;

  fn block_len(&self) -> BlockLen;

  fn name(&self) -> &'static str;
}

/// Owner of one live native handle.
pub struct NativeContext<B: NativeBackend> {
  backend: B,
  handle: Option<B::Handle>,
}

impl<B: NativeBackend> core::fmt::Debug for NativeContext<B> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("NativeContext")
      .field("backend", &self.backend.name())
      .field("live", &self.handle.is_some())
      .finish()
  }
}

impl<B: NativeBackend> NativeContext<B> {
  /// Create a fresh context.
  ///
  /// # Errors
  ///
  /// Whatever the backend reports from `create`.
  pub fn new(backend: B) -> Result<Self, NativeError> {
    let handle = backend.create()?;
    Ok(Self {
      backend,
      handle: Some(handle),
    })
  }

  /// Duplicate into an independent context with its own handle.
  ///
  /// # Errors
  ///
  /// Whatever the backend reports from `duplicate`. `self` is unaffected.
  pub fn try_clone(&self) -> Result<Self, NativeError>
  where
    B: Clone,
  {
    let Some(handle) = self.handle.as_ref() else {
      return Err(NativeError::Duplicate("context already released"));
    };
    let copy = self.backend.duplicate(handle)?;
    Ok(Self {
      backend: self.backend.clone(),
      handle: Some(copy),
    })
  }

  #[inline]
  pub fn backend(&self) -> &B {
    &self.backend
  }

  #[inline]
  pub fn update(&mut self, data: &[u8]) {
    if let Some(h) = self.handle.as_mut() {
      self.backend.update(h, data);
    }
  }

  #[inline]
  fn finish(&mut self, out: &mut [u8]) {
    if let Some(h) = self.handle.as_mut() {
      self.backend.finish(h, out);
    }
  }

  #[inline]
  fn reset(&mut self) {
    if let Some(h) = self.handle.as_mut() {
      self.backend.reset(h);
    }
  }
}

impl<B: NativeBackend> Drop for NativeContext<B> {
  fn drop(&mut self) {
    if let Some(handle) = self.handle.take() {
      self.backend.release(handle);
    }
  }
}

/// A [`NativeContext`] behind the object-safe digest interface.
#[derive(Debug)]
pub struct NativeDigest<B: NativeBackend> {
  ctx: NativeContext<B>,
}

impl<B: NativeBackend> NativeDigest<B> {
  /// # Errors
  ///
  /// Whatever the backend reports from `create`.
  pub fn new(backend: B) -> Result<Self, NativeError> {
    Ok(Self {
      ctx: NativeContext::new(backend)?,
    })
  }

  /// # Errors
  ///
  /// Whatever the backend reports from `duplicate`.
  pub fn try_clone(&self) -> Result<Self, NativeError>
  where
    B: Clone,
  {
    Ok(Self {
      ctx: self.ctx.try_clone()?,
    })
  }
}

impl<B> traits::DynDigest for NativeDigest<B>
where
  B: NativeBackend + Clone + 'static,
  B::Handle: 'static,
{
  #[inline]
  fn update(&mut self, data: &[u8]) {
    self.ctx.update(data);
  }

  fn finalize_into(&mut self, out: &mut [u8], offset: usize, len: usize) -> Result<usize, DigestError> {
    let required = self.ctx.backend().output_len();
    check_output_window(out.len(), offset, len, required)?;
    let Some(dst) = out.get_mut(offset..).and_then(|rest| rest.get_mut(..required)) else {
      return Err(DigestError::insufficient(required, out.len().saturating_sub(offset)));
    };
    self.ctx.finish(dst);
    Ok(required)
  }

  #[inline]
  fn reset(&mut self) {
    self.ctx.reset();
  }

  /// # Panics
  ///
  /// If the backend fails to duplicate the context. Use
  /// [`NativeDigest::try_clone`] to handle that case.
  #[cfg(feature = "alloc")]
  fn box_clone(&self) -> alloc::boxed::Box<dyn traits::DynDigest> {
    match self.try_clone() {
      Ok(copy) => alloc::boxed::Box::new(copy),
      Err(e) => panic!("{} box_clone: {e}", self.ctx.backend().name()),
    }
  }

  #[inline]
  fn output_len(&self) -> usize {
    self.ctx.backend().output_len()
  }

  #[inline]
  fn block_len(&self) -> BlockLen {
    self.ctx.backend().block_len()
  }

  #[inline]
  fn algorithm_name(&self) -> &'static str {
    self.ctx.backend().name()
  }
}
