//! Lazy one-time initialization for process-wide, read-only state.
//!
//! [`OnceCache`] has the semantics of `std::sync::OnceLock` but also works on
//! `no_std` targets:
//!
//! - **std**: `OnceLock`
//! - **no_std with atomics**: atomic state machine with a spin-wait while
//!   another thread initializes
//! - **no_std without atomics**: per-call computation (single-threaded targets)
//!
//! The dispatch registry and the capability snapshot live in these caches:
//! written once at first use, immutable afterwards.

#[cfg(all(not(feature = "std"), target_has_atomic = "ptr"))]
use core::cell::UnsafeCell;
#[cfg(all(not(feature = "std"), target_has_atomic = "ptr"))]
use core::mem::MaybeUninit;

/// A write-once cell initialized on first access.
pub struct OnceCache<T> {
  #[cfg(feature = "std")]
  inner: std::sync::OnceLock<T>,

  #[cfg(all(not(feature = "std"), target_has_atomic = "ptr"))]
  state: core::sync::atomic::AtomicU8,
  #[cfg(all(not(feature = "std"), target_has_atomic = "ptr"))]
  value: UnsafeCell<MaybeUninit<T>>,

  #[cfg(all(not(feature = "std"), not(target_has_atomic = "ptr")))]
  _marker: core::marker::PhantomData<*const T>,
}

// SAFETY: The cache is safe to share between threads because:
// - On std: OnceLock handles synchronization
// - On no_std with atomics: the value is written once, before READY is
//   published with Release ordering, and only read after an Acquire load
//   observes READY
// - On no_std without atomics: the target is single-threaded
#[allow(unsafe_code)]
unsafe impl<T: Send + Sync> Sync for OnceCache<T> {}
#[allow(unsafe_code)]
// SAFETY: see the `Sync` impl above.
unsafe impl<T: Send> Send for OnceCache<T> {}

impl<T> OnceCache<T> {
  #[cfg(all(not(feature = "std"), target_has_atomic = "ptr"))]
  const UNINIT: u8 = 0;
  #[cfg(all(not(feature = "std"), target_has_atomic = "ptr"))]
  const INITING: u8 = 1;
  #[cfg(all(not(feature = "std"), target_has_atomic = "ptr"))]
  const READY: u8 = 2;

  /// Create a new empty cache.
  #[must_use]
  pub const fn new() -> Self {
    Self {
      #[cfg(feature = "std")]
      inner: std::sync::OnceLock::new(),

      #[cfg(all(not(feature = "std"), target_has_atomic = "ptr"))]
      state: core::sync::atomic::AtomicU8::new(0),
      #[cfg(all(not(feature = "std"), target_has_atomic = "ptr"))]
      value: UnsafeCell::new(MaybeUninit::uninit()),

      #[cfg(all(not(feature = "std"), not(target_has_atomic = "ptr")))]
      _marker: core::marker::PhantomData,
    }
  }

  /// Get the cached value, if it has been initialized.
  #[inline]
  pub fn get(&self) -> Option<&T> {
    #[cfg(feature = "std")]
    {
      self.inner.get()
    }

    #[cfg(all(not(feature = "std"), target_has_atomic = "ptr"))]
    {
      use core::sync::atomic::Ordering;
      if self.state.load(Ordering::Acquire) == Self::READY {
        // SAFETY: Value is initialized when state is READY and never written again.
        #[allow(unsafe_code)]
        return Some(unsafe { (*self.value.get()).assume_init_ref() });
      }
      None
    }

    #[cfg(all(not(feature = "std"), not(target_has_atomic = "ptr")))]
    {
      None
    }
  }

  /// Store `value` if the cache is still empty.
  ///
  /// Returns `Err(value)` when the cache was already initialized (or is being
  /// initialized by another thread).
  #[inline]
  pub fn set(&self, value: T) -> Result<(), T> {
    #[cfg(feature = "std")]
    {
      self.inner.set(value)
    }

    #[cfg(all(not(feature = "std"), target_has_atomic = "ptr"))]
    {
      use core::sync::atomic::Ordering;
      if self
        .state
        .compare_exchange(Self::UNINIT, Self::INITING, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
      {
        return Err(value);
      }
      // SAFETY: We hold exclusive access during INITING state.
      #[allow(unsafe_code)]
      unsafe {
        (*self.value.get()).write(value);
      }
      self.state.store(Self::READY, Ordering::Release);
      Ok(())
    }

    #[cfg(all(not(feature = "std"), not(target_has_atomic = "ptr")))]
    {
      Err(value)
    }
  }

  /// Get a reference to the cached value, initializing with `f` if not yet set.
  ///
  /// The initializer runs at most once on targets with atomics.
  #[inline]
  #[cfg(any(feature = "std", target_has_atomic = "ptr"))]
  pub fn get_or_init(&self, f: impl FnOnce() -> T) -> &T {
    #[cfg(feature = "std")]
    {
      self.inner.get_or_init(f)
    }

    #[cfg(all(not(feature = "std"), target_has_atomic = "ptr"))]
    {
      use core::sync::atomic::Ordering;

      let state = self.state.load(Ordering::Acquire);
      if state == Self::UNINIT
        && self
          .state
          .compare_exchange(Self::UNINIT, Self::INITING, Ordering::AcqRel, Ordering::Acquire)
          .is_ok()
      {
        let value = f();
        // SAFETY: We hold exclusive access during INITING state.
        #[allow(unsafe_code)]
        unsafe {
          (*self.value.get()).write(value);
        }
        self.state.store(Self::READY, Ordering::Release);
      } else {
        // Another thread is initializing - spin wait.
        while self.state.load(Ordering::Acquire) != Self::READY {
          core::hint::spin_loop();
        }
      }

      // SAFETY: Value is initialized when state is READY.
      #[allow(unsafe_code)]
      unsafe {
        (*self.value.get()).assume_init_ref()
      }
    }
  }
}

impl<T: Copy> OnceCache<T> {
  /// Copying variant of [`OnceCache::get_or_init`].
  ///
  /// On targets without atomics this recomputes on every call.
  #[inline]
  pub fn get_or_init_copy(&self, f: impl FnOnce() -> T) -> T {
    #[cfg(any(feature = "std", target_has_atomic = "ptr"))]
    {
      *self.get_or_init(f)
    }

    #[cfg(all(not(feature = "std"), not(target_has_atomic = "ptr")))]
    {
      f()
    }
  }
}

impl<T> Default for OnceCache<T> {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn initializer_runs_once() {
    static CACHE: OnceCache<(u32, u64)> = OnceCache::new();

    let mut call_count = 0;
    let first = CACHE.get_or_init_copy(|| {
      call_count += 1;
      (42u32, 123u64)
    });
    assert_eq!(first, (42, 123));

    let second = CACHE.get_or_init_copy(|| {
      call_count += 1;
      (99u32, 999u64)
    });
    assert_eq!(second, (42, 123));

    #[cfg(any(feature = "std", target_has_atomic = "ptr"))]
    assert_eq!(call_count, 1);
  }

  #[cfg(any(feature = "std", target_has_atomic = "ptr"))]
  #[test]
  fn set_only_once() {
    let cache: OnceCache<u8> = OnceCache::new();
    assert!(cache.get().is_none());
    assert_eq!(cache.set(1), Ok(()));
    assert_eq!(cache.set(2), Err(2));
    assert_eq!(cache.get(), Some(&1));
    assert_eq!(*cache.get_or_init(|| 3), 1);
  }
}
