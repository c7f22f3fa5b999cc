//! Higher-kinded `Maybe<T>` abstraction for zero-cost witness handling.
//!
//! Traditional SNARK toolkits use `Option<T>` for witness values, which
//! costs a discriminant, a branch at every use and an error path that is
//! never taken during synthesis. `Maybe<T>` instead resolves at compile time
//! to one of two concrete types chosen by the synthesis driver:
//!
//! - `Always<T>`: transparently wraps `T`, guaranteed to contain a value
//! - `Empty<T>`: zero-sized, never contains a value
//!
//! Closures handed to `just`/`with`/`map` on an `Empty` are never invoked,
//! so witness computation disappears entirely from shape-only synthesis.
//!
//! ```rust,ignore
//! let value: Always<u64> = Always(7);
//! assert_eq!(value.map(|v| v * 2).take(), 14);
//!
//! let nothing: Empty<u64> = Empty::new();
//! let _ = nothing.map(|_| unreachable!());
//! ```

use crate::error::Error;

/// Kind marker for `Maybe<T>` types.
///
/// Emulates higher-kinded types by allowing the inner type to be rebound
/// while keeping the "always" or "empty" nature of the container.
pub trait MaybeKind: Copy + Clone {
    /// Rebind this kind to wrap a different type.
    type Rebind<T>: Maybe<T, Kind = Self>;

    /// Whether this kind always contains a value.
    const HAS_VALUE: bool;
}

/// Option-like operations with compile-time variant selection.
pub trait Maybe<T>: Sized {
    /// The kind of this Maybe (Always or Empty).
    type Kind: MaybeKind;

    /// Create a `Maybe<R>` by invoking the closure if the backing store is
    /// `Always`, or returning an empty `Maybe<R>` without calling it.
    fn just<R>(f: impl FnOnce() -> R) -> <Self::Kind as MaybeKind>::Rebind<R>;

    /// Like `just` but the closure may fail.
    fn with<R>(
        f: impl FnOnce() -> Result<R, Error>,
    ) -> Result<<Self::Kind as MaybeKind>::Rebind<R>, Error>;

    /// Extract the contained value.
    ///
    /// # Panics
    ///
    /// Panics on `Empty`. Only call this inside closures that the driver
    /// evaluates when it carries a witness.
    fn take(self) -> T;

    /// Map a function over the contained value.
    fn map<U, F>(self, f: F) -> <Self::Kind as MaybeKind>::Rebind<U>
    where
        F: FnOnce(T) -> U;

    /// Get a mutable view to the contained value.
    fn view_mut(&mut self) -> <Self::Kind as MaybeKind>::Rebind<&mut T>;

    /// Reference to the contained value.
    ///
    /// # Panics
    ///
    /// Panics on `Empty`, see [`Maybe::take`].
    fn snag(&self) -> &T;
}

// =============================================================================
// Always<T> - Contains a value
// =============================================================================

/// A `Maybe<T>` that always contains a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Always<T>(pub T);

/// Kind marker for `Always<T>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AlwaysKind;

impl MaybeKind for AlwaysKind {
    type Rebind<T> = Always<T>;
    const HAS_VALUE: bool = true;
}

impl<T> Maybe<T> for Always<T> {
    type Kind = AlwaysKind;

    #[inline(always)]
    fn just<R>(f: impl FnOnce() -> R) -> Always<R> {
        Always(f())
    }

    #[inline(always)]
    fn with<R>(f: impl FnOnce() -> Result<R, Error>) -> Result<Always<R>, Error> {
        f().map(Always)
    }

    #[inline(always)]
    fn take(self) -> T {
        self.0
    }

    #[inline(always)]
    fn map<U, F>(self, f: F) -> Always<U>
    where
        F: FnOnce(T) -> U,
    {
        Always(f(self.0))
    }

    #[inline(always)]
    fn view_mut(&mut self) -> Always<&mut T> {
        Always(&mut self.0)
    }

    #[inline(always)]
    fn snag(&self) -> &T {
        &self.0
    }
}

// =============================================================================
// Empty - Never contains a value
// =============================================================================

/// A `Maybe<T>` that never contains a value.
///
/// Generic over `T` only for type system compatibility; it is zero-sized.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Empty<T>(core::marker::PhantomData<T>);

impl<T> Clone for Empty<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Empty<T> {}

impl<T> Default for Empty<T> {
    fn default() -> Self {
        Empty::new()
    }
}

/// Kind marker for `Empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EmptyKind;

impl MaybeKind for EmptyKind {
    type Rebind<T> = Empty<T>;
    const HAS_VALUE: bool = false;
}

impl<T> Empty<T> {
    /// Create a new empty value.
    #[inline(always)]
    pub const fn new() -> Self {
        Empty(core::marker::PhantomData)
    }
}

impl<T> Maybe<T> for Empty<T> {
    type Kind = EmptyKind;

    #[inline(always)]
    fn just<R>(_f: impl FnOnce() -> R) -> Empty<R> {
        Empty::new()
    }

    #[inline(always)]
    fn with<R>(_f: impl FnOnce() -> Result<R, Error>) -> Result<Empty<R>, Error> {
        Ok(Empty::new())
    }

    #[inline(always)]
    fn take(self) -> T {
        unreachable!("Empty::take() called during shape-only synthesis")
    }

    #[inline(always)]
    fn map<U, F>(self, _f: F) -> Empty<U>
    where
        F: FnOnce(T) -> U,
    {
        Empty::new()
    }

    #[inline(always)]
    fn view_mut(&mut self) -> Empty<&mut T> {
        Empty::new()
    }

    #[inline(always)]
    fn snag(&self) -> &T {
        unreachable!("Empty::snag() called during shape-only synthesis")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_is_transparent() {
        assert_eq!(core::mem::size_of::<Always<u64>>(), core::mem::size_of::<u64>());
    }

    #[test]
    fn empty_is_zst() {
        assert_eq!(core::mem::size_of::<Empty<u64>>(), 0);
        assert_eq!(core::mem::size_of::<Empty<[u8; 1024]>>(), 0);
    }

    #[test]
    fn always_operations() {
        let b: Always<i32> = <Always<()> as Maybe<()>>::just(|| 10 + 20);
        assert_eq!(b.take(), 30);

        let c = Always(5).map(|x| x * 2);
        assert_eq!(c.take(), 10);

        let mut d = Always(vec![1u8]);
        d.view_mut().take().push(2);
        assert_eq!(d.snag(), &[1, 2]);
    }

    #[test]
    fn empty_never_runs_closures() {
        let _: Empty<i32> = <Empty<()> as Maybe<()>>::just(|| panic!("should not be called"));
        let _: Empty<i32> = Empty::<i32>::new().map(|_: i32| panic!("should not be called"));
        let r: Result<Empty<i32>, Error> =
            <Empty<()> as Maybe<()>>::with(|| panic!("should not be called"));
        assert!(r.is_ok());
    }
}
