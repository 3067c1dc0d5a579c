use std::{any::TypeId, error::Error, fmt, sync::Arc};

use crate::{probe, SharedError};

/// One or more errors, combined into a single error value.
///
/// A `CombinedError` is only produced by [`MultiError`] when it holds at least one error, so it
/// is never empty. It is immutable once produced; cloning it is cheap and shares the underlying
/// errors.
///
/// [`MultiError`]: crate::MultiError
///
/// # Description
///
/// With a single error, the [`Display`](fmt::Display) output is exactly that error's own
/// message. With more than one, it is the count followed by each message, joined with `"; "`:
///
/// ```
/// # use multierror::MultiError;
/// let errors: MultiError = vec![Some("test1"), Some("test1"), Some("test2"), None, Some("test3")]
///     .into_iter()
///     .collect();
///
/// let err = errors.finalize().unwrap_err();
/// assert_eq!(err.to_string(), "4 errors: test1; test1; test2; test3");
/// ```
///
/// # Inspection
///
/// [`find`](CombinedError::find) extracts the first contained error of a given type, and
/// [`is`](CombinedError::is) checks whether an error equal to a target is contained. Both also
/// look along each contained error's [`source`](Error::source) chain. The free functions
/// [`find`](crate::find) and [`is`](crate::is) do the same starting from any error, which lets
/// them see through context layers wrapped around a `CombinedError`.
#[derive(Debug, Clone, thiserror::Error)]
pub struct CombinedError {
    errors: Vec<SharedError>,
}

impl CombinedError {
    pub(crate) fn new(errors: Vec<SharedError>) -> Self {
        debug_assert!(!errors.is_empty(), "combined error must hold at least one error");
        CombinedError { errors }
    }

    /// The contained errors, in the order they were added.
    #[must_use]
    pub fn errors(&self) -> &[SharedError] {
        &self.errors
    }

    /// Iterates over the contained errors, in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &SharedError> {
        self.errors.iter()
    }

    /// Consumes this `CombinedError`, returning the contained errors.
    #[must_use]
    pub fn into_errors(self) -> Vec<SharedError> {
        self.errors
    }

    /// Finds the first contained error of type `T`.
    ///
    /// Each contained error is checked in order, along with its chain of sources. A
    /// `CombinedError` found on one of those chains is searched in the same way.
    ///
    /// ```
    /// # use multierror::MultiError;
    /// # use std::num::ParseIntError;
    /// # use std::str::Utf8Error;
    /// let mut errors = MultiError::new();
    /// errors.push_error("not a number");
    /// errors.add_result("x".parse::<i64>());
    ///
    /// let err = errors.finalize().unwrap_err();
    /// assert!(err.find::<ParseIntError>().is_some());
    /// assert!(err.find::<Utf8Error>().is_none());
    /// ```
    #[must_use]
    pub fn find<T: Error + 'static>(&self) -> Option<&T> {
        self.errors
            .iter()
            .find_map(|error| probe::find::<T>(&**error))
    }

    /// Returns `true` if any contained error is of type `T`.
    ///
    /// Boolean form of [`find`](CombinedError::find).
    #[must_use]
    pub fn contains_type<T: Error + 'static>(&self) -> bool {
        self.find::<T>().is_some()
    }

    /// Returns `true` if any contained error is equal to `target`.
    ///
    /// Contained errors and their chains of sources are searched as with
    /// [`find`](CombinedError::find). A `target` which is itself a `CombinedError` always matches,
    /// whatever it contains.
    ///
    /// ```
    /// # use multierror::MultiError;
    /// #[derive(Debug, PartialEq, thiserror::Error)]
    /// #[error("disk full")]
    /// struct DiskFull;
    ///
    /// #[derive(Debug, PartialEq, thiserror::Error)]
    /// #[error("timed out")]
    /// struct TimedOut;
    ///
    /// let mut errors = MultiError::new();
    /// errors.push_error(DiskFull);
    /// let err = errors.finalize().unwrap_err();
    ///
    /// assert!(err.is(&DiskFull));
    /// assert!(!err.is(&TimedOut));
    /// assert!(err.is(&err.clone()));
    /// ```
    #[must_use]
    pub fn is<T: Error + PartialEq + 'static>(&self, target: &T) -> bool {
        if TypeId::of::<T>() == TypeId::of::<CombinedError>() {
            return true;
        }

        self.errors.iter().any(|error| probe::is(&**error, target))
    }
}

impl fmt::Display for CombinedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.len() > 1 {
            write!(f, "{} errors: ", self.errors.len())?;
        }

        for (i, error) in self.errors.iter().enumerate() {
            if i != 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }

        Ok(())
    }
}

impl PartialEq for CombinedError {
    /// Two combined errors are equal when they hold the same error values, in the same order.
    ///
    /// Contained errors are compared by identity, since they are opaque. Two snapshots taken from
    /// the same [`MultiError`](crate::MultiError) without adding in between are equal.
    fn eq(&self, other: &Self) -> bool {
        self.errors.len() == other.errors.len()
            && self
                .errors
                .iter()
                .zip(&other.errors)
                .all(|(a, b)| Arc::ptr_eq(a, b))
    }
}

impl<'a> IntoIterator for &'a CombinedError {
    type Item = &'a SharedError;
    type IntoIter = std::slice::Iter<'a, SharedError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl IntoIterator for CombinedError {
    type Item = SharedError;
    type IntoIter = std::vec::IntoIter<SharedError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
