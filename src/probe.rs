//! Inspection of error chains which may contain [`CombinedError`]s.
//!
//! The standard library walks a single chain of errors through [`Error::source`]. A
//! [`CombinedError`] branches that chain, since it holds several errors at once. These functions
//! walk the chain like [`Error::source`] does, and when they reach a `CombinedError` they
//! continue into each of its errors in order.

use std::error::Error;

use crate::CombinedError;

/// Finds the first error of type `T` in the chain of `error`, including inside any
/// [`CombinedError`] on that chain.
///
/// This works through context layers which wrap a `CombinedError`, as long as they expose it as
/// their [`source`](Error::source):
///
/// ```
/// # use multierror::MultiError;
/// # use std::num::ParseIntError;
/// #[derive(Debug, thiserror::Error)]
/// #[error("could not load settings")]
/// struct LoadError(#[source] multierror::CombinedError);
///
/// let mut errors = MultiError::new();
/// errors.add_result("port".parse::<u16>());
/// let err = LoadError(errors.finalize().unwrap_err());
///
/// assert!(multierror::find::<ParseIntError>(&err).is_some());
/// assert!(multierror::find::<std::fmt::Error>(&err).is_none());
/// ```
#[must_use]
pub fn find<'a, T: Error + 'static>(error: &'a (dyn Error + 'static)) -> Option<&'a T> {
    let mut next = Some(error);
    while let Some(link) = next {
        if let Some(found) = link.downcast_ref::<T>() {
            return Some(found);
        }
        if let Some(combined) = link.downcast_ref::<CombinedError>() {
            return combined.find::<T>();
        }
        next = link.source();
    }
    None
}

/// Returns `true` if an error equal to `target` is in the chain of `error`, including inside any
/// [`CombinedError`] on that chain.
///
/// A `target` which is itself a `CombinedError` matches any `CombinedError` on the chain. See
/// [`CombinedError::is`].
///
/// ```
/// # use multierror::{CombinedError, MultiError};
/// #[derive(Debug, PartialEq, thiserror::Error)]
/// #[error("permission denied: {0}")]
/// struct Denied(&'static str);
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("could not clean up")]
/// struct CleanupError(#[source] CombinedError);
///
/// let mut errors = MultiError::new();
/// errors.push_error("busy");
/// errors.push_error(Denied("/tmp/lock"));
/// let err = CleanupError(errors.finalize().unwrap_err());
///
/// assert!(multierror::is(&err, &Denied("/tmp/lock")));
/// assert!(!multierror::is(&err, &Denied("/var/run")));
/// assert!(multierror::is(&err, &err.0.clone()));
/// ```
#[must_use]
pub fn is<T: Error + PartialEq + 'static>(error: &(dyn Error + 'static), target: &T) -> bool {
    let mut next = Some(error);
    while let Some(link) = next {
        if let Some(combined) = link.downcast_ref::<CombinedError>() {
            return combined.is(target);
        }
        if link.downcast_ref::<T>().is_some_and(|candidate| candidate == target) {
            return true;
        }
        next = link.source();
    }
    false
}
