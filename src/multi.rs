use crate::{BoxError, CombinedError, ErrorCollector, SharedError};

/// Accumulates errors produced while performing a batch of operations, so that they can be
/// returned as a single [`CombinedError`].
///
/// Absent errors are skipped, so the results of fallible operations can be fed in as they come
/// without checking them first. If nothing was accumulated, [`finalize`] returns `Ok(())`, which
/// makes the aggregator transparent to callers that only check whether an error occurred.
///
/// [`finalize`]: MultiError::finalize
///
/// ```
/// # use multierror::MultiError;
/// let mut errors = MultiError::new();
/// for input in ["1", "two", "3", "four"] {
///     errors.add_result(input.parse::<u32>());
/// }
///
/// let err = errors.finalize().unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "2 errors: invalid digit found in string; invalid digit found in string",
/// );
/// ```
///
/// If another [`CombinedError`] is added, its errors are spliced in individually, so combined
/// errors never nest:
///
/// ```
/// # use multierror::MultiError;
/// let mut inner = MultiError::new();
/// inner.push_error("a");
/// inner.push_error("b");
///
/// let mut outer = MultiError::new();
/// outer.push_error(inner.finalize().unwrap_err());
/// outer.push_error("c");
///
/// assert_eq!(outer.len(), 3);
/// assert_eq!(outer.finalize().unwrap_err().to_string(), "3 errors: a; b; c");
/// ```
///
/// `MultiError` has no internal locking. Wrap it in a [`Mutex`](std::sync::Mutex) to accumulate
/// from several threads.
#[derive(Debug, Clone, Default)]
pub struct MultiError {
    errors: Vec<SharedError>,
}

impl MultiError {
    /// Constructs a new `MultiError` without any errors.
    ///
    /// ```
    /// # use multierror::MultiError;
    /// let errors = MultiError::new();
    /// assert!(errors.is_empty());
    /// assert!(errors.finalize().is_ok());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        MultiError { errors: vec![] }
    }

    /// Adds an error which is known to be present.
    ///
    /// If `error` is a [`CombinedError`], each of its errors is added in order instead of the
    /// combined error itself.
    pub fn push_error<E: Into<BoxError>>(&mut self, error: E) {
        let error: BoxError = error.into();
        match error.downcast::<CombinedError>() {
            Ok(combined) => self.errors.extend((*combined).into_errors()),
            Err(error) => self.errors.push(SharedError::from(error)),
        }
    }

    /// Adds an error if there is one.
    ///
    /// ```
    /// # use multierror::MultiError;
    /// let mut errors = MultiError::new();
    /// errors.add(None::<&str>);
    /// assert!(errors.is_empty());
    ///
    /// errors.add(Some("oh no!"));
    /// assert_eq!(errors.len(), 1);
    /// ```
    pub fn add<E: Into<BoxError>>(&mut self, error: Option<E>) {
        ErrorCollector::add(self, error);
    }

    /// Adds the error from a [`Result`], if it is an [`Err`], and returns the success value
    /// otherwise.
    ///
    /// ```
    /// # use multierror::MultiError;
    /// let mut errors = MultiError::new();
    /// let a = errors.add_result("12".parse::<u8>());
    /// let b = errors.add_result("300".parse::<u8>());
    ///
    /// assert_eq!(a, Some(12));
    /// assert_eq!(b, None);
    /// assert_eq!(errors.len(), 1);
    /// ```
    pub fn add_result<T, E: Into<BoxError>>(&mut self, result: Result<T, E>) -> Option<T> {
        ErrorCollector::add_result(self, result)
    }

    /// Returns `true` if no errors have been accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The number of errors accumulated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterates over the errors accumulated so far, in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &SharedError> {
        self.errors.iter()
    }

    /// Produces the accumulated errors as a single error, or `Ok(())` if there are none.
    ///
    /// The returned [`CombinedError`] is a snapshot: errors added afterwards do not show up in it,
    /// and `finalize` can be called again to take a new one.
    ///
    /// ```
    /// # use multierror::MultiError;
    /// let mut errors = MultiError::new();
    /// errors.push_error("first");
    /// let snapshot = errors.finalize().unwrap_err();
    ///
    /// errors.push_error("second");
    /// assert_eq!(snapshot.to_string(), "first");
    /// assert_eq!(errors.finalize().unwrap_err().to_string(), "2 errors: first; second");
    /// ```
    pub fn finalize(&self) -> Result<(), CombinedError> {
        if self.errors.is_empty() {
            return Ok(());
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(count = self.errors.len(), "finalizing accumulated errors");

        Err(CombinedError::new(self.errors.clone()))
    }

    /// Consumes this `MultiError` and produces its errors as a single error, or `Ok(())` if there
    /// are none.
    ///
    /// Like [`finalize`](MultiError::finalize), without copying the list of errors.
    pub fn into_result(self) -> Result<(), CombinedError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CombinedError::new(self.errors))
        }
    }
}

impl ErrorCollector for MultiError {
    fn push_error(&mut self, error: BoxError) {
        MultiError::push_error(self, error);
    }
}

impl From<CombinedError> for MultiError {
    /// Resumes accumulating on top of an existing combined error.
    fn from(combined: CombinedError) -> Self {
        MultiError {
            errors: combined.into_errors(),
        }
    }
}

impl<E: Into<BoxError>> Extend<Option<E>> for MultiError {
    /// Adds each present error in order, skipping absent ones.
    fn extend<I: IntoIterator<Item = Option<E>>>(&mut self, iter: I) {
        for error in iter {
            self.add(error);
        }
    }
}

impl<E: Into<BoxError>> FromIterator<Option<E>> for MultiError {
    /// Constructs a `MultiError` seeded with each present error in order.
    ///
    /// ```
    /// # use multierror::MultiError;
    /// let errors: MultiError = vec![None, Some("a"), None, Some("b")].into_iter().collect();
    /// assert_eq!(errors.finalize().unwrap_err().to_string(), "2 errors: a; b");
    ///
    /// let errors: MultiError = vec![None::<&str>, None, None].into_iter().collect();
    /// assert!(errors.finalize().is_ok());
    /// ```
    fn from_iter<I: IntoIterator<Item = Option<E>>>(iter: I) -> Self {
        let mut errors = MultiError::new();
        errors.extend(iter);
        errors
    }
}
