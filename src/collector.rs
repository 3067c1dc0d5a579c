use crate::{BoxError, CombinedError, SharedError};

/// Something which accumulates errors.
///
/// This generalizes [`MultiError`]'s accumulation methods so that helpers like
/// [`close_all_into`] can record failures into whatever collection of errors the caller is
/// already holding.
///
/// Only [`push_error`] needs implementing; [`add`] and [`add_result`] are built on it.
///
/// ```
/// # use multierror::{ErrorCollector, SharedError};
/// let mut errors: Vec<SharedError> = vec![];
/// errors.add(None::<&str>);
/// errors.add(Some("oh no!"));
///
/// let value = errors.add_result("7".parse::<u8>());
/// assert_eq!(value, Some(7));
/// assert_eq!(errors.add_result("-1".parse::<u8>()), None);
///
/// assert_eq!(errors.len(), 2);
/// assert_eq!(errors[0].to_string(), "oh no!");
/// ```
///
/// [`MultiError`]: crate::MultiError
/// [`close_all_into`]: crate::close_all_into
/// [`push_error`]: ErrorCollector::push_error
/// [`add`]: ErrorCollector::add
/// [`add_result`]: ErrorCollector::add_result
pub trait ErrorCollector {
    /// Add a new error to the collection of errors.
    fn push_error(&mut self, error: BoxError);

    /// Adds an error if there is one.
    fn add<E: Into<BoxError>>(&mut self, error: Option<E>)
    where
        Self: Sized,
    {
        if let Some(error) = error {
            self.push_error(error.into());
        }
    }

    /// Adds the error from a [`Result`], if it is an [`Err`], and returns the success value
    /// otherwise.
    fn add_result<T, E: Into<BoxError>>(&mut self, result: Result<T, E>) -> Option<T>
    where
        Self: Sized,
    {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.push_error(error.into());
                None
            }
        }
    }
}

impl ErrorCollector for Vec<SharedError> {
    /// Pushes `error`, splicing in the errors of a [`CombinedError`] individually as
    /// [`MultiError`](crate::MultiError) does.
    ///
    /// ```
    /// # use multierror::{ErrorCollector, MultiError, SharedError};
    /// let mut inner = MultiError::new();
    /// inner.push_error("a");
    /// inner.push_error("b");
    ///
    /// let mut errors: Vec<SharedError> = vec![];
    /// errors.push_error(inner.finalize().unwrap_err().into());
    /// errors.push_error("c".into());
    ///
    /// let messages: Vec<_> = errors.iter().map(|e| e.to_string()).collect();
    /// assert_eq!(messages, ["a", "b", "c"]);
    /// ```
    fn push_error(&mut self, error: BoxError) {
        match error.downcast::<CombinedError>() {
            Ok(combined) => self.extend((*combined).into_errors()),
            Err(error) => self.push(SharedError::from(error)),
        }
    }
}
