use crate::{BoxError, CombinedError, ErrorCollector, MultiError};

/// A resource which can be closed, possibly failing.
///
/// Implemented for `&mut C` and `Box<C>` so that sequences of borrowed or boxed (including
/// `dyn Close`) resources can be passed to [`close_all`].
pub trait Close {
    /// Releases the resource.
    fn close(&mut self) -> Result<(), BoxError>;
}

impl<C: Close + ?Sized> Close for &mut C {
    fn close(&mut self) -> Result<(), BoxError> {
        (**self).close()
    }
}

impl<C: Close + ?Sized> Close for Box<C> {
    fn close(&mut self) -> Result<(), BoxError> {
        (**self).close()
    }
}

/// Closes every resource in `closers`, in order, and combines any failures.
///
/// Each resource is closed exactly once, whether or not closing an earlier one failed. Returns
/// `Ok(())` if every close succeeded.
///
/// ```
/// # use multierror::{close_all, BoxError, Close};
/// struct Conn(&'static str, bool);
///
/// impl Close for Conn {
///     fn close(&mut self) -> Result<(), BoxError> {
///         if self.1 {
///             Ok(())
///         } else {
///             Err(format!("{} refused to close", self.0).into())
///         }
///     }
/// }
///
/// let conns = vec![Conn("a", true), Conn("b", false), Conn("c", true)];
/// let err = close_all(conns).unwrap_err();
/// assert_eq!(err.to_string(), "b refused to close");
/// ```
pub fn close_all<I>(closers: I) -> Result<(), CombinedError>
where
    I: IntoIterator,
    I::Item: Close,
{
    let mut errors = MultiError::new();
    close_all_into(closers, &mut errors);
    errors.into_result()
}

/// Closes every resource in `closers`, in order, pushing any failures into `errors`.
///
/// Like [`close_all`], for when failures should join a collection the caller already has.
#[cfg_attr(not(feature = "tracing"), allow(unused_variables, unused_assignments))]
pub fn close_all_into<I, C>(closers: I, errors: &mut C)
where
    I: IntoIterator,
    I::Item: Close,
    C: ErrorCollector + ?Sized,
{
    let mut failed = 0usize;
    for (index, mut closer) in closers.into_iter().enumerate() {
        if let Err(error) = closer.close() {
            #[cfg(feature = "tracing")]
            tracing::debug!(index, %error, "failed to close resource");

            failed += 1;
            errors.push_error(error);
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(failed, "closed resources");
}
