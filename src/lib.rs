#![doc = include_str!("../README.md")]

use std::{error::Error, sync::Arc};

mod multi;
pub use multi::*;

mod combined;
pub use combined::*;

mod probe;
pub use probe::*;

mod collector;
pub use collector::*;

mod close;
pub use close::*;

/// An owned, type-erased error, as accepted by [`MultiError`] and returned by [`Close::close`].
///
/// Anything that converts into this works as an input, including `&str`, [`String`] and any
/// `Error + Send + Sync + 'static` value.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// A shared, type-erased error, as stored inside [`MultiError`] and [`CombinedError`].
pub type SharedError = Arc<dyn Error + Send + Sync + 'static>;
