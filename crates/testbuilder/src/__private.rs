//! Items referenced by derive output. Not a public API.

use std::{
  any::{Any, type_name},
  marker::PhantomData,
  panic::catch_unwind,
};

use crate::error::{ConstructError, FieldError};

/// Moves `value` into `slot` when it holds a `V`.
pub fn assign<V: Any>(slot: &mut V, owner: &'static str, field: &str, value: Box<dyn Any>) -> Result<(), FieldError> {
  match value.downcast::<V>() {
    Ok(value) => {
      *slot = *value;
      Ok(())
    }
    Err(_) => Err(FieldError::TypeMismatch {
      owner,
      field: field.to_string(),
      expected: type_name::<V>(),
    }),
  }
}

pub fn not_found(field: &str) -> FieldError {
  FieldError::NotFound {
    field: field.to_string(),
  }
}

/// Runs a zero-argument constructor, turning a panic into [`ConstructError::Panicked`].
pub fn construct<T>(constructor: fn() -> T) -> Result<T, ConstructError> {
  catch_unwind(constructor).map_err(|payload| ConstructError::Panicked {
    type_name: type_name::<T>(),
    message: panic_message(payload.as_ref()),
  })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
  if let Some(message) = payload.downcast_ref::<&str>() {
    (*message).to_string()
  } else if let Some(message) = payload.downcast_ref::<String>() {
    message.clone()
  } else {
    "non-string panic payload".to_string()
  }
}

/// Picks `Default` when `T` implements it and a run-time error otherwise.
///
/// Call as `(&Probe::<T>::new()).zero_arg()` with both [`ViaDefault`] and
/// [`ViaMissing`] in scope; method resolution prefers the by-value impl.
pub struct Probe<T>(PhantomData<T>);

impl<T> Probe<T> {
  #[allow(clippy::new_without_default)]
  pub const fn new() -> Self {
    Self(PhantomData)
  }
}

pub trait ViaDefault<T> {
  fn zero_arg(&self) -> Result<T, ConstructError>;
}

impl<T: Default> ViaDefault<T> for Probe<T> {
  fn zero_arg(&self) -> Result<T, ConstructError> {
    construct(T::default)
  }
}

pub trait ViaMissing<T> {
  fn zero_arg(&self) -> Result<T, ConstructError>;
}

impl<T> ViaMissing<T> for &Probe<T> {
  fn zero_arg(&self) -> Result<T, ConstructError> {
    Err(ConstructError::NoZeroArgConstructor {
      type_name: type_name::<T>(),
    })
  }
}
