use std::any::Any;

use crate::error::{ConstructError, FieldError};

/// Assigns fields by name, starting at the most-derived type and ascending
/// through `#[test_builder(parent)]` links.
///
/// Derived impls live in the declaring module, so private fields are reachable.
pub trait FieldAccess {
  /// Sets `field` on the first type in the chain that declares it.
  ///
  /// Fails with [`FieldError::NotFound`] once the chain is exhausted, or with
  /// [`FieldError::TypeMismatch`] when `value` does not hold the field's type.
  fn set_field(&mut self, field: &str, value: Box<dyn Any>) -> Result<(), FieldError>;
}

/// Zero-argument construction regardless of the constructor's visibility.
pub trait Instantiate: Sized {
  fn instantiate() -> Result<Self, ConstructError>;
}
