use std::any::type_name;

#[derive(Debug, thiserror::Error)]
pub enum FieldError {
  #[error("field not found: `{field}`")]
  NotFound { field: String },
  #[error("field `{field}` of `{owner}` rejected the value: expected `{expected}`")]
  TypeMismatch {
    owner: &'static str,
    field: String,
    expected: &'static str,
  },
}

#[derive(Debug, thiserror::Error)]
pub enum ConstructError {
  #[error("`{type_name}` has no zero-argument constructor; derive `Default` or add `#[test_builder(constructor = path)]`")]
  NoZeroArgConstructor { type_name: &'static str },
  #[error("zero-argument constructor of `{type_name}` panicked: {message}")]
  Panicked { type_name: &'static str, message: String },
}

/// The single fault a generated builder raises. The underlying error is kept as `source`.
#[derive(Debug, thiserror::Error)]
pub enum Fault {
  #[error("could not instantiate `{type_name}`")]
  Instantiate {
    type_name: &'static str,
    #[source]
    source: ConstructError,
  },
  #[error("could not assign field `{field}` of `{type_name}`")]
  Assign {
    type_name: &'static str,
    field: String,
    #[source]
    source: FieldError,
  },
}

impl Fault {
  pub fn instantiate<T: ?Sized>(source: ConstructError) -> Self {
    Self::Instantiate {
      type_name: type_name::<T>(),
      source,
    }
  }

  pub fn assign<T: ?Sized>(field: &str, source: FieldError) -> Self {
    Self::Assign {
      type_name: type_name::<T>(),
      field: field.to_string(),
      source,
    }
  }

  /// The fault message followed by every cause, separated by `: `.
  pub fn chain(&self) -> String {
    let mut message = self.to_string();
    let mut cause = std::error::Error::source(self);
    while let Some(err) = cause {
      message.push_str(": ");
      message.push_str(&err.to_string());
      cause = err.source();
    }
    message
  }
}

/// Panics with the full cause chain of `fault`.
#[track_caller]
pub fn raise(fault: Fault) -> ! {
  panic!("{}", fault.chain())
}
