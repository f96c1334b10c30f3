//! Sample domain types whose builders are generated by `build.rs`.
//!
//! The builders are only compiled into test builds, under `crate::testbuilder`.

pub mod accounts;
pub mod animals;
pub mod shapes;
pub mod tokens;

#[cfg(test)]
mod testbuilder {
  ::testbuilder::include_generated!();
}

#[cfg(test)]
mod tests;
