//! Runtime support for generated test builders.
//!
//! Structs opt in with `#[derive(TestBuilder)]`. The derive emits a [`FieldAccess`]
//! and an [`Instantiate`] impl next to the struct, where its private fields are in
//! reach. The `testbuilder-gen` generator then scans the crate and writes one
//! builder per marked struct, with a setter for every field across the struct's
//! parent chain:
//!
//! ```ignore
//! #[derive(TestBuilder)]
//! pub struct Point {
//!   x: i32,
//!   y: i32,
//! }
//!
//! let point = testbuilder::shapes::TPoint::builder().x(3).y(4).build();
//! ```
//!
//! A parent is an embedded struct tagged `#[test_builder(parent)]`; its fields are
//! set through the child's builder as if they were declared on the child.

mod access;
mod error;

#[doc(hidden)]
pub mod __private;

pub use access::{FieldAccess, Instantiate};
pub use error::{ConstructError, Fault, FieldError, raise};
pub use testbuilder_derive::{FieldAccess, TestBuilder};

/// Mounts builders that a build script wrote to `$OUT_DIR`.
///
/// Place it inside the module that should hold the generated tree:
///
/// ```ignore
/// #[cfg(test)]
/// mod testbuilder {
///   ::testbuilder::include_generated!();
/// }
/// ```
#[macro_export]
macro_rules! include_generated {
  () => {
    include!(concat!(env!("OUT_DIR"), "/testbuilder.rs"));
  };
  ($file:literal) => {
    include!(concat!(env!("OUT_DIR"), "/", $file));
  };
}
