//! Derives for `testbuilder`.
//!
//! Both derives expand inside the module that declares the struct, which is the
//! only place its private fields can be named. Generated builders elsewhere in
//! the crate go through the emitted trait impls instead of touching fields.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod generate;
mod parse;

/// Marks a struct for builder generation.
///
/// Emits `testbuilder::FieldAccess` and `testbuilder::Instantiate` impls.
///
/// - `#[test_builder(parent)]` on a field embeds the struct's parent; its fields
///   become settable through this struct.
/// - `#[test_builder(constructor = path)]` on the struct names a zero-argument
///   constructor of any visibility. Without it `Default` is used when the struct
///   implements it; otherwise the builder fails when it is created.
#[proc_macro_derive(TestBuilder, attributes(test_builder))]
pub fn derive_test_builder(input: TokenStream) -> TokenStream {
  let input = parse_macro_input!(input as DeriveInput);

  match generate::expand_test_builder(&input) {
    Ok(tokens) => tokens.into(),
    Err(e) => e.to_compile_error().into(),
  }
}

/// Emits only `testbuilder::FieldAccess`, for parent structs that need no builder.
#[proc_macro_derive(FieldAccess, attributes(test_builder))]
pub fn derive_field_access(input: TokenStream) -> TokenStream {
  let input = parse_macro_input!(input as DeriveInput);

  match generate::expand_field_access(&input) {
    Ok(tokens) => tokens.into(),
    Err(e) => e.to_compile_error().into(),
  }
}
