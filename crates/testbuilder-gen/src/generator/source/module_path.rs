use std::fmt;

use proc_macro2::TokenStream;
use quote::quote;

use crate::generator::naming::ident_for;

/// Path of a module relative to the crate root; the root itself has no segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModulePath(Vec<String>);

impl ModulePath {
  pub fn root() -> Self {
    Self::default()
  }

  /// Parses `a::b`, with or without a leading `crate::`. An empty string is the root.
  pub fn parse(path: &str) -> Self {
    let path = match path.strip_prefix("crate") {
      Some(rest) if rest.is_empty() || rest.starts_with("::") => &rest[rest.len().min(2)..],
      _ => path,
    };
    Self(
      path
        .split("::")
        .filter(|segment| !segment.is_empty())
        .map(ToString::to_string)
        .collect(),
    )
  }

  pub fn from_segments(segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
    Self(segments.into_iter().map(Into::into).collect())
  }

  #[must_use]
  pub fn child(&self, name: &str) -> Self {
    let mut segments = self.0.clone();
    segments.push(name.to_string());
    Self(segments)
  }

  pub fn parent(&self) -> Option<Self> {
    let (_, rest) = self.0.split_last()?;
    Some(Self(rest.to_vec()))
  }

  pub fn segments(&self) -> &[String] {
    &self.0
  }

  pub fn is_root(&self) -> bool {
    self.0.is_empty()
  }

  /// `crate::a::b` for the module, `crate::a::b::name` for an item in it.
  pub fn item_path(&self, name: &str) -> String {
    format!("{self}::{name}")
  }

  /// `crate::a::b` as tokens.
  pub fn to_tokens(&self) -> TokenStream {
    let segments = self.0.iter().map(|segment| ident_for(segment));
    quote! { crate #(:: #segments)* }
  }
}

impl fmt::Display for ModulePath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("crate")?;
    for segment in &self.0 {
      write!(f, "::{segment}")?;
    }
    Ok(())
  }
}
