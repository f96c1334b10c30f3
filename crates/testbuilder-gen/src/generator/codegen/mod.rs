use std::path::PathBuf;

use proc_macro2::TokenStream;
use quote::quote;

pub mod builder;
pub mod module_tree;


pub use builder::BuilderGenerator;
pub use module_tree::{ModuleTree, RenderedBuilder};

/// File name of the single-file layout, and the default for `include_generated!()`.
pub const SINGLE_FILE_NAME: &str = "testbuilder.rs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
  #[default]
  Public,
  Crate,
}

impl Visibility {
  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "public" => Some(Visibility::Public),
      "crate" => Some(Visibility::Crate),
      _ => None,
    }
  }

  pub(crate) fn to_tokens(self) -> TokenStream {
    match self {
      Visibility::Public => quote! { pub },
      Visibility::Crate => quote! { pub(crate) },
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
  /// Relative to the output directory.
  pub path: PathBuf,
  pub code: String,
  /// The type a per-builder file was generated for; `None` for module files.
  pub owner: Option<String>,
}

/// Formats `tokens` as a source file.
pub(crate) fn format_source(tokens: TokenStream) -> anyhow::Result<String> {
  let syntax_tree: syn::File = syn::parse2(tokens)?;
  Ok(prettyplease::unparse(&syntax_tree))
}

/// Plain line comments only: the file may be pulled in with `include!`, which rejects
/// inner attributes and inner doc comments.
pub(crate) fn with_header(code: &str) -> String {
  let header = format!(
    "// AUTO-GENERATED CODE - DO NOT EDIT!\n\
     //\n\
     // Builders for structs annotated with `#[derive(TestBuilder)]`.\n\
     // Generated by `testbuilder-gen` v{}\n",
    env!("CARGO_PKG_VERSION")
  );
  if code.is_empty() {
    header
  } else {
    format!("{header}\n{code}")
  }
}
