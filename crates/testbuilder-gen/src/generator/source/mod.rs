//! Parsed Rust sources of one crate, keyed by the module each file defines.

use std::path::{Path, PathBuf};

mod module_path;
mod scanner;

pub use module_path::ModulePath;
pub use scanner::SourceScanner;

use super::metrics::Diagnostic;

#[derive(Debug)]
pub struct SourceFile {
  pub path: PathBuf,
  pub module: ModulePath,
  pub syntax: syn::File,
}

/// Every file a scan reached, plus the problems met on the way.
#[derive(Debug, Default)]
pub struct SourceSet {
  files: Vec<SourceFile>,
  diagnostics: Vec<Diagnostic>,
}

impl SourceSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Parses `code` as the file defining `module`.
  ///
  /// A file that does not parse is recorded as a [`Diagnostic::ParseFailed`] and skipped.
  pub fn add_source(&mut self, module: ModulePath, path: impl Into<PathBuf>, code: &str) -> Option<&SourceFile> {
    let path = path.into();
    match syn::parse_file(code) {
      Ok(syntax) => {
        self.files.push(SourceFile { path, module, syntax });
        self.files.last()
      }
      Err(error) => {
        self.diagnostics.push(Diagnostic::ParseFailed {
          path: display_path(&path),
          error: format_parse_error(&error),
        });
        None
      }
    }
  }

  pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
    self.diagnostics.push(diagnostic);
  }

  pub fn files(&self) -> &[SourceFile] {
    &self.files
  }

  pub fn diagnostics(&self) -> &[Diagnostic] {
    &self.diagnostics
  }

  pub fn len(&self) -> usize {
    self.files.len()
  }

  pub fn is_empty(&self) -> bool {
    self.files.is_empty()
  }
}

fn format_parse_error(error: &syn::Error) -> String {
  let start = error.span().start();
  format!("{error} at line {}, column {}", start.line, start.column + 1)
}

pub(crate) fn display_path(path: &Path) -> String {
  path.display().to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_add_source_parses_file() {
    let mut sources = SourceSet::new();
    let file = sources
      .add_source(ModulePath::parse("shapes"), "src/shapes.rs", "pub struct Point { x: i32 }")
      .unwrap();
    assert_eq!(file.module, ModulePath::parse("shapes"));
    assert_eq!(file.syntax.items.len(), 1);
    assert!(sources.diagnostics().is_empty());
  }

  #[test]
  fn test_add_source_records_parse_failure() {
    let mut sources = SourceSet::new();
    assert!(sources.add_source(ModulePath::root(), "src/lib.rs", "struct {").is_none());
    assert!(sources.is_empty());
    assert_eq!(sources.diagnostics().len(), 1);
    assert!(sources.diagnostics()[0].is_error());
    assert!(sources.diagnostics()[0].to_string().starts_with("Failed to parse 'src/lib.rs'"));
  }
}
