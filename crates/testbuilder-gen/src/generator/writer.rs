use std::path::PathBuf;

use super::{codegen::GeneratedFile, metrics::Diagnostic, source::display_path};

/// Writes generated files below a root directory.
///
/// A file that cannot be written becomes a [`Diagnostic::WriteFailed`]; the remaining files
/// are still written.
#[derive(Debug, Clone)]
pub struct OutputWriter {
  root: PathBuf,
}

impl OutputWriter {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub async fn write_all(&self, files: &[GeneratedFile]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for file in files {
      if let Err(diagnostic) = self.write(file).await {
        diagnostics.push(diagnostic);
      }
    }
    diagnostics
  }

  pub async fn write(&self, file: &GeneratedFile) -> Result<PathBuf, Diagnostic> {
    let path = self.root.join(&file.path);
    let failed = |error: std::io::Error| Diagnostic::WriteFailed {
      path: display_path(&path),
      owner: file.owner.clone().unwrap_or_else(|| "module file".to_string()),
      error: error.to_string(),
    };

    if let Some(parent) = path.parent() {
      tokio::fs::create_dir_all(parent).await.map_err(failed)?;
    }
    tokio::fs::write(&path, &file.code).await.map_err(failed)?;
    Ok(path)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn file(path: &str, owner: Option<&str>) -> GeneratedFile {
    GeneratedFile {
      path: path.into(),
      code: "// generated\n".to_string(),
      owner: owner.map(ToString::to_string),
    }
  }

  #[tokio::test]
  async fn test_write_creates_directories() {
    let dir = tempfile::tempdir().unwrap();
    let writer = OutputWriter::new(dir.path());

    let diagnostics = writer
      .write_all(&[file("mod.rs", None), file("shapes/t_point.rs", Some("crate::shapes::Point"))])
      .await;

    assert!(diagnostics.is_empty());
    let written = std::fs::read_to_string(dir.path().join("shapes/t_point.rs")).unwrap();
    assert_eq!(written, "// generated\n");
  }

  #[tokio::test]
  async fn test_write_failure_is_isolated() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("blocked"), "not a directory").unwrap();
    let writer = OutputWriter::new(dir.path());

    let diagnostics = writer
      .write_all(&[
        file("blocked/t_point.rs", Some("crate::blocked::Point")),
        file("t_circle.rs", Some("crate::Circle")),
      ])
      .await;

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].is_error());
    assert_eq!(diagnostics[0].type_name(), Some("crate::blocked::Point"));
    assert!(dir.path().join("t_circle.rs").exists());
  }
}
