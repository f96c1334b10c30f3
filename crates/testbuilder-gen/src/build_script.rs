use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::generator::{
  GeneratorConfig, Layout,
  codegen::SINGLE_FILE_NAME,
  metrics::DiagnosticLevel,
  orchestrator::{GeneratedOutput, Orchestrator},
  source::SourceScanner,
  writer::OutputWriter,
};

/// Generates builders from `build.rs` into `$OUT_DIR`.
///
/// ```no_run
/// // build.rs
/// fn main() -> anyhow::Result<()> {
///   testbuilder_gen::BuildScript::builder().build().run()?;
///   Ok(())
/// }
/// ```
///
/// ```ignore
/// // src/lib.rs
/// #[cfg(test)]
/// mod testbuilder {
///   ::testbuilder::include_generated!();
/// }
/// ```
///
/// Problems with individual types are printed as cargo warnings and do not fail the build.
#[derive(Debug, Clone, bon::Builder)]
pub struct BuildScript {
  /// Directory holding `lib.rs` or `main.rs`. Defaults to `$CARGO_MANIFEST_DIR/src`.
  #[builder(into)]
  crate_root: Option<PathBuf>,
  /// The layout is always single-file here, whatever `config` says.
  #[builder(default)]
  config: GeneratorConfig,
  #[builder(default = SINGLE_FILE_NAME.to_string(), into)]
  file_name: String,
}

impl Default for BuildScript {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl BuildScript {
  pub fn run(self) -> anyhow::Result<GeneratedOutput> {
    let out_dir = std::env::var_os("OUT_DIR").context("OUT_DIR is not set; run this from a build script")?;
    self.run_into(Path::new(&out_dir))
  }

  /// Like [`run`](Self::run), writing into `out_dir`.
  pub fn run_into(self, out_dir: &Path) -> anyhow::Result<GeneratedOutput> {
    let crate_root = match &self.crate_root {
      Some(root) => root.clone(),
      None => {
        let manifest_dir = std::env::var_os("CARGO_MANIFEST_DIR").context("CARGO_MANIFEST_DIR is not set")?;
        PathBuf::from(manifest_dir).join("src")
      }
    };

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let output = runtime.block_on(self.generate(&crate_root, out_dir))?;

    println!("cargo::rerun-if-changed={}", crate_root.display());
    for diagnostic in &output.diagnostics {
      if diagnostic.level() >= DiagnosticLevel::Warning {
        println!("cargo::warning={}", diagnostic.to_string().replace('\n', " "));
      }
    }

    Ok(output)
  }

  async fn generate(&self, crate_root: &Path, out_dir: &Path) -> anyhow::Result<GeneratedOutput> {
    let sources = SourceScanner::builder()
      .root(crate_root)
      .skip_module(self.config.root_module.clone())
      .build()
      .scan()
      .await
      .with_context(|| format!("failed to scan {}", crate_root.display()))?;

    let config = GeneratorConfig {
      layout: Layout::SingleFile,
      ..self.config.clone()
    };
    let mut output = Orchestrator::new(config).generate(&sources)?;
    for file in &mut output.files {
      file.path = PathBuf::from(&self.file_name);
    }

    let write_diagnostics = OutputWriter::new(out_dir).write_all(&output.files).await;
    output.diagnostics.extend(write_diagnostics);
    Ok(output)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_run_into_writes_single_file() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    std::fs::write(
      src.path().join("lib.rs"),
      "#[derive(Default, testbuilder::TestBuilder)] pub struct Point { x: i32, y: i32 }",
    )
    .unwrap();

    let output = BuildScript::builder()
      .crate_root(src.path())
      .build()
      .run_into(out.path())
      .unwrap();

    assert!(!output.has_errors());
    assert_eq!(output.stats.builders_generated, 1);
    let code = std::fs::read_to_string(out.path().join("testbuilder.rs")).unwrap();
    assert!(code.starts_with("// AUTO-GENERATED CODE - DO NOT EDIT!"));
    assert!(code.contains("pub mod t_point {"));
    assert!(!code.contains("#!["));
  }

  #[test]
  fn test_tree_layout_config_still_writes_single_file() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    std::fs::write(
      src.path().join("lib.rs"),
      "pub mod shapes { #[derive(Default, testbuilder::TestBuilder)] pub struct Point { x: i32 } }",
    )
    .unwrap();

    let output = BuildScript::builder()
      .crate_root(src.path())
      .config(GeneratorConfig::builder().layout(Layout::Tree).build())
      .file_name("builders.rs")
      .build()
      .run_into(out.path())
      .unwrap();

    assert_eq!(output.stats.files_emitted, 1);
    assert_eq!(output.files[0].path, PathBuf::from("builders.rs"));
    let code = std::fs::read_to_string(out.path().join("builders.rs")).unwrap();
    assert!(code.contains("pub mod shapes {"));
    assert!(!out.path().join("mod.rs").exists());
  }

  #[test]
  fn test_missing_entry_is_an_error() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let err = BuildScript::builder()
      .crate_root(src.path())
      .build()
      .run_into(out.path())
      .unwrap_err();
    assert!(err.to_string().starts_with("failed to scan"));
  }
}
