use std::path::PathBuf;

use chrono::{Local, Timelike};
use crossterm::style::Stylize;
use testbuilder_gen::generator::{
  GeneratorConfig, Layout, ShadowPolicy, Visibility,
  codegen::GeneratedFile,
  metrics::{Diagnostic, DiagnosticCounts, DiagnosticLevel},
  orchestrator::{GeneratedOutput, Orchestrator},
  source::SourceScanner,
  writer::OutputWriter,
};

use crate::ui::{Colors, GenerateCommand, LayoutMode, ShadowMode, colors::Role};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub crate_root: PathBuf,
  pub output: PathBuf,
  pub generator: GeneratorConfig,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> anyhow::Result<Self> {
    let GenerateCommand {
      crate_root,
      output,
      layout,
      visibility,
      shadow_policy,
      root_module,
      only,
      exclude,
      verbose,
      quiet,
    } = command;

    let Some(visibility) = Visibility::parse(&visibility) else {
      anyhow::bail!("Invalid visibility '{visibility}': expected 'public' or 'crate'");
    };
    let layout = Layout::from(layout);
    let output = output.unwrap_or_else(|| default_output(&crate_root, &root_module, layout));

    let generator = GeneratorConfig::builder()
      .root_module(root_module)
      .layout(layout)
      .visibility(visibility)
      .shadow_policy(ShadowPolicy::from(shadow_policy))
      .only(only.unwrap_or_default())
      .exclude(exclude.unwrap_or_default())
      .build();

    Ok(Self {
      crate_root,
      output,
      generator,
      verbose,
      quiet,
    })
  }

  async fn write_output(&self, files: &[GeneratedFile]) -> Vec<Diagnostic> {
    match self.generator.layout {
      Layout::Tree => OutputWriter::new(&self.output).write_all(files).await,
      Layout::SingleFile => {
        let root = self.output.parent().map(PathBuf::from).unwrap_or_default();
        let file_name = self.output.file_name().map(PathBuf::from).unwrap_or_default();
        let files = files
          .iter()
          .map(|file| GeneratedFile {
            path: file_name.clone(),
            ..file.clone()
          })
          .collect::<Vec<_>>();
        OutputWriter::new(root).write_all(&files).await
      }
    }
  }
}

/// `src/testbuilder/` for the tree layout, `src/testbuilder.rs` for a single file.
fn default_output(crate_root: &std::path::Path, root_module: &str, layout: Layout) -> PathBuf {
  match layout {
    Layout::Tree => crate_root.join(root_module),
    Layout::SingleFile => crate_root.join(format!("{root_module}.rs")),
  }
}

impl From<LayoutMode> for Layout {
  fn from(mode: LayoutMode) -> Self {
    match mode {
      LayoutMode::Tree => Layout::Tree,
      LayoutMode::SingleFile => Layout::SingleFile,
    }
  }
}

impl From<ShadowMode> for ShadowPolicy {
  fn from(mode: ShadowMode) -> Self {
    match mode {
      ShadowMode::Reject => ShadowPolicy::Reject,
      ShadowMode::MostDerived => ShadowPolicy::MostDerived,
    }
  }
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_scanning(&self) {
    self.info(
      &format!("Scanning crate sources in: {}", self.config.crate_root.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_generating(&self) {
    self.info(&"Generating builders...".with(self.colors.primary()).to_string());
  }

  fn log_writing(&self) {
    self.info(
      &format!("Writing to: {}", self.config.output.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn print_statistics(&self, output: &GeneratedOutput) {
    if self.config.quiet {
      return;
    }

    let stats = &output.stats;
    self.stat("Files scanned:", stats.files_scanned.to_string());
    self.stat("Types registered:", stats.types_registered.to_string());
    self.stat("Annotated types:", stats.annotated_types.to_string());
    self.stat("Builders generated:", stats.builders_generated.to_string());
    self.stat("", format!("{} setters", stats.setters_generated));
    if stats.shadowed_fields_skipped > 0 {
      self.stat("", format!("{} shadowed fields skipped", stats.shadowed_fields_skipped));
    }
    self.stat("Files emitted:", stats.files_emitted.to_string());

    let counts = DiagnosticCounts::tally(&output.diagnostics);
    if counts.errors > 0 {
      self.stat("Errors:", counts.errors.to_string());
    }
    if counts.warnings > 0 {
      self.stat("Warnings:", counts.warnings.to_string());
    }
  }

  fn print_diagnostics(&self, diagnostics: &[Diagnostic]) {
    let mut printed_header = false;
    for diagnostic in diagnostics {
      let level = diagnostic.level();
      let should_print = match level {
        DiagnosticLevel::Error => true,
        DiagnosticLevel::Warning => !self.config.quiet,
        DiagnosticLevel::Note => self.config.verbose && !self.config.quiet,
      };
      if !should_print {
        continue;
      }

      if !printed_header {
        println!();
        printed_header = true;
      }

      let (label, role) = match level {
        DiagnosticLevel::Error => ("Error:", Role::Error),
        DiagnosticLevel::Warning => ("Warning:", Role::Warning),
        DiagnosticLevel::Note => ("Note:", Role::Note),
      };
      eprintln!(
        "{} {}",
        label.with(self.colors.color(role)),
        format!("{diagnostic}").with(self.colors.primary())
      );
    }
  }

  fn log_success(&self) {
    if !self.config.quiet {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        "Successfully generated builders".with(self.colors.success())
      );
    }
  }
}

pub async fn generate_code(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);

  logger.log_scanning();
  let sources = SourceScanner::builder()
    .root(&config.crate_root)
    .skip_module(config.generator.root_module.clone())
    .build()
    .scan()
    .await?;

  logger.log_generating();
  let mut output = Orchestrator::new(config.generator.clone()).generate(&sources)?;

  logger.log_writing();
  let write_diagnostics = config.write_output(&output.files).await;
  output.diagnostics.extend(write_diagnostics);

  logger.print_statistics(&output);
  logger.print_diagnostics(&output.diagnostics);

  let failed = output.errors().count();
  if failed > 0 {
    anyhow::bail!("{failed} error(s) during generation; see messages above");
  }

  logger.log_success();
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn command(args: &[&str]) -> GenerateCommand {
    use clap::Parser;

    let mut argv = vec!["testbuilder-gen", "generate"];
    argv.extend_from_slice(args);
    match crate::ui::Cli::try_parse_from(argv).unwrap().command {
      crate::ui::Commands::Generate(command) => command,
      crate::ui::Commands::List(_) => panic!("expected generate"),
    }
  }

  #[test]
  fn test_default_output_follows_layout() {
    let tree = GenerateConfig::from_command(command(&[])).unwrap();
    assert_eq!(tree.output, PathBuf::from("src/testbuilder"));

    let single = GenerateConfig::from_command(command(&["--layout", "single-file"])).unwrap();
    assert_eq!(single.output, PathBuf::from("src/testbuilder.rs"));
  }

  #[test]
  fn test_invalid_visibility() {
    let err = GenerateConfig::from_command(command(&["--visibility", "file"])).unwrap_err();
    assert!(err.to_string().contains("Invalid visibility 'file'"));
  }

  #[test]
  fn test_filters_and_policy_reach_generator_config() {
    let config = GenerateConfig::from_command(command(&[
      "--only",
      "Point",
      "--exclude",
      "Circle",
      "--shadow-policy",
      "most-derived",
      "--visibility",
      "crate",
    ]))
    .unwrap();
    assert_eq!(config.generator.only, ["Point"]);
    assert_eq!(config.generator.exclude, ["Circle"]);
    assert_eq!(config.generator.shadow_policy, ShadowPolicy::MostDerived);
    assert_eq!(config.generator.visibility, Visibility::Crate);
  }

  #[tokio::test]
  async fn test_generate_code_writes_tree() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    std::fs::create_dir_all(src.join("shapes")).unwrap();
    std::fs::write(src.join("lib.rs"), "mod shapes;").unwrap();
    std::fs::write(
      src.join("shapes/mod.rs"),
      "#[derive(Default, testbuilder::TestBuilder)] pub struct Point { x: i32 }",
    )
    .unwrap();

    let config = GenerateConfig::from_command(command(&["--crate-root", src.to_str().unwrap(), "-q"])).unwrap();
    generate_code(config, &Colors::new(false, crate::ui::colors::Theme::Dark))
      .await
      .unwrap();

    assert!(src.join("testbuilder/mod.rs").exists());
    assert!(src.join("testbuilder/shapes/mod.rs").exists());
    assert!(src.join("testbuilder/shapes/t_point.rs").exists());
  }
}
