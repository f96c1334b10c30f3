use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use super::colors::{ColorMode, Colors, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "testbuilder-gen")]
#[command(author, version, about = "Test builder generator for #[derive(TestBuilder)] structs")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List annotated structs and the builders they get
  List(ListCommand),
  /// Generate builder sources
  Generate(GenerateCommand),
}

#[derive(Args, Debug)]
pub struct GenerateCommand {
  /// Directory containing the crate's lib.rs or main.rs
  #[arg(short, long, value_name = "DIR", default_value = "src")]
  pub crate_root: PathBuf,

  /// Output directory (tree layout) or file (single-file layout).
  /// Defaults to the root module inside the crate root
  #[arg(short, long, value_name = "PATH")]
  pub output: Option<PathBuf>,

  /// How generated files are laid out
  #[arg(long, value_enum, default_value = "tree")]
  pub layout: LayoutMode,

  /// Visibility level for generated builders (public or crate)
  #[arg(long, value_name = "VISIBILITY", default_value = "public")]
  pub visibility: String,

  /// What to do when a parent struct declares a field name a child also declares
  #[arg(long, value_enum, default_value = "reject")]
  pub shadow_policy: ShadowMode,

  /// Crate-root module the builders are mounted under; it is never scanned
  #[arg(long, value_name = "NAME", default_value = "testbuilder")]
  pub root_module: String,

  /// Generate builders only for these types (comma-separated names or paths)
  #[arg(long, value_name = "TYPES", value_delimiter = ',')]
  pub only: Option<Vec<String>>,

  /// Skip these types (comma-separated names or paths)
  #[arg(long, value_name = "TYPES", value_delimiter = ',')]
  pub exclude: Option<Vec<String>>,

  /// Enable verbose output, including the generated code of every builder
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

#[derive(Args, Debug)]
pub struct ListCommand {
  /// Directory containing the crate's lib.rs or main.rs
  #[arg(short, long, value_name = "DIR", default_value = "src")]
  pub crate_root: PathBuf,

  /// What to do when a parent struct declares a field name a child also declares
  #[arg(long, value_enum, default_value = "reject")]
  pub shadow_policy: ShadowMode,

  /// Crate-root module the builders are mounted under; it is never scanned
  #[arg(long, value_name = "NAME", default_value = "testbuilder")]
  pub root_module: String,

  /// Print JSON instead of a table
  #[arg(long, default_value_t = false)]
  pub json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutMode {
  Tree,
  SingleFile,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShadowMode {
  Reject,
  MostDerived,
}
