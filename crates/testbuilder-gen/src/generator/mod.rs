pub mod codegen;
pub mod collector;
pub mod errors;
pub mod metrics;
pub(crate) mod naming;
pub mod orchestrator;
pub mod registry;
pub mod resolve;
pub mod source;
pub mod synth;
pub mod writer;

#[cfg(test)]
mod tests;

pub use codegen::Visibility;

/// Name of the crate-root module generated builders are mounted under.
pub const DEFAULT_ROOT_MODULE: &str = "testbuilder";

/// How generated builders are laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
  /// A `mod.rs` per namespace and one file per builder, for checking into `src/`.
  #[default]
  Tree,
  /// One file with inline modules, for `include!` from a build script's `OUT_DIR`.
  SingleFile,
}

/// What to do when an ancestor declares a field with the same name as a nearer struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowPolicy {
  /// Report the type as failed.
  #[default]
  Reject,
  /// Keep the setter for the nearest declaration and drop the others.
  MostDerived,
}

#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct GeneratorConfig {
  /// Crate-root module that holds the builders; never scanned for annotated types.
  #[builder(default = DEFAULT_ROOT_MODULE.to_string(), into)]
  pub root_module: String,
  #[builder(default)]
  pub layout: Layout,
  #[builder(default)]
  pub visibility: Visibility,
  #[builder(default)]
  pub shadow_policy: ShadowPolicy,
  /// When not empty, only these types get builders.
  #[builder(default)]
  pub only: Vec<String>,
  #[builder(default)]
  pub exclude: Vec<String>,
}

impl Default for GeneratorConfig {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl GeneratorConfig {
  /// Whether the `only`/`exclude` lists let `type_path` through.
  ///
  /// Entries match the full path (`crate::shapes::Point`), the path without `crate::`
  /// (`shapes::Point`) or the bare name (`Point`).
  pub fn selects(&self, type_path: &str) -> bool {
    let matches = |entry: &String| {
      let entry = entry.trim();
      type_path == entry
        || type_path.strip_prefix("crate::") == Some(entry)
        || type_path.rsplit("::").next() == Some(entry)
    };

    if !self.only.is_empty() && !self.only.iter().any(matches) {
      return false;
    }
    !self.exclude.iter().any(matches)
  }
}
