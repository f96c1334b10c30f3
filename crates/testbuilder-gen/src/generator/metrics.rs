use strum::Display;

use super::synth::BuilderSpec;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub files_scanned: usize,
  pub types_registered: usize,
  pub annotated_types: usize,
  pub builders_generated: usize,
  pub setters_generated: usize,
  pub shadowed_fields_skipped: usize,
  pub files_emitted: usize,
}

impl GenerationStats {
  pub fn record_builder(&mut self, spec: &BuilderSpec) {
    self.builders_generated += 1;
    self.setters_generated += spec.setters.len();
    self.shadowed_fields_skipped += spec.skipped.len();
  }

  pub fn record_files_emitted(&mut self, count: usize) {
    self.files_emitted += count;
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display)]
#[strum(serialize_all = "lowercase")]
pub enum DiagnosticLevel {
  Note,
  Warning,
  Error,
}

/// A message produced while scanning, generating or writing.
///
/// None of these stop the run: a failing type or file is reported and skipped.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Diagnostic {
  #[strum(to_string = "TestBuilder annotation can not be used on {type_name}")]
  MarkerMisuse { type_name: String },
  #[strum(to_string = "Failed to generate builder for '{type_name}': {error}")]
  GenerationFailed { type_name: String, error: String },
  #[strum(to_string = "Failed to write '{path}' for '{owner}': {error}")]
  WriteFailed { path: String, owner: String, error: String },
  #[strum(to_string = "Failed to parse '{path}': {error}")]
  ParseFailed { path: String, error: String },
  #[strum(to_string = "Module '{module}' declared in '{declared_in}' has no source file")]
  MissingModuleFile { module: String, declared_in: String },
  #[strum(to_string = "'{type_name}.{field}': could not resolve '{name}', emitted as written")]
  UnresolvedTypeName {
    type_name: String,
    field: String,
    name: String,
  },
  #[strum(to_string = "'{type_name}.{field}': ignoring #[test_builder] attribute: {error}")]
  InvalidFieldAttribute {
    type_name: String,
    field: String,
    error: String,
  },
  #[strum(to_string = "Generated builder for '{type_name}':\n{code}")]
  GeneratedBuilder { type_name: String, code: String },
}

impl Diagnostic {
  pub fn level(&self) -> DiagnosticLevel {
    match self {
      Self::MarkerMisuse { .. } | Self::GenerationFailed { .. } | Self::WriteFailed { .. } | Self::ParseFailed { .. } => {
        DiagnosticLevel::Error
      }
      Self::MissingModuleFile { .. } | Self::UnresolvedTypeName { .. } | Self::InvalidFieldAttribute { .. } => {
        DiagnosticLevel::Warning
      }
      Self::GeneratedBuilder { .. } => DiagnosticLevel::Note,
    }
  }

  pub fn is_error(&self) -> bool {
    self.level() == DiagnosticLevel::Error
  }

  /// The type this diagnostic is about, when there is one.
  pub fn type_name(&self) -> Option<&str> {
    match self {
      Self::MarkerMisuse { type_name }
      | Self::GenerationFailed { type_name, .. }
      | Self::UnresolvedTypeName { type_name, .. }
      | Self::InvalidFieldAttribute { type_name, .. }
      | Self::GeneratedBuilder { type_name, .. } => Some(type_name),
      Self::WriteFailed { owner, .. } => Some(owner),
      Self::ParseFailed { .. } | Self::MissingModuleFile { .. } => None,
    }
  }
}

/// Counts of each [`DiagnosticLevel`] in a list of diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiagnosticCounts {
  pub notes: usize,
  pub warnings: usize,
  pub errors: usize,
}

impl DiagnosticCounts {
  pub fn tally<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) -> Self {
    let mut counts = Self::default();
    for diagnostic in diagnostics {
      match diagnostic.level() {
        DiagnosticLevel::Note => counts.notes += 1,
        DiagnosticLevel::Warning => counts.warnings += 1,
        DiagnosticLevel::Error => counts.errors += 1,
      }
    }
    counts
  }
}
