//! Orchestration for the builder generation pipeline.
//!
//! ## Usage
//!
//! ```no_run
//! use testbuilder_gen::generator::{GeneratorConfig, orchestrator::Orchestrator, source::SourceScanner};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let sources = SourceScanner::new("src").scan().await?;
//! let output = Orchestrator::new(GeneratorConfig::default()).generate(&sources)?;
//!
//! println!("Generated {} builders", output.stats.builders_generated);
//! # Ok(())
//! # }
//! ```

use super::{
  GeneratorConfig, Layout,
  codegen::{BuilderGenerator, GeneratedFile, ModuleTree, RenderedBuilder, format_source},
  collector::FieldCollector,
  errors::GenError,
  metrics::{Diagnostic, GenerationStats},
  registry::{ItemKind, TypeDecl, TypeRegistry},
  source::SourceSet,
  synth::{BuilderSpec, BuilderSynthesizer},
};

/// Summary of one generated builder, for listings.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BuilderSummary {
  pub type_name: String,
  pub wrapper: String,
  pub module: String,
  /// Ancestors, nearest first.
  pub parents: Vec<String>,
  pub setters: Vec<String>,
  pub skipped: Vec<String>,
}

impl BuilderSummary {
  fn new(spec: &BuilderSpec, chain: &[String]) -> Self {
    Self {
      type_name: spec.target_name.clone(),
      wrapper: spec.wrapper.to_string(),
      module: spec.namespace.item_path(&spec.module.to_string()),
      parents: chain.iter().skip(1).cloned().collect(),
      setters: spec.setters.iter().map(|setter| setter.field_name.clone()).collect(),
      skipped: spec
        .skipped
        .iter()
        .map(|field| format!("{}.{}", field.declared_on, field.name()))
        .collect(),
    }
  }
}

#[derive(Debug)]
pub struct GeneratedOutput {
  pub files: Vec<GeneratedFile>,
  pub builders: Vec<BuilderSummary>,
  pub stats: GenerationStats,
  pub diagnostics: Vec<Diagnostic>,
}

impl GeneratedOutput {
  pub fn has_errors(&self) -> bool {
    self.diagnostics.iter().any(Diagnostic::is_error)
  }

  pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
    self.diagnostics.iter().filter(|diagnostic| diagnostic.is_error())
  }
}

/// High-level entry point: turns a scanned crate into builder files.
///
/// Each annotated type is handled on its own. A type that cannot get a builder produces an
/// error diagnostic and nothing else; the other types are unaffected.
pub struct Orchestrator {
  config: GeneratorConfig,
}

impl Orchestrator {
  pub fn new(config: GeneratorConfig) -> Self {
    Self { config }
  }

  /// Runs registration, field collection, synthesis and emission over `sources`.
  ///
  /// # Errors
  ///
  /// Returns an error only when generated code fails to format, which indicates a bug in
  /// the generator rather than in the scanned crate.
  pub fn generate(&self, sources: &SourceSet) -> anyhow::Result<GeneratedOutput> {
    let registry = TypeRegistry::build(sources);
    let mut stats = GenerationStats {
      files_scanned: sources.len(),
      types_registered: registry.len(),
      ..GenerationStats::default()
    };
    let mut diagnostics = sources.diagnostics().to_vec();
    diagnostics.extend_from_slice(registry.diagnostics());
    let mut builders = Vec::new();
    let mut tree = ModuleTree::new();

    for decl in registry.annotated() {
      let type_name = decl.path_string();
      if !self.config.selects(&type_name) {
        continue;
      }
      stats.annotated_types += 1;

      match decl.kind {
        ItemKind::Struct => {}
        ItemKind::Enum | ItemKind::Union => {
          diagnostics.push(Diagnostic::MarkerMisuse { type_name: decl.name() });
          continue;
        }
        ItemKind::TupleStruct => {
          diagnostics.push(Diagnostic::GenerationFailed {
            error: GenError::UnnamedFields {
              type_name: type_name.clone(),
            }
            .to_string(),
            type_name,
          });
          continue;
        }
      }

      match self.generate_builder(&registry, decl, &mut tree, &mut stats, &mut diagnostics)? {
        Ok(summary) => builders.push(summary),
        Err(error) => diagnostics.push(Diagnostic::GenerationFailed {
          type_name,
          error: error.to_string(),
        }),
      }
    }

    let files = match self.config.layout {
      Layout::Tree => tree.render_tree(self.config.visibility)?,
      Layout::SingleFile => vec![tree.render_single_file(self.config.visibility)?],
    };
    stats.record_files_emitted(files.len());

    Ok(GeneratedOutput {
      files,
      builders,
      stats,
      diagnostics,
    })
  }

  /// The outer error is a formatting failure; the inner one is this type's own failure.
  fn generate_builder(
    &self,
    registry: &TypeRegistry,
    decl: &TypeDecl,
    tree: &mut ModuleTree,
    stats: &mut GenerationStats,
    diagnostics: &mut Vec<Diagnostic>,
  ) -> anyhow::Result<Result<BuilderSummary, GenError>> {
    let collected = match FieldCollector::new(registry).collect(decl) {
      Ok(collected) => collected,
      Err(error) => return Ok(Err(error)),
    };

    let synthesizer = BuilderSynthesizer::new(self.config.shadow_policy, self.config.visibility);
    let mut spec = match synthesizer.synthesize(decl, collected.fields) {
      Ok(spec) => spec,
      Err(error) => return Ok(Err(error)),
    };
    spec.target = collected.target;

    let contents = BuilderGenerator::new(&spec).generate();
    let rendered = RenderedBuilder {
      module: spec.module.clone(),
      wrapper: spec.wrapper.clone(),
      owner: spec.target_name.clone(),
      contents: contents.clone(),
    };
    if let Err(error) = tree.insert(&spec.namespace, rendered) {
      return Ok(Err(error));
    }

    let type_name = spec.target_name.clone();
    diagnostics.extend(collected.unresolved.into_iter().map(|unresolved| {
      Diagnostic::UnresolvedTypeName {
        type_name: type_name.clone(),
        field: unresolved.field,
        name: unresolved.name,
      }
    }));

    let module = &spec.module;
    diagnostics.push(Diagnostic::GeneratedBuilder {
      type_name,
      code: format_source(quote::quote! { mod #module { #contents } })?,
    });

    stats.record_builder(&spec);
    Ok(Ok(BuilderSummary::new(&spec, &collected.chain)))
  }
}
