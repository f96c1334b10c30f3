use quote::quote;
use syn::Type;

use crate::generator::{
  GeneratorConfig,
  orchestrator::{GeneratedOutput, Orchestrator},
  registry::{TypeDecl, TypeRegistry},
  source::{ModulePath, SourceSet},
};

/// Builds a source set from `(module, code)` pairs; `""` is the crate root.
pub(super) fn sources(files: &[(&str, &str)]) -> SourceSet {
  let mut sources = SourceSet::new();
  for (module, code) in files {
    let module = ModulePath::parse(module);
    let path = if module.is_root() {
      "src/lib.rs".to_string()
    } else {
      format!("src/{}.rs", module.segments().join("/"))
    };
    sources.add_source(module, path, code);
  }
  sources
}

pub(super) fn registry(files: &[(&str, &str)]) -> TypeRegistry {
  TypeRegistry::build(&sources(files))
}

pub(super) fn generate(files: &[(&str, &str)], config: GeneratorConfig) -> GeneratedOutput {
  Orchestrator::new(config)
    .generate(&sources(files))
    .expect("generated code should format")
}

pub(super) fn decl<'r>(registry: &'r TypeRegistry, path: &str) -> &'r TypeDecl {
  registry
    .get(path)
    .unwrap_or_else(|| panic!("{path} should be registered"))
}

pub(super) fn type_string(ty: &Type) -> String {
  quote!(#ty).to_string().replace(' ', "")
}
