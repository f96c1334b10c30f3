use std::collections::HashMap;

use syn::{Ident, Path, Type};

use super::{
  ShadowPolicy, Visibility,
  collector::FieldDescriptor,
  errors::GenError,
  naming::{builder_module_ident, is_reserved_setter, wrapper_ident},
  registry::TypeDecl,
  source::ModulePath,
};

#[derive(Debug, Clone)]
pub struct SetterSpec {
  pub ident: Ident,
  /// Field name as `FieldAccess::set_field` expects it.
  pub field_name: String,
  pub ty: Type,
  pub declared_on: String,
}

/// Everything needed to emit the builder for one annotated struct.
#[derive(Debug, Clone)]
pub struct BuilderSpec {
  pub target: Path,
  pub target_name: String,
  /// `TPoint`.
  pub wrapper: Ident,
  /// `t_point`.
  pub module: Ident,
  /// Module of the annotated struct; the builder is placed at the same path under the root module.
  pub namespace: ModulePath,
  pub setters: Vec<SetterSpec>,
  /// Fields dropped because a nearer struct declares the same name.
  pub skipped: Vec<FieldDescriptor>,
  pub visibility: Visibility,
}

pub struct BuilderSynthesizer {
  shadow_policy: ShadowPolicy,
  visibility: Visibility,
}

impl BuilderSynthesizer {
  pub fn new(shadow_policy: ShadowPolicy, visibility: Visibility) -> Self {
    Self {
      shadow_policy,
      visibility,
    }
  }

  /// Produces one setter per field name.
  ///
  /// `fields` must be ordered nearest-first, as [`FieldCollector`](super::collector::FieldCollector)
  /// returns them. A name repeated further up the chain is either an error or dropped,
  /// depending on the shadow policy.
  pub fn synthesize(&self, decl: &TypeDecl, fields: Vec<FieldDescriptor>) -> Result<BuilderSpec, GenError> {
    let mut setters: Vec<SetterSpec> = Vec::with_capacity(fields.len());
    let mut skipped = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for field in fields {
      let field_name = field.name();
      if is_reserved_setter(&field_name) {
        return Err(GenError::ReservedSetterName {
          field: field_name,
          declared_on: field.declared_on,
        });
      }

      if let Some(&index) = seen.get(&field_name) {
        match self.shadow_policy {
          ShadowPolicy::Reject => {
            return Err(GenError::ShadowedField {
              field: field_name,
              declared_on: field.declared_on,
              shadowed_by: setters[index].declared_on.clone(),
            });
          }
          ShadowPolicy::MostDerived => {
            skipped.push(field);
            continue;
          }
        }
      }

      seen.insert(field_name.clone(), setters.len());
      setters.push(SetterSpec {
        ident: field.ident,
        field_name,
        ty: field.ty,
        declared_on: field.declared_on,
      });
    }

    Ok(BuilderSpec {
      target: decl.type_path(),
      target_name: decl.path_string(),
      wrapper: wrapper_ident(&decl.ident),
      module: builder_module_ident(&decl.ident),
      namespace: decl.module.clone(),
      setters,
      skipped,
      visibility: self.visibility,
    })
  }
}
