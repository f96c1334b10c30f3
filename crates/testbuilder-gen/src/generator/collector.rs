use std::collections::{HashSet, VecDeque};

use syn::{Ident, Path, Type};

use super::{
  errors::GenError,
  registry::{ItemKind, TypeDecl, TypeRegistry},
};

/// One settable field, with its type rewritten to absolute paths.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
  pub ident: Ident,
  pub ty: Type,
  /// Absolute path of the struct that declares the field.
  pub declared_on: String,
  /// 0 for the annotated struct, 1 for its parent, and so on.
  pub depth: usize,
}

impl FieldDescriptor {
  pub fn name(&self) -> String {
    syn::ext::IdentExt::unraw(&self.ident).to_string()
  }
}

#[derive(Debug, Clone)]
pub struct UnresolvedName {
  pub field: String,
  pub name: String,
}

#[derive(Debug, Clone)]
pub struct CollectedFields {
  /// The annotated struct as generated code can name it.
  pub target: Path,
  /// Own fields first, then each ancestor's, nearest ancestor first.
  pub fields: Vec<FieldDescriptor>,
  /// The annotated struct followed by its ancestors.
  pub chain: Vec<String>,
  pub unresolved: Vec<UnresolvedName>,
}

/// Gathers the fields of a struct and of every struct above it in its parent chain.
pub struct FieldCollector<'r> {
  registry: &'r TypeRegistry,
}

impl<'r> FieldCollector<'r> {
  pub fn new(registry: &'r TypeRegistry) -> Self {
    Self { registry }
  }

  /// Walks the parent chain breadth-first.
  ///
  /// The parent link itself is not a settable field. Names repeated between levels are kept;
  /// deciding which one wins is up to the synthesizer.
  pub fn collect(&self, decl: &TypeDecl) -> Result<CollectedFields, GenError> {
    let type_name = decl.path_string();
    if decl.generic {
      return Err(GenError::UnsupportedGenerics { type_name });
    }

    let Some(target) = self.registry.reachable_path(decl) else {
      return Err(GenError::NotReachable {
        path: type_name.clone(),
        type_name,
      });
    };

    let mut collected = CollectedFields {
      target,
      fields: Vec::new(),
      chain: Vec::new(),
      unresolved: Vec::new(),
    };
    let mut visited = HashSet::new();
    let mut queue = VecDeque::from([(decl, 0_usize)]);

    while let Some((current, depth)) = queue.pop_front() {
      let current_name = current.path_string();
      collected.chain.push(current_name.clone());
      if !visited.insert(current_name.clone()) {
        return Err(GenError::InheritanceCycle {
          type_name,
          chain: collected.chain,
        });
      }

      let resolver = self.registry.resolver(&current.module).with_self(current.type_path());
      for field in &current.fields {
        let resolved = resolver.resolve_type(&field.ty);
        if let Some(path) = resolved.unreachable.into_iter().next() {
          return Err(GenError::NotReachable { type_name, path });
        }
        collected
          .unresolved
          .extend(resolved.unresolved.into_iter().map(|name| UnresolvedName {
            field: field.name(),
            name,
          }));
        collected.fields.push(FieldDescriptor {
          ident: field.ident.clone(),
          ty: resolved.ty,
          declared_on: current_name.clone(),
          depth,
        });
      }

      if let Some(parent) = &current.parent {
        let ancestor = self.ancestor_of(current, &parent.ty)?;
        queue.push_back((ancestor, depth + 1));
      }
    }

    Ok(collected)
  }

  fn ancestor_of(&self, child: &TypeDecl, parent_ty: &Type) -> Result<&'r TypeDecl, GenError> {
    let type_name = child.path_string();
    let Some(ancestor) = self.registry.resolve_decl(&child.module, parent_ty) else {
      return Err(GenError::UnresolvedAncestor {
        type_name,
        ancestor: quote::quote!(#parent_ty).to_string().replace(' ', ""),
      });
    };

    let ancestor_name = ancestor.path_string();
    if ancestor.kind != ItemKind::Struct {
      return Err(GenError::AncestorNotStruct {
        type_name,
        ancestor: ancestor_name,
        kind: ancestor.kind.to_string(),
      });
    }
    if ancestor.generic {
      return Err(GenError::UnsupportedGenerics {
        type_name: ancestor_name,
      });
    }
    if !ancestor.marker.has_field_access() {
      return Err(GenError::MissingFieldAccess {
        type_name,
        ancestor: ancestor_name,
      });
    }

    Ok(ancestor)
  }
}
