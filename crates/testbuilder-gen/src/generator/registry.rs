//! Every struct, enum and union declared in the scanned crate, keyed by absolute path.

use std::collections::HashMap;

use indexmap::IndexMap;
use itertools::Itertools;
use proc_macro2::TokenStream;
use strum::Display;
use syn::{
  Attribute, Fields, Ident, Item, ItemStruct, Meta, Path, PathSegment, Token, Type, ext::IdentExt,
  punctuated::Punctuated,
};

use super::{
  metrics::Diagnostic,
  naming::ident_for,
  resolve::{ImportScope, Resolution, TypeResolver},
  source::{ModulePath, SourceSet},
};

const MARKER_TEST_BUILDER: &str = "TestBuilder";
const MARKER_FIELD_ACCESS: &str = "FieldAccess";
const HELPER_ATTR: &str = "test_builder";
const MAX_REEXPORT_DEPTH: usize = 8;

/// Which of the derives a type carries. `TestBuilder` implies the `FieldAccess` shim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Marker {
  #[default]
  None,
  FieldAccess,
  TestBuilder,
}

impl Marker {
  pub fn has_field_access(self) -> bool {
    self != Self::None
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ItemKind {
  #[strum(to_string = "struct")]
  Struct,
  #[strum(to_string = "tuple struct")]
  TupleStruct,
  #[strum(to_string = "enum")]
  Enum,
  #[strum(to_string = "union")]
  Union,
}

/// A field exactly as written in the source.
#[derive(Debug, Clone)]
pub struct DeclaredField {
  pub ident: Ident,
  pub ty: Type,
}

impl DeclaredField {
  pub fn name(&self) -> String {
    self.ident.unraw().to_string()
  }
}

#[derive(Debug, Clone)]
pub struct TypeDecl {
  pub module: ModulePath,
  pub ident: Ident,
  pub kind: ItemKind,
  pub marker: Marker,
  pub generic: bool,
  /// Own fields in declaration order, excluding the parent link.
  pub fields: Vec<DeclaredField>,
  /// The field marked `#[test_builder(parent)]`.
  pub parent: Option<DeclaredField>,
}

impl TypeDecl {
  pub fn name(&self) -> String {
    self.ident.unraw().to_string()
  }

  /// `crate::shapes::Point`.
  pub fn path_string(&self) -> String {
    self.module.item_path(&self.name())
  }

  pub fn path_tokens(&self) -> TokenStream {
    let module = self.module.to_tokens();
    let ident = &self.ident;
    quote::quote! { #module::#ident }
  }

  pub fn type_path(&self) -> Path {
    syn::parse2(self.path_tokens()).unwrap_or_else(|_| Path::from(self.ident.clone()))
  }

  /// Module segments followed by the type's name, without the leading `crate`.
  pub fn segments(&self) -> Vec<String> {
    let mut segments = self.module.segments().to_vec();
    segments.push(self.name());
    segments
  }

  fn from_struct(item: &ItemStruct, module: &ModulePath, diagnostics: &mut Vec<Diagnostic>) -> Self {
    let kind = match &item.fields {
      Fields::Named(_) | Fields::Unit => ItemKind::Struct,
      Fields::Unnamed(_) => ItemKind::TupleStruct,
    };
    let mut fields = Vec::new();
    let mut parent = None;

    if let Fields::Named(named) = &item.fields {
      for field in &named.named {
        let Some(ident) = field.ident.clone() else {
          continue;
        };
        let declared = DeclaredField {
          ident,
          ty: field.ty.clone(),
        };
        let is_parent = is_parent_field(&field.attrs).unwrap_or_else(|error| {
          diagnostics.push(Diagnostic::InvalidFieldAttribute {
            type_name: module.item_path(&item.ident.unraw().to_string()),
            field: declared.name(),
            error: error.to_string(),
          });
          false
        });
        if parent.is_none() && is_parent {
          parent = Some(declared);
        } else {
          fields.push(declared);
        }
      }
    }

    Self {
      module: module.clone(),
      ident: item.ident.clone(),
      kind,
      marker: marker_of(&item.attrs),
      generic: !item.generics.params.is_empty(),
      fields,
      parent,
    }
  }

  fn fieldless(ident: &Ident, kind: ItemKind, attrs: &[Attribute], generic: bool, module: &ModulePath) -> Self {
    Self {
      module: module.clone(),
      ident: ident.clone(),
      kind,
      marker: marker_of(attrs),
      generic,
      fields: Vec::new(),
      parent: None,
    }
  }
}

#[derive(Debug, Default)]
pub struct TypeRegistry {
  types: IndexMap<String, TypeDecl>,
  scopes: IndexMap<ModulePath, ImportScope>,
  /// Whether each declared item and module can be named from anywhere in the crate.
  crate_visible: HashMap<String, bool>,
  diagnostics: Vec<Diagnostic>,
}

impl TypeRegistry {
  pub fn build(sources: &SourceSet) -> Self {
    let mut registry = Self::default();
    for file in sources.files() {
      registry.register_items(&file.syntax.items, &file.module);
    }
    registry
  }

  fn register_items(&mut self, items: &[Item], module: &ModulePath) {
    let mut scope = ImportScope::default();
    let mut inline_modules = Vec::new();

    for item in items {
      match item {
        Item::Struct(item) => {
          scope.add_local(&item.ident);
          self.record_visibility(module, &item.ident, &item.vis);
          let decl = TypeDecl::from_struct(item, module, &mut self.diagnostics);
          self.insert(decl);
        }
        Item::Enum(item) => {
          scope.add_local(&item.ident);
          self.record_visibility(module, &item.ident, &item.vis);
          let generic = !item.generics.params.is_empty();
          self.insert(TypeDecl::fieldless(&item.ident, ItemKind::Enum, &item.attrs, generic, module));
        }
        Item::Union(item) => {
          scope.add_local(&item.ident);
          self.record_visibility(module, &item.ident, &item.vis);
          let generic = !item.generics.params.is_empty();
          self.insert(TypeDecl::fieldless(&item.ident, ItemKind::Union, &item.attrs, generic, module));
        }
        Item::Type(item) => {
          scope.add_local(&item.ident);
          self.record_visibility(module, &item.ident, &item.vis);
        }
        Item::Trait(item) => {
          scope.add_local(&item.ident);
          self.record_visibility(module, &item.ident, &item.vis);
        }
        Item::TraitAlias(item) => {
          scope.add_local(&item.ident);
          self.record_visibility(module, &item.ident, &item.vis);
        }
        Item::Const(item) => {
          scope.add_local(&item.ident);
          self.record_visibility(module, &item.ident, &item.vis);
        }
        Item::Static(item) => {
          scope.add_local(&item.ident);
          self.record_visibility(module, &item.ident, &item.vis);
        }
        Item::Use(item) => scope.add_use(item, crate_visible(&item.vis, module)),
        Item::ExternCrate(item) => scope.add_extern_crate(item),
        Item::Mod(item) => {
          scope.add_local(&item.ident);
          self.record_visibility(module, &item.ident, &item.vis);
          if let Some((_, items)) = &item.content {
            inline_modules.push((module.child(&item.ident.unraw().to_string()), items));
          }
        }
        _ => {}
      }
    }

    self.scopes.entry(module.clone()).or_default().merge(scope);

    for (child, items) in inline_modules {
      self.register_items(items, &child);
    }
  }

  fn insert(&mut self, decl: TypeDecl) {
    self.types.entry(decl.path_string()).or_insert(decl);
  }

  fn record_visibility(&mut self, module: &ModulePath, ident: &Ident, vis: &syn::Visibility) {
    self
      .crate_visible
      .entry(module.item_path(&ident.unraw().to_string()))
      .or_insert_with(|| crate_visible(vis, module));
  }

  pub fn get(&self, path: &str) -> Option<&TypeDecl> {
    self.types.get(path)
  }

  /// Warnings found while reading declarations, such as malformed helper attributes.
  pub fn diagnostics(&self) -> &[Diagnostic] {
    &self.diagnostics
  }

  /// Types carrying `#[derive(TestBuilder)]`, whatever kind of item they are.
  pub fn annotated(&self) -> impl Iterator<Item = &TypeDecl> {
    self.types.values().filter(|decl| decl.marker == Marker::TestBuilder)
  }

  pub fn scope(&self, module: &ModulePath) -> Option<&ImportScope> {
    self.scopes.get(module)
  }

  pub fn len(&self) -> usize {
    self.types.len()
  }

  pub fn is_empty(&self) -> bool {
    self.types.is_empty()
  }

  /// A resolver for type paths written inside `module`.
  pub fn resolver<'r>(&'r self, module: &ModulePath) -> TypeResolver<'r> {
    TypeResolver::new(self, module.clone())
  }

  /// Finds the declaration `ty`, written inside `module`, refers to.
  ///
  /// Follows `use` aliases and `pub use` re-exports.
  pub fn resolve_decl(&self, module: &ModulePath, ty: &Type) -> Option<&TypeDecl> {
    let Type::Path(type_path) = ty else {
      return None;
    };
    if type_path.qself.is_some() {
      return None;
    }
    match self.resolver(module).resolve_path(&type_path.path) {
      Resolution::Crate(segments) => self.lookup(&segments, 0),
      Resolution::Extern(_) | Resolution::Builtin | Resolution::Unresolved => None,
    }
  }

  /// A path to the item at `segments` that generated code can name.
  ///
  /// Types are named by their declaring path when every module along it is visible crate-wide,
  /// otherwise by the shortest visible re-export. `None` means neither exists.
  pub fn visible_path(&self, segments: &[String]) -> Option<Vec<String>> {
    let canonical = self.canonical(segments);
    if self.path_visible(&canonical) {
      return Some(canonical);
    }
    self.reexport_of(&canonical)
  }

  /// `decl` as a `crate::` path generated code can name.
  pub fn reachable_path(&self, decl: &TypeDecl) -> Option<Path> {
    let segments = self.visible_path(&decl.segments())?;
    let mut path = Path {
      leading_colon: None,
      segments: Punctuated::new(),
    };
    for segment in std::iter::once("crate").chain(segments.iter().map(String::as_str)) {
      path.segments.push(PathSegment::from(ident_for(segment)));
    }
    Some(path)
  }

  fn canonical(&self, segments: &[String]) -> Vec<String> {
    self
      .lookup(segments, 0)
      .map_or_else(|| segments.to_vec(), TypeDecl::segments)
  }

  /// Items without a recorded declaration, such as modules listed only by file, count as visible.
  fn path_visible(&self, segments: &[String]) -> bool {
    (1..=segments.len()).all(|len| {
      self
        .crate_visible
        .get(&crate_key(&segments[..len]))
        .is_none_or(|visible| *visible)
    })
  }

  fn reexport_of(&self, target: &[String]) -> Option<Vec<String>> {
    let name = target.last()?;
    let mut best: Option<Vec<String>> = None;

    for (module, scope) in &self.scopes {
      if !self.path_visible(module.segments()) {
        continue;
      }
      let resolver = self.resolver(module);
      let mut candidates = Vec::new();

      for (alias, import) in scope.exports() {
        if let Resolution::Crate(found) = resolver.resolve_import(import)
          && self.canonical(&found) == target
        {
          candidates.push(alias.to_string());
        }
      }
      for glob in scope.exported_globs() {
        if let Resolution::Crate(mut found) = resolver.resolve_import(glob) {
          found.push(name.clone());
          if self.canonical(&found) == target {
            candidates.push(name.clone());
          }
        }
      }

      for alias in candidates {
        let mut path = module.segments().to_vec();
        path.push(alias);
        if best.as_ref().is_none_or(|best| path.len() < best.len()) {
          best = Some(path);
        }
      }
    }

    best
  }

  fn lookup(&self, segments: &[String], depth: usize) -> Option<&TypeDecl> {
    if let Some(decl) = self.types.get(&crate_key(segments)) {
      return Some(decl);
    }
    if depth >= MAX_REEXPORT_DEPTH {
      return None;
    }

    let (name, module_segments) = segments.split_last()?;
    let module = ModulePath::from_segments(module_segments.iter().cloned());
    let scope = self.scope(&module)?;
    let resolver = self.resolver(&module);

    if let Some(import) = scope.import(name)
      && let Resolution::Crate(target) = resolver.resolve_import(import)
    {
      return self.lookup(&target, depth + 1);
    }

    scope.globs().iter().find_map(|glob| match resolver.resolve_import(glob) {
      Resolution::Crate(mut target) => {
        target.push(name.clone());
        self.lookup(&target, depth + 1)
      }
      _ => None,
    })
  }
}

/// Whether an item declared in `module` with `vis` can be named from every module of the crate.
fn crate_visible(vis: &syn::Visibility, module: &ModulePath) -> bool {
  match vis {
    syn::Visibility::Public(_) => true,
    syn::Visibility::Inherited => module.is_root(),
    syn::Visibility::Restricted(restricted) => {
      let path = &restricted.path;
      if path.is_ident("crate") {
        return true;
      }
      if path.is_ident("self") {
        return module.is_root();
      }
      let supers = path.segments.iter().take_while(|segment| segment.ident == "super").count();
      supers == path.segments.len() && module.segments().len() <= supers
    }
  }
}

fn crate_key(segments: &[String]) -> String {
  std::iter::once("crate")
    .chain(segments.iter().map(String::as_str))
    .join("::")
}

/// Reads derives from `#[derive(...)]` and `#[cfg_attr(..., derive(...))]`.
///
/// Any path ending in `TestBuilder` or `FieldAccess` counts, so `testbuilder::TestBuilder`
/// and a bare imported `TestBuilder` are both recognised.
pub(crate) fn marker_of(attrs: &[Attribute]) -> Marker {
  let mut marker = Marker::None;
  for attr in attrs {
    for path in derive_paths(attr) {
      let Some(last) = path.segments.last() else {
        continue;
      };
      if last.ident == MARKER_TEST_BUILDER {
        marker = marker.max(Marker::TestBuilder);
      } else if last.ident == MARKER_FIELD_ACCESS {
        marker = marker.max(Marker::FieldAccess);
      }
    }
  }
  marker
}

fn derive_paths(attr: &Attribute) -> Vec<Path> {
  if attr.path().is_ident("derive") {
    return attr
      .parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated)
      .map(|paths| paths.into_iter().collect())
      .unwrap_or_default();
  }

  if attr.path().is_ident("cfg_attr") {
    let Ok(metas) = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated) else {
      return Vec::new();
    };
    return metas
      .into_iter()
      .skip(1)
      .filter_map(|meta| match meta {
        Meta::List(list) if list.path.is_ident("derive") => list
          .parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated)
          .ok(),
        _ => None,
      })
      .flatten()
      .collect();
  }

  Vec::new()
}

fn is_parent_field(attrs: &[Attribute]) -> syn::Result<bool> {
  let mut parent = false;
  for attr in attrs.iter().filter(|attr| attr.path().is_ident(HELPER_ATTR)) {
    attr.parse_nested_meta(|meta| {
      if meta.path.is_ident("parent") {
        parent = true;
        Ok(())
      } else {
        Err(meta.error("unsupported field attribute; expected `parent`"))
      }
    })?;
  }
  Ok(parent)
}
