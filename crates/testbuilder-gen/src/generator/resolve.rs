//! Rewrites type paths written inside one module into paths that mean the same thing from
//! anywhere in the crate.
//!
//! Generated builders live in their own module tree, so `Color` written next to `struct Car`
//! has to become `crate::paint::Color` and `serde_json::Value` has to become
//! `::serde_json::Value`.

use std::{
  collections::{HashMap, HashSet},
  sync::LazyLock,
};

use itertools::Itertools;
use syn::{
  ExprPath, Ident, ItemExternCrate, ItemUse, Path, PathSegment, TraitBound, Type, TypePath, UseTree,
  ext::IdentExt,
  punctuated::Punctuated,
  visit_mut::{self, VisitMut},
};

use super::{naming::ident_for, registry::TypeRegistry, source::ModulePath};

const MAX_ALIAS_DEPTH: usize = 8;

/// Primitives and prelude names, which read the same from every module.
static BUILTIN_NAMES: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "bool", "char", "str", "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32", "i64", "i128", "isize",
    "f32", "f64", "String", "Vec", "Option", "Result", "Box", "Some", "None", "Ok", "Err", "ToString", "ToOwned",
    "Clone", "Copy", "Send", "Sync", "Sized", "Unpin", "Fn", "FnMut", "FnOnce", "Drop", "Iterator", "IntoIterator",
    "DoubleEndedIterator", "ExactSizeIterator", "Extend", "FromIterator", "Default", "Eq", "PartialEq", "Ord",
    "PartialOrd", "AsRef", "AsMut", "Into", "From", "TryFrom", "TryInto",
  ]
  .into_iter()
  .collect()
});

/// The path of a `use` item, before it is resolved against its module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsePath {
  pub leading_colon: bool,
  pub segments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
  /// Segments after `crate::`.
  Crate(Vec<String>),
  /// Segments after `::`, starting with the crate name.
  Extern(Vec<String>),
  /// A primitive or prelude name, left as written.
  Builtin,
  Unresolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
  Type,
  Use,
}

/// The names one module brings into scope: its own items and its imports.
#[derive(Debug, Default, Clone)]
pub struct ImportScope {
  locals: HashSet<String>,
  imports: HashMap<String, UsePath>,
  globs: Vec<UsePath>,
  /// Aliases brought in by a `use` that the whole crate can see.
  exports: HashSet<String>,
  exported_globs: Vec<UsePath>,
}

impl ImportScope {
  pub(crate) fn add_local(&mut self, ident: &Ident) {
    self.locals.insert(ident.unraw().to_string());
  }

  /// `exported` marks a `use` whose aliases other modules can name through this one.
  pub(crate) fn add_use(&mut self, item: &ItemUse, exported: bool) {
    let mut prefix = Vec::new();
    self.add_use_tree(&item.tree, item.leading_colon.is_some(), exported, &mut prefix);
  }

  fn add_use_tree(&mut self, tree: &UseTree, leading_colon: bool, exported: bool, prefix: &mut Vec<String>) {
    match tree {
      UseTree::Path(path) => {
        prefix.push(path.ident.unraw().to_string());
        self.add_use_tree(&path.tree, leading_colon, exported, prefix);
        prefix.pop();
      }
      UseTree::Name(name) => self.add_import(leading_colon, exported, prefix, &name.ident, None),
      UseTree::Rename(rename) => {
        self.add_import(leading_colon, exported, prefix, &rename.ident, Some(&rename.rename));
      }
      UseTree::Glob(_) => {
        let glob = UsePath {
          leading_colon,
          segments: prefix.clone(),
        };
        if exported {
          self.exported_globs.push(glob.clone());
        }
        self.globs.push(glob);
      }
      UseTree::Group(group) => {
        for tree in &group.items {
          self.add_use_tree(tree, leading_colon, exported, prefix);
        }
      }
    }
  }

  fn add_import(
    &mut self,
    leading_colon: bool,
    exported: bool,
    prefix: &[String],
    ident: &Ident,
    rename: Option<&Ident>,
  ) {
    let name = ident.unraw().to_string();
    let mut segments = prefix.to_vec();
    if name != "self" {
      segments.push(name.clone());
    }

    let alias = match rename {
      Some(rename) => rename.unraw().to_string(),
      None if name == "self" => match prefix.last() {
        Some(last) => last.clone(),
        None => return,
      },
      None => name,
    };
    if alias == "_" {
      return;
    }

    if exported {
      self.exports.insert(alias.clone());
    }
    self.imports.entry(alias).or_insert(UsePath {
      leading_colon,
      segments,
    });
  }

  pub(crate) fn add_extern_crate(&mut self, item: &ItemExternCrate) {
    let name = item.ident.unraw().to_string();
    let alias = item
      .rename
      .as_ref()
      .map_or_else(|| name.clone(), |(_, rename)| rename.unraw().to_string());
    if alias == "_" {
      return;
    }

    let path = if name == "self" {
      UsePath {
        leading_colon: false,
        segments: vec!["crate".to_string()],
      }
    } else {
      UsePath {
        leading_colon: true,
        segments: vec![name],
      }
    };
    self.imports.insert(alias, path);
  }

  pub(crate) fn merge(&mut self, other: Self) {
    self.locals.extend(other.locals);
    for (alias, path) in other.imports {
      self.imports.entry(alias).or_insert(path);
    }
    self.globs.extend(other.globs);
    self.exports.extend(other.exports);
    self.exported_globs.extend(other.exported_globs);
  }

  pub fn has_local(&self, name: &str) -> bool {
    self.locals.contains(name)
  }

  pub fn import(&self, name: &str) -> Option<&UsePath> {
    self.imports.get(name)
  }

  pub fn globs(&self) -> &[UsePath] {
    &self.globs
  }

  /// Imports other modules can name through this one, keyed by alias.
  pub fn exports(&self) -> impl Iterator<Item = (&str, &UsePath)> {
    self
      .exports
      .iter()
      .filter_map(|alias| Some((alias.as_str(), self.imports.get(alias)?)))
  }

  pub fn exported_globs(&self) -> &[UsePath] {
    &self.exported_globs
  }
}

/// A field type rewritten to absolute paths.
#[derive(Debug, Clone)]
pub struct ResolvedType {
  pub ty: Type,
  /// Paths left as written because nothing in scope declares them.
  pub unresolved: Vec<String>,
  /// Crate paths that are private to their module and have no visible re-export.
  pub unreachable: Vec<String>,
}

pub struct TypeResolver<'r> {
  registry: &'r TypeRegistry,
  module: ModulePath,
  self_path: Option<Path>,
}

impl<'r> TypeResolver<'r> {
  pub(crate) fn new(registry: &'r TypeRegistry, module: ModulePath) -> Self {
    Self {
      registry,
      module,
      self_path: None,
    }
  }

  /// What `Self` expands to.
  #[must_use]
  pub fn with_self(mut self, path: Path) -> Self {
    self.self_path = Some(path);
    self
  }

  pub fn resolve_path(&self, path: &Path) -> Resolution {
    let segments = path
      .segments
      .iter()
      .map(|segment| segment.ident.unraw().to_string())
      .collect::<Vec<_>>();
    self.resolve_in(&self.module, path.leading_colon.is_some(), &segments, Lookup::Type, 0)
  }

  pub(crate) fn resolve_import(&self, import: &UsePath) -> Resolution {
    self.resolve_in(&self.module, import.leading_colon, &import.segments, Lookup::Use, 0)
  }

  pub fn resolve_type(&self, ty: &Type) -> ResolvedType {
    let mut ty = ty.clone();
    let mut rewriter = PathRewriter {
      resolver: self,
      unresolved: Vec::new(),
      unreachable: Vec::new(),
    };
    rewriter.visit_type_mut(&mut ty);
    ResolvedType {
      ty,
      unresolved: rewriter.unresolved,
      unreachable: rewriter.unreachable,
    }
  }

  fn resolve_in(
    &self,
    module: &ModulePath,
    leading_colon: bool,
    segments: &[String],
    lookup: Lookup,
    depth: usize,
  ) -> Resolution {
    if depth > MAX_ALIAS_DEPTH {
      return Resolution::Unresolved;
    }
    if leading_colon {
      return Resolution::Extern(segments.to_vec());
    }
    let Some((first, rest)) = segments.split_first() else {
      return Resolution::Unresolved;
    };

    match first.as_str() {
      "crate" => Resolution::Crate(rest.to_vec()),
      "self" => Resolution::Crate(join(module.segments(), rest)),
      "super" => {
        let mut target = module.parent();
        let mut rest = rest;
        while let Some((next, remaining)) = rest.split_first()
          && next == "super"
        {
          target = target.and_then(|module| module.parent());
          rest = remaining;
        }
        match target {
          Some(target) => Resolution::Crate(join(target.segments(), rest)),
          None => Resolution::Unresolved,
        }
      }
      name => self.resolve_name(module, name, segments, lookup, depth),
    }
  }

  fn resolve_name(
    &self,
    module: &ModulePath,
    name: &str,
    segments: &[String],
    lookup: Lookup,
    depth: usize,
  ) -> Resolution {
    let rest = &segments[1..];

    if let Some(scope) = self.registry.scope(module) {
      if scope.has_local(name) {
        return Resolution::Crate(join(module.segments(), segments));
      }

      if let Some(import) = scope.import(name) {
        return match self.resolve_in(module, import.leading_colon, &import.segments, Lookup::Use, depth + 1) {
          Resolution::Crate(target) => Resolution::Crate(join(&target, rest)),
          Resolution::Extern(target) => Resolution::Extern(join(&target, rest)),
          other => other,
        };
      }

      for glob in scope.globs() {
        let Resolution::Crate(target) = self.resolve_in(module, glob.leading_colon, &glob.segments, Lookup::Use, depth + 1)
        else {
          continue;
        };
        let target = ModulePath::from_segments(target);
        let declares = self
          .registry
          .scope(&target)
          .is_some_and(|scope| scope.has_local(name) || scope.import(name).is_some());
        if declares {
          return self.resolve_in(&target, false, segments, lookup, depth + 1);
        }
      }
    }

    if BUILTIN_NAMES.contains(name) {
      return Resolution::Builtin;
    }

    match lookup {
      Lookup::Use => Resolution::Extern(segments.to_vec()),
      Lookup::Type if !rest.is_empty() => Resolution::Extern(segments.to_vec()),
      Lookup::Type => Resolution::Unresolved,
    }
  }
}

fn join(prefix: &[String], rest: &[String]) -> Vec<String> {
  prefix.iter().chain(rest).cloned().collect()
}

struct PathRewriter<'a, 'r> {
  resolver: &'a TypeResolver<'r>,
  unresolved: Vec<String>,
  unreachable: Vec<String>,
}

impl PathRewriter<'_, '_> {
  fn rewrite(&mut self, path: &mut Path) {
    if path.leading_colon.is_some() {
      return;
    }

    if path.segments.first().is_some_and(|first| first.ident == "Self") {
      let Some(self_path) = &self.resolver.self_path else {
        return;
      };
      let mut rewritten = self_path.clone();
      rewritten.segments.extend(path.segments.iter().skip(1).cloned());
      *path = rewritten;
    }

    match self.resolver.resolve_path(path) {
      Resolution::Crate(segments) => {
        let segments = match self.resolver.registry.visible_path(&segments) {
          Some(visible) => visible,
          None => {
            self.unreachable.push(crate_path(&segments));
            segments
          }
        };
        let segments = std::iter::once("crate".to_string()).chain(segments).collect::<Vec<_>>();
        *path = rebuild(path, false, &segments);
      }
      Resolution::Extern(segments) => *path = rebuild(path, true, &segments),
      Resolution::Builtin => {}
      Resolution::Unresolved => self.unresolved.push(written(path)),
    }
  }
}

impl VisitMut for PathRewriter<'_, '_> {
  fn visit_type_path_mut(&mut self, node: &mut TypePath) {
    if node.qself.is_none() {
      self.rewrite(&mut node.path);
    }
    visit_mut::visit_type_path_mut(self, node);
  }

  fn visit_expr_path_mut(&mut self, node: &mut ExprPath) {
    if node.qself.is_none() {
      self.rewrite(&mut node.path);
    }
    visit_mut::visit_expr_path_mut(self, node);
  }

  fn visit_trait_bound_mut(&mut self, node: &mut TraitBound) {
    self.rewrite(&mut node.path);
    visit_mut::visit_trait_bound_mut(self, node);
  }
}

/// Builds a path from `segments`, keeping the generic arguments of the original last segment.
fn rebuild(original: &Path, leading_colon: bool, segments: &[String]) -> Path {
  let mut path = Path {
    leading_colon: leading_colon.then(Default::default),
    segments: Punctuated::new(),
  };
  for segment in segments {
    path.segments.push(PathSegment::from(ident_for(segment)));
  }
  if let (Some(last), Some(original_last)) = (path.segments.last_mut(), original.segments.last()) {
    last.arguments = original_last.arguments.clone();
  }
  path
}

fn crate_path(segments: &[String]) -> String {
  std::iter::once("crate")
    .chain(segments.iter().map(String::as_str))
    .join("::")
}

fn written(path: &Path) -> String {
  path
    .segments
    .iter()
    .map(|segment| segment.ident.to_string())
    .join("::")
}
