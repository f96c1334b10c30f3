use std::{
  collections::VecDeque,
  path::{Path, PathBuf},
};

use syn::{Expr, ExprLit, Item, Lit, Meta, ext::IdentExt};

use super::{ModulePath, SourceSet, display_path};
use crate::generator::{DEFAULT_ROOT_MODULE, errors::ScanError, metrics::Diagnostic};

/// Walks a crate's module tree from `lib.rs` (or `main.rs`), parsing every file it reaches.
///
/// Out-of-line modules are looked up the way rustc does: `name.rs` or `name/mod.rs` next to
/// the declaring file's module directory, or the file named by `#[path = "..."]`. The root
/// module holding generated builders is never entered.
#[derive(Debug, Clone, bon::Builder)]
pub struct SourceScanner {
  #[builder(into)]
  root: PathBuf,
  #[builder(default = DEFAULT_ROOT_MODULE.to_string(), into)]
  skip_module: String,
}

#[derive(Debug)]
struct PendingFile {
  module: ModulePath,
  candidates: Vec<PathBuf>,
  /// Children of the file live next to it rather than in a directory named after it.
  owns_directory: bool,
  declared_in: Option<PathBuf>,
}

impl SourceScanner {
  /// A scanner for `root` that skips the default builder module.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self::builder().root(root).build()
  }

  pub async fn entry_file(&self) -> Result<PathBuf, ScanError> {
    for name in ["lib.rs", "main.rs"] {
      let candidate = self.root.join(name);
      if tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
        return Ok(candidate);
      }
    }
    Err(ScanError::MissingEntry {
      root: self.root.clone(),
    })
  }

  pub async fn scan(&self) -> Result<SourceSet, ScanError> {
    let entry = self.entry_file().await?;
    let mut sources = SourceSet::new();
    let mut pending = VecDeque::from([PendingFile {
      module: ModulePath::root(),
      candidates: vec![entry],
      owns_directory: true,
      declared_in: None,
    }]);

    while let Some(file) = pending.pop_front() {
      let Some((path, code)) = read_first(&file.candidates).await else {
        match &file.declared_in {
          None => {
            let path = file.candidates.first().cloned().unwrap_or_else(|| self.root.clone());
            let source = tokio::fs::read_to_string(&path)
              .await
              .err()
              .unwrap_or_else(|| std::io::Error::other("unreadable entry file"));
            return Err(ScanError::Read { path, source });
          }
          Some(declared_in) => {
            sources.push_diagnostic(Diagnostic::MissingModuleFile {
              module: file.module.to_string(),
              declared_in: display_path(declared_in),
            });
            continue;
          }
        }
      };

      let file_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
      let child_dir = if file.owns_directory || path.file_name().is_some_and(|name| name == "mod.rs") {
        file_dir.clone()
      } else {
        let stem = path.file_stem().map(PathBuf::from).unwrap_or_default();
        file_dir.join(stem)
      };

      let Some(parsed) = sources.add_source(file.module.clone(), path.clone(), &code) else {
        continue;
      };

      let context = ModuleContext {
        module: file.module,
        child_dir,
        path_dir: file_dir,
      };
      collect_module_files(&parsed.syntax.items, &context, &self.skip_module, &path, &mut pending);
    }

    Ok(sources)
  }
}

async fn read_first(candidates: &[PathBuf]) -> Option<(PathBuf, String)> {
  for candidate in candidates {
    if let Ok(code) = tokio::fs::read_to_string(candidate).await {
      return Some((candidate.clone(), code));
    }
  }
  None
}

struct ModuleContext {
  module: ModulePath,
  /// Where `mod name;` looks for `name.rs` and `name/mod.rs`.
  child_dir: PathBuf,
  /// What `#[path = "..."]` is relative to.
  path_dir: PathBuf,
}

fn collect_module_files(
  items: &[Item],
  context: &ModuleContext,
  skip_module: &str,
  declared_in: &Path,
  pending: &mut VecDeque<PendingFile>,
) {
  for item in items {
    let Item::Mod(item_mod) = item else {
      continue;
    };
    let name = item_mod.ident.unraw().to_string();
    if context.module.is_root() && name == skip_module {
      continue;
    }
    let module = context.module.child(&name);

    match &item_mod.content {
      Some((_, items)) => {
        let nested = ModuleContext {
          module,
          child_dir: context.child_dir.join(&name),
          path_dir: context.child_dir.join(&name),
        };
        collect_module_files(items, &nested, skip_module, declared_in, pending);
      }
      None => {
        let (candidates, owns_directory) = match path_attribute(&item_mod.attrs) {
          Some(path) => (vec![context.path_dir.join(path)], true),
          None => (
            vec![
              context.child_dir.join(format!("{name}.rs")),
              context.child_dir.join(&name).join("mod.rs"),
            ],
            false,
          ),
        };
        pending.push_back(PendingFile {
          module,
          candidates,
          owns_directory,
          declared_in: Some(declared_in.to_path_buf()),
        });
      }
    }
  }
}

fn path_attribute(attrs: &[syn::Attribute]) -> Option<String> {
  attrs.iter().find_map(|attr| match &attr.meta {
    Meta::NameValue(meta) if meta.path.is_ident("path") => match &meta.value {
      Expr::Lit(ExprLit { lit: Lit::Str(value), .. }) => Some(value.value()),
      _ => None,
    },
    _ => None,
  })
}
