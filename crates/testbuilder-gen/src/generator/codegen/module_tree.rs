use std::{collections::BTreeMap, path::Path};

use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;

use super::{GeneratedFile, SINGLE_FILE_NAME, Visibility, format_source, with_header};
use crate::generator::{errors::GenError, naming::ident_for, source::ModulePath};

#[derive(Debug, Clone)]
pub struct RenderedBuilder {
  pub module: Ident,
  pub wrapper: Ident,
  /// Absolute path of the struct the builder is for.
  pub owner: String,
  pub contents: TokenStream,
}

/// Generated builders arranged by namespace, mirroring the crate's own module tree.
#[derive(Debug, Default)]
pub struct ModuleTree {
  builders: Vec<RenderedBuilder>,
  children: BTreeMap<String, ModuleTree>,
}

impl ModuleTree {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_empty(&self) -> bool {
    self.builders.is_empty() && self.children.values().all(ModuleTree::is_empty)
  }

  pub fn len(&self) -> usize {
    self.builders.len() + self.children.values().map(ModuleTree::len).sum::<usize>()
  }

  /// Adds `builder` under `namespace`.
  ///
  /// Fails without changing the tree when a builder module and a namespace module would
  /// share a name.
  pub fn insert(&mut self, namespace: &ModulePath, builder: RenderedBuilder) -> Result<(), GenError> {
    self.check(namespace, &builder.module)?;

    let mut node = self;
    for segment in namespace.segments() {
      node = node.children.entry(segment.clone()).or_default();
    }
    node.builders.push(builder);
    Ok(())
  }

  fn check(&self, namespace: &ModulePath, module: &Ident) -> Result<(), GenError> {
    let mut node = Some(self);
    let mut walked = ModulePath::root();

    for segment in namespace.segments() {
      if let Some(current) = node
        && current.builders.iter().any(|builder| builder.module == segment)
      {
        return Err(GenError::ModuleNameCollision {
          namespace: walked.to_string(),
          name: segment.clone(),
        });
      }
      walked = walked.child(segment);
      node = node.and_then(|current| current.children.get(segment));
    }

    let name = module.to_string();
    if let Some(current) = node
      && (current.children.contains_key(&name) || current.builders.iter().any(|builder| builder.module == name))
    {
      return Err(GenError::ModuleNameCollision {
        namespace: walked.to_string(),
        name,
      });
    }
    Ok(())
  }

  /// Everything in one file, namespaces as inline modules.
  pub fn render_single_file(&self, visibility: Visibility) -> anyhow::Result<GeneratedFile> {
    let tokens = self.inline_tokens(&visibility.to_tokens());
    let code = if tokens.is_empty() {
      String::new()
    } else {
      format_source(tokens)?
    };

    Ok(GeneratedFile {
      path: SINGLE_FILE_NAME.into(),
      code: with_header(&code),
      owner: None,
    })
  }

  /// A `mod.rs` per namespace and a file per builder. An empty tree renders no files.
  pub fn render_tree(&self, visibility: Visibility) -> anyhow::Result<Vec<GeneratedFile>> {
    let mut files = Vec::new();
    if !self.is_empty() {
      self.tree_files(Path::new(""), &visibility.to_tokens(), &mut files)?;
    }
    Ok(files)
  }

  fn inline_tokens(&self, vis: &TokenStream) -> TokenStream {
    let builders = self.builders.iter().map(|builder| {
      let module = &builder.module;
      let wrapper = &builder.wrapper;
      let contents = &builder.contents;
      quote! {
        #[allow(dead_code)]
        #vis mod #module {
          #contents
        }
        #[allow(unused_imports)]
        #vis use #module::#wrapper;
      }
    });
    let children = self.children.iter().filter(|(_, child)| !child.is_empty()).map(|(name, child)| {
      let ident = ident_for(name);
      let inner = child.inline_tokens(vis);
      quote! {
        #vis mod #ident {
          #inner
        }
      }
    });

    quote! {
      #(#builders)*
      #(#children)*
    }
  }

  fn tree_files(&self, dir: &Path, vis: &TokenStream, files: &mut Vec<GeneratedFile>) -> anyhow::Result<()> {
    let builder_decls = self.builders.iter().map(|builder| {
      let module = &builder.module;
      let wrapper = &builder.wrapper;
      quote! {
        #[allow(dead_code)]
        #vis mod #module;
        #[allow(unused_imports)]
        #vis use #module::#wrapper;
      }
    });
    let children = self.children.iter().filter(|(_, child)| !child.is_empty()).collect::<Vec<_>>();
    let child_decls = children.iter().map(|(name, _)| {
      let ident = ident_for(name);
      quote! { #vis mod #ident; }
    });

    let mod_file = quote! {
      #(#builder_decls)*
      #(#child_decls)*
    };
    files.push(GeneratedFile {
      path: dir.join("mod.rs"),
      code: with_header(&format_source(mod_file)?),
      owner: None,
    });

    for builder in &self.builders {
      files.push(GeneratedFile {
        path: dir.join(format!("{}.rs", builder.module)),
        code: with_header(&format_source(builder.contents.clone())?),
        owner: Some(builder.owner.clone()),
      });
    }

    for (name, child) in children {
      child.tree_files(&dir.join(name), vis, files)?;
    }
    Ok(())
  }
}
