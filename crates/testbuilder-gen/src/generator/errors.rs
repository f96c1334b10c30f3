use std::path::PathBuf;

/// Why a single annotated type produced no builder.
///
/// Each error is reported as a [`Diagnostic::GenerationFailed`](super::metrics::Diagnostic) for
/// its type; generation of the other types continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenError {
  #[error("parent `{ancestor}` of `{type_name}` does not name a struct known to this crate")]
  UnresolvedAncestor { type_name: String, ancestor: String },

  #[error("parent `{ancestor}` of `{type_name}` is declared as {kind}; only structs with named fields can be parents")]
  AncestorNotStruct {
    type_name: String,
    ancestor: String,
    kind: String,
  },

  #[error("parent `{ancestor}` of `{type_name}` must derive `FieldAccess` or `TestBuilder`")]
  MissingFieldAccess { type_name: String, ancestor: String },

  #[error("`{type_name}` is a tuple struct; builders need named fields")]
  UnnamedFields { type_name: String },

  #[error("`{type_name}` is generic; generic types are not supported")]
  UnsupportedGenerics { type_name: String },

  #[error("inheritance cycle through `{type_name}`: {}", chain.join(" -> "))]
  InheritanceCycle { type_name: String, chain: Vec<String> },

  #[error("field `{field}` of `{declared_on}` is shadowed by `{shadowed_by}`; set shadow policy to most-derived to keep only the nearest setter")]
  ShadowedField {
    field: String,
    declared_on: String,
    shadowed_by: String,
  },

  #[error("field `{field}` of `{declared_on}` would produce a setter named `{field}`, which the builder reserves")]
  ReservedSetterName { field: String, declared_on: String },

  #[error("builder for `{type_name}` cannot name `{path}`: it is private to its module and has no crate-visible re-export")]
  NotReachable { type_name: String, path: String },

  #[error("`{name}` in `{namespace}` is claimed by both a builder module and a namespace module")]
  ModuleNameCollision { namespace: String, name: String },
}

/// Failures that stop a scan before any type is examined.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
  #[error("no `lib.rs` or `main.rs` under {}", root.display())]
  MissingEntry { root: PathBuf },

  #[error("failed to read {}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}
