//! Validation and `#[test_builder(...)]` attribute parsing.

use syn::{Attribute, Data, DeriveInput, Fields, Ident, Path};

const ATTR: &str = "test_builder";

/// A validated struct ready for expansion.
pub struct ShimInput<'a> {
  pub ident: &'a Ident,
  /// Own fields in declaration order, without the parent link.
  pub fields: Vec<&'a Ident>,
  pub parent: Option<&'a Ident>,
  pub constructor: Option<Path>,
}

/// Accepts structs with named fields or no fields at all.
///
/// Enums and unions get the same message the generator reports for them.
pub fn validate_struct(input: &DeriveInput, derive: &str) -> syn::Result<()> {
  let ident = &input.ident;
  match &input.data {
    Data::Struct(data) => match &data.fields {
      Fields::Named(_) | Fields::Unit => {}
      Fields::Unnamed(_) => {
        return Err(syn::Error::new_spanned(
          ident,
          format!("{derive} can only be used on structs with named fields, not tuple structs"),
        ));
      }
    },
    Data::Enum(_) | Data::Union(_) => {
      return Err(syn::Error::new_spanned(
        ident,
        format!("{derive} annotation can not be used on {ident}"),
      ));
    }
  }

  if !input.generics.params.is_empty() {
    return Err(syn::Error::new_spanned(
      &input.generics,
      format!("{derive} does not support generic types"),
    ));
  }

  Ok(())
}

pub fn parse_input<'a>(input: &'a DeriveInput, derive: &str) -> syn::Result<ShimInput<'a>> {
  validate_struct(input, derive)?;

  let mut fields = Vec::new();
  let mut parent = None;

  if let Data::Struct(data) = &input.data
    && let Fields::Named(named) = &data.fields
  {
    for field in &named.named {
      let Some(ident) = field.ident.as_ref() else {
        return Err(syn::Error::new_spanned(field, "field must have a name"));
      };

      if is_parent(&field.attrs)? {
        if parent.is_some() {
          return Err(syn::Error::new_spanned(
            ident,
            "only one field can be marked #[test_builder(parent)]",
          ));
        }
        parent = Some(ident);
      } else {
        fields.push(ident);
      }
    }
  }

  Ok(ShimInput {
    ident: &input.ident,
    fields,
    parent,
    constructor: parse_constructor(&input.attrs)?,
  })
}

fn is_parent(attrs: &[Attribute]) -> syn::Result<bool> {
  let mut parent = false;
  for attr in attrs.iter().filter(|attr| attr.path().is_ident(ATTR)) {
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

fn parse_constructor(attrs: &[Attribute]) -> syn::Result<Option<Path>> {
  let mut constructor = None;
  for attr in attrs.iter().filter(|attr| attr.path().is_ident(ATTR)) {
    attr.parse_nested_meta(|meta| {
      if meta.path.is_ident("constructor") {
        constructor = Some(meta.value()?.parse::<Path>()?);
        Ok(())
      } else {
        Err(meta.error("unsupported struct attribute; expected `constructor = path`"))
      }
    })?;
  }
  Ok(constructor)
}
