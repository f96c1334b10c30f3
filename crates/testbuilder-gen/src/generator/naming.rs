use std::{collections::HashSet, sync::LazyLock};

use itertools::Itertools;
use quote::format_ident;
use syn::{Ident, ext::IdentExt};

/// Method names every builder defines itself; a field with one of these names cannot get a setter.
pub(crate) const RESERVED_SETTER_NAMES: [&str; 4] = ["new", "try_new", "build", "set_field"];

pub(crate) static FORBIDDEN_IDENTIFIERS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in",
    "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "async", "await", "dyn", "try", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "gen", "self", "Self",
  ]
  .into_iter()
  .collect()
});

/// Splits a PascalCase string into words.
/// Handles adjacent uppercase letters correctly (e.g., `"XMLParser"` -> `["XML", "Parser"]`).
pub(crate) fn split_pascal_case(name: &str) -> Vec<String> {
  let mut words = vec![];

  for part in name.split('_').filter(|part| !part.is_empty()) {
    let chars: Vec<char> = part.chars().collect();
    let mut current_word = String::new();

    for (i, &ch) in chars.iter().enumerate() {
      if ch.is_uppercase() && !current_word.is_empty() {
        let prev_is_lower = i > 0 && chars[i - 1].is_lowercase();
        let next_is_lower = i + 1 < chars.len() && chars[i + 1].is_lowercase();

        if prev_is_lower || next_is_lower {
          words.push(std::mem::take(&mut current_word));
        }
      }
      current_word.push(ch);
    }

    if !current_word.is_empty() {
      words.push(current_word);
    }
  }

  words
}

/// `Point` -> `TPoint`.
pub(crate) fn wrapper_ident(type_ident: &Ident) -> Ident {
  format_ident!("T{}", type_ident.unraw())
}

/// `HttpServer` -> `t_http_server`.
pub(crate) fn builder_module_ident(type_ident: &Ident) -> Ident {
  let words = split_pascal_case(&type_ident.unraw().to_string());
  let snake = words.iter().map(|word| word.to_lowercase()).join("_");
  format_ident!("t_{snake}")
}

/// Builds an identifier for `name`, using the raw form for keywords.
pub(crate) fn ident_for(name: &str) -> Ident {
  if FORBIDDEN_IDENTIFIERS.contains(name) && !matches!(name, "self" | "Self" | "crate" | "super") {
    Ident::new_raw(name, proc_macro2::Span::call_site())
  } else {
    format_ident!("{name}")
  }
}

pub(crate) fn is_reserved_setter(name: &str) -> bool {
  RESERVED_SETTER_NAMES.contains(&name)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_split_pascal_case() {
    let cases: [(&str, &[&str]); 5] = [
      ("Point", &["Point"]),
      ("HttpServer", &["Http", "Server"]),
      ("XMLParser", &["XML", "Parser"]),
      ("Legacy_Type", &["Legacy", "Type"]),
      ("", &[]),
    ];
    for (input, expected) in cases {
      assert_eq!(split_pascal_case(input), expected, "failed for input {input:?}");
    }
  }

  #[test]
  fn test_builder_names() {
    let cases = [
      ("Point", "TPoint", "t_point"),
      ("HttpServer", "THttpServer", "t_http_server"),
      ("XMLParser", "TXMLParser", "t_xml_parser"),
    ];
    for (input, wrapper, module) in cases {
      let ident = format_ident!("{input}");
      assert_eq!(wrapper_ident(&ident), wrapper);
      assert_eq!(builder_module_ident(&ident), module);
    }
  }

  #[test]
  fn test_raw_type_ident_is_unrawed() {
    let ident = Ident::new_raw("Type", proc_macro2::Span::call_site());
    assert_eq!(wrapper_ident(&ident), "TType");
  }

  #[test]
  fn test_ident_for_keywords() {
    assert_eq!(ident_for("type").to_string(), "r#type");
    assert_eq!(ident_for("name").to_string(), "name");
  }

  #[test]
  fn test_reserved_setters() {
    for name in ["new", "try_new", "build", "set_field"] {
      assert!(is_reserved_setter(name));
    }
    assert!(!is_reserved_setter("builder"));
  }
}
