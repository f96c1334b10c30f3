use std::path::PathBuf;

use super::support::generate;
use crate::generator::{GeneratorConfig, Layout, ShadowPolicy, metrics::Diagnostic};

const POINT: &[(&str, &str)] = &[
  ("", "mod shapes;"),
  ("shapes", "#[derive(Default, TestBuilder)] pub struct Point { x: i32, y: i32 }"),
];

fn paths(output: &crate::generator::orchestrator::GeneratedOutput) -> Vec<PathBuf> {
  output.files.iter().map(|file| file.path.clone()).collect()
}

fn errors(output: &crate::generator::orchestrator::GeneratedOutput) -> Vec<String> {
  output.errors().map(ToString::to_string).collect()
}

#[test]
fn test_point_tree_layout() {
  let output = generate(POINT, GeneratorConfig::default());

  assert!(!output.has_errors());
  assert_eq!(
    paths(&output),
    [
      PathBuf::from("mod.rs"),
      PathBuf::from("shapes/mod.rs"),
      PathBuf::from("shapes/t_point.rs"),
    ]
  );

  let root = &output.files[0].code;
  assert!(root.starts_with("// AUTO-GENERATED CODE - DO NOT EDIT!"));
  assert!(root.contains("pub mod shapes;"));

  let namespace = &output.files[1].code;
  assert!(namespace.contains("pub mod t_point;"));
  assert!(namespace.contains("pub use t_point::TPoint;"));

  let builder = &output.files[2];
  assert_eq!(builder.owner.as_deref(), Some("crate::shapes::Point"));
  assert!(builder.code.contains("pub struct TPoint;"));
  assert!(builder.code.contains("pub fn x(self, x: i32) -> Self {"));
  assert!(builder.code.contains("pub fn y(self, y: i32) -> Self {"));
  assert!(builder.code.contains("pub fn build(self) -> crate::shapes::Point {"));

  assert_eq!(output.stats.files_scanned, 2);
  assert_eq!(output.stats.builders_generated, 1);
  assert_eq!(output.stats.setters_generated, 2);
  assert_eq!(output.stats.files_emitted, 3);
  assert_eq!(output.builders[0].wrapper, "TPoint");
  assert_eq!(output.builders[0].module, "crate::shapes::t_point");
}

#[test]
fn test_generated_builder_note_carries_code() {
  let output = generate(POINT, GeneratorConfig::default());
  let note = output
    .diagnostics
    .iter()
    .find_map(|diagnostic| match diagnostic {
      Diagnostic::GeneratedBuilder { type_name, code } => Some((type_name, code)),
      _ => None,
    })
    .unwrap();
  assert_eq!(note.0, "crate::shapes::Point");
  assert!(note.1.contains("mod t_point {"));
}

#[test]
fn test_annotated_enum_yields_one_error_and_nothing_else() {
  let output = generate(&[("", "#[derive(TestBuilder)] pub enum Shape { Circle, Square }")], GeneratorConfig::default());

  assert_eq!(errors(&output), ["TestBuilder annotation can not be used on Shape"]);
  assert_eq!(output.diagnostics.len(), 1);
  assert!(output.files.is_empty());
  assert!(output.builders.is_empty());
}

#[test]
fn test_failed_type_does_not_stop_others() {
  let output = generate(
    &[(
      "",
      r#"
        #[derive(TestBuilder)] pub struct Broken { #[test_builder(parent)] base: Missing }
        #[derive(Default, TestBuilder)] pub struct Fine { ok: bool }
        #[derive(TestBuilder)] pub struct Pair(u8, u8);
      "#,
    )],
    GeneratorConfig::default(),
  );

  assert_eq!(output.builders.len(), 1);
  assert_eq!(output.builders[0].type_name, "crate::Fine");
  let errors = errors(&output);
  assert_eq!(errors.len(), 2);
  assert!(errors[0].starts_with("Failed to generate builder for 'crate::Broken'"));
  assert!(errors[1].contains("tuple struct"));
}

#[test]
fn test_only_and_exclude_filters() {
  let files: &[(&str, &str)] = &[(
    "",
    r#"
      #[derive(TestBuilder)] pub struct Alpha { a: u8 }
      #[derive(TestBuilder)] pub struct Beta { b: u8 }
      #[derive(TestBuilder)] pub struct Gamma { c: u8 }
    "#,
  )];

  let only = generate(files, GeneratorConfig::builder().only(vec!["Alpha".to_string(), "crate::Gamma".to_string()]).build());
  let names: Vec<&str> = only.builders.iter().map(|builder| builder.type_name.as_str()).collect();
  assert_eq!(names, ["crate::Alpha", "crate::Gamma"]);

  let exclude = generate(files, GeneratorConfig::builder().exclude(vec!["Beta".to_string()]).build());
  let names: Vec<&str> = exclude.builders.iter().map(|builder| builder.type_name.as_str()).collect();
  assert_eq!(names, ["crate::Alpha", "crate::Gamma"]);
}

#[test]
fn test_single_file_layout_is_includable() {
  let output = generate(POINT, GeneratorConfig::builder().layout(Layout::SingleFile).build());

  assert_eq!(paths(&output), [PathBuf::from("testbuilder.rs")]);
  let code = &output.files[0].code;
  assert!(code.contains("pub mod shapes {"));
  assert!(code.contains("pub mod t_point {"));
  assert!(code.contains("pub use t_point::TPoint;"));
  assert!(!code.contains("#!["));
  assert!(!code.contains("//!"));
}

#[test]
fn test_empty_crate_outputs() {
  let files: &[(&str, &str)] = &[("", "pub struct Plain { a: u8 }")];

  let tree = generate(files, GeneratorConfig::default());
  assert!(tree.files.is_empty());
  assert!(tree.diagnostics.is_empty());

  let single = generate(files, GeneratorConfig::builder().layout(Layout::SingleFile).build());
  assert_eq!(single.files.len(), 1);
  assert!(single.files[0].code.starts_with("// AUTO-GENERATED CODE - DO NOT EDIT!"));
  assert!(!single.files[0].code.contains("mod "));
}

#[test]
fn test_shadow_policy_is_applied() {
  let files: &[(&str, &str)] = &[(
    "",
    r#"
      #[derive(FieldAccess)] pub struct Base { id: u64 }
      #[derive(Default, TestBuilder)] pub struct Child { id: u32, #[test_builder(parent)] base: Base }
    "#,
  )];

  let rejected = generate(files, GeneratorConfig::default());
  assert!(rejected.builders.is_empty());
  assert!(errors(&rejected)[0].contains("is shadowed by `crate::Child`"));

  let derived = generate(files, GeneratorConfig::builder().shadow_policy(ShadowPolicy::MostDerived).build());
  assert_eq!(derived.builders[0].setters, ["id"]);
  assert_eq!(derived.builders[0].skipped, ["crate::Base.id"]);
  assert_eq!(derived.builders[0].parents, ["crate::Base"]);
  assert_eq!(derived.stats.shadowed_fields_skipped, 1);
}

#[test]
fn test_builder_module_colliding_with_namespace() {
  let output = generate(
    &[(
      "",
      r#"
        #[derive(TestBuilder)] pub struct Point { x: i32 }
        pub mod t_point {
          #[derive(TestBuilder)] pub struct Inner { v: u8 }
        }
      "#,
    )],
    GeneratorConfig::default(),
  );

  assert_eq!(output.builders.len(), 1);
  let errors = errors(&output);
  assert_eq!(errors.len(), 1);
  assert!(errors[0].contains("crate::t_point::Inner"));
  assert!(errors[0].contains("claimed by both"));
}

#[test]
fn test_unresolved_field_type_is_a_warning() {
  let output = generate(&[("", "#[derive(TestBuilder)] pub struct Holder { item: Mystery }")], GeneratorConfig::default());

  assert!(!output.has_errors());
  assert!(output.diagnostics.iter().any(|diagnostic| matches!(
    diagnostic,
    Diagnostic::UnresolvedTypeName { name, .. } if name == "Mystery"
  )));
}

#[test]
fn test_parse_failures_are_reported_and_skipped() {
  let output = generate(
    &[
      ("", "mod broken; #[derive(TestBuilder)] pub struct Fine { a: u8 }"),
      ("broken", "pub struct {"),
    ],
    GeneratorConfig::default(),
  );
  assert_eq!(output.builders.len(), 1);
  assert_eq!(output.errors().count(), 1);
  assert!(matches!(output.errors().next(), Some(Diagnostic::ParseFailed { .. })));
}

#[test]
fn test_struct_in_private_module_is_skipped_alone() {
  let output = generate(
    &[(
      "",
      r#"
        pub mod zoo {
          mod hidden {
            #[derive(Default, TestBuilder)] pub struct Keeper { name: String }
          }
        }
        #[derive(Default, TestBuilder)] pub struct Visitor { name: String }
      "#,
    )],
    GeneratorConfig::default(),
  );

  let names: Vec<&str> = output.builders.iter().map(|builder| builder.type_name.as_str()).collect();
  assert_eq!(names, ["crate::Visitor"]);
  let errors = errors(&output);
  assert_eq!(errors.len(), 1);
  assert!(errors[0].starts_with("Failed to generate builder for 'crate::zoo::hidden::Keeper'"));
  assert!(errors[0].contains("no crate-visible re-export"));
  assert!(output.files.iter().all(|file| !file.code.contains("hidden::Keeper")));
}

#[test]
fn test_struct_in_private_module_builds_through_reexport() {
  let output = generate(
    &[
      ("", "pub mod zoo;"),
      ("zoo", "mod keeper; pub use keeper::{Badge, Keeper};"),
      (
        "zoo::keeper",
        r#"
          pub struct Badge;
          #[derive(Default, TestBuilder)] pub struct Keeper { name: String, badge: Option<Badge> }
        "#,
      ),
    ],
    GeneratorConfig::default(),
  );
  assert!(output.errors().next().is_none(), "{:?}", errors(&output));

  let builder = output
    .files
    .iter()
    .find(|file| file.owner.as_deref() == Some("crate::zoo::keeper::Keeper"))
    .unwrap();
  assert!(builder.code.contains("pub fn build(self) -> crate::zoo::Keeper {"));
  assert!(builder.code.contains("pub fn badge(self, badge: Option<crate::zoo::Badge>) -> Self {"));
  assert_eq!(output.builders[0].module, "crate::zoo::keeper::t_keeper");
}

#[test]
fn test_private_field_type_fails_only_its_builder() {
  let output = generate(
    &[
      ("", "pub mod vault;"),
      (
        "vault",
        r#"
          struct Secret;
          #[derive(Default, TestBuilder)] pub struct Locker { secret: Option<Secret> }
          #[derive(Default, TestBuilder)] pub struct Shelf { label: String }
        "#,
      ),
    ],
    GeneratorConfig::default(),
  );

  assert_eq!(output.builders.len(), 1);
  assert_eq!(output.builders[0].type_name, "crate::vault::Shelf");
  let errors = errors(&output);
  assert_eq!(errors.len(), 1);
  assert!(errors[0].contains("cannot name `crate::vault::Secret`"));
}

#[test]
fn test_malformed_parent_attribute_is_a_warning() {
  let output = generate(
    &[(
      "",
      r#"
        #[derive(Default, TestBuilder)]
        pub struct Label { #[test_builder(parnet)] label: String }
      "#,
    )],
    GeneratorConfig::default(),
  );

  assert!(!output.has_errors());
  assert_eq!(output.builders[0].setters, ["label"]);
  let warning = output
    .diagnostics
    .iter()
    .find(|diagnostic| matches!(diagnostic, Diagnostic::InvalidFieldAttribute { .. }))
    .unwrap();
  assert_eq!(warning.type_name(), Some("crate::Label"));
  assert!(warning.to_string().starts_with("'crate::Label.label': ignoring #[test_builder] attribute"));
}
