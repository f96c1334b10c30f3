use comfy_table::{Attribute, Cell, ContentArrangement, Row, Table};
use testbuilder_gen::generator::{
  GeneratorConfig, ShadowPolicy,
  metrics::Diagnostic,
  orchestrator::{BuilderSummary, GeneratedOutput, Orchestrator},
  source::SourceScanner,
};

use crate::ui::{Colors, ListCommand, colors::Role, term_width};

#[derive(Debug, serde::Serialize)]
struct Listing<'a> {
  builders: &'a [BuilderSummary],
  failures: Vec<Failure>,
}

#[derive(Debug, serde::Serialize)]
struct Failure {
  type_name: Option<String>,
  message: String,
}

impl<'a> Listing<'a> {
  fn from_output(output: &'a GeneratedOutput) -> Self {
    Self {
      builders: &output.builders,
      failures: output
        .errors()
        .map(|diagnostic: &Diagnostic| Failure {
          type_name: diagnostic.type_name().map(ToString::to_string),
          message: diagnostic.to_string(),
        })
        .collect(),
    }
  }
}

pub async fn list_builders(command: ListCommand, colors: &Colors) -> anyhow::Result<()> {
  let sources = SourceScanner::builder()
    .root(&command.crate_root)
    .skip_module(command.root_module.clone())
    .build()
    .scan()
    .await?;
  let config = GeneratorConfig::builder()
    .root_module(command.root_module)
    .shadow_policy(ShadowPolicy::from(command.shadow_policy))
    .build();
  let output = Orchestrator::new(config).generate(&sources)?;
  let listing = Listing::from_output(&output);

  if command.json {
    println!("{}", serde_json::to_string_pretty(&listing)?);
    return Ok(());
  }

  println!("{}", render_table(&listing, colors));
  Ok(())
}

fn render_table(listing: &Listing<'_>, colors: &Colors) -> Table {
  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut row = Row::new();
  row.add_cell(Cell::new("TYPE").fg(colors.comfy(Role::Label)));
  row.add_cell(Cell::new("BUILDER").fg(colors.comfy(Role::Label)));
  row.add_cell(Cell::new("PARENTS").fg(colors.comfy(Role::Label)));
  row.add_cell(Cell::new("SETTERS").fg(colors.comfy(Role::Label)));
  table.set_header(row);

  for builder in listing.builders {
    let mut setters = builder.setters.join(", ");
    if !builder.skipped.is_empty() {
      setters.push_str(&format!(" (skipped {})", builder.skipped.join(", ")));
    }

    let mut row = Row::new();
    row.add_cell(
      Cell::new(&builder.type_name)
        .fg(colors.comfy(Role::Value))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(Cell::new(&builder.wrapper).fg(colors.comfy(Role::Accent)));
    row.add_cell(Cell::new(parent_chain(&builder.parents)).fg(colors.comfy(Role::Timestamp)));
    row.add_cell(Cell::new(setters).fg(colors.comfy(Role::Primary)));
    table.add_row(row);
  }

  for failure in &listing.failures {
    let mut row = Row::new();
    row.add_cell(
      Cell::new(failure.type_name.as_deref().unwrap_or("-"))
        .fg(colors.comfy(Role::Value))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(Cell::new("-").fg(colors.comfy(Role::Error)));
    row.add_cell(Cell::new("-").fg(colors.comfy(Role::Error)));
    row.add_cell(Cell::new(&failure.message).fg(colors.comfy(Role::Error)));
    table.add_row(row);
  }

  table
}

fn parent_chain(parents: &[String]) -> String {
  if parents.is_empty() {
    "-".to_string()
  } else {
    parents.join(" -> ")
  }
}
