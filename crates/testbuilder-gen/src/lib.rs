//! Generates fluent test builders for structs annotated with `#[derive(testbuilder::TestBuilder)]`.
//!
//! The generator scans a crate's sources, follows every annotated struct up its
//! `#[test_builder(parent)]` chain and writes one builder per struct. Run it from a build
//! script with [`BuildScript`] and mount the output with `testbuilder::include_generated!()`,
//! or run the `testbuilder-gen` binary to write the builders into `src/`.
#![allow(clippy::missing_errors_doc)]

pub mod build_script;
pub mod generator;

pub use build_script::BuildScript;
pub use generator::{GeneratorConfig, Layout, ShadowPolicy, Visibility};
