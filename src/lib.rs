//! Turn selector-addressed text on rendered pages into typed, validated,
//! filtered records and write them out as CSV or JSON.

pub mod common;
pub mod config;
pub mod engine;
pub mod logging;
pub mod parsers;
pub mod pipeline;

pub use common::{FieldSpec, FieldType, FieldValue, HarvestError, NoMatchError, Record, Result};
pub use config::JobConfig;
pub use engine::{BrowserEngine, HtmlEngine, NodeHandle};
pub use parsers::{FieldParser, Parsed, ParserRegistry};
pub use pipeline::{OutputFormat, Pipeline, RunReport};
