//! Extraction-validation-filter-output pipeline.
//!
//! Data flows strictly one way, one page at a time:
//! engine -> `extract` (using `selector` and the parser registry) -> `validate`
//! -> `filter` -> `output`. `runner` wires the stages together for a job.

pub mod extract;
pub mod filter;
pub mod output;
pub mod runner;
pub mod selector;
pub mod validate;

pub use extract::{Extraction, FailureKind, FieldFailure, RawRecord, RecordExtractor};
pub use filter::{filter, sort_records, FilterOutcome, FilterRule, Predicate, Rejection, SortSpec};
pub use output::{render, write, OutputFormat};
pub use runner::{Harvest, NavigationStatus, Pipeline, RecordFieldFailure, RunReport};
pub use selector::{resolve, Resolution};
pub use validate::{RecordValidator, ValidationMismatch, ValidationReport};
