use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

use super::extract::{FailureKind, FieldFailure, RecordExtractor};
use super::filter::{filter, sort_records, Predicate, Rejection};
use super::output::{self, OutputFormat};
use super::selector::resolve;
use super::validate::{RecordValidator, ValidationReport};
use crate::common::error::{HarvestError, Result};
use crate::common::types::Record;
use crate::config::{JobConfig, OutputConfig};
use crate::engine::{BrowserEngine, NodeHandle};
use crate::parsers::ParserRegistry;

/// What happened when the job URL was loaded
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NavigationStatus {
    /// No URL to load; the engine's current page was used
    Skipped,
    Loaded,
    TimedOut,
    Failed { error: String },
}

/// A field failure tied to the record it happened in
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordFieldFailure {
    pub record: usize,
    pub field: String,
    pub kind: FailureKind,
    pub detail: String,
}

impl RecordFieldFailure {
    fn new(record: usize, failure: FieldFailure) -> Self {
        Self {
            record,
            field: failure.field,
            kind: failure.kind,
            detail: failure.detail,
        }
    }
}

/// Diagnostics for one run, returned instead of printed
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub job: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub navigation: NavigationStatus,
    /// Item selector that located the elements, if any did
    pub item_selector: Option<String>,
    pub elements: usize,
    pub extracted: usize,
    pub accepted: usize,
    pub field_failures: Vec<RecordFieldFailure>,
    pub validation: ValidationReport,
    pub rejected: Vec<Rejection>,
    pub output_path: Option<PathBuf>,
}

/// Records that survived filtering, plus the report describing the run
#[derive(Debug, Clone)]
pub struct Harvest {
    pub records: Vec<Record>,
    pub report: RunReport,
}

/// Runs one job: extract, validate, filter, sort and write
pub struct Pipeline<'j> {
    job: &'j JobConfig,
    registry: ParserRegistry,
    output: OutputConfig,
}

impl<'j> Pipeline<'j> {
    pub fn new(job: &'j JobConfig) -> Result<Self> {
        job.validate()?;
        Ok(Self {
            job,
            registry: job.registry(),
            output: job.output.clone(),
        })
    }

    /// Write somewhere other than the job's `[output]` table
    pub fn with_output(mut self, path: PathBuf, format: Option<OutputFormat>) -> Self {
        self.output = OutputConfig { path, format };
        self
    }

    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    /// Navigate (best effort), harvest the page and write the output file.
    /// Only a failure to write is fatal.
    #[instrument(skip(self, engine), fields(job = %self.job.name))]
    pub fn run<E: BrowserEngine>(&self, engine: &mut E) -> Result<RunReport> {
        let started_at = Utc::now();
        let navigation = self.navigate(engine);

        let root = engine.root();
        let mut harvest = self.collect(&root, navigation)?;
        harvest.report.started_at = started_at;

        let format = self.output.resolved_format();
        let path = output::write(&harvest.records, &self.job.fields, &self.output.path, format)?;
        harvest.report.output_path = Some(path);
        harvest.report.finished_at = Utc::now();
        Ok(harvest.report)
    }

    fn navigate<E: BrowserEngine>(&self, engine: &mut E) -> NavigationStatus {
        let Some(url) = self.job.url.as_deref() else {
            return NavigationStatus::Skipped;
        };

        info!("Navigating to {}", url);
        match engine.navigate(url, self.job.navigation_timeout_ms) {
            Ok(()) => NavigationStatus::Loaded,
            Err(HarvestError::NavigationTimeout { .. }) => {
                warn!("Navigation timed out; continuing with the DOM as it is");
                NavigationStatus::TimedOut
            }
            Err(e) => {
                warn!("Navigation failed ({}); continuing with the DOM as it is", e);
                NavigationStatus::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Extract, validate, filter and sort everything reachable from `root`
    pub fn collect<N: NodeHandle>(&self, root: &N, navigation: NavigationStatus) -> Result<Harvest> {
        let started_at = Utc::now();
        let extractor = RecordExtractor::new(&self.registry, &self.job.fields)?;

        let (elements, item_selector) = match resolve(root, &self.job.item_selectors) {
            Ok(resolution) => {
                info!(
                    "Found {} element(s) with selector '{}'",
                    resolution.nodes.len(),
                    resolution.selector
                );
                (resolution.nodes, Some(resolution.selector))
            }
            Err(e) => {
                warn!("No record elements on page: {}", e);
                (Vec::new(), None)
            }
        };
        let element_count = elements.len();
        let limit = self.job.limit.unwrap_or(usize::MAX);

        let mut records = Vec::new();
        let mut field_failures = Vec::new();
        for (index, element) in elements.iter().take(limit).enumerate() {
            let extraction = extractor.extract(element);
            field_failures.extend(
                extraction
                    .failures
                    .into_iter()
                    .map(|f| RecordFieldFailure::new(index, f)),
            );
            records.push(extraction.record);
        }
        let extracted = records.len();
        info!("Extracted {} record(s)", extracted);

        let validation = RecordValidator::new(&self.job.fields).validate_all(&records);

        let predicates: Vec<Predicate> = self.job.filters.iter().map(|r| r.to_predicate()).collect();
        let outcome = filter(records, &predicates);
        let mut accepted = outcome.accepted;
        if let Some(sort) = &self.job.sort {
            sort_records(&mut accepted, sort);
        }

        let report = RunReport {
            job: self.job.name.clone(),
            started_at,
            finished_at: Utc::now(),
            navigation,
            item_selector,
            elements: element_count,
            extracted,
            accepted: accepted.len(),
            field_failures,
            validation,
            rejected: outcome.rejected,
            output_path: None,
        };

        Ok(Harvest {
            records: accepted,
            report,
        })
    }
}
