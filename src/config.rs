use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::constants::DEFAULT_NAVIGATION_TIMEOUT_MS;
use crate::common::error::{HarvestError, Result};
use crate::common::types::FieldSpec;
use crate::parsers::{ParserKind, ParserRegistry};
use crate::pipeline::filter::{FilterRule, SortSpec};
use crate::pipeline::output::OutputFormat;

fn default_timeout_ms() -> u64 {
    DEFAULT_NAVIGATION_TIMEOUT_MS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl OutputConfig {
    /// Declared format, else inferred from the extension, else CSV
    pub fn resolved_format(&self) -> OutputFormat {
        self.format
            .or_else(|| OutputFormat::from_path(&self.path))
            .unwrap_or(OutputFormat::Csv)
    }
}

/// One extraction job as described in a TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub navigation_timeout_ms: u64,
    /// Ordered cascade locating one element per record
    pub item_selectors: Vec<String>,
    /// Only the first `limit` elements are processed
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub parsers: BTreeMap<String, ParserKind>,
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub filters: Vec<FilterRule>,
    #[serde(default)]
    pub sort: Option<SortSpec>,
    pub output: OutputConfig,
}

impl JobConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            HarvestError::Config(format!("Failed to read job file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let job: JobConfig = toml::from_str(content)?;
        job.validate()?;
        Ok(job)
    }

    /// Registry with the built-ins plus this job's `[parsers]` entries
    pub fn registry(&self) -> ParserRegistry {
        let mut registry = ParserRegistry::new();
        registry.register_kinds(&self.parsers);
        registry
    }

    /// Reject jobs that could only fail later
    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(HarvestError::Config(format!("Job '{}' declares no fields", self.name)));
        }
        if self.item_selectors.is_empty() {
            return Err(HarvestError::Config(format!(
                "Job '{}' declares no item selectors",
                self.name
            )));
        }

        let registry = self.registry();
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(HarvestError::Config(format!(
                    "Field '{}' is declared twice",
                    field.name
                )));
            }
            if !registry.contains(&field.parser) {
                return Err(HarvestError::Config(format!(
                    "Field '{}' uses unknown parser '{}'",
                    field.name, field.parser
                )));
            }
            for pattern in [&field.capture, &field.strip_pattern].into_iter().flatten() {
                Regex::new(pattern).map_err(|e| {
                    HarvestError::Config(format!(
                        "Invalid pattern for field '{}': {}",
                        field.name, e
                    ))
                })?;
            }
        }

        let referenced = self
            .filters
            .iter()
            .map(FilterRule::field)
            .chain(self.sort.as_ref().map(|s| s.field.as_str()));
        for field in referenced {
            if !seen.contains(field) {
                return Err(HarvestError::Config(format!(
                    "Filter or sort refers to undeclared field '{}'",
                    field
                )));
            }
        }

        Ok(())
    }
}
