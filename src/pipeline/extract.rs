use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use super::selector::resolve;
use crate::common::error::{HarvestError, Result};
use crate::common::types::{FieldSpec, Record};
use crate::engine::NodeHandle;
use crate::parsers::{FieldParser, ParserRegistry};

/// Why a field fell back to a sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NoMatch,
    ParseFailure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldFailure {
    pub field: String,
    pub kind: FailureKind,
    pub detail: String,
}

/// Raw text per field, in schema order. `None` when no selector matched.
pub type RawRecord = Vec<(String, Option<String>)>;

/// One element's extraction result
#[derive(Debug, Clone)]
pub struct Extraction {
    pub record: Record,
    pub raw: RawRecord,
    pub failures: Vec<FieldFailure>,
}

struct FieldPlan<'r> {
    spec: FieldSpec,
    parser: &'r dyn FieldParser,
    capture: Option<Regex>,
    strip: Option<Regex>,
}

/// Builds typed records from page elements according to a schema
pub struct RecordExtractor<'r> {
    plans: Vec<FieldPlan<'r>>,
}

fn compile(pattern: &Option<String>, field: &str) -> Result<Option<Regex>> {
    pattern
        .as_deref()
        .map(|p| {
            Regex::new(p).map_err(|e| {
                HarvestError::Config(format!("Invalid pattern for field '{}': {}", field, e))
            })
        })
        .transpose()
}

impl<'r> RecordExtractor<'r> {
    /// Prepare an extractor, rejecting unknown parser tags and bad patterns up front
    pub fn new(registry: &'r ParserRegistry, schema: &[FieldSpec]) -> Result<Self> {
        let mut plans = Vec::with_capacity(schema.len());
        for spec in schema {
            let parser = registry.get(&spec.parser).ok_or_else(|| {
                HarvestError::Config(format!(
                    "Field '{}' uses unknown parser '{}'",
                    spec.name, spec.parser
                ))
            })?;
            plans.push(FieldPlan {
                parser,
                capture: compile(&spec.capture, &spec.name)?,
                strip: compile(&spec.strip_pattern, &spec.name)?,
                spec: spec.clone(),
            });
        }
        Ok(Self { plans })
    }

    /// Extract one record from `element`. Never fails: missing markup and
    /// unparseable text degrade to sentinels and are listed in `failures`.
    pub fn extract<N: NodeHandle>(&self, element: &N) -> Extraction {
        let raw = self.read_fragments(element);
        self.type_fragments(raw)
    }

    /// Read each field's raw fragment from the DOM
    pub fn read_fragments<N: NodeHandle>(&self, element: &N) -> RawRecord {
        self.plans
            .iter()
            .map(|plan| (plan.spec.name.clone(), Self::read_fragment(&plan.spec, element)))
            .collect()
    }

    fn read_fragment<N: NodeHandle>(spec: &FieldSpec, element: &N) -> Option<String> {
        if let Some(constant) = &spec.constant {
            return Some(constant.clone());
        }

        let read = |node: &N| match &spec.attribute {
            Some(name) => node.attribute(name).unwrap_or_default(),
            None => node.inner_text(),
        };

        if spec.selectors.is_empty() {
            return Some(read(element));
        }

        match resolve(element, &spec.selectors) {
            Ok(resolution) => resolution.nodes.first().map(read),
            Err(e) => {
                warn!("Field '{}': {}", spec.name, e);
                None
            }
        }
    }

    /// Turn raw fragments into a typed record. Fields absent from `raw` are
    /// treated as unmatched.
    pub fn type_fragments(&self, raw: RawRecord) -> Extraction {
        let mut record = Record::new();
        let mut failures = Vec::new();

        for plan in &self.plans {
            let spec = &plan.spec;
            let fragment = raw
                .iter()
                .find(|(name, _)| *name == spec.name)
                .and_then(|(_, text)| text.as_deref());

            let Some(fragment) = fragment else {
                record.insert(spec.name.clone(), spec.field_type.sentinel());
                failures.push(FieldFailure {
                    field: spec.name.clone(),
                    kind: FailureKind::NoMatch,
                    detail: format!("no node for selectors [{}]", spec.selectors.join(", ")),
                });
                continue;
            };

            let prepared = Self::prepare(plan, fragment);
            let parsed = plan.parser.parse(&prepared);

            if !parsed.ok {
                debug!(
                    "Field '{}': parser '{}' could not read {:?}",
                    spec.name, spec.parser, prepared
                );
                failures.push(FieldFailure {
                    field: spec.name.clone(),
                    kind: FailureKind::ParseFailure,
                    detail: format!("parser '{}' rejected {:?}", spec.parser, prepared),
                });
            }
            record.insert(spec.name.clone(), parsed.value);
        }

        Extraction {
            record,
            raw,
            failures,
        }
    }

    /// Apply capture, strip, relative-link and truncation rules, in that order
    fn prepare(plan: &FieldPlan, fragment: &str) -> String {
        let mut text = match &plan.capture {
            Some(re) => re
                .captures(fragment)
                .and_then(|caps| caps.get(1).or_else(|| caps.get(0)))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            None => fragment.to_string(),
        };

        if let Some(re) = &plan.strip {
            text = re.replace_all(&text, "").into_owned();
        }

        if let Some(base) = &plan.spec.prefix_relative {
            if text.trim_start().starts_with('/') {
                text = format!("{}{}", base.trim_end_matches('/'), text.trim());
            }
        }

        if let Some(max) = plan.spec.max_chars {
            text = text.trim().chars().take(max).collect();
        }

        text
    }
}
