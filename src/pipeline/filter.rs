use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use tracing::{debug, info};

use crate::common::types::{FieldValue, Record};

/// A business rule over a record, with the reason reported when it fails
pub struct Predicate {
    reason: String,
    check: Box<dyn Fn(&Record) -> bool>,
}

impl Predicate {
    pub fn new(reason: impl Into<String>, check: impl Fn(&Record) -> bool + 'static) -> Self {
        Self {
            reason: reason.into(),
            check: Box::new(check),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn accepts(&self, record: &Record) -> bool {
        (self.check)(record)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").field("reason", &self.reason).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    /// Position of the record in the filter's input
    pub index: usize,
    pub record: Record,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOutcome {
    pub accepted: Vec<Record>,
    pub rejected: Vec<Rejection>,
}

/// Keep records passing every predicate, in input order. A rejected record
/// carries the reason of the first predicate it failed.
pub fn filter(records: Vec<Record>, predicates: &[Predicate]) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();

    for (index, record) in records.into_iter().enumerate() {
        match predicates.iter().find(|p| !p.accepts(&record)) {
            Some(failed) => {
                debug!("Record {} rejected: {}", index, failed.reason());
                outcome.rejected.push(Rejection {
                    index,
                    record,
                    reason: failed.reason().to_string(),
                });
            }
            None => outcome.accepted.push(record),
        }
    }

    info!(
        "Filter accepted {} record(s), rejected {}",
        outcome.accepted.len(),
        outcome.rejected.len()
    );
    outcome
}

/// Filter rules a job file can declare
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum FilterRule {
    /// Numeric field >= value
    AtLeast {
        field: String,
        value: f64,
        #[serde(default)]
        reason: Option<String>,
    },
    /// Uppercased first character of a text field lies in `from..=to`.
    /// An empty value fails the rule.
    InitialRange {
        field: String,
        from: char,
        to: char,
        #[serde(default)]
        reason: Option<String>,
    },
    /// Boolean field is true
    IsTrue {
        field: String,
        #[serde(default)]
        reason: Option<String>,
    },
    /// Text field is not blank
    NonEmpty {
        field: String,
        #[serde(default)]
        reason: Option<String>,
    },
}

impl FilterRule {
    pub fn field(&self) -> &str {
        match self {
            FilterRule::AtLeast { field, .. }
            | FilterRule::InitialRange { field, .. }
            | FilterRule::IsTrue { field, .. }
            | FilterRule::NonEmpty { field, .. } => field,
        }
    }

    fn default_reason(&self) -> String {
        match self {
            FilterRule::AtLeast { field, value, .. } => format!("{} below {}", field, value),
            FilterRule::InitialRange { field, from, to, .. } => {
                format!("{} does not start with {}-{}", field, from, to)
            }
            FilterRule::IsTrue { field, .. } => format!("{} is false", field),
            FilterRule::NonEmpty { field, .. } => format!("{} is empty", field),
        }
    }

    pub fn to_predicate(&self) -> Predicate {
        let reason = match self {
            FilterRule::AtLeast { reason, .. }
            | FilterRule::InitialRange { reason, .. }
            | FilterRule::IsTrue { reason, .. }
            | FilterRule::NonEmpty { reason, .. } => {
                reason.clone().unwrap_or_else(|| self.default_reason())
            }
        };
        let field = self.field().to_string();

        match *self {
            FilterRule::AtLeast { value, .. } => Predicate::new(reason, move |r| {
                r.get(&field)
                    .and_then(FieldValue::as_f64)
                    .map_or(false, |v| v >= value)
            }),
            FilterRule::InitialRange { from, to, .. } => {
                let (from, to) = (from.to_ascii_uppercase(), to.to_ascii_uppercase());
                Predicate::new(reason, move |r| {
                    r.get(&field)
                        .and_then(FieldValue::as_str)
                        .and_then(|s| s.chars().next())
                        .and_then(|c| c.to_uppercase().next())
                        .map_or(false, |c| from <= c && c <= to)
                })
            }
            FilterRule::IsTrue { .. } => Predicate::new(reason, move |r| {
                r.get(&field).and_then(FieldValue::as_bool).unwrap_or(false)
            }),
            FilterRule::NonEmpty { .. } => Predicate::new(reason, move |r| {
                r.get(&field)
                    .map_or(false, |v| !v.to_string().trim().is_empty())
            }),
        }
    }
}

/// Optional ordering applied to the accepted records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub descending: bool,
}

fn compare_values(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    match (a, b) {
        (Some(FieldValue::Text(x)), Some(FieldValue::Text(y))) => x.cmp(y),
        (Some(FieldValue::Bool(x)), Some(FieldValue::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        _ => Ordering::Equal,
    }
}

/// Stable sort by one field; equal keys keep their filter order
pub fn sort_records(records: &mut [Record], sort: &SortSpec) {
    records.sort_by(|a, b| {
        let ordering = compare_values(a.get(&sort.field), b.get(&sort.field));
        if sort.descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}
