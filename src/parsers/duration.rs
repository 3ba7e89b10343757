use once_cell::sync::Lazy;
use regex::Regex;

use super::{FieldParser, Parsed};
use crate::common::constants::UNKNOWN_VALUE;
use crate::common::types::FieldType;

static DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+\s+(?:minute|hour|day|week)s?|ending\s+\w+)").unwrap()
});

/// Finds the first "<n> <unit>" or "ending <word>" phrase and returns it verbatim.
#[derive(Debug, Clone, Default)]
pub struct DurationParser;

impl FieldParser for DurationParser {
    fn parse(&self, raw: &str) -> Parsed {
        match DURATION.find(raw) {
            Some(m) => Parsed::ok(m.as_str()),
            None => Parsed::failed(UNKNOWN_VALUE),
        }
    }

    fn output_type(&self) -> FieldType {
        FieldType::String
    }
}
