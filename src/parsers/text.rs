use super::{FieldParser, Parsed};
use crate::common::constants::UNKNOWN_VALUE;
use crate::common::types::FieldType;

/// True iff the trimmed fragment contains the marker. Plain substring match.
#[derive(Debug, Clone)]
pub struct BooleanSubstringParser {
    marker: String,
}

impl BooleanSubstringParser {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl FieldParser for BooleanSubstringParser {
    fn parse(&self, raw: &str) -> Parsed {
        Parsed::ok(raw.trim().contains(self.marker.as_str()))
    }

    fn output_type(&self) -> FieldType {
        FieldType::Bool
    }
}

/// Trimmed fragment, unchanged otherwise.
#[derive(Debug, Clone, Default)]
pub struct TextParser;

impl FieldParser for TextParser {
    fn parse(&self, raw: &str) -> Parsed {
        Parsed::ok(raw.trim())
    }

    fn output_type(&self) -> FieldType {
        FieldType::String
    }
}

/// First non-blank line of a multi-line block, e.g. a card's headline.
#[derive(Debug, Clone, Default)]
pub struct FirstLineParser;

impl FieldParser for FirstLineParser {
    fn parse(&self, raw: &str) -> Parsed {
        match raw.lines().map(str::trim).find(|line| !line.is_empty()) {
            Some(line) => Parsed::ok(line),
            None => Parsed::failed(UNKNOWN_VALUE),
        }
    }

    fn output_type(&self) -> FieldType {
        FieldType::String
    }
}
