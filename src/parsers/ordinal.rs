use super::{FieldParser, Parsed};
use crate::common::types::FieldType;

/// Maps a rating word ("One".."Five") to its number.
///
/// Only the last whitespace-separated token is looked at, so a raw class
/// attribute such as `"star-rating Three"` works without a capture pattern.
/// Unknown words are an "unrated" 0, not a parse failure.
#[derive(Debug, Clone, Default)]
pub struct OrdinalWordParser;

impl OrdinalWordParser {
    pub fn new() -> Self {
        Self
    }

    fn lookup(word: &str) -> i64 {
        match word {
            "One" => 1,
            "Two" => 2,
            "Three" => 3,
            "Four" => 4,
            "Five" => 5,
            _ => 0,
        }
    }
}

impl FieldParser for OrdinalWordParser {
    fn parse(&self, raw: &str) -> Parsed {
        let word = raw.split_whitespace().last().unwrap_or("");
        Parsed::ok(Self::lookup(word))
    }

    fn output_type(&self) -> FieldType {
        FieldType::Int
    }
}
