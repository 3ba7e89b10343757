use serde::{Deserialize, Serialize};

use super::{FieldParser, Parsed};
use crate::common::types::FieldType;

/// Splits a full name into (given names, surname).
///
/// The last token is always the surname, so "J.K. Rowling" gives
/// ("J.K.", "Rowling") and "Jane Austen Smith" gives ("Jane Austen", "Smith").
/// A single token is a given name with an empty surname.
pub fn split_name(full_name: &str) -> (String, String) {
    let tokens: Vec<&str> = full_name.split_whitespace().collect();
    match tokens.as_slice() {
        [] => (String::new(), String::new()),
        [only] => (only.to_string(), String::new()),
        [given @ .., last] => (given.join(" "), last.to_string()),
    }
}

/// Which half of a split name a field receives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamePart {
    First,
    Last,
}

#[derive(Debug, Clone)]
pub struct NameSplitParser {
    part: NamePart,
}

impl NameSplitParser {
    pub fn new(part: NamePart) -> Self {
        Self { part }
    }
}

impl FieldParser for NameSplitParser {
    fn parse(&self, raw: &str) -> Parsed {
        let (first, last) = split_name(raw);
        match self.part {
            NamePart::First => Parsed::ok(first),
            NamePart::Last => Parsed::ok(last),
        }
    }

    fn output_type(&self) -> FieldType {
        FieldType::String
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(first: &str, last: &str) -> (String, String) {
        (first.to_string(), last.to_string())
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("John Smith"), pair("John", "Smith"));
        assert_eq!(split_name("Cher"), pair("Cher", ""));
        assert_eq!(split_name("J.K. Rowling"), pair("J.K.", "Rowling"));
        assert_eq!(split_name("  Martin Luther King Jr. "), pair("Martin Luther King", "Jr."));
        assert_eq!(split_name(""), pair("", ""));
    }

    #[test]
    fn test_parser_parts() {
        let first = NameSplitParser::new(NamePart::First);
        let last = NameSplitParser::new(NamePart::Last);
        assert_eq!(first.parse("Albert Einstein"), Parsed::ok("Albert"));
        assert_eq!(last.parse("Albert Einstein"), Parsed::ok("Einstein"));
        assert_eq!(last.parse("Madonna"), Parsed::ok(""));
    }
}
