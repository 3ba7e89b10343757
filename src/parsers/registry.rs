use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{
    BooleanSubstringParser, CurrencyParser, DecimalParser, DurationParser, FieldParser,
    FirstLineParser, IntegerParser, NamePart, NameSplitParser, NumericRangeParser,
    OrdinalWordParser, Parsed, TextParser,
};
use crate::common::constants::*;

/// Parser definition as written in a job file's `[parsers.<tag>]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParserKind {
    Currency { symbol: String },
    OrdinalWord,
    NumericRange {
        #[serde(default)]
        symbol: Option<String>,
    },
    Duration,
    BooleanSubstring { marker: String },
    NameSplit { part: NamePart },
    Text,
    Integer,
    Decimal,
    FirstLine,
}

impl ParserKind {
    pub fn build(&self) -> Box<dyn FieldParser> {
        match self {
            ParserKind::Currency { symbol } => Box::new(CurrencyParser::new(symbol.clone())),
            ParserKind::OrdinalWord => Box::new(OrdinalWordParser::new()),
            ParserKind::NumericRange { symbol } => {
                Box::new(NumericRangeParser::new(symbol.as_deref()))
            }
            ParserKind::Duration => Box::new(DurationParser),
            ParserKind::BooleanSubstring { marker } => {
                Box::new(BooleanSubstringParser::new(marker.clone()))
            }
            ParserKind::NameSplit { part } => Box::new(NameSplitParser::new(*part)),
            ParserKind::Text => Box::new(TextParser),
            ParserKind::Integer => Box::new(IntegerParser),
            ParserKind::Decimal => Box::new(DecimalParser),
            ParserKind::FirstLine => Box::new(FirstLineParser),
        }
    }
}

/// Registry of field parsers keyed by tag
pub struct ParserRegistry {
    parsers: HashMap<String, Box<dyn FieldParser>>,
}

impl ParserRegistry {
    /// Create a new registry with the built-in parsers
    pub fn new() -> Self {
        let mut parsers: HashMap<String, Box<dyn FieldParser>> = HashMap::new();

        parsers.insert(
            CURRENCY_PARSER.to_string(),
            Box::new(CurrencyParser::new(DEFAULT_CURRENCY_SYMBOL)),
        );
        parsers.insert(
            CURRENCY_GBP_PARSER.to_string(),
            Box::new(CurrencyParser::new(GBP_CURRENCY_SYMBOL)),
        );
        parsers.insert(ORDINAL_WORD_PARSER.to_string(), Box::new(OrdinalWordParser::new()));
        parsers.insert(
            NUMERIC_RANGE_PARSER.to_string(),
            Box::new(NumericRangeParser::new(Some(DEFAULT_CURRENCY_SYMBOL))),
        );
        parsers.insert(DURATION_PARSER.to_string(), Box::new(DurationParser));
        parsers.insert(
            IN_STOCK_PARSER.to_string(),
            Box::new(BooleanSubstringParser::new(DEFAULT_STOCK_MARKER)),
        );
        parsers.insert(
            FIRST_NAME_PARSER.to_string(),
            Box::new(NameSplitParser::new(NamePart::First)),
        );
        parsers.insert(
            LAST_NAME_PARSER.to_string(),
            Box::new(NameSplitParser::new(NamePart::Last)),
        );
        parsers.insert(TEXT_PARSER.to_string(), Box::new(TextParser));
        parsers.insert(INTEGER_PARSER.to_string(), Box::new(IntegerParser));
        parsers.insert(DECIMAL_PARSER.to_string(), Box::new(DecimalParser));
        parsers.insert(FIRST_LINE_PARSER.to_string(), Box::new(FirstLineParser));

        Self { parsers }
    }

    /// Register a parser under a tag, replacing any existing entry
    pub fn register(&mut self, tag: impl Into<String>, parser: Box<dyn FieldParser>) {
        self.parsers.insert(tag.into(), parser);
    }

    /// Register every parser a job file declares
    pub fn register_kinds<'a, I>(&mut self, kinds: I)
    where
        I: IntoIterator<Item = (&'a String, &'a ParserKind)>,
    {
        for (tag, kind) in kinds {
            self.register(tag.clone(), kind.build());
        }
    }

    pub fn get(&self, tag: &str) -> Option<&dyn FieldParser> {
        self.parsers.get(tag).map(|p| p.as_ref())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.parsers.contains_key(tag)
    }

    /// Parse a fragment with the parser registered under `tag`
    pub fn parse(&self, tag: &str, raw: &str) -> Option<Parsed> {
        self.get(tag).map(|parser| parser.parse(raw))
    }

    /// List all registered tags, sorted
    pub fn list_tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.parsers.keys().map(|k| k.as_str()).collect();
        tags.sort_unstable();
        tags
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}
