//! Field parsers: pure conversions from one raw text fragment to one typed value.
//!
//! Parsers never fail. When a fragment cannot be interpreted they return
//! `ok = false` together with their documented sentinel, and the caller decides
//! whether that is worth reporting.

pub mod currency;
pub mod duration;
pub mod name_split;
pub mod numeric;
pub mod ordinal;
pub mod registry;
pub mod text;

pub use currency::CurrencyParser;
pub use duration::DurationParser;
pub use name_split::{split_name, NamePart, NameSplitParser};
pub use numeric::{DecimalParser, IntegerParser, NumericRangeParser};
pub use ordinal::OrdinalWordParser;
pub use registry::{ParserKind, ParserRegistry};
pub use text::{BooleanSubstringParser, FirstLineParser, TextParser};

use crate::common::types::{FieldType, FieldValue};

/// Outcome of a single parse
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub value: FieldValue,
    pub ok: bool,
}

impl Parsed {
    pub fn ok(value: impl Into<FieldValue>) -> Self {
        Self {
            value: value.into(),
            ok: true,
        }
    }

    pub fn failed(sentinel: impl Into<FieldValue>) -> Self {
        Self {
            value: sentinel.into(),
            ok: false,
        }
    }
}

/// Trait implemented by every registry entry
pub trait FieldParser: Send + Sync {
    /// Convert one raw fragment into a typed value
    fn parse(&self, raw: &str) -> Parsed;

    /// Type of the values this parser produces
    fn output_type(&self) -> FieldType;
}
