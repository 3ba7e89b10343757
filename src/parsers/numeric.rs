use once_cell::sync::Lazy;
use regex::Regex;

use super::{FieldParser, Parsed};
use crate::common::types::FieldType;

static MONETARY_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d[\d,]*)").unwrap());
static SIGNED_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+").unwrap());
static DECIMAL_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+(?:\.\d+)?").unwrap());

/// Returns the last monetary number in a fragment ("$250 - $1,500" -> 1500).
///
/// With a symbol configured only numbers directly preceded by it count, so
/// "3 days left" in the same card does not shadow the price.
#[derive(Debug, Clone)]
pub struct NumericRangeParser {
    pattern: Regex,
}

impl NumericRangeParser {
    pub fn new(symbol: Option<&str>) -> Self {
        let pattern = match symbol {
            Some(symbol) if !symbol.is_empty() => {
                Regex::new(&format!(r"{}\s*(\d[\d,]*)", regex::escape(symbol)))
                    .unwrap_or_else(|_| MONETARY_NUMBER.clone())
            }
            _ => MONETARY_NUMBER.clone(),
        };
        Self { pattern }
    }
}

impl FieldParser for NumericRangeParser {
    fn parse(&self, raw: &str) -> Parsed {
        let last = self
            .pattern
            .captures_iter(raw)
            .filter_map(|caps| caps.get(1))
            .last();

        match last {
            Some(m) => match m.as_str().replace(',', "").parse::<i64>() {
                Ok(value) => Parsed::ok(value),
                Err(_) => Parsed::failed(0i64),
            },
            None => Parsed::failed(0i64),
        }
    }

    fn output_type(&self) -> FieldType {
        FieldType::Int
    }
}

/// First signed integer in the fragment ("(1994)" -> 1994).
#[derive(Debug, Clone, Default)]
pub struct IntegerParser;

impl FieldParser for IntegerParser {
    fn parse(&self, raw: &str) -> Parsed {
        SIGNED_INTEGER
            .find(raw)
            .and_then(|m| m.as_str().parse::<i64>().ok())
            .map(Parsed::ok)
            .unwrap_or_else(|| Parsed::failed(0i64))
    }

    fn output_type(&self) -> FieldType {
        FieldType::Int
    }
}

/// First decimal number in the fragment ("9.3 (3M)" -> 9.3).
#[derive(Debug, Clone, Default)]
pub struct DecimalParser;

impl FieldParser for DecimalParser {
    fn parse(&self, raw: &str) -> Parsed {
        DECIMAL_NUMBER
            .find(raw)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|value| value.is_finite())
            .map(Parsed::ok)
            .unwrap_or_else(|| Parsed::failed(0.0))
    }

    fn output_type(&self) -> FieldType {
        FieldType::Float
    }
}
