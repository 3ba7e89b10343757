use super::{FieldParser, Parsed};
use crate::common::types::FieldType;

/// Strips a currency symbol and parses the remainder as a decimal amount.
#[derive(Debug, Clone)]
pub struct CurrencyParser {
    symbol: String,
}

impl CurrencyParser {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl FieldParser for CurrencyParser {
    fn parse(&self, raw: &str) -> Parsed {
        let trimmed = raw.trim();
        let amount = if self.symbol.is_empty() {
            trimmed.to_string()
        } else {
            trimmed.replacen(self.symbol.as_str(), "", 1)
        };

        match amount.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Parsed::ok(value),
            _ => Parsed::failed(0.0),
        }
    }

    fn output_type(&self) -> FieldType {
        FieldType::Float
    }
}
