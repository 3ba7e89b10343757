//! Parser tag constants to keep job files and the registry in agreement.
//! These are the entries every `ParserRegistry::new()` starts with.

// Core parsers
pub const CURRENCY_PARSER: &str = "currency";
pub const CURRENCY_GBP_PARSER: &str = "currency_gbp";
pub const ORDINAL_WORD_PARSER: &str = "ordinal_word";
pub const NUMERIC_RANGE_PARSER: &str = "numeric_range";
pub const DURATION_PARSER: &str = "duration";
pub const IN_STOCK_PARSER: &str = "in_stock";
pub const FIRST_NAME_PARSER: &str = "first_name";
pub const LAST_NAME_PARSER: &str = "last_name";

// General purpose parsers
pub const TEXT_PARSER: &str = "text";
pub const INTEGER_PARSER: &str = "integer";
pub const DECIMAL_PARSER: &str = "decimal";
pub const FIRST_LINE_PARSER: &str = "first_line";

// Parser configuration defaults
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";
pub const GBP_CURRENCY_SYMBOL: &str = "£";
pub const DEFAULT_STOCK_MARKER: &str = "In stock";

/// Literal returned by the duration and first-line parsers when nothing matches
pub const UNKNOWN_VALUE: &str = "Unknown";

/// Navigation timeout used when a job does not set one
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 15_000;

/// Get all built-in parser tags
pub fn get_builtin_parsers() -> Vec<&'static str> {
    vec![
        CURRENCY_PARSER,
        CURRENCY_GBP_PARSER,
        ORDINAL_WORD_PARSER,
        NUMERIC_RANGE_PARSER,
        DURATION_PARSER,
        IN_STOCK_PARSER,
        FIRST_NAME_PARSER,
        LAST_NAME_PARSER,
        TEXT_PARSER,
        INTEGER_PARSER,
        DECIMAL_PARSER,
        FIRST_LINE_PARSER,
    ]
}
