use serde::Serialize;
use tracing::{info, warn};

use crate::common::types::{FieldSpec, FieldType, FieldValue, Record};

/// One field whose value does not have the declared type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationMismatch {
    pub record: usize,
    pub field: String,
    pub expected: FieldType,
    /// `None` when the field is missing from the record altogether
    pub observed: Option<FieldValue>,
}

/// Observational report; never stops the pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub checked: usize,
    pub mismatches: Vec<ValidationMismatch>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Does `value` satisfy `expected`? Integers are accepted where a float is
/// declared, as any JSON number is.
fn type_matches(expected: FieldType, value: &FieldValue) -> bool {
    matches!(
        (expected, value),
        (FieldType::Float, FieldValue::Float(_))
            | (FieldType::Float, FieldValue::Int(_))
            | (FieldType::Int, FieldValue::Int(_))
            | (FieldType::Bool, FieldValue::Bool(_))
            | (FieldType::String, FieldValue::Text(_))
    )
}

/// Checks records against the declared types of a schema
pub struct RecordValidator<'s> {
    schema: &'s [FieldSpec],
}

impl<'s> RecordValidator<'s> {
    pub fn new(schema: &'s [FieldSpec]) -> Self {
        Self { schema }
    }

    /// Mismatches for one record
    pub fn validate(&self, index: usize, record: &Record) -> Vec<ValidationMismatch> {
        self.schema
            .iter()
            .filter_map(|spec| {
                let observed = record.get(&spec.name);
                match observed {
                    Some(value) if type_matches(spec.field_type, value) => None,
                    _ => Some(ValidationMismatch {
                        record: index,
                        field: spec.name.clone(),
                        expected: spec.field_type,
                        observed: observed.cloned(),
                    }),
                }
            })
            .collect()
    }

    /// Validate a batch. Records are only inspected, never dropped.
    pub fn validate_all(&self, records: &[Record]) -> ValidationReport {
        let mut report = ValidationReport {
            checked: records.len(),
            mismatches: Vec::new(),
        };

        for (index, record) in records.iter().enumerate() {
            for mismatch in self.validate(index, record) {
                warn!(
                    "Record {}: field '{}' expected {} but found {:?}",
                    mismatch.record, mismatch.field, mismatch.expected, mismatch.observed
                );
                report.mismatches.push(mismatch);
            }
        }

        if report.is_clean() {
            info!("All {} records match the schema types", report.checked);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("price", FieldType::Float, "currency_gbp", &[".price_color"]),
            FieldSpec::new("star_rating", FieldType::Int, "ordinal_word", &[".star-rating"]),
            FieldSpec::new("is_in_stock", FieldType::Bool, "in_stock", &[".availability"]),
        ]
    }

    fn book(price: FieldValue, rating: FieldValue, stock: FieldValue) -> Record {
        vec![("price", price), ("star_rating", rating), ("is_in_stock", stock)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_clean_batch() {
        let schema = schema();
        let validator = RecordValidator::new(&schema);
        let records = vec![
            book(FieldValue::Float(51.77), FieldValue::Int(3), FieldValue::Bool(true)),
            // whole-number prices are still numbers
            book(FieldValue::Int(20), FieldValue::Int(0), FieldValue::Bool(false)),
        ];

        let report = validator.validate_all(&records);
        assert_eq!(report.checked, 2);
        assert!(report.is_clean());
    }

    #[test]
    fn test_mismatches_are_collected_not_fatal() {
        let schema = schema();
        let validator = RecordValidator::new(&schema);
        let records = vec![
            book(FieldValue::Float(1.0), FieldValue::Int(1), FieldValue::Bool(true)),
            book(FieldValue::from("£9"), FieldValue::Float(2.5), FieldValue::Bool(true)),
            vec![("price", FieldValue::Float(3.0))].into_iter().collect(),
        ];

        let report = validator.validate_all(&records);
        assert_eq!(report.checked, 3);

        let found: Vec<(usize, &str)> = report
            .mismatches
            .iter()
            .map(|m| (m.record, m.field.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![(1, "price"), (1, "star_rating"), (2, "star_rating"), (2, "is_in_stock")]
        );
        assert_eq!(report.mismatches[0].observed, Some(FieldValue::from("£9")));
        assert_eq!(report.mismatches[3].observed, None);
        assert_eq!(report.mismatches[1].expected, FieldType::Int);
    }
}
