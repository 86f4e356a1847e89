//! Schema validation for training records.
//!
//! Checks that a record (usually one parsed line of a dataset file) carries
//! the required fields with the right primitive types. The first violation
//! found is reported with its field name.

use serde_json::{Map, Value};

use crate::dataset::TrainingExample;
use crate::error::ValidationError;

/// Fields every record must carry as strings.
pub const REQUIRED_STRING_FIELDS: &[&str] = &["id", "instruction", "response", "pattern_type"];

/// Accepted values for `source`.
pub const VALID_SOURCES: &[&str] = &["synthetic", "real"];

/// Validator for training record schemas.
pub struct SchemaValidator;

impl SchemaValidator {
    /// Validate one raw line of a dataset file.
    pub fn validate_line(line: &str) -> Result<(), ValidationError> {
        let value: Value = serde_json::from_str(line)
            .map_err(|e| ValidationError::Malformed(format!("invalid JSON: {}", e)))?;
        Self::validate_value(&value)
    }

    /// Validate an already-built record.
    ///
    /// Records produced by the assembler must always pass; a failure here
    /// means the assembler built something malformed.
    pub fn validate_example(example: &TrainingExample) -> Result<(), ValidationError> {
        let value = serde_json::to_value(example)?;
        Self::validate_value(&value)
    }

    /// Validate a parsed JSON value against the record schema.
    ///
    /// Performs the following checks:
    /// - `id`, `instruction`, `response`, `pattern_type` present as strings
    /// - `id`, `instruction`, `response` non-empty
    /// - `confidence`, when present, a number in `[0, 1]`
    /// - `source`, when present, one of `synthetic` / `real`
    /// - `created_at` and `language`, when present, strings (never null)
    /// - other optional fields, when present and non-null, of the right type
    pub fn validate_value(value: &Value) -> Result<(), ValidationError> {
        let obj = value
            .as_object()
            .ok_or_else(|| ValidationError::Malformed("record must be a JSON object".to_string()))?;

        for field in REQUIRED_STRING_FIELDS {
            let text = match obj.get(*field) {
                None | Some(Value::Null) => {
                    return Err(ValidationError::violation(*field, "field required"))
                }
                Some(Value::String(s)) => s,
                Some(_) => return Err(ValidationError::violation(*field, "expected a string")),
            };
            if *field != "pattern_type" && text.trim().is_empty() {
                return Err(ValidationError::violation(*field, "must not be empty"));
            }
        }

        if let Some(confidence) = obj.get("confidence") {
            let confidence = confidence
                .as_f64()
                .ok_or_else(|| ValidationError::violation("confidence", "expected a number"))?;
            if !(0.0..=1.0).contains(&confidence) {
                return Err(ValidationError::violation(
                    "confidence",
                    format!("{} is outside [0, 1]", confidence),
                ));
            }
        }

        if let Some(source) = obj.get("source") {
            match source.as_str() {
                Some(s) if VALID_SOURCES.contains(&s) => {}
                _ => {
                    return Err(ValidationError::violation(
                        "source",
                        format!("expected one of {:?}, got {}", VALID_SOURCES, source),
                    ))
                }
            }
        }

        Self::check_optional(obj, "timeframe", Value::is_string, "a string")?;
        Self::check_optional(obj, "ticker", Value::is_string, "a string")?;
        Self::check_defaulted(obj, "created_at", Value::is_string, "a string")?;
        Self::check_defaulted(obj, "language", Value::is_string, "a string")?;
        Self::check_optional(obj, "seed", Value::is_u64, "a non-negative integer")?;
        Self::check_optional(obj, "metadata", Value::is_object, "an object")?;

        Ok(())
    }

    /// Fields that fall back to a default when absent but may not be null.
    fn check_defaulted(
        obj: &Map<String, Value>,
        field: &str,
        accepts: fn(&Value) -> bool,
        expected: &str,
    ) -> Result<(), ValidationError> {
        match obj.get(field) {
            Some(Value::Null) => Err(ValidationError::violation(field, "must not be null")),
            _ => Self::check_optional(obj, field, accepts, expected),
        }
    }

    fn check_optional(
        obj: &Map<String, Value>,
        field: &str,
        accepts: fn(&Value) -> bool,
        expected: &str,
    ) -> Result<(), ValidationError> {
        match obj.get(field) {
            None => Ok(()),
            Some(Value::Null) => Ok(()),
            Some(v) if accepts(v) => Ok(()),
            Some(_) => Err(ValidationError::violation(
                field,
                format!("expected {}", expected),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_record() -> Value {
        json!({
            "id": "abc",
            "instruction": "Explain the retest pattern at 101.5 level on 1h timeframe",
            "response": "A retest occurs when...",
            "pattern_type": "price_action",
            "timeframe": "1h",
            "ticker": null,
            "source": "synthetic",
            "created_at": "2024-06-03T15:30:00+00:00",
            "seed": 42,
            "confidence": 1.0,
            "language": "en",
            "metadata": {"template": "Retest", "params": {}}
        })
    }

    fn field_of(result: Result<(), ValidationError>) -> String {
        result
            .unwrap_err()
            .field()
            .expect("should be a field violation")
            .to_string()
    }

    #[test]
    fn test_valid_record_passes() {
        assert!(SchemaValidator::validate_value(&valid_record()).is_ok());
    }

    #[test]
    fn test_minimal_record_passes() {
        let record = json!({"id": "1", "instruction": "i", "response": "r", "pattern_type": "x"});
        assert!(SchemaValidator::validate_value(&record).is_ok());
    }

    #[test]
    fn test_missing_required_field() {
        for field in REQUIRED_STRING_FIELDS {
            let mut record = valid_record();
            record
                .as_object_mut()
                .expect("object")
                .remove(*field);
            assert_eq!(field_of(SchemaValidator::validate_value(&record)), *field);
        }
    }

    #[test]
    fn test_wrong_type_required_field() {
        let mut record = valid_record();
        record["instruction"] = json!(7);
        assert_eq!(field_of(SchemaValidator::validate_value(&record)), "instruction");
    }

    #[test]
    fn test_empty_response_rejected() {
        let mut record = valid_record();
        record["response"] = json!("   ");
        assert_eq!(field_of(SchemaValidator::validate_value(&record)), "response");
    }

    #[test]
    fn test_confidence_bounds() {
        let mut record = valid_record();
        record["confidence"] = json!(1.5);
        assert_eq!(field_of(SchemaValidator::validate_value(&record)), "confidence");

        record["confidence"] = json!("high");
        assert_eq!(field_of(SchemaValidator::validate_value(&record)), "confidence");

        record["confidence"] = json!(0);
        assert!(SchemaValidator::validate_value(&record).is_ok());
    }

    #[test]
    fn test_source_restricted() {
        let mut record = valid_record();
        record["source"] = json!("scraped");
        assert_eq!(field_of(SchemaValidator::validate_value(&record)), "source");

        record["source"] = json!("real");
        assert!(SchemaValidator::validate_value(&record).is_ok());
    }

    #[test]
    fn test_optional_field_types() {
        let mut record = valid_record();
        record["seed"] = json!(-1);
        assert_eq!(field_of(SchemaValidator::validate_value(&record)), "seed");

        let mut record = valid_record();
        record["metadata"] = json!([1, 2]);
        assert_eq!(field_of(SchemaValidator::validate_value(&record)), "metadata");

        let mut record = valid_record();
        record["language"] = json!(3);
        assert_eq!(field_of(SchemaValidator::validate_value(&record)), "language");

        let mut record = valid_record();
        record["ticker"] = Value::Null;
        record["metadata"] = Value::Null;
        assert!(SchemaValidator::validate_value(&record).is_ok());
    }

    #[test]
    fn test_defaulted_fields_reject_null() {
        for field in ["created_at", "language"] {
            let mut record = valid_record();
            record[field] = Value::Null;
            assert_eq!(field_of(SchemaValidator::validate_value(&record)), field);

            record.as_object_mut().expect("object").remove(field);
            assert!(SchemaValidator::validate_value(&record).is_ok());
        }
    }

    #[test]
    fn test_accepted_lines_parse_as_records() {
        let mut nullable = valid_record();
        for field in ["timeframe", "ticker", "seed", "metadata"] {
            nullable[field] = Value::Null;
        }
        let minimal = json!({"id": "1", "instruction": "i", "response": "r", "pattern_type": "x"});

        for record in [valid_record(), nullable, minimal] {
            let line = record.to_string();
            SchemaValidator::validate_line(&line).expect("line should validate");
            let parsed: TrainingExample = serde_json::from_str(&line).expect("line should parse");
            assert_eq!(parsed.id, record["id"].as_str().expect("id"));
        }
    }

    #[test]
    fn test_invalid_json_line() {
        let err = SchemaValidator::validate_line("{not json").unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(_)));

        let err = SchemaValidator::validate_line("[1,2,3]").unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(_)));
    }
}
