use crate::utils::error::{EtlError, Result};
use std::collections::HashSet;

pub const VALID_OUTPUT_FORMATS: [&str; 4] = ["csv", "txt", "tsv", "json"];

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| EtlError::MissingConfigError {
        field: field_name.to_string(),
    })
}

/// 分隔符號必須是單一 ASCII 字元，且不能是換行或引號
pub fn validate_delimiter(field_name: &str, delimiter: char) -> Result<u8> {
    if !delimiter.is_ascii() || matches!(delimiter, '\n' | '\r' | '"') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: delimiter.escape_default().to_string(),
            reason: "Delimiter must be a single ASCII character other than a newline or quote"
                .to_string(),
        });
    }
    Ok(delimiter as u8)
}

pub fn validate_output_formats(field_name: &str, formats: &[String]) -> Result<()> {
    let allowed: HashSet<&str> = VALID_OUTPUT_FORMATS.iter().copied().collect();

    for format in formats {
        if !allowed.contains(format.as_str()) {
            return Err(EtlError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format.clone(),
                reason: format!(
                    "Unsupported format. Valid formats: {}",
                    VALID_OUTPUT_FORMATS.join(", ")
                ),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("input_path", "exports/ledger.csv").is_ok());
        assert!(validate_path("input_path", "").is_err());
        assert!(validate_path("input_path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("top_categories", 5, 1).is_ok());
        assert!(validate_positive_number("top_categories", 0, 1).is_err());
    }

    #[test]
    fn test_validate_delimiter() {
        assert_eq!(validate_delimiter("delimiter", ',').unwrap(), b',');
        assert_eq!(validate_delimiter("delimiter", '\t').unwrap(), b'\t');
        assert!(validate_delimiter("delimiter", '"').is_err());
        assert!(validate_delimiter("delimiter", '；').is_err());
    }

    #[test]
    fn test_validate_output_formats() {
        let formats = vec!["csv".to_string(), "json".to_string()];
        assert!(validate_output_formats("output_formats", &formats).is_ok());

        let invalid = vec!["xlsx".to_string()];
        assert!(validate_output_formats("output_formats", &invalid).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("ledger.csv".to_string());
        let absent: Option<String> = None;
        assert_eq!(
            validate_required_field("source.input_path", &present).unwrap(),
            "ledger.csv"
        );
        assert!(matches!(
            validate_required_field("source.input_path", &absent),
            Err(EtlError::MissingConfigError { .. })
        ));
    }
}
