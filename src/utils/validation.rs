use crate::utils::error::{EtlError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Every delimiter candidate must be exactly one ASCII character, and at
/// least one candidate must be given.
pub fn validate_delimiters(field_name: &str, delimiters: &[String]) -> Result<Vec<char>> {
    if delimiters.is_empty() {
        return Err(EtlError::InvalidConfigValue {
            field: field_name.to_string(),
            value: "[]".to_string(),
            reason: "At least one delimiter candidate is required".to_string(),
        });
    }

    delimiters
        .iter()
        .map(|candidate| {
            let mut chars = candidate.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Ok(c),
                _ => Err(EtlError::InvalidConfigValue {
                    field: field_name.to_string(),
                    value: candidate.clone(),
                    reason: "Delimiter must be a single ASCII character".to_string(),
                }),
            }
        })
        .collect()
}
