//! App data module - named blobs stored on behalf of client apps.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, ValidationError};

/// An opaque document keyed by name. Writing an existing name replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppData {
    pub name: String,
    pub data: String,
    pub updated_at: Timestamp,
}

/// Check an app-data key and return it trimmed.
pub fn validate_app_data_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::empty_field("name"));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_must_not_be_blank() {
        assert!(validate_app_data_name("  ").is_err());
        assert_eq!(validate_app_data_name(" home ").unwrap(), "home");
    }
}
