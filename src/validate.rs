//! Request validators: required fields, identifier format, ownership.

use uuid::Uuid;

use crate::error::ApiError;

/// Every (name, value) pair must be present and not blank
pub fn require_fields(fields: &[(&str, Option<&str>)]) -> Result<(), ApiError> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|(_, value)| value.map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| format!("{} is required", name))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error("All fields are required", missing))
    }
}

/// Parse a path identifier, rejecting malformed values with the entity name
/// in the message
pub fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::bad_request(format!("{} ID is missing", what)));
    }
    Uuid::parse_str(trimmed)
        .map_err(|_| ApiError::bad_request(format!("Invalid {} ID", what.to_lowercase())))
}

/// Ownership gate for mutations; mismatch fails before any write
pub fn ensure_owner(actor: Uuid, owner: Uuid, action: &str) -> Result<(), ApiError> {
    if actor == owner {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!("Only the owner can {}", action)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_fields_lists_every_blank_field() {
        let err = require_fields(&[
            ("fullname", Some("")),
            ("email", None),
            ("username", Some("chai")),
        ])
        .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.field_errors().len(), 2);
    }

    #[test]
    fn require_fields_accepts_complete_input() {
        assert!(require_fields(&[("name", Some("playlist")), ("description", Some("x"))]).is_ok());
    }

    #[test]
    fn parse_id_distinguishes_missing_from_malformed() {
        let missing = parse_id("  ", "Video").unwrap_err();
        assert_eq!(missing.message(), "Video ID is missing");

        let malformed = parse_id("not-a-uuid", "Video").unwrap_err();
        assert_eq!(malformed.message(), "Invalid video ID");

        assert!(parse_id("8c59f1d0-93ee-4c8a-9d61-3e813e42bd6f", "Video").is_ok());
    }

    #[test]
    fn ensure_owner_rejects_other_actors() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert!(ensure_owner(owner, owner, "edit the playlist").is_ok());
        let err = ensure_owner(other, owner, "edit the playlist").unwrap_err();
        assert_eq!(err.status_code(), 403);
    }
}
