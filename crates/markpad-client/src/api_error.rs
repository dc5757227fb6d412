//! Failure-body normalization and session-expiry recognition.
//!
//! The storage service reports structured error bodies
//! (`{"error": {code, message, field?, details?}}`); older revisions and the
//! auth service report a bare string (`{"error": "Token has expired"}`).
//! Both shapes, plus non-JSON bodies, normalize into [`ApiError`].

use markpad_core::{ApiError, Error};
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Messages the backends use to signal that the credentials expired and a
/// refresh should be attempted. Other 401 causes must NOT trigger a refresh.
const EXPIRY_SIGNALS: &[&str] = &["Token has expired", "Missing access token", "JWT not provided"];

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorField,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Bare(String),
    Structured {
        code: Option<String>,
        message: Option<String>,
        field: Option<String>,
        details: Option<JsonValue>,
    },
}

/// Normalize a failure response body.
///
/// Never fails: an unparseable body becomes a `GENERIC` error carrying the
/// raw text (or a stock message when the body is empty).
pub fn parse_error_body(body: &str) -> ApiError {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
    match parsed {
        Some(ErrorBody {
            error: ErrorField::Bare(message),
        }) => ApiError::generic(message),
        Some(ErrorBody {
            error:
                ErrorField::Structured {
                    code,
                    message,
                    field,
                    details,
                },
        }) => ApiError {
            code: code.unwrap_or_else(|| "GENERIC".to_string()),
            message: message.unwrap_or_else(|| "An error occurred".to_string()),
            field,
            details,
        },
        None if body.trim().is_empty() => ApiError::generic("Network error"),
        None => ApiError::generic(body.trim()),
    }
}

/// Returns true when a failure is the backend-defined session-expiry
/// signal: the status alone is not enough, because 401 is reused for
/// several distinct conditions.
pub fn is_expiry_signal(status: u16, message: &str) -> bool {
    status == 401 && EXPIRY_SIGNALS.contains(&message)
}

/// Map a normalized failure to a typed error.
///
/// `subject` is the document name the operation targeted, when known; the
/// resource-error variants carry it so the caller can name the file in its
/// message.
pub fn map_failure(status: u16, api: ApiError, subject: Option<&str>) -> Error {
    let named = || {
        subject
            .map(str::to_string)
            .unwrap_or_else(|| api.message.clone())
    };
    match api.code.as_str() {
        "FILE_NOT_FOUND" => Error::NotFound(named()),
        "FILE_ALREADY_EXISTS" => Error::AlreadyExists(named()),
        "USER_SPACE_FULL" => Error::SpaceFull,
        "FILE_COUNT_LIMIT" => Error::FileCountLimit,
        _ if status == 401 => Error::Unauthorized(api.message),
        _ => Error::Api {
            code: api.code,
            message: api.message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_structured_body() {
        let api = parse_error_body(
            r#"{"error":{"code":"FILE_ALREADY_EXISTS","message":"taken","field":"newName"}}"#,
        );
        assert_eq!(api.code, "FILE_ALREADY_EXISTS");
        assert_eq!(api.message, "taken");
        assert_eq!(api.field.as_deref(), Some("newName"));
    }

    #[test]
    fn test_parses_structured_body_with_details() {
        let api = parse_error_body(
            r#"{"error":{"code":"FILE_COUNT_LIMIT","message":"limit","details":{"max":100}}}"#,
        );
        assert_eq!(api.code, "FILE_COUNT_LIMIT");
        assert_eq!(api.details.unwrap()["max"], 100);
    }

    #[test]
    fn test_parses_bare_string_body() {
        let api = parse_error_body(r#"{"error":"JWT not provided"}"#);
        assert_eq!(api.code, "GENERIC");
        assert_eq!(api.message, "JWT not provided");
    }

    #[test]
    fn test_tolerates_non_json_body() {
        let api = parse_error_body("<html>bad gateway</html>");
        assert_eq!(api.code, "GENERIC");
        assert_eq!(api.message, "<html>bad gateway</html>");
    }

    #[test]
    fn test_tolerates_empty_body() {
        let api = parse_error_body("");
        assert_eq!(api.code, "GENERIC");
        assert_eq!(api.message, "Network error");
    }

    #[test]
    fn test_expiry_signal_requires_known_message() {
        assert!(is_expiry_signal(401, "Token has expired"));
        assert!(is_expiry_signal(401, "Missing access token"));
        assert!(is_expiry_signal(401, "JWT not provided"));
        // Other 401 causes never trigger a refresh.
        assert!(!is_expiry_signal(401, "Invalid credentials"));
        assert!(!is_expiry_signal(403, "Token has expired"));
    }

    #[test]
    fn test_map_failure_not_found_carries_subject() {
        let api = parse_error_body(r#"{"error":{"code":"FILE_NOT_FOUND","message":"gone"}}"#);
        match map_failure(404, api, Some("notes.md")) {
            Error::NotFound(name) => assert_eq!(name, "notes.md"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_map_failure_quota_codes() {
        let space = parse_error_body(r#"{"error":{"code":"USER_SPACE_FULL","message":"full"}}"#);
        assert!(matches!(map_failure(409, space, None), Error::SpaceFull));
        let count = parse_error_body(r#"{"error":{"code":"FILE_COUNT_LIMIT","message":"max"}}"#);
        assert!(matches!(
            map_failure(409, count, None),
            Error::FileCountLimit
        ));
    }

    #[test]
    fn test_map_failure_other_401_is_unauthorized() {
        let api = ApiError::generic("Invalid credentials");
        match map_failure(401, api, None) {
            Error::Unauthorized(msg) => assert_eq!(msg, "Invalid credentials"),
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_map_failure_unknown_code_passes_through() {
        let api = parse_error_body(r#"{"error":{"code":"SOMETHING_ELSE","message":"odd"}}"#);
        match map_failure(500, api, None) {
            Error::Api { code, message } => {
                assert_eq!(code, "SOMETHING_ELSE");
                assert_eq!(message, "odd");
            }
            other => panic!("Expected Api, got {:?}", other),
        }
    }
}
