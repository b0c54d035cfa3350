//! Error types shared by the editing core, the backend client and the API

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Result type for tierdesk operations
pub type Result<T> = std::result::Result<T, AdminError>;

/// A single failed field check
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AdminError {
    /// Missing or rejected bearer token
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Client-side field checks failed
    #[error("Validation failed: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    /// Backend answered with a non-2xx status
    #[error("Backend error: status {status}")]
    Network { status: u16, body: String },

    /// Backend could not be reached (connect error, timeout, bad body)
    #[error("Backend unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    /// Backend returned 404 for an admin endpoint
    #[error("Endpoint not implemented by backend: {0}")]
    NotImplemented(String),

    /// Mutation would break a structural invariant
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Removing a non-empty part or tier needs explicit confirmation
    #[error("{kind} contains {chart_count} charts; confirmation required")]
    ConfirmationRequired {
        kind: &'static str,
        chart_count: usize,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AdminError {
    /// Shorthand for a single-field validation error
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        AdminError::Validation(vec![FieldError::new(field, message)])
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ResponseError for AdminError {
    fn status_code(&self) -> StatusCode {
        match self {
            AdminError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            AdminError::Validation(_) => StatusCode::BAD_REQUEST,
            AdminError::Network { .. } | AdminError::Unreachable(_) => StatusCode::BAD_GATEWAY,
            AdminError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            AdminError::InvariantViolation(_) | AdminError::ConfirmationRequired { .. } => {
                StatusCode::CONFLICT
            }
            AdminError::NotFound(_) => StatusCode::NOT_FOUND,
            AdminError::Io(_) | AdminError::Json(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AdminError::Validation(fields) => serde_json::json!({
                "error": "Validation failed",
                "fields": fields,
            }),
            AdminError::Network { status, body } => serde_json::json!({
                "error": self.to_string(),
                "upstreamStatus": status,
                "detail": body,
            }),
            AdminError::ConfirmationRequired { chart_count, .. } => serde_json::json!({
                "error": self.to_string(),
                "chartCount": chart_count,
            }),
            _ => serde_json::json!({ "error": self.to_string() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AdminError::AuthenticationRequired.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AdminError::invalid("level", "out of range").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AdminError::Network {
                status: 500,
                body: String::new()
            }
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AdminError::InvariantViolation("last tier".into()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_validation_message_lists_fields() {
        let err = AdminError::Validation(vec![
            FieldError::new("title", "required"),
            FieldError::new("level", "must be between 1 and 20"),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: title: required; level: must be between 1 and 20"
        );
    }
}
