//! Typed error handling for the proposal endpoints
//!
//! Validation and authorization failures are raised by the request
//! resolvers before a handler body runs. Storage and rendering failures are
//! not recovered: they bubble up and become a 500 response.
//!
//! # Example
//!
//! ```rust,ignore
//! let proposal = store
//!     .find_proposal(&account_id, public_id)
//!     .await?
//!     .ok_or_else(|| ProposalError::not_found("proposal", public_id))?;
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::collections::BTreeMap;

/// Result alias used across the crate
pub type Result<T, E = ProposalError> = std::result::Result<T, E>;

/// The main error type
#[derive(Debug, thiserror::Error)]
pub enum ProposalError {
    /// Entity not visible to the requesting account
    #[error("{entity_type} with id '{public_id}' not found")]
    NotFound { entity_type: String, public_id: u32 },

    /// Missing or malformed request context
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// The user may not perform this operation
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Payload failed validation (field -> messages)
    #[error("Validation failed")]
    Validation {
        errors: BTreeMap<String, Vec<String>>,
    },

    /// Malformed request input
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// A lifecycle transition that is not allowed from the current state
    #[error("Cannot {action} {entity_type} '{public_id}' in state {state}")]
    InvalidTransition {
        entity_type: String,
        public_id: u32,
        action: String,
        state: String,
    },

    /// Storage backend failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// View rendering failure
    #[error("Render error: {0}")]
    Render(#[from] tera::Error),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ProposalError {
    pub fn not_found(entity_type: &str, public_id: u32) -> Self {
        ProposalError::NotFound {
            entity_type: entity_type.to_string(),
            public_id,
        }
    }

    /// Validation error for a single field
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field.to_string(), vec![message.into()]);
        ProposalError::Validation { errors }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProposalError::NotFound { .. } => StatusCode::NOT_FOUND,
            ProposalError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ProposalError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ProposalError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ProposalError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ProposalError::InvalidTransition { .. } => StatusCode::CONFLICT,
            ProposalError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProposalError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProposalError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ProposalError::NotFound { .. } => "ENTITY_NOT_FOUND",
            ProposalError::Unauthorized { .. } => "UNAUTHORIZED",
            ProposalError::Forbidden { .. } => "FORBIDDEN",
            ProposalError::Validation { .. } => "VALIDATION_ERROR",
            ProposalError::BadRequest { .. } => "BAD_REQUEST",
            ProposalError::InvalidTransition { .. } => "INVALID_TRANSITION",
            ProposalError::Storage(_) => "STORAGE_ERROR",
            ProposalError::Render(_) => "RENDER_ERROR",
            ProposalError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ProposalError::NotFound {
                entity_type,
                public_id,
            } => Some(serde_json::json!({
                "entity_type": entity_type,
                "public_id": public_id
            })),
            ProposalError::Validation { errors } => Some(serde_json::json!({ "fields": errors })),
            _ => None,
        }
    }
}

impl IntoResponse for ProposalError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for ProposalError {
    fn from(errs: validator::ValidationErrors) -> Self {
        let errors = errs
            .field_errors()
            .into_iter()
            .map(|(field, list)| {
                let messages = list
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();
        ProposalError::Validation { errors }
    }
}

impl From<serde_yaml::Error> for ProposalError {
    fn from(err: serde_yaml::Error) -> Self {
        ProposalError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ProposalError::not_found("proposal", 3).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ProposalError::field("invoice_id", "required").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ProposalError::Forbidden {
                message: "nope".into()
            }
            .status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ProposalError::Storage("lock poisoned".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_details() {
        let response = ProposalError::not_found("proposal", 42).to_response();
        assert_eq!(response.code, "ENTITY_NOT_FOUND");
        assert_eq!(response.message, "proposal with id '42' not found");
        let details = response.details.unwrap();
        assert_eq!(details["public_id"], 42);
    }

    #[test]
    fn test_validation_details_list_fields() {
        let response = ProposalError::field("invoice_id", "The invoice is required")
            .to_response();
        let details = response.details.unwrap();
        assert_eq!(details["fields"]["invoice_id"][0], "The invoice is required");
    }
}
