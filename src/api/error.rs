use super::http::HttpResponse;
use crate::libs::error::{AppError, Lookup, INTERNAL_ERROR, VALIDATION_ERROR};
use serde_json::{json, Value};
use tracing::error;

pub const ROUTE_NOT_FOUND: &str = "ROUTE_NOT_FOUND";
pub const METHOD_NOT_ALLOWED: &str = "METHOD_NOT_ALLOWED";
pub const BAD_REQUEST: &str = "BAD_REQUEST";

/// Body of every failed REST response.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
    pub details: Option<Value>,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_code: &str, message: impl Into<String>, details: Option<Value>) -> Self {
        ErrorResponse {
            error_code: error_code.to_string(),
            message: message.into(),
            details,
            timestamp: chrono::Local::now().to_rfc3339(),
        }
    }

    pub fn into_response(self, status: u16) -> HttpResponse {
        let body = json!({
            "errorCode": self.error_code,
            "message": self.message,
            "details": self.details,
            "timestamp": self.timestamp,
        });
        HttpResponse::new(status).json(&body)
    }
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::Validation { code, field, message } => {
                ErrorResponse::new(VALIDATION_ERROR, message.clone(), Some(json!({ "field": field, "code": code })))
            }
            AppError::NotFound { kind, lookup } => {
                let details = match lookup {
                    Lookup::Id(id) => json!({ "entity": kind.label(), "id": id }),
                    Lookup::Key(key) => json!({ "entity": kind.label(), "key": key }),
                };
                ErrorResponse::new(kind.not_found_code(), err.message(), Some(details))
            }
            AppError::Database { code, .. } => ErrorResponse::new(code, "A database error occurred", None),
            AppError::Security { code, message } => ErrorResponse::new(code, message.clone(), None),
            AppError::Internal(_) => ErrorResponse::new(INTERNAL_ERROR, "An unexpected error occurred", None),
        }
    }
}

/// Maps a service failure onto its status and envelope. Server-side
/// failures are logged in full; the client only sees the code.
pub fn error_response(err: &AppError) -> HttpResponse {
    let status = err.status();
    if status >= 500 {
        error!(error_code = err.error_code(), error = ?err, "request failed");
    }
    ErrorResponse::from(err).into_response(status)
}

pub fn route_not_found(method: &str, path: &str) -> HttpResponse {
    ErrorResponse::new(ROUTE_NOT_FOUND, format!("Route not found: {} {}", method, path), None).into_response(404)
}

pub fn method_not_allowed(method: &str, path: &str) -> HttpResponse {
    ErrorResponse::new(METHOD_NOT_ALLOWED, format!("Method {} is not allowed on {}", method, path), None)
        .into_response(405)
}

pub fn bad_request(message: impl Into<String>) -> HttpResponse {
    ErrorResponse::new(BAD_REQUEST, message, None).into_response(400)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::error::EntityKind;

    fn body(response: &HttpResponse) -> Value {
        serde_json::from_slice(response.body_bytes()).unwrap()
    }

    #[test]
    fn validation_uses_generic_code_and_field_details() {
        let err = AppError::validation("title", "TASK_TITLE_REQUIRED", "Title is required");
        let response = error_response(&err);
        assert_eq!(response.status_code(), 400);

        let body = body(&response);
        assert_eq!(body["errorCode"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["field"], "title");
        assert_eq!(body["details"]["code"], "TASK_TITLE_REQUIRED");
        assert!(body["timestamp"].is_string());
    }

    #[test]
    fn not_found_keeps_entity_code() {
        let response = error_response(&AppError::not_found(EntityKind::Task, 42));
        assert_eq!(response.status_code(), 404);

        let body = body(&response);
        assert_eq!(body["errorCode"], "TASK_NOT_FOUND");
        assert_eq!(body["details"]["id"], 42);
    }

    #[test]
    fn internal_message_is_generic() {
        let response = error_response(&AppError::Internal("stack details".into()));
        assert_eq!(response.status_code(), 500);
        assert_eq!(body(&response)["message"], "An unexpected error occurred");
    }
}
