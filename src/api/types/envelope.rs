//! Uniform response envelope
//!
//! Every handler answers with an [`Envelope`]. Its `code` becomes the HTTP
//! status and its payload the JSON body. Error bodies are `{"error": message}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::domain::DomainError;

#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Success { code: StatusCode, payload: Value },
    ClientError { code: StatusCode, message: String },
    ServerError { code: StatusCode, message: String },
}

#[derive(Serialize)]
struct Data<T> {
    data: T,
}

impl Envelope {
    /// Success with an arbitrary payload
    pub fn success(code: StatusCode, payload: impl Serialize) -> Self {
        match serde_json::to_value(payload) {
            Ok(payload) => Self::Success { code, payload },
            Err(e) => {
                error!(error = %e, "Failed to serialize response payload");
                Self::internal_error()
            }
        }
    }

    /// `200 {"data": ...}`
    pub fn data(data: impl Serialize) -> Self {
        Self::success(StatusCode::OK, Data { data })
    }

    /// `201 {"data": ...}`
    pub fn created(data: impl Serialize) -> Self {
        Self::success(StatusCode::CREATED, Data { data })
    }

    pub fn client_error(code: StatusCode, message: impl Into<String>) -> Self {
        Self::ClientError {
            code,
            message: message.into(),
        }
    }

    pub fn bad_request() -> Self {
        Self::client_error(StatusCode::BAD_REQUEST, "Bad Request")
    }

    pub fn forbidden() -> Self {
        Self::client_error(StatusCode::FORBIDDEN, "Forbidden")
    }

    pub fn internal_error() -> Self {
        Self::ServerError {
            code: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal Server Error".to_string(),
        }
    }

    pub fn not_implemented() -> Self {
        Self::ServerError {
            code: StatusCode::NOT_IMPLEMENTED,
            message: "Not Implemented".to_string(),
        }
    }

    pub fn code(&self) -> StatusCode {
        match self {
            Self::Success { code, .. }
            | Self::ClientError { code, .. }
            | Self::ServerError { code, .. } => *code,
        }
    }

    pub fn body(&self) -> Value {
        match self {
            Self::Success { payload, .. } => payload.clone(),
            Self::ClientError { message, .. } | Self::ServerError { message, .. } => {
                json!({ "error": message })
            }
        }
    }

    /// Write the envelope out as an HTTP response
    pub fn send(self) -> Response {
        (self.code(), Json(self.body())).into_response()
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        self.send()
    }
}

impl From<DomainError> for Envelope {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { message } => {
                debug!(error = %message, "Rejected invalid request");
                Self::bad_request()
            }
            other => {
                error!(error = %other, "Request failed");
                Self::internal_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_canonical_errors() {
        assert_eq!(Envelope::bad_request().code(), StatusCode::BAD_REQUEST);
        assert_eq!(Envelope::bad_request().body(), json!({"error": "Bad Request"}));
        assert_eq!(Envelope::forbidden().body(), json!({"error": "Forbidden"}));
        assert_eq!(
            Envelope::internal_error().body(),
            json!({"error": "Internal Server Error"})
        );
        assert_eq!(Envelope::not_implemented().code(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(
            Envelope::not_implemented().body(),
            json!({"error": "Not Implemented"})
        );
    }

    #[test]
    fn test_data_wraps_payload() {
        let envelope = Envelope::data(vec![1, 2]);

        assert_eq!(envelope.code(), StatusCode::OK);
        assert_eq!(envelope.body(), json!({"data": [1, 2]}));
    }

    #[test]
    fn test_created() {
        let envelope = Envelope::created("abc");

        assert_eq!(envelope.code(), StatusCode::CREATED);
        assert_eq!(envelope.body(), json!({"data": "abc"}));
    }

    #[test]
    fn test_domain_error_mapping() {
        let validation: Envelope = DomainError::validation("Invalid resume format: <b>hi").into();
        assert_eq!(validation, Envelope::bad_request());
        assert_eq!(validation.body(), json!({"error": "Bad Request"}));

        let storage: Envelope = DomainError::storage("connection reset by peer").into();
        assert_eq!(storage, Envelope::internal_error());
    }

    #[tokio::test]
    async fn test_send_writes_status_and_body() {
        let response = Envelope::forbidden().send();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"error": "Forbidden"}));
    }
}
