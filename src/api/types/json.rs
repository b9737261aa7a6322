//! JSON extractor with field validation

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use validator::Validate;

use super::Envelope;

/// Deserializes a JSON body and runs its `validator` rules
///
/// Any failure is rejected with the canonical 400 envelope. The underlying
/// error only goes to the debug log.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Envelope;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            debug!(error = %rejection.body_text(), "Rejected request body");
            Envelope::bad_request()
        })?;

        value.validate().map_err(|e| {
            debug!(error = %e, "Request body failed validation");
            Envelope::bad_request()
        })?;

        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Form {
        #[validate(length(min = 1))]
        name: String,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body() {
        let ValidatedJson(form) = ValidatedJson::<Form>::from_request(json_request(r#"{"name":"Jane"}"#), &())
            .await
            .unwrap();

        assert_eq!(form.name, "Jane");
    }

    #[tokio::test]
    async fn test_failed_validation_is_bad_request() {
        let rejection = ValidatedJson::<Form>::from_request(json_request(r#"{"name":""}"#), &())
            .await
            .unwrap_err();

        assert_eq!(rejection, Envelope::bad_request());
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let rejection = ValidatedJson::<Form>::from_request(json_request("{oops"), &())
            .await
            .unwrap_err();

        assert_eq!(rejection, Envelope::bad_request());
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .body(Body::from(r#"{"name":"Jane"}"#))
            .unwrap();

        let rejection = ValidatedJson::<Form>::from_request(request, &())
            .await
            .unwrap_err();

        assert_eq!(rejection, Envelope::bad_request());
    }
}
