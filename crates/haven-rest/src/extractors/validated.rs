//! JSON extractor that validates the request body.
//!
//! Malformed JSON and failed validation both answer 400 in the standard
//! failure envelope; validation failures list every offending field under
//! `error.details`.

use crate::responses::failure;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use haven_core::{field_errors, ErrorResponse};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// Deserializes a JSON body and runs its `validator` rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection for [`ValidatedJson`].
#[derive(Debug)]
pub enum ValidatedJsonRejection {
    Json(JsonRejection),
    Invalid(ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let body = match self {
            Self::Json(rejection) => ErrorResponse {
                code: "INVALID_JSON".to_string(),
                message: rejection.body_text(),
                details: None,
            },
            Self::Invalid(errors) => ErrorResponse {
                code: "VALIDATION_ERROR".to_string(),
                message: "Request validation failed".to_string(),
                details: Some(field_errors(&errors)),
            },
        };
        failure(StatusCode::BAD_REQUEST, body)
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Json)?;
        value.validate().map_err(ValidatedJsonRejection::Invalid)?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haven_service::{ChangePasswordRequest, CreatePropertyRequest};
    use serde_json::json;

    #[test]
    fn test_field_errors_are_flattened_and_sorted() {
        let request: CreatePropertyRequest = serde_json::from_value(json!({
            "title": "",
            "description": "",
            "propertyType": "house",
            "listingType": "sale",
            "price": -5.0,
            "address": "1 High Street",
            "city": "York",
            "state": "North Yorkshire",
            "country": "UK"
        }))
        .unwrap();

        let errors = field_errors(&request.validate().unwrap_err());
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"title"));
        assert!(fields.contains(&"price"));
        assert!(fields.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_custom_message_is_kept() {
        let request = ChangePasswordRequest {
            current_password: "whatever".to_string(),
            new_password: "short".to_string(),
        };
        let errors = field_errors(&request.validate().unwrap_err());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "new_password");
        assert!(!errors[0].message.is_empty());
    }
}
