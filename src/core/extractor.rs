use axum::{
    body::Body,
    extract::{
        rejection::{JsonDataError, JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Path, Request,
    },
    http::request::Parts,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_path_to_error::Segment;

use crate::core::error::AppError;
use crate::shared::validation::{invalid_type_message, FieldErrors};

/// Custom JSON extractor that provides consistent error responses
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppJsonRejection(rejection)),
        }
    }
}

pub struct AppJsonRejection(JsonRejection);

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        let error = match self.0 {
            // Well-formed JSON with values of the wrong type is a validation failure
            JsonRejection::JsonDataError(err) => AppError::Validation(data_error_fields(&err)),
            JsonRejection::JsonSyntaxError(err) => {
                AppError::BadRequest(format!("Invalid JSON syntax: {}", err))
            }
            JsonRejection::MissingJsonContentType(err) => {
                AppError::BadRequest(format!("Missing JSON content type: {}", err))
            }
            _ => AppError::BadRequest("Failed to parse JSON body".to_string()),
        };

        error.into_response()
    }
}

/// Key a type mismatch by the top-level field that failed to deserialize.
///
/// Failures at the document root (e.g. an array body) stay under `body`.
fn data_error_fields(err: &JsonDataError) -> FieldErrors {
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        if let Some(path_err) = inner.downcast_ref::<serde_path_to_error::Error<serde_json::Error>>()
        {
            if let Some(Segment::Map { key }) = path_err.path().iter().next() {
                let detail = path_err.inner().to_string();
                return FieldErrors::single(key, invalid_type_message(key, &detail));
            }
            break;
        }
        source = inner.source();
    }

    FieldErrors::single("body", err.body_text())
}

/// Path extractor whose rejection is a 404 envelope.
///
/// An id that cannot be parsed cannot name an existing record.
pub struct AppPath<T>(pub T);

impl<T, S> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(path_rejection(rejection)),
        }
    }
}

fn path_rejection(rejection: PathRejection) -> AppError {
    match rejection {
        PathRejection::FailedToDeserializePathParams(err) => {
            tracing::debug!("Unparseable path parameter: {}", err.body_text());
            AppError::NotFound("Resource not found".to_string())
        }
        other => AppError::Internal(other.body_text()),
    }
}
