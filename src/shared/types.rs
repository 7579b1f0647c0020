use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::validation::FieldErrors;

/// Uniform JSON envelope returned by every endpoint.
///
/// Keys that carry no value are omitted from the body rather than sent as `null`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub message: String,
    /// Field name -> list of validation messages (422 only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    /// Raw failure detail (500 only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
            errors: None,
            error: None,
        }
    }

    pub fn error(
        message: impl Into<String>,
        errors: Option<FieldErrors>,
        error: Option<String>,
    ) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message: message.into(),
            errors,
            error,
        }
    }
}
