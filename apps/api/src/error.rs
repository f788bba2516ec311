use axum::Json;
use axum::extract::rejection::{BytesRejection, JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use recshare_core::AppError;
use recshare_domain::{GrantError, GrantErrorKind};
use serde::Serialize;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    /// Stable machine-readable error code.
    code: String,
    /// Human-readable message, shown to users verbatim.
    message: String,
}

/// HTTP API error wrapper around application and grant errors.
#[derive(Debug)]
pub enum ApiError {
    App(AppError),
    Grant(GrantError),
}

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self::App(value)
    }
}

impl From<GrantError> for ApiError {
    fn from(value: GrantError) -> Self {
        Self::Grant(value)
    }
}

macro_rules! rejection_as_validation {
    ($($rejection:ty),+ $(,)?) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(value: $rejection) -> Self {
                    Self::App(AppError::Validation(value.body_text()))
                }
            }
        )+
    };
}

rejection_as_validation!(BytesRejection, JsonRejection, PathRejection, QueryRejection);

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::App(error) => match error {
                AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
                AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
                AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
                AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
                AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
            },
            Self::Grant(error) => {
                let kind = error.kind();
                let status = match kind {
                    _ if kind.is_validation() => StatusCode::BAD_REQUEST,
                    GrantErrorKind::DuplicateGrant => StatusCode::CONFLICT,
                    GrantErrorKind::Unauthorized => StatusCode::FORBIDDEN,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, kind.as_str())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match &self {
            Self::App(error) => error.to_string(),
            Self::Grant(error) => error.to_string(),
        };

        let payload = Json(ErrorResponse {
            code: code.to_owned(),
            message,
        });

        (status, payload).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
