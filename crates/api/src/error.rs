//! API error type and its JSON rendering.
//!
//! Every failure is rendered as `{"error": <code>, "message": <text>}`.
//! Server-side failures are logged and their details withheld.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pokerledger_core::auth::PasswordError;
use pokerledger_core::settlement::SettlementError;
use pokerledger_db::repositories::{GameSessionError, PlayerError, SettleError, UserError};
use pokerledger_shared::AppError;
use serde_json::json;
use tracing::error;
use validator::ValidationErrors;

/// Error returned by handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Creates an error with an explicit status and code.
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// 401 with `INVALID_CREDENTIALS`.
    #[must_use]
    pub fn invalid_credentials() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "INVALID_CREDENTIALS",
            "Incorrect username or password",
        )
    }

    /// Returns the HTTP status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    fn from_parts(status: u16, code: &'static str, message: String) -> Self {
        Self::new(
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code,
            message,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = if self.status.is_server_error() {
            error!(code = self.code, error = %self.message, "Request failed");
            "An internal error occurred".to_string()
        } else {
            self.message
        };

        (
            self.status,
            Json(json!({
                "error": self.code,
                "message": message
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::from_parts(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        AppError::Validation(err.to_string()).into()
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        AppError::Internal(err.to_string()).into()
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Database(err.to_string()).into()
    }
}

/// Maps domain errors that expose `error_code()` and `http_status_code()`.
macro_rules! domain_error {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for ApiError {
                fn from(err: $ty) -> Self {
                    Self::from_parts(err.http_status_code(), err.error_code(), err.to_string())
                }
            }
        )+
    };
}

domain_error!(SettlementError, GameSessionError, PlayerError, SettleError, UserError);
