use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::constant::message;
use crate::result::ApiResult;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("account not found")]
    AccountNotFound,

    #[error("wrong password")]
    PasswordError,

    #[error("account locked")]
    AccountLocked,

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("employee not found")]
    EmployeeNotFound(i64),

    #[error("invalid status")]
    InvalidStatus(i32),

    #[error("{0}")]
    BadRequest(&'static str),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

// Business failures travel as HTTP 200 with `code = 0`, like every other
// envelope; only unexpected failures surface as 500.
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        if let ServiceError::Internal(e) = &self {
            tracing::error!(error = %e, "request failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiResult::<()>::error(message::UNKNOWN_ERROR),
            )
                .into_response();
        }

        tracing::info!(reason = %self, "request rejected");
        ApiResult::<()>::error(self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(ServiceError::PasswordError.to_string(), "wrong password");
        assert_eq!(
            ServiceError::AlreadyExists("zhangsan".into()).to_string(),
            "zhangsan already exists"
        );
        assert_eq!(ServiceError::EmployeeNotFound(3).to_string(), "employee not found");
    }

    #[test]
    fn test_status_codes() {
        let resp = ServiceError::AccountLocked.into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = ServiceError::Internal(anyhow::anyhow!("pool closed")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
