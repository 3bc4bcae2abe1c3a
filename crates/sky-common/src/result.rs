use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

pub const CODE_SUCCESS: i32 = 1;
pub const CODE_ERROR: i32 = 0;

/// Envelope wrapping every JSON response: `{"code": 1, "msg": null, "data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResult<T> {
    pub code: i32,
    pub msg: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResult<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: CODE_SUCCESS,
            msg: None,
            data: Some(data),
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            code: CODE_ERROR,
            msg: Some(msg.into()),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == CODE_SUCCESS
    }
}

impl ApiResult<()> {
    pub fn ok() -> Self {
        Self {
            code: CODE_SUCCESS,
            msg: None,
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResult<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageResult<T> {
    pub total: u64,
    pub records: Vec<T>,
}

impl<T> PageResult<T> {
    pub fn new(total: u64, records: Vec<T>) -> Self {
        Self { total, records }
    }
}
