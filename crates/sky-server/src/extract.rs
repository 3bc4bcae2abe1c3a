//! Extractors whose rejections use the `{code,msg,data}` envelope instead of
//! axum's plain-text bodies.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    response::{IntoResponse, Response},
};

use sky_common::ApiResult;

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiRejection))]
pub struct ApiPath<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiRejection))]
pub struct ApiQuery<T>(pub T);

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiRejection))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, thiserror::Error)]
pub enum ApiRejection {
    #[error(transparent)]
    Path(#[from] PathRejection),
    #[error(transparent)]
    Query(#[from] QueryRejection),
    #[error(transparent)]
    Json(#[from] JsonRejection),
}

impl IntoResponse for ApiRejection {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ApiRejection::Path(r) => (r.status(), r.body_text()),
            ApiRejection::Query(r) => (r.status(), r.body_text()),
            ApiRejection::Json(r) => (r.status(), r.body_text()),
        };
        tracing::debug!(%status, %msg, "request rejected");
        (status, ApiResult::<()>::error(msg)).into_response()
    }
}
