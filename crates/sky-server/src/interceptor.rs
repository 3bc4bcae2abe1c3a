use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use sky_common::{
    constant::message,
    context,
    jwt::{self, EmployeeClaims},
    ApiResult,
};

use crate::state::AppState;

/// Give every request its own empty identity slot, so routes outside the
/// admin interceptor observe no principal.
pub async fn identity_scope(req: Request, next: Next) -> Response {
    context::scope(next.run(req)).await
}

/// Verify the admin token and bind the employee id for the rest of the
/// request. Requests without a valid token never reach the handler.
pub async fn jwt_admin_interceptor(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let Some(claims) = verify_admin_token(&st, req.headers()) else {
        return unauthorized();
    };

    tracing::Span::current().record("emp_id", claims.emp_id);
    tracing::debug!(emp_id = claims.emp_id, "admin token verified");

    context::scope(async move {
        context::bind(claims.emp_id);
        let response = next.run(req).await;
        context::clear();
        response
    })
    .await
}

/// Unmatched paths. Anything under `/admin` still answers 401 without a valid
/// token, so the admin surface cannot be mapped anonymously.
pub async fn fallback(State(st): State<AppState>, req: Request) -> Response {
    let path = req.uri().path();
    let admin = path == "/admin" || path.starts_with("/admin/");
    if admin && verify_admin_token(&st, req.headers()).is_none() {
        return unauthorized();
    }
    (StatusCode::NOT_FOUND, ApiResult::<()>::error(message::NOT_FOUND)).into_response()
}

fn verify_admin_token(st: &AppState, headers: &HeaderMap) -> Option<EmployeeClaims> {
    let token = headers
        .get(st.jwt.admin_token_name.as_str())
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or("");

    if token.is_empty() {
        return None;
    }

    match jwt::parse_jwt(&st.jwt.admin_secret_key, token) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::warn!(error = %e, "admin token rejected");
            None
        }
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        ApiResult::<()>::error(message::NOT_LOGGED_IN),
    )
        .into_response()
}
