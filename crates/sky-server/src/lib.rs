pub mod docs;
pub mod extract;
pub mod handlers;
pub mod interceptor;
pub mod service;
pub mod state;
pub mod store;

use axum::{
    extract::Request,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::handlers::employee;
use crate::state::AppState;

fn request_span(req: &Request) -> tracing::Span {
    tracing::info_span!(
        "request",
        method = %req.method(),
        uri = %req.uri(),
        request_id = %Uuid::new_v4(),
        emp_id = tracing::field::Empty,
    )
}

/// Assemble the HTTP surface. Everything under `/admin` except login goes
/// through the admin token interceptor.
pub fn build_app(st: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/admin/employee", post(employee::save).put(employee::update))
        .route("/admin/employee/page", get(employee::page))
        .route("/admin/employee/status/:status", post(employee::start_or_stop))
        .route("/admin/employee/logout", post(employee::logout))
        .route("/admin/employee/:id", get(employee::get_by_id));

    let public_routes = Router::new()
        .route("/admin/employee/login", post(employee::login))
        .route("/v3/api-docs", get(docs::openapi_json));

    assemble(public_routes, admin_routes, st)
}

fn assemble(
    public_routes: Router<AppState>,
    admin_routes: Router<AppState>,
    st: AppState,
) -> Router {
    let admin_routes = admin_routes.route_layer(middleware::from_fn_with_state(
        st.clone(),
        interceptor::jwt_admin_interceptor,
    ));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .fallback(interceptor::fallback)
        .layer(middleware::from_fn(interceptor::identity_scope))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .with_state(st)
}
