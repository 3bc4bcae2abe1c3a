use axum::Json;
use utoipa::OpenApi;

use crate::handlers::employee;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sky Takeout API",
        version = "2.0",
        description = "Admin console and ordering API of the sky takeout backend"
    ),
    paths(
        employee::login,
        employee::save,
        employee::page,
        employee::start_or_stop,
        employee::get_by_id,
        employee::update,
        employee::logout,
    ),
    components(schemas(
        sky_pojo::Employee,
        sky_pojo::EmployeeDto,
        sky_pojo::EmployeeLoginDto,
        sky_pojo::EmployeeLoginVo,
    )),
    tags((name = "employee", description = "Employee management"))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
