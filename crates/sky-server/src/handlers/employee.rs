use axum::extract::State;

use sky_common::{
    context,
    jwt::{self, EmployeeClaims},
    ApiResult, PageResult, ServiceError,
};
use sky_pojo::{
    Employee, EmployeeDto, EmployeeLoginDto, EmployeeLoginVo, EmployeePageQueryDto, StatusQuery,
};

use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

type ApiResponse<T> = Result<ApiResult<T>, ServiceError>;

#[utoipa::path(
    post,
    path = "/admin/employee/login",
    tag = "employee",
    request_body = EmployeeLoginDto,
    responses((status = 200, description = "Employee login", body = EmployeeLoginVo))
)]
pub async fn login(
    State(st): State<AppState>,
    ApiJson(dto): ApiJson<EmployeeLoginDto>,
) -> ApiResponse<EmployeeLoginVo> {
    tracing::info!(?dto, "employee login");

    let employee = st.employees.login(&dto).await?;

    let token = jwt::create_jwt(
        &st.jwt.admin_secret_key,
        st.jwt.admin_ttl,
        EmployeeClaims {
            emp_id: employee.id,
        },
    )
    .map_err(|e| ServiceError::Internal(anyhow::Error::new(e).context("signing admin token")))?;

    Ok(ApiResult::success(EmployeeLoginVo {
        id: employee.id,
        user_name: employee.username,
        name: employee.name,
        token,
    }))
}

#[utoipa::path(
    post,
    path = "/admin/employee",
    tag = "employee",
    request_body = EmployeeDto,
    responses((status = 200, description = "Create employee"))
)]
pub async fn save(
    State(st): State<AppState>,
    ApiJson(dto): ApiJson<EmployeeDto>,
) -> ApiResponse<()> {
    tracing::info!(?dto, "create employee");
    st.employees.save(dto).await?;
    Ok(ApiResult::ok())
}

#[utoipa::path(
    get,
    path = "/admin/employee/page",
    tag = "employee",
    params(EmployeePageQueryDto),
    responses((status = 200, description = "Page of employees, newest first", body = [Employee]))
)]
pub async fn page(
    State(st): State<AppState>,
    ApiQuery(query): ApiQuery<EmployeePageQueryDto>,
) -> ApiResponse<PageResult<Employee>> {
    tracing::info!(?query, "page employees");
    Ok(ApiResult::success(st.employees.page_query(query).await?))
}

#[utoipa::path(
    post,
    path = "/admin/employee/status/{status}",
    tag = "employee",
    params(("status" = i32, Path, description = "1 enable, 0 disable"), StatusQuery),
    responses((status = 200, description = "Enable or disable an employee account"))
)]
pub async fn start_or_stop(
    State(st): State<AppState>,
    ApiPath(status): ApiPath<i32>,
    ApiQuery(StatusQuery { id }): ApiQuery<StatusQuery>,
) -> ApiResponse<()> {
    tracing::info!(id, status, "change employee status");
    st.employees.start_or_stop(status, id).await?;
    Ok(ApiResult::ok())
}

#[utoipa::path(
    get,
    path = "/admin/employee/{id}",
    tag = "employee",
    params(("id" = i64, Path, description = "Employee id")),
    responses((status = 200, description = "Employee by id", body = Employee))
)]
pub async fn get_by_id(
    State(st): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResponse<Employee> {
    tracing::info!(id, "get employee");
    Ok(ApiResult::success(st.employees.get_by_id(id).await?))
}

#[utoipa::path(
    put,
    path = "/admin/employee",
    tag = "employee",
    request_body = EmployeeDto,
    responses((status = 200, description = "Update employee"))
)]
pub async fn update(
    State(st): State<AppState>,
    ApiJson(dto): ApiJson<EmployeeDto>,
) -> ApiResponse<()> {
    tracing::info!(?dto, "update employee");
    st.employees.update(dto).await?;
    Ok(ApiResult::ok())
}

// Tokens are stateless; the client discards its copy.
#[utoipa::path(
    post,
    path = "/admin/employee/logout",
    tag = "employee",
    responses((status = 200, description = "Employee logout"))
)]
pub async fn logout() -> ApiResult<()> {
    tracing::info!(emp_id = ?context::current(), "employee logged out");
    ApiResult::ok()
}
