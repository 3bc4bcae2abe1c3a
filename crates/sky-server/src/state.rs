use std::sync::Arc;

use sky_common::JwtProperties;

use crate::service::EmployeeService;

#[derive(Clone)]
pub struct AppState {
    pub employees: Arc<EmployeeService>,
    pub jwt: Arc<JwtProperties>,
}
