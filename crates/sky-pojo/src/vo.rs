use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeLoginVo {
    pub id: i64,
    pub user_name: String,
    pub name: String,
    pub token: String,
}
