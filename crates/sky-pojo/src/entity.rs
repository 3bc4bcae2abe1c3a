use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use sky_common::json::datetime_format;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub username: String,
    pub name: String,
    /// PHC-encoded hash; replaced by a mask before leaving the service.
    pub password: String,
    pub phone: String,
    pub sex: String,
    pub id_number: String,
    /// 1 enabled, 0 disabled.
    pub status: i32,
    #[serde(with = "datetime_format")]
    #[schema(value_type = String)]
    pub create_time: NaiveDateTime,
    #[serde(with = "datetime_format")]
    #[schema(value_type = String)]
    pub update_time: NaiveDateTime,
    pub create_user: Option<i64>,
    pub update_user: Option<i64>,
}
