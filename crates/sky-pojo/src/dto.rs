use std::fmt;

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Deserialize, ToSchema)]
pub struct EmployeeLoginDto {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for EmployeeLoginDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmployeeLoginDto")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Body of both create and update; `id` is ignored on create.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDto {
    pub id: Option<i64>,
    pub username: String,
    pub name: String,
    pub phone: String,
    pub sex: String,
    pub id_number: String,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EmployeePageQueryDto {
    /// Substring of the employee's display name.
    pub name: Option<String>,
    /// 1-based page number.
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusQuery {
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_debug_hides_password() {
        let dto = EmployeeLoginDto {
            username: "admin".into(),
            password: "123456".into(),
        };
        let printed = format!("{dto:?}");
        assert!(printed.contains("admin"));
        assert!(!printed.contains("123456"));
    }

    #[test]
    fn test_employee_dto_camel_case() {
        let dto: EmployeeDto = serde_json::from_str(
            r#"{"username":"lisi","name":"Li Si","phone":"13900000000","sex":"0","idNumber":"110101199202021234"}"#,
        )
        .unwrap();
        assert_eq!(dto.id, None);
        assert_eq!(dto.id_number, "110101199202021234");
    }

    #[test]
    fn test_page_query_optional_fields() {
        let q: EmployeePageQueryDto = serde_json::from_str(r#"{"page":2,"pageSize":5}"#).unwrap();
        assert_eq!(q.name, None);
        assert_eq!(q.page, Some(2));
        assert_eq!(q.page_size, Some(5));
    }
}
