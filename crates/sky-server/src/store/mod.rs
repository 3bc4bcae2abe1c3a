//! Persistence of employee records.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use sky_common::ServiceError;
use sky_pojo::Employee;

pub use memory::MemoryEmployeeStore;
pub use postgres::PgEmployeeStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("username {0} is taken")]
    Duplicate(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(username) => ServiceError::AlreadyExists(username),
            StoreError::Database(e) => ServiceError::Internal(e.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub username: String,
    pub name: String,
    pub password: String,
    pub phone: String,
    pub sex: String,
    pub id_number: String,
    pub status: i32,
    pub create_time: NaiveDateTime,
    pub update_time: NaiveDateTime,
    pub create_user: Option<i64>,
    pub update_user: Option<i64>,
}

/// Partial update: only `Some` fields are written.
#[derive(Debug, Clone)]
pub struct EmployeeUpdate {
    pub id: i64,
    pub username: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub sex: Option<String>,
    pub id_number: Option<String>,
    pub status: Option<i32>,
    pub update_time: NaiveDateTime,
    pub update_user: Option<i64>,
}

impl EmployeeUpdate {
    pub fn new(id: i64, update_time: NaiveDateTime, update_user: Option<i64>) -> Self {
        Self {
            id,
            username: None,
            name: None,
            phone: None,
            sex: None,
            id_number: None,
            status: None,
            update_time,
            update_user,
        }
    }
}

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn get_by_username(&self, username: &str) -> Result<Option<Employee>, StoreError>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Employee>, StoreError>;

    /// Returns the id assigned to the new row.
    async fn insert(&self, employee: NewEmployee) -> Result<i64, StoreError>;

    /// Rows whose name contains `name`, newest first. Returns `(total, page)`.
    async fn page(
        &self,
        name: Option<&str>,
        offset: u64,
        limit: u64,
    ) -> Result<(u64, Vec<Employee>), StoreError>;

    /// Returns `false` when no row has `update.id`.
    async fn update(&self, update: EmployeeUpdate) -> Result<bool, StoreError>;
}
