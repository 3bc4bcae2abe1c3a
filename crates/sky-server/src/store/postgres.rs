use std::time::Duration;

use async_trait::async_trait;
use sqlx::{
    postgres::{PgPool, PgPoolOptions, PgRow},
    Row,
};

use sky_pojo::Employee;

use super::{EmployeeStore, EmployeeUpdate, NewEmployee, StoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS employee (
    id          BIGSERIAL    PRIMARY KEY,
    username    VARCHAR(32)  NOT NULL UNIQUE,
    name        VARCHAR(32)  NOT NULL,
    password    VARCHAR(255) NOT NULL,
    phone       VARCHAR(32)  NOT NULL,
    sex         VARCHAR(2)   NOT NULL,
    id_number   VARCHAR(32)  NOT NULL,
    status      INTEGER      NOT NULL DEFAULT 1,
    create_time TIMESTAMP    NOT NULL,
    update_time TIMESTAMP    NOT NULL,
    create_user BIGINT,
    update_user BIGINT
)
"#;

const COLUMNS: &str = "id, username, name, password, phone, sex, id_number, status, \
                       create_time, update_time, create_user, update_user";

#[derive(Debug, Clone)]
pub struct PgEmployeeStore {
    pool: PgPool,
}

impl PgEmployeeStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

fn employee_from_row(row: &PgRow) -> Result<Employee, sqlx::Error> {
    Ok(Employee {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        name: row.try_get("name")?,
        password: row.try_get("password")?,
        phone: row.try_get("phone")?,
        sex: row.try_get("sex")?,
        id_number: row.try_get("id_number")?,
        status: row.try_get("status")?,
        create_time: row.try_get("create_time")?,
        update_time: row.try_get("update_time")?,
        create_user: row.try_get("create_user")?,
        update_user: row.try_get("update_user")?,
    })
}

fn map_unique(err: sqlx::Error, username: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Duplicate(username.to_string())
        }
        _ => StoreError::Database(err),
    }
}

fn to_i64(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

#[async_trait]
impl EmployeeStore for PgEmployeeStore {
    async fn get_by_username(&self, username: &str) -> Result<Option<Employee>, StoreError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM employee WHERE username = $1"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(employee_from_row).transpose()?)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Employee>, StoreError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM employee WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(employee_from_row).transpose()?)
    }

    async fn insert(&self, new: NewEmployee) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO employee
                (username, name, password, phone, sex, id_number, status,
                 create_time, update_time, create_user, update_user)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(&new.username)
        .bind(&new.name)
        .bind(&new.password)
        .bind(&new.phone)
        .bind(&new.sex)
        .bind(&new.id_number)
        .bind(new.status)
        .bind(new.create_time)
        .bind(new.update_time)
        .bind(new.create_user)
        .bind(new.update_user)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique(e, &new.username))
    }

    async fn page(
        &self,
        name: Option<&str>,
        offset: u64,
        limit: u64,
    ) -> Result<(u64, Vec<Employee>), StoreError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM employee WHERE ($1::TEXT IS NULL OR strpos(name, $1) > 0)",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM employee \
             WHERE ($1::TEXT IS NULL OR strpos(name, $1) > 0) \
             ORDER BY create_time DESC, id DESC \
             LIMIT $2 OFFSET $3"
        ))
        .bind(name)
        .bind(to_i64(limit))
        .bind(to_i64(offset))
        .fetch_all(&self.pool)
        .await?;

        let records = rows
            .iter()
            .map(employee_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((u64::try_from(total).unwrap_or(0), records))
    }

    async fn update(&self, update: EmployeeUpdate) -> Result<bool, StoreError> {
        let username = update.username.clone().unwrap_or_default();
        let result = sqlx::query(
            r#"
            UPDATE employee SET
                username    = COALESCE($2, username),
                name        = COALESCE($3, name),
                phone       = COALESCE($4, phone),
                sex         = COALESCE($5, sex),
                id_number   = COALESCE($6, id_number),
                status      = COALESCE($7, status),
                update_time = $8,
                update_user = COALESCE($9, update_user)
            WHERE id = $1
            "#,
        )
        .bind(update.id)
        .bind(update.username)
        .bind(update.name)
        .bind(update.phone)
        .bind(update.sex)
        .bind(update.id_number)
        .bind(update.status)
        .bind(update.update_time)
        .bind(update.update_user)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique(e, &username))?;
        Ok(result.rows_affected() > 0)
    }
}
