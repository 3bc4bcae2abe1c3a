use std::sync::Arc;

use chrono::{Local, NaiveDateTime};

use sky_common::{
    constant::{message, password, status},
    context,
    password::{hash_password, verify_password},
    PageResult, ServiceError,
};
use sky_pojo::{Employee, EmployeeDto, EmployeeLoginDto, EmployeePageQueryDto};

use crate::store::{EmployeeStore, EmployeeUpdate, NewEmployee};

const DEFAULT_PAGE_SIZE: u64 = 10;
const MAX_PAGE_SIZE: u64 = 100;

pub struct EmployeeService {
    store: Arc<dyn EmployeeStore>,
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn masked(mut employee: Employee) -> Employee {
    employee.password = password::MASK.to_string();
    employee
}

impl EmployeeService {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self { store }
    }

    pub async fn login(&self, dto: &EmployeeLoginDto) -> Result<Employee, ServiceError> {
        let Some(employee) = self.store.get_by_username(&dto.username).await? else {
            return Err(ServiceError::AccountNotFound);
        };

        if !verify_password(&employee.password, &dto.password) {
            return Err(ServiceError::PasswordError);
        }

        if employee.status == status::DISABLE {
            return Err(ServiceError::AccountLocked);
        }

        Ok(employee)
    }

    /// Create an employee with the default password, attributed to the
    /// principal of the current request.
    pub async fn save(&self, dto: EmployeeDto) -> Result<i64, ServiceError> {
        let ts = now();
        let operator = context::current();
        let id = self
            .store
            .insert(NewEmployee {
                username: dto.username,
                name: dto.name,
                password: hash_password(password::DEFAULT_PASSWORD)?,
                phone: dto.phone,
                sex: dto.sex,
                id_number: dto.id_number,
                status: status::ENABLE,
                create_time: ts,
                update_time: ts,
                create_user: operator,
                update_user: operator,
            })
            .await?;
        tracing::info!(id, ?operator, "employee created");
        Ok(id)
    }

    pub async fn page_query(
        &self,
        query: EmployeePageQueryDto,
    ) -> Result<PageResult<Employee>, ServiceError> {
        let page = query.page.unwrap_or(1).max(1);
        let size = query
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let name = query.name.as_deref().filter(|n| !n.is_empty());

        let (total, records) = self
            .store
            .page(name, (page - 1).saturating_mul(size), size)
            .await?;
        Ok(PageResult::new(
            total,
            records.into_iter().map(masked).collect(),
        ))
    }

    pub async fn start_or_stop(&self, new_status: i32, id: i64) -> Result<(), ServiceError> {
        if new_status != status::ENABLE && new_status != status::DISABLE {
            return Err(ServiceError::InvalidStatus(new_status));
        }
        let mut update = EmployeeUpdate::new(id, now(), context::current());
        update.status = Some(new_status);
        if !self.store.update(update).await? {
            return Err(ServiceError::EmployeeNotFound(id));
        }
        Ok(())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Employee, ServiceError> {
        self.store
            .get_by_id(id)
            .await?
            .map(masked)
            .ok_or(ServiceError::EmployeeNotFound(id))
    }

    pub async fn update(&self, dto: EmployeeDto) -> Result<(), ServiceError> {
        let Some(id) = dto.id else {
            return Err(ServiceError::BadRequest(message::ID_REQUIRED));
        };
        let mut update = EmployeeUpdate::new(id, now(), context::current());
        update.username = Some(dto.username);
        update.name = Some(dto.name);
        update.phone = Some(dto.phone);
        update.sex = Some(dto.sex);
        update.id_number = Some(dto.id_number);
        if !self.store.update(update).await? {
            return Err(ServiceError::EmployeeNotFound(id));
        }
        Ok(())
    }

    /// Create the `admin` account on an empty installation. Returns whether
    /// an account was created.
    pub async fn ensure_admin(&self) -> Result<bool, ServiceError> {
        if self.store.get_by_username("admin").await?.is_some() {
            return Ok(false);
        }
        let ts = now();
        self.store
            .insert(NewEmployee {
                username: "admin".to_string(),
                name: "管理员".to_string(),
                password: hash_password(password::DEFAULT_PASSWORD)?,
                phone: "13812312312".to_string(),
                sex: "1".to_string(),
                id_number: "110101199001010047".to_string(),
                status: status::ENABLE,
                create_time: ts,
                update_time: ts,
                create_user: None,
                update_user: None,
            })
            .await?;
        Ok(true)
    }
}
