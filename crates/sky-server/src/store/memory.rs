use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use sky_pojo::Employee;

use super::{EmployeeStore, EmployeeUpdate, NewEmployee, StoreError};

#[derive(Debug, Clone, Default)]
pub struct MemoryEmployeeStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    rows: BTreeMap<i64, Employee>,
}

impl Inner {
    fn username_taken(&self, username: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|e| e.username == username && Some(e.id) != except)
    }
}

impl MemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeStore for MemoryEmployeeStore {
    async fn get_by_username(&self, username: &str) -> Result<Option<Employee>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.values().find(|e| e.username == username).cloned())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Employee>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.get(&id).cloned())
    }

    async fn insert(&self, new: NewEmployee) -> Result<i64, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.username_taken(&new.username, None) {
            return Err(StoreError::Duplicate(new.username));
        }
        inner.last_id += 1;
        let id = inner.last_id;
        inner.rows.insert(
            id,
            Employee {
                id,
                username: new.username,
                name: new.name,
                password: new.password,
                phone: new.phone,
                sex: new.sex,
                id_number: new.id_number,
                status: new.status,
                create_time: new.create_time,
                update_time: new.update_time,
                create_user: new.create_user,
                update_user: new.update_user,
            },
        );
        Ok(id)
    }

    async fn page(
        &self,
        name: Option<&str>,
        offset: u64,
        limit: u64,
    ) -> Result<(u64, Vec<Employee>), StoreError> {
        let inner = self.inner.read().await;
        let mut matched: Vec<&Employee> = inner
            .rows
            .values()
            .filter(|e| name.is_none_or(|n| e.name.contains(n)))
            .collect();
        matched.sort_by(|a, b| b.create_time.cmp(&a.create_time).then(b.id.cmp(&a.id)));

        let total = matched.len() as u64;
        let records = matched
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok((total, records))
    }

    async fn update(&self, update: EmployeeUpdate) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.rows.contains_key(&update.id) {
            return Ok(false);
        }
        if let Some(username) = &update.username {
            if inner.username_taken(username, Some(update.id)) {
                return Err(StoreError::Duplicate(username.clone()));
            }
        }
        let Some(row) = inner.rows.get_mut(&update.id) else {
            return Ok(false);
        };
        if let Some(v) = update.username {
            row.username = v;
        }
        if let Some(v) = update.name {
            row.name = v;
        }
        if let Some(v) = update.phone {
            row.phone = v;
        }
        if let Some(v) = update.sex {
            row.sex = v;
        }
        if let Some(v) = update.id_number {
            row.id_number = v;
        }
        if let Some(v) = update.status {
            row.status = v;
        }
        row.update_time = update.update_time;
        if update.update_user.is_some() {
            row.update_user = update.update_user;
        }
        Ok(true)
    }
}
