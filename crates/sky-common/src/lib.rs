pub mod constant;
pub mod context;
pub mod error;
pub mod json;
pub mod jwt;
pub mod password;
pub mod result;
pub mod telemetry;

pub use error::ServiceError;
pub use jwt::{EmployeeClaims, JwtProperties};
pub use result::{ApiResult, PageResult};
