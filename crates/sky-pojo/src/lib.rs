pub mod dto;
pub mod entity;
pub mod vo;

pub use dto::{EmployeeDto, EmployeeLoginDto, EmployeePageQueryDto, StatusQuery};
pub use entity::Employee;
pub use vo::EmployeeLoginVo;
