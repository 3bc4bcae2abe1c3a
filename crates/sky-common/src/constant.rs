//! Shared constants: account status, password defaults and the
//! messages not owned by `ServiceError`.

pub mod status {
    pub const ENABLE: i32 = 1;
    pub const DISABLE: i32 = 0;
}

pub mod password {
    /// Initial password of every newly created employee.
    pub const DEFAULT_PASSWORD: &str = "123456";
    pub const MASK: &str = "****";
}

pub mod message {
    pub const NOT_LOGGED_IN: &str = "not logged in";
    pub const ID_REQUIRED: &str = "id is required";
    pub const UNKNOWN_ERROR: &str = "unknown error";
    pub const NOT_FOUND: &str = "not found";
}
