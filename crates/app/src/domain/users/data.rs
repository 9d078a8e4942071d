//! Users Data

use crate::domain::users::records::{UserRole, UserUuid};

/// New User Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
}
