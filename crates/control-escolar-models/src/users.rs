use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Names of the role-groups created by the application.
pub mod role_groups {
    pub const TEACHER: &str = "maestro";
    pub const ADMIN: &str = "administrador";
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_active: bool,
}
