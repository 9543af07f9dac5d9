use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Roles created at startup when missing: (name, description)
pub const DEFAULT_ROLES: [(&str, &str); 3] = [
    ("admin", "Full access to campaigns, uploads and integrations"),
    ("user", "Can upload creatives and manage templates"),
    ("viewer", "Read-only access to uploads and templates"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
