use creative_core::{
    models::{Role, User, DEFAULT_ROLES},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for roles
#[derive(Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "roles", db.operation = "select"))]
    pub async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        let roles = sqlx::query_as::<Postgres, Role>(
            "SELECT id, name, description FROM roles ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }

    /// Insert the default roles that do not exist yet. Returns how many were created.
    #[tracing::instrument(skip(self), fields(db.table = "roles", db.operation = "insert"))]
    pub async fn ensure_default_roles(&self) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut created = 0;

        for (name, description) in DEFAULT_ROLES {
            let result = sqlx::query(
                "INSERT INTO roles (id, name, description) VALUES ($1, $2, $3) ON CONFLICT (name) DO NOTHING",
            )
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(description)
            .execute(&mut *tx)
            .await?;
            created += result.rows_affected();
        }

        tx.commit().await?;
        Ok(created)
    }
}

/// Repository for users
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "insert"))]
    pub async fn create_user(&self, email: &str, role_id: Option<Uuid>) -> Result<User, AppError> {
        let user = sqlx::query_as::<Postgres, User>(
            r#"
            INSERT INTO users (id, email, role_id)
            VALUES ($1, $2, $3)
            RETURNING id, email, role_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(role_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<Postgres, User>(
            "SELECT id, email, role_id, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
