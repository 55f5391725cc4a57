//! MySQL user repository implementation.

use crate::{traits::UserRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use haven_core::{Email, HavenError, HavenResult, User, UserId, UserRole, UserStatus};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, phone, \
     avatar_url, role, status, last_login_at, created_at, updated_at";

#[derive(Component, Clone)]
#[shaku(interface = UserRepository)]
pub struct MySqlUserRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlUserRepository {
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(&self, clause: &str, binds: &[&str]) -> HavenResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {clause} AND status != 'deleted'");
        let mut query = sqlx::query_as::<_, UserRow>(&sql);
        for value in binds {
            query = query.bind(*value);
        }
        let row = query.fetch_optional(self.pool.inner()).await?;
        row.map(User::try_from).transpose()
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    password_hash: String,
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
    avatar_url: Option<String>,
    role: String,
    status: String,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = HavenError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let id = UserId::parse(&row.id)
            .map_err(|e| HavenError::Internal(format!("Invalid UUID in database: {e}")))?;

        Ok(User {
            id,
            username: row.username,
            email: Email::new_unchecked(row.email),
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
            avatar_url: row.avatar_url,
            role: row.role.parse::<UserRole>().unwrap_or_default(),
            status: row.status.parse::<UserStatus>().map_err(HavenError::Internal)?,
            last_login_at: row.last_login_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: UserId) -> HavenResult<Option<User>> {
        debug!("Finding user by id: {}", id);
        self.fetch_one_where("id = ?", &[&id.to_string()]).await
    }

    async fn find_by_username_or_email(&self, identifier: &str) -> HavenResult<Option<User>> {
        debug!("Finding user by username or email: {}", identifier);
        self.fetch_one_where("(username = ? OR LOWER(email) = LOWER(?))", &[identifier, identifier])
            .await
    }

    async fn exists_by_username(&self, username: &str) -> HavenResult<bool> {
        let result: Option<i32> = sqlx::query_scalar("SELECT 1 FROM users WHERE username = ? LIMIT 1")
            .bind(username)
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(result.is_some())
    }

    async fn exists_by_email(&self, email: &str) -> HavenResult<bool> {
        let result: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM users WHERE LOWER(email) = LOWER(?) LIMIT 1")
                .bind(email)
                .fetch_optional(self.pool.inner())
                .await?;

        Ok(result.is_some())
    }

    async fn save(&self, user: &User) -> HavenResult<User> {
        debug!("Saving new user: {}", user.username);

        sqlx::query(
            r"
            INSERT INTO users (id, username, email, password_hash, first_name, last_name, phone,
                               avatar_url, role, status, last_login_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(&user.avatar_url)
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .bind(user.last_login_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(self.pool.inner())
        .await?;

        // MySQL has no RETURNING
        self.find_by_id(user.id)
            .await?
            .ok_or_else(|| HavenError::Internal("Failed to fetch inserted user".to_string()))
    }

    async fn update(&self, user: &User) -> HavenResult<User> {
        debug!("Updating user: {}", user.id);

        sqlx::query(
            r"
            UPDATE users
            SET username = ?, email = ?, password_hash = ?, first_name = ?, last_name = ?,
                phone = ?, avatar_url = ?, role = ?, status = ?, last_login_at = ?, updated_at = ?
            WHERE id = ? AND status != 'deleted'
            ",
        )
        .bind(&user.username)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(&user.avatar_url)
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .bind(user.last_login_at)
        .bind(user.updated_at)
        .bind(user.id.to_string())
        .execute(self.pool.inner())
        .await?;

        self.find_by_id(user.id)
            .await?
            .ok_or_else(|| HavenError::not_found("User", user.id))
    }

    async fn delete(&self, id: UserId) -> HavenResult<bool> {
        debug!("Soft deleting user: {}", id);

        let result = sqlx::query(
            "UPDATE users SET status = 'deleted', updated_at = NOW(6) WHERE id = ? AND status != 'deleted'",
        )
        .bind(id.to_string())
        .execute(self.pool.inner())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl std::fmt::Debug for MySqlUserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlUserRepository").finish_non_exhaustive()
    }
}
