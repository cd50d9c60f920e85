/*
 * Responsibility
 * - Credential store: the users table behind the UserStore trait
 * - Unique username/email are enforced by the schema (-> RepoError::Conflict)
 * - Users are never hard-deleted; is_active is the soft-delete flag
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub is_supplier: bool,
    pub is_customer: bool,
}

/// A registration that already carries its password digest.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub hashed_password: String,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_username(&self, username: &str) -> RepoResult<Option<UserRow>>;

    async fn find_user_by_id(&self, id: i64) -> RepoResult<Option<UserRow>>;

    /// Returns the new user's id.
    async fn insert_user(&self, user: NewUser) -> RepoResult<i64>;

    /// Returns false when no such user exists.
    async fn set_active(&self, id: i64, is_active: bool) -> RepoResult<bool>;

    async fn set_roles(&self, id: i64, is_supplier: bool, is_customer: bool) -> RepoResult<bool>;
}

#[derive(Clone, Debug)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_user_by_username(&self, username: &str) -> RepoResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                id, first_name, last_name, username, email, hashed_password,
                is_active, is_admin, is_supplier, is_customer
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_user_by_id(&self, id: i64) -> RepoResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                id, first_name, last_name, username, email, hashed_password,
                is_active, is_admin, is_supplier, is_customer
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn insert_user(&self, user: NewUser) -> RepoResult<i64> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (first_name, last_name, username, email, hashed_password)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.hashed_password)
        .fetch_one(&mut *tx)
        .await
        .map_err(RepoError::from_sqlx)?;

        tx.commit().await?;
        Ok(id)
    }

    async fn set_active(&self, id: i64, is_active: bool) -> RepoResult<bool> {
        let done = sqlx::query(
            r#"
            UPDATE users
            SET is_active = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(is_active)
        .execute(&self.pool)
        .await?;

        Ok(done.rows_affected() > 0)
    }

    async fn set_roles(&self, id: i64, is_supplier: bool, is_customer: bool) -> RepoResult<bool> {
        let done = sqlx::query(
            r#"
            UPDATE users
            SET is_supplier = $2,
                is_customer = $3
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(is_supplier)
        .bind(is_customer)
        .execute(&self.pool)
        .await?;

        Ok(done.rows_affected() > 0)
    }
}
