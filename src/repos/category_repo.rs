/*
 * Responsibility
 * - categories CRUD (soft delete via is_active)
 * - parent_id gives a one-level tree used by product listing
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, FromRow)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub is_active: bool,
    pub parent_id: Option<i64>,
}

pub async fn list_active(db: &PgPool) -> RepoResult<Vec<CategoryRow>> {
    let rows = sqlx::query_as::<_, CategoryRow>(
        r#"
        SELECT id, name, slug, is_active, parent_id
        FROM categories
        WHERE is_active = TRUE
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn get_by_slug(db: &PgPool, slug: &str) -> RepoResult<Option<CategoryRow>> {
    let row = sqlx::query_as::<_, CategoryRow>(
        r#"
        SELECT id, name, slug, is_active, parent_id
        FROM categories
        WHERE slug = $1
        "#,
    )
    .bind(slug)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn get_by_id(db: &PgPool, id: i64) -> RepoResult<Option<CategoryRow>> {
    let row = sqlx::query_as::<_, CategoryRow>(
        r#"
        SELECT id, name, slug, is_active, parent_id
        FROM categories
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

/// Direct subcategories, active or not.
pub async fn children(db: &PgPool, parent_id: i64) -> RepoResult<Vec<CategoryRow>> {
    let rows = sqlx::query_as::<_, CategoryRow>(
        r#"
        SELECT id, name, slug, is_active, parent_id
        FROM categories
        WHERE parent_id = $1
        ORDER BY id
        "#,
    )
    .bind(parent_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn create(
    db: &PgPool,
    name: &str,
    slug: &str,
    parent_id: Option<i64>,
) -> RepoResult<CategoryRow> {
    let row = sqlx::query_as::<_, CategoryRow>(
        r#"
        INSERT INTO categories (name, slug, parent_id)
        VALUES ($1, $2, $3)
        RETURNING id, name, slug, is_active, parent_id
        "#,
    )
    .bind(name)
    .bind(slug)
    .bind(parent_id)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

/// Rename (and re-slug) the active category currently at `slug`.
pub async fn update(
    db: &PgPool,
    slug: &str,
    name: &str,
    new_slug: &str,
    parent_id: Option<i64>,
) -> RepoResult<Option<CategoryRow>> {
    let row = sqlx::query_as::<_, CategoryRow>(
        r#"
        UPDATE categories
        SET name = $2,
            slug = $3,
            parent_id = $4
        WHERE slug = $1 AND is_active = TRUE
        RETURNING id, name, slug, is_active, parent_id
        "#,
    )
    .bind(slug)
    .bind(name)
    .bind(new_slug)
    .bind(parent_id)
    .fetch_optional(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

/// Returns false when there was no active category with this slug.
pub async fn deactivate(db: &PgPool, slug: &str) -> RepoResult<bool> {
    let done = sqlx::query(
        r#"
        UPDATE categories
        SET is_active = FALSE
        WHERE slug = $1 AND is_active = TRUE
        "#,
    )
    .bind(slug)
    .execute(db)
    .await?;

    Ok(done.rows_affected() > 0)
}
