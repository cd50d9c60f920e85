/*
 * Responsibility
 * - products CRUD
 * - "available" = active, in stock, and in an active category
 * - supplier_id records the owning supplier for ownership checks
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: i64,
    pub image_url: String,
    pub stock: i64,
    pub rating: f64,
    pub category_id: i64,
    pub supplier_id: Option<i64>,
    pub is_active: bool,
}

/// Column values written on create and update.
#[derive(Debug, Clone)]
pub struct ProductFields<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
    pub price: i64,
    pub image_url: &'a str,
    pub stock: i64,
    pub category_id: i64,
}

pub async fn list_available(db: &PgPool) -> RepoResult<Vec<ProductRow>> {
    let rows = sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT
            p.id, p.name, p.slug, p.description, p.price, p.image_url,
            p.stock, p.rating, p.category_id, p.supplier_id, p.is_active
        FROM products p
        JOIN categories c ON c.id = p.category_id
        WHERE p.is_active = TRUE
            AND p.stock > 0
            AND c.is_active = TRUE
        ORDER BY p.id
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn list_available_in(db: &PgPool, category_ids: &[i64]) -> RepoResult<Vec<ProductRow>> {
    let rows = sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT
            id, name, slug, description, price, image_url,
            stock, rating, category_id, supplier_id, is_active
        FROM products
        WHERE category_id = ANY($1)
            AND is_active = TRUE
            AND stock > 0
        ORDER BY id
        "#,
    )
    .bind(category_ids)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn get_available_by_slug(db: &PgPool, slug: &str) -> RepoResult<Option<ProductRow>> {
    let row = sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT
            id, name, slug, description, price, image_url,
            stock, rating, category_id, supplier_id, is_active
        FROM products
        WHERE slug = $1
            AND is_active = TRUE
            AND stock > 0
        "#,
    )
    .bind(slug)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn get_by_slug(db: &PgPool, slug: &str) -> RepoResult<Option<ProductRow>> {
    let row = sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT
            id, name, slug, description, price, image_url,
            stock, rating, category_id, supplier_id, is_active
        FROM products
        WHERE slug = $1
        "#,
    )
    .bind(slug)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn get_by_id(db: &PgPool, id: i64) -> RepoResult<Option<ProductRow>> {
    let row = sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT
            id, name, slug, description, price, image_url,
            stock, rating, category_id, supplier_id, is_active
        FROM products
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn create(
    db: &PgPool,
    fields: &ProductFields<'_>,
    supplier_id: i64,
) -> RepoResult<ProductRow> {
    let row = sqlx::query_as::<_, ProductRow>(
        r#"
        INSERT INTO products
            (name, slug, description, price, image_url, stock, rating, category_id, supplier_id)
        VALUES ($1, $2, $3, $4, $5, $6, 0, $7, $8)
        RETURNING
            id, name, slug, description, price, image_url,
            stock, rating, category_id, supplier_id, is_active
        "#,
    )
    .bind(fields.name)
    .bind(fields.slug)
    .bind(fields.description)
    .bind(fields.price)
    .bind(fields.image_url)
    .bind(fields.stock)
    .bind(fields.category_id)
    .bind(supplier_id)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn update(
    db: &PgPool,
    id: i64,
    fields: &ProductFields<'_>,
) -> RepoResult<Option<ProductRow>> {
    let row = sqlx::query_as::<_, ProductRow>(
        r#"
        UPDATE products
        SET name = $2,
            slug = $3,
            description = $4,
            price = $5,
            image_url = $6,
            stock = $7,
            category_id = $8
        WHERE id = $1
        RETURNING
            id, name, slug, description, price, image_url,
            stock, rating, category_id, supplier_id, is_active
        "#,
    )
    .bind(id)
    .bind(fields.name)
    .bind(fields.slug)
    .bind(fields.description)
    .bind(fields.price)
    .bind(fields.image_url)
    .bind(fields.stock)
    .bind(fields.category_id)
    .fetch_optional(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn deactivate(db: &PgPool, id: i64) -> RepoResult<bool> {
    let done = sqlx::query(
        r#"
        UPDATE products
        SET is_active = FALSE
        WHERE id = $1 AND is_active = TRUE
        "#,
    )
    .bind(id)
    .execute(db)
    .await?;

    Ok(done.rows_affected() > 0)
}
