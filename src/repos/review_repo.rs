/*
 * Responsibility
 * - reviews CRUD (soft delete via is_active)
 * - keeps products.rating equal to mean_grade of active reviews;
 *   every write that changes the set of active reviews recomputes it
 *   in the same transaction
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub comment: Option<String>,
    pub comment_date: DateTime<Utc>,
    pub grade: i32,
    pub is_active: bool,
}

/// Active reviews of active products written by active users.
pub async fn list_visible(db: &PgPool) -> RepoResult<Vec<ReviewRow>> {
    let rows = sqlx::query_as::<_, ReviewRow>(
        r#"
        SELECT
            r.id, r.user_id, r.product_id, r.comment, r.comment_date, r.grade, r.is_active
        FROM reviews r
        JOIN products p ON p.id = r.product_id
        JOIN users u ON u.id = r.user_id
        WHERE r.is_active = TRUE
            AND p.is_active = TRUE
            AND u.is_active = TRUE
        ORDER BY r.id
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn list_for_product(db: &PgPool, product_id: i64) -> RepoResult<Vec<ReviewRow>> {
    let rows = sqlx::query_as::<_, ReviewRow>(
        r#"
        SELECT id, user_id, product_id, comment, comment_date, grade, is_active
        FROM reviews
        WHERE product_id = $1 AND is_active = TRUE
        ORDER BY id
        "#,
    )
    .bind(product_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

/// Insert a review and refresh the product's rating atomically.
pub async fn create(
    db: &PgPool,
    user_id: i64,
    product_id: i64,
    comment: Option<&str>,
    grade: i32,
) -> RepoResult<ReviewRow> {
    let mut tx = db.begin().await?;

    let row = sqlx::query_as::<_, ReviewRow>(
        r#"
        INSERT INTO reviews (user_id, product_id, comment, grade)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, product_id, comment, comment_date, grade, is_active
        "#,
    )
    .bind(user_id)
    .bind(product_id)
    .bind(comment)
    .bind(grade)
    .fetch_one(&mut *tx)
    .await?;

    refresh_rating(&mut tx, product_id).await?;
    tx.commit().await?;

    Ok(row)
}

/// Soft-delete a review and refresh the product's rating.
///
/// Returns false when there was no active review with this id.
pub async fn deactivate(db: &PgPool, id: i64) -> RepoResult<bool> {
    let mut tx = db.begin().await?;

    let product_id = sqlx::query_scalar::<_, i64>(
        r#"
        UPDATE reviews
        SET is_active = FALSE
        WHERE id = $1 AND is_active = TRUE
        RETURNING product_id
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(product_id) = product_id else {
        // nothing changed; dropping tx rolls back
        return Ok(false);
    };

    refresh_rating(&mut tx, product_id).await?;
    tx.commit().await?;

    Ok(true)
}

async fn refresh_rating(tx: &mut Transaction<'_, Postgres>, product_id: i64) -> RepoResult<()> {
    // serialise concurrent recomputes for this product
    sqlx::query("SELECT id FROM products WHERE id = $1 FOR UPDATE")
        .bind(product_id)
        .execute(&mut **tx)
        .await?;

    let grades = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT grade
        FROM reviews
        WHERE product_id = $1 AND is_active = TRUE
        "#,
    )
    .bind(product_id)
    .fetch_all(&mut **tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE products
        SET rating = $2
        WHERE id = $1
        "#,
    )
    .bind(product_id)
    .bind(mean_grade(&grades))
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Product rating: mean of the active grades, 0 when there are none.
pub fn mean_grade(grades: &[i32]) -> f64 {
    if grades.is_empty() {
        return 0.0;
    }

    let sum: i64 = grades.iter().map(|g| i64::from(*g)).sum();
    sum as f64 / grades.len() as f64
}
