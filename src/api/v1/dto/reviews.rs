use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::review_repo::ReviewRow;

/// The author is always the caller; there is no user id in the body.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub product_id: i64,
    pub comment: Option<String>,
    pub rate_grade: i32,
}

impl CreateReviewRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(1..=5).contains(&self.rate_grade) {
            return Err("rate_grade must be between 1 and 5");
        }
        if let Some(comment) = &self.comment
            && comment.chars().count() > 2000
        {
            return Err("comment must be <= 2000 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub comment: Option<String>,
    pub comment_date: DateTime<Utc>,
    pub grade: i32,
    pub is_active: bool,
}

impl From<ReviewRow> for ReviewResponse {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            product_id: row.product_id,
            comment: row.comment,
            comment_date: row.comment_date,
            grade: row.grade,
            is_active: row.is_active,
        }
    }
}
