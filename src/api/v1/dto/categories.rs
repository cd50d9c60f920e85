use serde::{Deserialize, Serialize};

use crate::repos::category_repo::CategoryRow;
use crate::services::slug::slugify;

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    pub parent_id: Option<i64>,
}

impl CategoryRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("name is required");
        }
        if name.len() > 128 {
            return Err("name must be <= 128 chars");
        }
        if slugify(name).is_empty() {
            return Err("name must contain a letter or digit");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub is_active: bool,
    pub parent_id: Option<i64>,
}

impl From<CategoryRow> for CategoryResponse {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            is_active: row.is_active,
            parent_id: row.parent_id,
        }
    }
}
