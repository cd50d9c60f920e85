use serde::{Deserialize, Serialize};

use crate::repos::product_repo::ProductRow;
use crate::services::slug::slugify;

/// Body of both create and update; `category` is the category id.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub description: String,
    pub price: i64,
    pub image_url: String,
    pub stock: i64,
    pub category: i64,
}

impl ProductRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("name is required");
        }
        if name.len() > 256 {
            return Err("name must be <= 256 chars");
        }
        if slugify(name).is_empty() {
            return Err("name must contain a letter or digit");
        }
        if self.price < 0 {
            return Err("price must be >= 0");
        }
        if self.stock < 0 {
            return Err("stock must be >= 0");
        }
        if self.image_url.len() > 512 {
            return Err("image_url must be <= 512 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
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

impl From<ProductRow> for ProductResponse {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            price: row.price,
            image_url: row.image_url,
            stock: row.stock,
            rating: row.rating,
            category_id: row.category_id,
            supplier_id: row.supplier_id,
            is_active: row.is_active,
        }
    }
}
