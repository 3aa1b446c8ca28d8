use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Catalogue record.
///
/// Wire field names (`ID`, `ImageURL`, PascalCase rest) are kept identical
/// to what existing dashboard and storefront clients already consume.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct Product {
    #[serde(rename = "ID")]
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub stock: i32,
    #[serde(rename = "ImageURL")]
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// User-supplied fields for product creation. Store-managed fields (id,
/// timestamps, image URL) never pass through here.
#[derive(Debug, Default, Clone)]
pub struct CreateInput {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub stock: i32,
}

/// Replacement fields for an update. Updates are a full overwrite: fields
/// the client omits come through as empty/zero, not as "keep existing".
#[derive(Debug, Default, Clone)]
pub struct UpdateInput {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub stock: i32,
}
