use sqlx::PgPool;

use crate::database::models::{CreateInput, Product, UpdateInput};

/// Data access for products. Every query excludes soft-deleted rows.
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE deleted_at IS NULL ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Case-insensitive name lookup, used as the create pre-check.
    pub async fn find_by_name_ci(&self, name: &str) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE LOWER(name) = LOWER($1) AND deleted_at IS NULL",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn insert(&self, input: &CreateInput, image_url: &str) -> Result<Product, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            "INSERT INTO products (name, description, category, price, stock, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING *",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.category)
        .bind(input.price)
        .bind(input.stock)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await
    }

    /// Full-overwrite update of the user-supplied fields plus the image URL.
    pub async fn update(
        &self,
        id: i64,
        input: &UpdateInput,
        image_url: &str,
    ) -> Result<Product, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            "UPDATE products \
             SET name = $2, description = $3, category = $4, price = $5, stock = $6, \
                 image_url = $7, updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING *",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.category)
        .bind(input.price)
        .bind(input.stock)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await
    }

    /// Soft delete; returns the number of rows marked.
    pub async fn soft_delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE products SET deleted_at = now(), updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
