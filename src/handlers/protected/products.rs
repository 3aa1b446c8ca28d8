use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};

use crate::database::models::{CreateInput, Product, UpdateInput};
use crate::database::repository::ProductRepository;
use crate::error::ApiError;
use crate::storage;
use crate::AppState;

/// Form fields plus optional image bytes collected from a multipart body.
/// Image bytes stay in memory until the handler decides to persist them.
#[derive(Debug, Default)]
struct ProductForm {
    name: Option<String>,
    description: String,
    category: String,
    price: f64,
    stock: i32,
    image: Option<ImagePart>,
}

#[derive(Debug)]
struct ImagePart {
    original_name: String,
    bytes: Vec<u8>,
}

async fn read_form(mut multipart: Multipart) -> Result<ProductForm, ApiError> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("cannot parse form data"))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "image" {
            let original_name = field.file_name().unwrap_or("upload").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|_| ApiError::bad_request("cannot read image data"))?;
            form.image = Some(ImagePart {
                original_name,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|_| ApiError::bad_request("cannot parse form data"))?;

        match name.as_str() {
            "name" => form.name = Some(text),
            "description" => form.description = text,
            "category" => form.category = text,
            "price" if !text.is_empty() => {
                form.price = text
                    .parse()
                    .map_err(|_| ApiError::bad_request("invalid price"))?;
            }
            "stock" if !text.is_empty() => {
                let stock: i32 = text
                    .parse()
                    .map_err(|_| ApiError::bad_request("invalid stock"))?;
                if stock < 0 {
                    return Err(ApiError::bad_request("stock must be non-negative"));
                }
                form.stock = stock;
            }
            _ => {}
        }
    }

    Ok(form)
}

/// POST /products - admin only, multipart form with optional image
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = read_form(multipart).await?;

    let name = match form.name {
        Some(ref n) if !n.trim().is_empty() => n.clone(),
        _ => return Err(ApiError::bad_request("name is required")),
    };

    let repo = ProductRepository::new(state.pool.clone());

    // The uniqueness check runs before any file is written so a rejected
    // create leaves nothing behind in the uploads area. The partial unique
    // index still backstops the race between check and insert.
    if repo.find_by_name_ci(&name).await?.is_some() {
        return Err(ApiError::conflict("product with this name already exists"));
    }

    let mut image_url = String::new();
    if let Some(image) = &form.image {
        let filename = storage::unique_name(&image.original_name);
        image_url = storage::save(&filename, &image.bytes).await?;
    }

    let input = CreateInput {
        name,
        description: form.description,
        category: form.category,
        price: form.price,
        stock: form.stock,
    };

    let product = repo.insert(&input, &image_url).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /products/:id - admin only, full overwrite with optional new image
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Product>, ApiError> {
    let id: i64 = id
        .parse()
        .map_err(|_| ApiError::not_found("product not found"))?;

    let repo = ProductRepository::new(state.pool.clone());
    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("product not found"))?;

    let form = read_form(multipart).await?;

    // Image URL only changes when a new file is attached
    let mut image_url = existing.image_url.clone();
    if let Some(image) = &form.image {
        let filename = storage::short_unique_name(&image.original_name);
        image_url = storage::save(&filename, &image.bytes).await?;

        if !existing.image_url.is_empty() {
            storage::remove_by_url(&existing.image_url).await;
        }
    }

    let input = UpdateInput {
        name: form.name.unwrap_or_default(),
        description: form.description,
        category: form.category,
        price: form.price,
        stock: form.stock,
    };

    let product = repo.update(id, &input, &image_url).await?;

    Ok(Json(product))
}

/// DELETE /products/:id - admin only, soft delete plus image cleanup
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: i64 = id
        .parse()
        .map_err(|_| ApiError::bad_request("invalid product ID"))?;

    let repo = ProductRepository::new(state.pool.clone());
    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("product not found"))?;

    if !existing.image_url.is_empty() {
        storage::remove_by_url(&existing.image_url).await;
    }

    let affected = repo.soft_delete(id).await?;
    if affected == 0 {
        // Deleted concurrently between lookup and update
        return Err(ApiError::not_found("product not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
