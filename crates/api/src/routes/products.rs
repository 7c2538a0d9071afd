//! Product catalog routes.
//!
//! Browsing is public; create/edit/delete require an administrator token.
//! Admin writes arrive as multipart forms so the product image can ride
//! along; files land in the configured upload directory and are served back
//! under `/uploads`.

use std::path::Path as FsPath;

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    routing::{delete, get, patch, post},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;

use alderwood_core::ProductId;

use crate::db::RepositoryError;
use crate::db::products::{NewProduct, ProductRepository, ProductUpdate};
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAdmin;
use crate::models::ProductResponse;
use crate::state::AppState;
use crate::validation::{FieldError, Validator};

/// Build the product router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/category/{category}", get(list_by_category))
        .route("/api/products/edit/{id}", patch(update_product))
        .route(
            "/api/products/{id}",
            get(get_product).delete(delete_product),
        )
}

/// List response; the message rides along for legacy clients.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub msg: &'static str,
    pub products: Vec<ProductResponse>,
}

/// Confirmation response carrying the affected product.
#[derive(Debug, Serialize)]
pub struct ProductMessageResponse {
    pub msg: &'static str,
    pub product: ProductResponse,
}

/// `GET /api/products` - the whole catalog.
async fn list_products(State(state): State<AppState>) -> Result<Json<ProductListResponse>> {
    let products = ProductRepository::new(state.pool()).list_all().await?;

    Ok(Json(ProductListResponse {
        msg: "All products fetched successfully.",
        products: products.into_iter().map(Into::into).collect(),
    }))
}

/// `GET /api/products/category/{category}` - catalog slice by category.
async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<ProductListResponse>> {
    let products = ProductRepository::new(state.pool())
        .list_by_category(&category)
        .await?;

    Ok(Json(ProductListResponse {
        msg: "All products fetched successfully.",
        products: products.into_iter().map(Into::into).collect(),
    }))
}

/// `GET /api/products/{id}` - one product.
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductResponse>> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("No such product found.".to_string()))?;

    Ok(Json(product.into()))
}

/// `POST /api/products` - add a product (administrators only, multipart).
async fn create_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ProductMessageResponse>> {
    let form = ProductForm::read(multipart).await?;
    let (quantity, price) = form.validate(true)?;

    let repo = ProductRepository::new(state.pool());

    if repo.exists_by_name(form.name.trim()).await? {
        return Err(AppError::Conflict("This product already exists.".to_string()));
    }

    // validate(true) guaranteed the image is present
    let image = match form.image {
        Some((ref ext, ref data)) => store_image(&state, ext, data).await?,
        None => return Err(AppError::BadRequest("Please enter a image.".to_string())),
    };

    let product = repo
        .create(NewProduct {
            name: form.name.trim().to_string(),
            description: form.description,
            image,
            quantity,
            price,
            rating: form.rating,
            category: form.category,
        })
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => {
                AppError::Conflict("This product already exists.".to_string())
            }
            other => other.into(),
        })?;

    Ok(Json(ProductMessageResponse {
        msg: "Product has been added.",
        product: product.into(),
    }))
}

/// `PATCH /api/products/edit/{id}` - edit a product (administrators only,
/// multipart; the image is optional and kept when absent).
async fn update_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<ProductResponse>> {
    let form = ProductForm::read(multipart).await?;
    let (quantity, price) = form.validate(false)?;

    let image = match form.image {
        Some((ref ext, ref data)) => Some(store_image(&state, ext, data).await?),
        None => None,
    };

    let product = ProductRepository::new(state.pool())
        .update(
            ProductId::new(id),
            ProductUpdate {
                name: form.name.trim().to_string(),
                description: form.description,
                image,
                quantity,
                price,
                category: form.category,
            },
        )
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Product not found.".to_string()),
            RepositoryError::Conflict(_) => {
                AppError::Conflict("This product already exists.".to_string())
            }
            other => other.into(),
        })?;

    Ok(Json(product.into()))
}

/// `DELETE /api/products/{id}` - remove a product (administrators only).
async fn delete_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>> {
    let deleted = ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;

    if !deleted {
        return Err(AppError::NotFound("No such product found.".to_string()));
    }

    Ok(Json(serde_json::json!({ "msg": "Product has been removed." })))
}

/// Fields collected from the multipart product form.
#[derive(Debug, Default)]
struct ProductForm {
    name: String,
    description: String,
    quantity: String,
    price: String,
    rating: Option<String>,
    category: Vec<String>,
    /// Extension (with leading dot) and raw bytes of the uploaded image.
    image: Option<(String, Vec<u8>)>,
}

impl ProductForm {
    /// Drain the multipart stream into a form.
    async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let field_name = field.name().unwrap_or_default().to_string();

            match field_name.as_str() {
                "image" => {
                    let ext = field
                        .file_name()
                        .and_then(|f| FsPath::new(f).extension())
                        .and_then(|e| e.to_str())
                        .map_or_else(String::new, |e| format!(".{e}"));

                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;

                    if !data.is_empty() {
                        form.image = Some((ext, data.to_vec()));
                    }
                }
                name => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;

                    match name {
                        "name" => form.name = value,
                        "description" => form.description = value,
                        "quantity" => form.quantity = value,
                        "price" => form.price = value,
                        "rating" => form.rating = Some(value),
                        // Repeated fields and comma-separated lists both work
                        "category" => form.category.extend(
                            value
                                .split(',')
                                .map(str::trim)
                                .filter(|c| !c.is_empty())
                                .map(String::from),
                        ),
                        _ => {}
                    }
                }
            }
        }

        Ok(form)
    }

    /// Check required fields and parse the numeric ones.
    ///
    /// `creating` also demands a rating and an image file.
    fn validate(&self, creating: bool) -> Result<(i32, Decimal)> {
        let mut v = Validator::new();
        v.require(&self.name, "name", "Please enter a name.");
        v.require(&self.quantity, "quantity", "Please enter a quantity.");
        v.require(&self.price, "price", "Please enter a price.");
        v.require(&self.description, "description", "Please enter a description.");
        if creating && self.rating.as_deref().unwrap_or("").trim().is_empty() {
            v.fail("rating", "Please enter a rating.");
        }
        v.require_non_empty(&self.category, "category", "Please enter a category.");
        if creating && self.image.is_none() {
            v.fail("image", "Please enter a image.");
        }

        let mut errors = match v.finish() {
            Ok(()) => Vec::new(),
            Err(errors) => errors,
        };

        let quantity = self.quantity.trim().parse::<i32>().unwrap_or_else(|_| {
            if !self.quantity.trim().is_empty() {
                errors.push(FieldError::new("quantity", "Please enter a quantity."));
            }
            0
        });
        let price = self.price.trim().parse::<Decimal>().unwrap_or_else(|_| {
            if !self.price.trim().is_empty() {
                errors.push(FieldError::new("price", "Please enter a price."));
            }
            Decimal::ZERO
        });

        if errors.is_empty() {
            Ok((quantity, price))
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

/// Write an uploaded image under the upload directory, returning the path
/// clients fetch it from.
async fn store_image(state: &AppState, ext: &str, data: &[u8]) -> Result<String> {
    let dir = &state.config().upload_dir;

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::Internal(format!("failed to create upload dir: {e}")))?;

    let mut suffix = [0u8; 4];
    {
        use rand::Rng;
        rand::rng().fill(suffix.as_mut_slice());
    }
    let filename = format!(
        "image-{}-{}{ext}",
        Utc::now().timestamp_millis(),
        hex::encode(suffix)
    );

    tokio::fs::write(dir.join(&filename), data)
        .await
        .map_err(|e| AppError::Internal(format!("failed to store image: {e}")))?;

    Ok(format!("uploads/{filename}"))
}
