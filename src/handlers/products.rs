use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path};
use crate::models::{NewProduct, Product, ProductTree};

/// Success envelope for product creation.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<NewProduct>,
) -> Result<(StatusCode, Json<ApiResponse<ProductTree>>)> {
    input.validate()?;

    let mut conn = state.db.get()?;
    let tree = queries::create_product_tree(&mut conn, &input).inspect_err(|e| {
        tracing::warn!(title = %input.title, error = %e, "product creation rolled back");
    })?;

    tracing::info!(
        product_id = tree.product.id,
        variants = tree.variants.len(),
        "created product"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            success: true,
            message: "Product created successfully".into(),
            data: tree,
        }),
    ))
}

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let conn = state.db.get()?;
    let products = queries::list_top_level_products(&conn)?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductTree>> {
    let conn = state.db.get()?;
    let tree = queries::get_product_tree(&conn, id)?
        .ok_or_else(|| AppError::NotFound("Product not found".into()))?;
    Ok(Json(tree))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/product", post(create_product))
        .route("/product", get(list_products))
        .route("/product/{id}", get(get_product))
}
