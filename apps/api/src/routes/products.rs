//! Product endpoints (all behind the Access Gate).

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::AppState;
use farmacia_core::{EntityId, Product, ProductInput};

/// Body of `PUT /products`.
#[derive(Deserialize)]
pub struct ProductUpdateRequest {
    pub id: EntityId,
    #[serde(flatten)]
    pub product: ProductInput,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list).post(create).put(update))
        .route("/products/{id}", get(find).delete(remove))
        .route("/products/name/{name}", get(search))
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.products.list().await?))
}

async fn find(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EntityId>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.products.find_by_id(id).await?))
}

async fn search(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.products.search_by_name(&name).await?))
}

/// The authenticated caller becomes the owner.
async fn create(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(owner)): Extension<AuthenticatedUser>,
    ApiJson(input): ApiJson<ProductInput>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let product = state.products.create(&owner, input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ProductUpdateRequest>,
) -> ApiResult<Json<Product>> {
    Ok(Json(
        state.products.update(request.id, request.product).await?,
    ))
}

async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EntityId>,
) -> ApiResult<StatusCode> {
    state.products.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
