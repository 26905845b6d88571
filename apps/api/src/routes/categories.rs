//! Category endpoints (all behind the Access Gate).

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::AppState;
use farmacia_core::{Category, CategoryInput, EntityId};

/// Body of `PUT /categories`.
#[derive(Deserialize)]
pub struct CategoryUpdateRequest {
    pub id: EntityId,
    #[serde(flatten)]
    pub category: CategoryInput,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list).post(create).put(update))
        .route("/categories/{id}", get(find).delete(remove))
        .route("/categories/name/{name}", get(search))
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.categories.list().await?))
}

async fn find(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EntityId>,
) -> ApiResult<Json<Category>> {
    Ok(Json(state.categories.find_by_id(id).await?))
}

async fn search(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.categories.search_by_name(&name).await?))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CategoryInput>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let category = state.categories.create(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn update(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CategoryUpdateRequest>,
) -> ApiResult<Json<Category>> {
    Ok(Json(
        state
            .categories
            .update(request.id, request.category)
            .await?,
    ))
}

async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EntityId>,
) -> ApiResult<StatusCode> {
    state.categories.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
