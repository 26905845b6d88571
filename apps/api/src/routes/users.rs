//! User endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::services::AuthenticatedSession;
use crate::AppState;
use farmacia_core::{EntityId, User, UserInput};

/// Body of `POST /users/login`.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Body of `PUT /users/update`: the user fields plus the target id.
#[derive(Deserialize)]
pub struct UserUpdateRequest {
    pub id: EntityId,
    #[serde(flatten)]
    pub user: UserInput,
}

/// Protected user routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/all", get(list))
        .route("/users/{id}", get(find))
        .route("/users/update", put(update))
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<UserInput>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.users.register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthenticatedSession>> {
    let session = state
        .users
        .authenticate(&request.login, &request.password)
        .await?;
    Ok(Json(session))
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.users.list_all().await?))
}

async fn find(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EntityId>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.users.find_by_id(id).await?))
}

async fn update(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UserUpdateRequest>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.users.update(request.id, request.user).await?))
}
