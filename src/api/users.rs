//! User management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::UserProjection;
use crate::infrastructure::user::{CreateUserRequest, ListUsersRequest, UpdateUserRequest};

/// Request to create a new user. Missing fields are reported by the service.
#[derive(Clone, Default, Deserialize)]
pub struct AddUserApiRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl From<AddUserApiRequest> for CreateUserRequest {
    fn from(request: AddUserApiRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            password: request.password,
        }
    }
}

/// Query string of `GET /all`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    pub search: Option<String>,
    pub sort_type: Option<String>,
    pub sort_order: Option<String>,
}

impl From<ListUsersQuery> for ListUsersRequest {
    fn from(query: ListUsersQuery) -> Self {
        Self {
            search: query.search,
            sort_type: query.sort_type,
            sort_order: query.sort_order,
        }
    }
}

/// Request to update a user
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserApiRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl From<UpdateUserApiRequest> for UpdateUserRequest {
    fn from(request: UpdateUserApiRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddUserResponse {
    pub message: String,
    pub user: UserProjection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserResponse {
    pub message: String,
    pub updated_user: UserProjection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Routes mounted under `/user`
pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_user))
        .route("/all", get(list_users))
        .route("/{id}", get(get_user).patch(update_user).delete(delete_user))
}

/// POST /user/add
pub async fn add_user(
    State(state): State<AppState>,
    Json(request): Json<AddUserApiRequest>,
) -> Result<(StatusCode, Json<AddUserResponse>), ApiError> {
    debug!("Adding user");

    let user = state
        .user_service
        .create(request.into())
        .await
        .map_err(ApiError::from)?;

    Ok((
        StatusCode::CREATED,
        Json(AddUserResponse {
            message: "User added successfully".to_string(),
            user,
        }),
    ))
}

/// GET /user/all
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Vec<UserProjection>>, ApiError> {
    debug!(?query, "Listing users");

    let users = state
        .user_service
        .list(query.into())
        .await
        .map_err(ApiError::from)?;

    Ok(Json(users))
}

/// GET /user/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserProjection>, ApiError> {
    debug!(user_id = %id, "Getting user");

    let user = state.user_service.get(&id).await.map_err(ApiError::from)?;

    Ok(Json(user))
}

/// PATCH /user/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserApiRequest>,
) -> Result<Json<UpdateUserResponse>, ApiError> {
    debug!(user_id = %id, "Updating user");

    let updated_user = state
        .user_service
        .update(&id, request.into())
        .await
        .map_err(ApiError::from)?;

    Ok(Json(UpdateUserResponse {
        message: "User updated successfully".to_string(),
        updated_user,
    }))
}

/// DELETE /user/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    debug!(user_id = %id, "Deleting user");

    state.user_service.delete(&id).await.map_err(ApiError::from)?;

    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}
