use crate::api::models::{CreateUserRequest, DeleteUserResponse, UpdateUserRequest};
use crate::core::error::{KeygateError, Result};
use crate::store::{User, UserPatch};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::AppState;

/// Handler for GET /users - List all users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    Ok(Json(state.users.list().await))
}

/// Handler for POST /users - Create a new user
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse> {
    let missing = req.missing_fields();
    if !missing.is_empty() {
        return Err(KeygateError::InvalidRequest(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let user = state
        .users
        .create(
            req.name.unwrap_or_default(),
            req.email.unwrap_or_default(),
            req.age.unwrap_or_default(),
        )
        .await;

    tracing::info!(user_id = user.id, "User created");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Handler for GET /users/{id} - Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
) -> Result<Json<User>> {
    let user = state
        .users
        .get(user_id)
        .await
        .ok_or_else(|| KeygateError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Handler for PUT /users/{id} - Update a user
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>> {
    let patch = UserPatch {
        name: req.name,
        email: req.email,
        age: req.age,
    };

    if patch.is_empty() {
        return Err(KeygateError::InvalidRequest(
            "Request body is required".to_string(),
        ));
    }

    let user = state
        .users
        .update(user_id, patch)
        .await
        .ok_or_else(|| KeygateError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = user.id, "User updated");

    Ok(Json(user))
}

/// Handler for DELETE /users/{id} - Delete a user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
) -> Result<Json<DeleteUserResponse>> {
    if !state.users.delete(user_id).await {
        return Err(KeygateError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id, "User deleted");

    Ok(Json(DeleteUserResponse {
        message: format!("User {} deleted", user_id),
    }))
}
