use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::{
    api::AppState, error::AppResult, middleware::request_id::RequestId, models::User,
};

/// Get all users
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.users.get_all().await?))
}

/// Get one user
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    Ok(Json(state.users.get_by_id(id).await?))
}

/// Create a new user
pub async fn create_user(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(user): Json<User>,
) -> AppResult<(StatusCode, Json<User>)> {
    tracing::info!(request_id = %request_id, login = %user.login, "Creating user");

    let user = state.users.add(&user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Replace a user, including their outgoing friendships
pub async fn update_user(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(user): Json<User>,
) -> AppResult<Json<User>> {
    tracing::info!(request_id = %request_id, user_id = user.id, "Updating user");

    Ok(Json(state.users.update(&user).await?))
}

pub async fn list_friends(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.friends.friends(id).await?))
}

pub async fn add_friend(
    State(state): State<AppState>,
    Path((id, friend_id)): Path<(i64, i64)>,
) -> AppResult<Json<User>> {
    Ok(Json(state.friends.add_friend(id, friend_id).await?))
}

pub async fn remove_friend(
    State(state): State<AppState>,
    Path((id, friend_id)): Path<(i64, i64)>,
) -> AppResult<Json<User>> {
    Ok(Json(state.friends.remove_friend(id, friend_id).await?))
}

pub async fn common_friends(
    State(state): State<AppState>,
    Path((id, other_id)): Path<(i64, i64)>,
) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.friends.common_friends(id, other_id).await?))
}
