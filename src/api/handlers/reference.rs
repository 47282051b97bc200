use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    api::AppState,
    error::AppResult,
    models::{Genre, Mpa},
};

pub async fn list_genres(State(state): State<AppState>) -> AppResult<Json<Vec<Genre>>> {
    Ok(Json(state.genres.get_all().await?))
}

pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Genre>> {
    Ok(Json(state.genres.get_by_id(id).await?))
}

pub async fn list_mpa(State(state): State<AppState>) -> AppResult<Json<Vec<Mpa>>> {
    Ok(Json(state.mpa.get_all().await?))
}

pub async fn get_mpa(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Mpa>> {
    Ok(Json(state.mpa.get_by_id(id).await?))
}
