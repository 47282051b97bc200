use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    api::AppState, error::AppResult, middleware::request_id::RequestId, models::Film,
};

#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    count: Option<i64>,
}

/// Get all films
pub async fn list_films(State(state): State<AppState>) -> AppResult<Json<Vec<Film>>> {
    Ok(Json(state.films.get_all().await?))
}

/// Get one film
pub async fn get_film(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Film>> {
    Ok(Json(state.films.get_by_id(id).await?))
}

/// Create a new film
pub async fn create_film(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(film): Json<Film>,
) -> AppResult<(StatusCode, Json<Film>)> {
    tracing::info!(request_id = %request_id, name = %film.name, "Creating film");

    let film = state.films.add(&film).await?;
    Ok((StatusCode::CREATED, Json(film)))
}

/// Replace a film, including its genre and like sets
pub async fn update_film(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(film): Json<Film>,
) -> AppResult<Json<Film>> {
    tracing::info!(request_id = %request_id, film_id = film.id, "Updating film");

    Ok(Json(state.films.update(&film).await?))
}

pub async fn add_like(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(i64, i64)>,
) -> AppResult<Json<Film>> {
    Ok(Json(state.ranking.add_like(id, user_id).await?))
}

pub async fn remove_like(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(i64, i64)>,
) -> AppResult<Json<Film>> {
    Ok(Json(state.ranking.remove_like(id, user_id).await?))
}

/// Most liked films, `count` of them (configured default when absent)
pub async fn popular_films(
    State(state): State<AppState>,
    Query(params): Query<PopularQuery>,
) -> AppResult<Json<Vec<Film>>> {
    let count = params.count.unwrap_or(state.popular_default_count);
    Ok(Json(state.ranking.get_popular(count).await?))
}
