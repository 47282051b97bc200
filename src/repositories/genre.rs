use async_trait::async_trait;
use tracing::instrument;

use super::GenreRepository;
use crate::{
    db::Store,
    error::{AppError, AppResult, Entity},
    models::Genre,
};

pub struct SqlGenreRepository {
    store: Store,
}

impl SqlGenreRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl GenreRepository for SqlGenreRepository {
    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> AppResult<Genre> {
        sqlx::query_as::<_, Genre>("SELECT genre_id AS id, name FROM genre WHERE genre_id = ?")
            .bind(id)
            .fetch_optional(&self.store)
            .await?
            .ok_or(AppError::NotFound(Entity::Genre(id)))
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> AppResult<Vec<Genre>> {
        let genres =
            sqlx::query_as::<_, Genre>("SELECT genre_id AS id, name FROM genre ORDER BY genre_id")
                .fetch_all(&self.store)
                .await?;

        tracing::debug!(count = genres.len(), "Loaded genres");
        Ok(genres)
    }
}
