use async_trait::async_trait;

use super::MpaRepository;
use crate::{
    db::Store,
    error::{AppError, AppResult, Entity},
    models::Mpa,
};

pub struct SqlMpaRepository {
    store: Store,
}

impl SqlMpaRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MpaRepository for SqlMpaRepository {
    async fn get_by_id(&self, id: i64) -> AppResult<Mpa> {
        sqlx::query_as::<_, Mpa>("SELECT mpa_id AS id, mpa_name AS name FROM mpa WHERE mpa_id = ?")
            .bind(id)
            .fetch_optional(&self.store)
            .await?
            .ok_or(AppError::NotFound(Entity::Mpa(id)))
    }

    async fn get_all(&self) -> AppResult<Vec<Mpa>> {
        let ratings = sqlx::query_as::<_, Mpa>(
            "SELECT mpa_id AS id, mpa_name AS name FROM mpa ORDER BY mpa_id",
        )
        .fetch_all(&self.store)
        .await?;

        Ok(ratings)
    }
}
