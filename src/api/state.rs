use std::sync::Arc;

use crate::{
    db::Store,
    repositories::{
        FilmRepository, GenreRepository, MpaRepository, SqlFilmRepository, SqlGenreRepository,
        SqlMpaRepository, SqlUserRepository, UserRepository,
    },
    services::{FilmRankingService, FriendService},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub films: Arc<dyn FilmRepository>,
    pub users: Arc<dyn UserRepository>,
    pub genres: Arc<dyn GenreRepository>,
    pub mpa: Arc<dyn MpaRepository>,
    pub ranking: Arc<FilmRankingService>,
    pub friends: Arc<FriendService>,
    /// Popular listing size when the request names none
    pub popular_default_count: i64,
}

impl AppState {
    /// Wires every repository and service onto one store handle
    pub fn new(store: Store, popular_default_count: i64) -> Self {
        let films: Arc<dyn FilmRepository> = Arc::new(SqlFilmRepository::new(store.clone()));
        let users: Arc<dyn UserRepository> = Arc::new(SqlUserRepository::new(store.clone()));

        Self {
            ranking: Arc::new(FilmRankingService::new(films.clone(), users.clone())),
            friends: Arc::new(FriendService::new(users.clone())),
            genres: Arc::new(SqlGenreRepository::new(store.clone())),
            mpa: Arc::new(SqlMpaRepository::new(store)),
            films,
            users,
            popular_default_count,
        }
    }
}
