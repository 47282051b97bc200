//! Persistence for films, users and their reference data
//!
//! Every repository receives the store handle at construction. Mutations run
//! inside a single transaction covering the base-row write, the join-table
//! replacement and the read-back, so a failure part way leaves nothing behind.

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Film, Genre, Mpa, User},
};

mod film;
mod genre;
mod join_table;
mod mpa;
mod user;

pub use film::SqlFilmRepository;
pub use genre::SqlGenreRepository;
pub use mpa::SqlMpaRepository;
pub use user::SqlUserRepository;

/// Film aggregates, with their genre and like associations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FilmRepository: Send + Sync {
    /// Insert a film and its genres, returning the stored aggregate.
    ///
    /// The id on the input is ignored. Likes are not written.
    async fn add(&self, film: &Film) -> AppResult<Film>;

    /// Overwrite a film's columns and replace its genre and like sets.
    ///
    /// Returns `Err(AppError::NotFound)` if the film doesn't exist.
    async fn update(&self, film: &Film) -> AppResult<Film>;

    /// Returns `Err(AppError::NotFound)` if the film doesn't exist.
    async fn get_by_id(&self, id: i64) -> AppResult<Film>;

    /// All films in id order
    async fn get_all(&self) -> AppResult<Vec<Film>>;
}

/// User aggregates, with their outgoing friendship edges
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user, returning the stored aggregate.
    ///
    /// The id on the input is ignored. Friends are not written.
    async fn add(&self, user: &User) -> AppResult<User>;

    /// Overwrite a user's columns and replace their outgoing friendships.
    ///
    /// Returns `Err(AppError::NotFound)` if the user doesn't exist.
    async fn update(&self, user: &User) -> AppResult<User>;

    /// Returns `Err(AppError::NotFound)` if the user doesn't exist.
    async fn get_by_id(&self, id: i64) -> AppResult<User>;

    /// All users in id order
    async fn get_all(&self) -> AppResult<Vec<User>>;
}

/// Read-only genre reference data
#[async_trait]
pub trait GenreRepository: Send + Sync {
    async fn get_by_id(&self, id: i64) -> AppResult<Genre>;

    /// All genres in id order
    async fn get_all(&self) -> AppResult<Vec<Genre>>;
}

/// Read-only MPA rating reference data
#[async_trait]
pub trait MpaRepository: Send + Sync {
    async fn get_by_id(&self, id: i64) -> AppResult<Mpa>;

    /// All ratings in id order
    async fn get_all(&self) -> AppResult<Vec<Mpa>>;
}
