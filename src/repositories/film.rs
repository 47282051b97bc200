use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqliteConnection;
use tracing::instrument;

use super::{
    join_table::{FILM_GENRE, LIKES},
    FilmRepository,
};
use crate::{
    db::Store,
    error::{AppError, AppResult, Entity},
    models::{Film, Genre, Mpa},
};

const SELECT_FILM: &str = r#"
    SELECT f.film_id, f.name, f.description, f.release_date, f.duration, f.mpa_id, m.mpa_name
    FROM film AS f
    LEFT JOIN mpa AS m ON m.mpa_id = f.mpa_id
    WHERE f.film_id = ?
"#;

const SELECT_ALL_FILMS: &str = r#"
    SELECT f.film_id, f.name, f.description, f.release_date, f.duration, f.mpa_id, m.mpa_name
    FROM film AS f
    LEFT JOIN mpa AS m ON m.mpa_id = f.mpa_id
    ORDER BY f.film_id
"#;

const SELECT_FILM_GENRES: &str = r#"
    SELECT fg.film_id, g.genre_id, g.name AS genre_name
    FROM film_genre AS fg
    JOIN genre AS g ON g.genre_id = fg.genre_id
    WHERE fg.film_id = ?
    ORDER BY g.genre_id
"#;

const SELECT_ALL_FILM_GENRES: &str = r#"
    SELECT fg.film_id, g.genre_id, g.name AS genre_name
    FROM film_genre AS fg
    JOIN genre AS g ON g.genre_id = fg.genre_id
    ORDER BY fg.film_id, g.genre_id
"#;

const SELECT_FILM_LIKES: &str =
    "SELECT film_id, user_id FROM likes WHERE film_id = ? ORDER BY user_id";

const SELECT_ALL_LIKES: &str = "SELECT film_id, user_id FROM likes ORDER BY film_id, user_id";

/// Base film row with its rating name. `mpa_name` is only empty when the
/// rating row is missing.
#[derive(Debug, sqlx::FromRow)]
struct FilmRow {
    film_id: i64,
    name: String,
    description: String,
    release_date: NaiveDate,
    duration: i32,
    mpa_id: i64,
    mpa_name: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct FilmGenreRow {
    film_id: i64,
    genre_id: i64,
    genre_name: String,
}

#[derive(Debug, sqlx::FromRow)]
struct LikeRow {
    film_id: i64,
    user_id: i64,
}

impl FilmRow {
    fn into_film(self, genres: BTreeSet<Genre>, likes: BTreeSet<i64>) -> AppResult<Film> {
        let mpa_name = self
            .mpa_name
            .ok_or(AppError::NotFound(Entity::Mpa(self.mpa_id)))?;

        Ok(Film {
            id: self.film_id,
            name: self.name,
            description: self.description,
            release_date: self.release_date,
            duration: self.duration,
            mpa: Mpa::new(self.mpa_id, mpa_name),
            genres,
            likes,
        })
    }
}

/// Rebuilds film aggregates from base rows and per-association rows.
///
/// Association rows are grouped by film id; a film with no rows in a group
/// gets an empty set. Output order follows `rows`.
fn assemble_films(
    rows: Vec<FilmRow>,
    genre_rows: Vec<FilmGenreRow>,
    like_rows: Vec<LikeRow>,
) -> AppResult<Vec<Film>> {
    let mut genres: HashMap<i64, BTreeSet<Genre>> = HashMap::new();
    for row in genre_rows {
        genres
            .entry(row.film_id)
            .or_default()
            .insert(Genre::new(row.genre_id, row.genre_name));
    }

    let mut likes: HashMap<i64, BTreeSet<i64>> = HashMap::new();
    for row in like_rows {
        likes.entry(row.film_id).or_default().insert(row.user_id);
    }

    rows.into_iter()
        .map(|row| {
            let film_genres = genres.remove(&row.film_id).unwrap_or_default();
            let film_likes = likes.remove(&row.film_id).unwrap_or_default();
            row.into_film(film_genres, film_likes)
        })
        .collect()
}

async fn fetch_film(conn: &mut SqliteConnection, id: i64) -> AppResult<Film> {
    let row = sqlx::query_as::<_, FilmRow>(SELECT_FILM)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(AppError::NotFound(Entity::Film(id)))?;

    let genre_rows = sqlx::query_as::<_, FilmGenreRow>(SELECT_FILM_GENRES)
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;

    let like_rows = sqlx::query_as::<_, LikeRow>(SELECT_FILM_LIKES)
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;

    let mut films = assemble_films(vec![row], genre_rows, like_rows)?;
    films
        .pop()
        .ok_or_else(|| AppError::Internal(format!("film {} vanished during assembly", id)))
}

async fn film_exists(conn: &mut SqliteConnection, id: i64) -> AppResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT film_id FROM film WHERE film_id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

/// Fails with NotFound for the rating or the first genre that has no row
async fn ensure_classification(conn: &mut SqliteConnection, film: &Film) -> AppResult<()> {
    let mpa: Option<i64> = sqlx::query_scalar("SELECT mpa_id FROM mpa WHERE mpa_id = ?")
        .bind(film.mpa.id)
        .fetch_optional(&mut *conn)
        .await?;
    if mpa.is_none() {
        return Err(AppError::NotFound(Entity::Mpa(film.mpa.id)));
    }

    for genre_id in film.genre_ids() {
        let genre: Option<i64> =
            sqlx::query_scalar("SELECT genre_id FROM genre WHERE genre_id = ?")
                .bind(genre_id)
                .fetch_optional(&mut *conn)
                .await?;
        if genre.is_none() {
            return Err(AppError::NotFound(Entity::Genre(genre_id)));
        }
    }

    Ok(())
}

async fn ensure_users(conn: &mut SqliteConnection, user_ids: &BTreeSet<i64>) -> AppResult<()> {
    for &user_id in user_ids {
        let user: Option<i64> = sqlx::query_scalar("SELECT user_id FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await?;
        if user.is_none() {
            return Err(AppError::NotFound(Entity::User(user_id)));
        }
    }
    Ok(())
}

pub struct SqlFilmRepository {
    store: Store,
}

impl SqlFilmRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl FilmRepository for SqlFilmRepository {
    #[instrument(skip(self, film), fields(name = %film.name))]
    async fn add(&self, film: &Film) -> AppResult<Film> {
        let mut tx = self.store.begin().await?;

        ensure_classification(&mut *tx, film).await?;

        let film_id = sqlx::query(
            "INSERT INTO film (name, description, release_date, duration, mpa_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&film.name)
        .bind(&film.description)
        .bind(film.release_date)
        .bind(film.duration)
        .bind(film.mpa.id)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        FILM_GENRE.replace(&mut *tx, film_id, film.genre_ids()).await?;

        let stored = fetch_film(&mut *tx, film_id).await?;
        tx.commit().await?;

        tracing::info!(film_id, genres = stored.genres.len(), "Film added");
        Ok(stored)
    }

    #[instrument(skip(self, film), fields(film_id = film.id))]
    async fn update(&self, film: &Film) -> AppResult<Film> {
        let mut tx = self.store.begin().await?;

        if !film_exists(&mut *tx, film.id).await? {
            return Err(AppError::NotFound(Entity::Film(film.id)));
        }
        ensure_classification(&mut *tx, film).await?;
        ensure_users(&mut *tx, &film.likes).await?;

        sqlx::query(
            "UPDATE film SET name = ?, description = ?, release_date = ?, duration = ?, mpa_id = ? WHERE film_id = ?",
        )
        .bind(&film.name)
        .bind(&film.description)
        .bind(film.release_date)
        .bind(film.duration)
        .bind(film.mpa.id)
        .bind(film.id)
        .execute(&mut *tx)
        .await?;

        FILM_GENRE.replace(&mut *tx, film.id, film.genre_ids()).await?;
        LIKES
            .replace(&mut *tx, film.id, film.likes.iter().copied())
            .await?;

        let stored = fetch_film(&mut *tx, film.id).await?;
        tx.commit().await?;

        tracing::info!(
            film_id = film.id,
            genres = stored.genres.len(),
            likes = stored.likes.len(),
            "Film updated"
        );
        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> AppResult<Film> {
        let mut conn = self.store.acquire().await?;
        fetch_film(&mut *conn, id).await
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> AppResult<Vec<Film>> {
        let mut conn = self.store.acquire().await?;

        let rows = sqlx::query_as::<_, FilmRow>(SELECT_ALL_FILMS)
            .fetch_all(&mut *conn)
            .await?;
        let genre_rows = sqlx::query_as::<_, FilmGenreRow>(SELECT_ALL_FILM_GENRES)
            .fetch_all(&mut *conn)
            .await?;
        let like_rows = sqlx::query_as::<_, LikeRow>(SELECT_ALL_LIKES)
            .fetch_all(&mut *conn)
            .await?;

        let films = assemble_films(rows, genre_rows, like_rows)?;
        tracing::debug!(count = films.len(), "Loaded films");
        Ok(films)
    }
}
