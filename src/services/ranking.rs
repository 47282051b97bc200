use std::cmp::Reverse;
use std::sync::Arc;

use tracing::instrument;

use crate::{
    error::{AppError, AppResult, Entity},
    models::Film,
    repositories::{FilmRepository, UserRepository},
};

/// Likes and the popularity ranking built on them
pub struct FilmRankingService {
    films: Arc<dyn FilmRepository>,
    users: Arc<dyn UserRepository>,
}

impl FilmRankingService {
    pub fn new(films: Arc<dyn FilmRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { films, users }
    }

    /// Record that `user_id` likes `film_id`.
    ///
    /// Liking twice is a no-op on the like set.
    #[instrument(skip(self))]
    pub async fn add_like(&self, film_id: i64, user_id: i64) -> AppResult<Film> {
        let mut film = self.films.get_by_id(film_id).await?;
        let user = self.users.get_by_id(user_id).await?;

        if !film.likes.insert(user.id) {
            tracing::debug!(film_id, user_id, "Like already present");
        }

        self.films.update(&film).await
    }

    /// Withdraw a like. Fails with NotFound when the like was never given.
    #[instrument(skip(self))]
    pub async fn remove_like(&self, film_id: i64, user_id: i64) -> AppResult<Film> {
        let mut film = self.films.get_by_id(film_id).await?;
        let user = self.users.get_by_id(user_id).await?;

        if !film.likes.remove(&user.id) {
            return Err(AppError::NotFound(Entity::Like { film_id, user_id }));
        }

        self.films.update(&film).await
    }

    /// The `count` most liked films, most liked first
    #[instrument(skip(self))]
    pub async fn get_popular(&self, count: i64) -> AppResult<Vec<Film>> {
        if count <= 0 {
            return Ok(Vec::new());
        }

        let mut films = self.films.get_all().await?;
        rank_by_likes(&mut films);
        films.truncate(usize::try_from(count).unwrap_or(usize::MAX));

        tracing::debug!(requested = count, returned = films.len(), "Popular films");
        Ok(films)
    }
}

/// Most liked first. The sort is stable, so equally liked films keep their
/// relative order.
fn rank_by_likes(films: &mut [Film]) {
    films.sort_by_key(|film| Reverse(film.like_count()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Mpa, User};
    use crate::repositories::{MockFilmRepository, MockUserRepository};
    use chrono::NaiveDate;
    use mockall::predicate::eq;
    use std::collections::BTreeSet;

    fn film(id: i64, likes: &[i64]) -> Film {
        Film {
            id,
            name: format!("film {}", id),
            description: String::new(),
            release_date: NaiveDate::from_ymd_opt(1999, 3, 31).unwrap(),
            duration: 136,
            mpa: Mpa::new(4, "R"),
            genres: BTreeSet::new(),
            likes: likes.iter().copied().collect(),
        }
    }

    fn user(id: i64) -> User {
        User {
            id,
            login: format!("user{}", id),
            name: String::new(),
            email: format!("user{}@example.com", id),
            birthday: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            friends: BTreeSet::new(),
        }
    }

    fn service(films: MockFilmRepository, users: MockUserRepository) -> FilmRankingService {
        FilmRankingService::new(Arc::new(films), Arc::new(users))
    }

    #[tokio::test]
    async fn test_add_like_writes_user_into_like_set() {
        let mut films = MockFilmRepository::new();
        films
            .expect_get_by_id()
            .with(eq(1))
            .returning(|id| Ok(film(id, &[])));
        films
            .expect_update()
            .withf(|f| f.likes == BTreeSet::from([7]))
            .times(1)
            .returning(|f| Ok(Film::clone(f)));

        let mut users = MockUserRepository::new();
        users.expect_get_by_id().returning(|id| Ok(user(id)));

        let liked = service(films, users).add_like(1, 7).await.unwrap();
        assert_eq!(liked.likes, BTreeSet::from([7]));
    }

    #[tokio::test]
    async fn test_add_like_twice_keeps_single_entry() {
        let mut films = MockFilmRepository::new();
        films
            .expect_get_by_id()
            .returning(|id| Ok(film(id, &[7])));
        films
            .expect_update()
            .withf(|f| f.likes == BTreeSet::from([7]))
            .returning(|f| Ok(Film::clone(f)));

        let mut users = MockUserRepository::new();
        users.expect_get_by_id().returning(|id| Ok(user(id)));

        let liked = service(films, users).add_like(1, 7).await.unwrap();
        assert_eq!(liked.like_count(), 1);
    }

    #[tokio::test]
    async fn test_add_like_unknown_user() {
        let mut films = MockFilmRepository::new();
        films.expect_get_by_id().returning(|id| Ok(film(id, &[])));
        films.expect_update().never();

        let mut users = MockUserRepository::new();
        users
            .expect_get_by_id()
            .returning(|id| Err(AppError::NotFound(Entity::User(id))));

        let err = service(films, users).add_like(1, 99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(Entity::User(99))));
    }

    #[tokio::test]
    async fn test_add_like_unknown_film() {
        let mut films = MockFilmRepository::new();
        films
            .expect_get_by_id()
            .returning(|id| Err(AppError::NotFound(Entity::Film(id))));

        let err = service(films, MockUserRepository::new())
            .add_like(5, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(Entity::Film(5))));
    }

    #[tokio::test]
    async fn test_remove_like_persists_removal() {
        let mut films = MockFilmRepository::new();
        films
            .expect_get_by_id()
            .returning(|id| Ok(film(id, &[3, 7])));
        films
            .expect_update()
            .withf(|f| f.likes == BTreeSet::from([3]))
            .times(1)
            .returning(|f| Ok(Film::clone(f)));

        let mut users = MockUserRepository::new();
        users.expect_get_by_id().returning(|id| Ok(user(id)));

        let film = service(films, users).remove_like(1, 7).await.unwrap();
        assert_eq!(film.likes, BTreeSet::from([3]));
    }

    #[tokio::test]
    async fn test_remove_like_never_given_is_not_found() {
        let mut films = MockFilmRepository::new();
        films.expect_get_by_id().returning(|id| Ok(film(id, &[3])));
        films.expect_update().never();

        let mut users = MockUserRepository::new();
        users.expect_get_by_id().returning(|id| Ok(user(id)));

        let result = service(films, users).remove_like(1, 7).await;
        let err = tokio_test::assert_err!(result);
        assert!(matches!(
            err,
            AppError::NotFound(Entity::Like {
                film_id: 1,
                user_id: 7
            })
        ));
    }

    #[tokio::test]
    async fn test_popular_is_stable_for_equal_counts() {
        let mut films = MockFilmRepository::new();
        films.expect_get_all().returning(|| {
            Ok(vec![
                film(1, &[1, 2, 3]),
                film(2, &[1]),
                film(3, &[4, 5, 6]),
                film(4, &[]),
            ])
        });

        let popular = service(films, MockUserRepository::new())
            .get_popular(2)
            .await
            .unwrap();

        let ids: Vec<i64> = popular.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_popular_count_larger_than_population() {
        let mut films = MockFilmRepository::new();
        films
            .expect_get_all()
            .returning(|| Ok(vec![film(1, &[]), film(2, &[9])]));

        let popular = service(films, MockUserRepository::new())
            .get_popular(10)
            .await
            .unwrap();

        let ids: Vec<i64> = popular.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_popular_non_positive_count_is_empty() {
        let mut films = MockFilmRepository::new();
        films.expect_get_all().never();

        let service = service(films, MockUserRepository::new());
        assert!(service.get_popular(0).await.unwrap().is_empty());
        assert!(service.get_popular(-3).await.unwrap().is_empty());
    }
}
