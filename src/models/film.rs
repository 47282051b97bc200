use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Genre, Mpa};

/// Film aggregate: the base row plus its genre set and like set
///
/// Both sets are ordered (genres by id, likes by user id) so that a film read
/// back from the store compares equal to any other read of the same rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    /// Assigned by the store; ignored on add
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub release_date: NaiveDate,
    /// Minutes
    pub duration: i32,
    pub mpa: Mpa,
    #[serde(default)]
    pub genres: BTreeSet<Genre>,
    /// Ids of users who liked the film
    #[serde(default)]
    pub likes: BTreeSet<i64>,
}

impl Film {
    /// Distinct genre ids, whatever names the caller attached
    pub fn genre_ids(&self) -> BTreeSet<i64> {
        self.genres.iter().map(|g| g.id).collect()
    }

    pub fn like_count(&self) -> usize {
        self.likes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_film() {
        let json = r#"{
            "name": "Solaris",
            "releaseDate": "1972-03-20",
            "duration": 167,
            "mpa": {"id": 2}
        }"#;

        let film: Film = serde_json::from_str(json).unwrap();
        assert_eq!(film.id, 0);
        assert_eq!(film.description, "");
        assert_eq!(film.release_date, NaiveDate::from_ymd_opt(1972, 3, 20).unwrap());
        assert_eq!(film.mpa.id, 2);
        assert!(film.genres.is_empty());
        assert!(film.likes.is_empty());
    }

    #[test]
    fn test_genre_ids_collapse_duplicates() {
        let json = r#"{
            "name": "Stalker",
            "releaseDate": "1979-05-25",
            "duration": 161,
            "mpa": {"id": 1},
            "genres": [{"id": 2}, {"id": 2, "name": "Drama"}, {"id": 1}]
        }"#;

        let film: Film = serde_json::from_str(json).unwrap();
        assert_eq!(film.genre_ids().into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }
}
