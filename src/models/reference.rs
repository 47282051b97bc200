use serde::{Deserialize, Serialize};

/// Film genre. Reference data, preloaded and never written by the application.
///
/// Ordering is by id first, which is the order genre sets are rebuilt in.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::FromRow,
)]
pub struct Genre {
    pub id: i64,
    /// Clients refer to genres by id alone, so the name may arrive empty
    #[serde(default)]
    pub name: String,
}

impl Genre {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// MPA maturity rating. Every film carries exactly one.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::FromRow,
)]
pub struct Mpa {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

impl Mpa {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
