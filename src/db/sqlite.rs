use std::str::FromStr;

use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

/// Store handle shared by every repository
///
/// Cloning is cheap; all clones share one pool.
pub type Store = SqlitePool;

/// Schema and reference data, embedded at compile time
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Creates a SQLite connection pool and brings the schema up to date
///
/// An in-memory URL lives only as long as its connection, so it is pinned to
/// a single connection that is never recycled.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<Store> {
    let options = SqliteConnectOptions::from_str(database_url)?.foreign_keys(true);

    let pool = if database_url.contains(":memory:") {
        single_connection_pool(options).await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?
    };

    MIGRATOR.run(&pool).await?;
    tracing::info!(database_url = %database_url, "Database ready");

    Ok(pool)
}

/// Fresh in-memory store with migrations applied
pub async fn connect_in_memory() -> anyhow::Result<Store> {
    create_pool("sqlite::memory:", 1).await
}

async fn single_connection_pool(options: SqliteConnectOptions) -> Result<Store, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}
