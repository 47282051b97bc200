pub mod sqlite;

pub use sqlite::{connect_in_memory, create_pool, Store, MIGRATOR};
