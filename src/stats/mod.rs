pub mod migrate;

pub use self::migrate::{migrate_stats, MigrationReport};
