pub mod bundle;
pub mod db;
mod migrations;
pub mod models;
mod pool;
mod schema;
mod url;

pub(crate) use schema::*;

pub use migrations::{MigrationError, run_migrations};
pub use pool::{ConnectionPool, get_pool};
pub use url::database_url_from_environment;

pub use diesel::{Connection, PgConnection};
