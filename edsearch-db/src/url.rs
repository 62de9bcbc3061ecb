use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use std::path::PathBuf;

/// Resolve the database connection string (§6 "DATABASE_URL", §10.2).
///
/// `DATABASE_URL` is read directly when present. Otherwise the connection
/// string is assembled from the `POSTGRES_*` decomposition this codebase
/// has historically accepted (`POSTGRES_USER`, `POSTGRES_PASSWORD` or
/// `POSTGRES_PASSWORD_FILE`, `POSTGRES_DB`), kept as a fallback so existing
/// deployments that never set `DATABASE_URL` keep working.
pub fn database_url_from_environment() -> String {
    if let Ok(url) = std::env::var("DATABASE_URL") {
        return url;
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct PostgresConfig {
        user: String,
        password: Option<String>,
        password_file: Option<PathBuf>,
        db: String,
    }
    let provider = figment::providers::Env::prefixed("POSTGRES_");
    let postgres_config: PostgresConfig = figment::Figment::from(provider)
        .extract()
        .expect("DATABASE_URL or POSTGRES_* environment variable(s) missing or invalid");

    let password = if let Some(password) = postgres_config.password {
        password
    } else if let Some(password_file) = postgres_config.password_file {
        std::fs::read_to_string(password_file).expect("Failed to read postgres password file")
    } else {
        panic!("One of POSTGRES_PASSWORD or POSTGRES_PASSWORD_FILE must be provided");
    };

    // Postgres (or something else in the pipeline) will _truncate_ the
    // password at the first newline. We don't want to mimic that behavior,
    // because it could lead to people using vastly less secure passwords
    // than they intended to. A trailing newline can be trimmed without
    // losing meaningful entropy; any other embedded newline is an error.
    let password = password.strip_suffix('\n').unwrap_or(&password);

    if password.contains('\n') {
        panic!(
            "Postgres admin password contains a non-terminal newline. This password would be \
            insecurely truncated. Please try again with a password that does not contain non-\
            terminal newlines."
        );
    }

    let password = utf8_percent_encode(password, NON_ALPHANUMERIC);

    format!(
        "postgres://{}:{}@db/{}",
        postgres_config.user, password, postgres_config.db
    )
}
