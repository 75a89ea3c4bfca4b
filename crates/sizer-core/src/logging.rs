#![forbid(unsafe_code)]

//! Logging bootstrap.
//!
//! Lessons draw on the terminal, so log output must never go to stdout or
//! stderr while a session is active. With the `tracing-json` feature enabled,
//! [`init_file_logging`] installs a JSON formatter that appends to a file and
//! honors an `EnvFilter` directive (for example `SIZER_LOG=debug`).

/// Environment variable holding the filter directive.
pub const LOG_FILTER_ENV: &str = "SIZER_LOG";

/// Filter used when [`LOG_FILTER_ENV`] is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Install a global JSON subscriber that writes to `path`.
///
/// `filter` overrides the environment directive when given. An unparsable
/// directive falls back to [`DEFAULT_FILTER`].
///
/// # Errors
///
/// Fails if the file cannot be opened, or with
/// [`std::io::ErrorKind::AlreadyExists`] if a global subscriber is already
/// installed. In that case the earlier subscriber stays active.
#[cfg(feature = "tracing-json")]
pub fn init_file_logging(
    path: &std::path::Path,
    filter: Option<&str>,
) -> std::io::Result<()> {
    use std::io;
    use std::sync::Mutex;
    use tracing_subscriber::EnvFilter;

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    let filter = match filter {
        Some(directive) => EnvFilter::try_new(directive).ok(),
        None => EnvFilter::try_from_env(LOG_FILTER_ENV).ok(),
    }
    .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e))?;

    tracing::info!(path = %path.display(), "file logging enabled");
    Ok(())
}
