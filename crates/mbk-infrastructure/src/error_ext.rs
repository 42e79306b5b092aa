//! Context for foreign errors
//!
//! Figment, TOML, filesystem and appender failures are folded into the
//! domain [`Error`] with a message naming what was being attempted; the
//! original error stays reachable through `source()`.

use mbk_domain::error::{Error, Result};
use std::fmt;

/// Attach context while converting into [`Error`]
///
/// ```ignore
/// let appender = RollingFileAppender::builder()
///     .build(directory)
///     .with_context(|| format!("Failed to open log file in {}", directory.display()))?;
/// let config: AppConfig = figment.extract().config_context("Failed to extract configuration")?;
/// ```
pub trait ErrorContext<T> {
    /// Wrap as [`Error::Infrastructure`]
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display;

    /// Wrap as [`Error::Infrastructure`], building the message only on failure
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;

    /// Wrap as [`Error::Configuration`]
    fn config_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display,
    {
        self.map_err(|err| Error::infrastructure_with_source(format!("{context}: {err}"), err))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|err| Error::infrastructure_with_source(format!("{}: {err}", f()), err))
    }

    fn config_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display,
    {
        self.map_err(|err| Error::config_with_source(format!("{context}: {err}"), err))
    }
}
