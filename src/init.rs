//! Process-wide initialization.
//!
//! Calling [`init`] is optional. Without it, the global configuration is
//! resolved from the build defaults the first time it is read, and no tracing
//! subscriber is installed.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use tracing::Level;
use tracing::Span;
use tracing::span;

use crate::config::Config;
use crate::config::ConfigError;

// -----------------------------------------------------------------------------
// Init Error
// -----------------------------------------------------------------------------

/// Errors returned from [`init`] and [`init_from_env`].
#[derive(Debug)]
#[non_exhaustive]
pub enum InitError {
  /// The global configuration was already installed or read.
  AlreadyInitialized,
  /// The environment configuration could not be parsed.
  Config(ConfigError),
}

impl Display for InitError {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    match self {
      Self::AlreadyInitialized => f.write_str("already initialized"),
      Self::Config(error) => write!(f, "invalid configuration: {error}"),
    }
  }
}

impl Error for InitError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      Self::AlreadyInitialized => None,
      Self::Config(error) => Some(error),
    }
  }
}

impl From<ConfigError> for InitError {
  #[inline]
  fn from(other: ConfigError) -> Self {
    Self::Config(other)
  }
}

// -----------------------------------------------------------------------------
// Init
// -----------------------------------------------------------------------------

/// Installs `config` as the global configuration.
///
/// With the `tracing` feature enabled this also installs a global tracing
/// subscriber configured from `config`. Failing to install the subscriber is
/// reported on stderr and is not an error.
///
/// # Errors
///
/// Returns [`InitError::AlreadyInitialized`] if the global configuration was
/// already installed, or already resolved by an earlier read.
pub fn init(config: Config) -> Result<&'static Config, InitError> {
  let Ok(config) = config.install() else {
    return Err(InitError::AlreadyInitialized);
  };

  if let Err(error) = init_tracing_subscriber(config) {
    eprintln!("failed to set tracing subscriber:");
    eprintln!("    {error}");
  }

  let span: Span = span!(target: "jittrap", Level::DEBUG, "init");
  let _enter: _ = span.enter();

  tracing::debug!(
    target: "jittrap",
    mode = %config.mode,
    target_arch = %config.target,
    features = ?config.features,
    nyi_policy = ?config.nyi_policy,
    "configuration installed",
  );

  Ok(config)
}

/// Installs the configuration described by the `JITTRAP_*` environment
/// variables.
///
/// # Errors
///
/// Returns [`InitError::Config`] if a variable cannot be parsed, or
/// [`InitError::AlreadyInitialized`] as described in [`init`].
pub fn init_from_env() -> Result<&'static Config, InitError> {
  init(Config::from_env()?)
}

#[cfg(feature = "tracing")]
fn init_tracing_subscriber(config: &Config) -> Result<(), Box<dyn Error + Send + Sync>> {
  use tracing_subscriber::FmtSubscriber;
  use tracing_subscriber::fmt::format;
  use tracing_subscriber::util::SubscriberInitExt;

  FmtSubscriber::builder()
    .event_format(format().compact())
    .log_internal_errors(true)
    .with_ansi(true)
    .with_file(config.tracing_source_file)
    .with_level(true)
    .with_line_number(config.tracing_source_line)
    .with_max_level(config.tracing_filter())
    .with_target(config.tracing_source_name)
    .with_thread_ids(config.tracing_thread_info)
    .with_thread_names(config.tracing_thread_info)
    .finish()
    .try_init()
    .map_err(Into::into)
}

#[cfg(not(feature = "tracing"))]
fn init_tracing_subscriber(_config: &Config) -> Result<(), Box<dyn Error + Send + Sync>> {
  Ok(())
}
