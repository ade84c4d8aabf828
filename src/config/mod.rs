//! Build and policy configuration.
//!
//! Every raiser reads a single [`Config`] value: the build mode decides how
//! much context is collected, the target and feature flags decide which
//! not-yet-implemented paths are reachable at all.
//!
//! The process-wide configuration is resolved once, either explicitly through
//! [`init`] or implicitly on first use, and never changes afterwards. A worker
//! thread may run a closure under a different configuration with
//! [`Config::scope`]; this does not affect any other thread.
//!
//! [`init`]: crate::init::init

mod options;

pub use self::options::BuildMode;
pub use self::options::Features;
pub use self::options::NyiPolicy;
pub use self::options::Target;

use std::cell::Cell;
use std::env;
use std::env::VarError;
use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::consts;

static GLOBAL: OnceLock<Config> = OnceLock::new();

thread_local! {
  static SCOPED: Cell<Option<&'static Config>> = const { Cell::new(None) };
}

// -----------------------------------------------------------------------------
// Config Error
// -----------------------------------------------------------------------------

/// Errors returned while reading configuration from the environment.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
  /// The variable is set to a value that cannot be parsed.
  InvalidValue { name: &'static str, value: String },
  /// The variable is set but not valid unicode.
  NotUnicode { name: &'static str },
}

impl Display for ConfigError {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    match self {
      Self::InvalidValue { name, value } => write!(f, "invalid value for {name}: {value:?}"),
      Self::NotUnicode { name } => write!(f, "{name} is not valid unicode"),
    }
  }
}

impl Error for ConfigError {}

// -----------------------------------------------------------------------------
// Config
// -----------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
  // ---------------------------------------------------------------------------
  // Compiler Configuration
  // ---------------------------------------------------------------------------
  pub mode: BuildMode,
  pub target: Target,
  pub features: Features,
  pub nyi_policy: NyiPolicy,
  // ---------------------------------------------------------------------------
  // Tracing Subscriber Configuration
  // ---------------------------------------------------------------------------
  pub tracing_source_file: bool,
  pub tracing_source_line: bool,
  pub tracing_source_name: bool,
  pub tracing_thread_info: bool,
  pub tracing_verbose: bool,
  pub tracing_very_verbose: bool,
}

impl Config {
  /// Creates the configuration implied by the current build.
  #[inline]
  pub const fn new() -> Self {
    Self {
      mode: consts::DEFAULT_MODE,
      target: Target::host(),
      features: Features::MEASURE_NOWAY,
      nyi_policy: consts::DEFAULT_NYI_POLICY,
      tracing_source_file: true,
      tracing_source_line: true,
      tracing_source_name: false,
      tracing_thread_info: true,
      tracing_verbose: false,
      tracing_very_verbose: false,
    }
  }

  /// Creates a configuration that collects full diagnostic context.
  #[inline]
  pub const fn diagnostic() -> Self {
    Self::new().with_mode(BuildMode::Diagnostic)
  }

  /// Creates a configuration that collects only failure categories.
  #[inline]
  pub const fn production() -> Self {
    Self::new().with_mode(BuildMode::Production)
  }

  #[inline]
  pub const fn with_mode(mut self, mode: BuildMode) -> Self {
    self.mode = mode;
    self
  }

  #[inline]
  pub const fn with_target(mut self, target: Target) -> Self {
    self.target = target;
    self
  }

  #[inline]
  pub const fn with_features(mut self, features: Features) -> Self {
    self.features = features;
    self
  }

  #[inline]
  pub const fn with_nyi_policy(mut self, nyi_policy: NyiPolicy) -> Self {
    self.nyi_policy = nyi_policy;
    self
  }

  /// Creates a configuration from the build defaults, overridden by any
  /// `JITTRAP_*` environment variables that are set.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError`] if a variable is set to an unparsable value.
  pub fn from_env() -> Result<Self, ConfigError> {
    let mut this: Self = Self::new();

    if let Some(mode) = read_env(consts::ENV_MODE)? {
      this.mode = mode;
    }

    if let Some(policy) = read_env(consts::ENV_NYI)? {
      this.nyi_policy = policy;
    }

    if let Some(Flag(value)) = read_env(consts::ENV_ALT_JIT)? {
      this.features.set(Features::ALT_JIT, value);
    }

    if let Some(Flag(value)) = read_env(consts::ENV_MEASURE_NOWAY)? {
      this.features.set(Features::MEASURE_NOWAY, value);
    }

    if let Some(Verbosity(level)) = read_env(consts::ENV_TRACING)? {
      this.tracing_verbose = level >= 1;
      this.tracing_very_verbose = level >= 2;
    }

    Ok(this)
  }

  /// Returns `true` if raised failures collect messages and sites.
  #[inline]
  pub const fn is_diagnostic(&self) -> bool {
    matches!(self.mode, BuildMode::Diagnostic)
  }

  /// Returns `true` if guard evaluations are counted per site.
  #[inline]
  pub const fn measures_noway(&self) -> bool {
    self.is_diagnostic() && self.features.contains(Features::MEASURE_NOWAY)
  }

  /// Returns `true` if NYI paths are raised rather than asserted.
  ///
  /// The legacy x86 backend treats NYI as a programming error.
  #[inline]
  pub const fn has_nyi(&self) -> bool {
    !(matches!(self.target, Target::X86) && self.features.contains(Features::LEGACY_BACKEND))
  }

  /// Returns `true` if flat (non-x87) floating point NYI paths are reachable.
  #[inline]
  pub const fn has_flat_fp_nyi(&self) -> bool {
    !matches!(self.target, Target::X86) && !self.features.contains(Features::STACK_FP_X87)
  }

  #[inline]
  pub const fn tracing_filter(&self) -> tracing::Level {
    if self.tracing_very_verbose {
      tracing::Level::TRACE
    } else if self.tracing_verbose {
      tracing::Level::DEBUG
    } else {
      tracing::Level::INFO
    }
  }

  // ---------------------------------------------------------------------------
  // Resolution
  // ---------------------------------------------------------------------------

  /// Returns the configuration in effect on the calling thread.
  ///
  /// This is the innermost [`Config::scope`] override, or else the global
  /// configuration, which is resolved from the build defaults if [`init`]
  /// has not been called.
  ///
  /// [`init`]: crate::init::init
  #[inline]
  pub fn current() -> &'static Self {
    match SCOPED.with(Cell::get) {
      Some(config) => config,
      None => GLOBAL.get_or_init(Self::new),
    }
  }

  /// Runs `f` with `self` as the configuration of the calling thread.
  ///
  /// The previous configuration is restored when `f` returns or unwinds.
  pub fn scope<F, R>(&'static self, f: F) -> R
  where
    F: FnOnce() -> R,
  {
    struct Restore(Option<&'static Config>);

    impl Drop for Restore {
      fn drop(&mut self) {
        SCOPED.with(|scoped| scoped.set(self.0));
      }
    }

    let _restore: Restore = Restore(SCOPED.with(|scoped| scoped.replace(Some(self))));

    f()
  }

  /// Installs `self` as the global configuration.
  ///
  /// Returns `self` back if the global configuration was already resolved.
  pub(crate) fn install(self) -> Result<&'static Self, Self> {
    GLOBAL.set(self)?;

    // The value was just set and is never cleared.
    Ok(GLOBAL.get_or_init(Self::new))
  }
}

impl Default for Config {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

// -----------------------------------------------------------------------------
// Environment Parsing
// -----------------------------------------------------------------------------

struct Flag(bool);

impl FromStr for Flag {
  type Err = ();

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value {
      "1" | "true" | "on" => Ok(Self(true)),
      "0" | "false" | "off" => Ok(Self(false)),
      _ => Err(()),
    }
  }
}

struct Verbosity(u8);

impl FromStr for Verbosity {
  type Err = ();

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value {
      "info" => Ok(Self(0)),
      "debug" => Ok(Self(1)),
      "trace" => Ok(Self(2)),
      _ => Err(()),
    }
  }
}

fn read_env<T>(name: &'static str) -> Result<Option<T>, ConfigError>
where
  T: FromStr,
{
  match env::var(name) {
    Ok(value) => match value.trim().to_ascii_lowercase().parse() {
      Ok(parsed) => Ok(Some(parsed)),
      Err(_) => Err(ConfigError::InvalidValue { name, value }),
    },
    Err(VarError::NotPresent) => Ok(None),
    Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { name }),
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::config::BuildMode;
  use crate::config::Config;
  use crate::config::Features;
  use crate::config::Target;

  static PRODUCTION: Config = Config::production();
  static DIAGNOSTIC: Config = Config::diagnostic();

  #[test]
  fn test_measures_noway_requires_diagnostic() {
    assert!(DIAGNOSTIC.measures_noway());
    assert!(!PRODUCTION.measures_noway());
    assert!(!Config::diagnostic().with_features(Features::empty()).measures_noway());
  }

  #[test]
  fn test_legacy_x86_has_no_nyi() {
    let config: Config = Config::new()
      .with_target(Target::X86)
      .with_features(Features::LEGACY_BACKEND);

    assert!(!config.has_nyi());
    assert!(Config::new().with_target(Target::Arm).has_nyi());
  }

  #[test]
  fn test_flat_fp_nyi() {
    assert!(Config::new().with_target(Target::Arm64).has_flat_fp_nyi());
    assert!(!Config::new().with_target(Target::X86).has_flat_fp_nyi());
    assert!(
      !Config::new()
        .with_target(Target::Amd64)
        .with_features(Features::STACK_FP_X87)
        .has_flat_fp_nyi()
    );
  }

  #[test]
  fn test_scope_restores_previous() {
    let before: *const Config = Config::current();

    PRODUCTION.scope(|| {
      assert_eq!(Config::current().mode, BuildMode::Production);

      DIAGNOSTIC.scope(|| {
        assert_eq!(Config::current().mode, BuildMode::Diagnostic);
      });

      assert_eq!(Config::current().mode, BuildMode::Production);
    });

    assert!(std::ptr::eq(before, Config::current()));
  }

  #[test]
  fn test_scope_restores_on_unwind() {
    let before: *const Config = Config::current();
    let result: Result<(), _> = std::panic::catch_unwind(|| PRODUCTION.scope(|| panic!("boom")));

    assert!(result.is_err());
    assert!(std::ptr::eq(before, Config::current()));
  }
}
