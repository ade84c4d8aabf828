use bitflags::bitflags;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;
use std::str::FromStr;

#[cfg(not(any(
  target_arch = "x86_64",
  target_arch = "x86",
  target_arch = "arm",
  target_arch = "aarch64",
)))]
compile_error!("jittrap requires an x86, x86_64, arm or aarch64 host");

// -----------------------------------------------------------------------------
// Build Mode
// -----------------------------------------------------------------------------

/// How much context a raised failure collects.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum BuildMode {
  /// Collect messages, sites, backtraces and guard hit counts.
  Diagnostic,
  /// Collect only the failure category.
  Production,
}

impl FromStr for BuildMode {
  type Err = ();

  fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
    match value {
      "diagnostic" | "debug" => Ok(Self::Diagnostic),
      "production" | "release" => Ok(Self::Production),
      _ => Err(()),
    }
  }
}

impl Display for BuildMode {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    match self {
      Self::Diagnostic => f.write_str("diagnostic"),
      Self::Production => f.write_str("production"),
    }
  }
}

// -----------------------------------------------------------------------------
// Target
// -----------------------------------------------------------------------------

/// Instruction-set family the compiler generates code for.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Target {
  Amd64,
  X86,
  Arm,
  Arm64,
}

impl Target {
  /// Returns the instruction-set family of the build host.
  pub const fn host() -> Self {
    if cfg!(target_arch = "x86_64") {
      Self::Amd64
    } else if cfg!(target_arch = "x86") {
      Self::X86
    } else if cfg!(target_arch = "arm") {
      Self::Arm
    } else {
      Self::Arm64
    }
  }
}

impl Display for Target {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    match self {
      Self::Amd64 => f.write_str("amd64"),
      Self::X86 => f.write_str("x86"),
      Self::Arm => f.write_str("arm"),
      Self::Arm64 => f.write_str("arm64"),
    }
  }
}

// -----------------------------------------------------------------------------
// Features
// -----------------------------------------------------------------------------

bitflags! {
  /// Optional compiler features that change which failures are reachable.
  #[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
  pub struct Features: u32 {
    /// Experimental compiler; NYI paths defer to [`NyiPolicy`].
    const ALT_JIT = 1 << 0;
    /// Legacy x86 backend; NYI paths are plain assertions.
    const LEGACY_BACKEND = 1 << 1;
    /// x87 stack-based floating point.
    const STACK_FP_X87 = 1 << 2;
    /// Count guard evaluations per site in diagnostic mode.
    const MEASURE_NOWAY = 1 << 3;
  }
}

// -----------------------------------------------------------------------------
// NYI Policy
// -----------------------------------------------------------------------------

/// What an experimental compiler does when it reaches a not-yet-implemented path.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum NyiPolicy {
  /// Abandon the unit and report it as skipped.
  Skip,
  /// Log the gap and keep compiling.
  Proceed,
}

impl FromStr for NyiPolicy {
  type Err = ();

  fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
    match value {
      "skip" | "0" => Ok(Self::Skip),
      "proceed" | "2" => Ok(Self::Proceed),
      _ => Err(()),
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
