use crate::config::BuildMode;
use crate::config::NyiPolicy;

// -----------------------------------------------------------------------------
// Failure Transport
// -----------------------------------------------------------------------------

/// Sentinel carried by every [`Failure`] payload.
///
/// Trap filters claim an unwind only if its payload carries this value. It is
/// distinct from every host result code.
///
/// [`Failure`]: crate::error::Failure
pub const FAILURE_SENTINEL: u32 = 0x0234_5678;

// -----------------------------------------------------------------------------
// Host Result Codes
// -----------------------------------------------------------------------------

/// Compilation succeeded.
pub const HOST_OK: i32 = 0;

/// The input program is invalid.
pub const HOST_BAD_CODE: i32 = 0x8000_0001_u32 as i32;

/// The compiler ran out of memory.
pub const HOST_OUT_OF_MEMORY: i32 = 0x8000_0002_u32 as i32;

/// Generic internal compiler error.
pub const HOST_INTERNAL_ERROR: i32 = 0x8000_0003_u32 as i32;

/// The compiler declined to compile the unit.
pub const HOST_SKIPPED: i32 = 0x8000_0004_u32 as i32;

/// Internal error the host may recover from, e.g. by retrying with fewer
/// optimizations.
pub const HOST_RECOVERABLE_ERROR: i32 = 0x8000_0005_u32 as i32;

/// Valid input the current implementation cannot handle.
pub const HOST_IMPL_LIMITATION: i32 = 0x8000_0006_u32 as i32;

// -----------------------------------------------------------------------------
// Configuration Defaults
// -----------------------------------------------------------------------------

/// Build mode used when no configuration was installed.
pub const DEFAULT_MODE: BuildMode = if cfg!(debug_assertions) {
  BuildMode::Diagnostic
} else {
  BuildMode::Production
};

/// Policy applied to not-yet-implemented paths in experimental compilers.
pub const DEFAULT_NYI_POLICY: NyiPolicy = NyiPolicy::Skip;

/// Fixed text carried by `unreached!()`.
pub const UNREACHED_TEXT: &str = "unreached";

/// Number of pre-allocated entries in the hit-count table.
pub const CAP_HIT_COUNT_SITES: usize = 256;

// -----------------------------------------------------------------------------
// Environment
// -----------------------------------------------------------------------------

/// Build mode override (`diagnostic` or `production`).
pub const ENV_MODE: &str = "JITTRAP_MODE";

/// Enables the experimental compiler path (`0` or `1`).
pub const ENV_ALT_JIT: &str = "JITTRAP_ALT_JIT";

/// Not-yet-implemented policy (`skip` or `proceed`).
pub const ENV_NYI: &str = "JITTRAP_NYI";

/// Enables guard hit counting (`0` or `1`).
pub const ENV_MEASURE_NOWAY: &str = "JITTRAP_MEASURE_NOWAY";

/// Tracing verbosity (`info`, `debug` or `trace`).
pub const ENV_TRACING: &str = "JITTRAP_TRACING";
