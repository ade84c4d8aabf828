use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

use crate::error::HostCode;

/// Classification of a failure that stops the current compilation.
///
/// The category decides how an enclosing trap scope is expected to react; the
/// transfer of control is the same for all of them.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum FailureCode {
  /// Generic internal error.
  ///
  /// Every trap scope starts out with this code; it is replaced once a
  /// failure is claimed.
  #[default]
  Internal,
  /// Malformed input the front end should have rejected.
  BadInput,
  /// Valid input the current strategy cannot handle.
  ///
  /// Scopes that support it fall back to a more conservative strategy.
  Unsupported,
  /// Known gap in the implementation for a valid input.
  NotYetImplemented,
  /// A `noway_assert!` guard failed.
  ConditionalInvariant,
  /// A path that can never execute was reached.
  InternalInvariant,
  /// Resource exhaustion.
  OutOfMemory,
  /// Caller-supplied host code, forwarded verbatim.
  Fatal(HostCode),
}

impl FailureCode {
  /// Returns the host code this category reports by default.
  ///
  /// A raised [`Failure`] may carry a different code, e.g. a
  /// not-yet-implemented path skipped by policy reports
  /// [`HostCode::SKIPPED`].
  ///
  /// [`Failure`]: crate::error::Failure
  pub const fn host_code(self) -> HostCode {
    match self {
      Self::Internal => HostCode::INTERNAL_ERROR,
      Self::BadInput => HostCode::BAD_CODE,
      Self::Unsupported => HostCode::INTERNAL_ERROR,
      Self::NotYetImplemented => HostCode::RECOVERABLE_ERROR,
      Self::ConditionalInvariant => HostCode::RECOVERABLE_ERROR,
      Self::InternalInvariant => HostCode::RECOVERABLE_ERROR,
      Self::OutOfMemory => HostCode::OUT_OF_MEMORY,
      Self::Fatal(code) => code,
    }
  }

  /// Returns `true` if a suppression policy may let execution continue.
  #[inline]
  pub const fn is_suppressible(self) -> bool {
    matches!(self, Self::NotYetImplemented | Self::ConditionalInvariant)
  }

  #[inline]
  pub(crate) const fn label(self) -> &'static str {
    match self {
      Self::Internal => "internal",
      Self::BadInput => "badinput",
      Self::Unsupported => "unsupported",
      Self::NotYetImplemented => "nyi",
      Self::ConditionalInvariant => "noway",
      Self::InternalInvariant => "unreached",
      Self::OutOfMemory => "nomem",
      Self::Fatal(_) => "fatal",
    }
  }
}

impl Display for FailureCode {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    match self {
      Self::Fatal(code) => write!(f, "{}({code})", self.label()),
      _ => f.write_str(self.label()),
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
