use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

use crate::consts;

/// A result code understood by the embedding host.
///
/// Exact values are host-defined; the associated constants cover the codes
/// this crate raises itself. Any other value is carried verbatim.
#[derive(Clone, Copy, Hash, PartialEq, Eq)]
#[repr(transparent)]
pub struct HostCode(i32);

impl HostCode {
  /// Compilation succeeded.
  pub const OK: Self = Self(consts::HOST_OK);

  /// The input program is invalid.
  pub const BAD_CODE: Self = Self(consts::HOST_BAD_CODE);

  /// The compiler ran out of memory.
  pub const OUT_OF_MEMORY: Self = Self(consts::HOST_OUT_OF_MEMORY);

  /// Generic internal compiler error.
  pub const INTERNAL_ERROR: Self = Self(consts::HOST_INTERNAL_ERROR);

  /// The compiler declined to compile the unit.
  pub const SKIPPED: Self = Self(consts::HOST_SKIPPED);

  /// Internal error the host may recover from.
  pub const RECOVERABLE_ERROR: Self = Self(consts::HOST_RECOVERABLE_ERROR);

  /// Valid input the current implementation cannot handle.
  pub const IMPL_LIMITATION: Self = Self(consts::HOST_IMPL_LIMITATION);

  /// Wraps a raw host result code.
  #[inline]
  pub const fn new(code: i32) -> Self {
    Self(code)
  }

  /// Returns the raw host result code.
  #[inline]
  pub const fn get(self) -> i32 {
    self.0
  }

  /// Returns the symbolic name of a well-known code.
  pub const fn name(self) -> Option<&'static str> {
    match self.0 {
      consts::HOST_OK => Some("ok"),
      consts::HOST_BAD_CODE => Some("badcode"),
      consts::HOST_OUT_OF_MEMORY => Some("outofmem"),
      consts::HOST_INTERNAL_ERROR => Some("internalerror"),
      consts::HOST_SKIPPED => Some("skipped"),
      consts::HOST_RECOVERABLE_ERROR => Some("recoverableerror"),
      consts::HOST_IMPL_LIMITATION => Some("impllimitation"),
      _ => None,
    }
  }
}

impl Debug for HostCode {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Display::fmt(self, f)
  }
}

impl Display for HostCode {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    match self.name() {
      Some(name) => write!(f, "{name} ({:#010x})", self.0),
      None => write!(f, "{:#010x}", self.0),
    }
  }
}

impl From<i32> for HostCode {
  #[inline]
  fn from(other: i32) -> Self {
    Self::new(other)
  }
}

impl From<HostCode> for i32 {
  #[inline]
  fn from(other: HostCode) -> Self {
    other.get()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::error::HostCode;

  #[test]
  fn test_display_known() {
    assert_eq!(format!("{}", HostCode::BAD_CODE), "badcode (0x80000001)");
    assert_eq!(format!("{}", HostCode::OK), "ok (0x00000000)");
  }

  #[test]
  fn test_display_unknown() {
    assert_eq!(format!("{}", HostCode::new(0x1234)), "0x00001234");
  }

  #[test]
  fn test_codes_are_distinct() {
    let codes: [HostCode; 7] = [
      HostCode::OK,
      HostCode::BAD_CODE,
      HostCode::OUT_OF_MEMORY,
      HostCode::INTERNAL_ERROR,
      HostCode::SKIPPED,
      HostCode::RECOVERABLE_ERROR,
      HostCode::IMPL_LIMITATION,
    ];

    for (index, code) in codes.iter().enumerate() {
      assert!(codes[index + 1..].iter().all(|other| other != code));
    }
  }
}
