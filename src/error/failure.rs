use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::error::Error;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;
use std::panic;

use crate::consts::FAILURE_SENTINEL;
use crate::error::FailureCode;
use crate::error::HostCode;
use crate::error::Site;

/// The unwinding payload of a classified compiler failure.
///
/// Failures are raised by the functions in [`raise`] (usually through the
/// crate macros) and claimed by the nearest enclosing [`Trap`].
///
/// In diagnostic mode a failure also carries the raise site, a message and a
/// backtrace. In production mode only the code and host code are collected.
///
/// # Display Format
///
/// Failures format as: `{code}:{host}` followed by ` - {message} at {file}:{line}`
/// when diagnostic detail is available.
///
/// Example: `noway:recoverableerror (0x80000005) - x > 0 at src/lower.rs:12`
///
/// [`raise`]: crate::raise
/// [`Trap`]: crate::trap::Trap
pub struct Failure {
  sentinel: u32,
  code: FailureCode,
  host: HostCode,
  detail: Option<Detail>,
}

struct Detail {
  site: Site,
  message: Cow<'static, str>,
  trace: Backtrace,
}

impl Failure {
  /// Creates a failure without diagnostic detail.
  #[inline]
  pub(crate) const fn new(code: FailureCode, host: HostCode) -> Self {
    Self {
      sentinel: FAILURE_SENTINEL,
      code,
      host,
      detail: None,
    }
  }

  /// Creates a failure carrying the raise site and message.
  ///
  /// Captures a backtrace at the call site; availability depends on the
  /// `RUST_BACKTRACE` environment variable.
  #[inline]
  pub(crate) fn with_detail<M>(code: FailureCode, host: HostCode, site: Site, message: M) -> Self
  where
    M: Into<Cow<'static, str>>,
  {
    Self {
      detail: Some(Detail {
        site,
        message: message.into(),
        trace: Backtrace::capture(),
      }),
      ..Self::new(code, host)
    }
  }

  /// Replaces the transport sentinel.
  #[cfg(test)]
  pub(crate) fn with_sentinel(mut self, sentinel: u32) -> Self {
    self.sentinel = sentinel;
    self
  }

  /// Transfers control to the nearest enclosing trap scope.
  ///
  /// This does not invoke the panic hook.
  #[cold]
  pub(crate) fn raise(self) -> ! {
    Box::new(self).resume()
  }

  /// Resumes unwinding with an already boxed failure.
  #[cold]
  pub(crate) fn resume(self: Box<Self>) -> ! {
    panic::resume_unwind(self)
  }

  /// Returns the transport sentinel.
  #[inline]
  pub const fn sentinel(&self) -> u32 {
    self.sentinel
  }

  /// Returns the failure category.
  #[inline]
  pub const fn code(&self) -> FailureCode {
    self.code
  }

  /// Returns the code forwarded to the host when the failure is reported.
  #[inline]
  pub const fn host_code(&self) -> HostCode {
    self.host
  }

  /// Returns the raise site, if collected.
  #[inline]
  pub fn site(&self) -> Option<Site> {
    self.detail.as_ref().map(|detail| detail.site)
  }

  /// Returns the failure message, if collected.
  #[inline]
  pub fn message(&self) -> Option<&str> {
    self.detail.as_ref().map(|detail| detail.message.as_ref())
  }

  /// Returns the backtrace captured at the raise site, if collected.
  #[inline]
  pub fn trace(&self) -> Option<&Backtrace> {
    self.detail.as_ref().map(|detail| &detail.trace)
  }
}

impl Debug for Failure {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Display::fmt(self, f)
  }
}

impl Display for Failure {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    write!(f, "{}:{}", self.code, self.host)?;

    if let Some(detail) = self.detail.as_ref() {
      write!(
        f,
        " - {} at {}:{}",
        detail.message,
        detail.site.file(),
        detail.site.line(),
      )?;
    }

    Ok(())
  }
}

impl Error for Failure {}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
