//! Raisers: classify a failure and transfer control to the nearest trap.
//!
//! These functions are the bodies behind the crate macros ([`noway_assert!`],
//! [`badcode!`], [`nyi!`], ...). Calling them directly is supported, but the
//! macros also capture the source site and guard text.
//!
//! Every raiser reads [`Config::current()`] once per call. In diagnostic mode
//! the raised [`Failure`] carries the site, a message and a backtrace; in
//! production mode only the category and host code are collected.
//!
//! [`noway_assert!`]: crate::noway_assert
//! [`badcode!`]: crate::badcode
//! [`nyi!`]: crate::nyi

use std::borrow::Cow;

use crate::config::Config;
use crate::config::Features;
use crate::config::NyiPolicy;
use crate::config::Target;
use crate::error::Failure;
use crate::error::FailureCode;
use crate::error::HostCode;
use crate::error::Site;
use crate::trap;

// -----------------------------------------------------------------------------
// Diagnostics
// -----------------------------------------------------------------------------

/// Logs a failure message with its source location.
///
/// Does nothing in production mode.
pub fn debug_error(site: &Site) {
  if Config::current().is_diagnostic() {
    tracing::error!(
      target: "jittrap",
      file = site.file(),
      line = site.line(),
      "{}",
      site.text(),
    );
  }
}

// -----------------------------------------------------------------------------
// Unconditional Raisers
// -----------------------------------------------------------------------------

/// Raises [`FailureCode::BadInput`]: the input program is malformed.
#[cold]
pub fn bad_code(site: &Site) -> ! {
  debug_error(site);
  raise(FailureCode::BadInput, HostCode::BAD_CODE, site, || site.text().into())
}

/// Raises [`FailureCode::BadInput`] with a secondary message and argument.
///
/// The diagnostic message reads `"{text} / {detail} [0x{arg:08X}]"`.
#[cold]
pub fn bad_code3(site: &Site, detail: &str, arg: i32) -> ! {
  raise(FailureCode::BadInput, HostCode::BAD_CODE, site, || {
    let message: String = format!("{} / {detail} [0x{arg:08X}]", site.text());

    tracing::error!(
      target: "jittrap",
      file = site.file(),
      line = site.line(),
      "{message}",
    );

    message.into()
  })
}

/// Raises [`FailureCode::Unsupported`]: the current strategy cannot handle
/// otherwise valid input.
#[cold]
pub fn no_way(site: &Site) -> ! {
  debug_error(site);
  no_way_quiet(site)
}

/// Raises [`FailureCode::Unsupported`] without logging.
#[cold]
pub fn no_way_quiet(site: &Site) -> ! {
  raise(FailureCode::Unsupported, HostCode::INTERNAL_ERROR, site, || site.text().into())
}

/// Raises [`FailureCode::OutOfMemory`].
///
/// Never suppressed and never carries more than its category.
#[cold]
pub fn nomem() -> ! {
  Failure::new(FailureCode::OutOfMemory, HostCode::OUT_OF_MEMORY).raise()
}

/// Raises [`FailureCode::Fatal`] with a host code forwarded verbatim.
#[cold]
pub fn fatal(code: HostCode) -> ! {
  Failure::new(FailureCode::Fatal(code), code).raise()
}

/// Raises [`FailureCode::InternalInvariant`] without consulting any policy.
///
/// This backs `unreached!()`.
#[cold]
pub fn noway_assert_body(site: &Site) -> ! {
  invariant_failed(FailureCode::InternalInvariant, site)
}

// -----------------------------------------------------------------------------
// Conditional Raisers
// -----------------------------------------------------------------------------

/// Handles a failed `noway_assert!` guard.
///
/// Raises [`FailureCode::ConditionalInvariant`] unless the innermost trap's
/// [`NowayPolicy`] suppresses it, in which case this returns.
///
/// [`NowayPolicy`]: crate::trap::NowayPolicy
#[cold]
pub fn noway_assert_failed(site: &Site) {
  conditional(FailureCode::ConditionalInvariant, site);
}

/// Handles a not-yet-implemented path.
///
/// Depending on the configuration this is a programming-error assertion
/// (legacy x86 backend), defers to [`NyiPolicy`] (experimental compiler), or
/// behaves like a failed `noway_assert!` classified as
/// [`FailureCode::NotYetImplemented`]. May return.
#[cold]
pub fn not_yet_implemented(site: &Site) {
  let config: &Config = Config::current();

  if !config.has_nyi() {
    if config.is_diagnostic() {
      panic!("assertion failed: {site}");
    }

    return;
  }

  if config.features.contains(Features::ALT_JIT) {
    match config.nyi_policy {
      NyiPolicy::Skip => {
        raise(FailureCode::NotYetImplemented, HostCode::SKIPPED, site, || site.text().into())
      }
      NyiPolicy::Proceed => {
        tracing::warn!(
          target: "jittrap",
          file = site.file(),
          line = site.line(),
          "{} (proceeding)",
          site.text(),
        );

        return;
      }
    }
  }

  conditional(FailureCode::NotYetImplemented, site);
}

/// Handles a not-yet-implemented path that only exists on `target`.
///
/// Does nothing if the configured target differs.
#[inline]
pub fn not_yet_implemented_on(target: Target, site: &Site) {
  if Config::current().target == target {
    not_yet_implemented(site);
  }
}

/// Handles a not-yet-implemented flat floating point path.
///
/// Does nothing on x86 or with x87 stack-based floating point.
#[inline]
pub fn not_yet_implemented_flat_fp(site: &Site) {
  if Config::current().has_flat_fp_nyi() {
    not_yet_implemented(site);
  }
}

// -----------------------------------------------------------------------------
// Internals
// -----------------------------------------------------------------------------

fn conditional(code: FailureCode, site: &Site) {
  if !code.is_suppressible() || trap::should_raise(code, site) {
    invariant_failed(code, site);
  }

  if Config::current().is_diagnostic() {
    tracing::warn!(
      target: "jittrap",
      code = %code,
      file = site.file(),
      line = site.line(),
      "suppressed: {}",
      site.text(),
    );
  } else {
    tracing::warn!(target: "jittrap", code = %code, "suppressed");
  }
}

fn invariant_failed(code: FailureCode, site: &Site) -> ! {
  raise(code, HostCode::RECOVERABLE_ERROR, site, || {
    tracing::error!(
      target: "jittrap",
      code = %code,
      file = site.file(),
      line = site.line(),
      "assertion failed: {}",
      site.text(),
    );

    site.text().into()
  })
}

/// Raises a failure, collecting `message` only in diagnostic mode.
pub(crate) fn raise<F>(code: FailureCode, host: HostCode, site: &Site, message: F) -> !
where
  F: FnOnce() -> Cow<'static, str>,
{
  let failure: Failure = if Config::current().is_diagnostic() {
    Failure::with_detail(code, host, *site, message())
  } else {
    Failure::new(code, host)
  };

  failure.raise()
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use std::panic;

  use crate::config::Config;
  use crate::error::Failure;
  use crate::error::FailureCode;
  use crate::error::HostCode;
  use crate::error::Site;
  use crate::raise;

  static DIAGNOSTIC: Config = Config::diagnostic();
  static PRODUCTION: Config = Config::production();

  const SITE: Site = Site::new("src/importer.rs", 7, "bad opcode");

  fn catch<F>(f: F) -> Box<Failure>
  where
    F: FnOnce() + panic::UnwindSafe,
  {
    match panic::catch_unwind(f) {
      Ok(()) => panic!("expected a failure"),
      Err(payload) => payload.downcast::<Failure>().unwrap(),
    }
  }

  #[test]
  fn test_bad_code_diagnostic() {
    let failure: Box<Failure> = DIAGNOSTIC.scope(|| catch(|| raise::bad_code(&SITE)));

    assert_eq!(failure.code(), FailureCode::BadInput);
    assert_eq!(failure.host_code(), HostCode::BAD_CODE);
    assert_eq!(failure.message(), Some("bad opcode"));
    assert_eq!(failure.site(), Some(SITE));
  }

  #[test]
  fn test_bad_code_production() {
    let failure: Box<Failure> = PRODUCTION.scope(|| catch(|| raise::bad_code(&SITE)));

    assert_eq!(failure.code(), FailureCode::BadInput);
    assert!(failure.message().is_none());
    assert!(failure.site().is_none());
  }

  #[test]
  fn test_bad_code3_message() {
    let failure: Box<Failure> =
      DIAGNOSTIC.scope(|| catch(|| raise::bad_code3(&SITE, "token", 0x0600_0001)));

    assert_eq!(failure.message(), Some("bad opcode / token [0x06000001]"));
  }

  #[test]
  fn test_fatal_forwards_code() {
    let code: HostCode = HostCode::new(0x1234);
    let failure: Box<Failure> = catch(|| raise::fatal(code));

    assert_eq!(failure.code(), FailureCode::Fatal(code));
    assert_eq!(failure.host_code(), code);
  }

  #[test]
  fn test_unreached_ignores_policy() {
    let failure: Box<Failure> = catch(|| raise::noway_assert_body(&SITE));

    assert_eq!(failure.code(), FailureCode::InternalInvariant);
    assert_eq!(failure.host_code(), HostCode::RECOVERABLE_ERROR);
  }

  #[test]
  fn test_noway_without_trap_raises() {
    let failure: Box<Failure> = catch(|| raise::noway_assert_failed(&SITE));

    assert_eq!(failure.code(), FailureCode::ConditionalInvariant);
  }
}
