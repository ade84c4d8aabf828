//! Raising macros.
//!
//! Every macro captures its source site in an inline `const` block, binds it
//! to a local and calls the matching function in [`raise`]. Caller expressions
//! never see an item declared by the macro. Guard macros (`noway_assert!`,
//! `nyi_if!`) always evaluate their condition, in every build mode.
//!
//! [`Site`]: crate::error::Site
//! [`raise`]: crate::raise

#[doc(hidden)]
#[macro_export]
macro_rules! __site {
  ($text:expr) => {
    $crate::error::Site::new(::std::file!(), ::std::line!(), $text)
  };
}

// -----------------------------------------------------------------------------
// Unconditional
// -----------------------------------------------------------------------------

/// Raises [`BadInput`]: the input program is malformed.
///
/// [`BadInput`]: crate::error::FailureCode::BadInput
#[macro_export]
macro_rules! badcode {
  ($msg:expr $(,)?) => {{
    let site: $crate::error::Site = const { $crate::__site!($msg) };
    $crate::raise::bad_code(&site)
  }};
}

/// Raises [`BadInput`] with a secondary message and a hex argument.
///
/// [`BadInput`]: crate::error::FailureCode::BadInput
#[macro_export]
macro_rules! badcode3 {
  ($msg:expr, $detail:expr, $arg:expr $(,)?) => {{
    let site: $crate::error::Site = const { $crate::__site!($msg) };
    $crate::raise::bad_code3(&site, $detail, $arg)
  }};
}

/// Raises [`Unsupported`]: valid input the current strategy cannot handle.
///
/// [`Unsupported`]: crate::error::FailureCode::Unsupported
#[macro_export]
macro_rules! no_way {
  ($msg:expr $(,)?) => {{
    let site: $crate::error::Site = const { $crate::__site!($msg) };
    $crate::raise::no_way(&site)
  }};
}

/// Like [`no_way!`] but without the diagnostic log entry.
#[macro_export]
macro_rules! no_way_noassert {
  ($msg:expr $(,)?) => {{
    let site: $crate::error::Site = const { $crate::__site!($msg) };
    $crate::raise::no_way_quiet(&site)
  }};
}

/// Raises [`Unsupported`] for a known implementation limit.
///
/// [`Unsupported`]: crate::error::FailureCode::Unsupported
#[macro_export]
macro_rules! impl_limitation {
  ($msg:expr $(,)?) => {
    $crate::no_way!($msg)
  };
}

/// Raises [`InternalInvariant`]. Never suppressed.
///
/// [`InternalInvariant`]: crate::error::FailureCode::InternalInvariant
#[macro_export]
macro_rules! unreached {
  () => {{
    let site: $crate::error::Site = const { $crate::__site!($crate::consts::UNREACHED_TEXT) };
    $crate::raise::noway_assert_body(&site)
  }};
}

/// Raises [`OutOfMemory`].
///
/// [`OutOfMemory`]: crate::error::FailureCode::OutOfMemory
#[macro_export]
macro_rules! nomem {
  () => {
    $crate::raise::nomem()
  };
}

/// Raises [`Fatal`] with a host result code.
///
/// [`Fatal`]: crate::error::FailureCode::Fatal
#[macro_export]
macro_rules! fatal {
  ($code:expr $(,)?) => {
    $crate::raise::fatal($crate::error::HostCode::from($code))
  };
}

// -----------------------------------------------------------------------------
// Conditional
// -----------------------------------------------------------------------------

/// Checks a recoverable invariant.
///
/// Records a hit for the guard site (when measuring), then evaluates `$cond`.
/// If it is false, raises [`ConditionalInvariant`] unless the innermost trap's
/// policy suppresses it.
///
/// # Examples
///
/// ```
/// fn lower(count: u32) -> u32 {
///   jittrap::noway_assert!(count > 0);
///   count - 1
/// }
///
/// assert_eq!(lower(3), 2);
/// ```
///
/// [`ConditionalInvariant`]: crate::error::FailureCode::ConditionalInvariant
#[macro_export]
macro_rules! noway_assert {
  ($cond:expr $(,)?) => {{
    let site: $crate::error::Site = const { $crate::__site!(::std::stringify!($cond)) };
    $crate::counters::record(&site);

    if !($cond) {
      $crate::raise::noway_assert_failed(&site);
    }
  }};
}

/// Reports an already-failed recoverable invariant with a message.
///
/// Takes the same policy path as a failed [`noway_assert!`] and may return.
#[macro_export]
macro_rules! noway_msg {
  ($msg:expr $(,)?) => {{
    let site: $crate::error::Site = const { $crate::__site!($msg) };
    $crate::raise::noway_assert_failed(&site)
  }};
}

/// Marks a path that is not yet implemented. May return.
#[macro_export]
macro_rules! nyi {
  ($msg:literal $(,)?) => {{
    let site: $crate::error::Site = const { $crate::__site!(::std::concat!("NYI: ", $msg)) };
    $crate::raise::not_yet_implemented(&site)
  }};
}

/// Evaluates `$cond` and behaves as [`nyi!`] if it holds.
#[macro_export]
macro_rules! nyi_if {
  ($cond:expr, $msg:literal $(,)?) => {
    if $cond {
      $crate::nyi!($msg);
    }
  };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __nyi_on {
  ($target:ident, $prefix:literal, $msg:literal) => {{
    let site: $crate::error::Site = const { $crate::__site!(::std::concat!($prefix, $msg)) };
    $crate::raise::not_yet_implemented_on($crate::config::Target::$target, &site)
  }};
}

/// [`nyi!`] that only fires when compiling for x86-64.
#[macro_export]
macro_rules! nyi_amd64 {
  ($msg:literal $(,)?) => {
    $crate::__nyi_on!(Amd64, "NYI_AMD64: ", $msg)
  };
}

/// [`nyi!`] that only fires when compiling for x86.
#[macro_export]
macro_rules! nyi_x86 {
  ($msg:literal $(,)?) => {
    $crate::__nyi_on!(X86, "NYI_X86: ", $msg)
  };
}

/// [`nyi!`] that only fires when compiling for 32-bit ARM.
#[macro_export]
macro_rules! nyi_arm {
  ($msg:literal $(,)?) => {
    $crate::__nyi_on!(Arm, "NYI_ARM: ", $msg)
  };
}

/// [`nyi!`] that only fires when compiling for ARM64.
#[macro_export]
macro_rules! nyi_arm64 {
  ($msg:literal $(,)?) => {
    $crate::__nyi_on!(Arm64, "NYI_ARM64: ", $msg)
  };
}

/// [`nyi!`] for flat (non-x87) floating point paths.
#[macro_export]
macro_rules! nyi_flat_fp_x87 {
  ($msg:literal $(,)?) => {{
    let site: $crate::error::Site =
      const { $crate::__site!(::std::concat!("NYI: FLAT_FP_X87: ", $msg)) };
    $crate::raise::not_yet_implemented_flat_fp(&site)
  }};
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
