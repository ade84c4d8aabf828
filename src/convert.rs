//! Narrowing conversions that never truncate.

use std::any;
use std::fmt::Debug;
use std::panic::Location;

use crate::counters;
use crate::error::FailureCode;
use crate::error::HostCode;
use crate::error::Site;
use crate::raise;

/// Converts `value` to `Dst`, panicking if it does not fit.
///
/// An out-of-range value is a programming error: the panic is an ordinary
/// one and is never claimed by a trap.
#[inline]
#[track_caller]
pub fn safe_cvt_assert<Dst, Src>(value: Src) -> Dst
where
  Dst: TryFrom<Src>,
  Src: Copy + Debug,
{
  match Dst::try_from(value) {
    Ok(value) => value,
    Err(_) => panic!(
      "assertion failed: {value:?} does not fit in {}",
      any::type_name::<Dst>(),
    ),
  }
}

/// Converts `value` to `Dst`, raising [`ConditionalInvariant`] if it does not
/// fit.
///
/// The check counts as a guard evaluation at the caller's location. Unlike a
/// failed `noway_assert!`, the failure is never suppressed: there is no value
/// to continue with.
///
/// [`ConditionalInvariant`]: FailureCode::ConditionalInvariant
#[inline]
#[track_caller]
pub fn safe_cvt_noway<Dst, Src>(value: Src) -> Dst
where
  Dst: TryFrom<Src>,
  Src: Copy + Debug,
{
  let caller: &'static Location<'static> = Location::caller();
  let site: Site = Site::new(caller.file(), caller.line(), "safe_cvt_noway");

  counters::record(&site);

  match Dst::try_from(value) {
    Ok(value) => value,
    Err(_) => out_of_range::<Dst, Src>(value, &site),
  }
}

#[cold]
fn out_of_range<Dst, Src>(value: Src, site: &Site) -> !
where
  Src: Debug,
{
  raise::raise(
    FailureCode::ConditionalInvariant,
    HostCode::RECOVERABLE_ERROR,
    site,
    || format!("{value:?} does not fit in {}", any::type_name::<Dst>()).into(),
  )
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
