use std::any::Any;

use crate::consts::FAILURE_SENTINEL;
use crate::error::Failure;

/// Dynamically typed unwinding payload.
pub(crate) type Payload = Box<dyn Any + Send + 'static>;

/// Claims `payload` if it is a failure raised by this crate.
///
/// Any other payload is handed back unchanged so it can continue unwinding.
/// A [`Failure`] whose sentinel is not [`FAILURE_SENTINEL`] is treated as
/// foreign and handed back too; every constructor stamps the sentinel, so
/// this only happens for a payload that was not produced by a raiser.
pub(crate) fn claim(payload: Payload) -> Result<Box<Failure>, Payload> {
  match payload.downcast::<Failure>() {
    Ok(failure) if failure.sentinel() == FAILURE_SENTINEL => Ok(failure),
    Ok(failure) => Err(failure as Payload),
    Err(payload) => Err(payload),
  }
}

/// Returns `true` if `payload` is a failure raised by this crate.
///
/// Hosts that catch unwinds themselves can use this to tell compiler
/// failures apart from their own faults.
pub fn is_failure(payload: &(dyn Any + Send)) -> bool {
  payload
    .downcast_ref::<Failure>()
    .is_some_and(|failure| failure.sentinel() == FAILURE_SENTINEL)
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::error::Failure;
  use crate::error::FailureCode;
  use crate::error::HostCode;
  use crate::trap::filter;
  use crate::trap::filter::Payload;

  #[test]
  fn test_claim_failure() {
    let payload: Payload = Box::new(Failure::new(FailureCode::BadInput, HostCode::BAD_CODE));

    assert!(filter::is_failure(&*payload));

    let failure: Box<Failure> = filter::claim(payload).unwrap();
    assert_eq!(failure.code(), FailureCode::BadInput);
  }

  #[test]
  fn test_reject_host_fault() {
    let payload: Payload = Box::new("host fault");

    assert!(!filter::is_failure(&*payload));

    let payload: Payload = filter::claim(payload).unwrap_err();
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"host fault"));
  }

  #[test]
  fn test_reject_foreign_sentinel() {
    let failure: Failure = Failure::new(FailureCode::BadInput, HostCode::BAD_CODE);
    let payload: Payload = Box::new(failure.with_sentinel(0x0BAD_F00D));

    assert!(!filter::is_failure(&*payload));

    let payload: Payload = filter::claim(payload).unwrap_err();
    let failure: &Failure = payload.downcast_ref::<Failure>().unwrap();

    assert_eq!(failure.sentinel(), 0x0BAD_F00D);
    assert_eq!(failure.code(), FailureCode::BadInput);
  }

  #[test]
  fn test_reject_host_code() {
    // A bare host code is not a failure record, even if it matches one.
    let payload: Payload = Box::new(HostCode::INTERNAL_ERROR);

    assert!(filter::claim(payload).is_err());
  }
}
