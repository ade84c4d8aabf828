//! Trap scopes: claiming and recovering from compiler failures.
//!
//! A [`Trap`] bounds one unit of compilation work. While its body runs, any
//! [`Failure`] raised on the same thread unwinds to the nearest enclosing
//! trap, which captures it into a [`TrapContext`] and runs a recovery block.
//!
//! # Filtering
//!
//! A trap only claims payloads that are [`Failure`]s carrying the
//! [`FAILURE_SENTINEL`]. Every other unwind, including ordinary panics raised
//! by the embedding host, continues to propagate as if the trap did not
//! exist.
//!
//! # Nesting
//!
//! Traps nest arbitrarily. Each thread has its own stack of active traps, so
//! independent compilation workers never observe each other's failures. A
//! recovery block runs outside its own trap; failures it raises (for example
//! through [`TrapContext::reraise`]) go to the next enclosing trap.
//!
//! # Suppression
//!
//! A trap may install a [`NowayPolicy`]. When a `noway_assert!` guard fails,
//! the innermost installed policy decides whether to raise or to continue.
//!
//! [`Failure`]: crate::error::Failure
//! [`FAILURE_SENTINEL`]: crate::consts::FAILURE_SENTINEL

mod context;
mod filter;
mod scope;
mod stack;

pub use self::context::TrapContext;
pub use self::context::TrapState;
pub use self::filter::is_failure;
pub use self::scope::Trap;

pub(crate) use self::stack::should_raise;

use crate::error::FailureCode;
use crate::error::HostCode;
use crate::error::Site;

// -----------------------------------------------------------------------------
// Host Channel
// -----------------------------------------------------------------------------

/// The embedding host's error-reporting channel.
///
/// A trap borrows the channel for its whole lifetime and forwards the
/// terminal failure code through it when recovery calls
/// [`TrapContext::report`].
pub trait HostChannel {
  /// Receives the terminal result code of a failed compilation.
  fn report_fatal_error(&self, code: HostCode);
}

impl<F> HostChannel for F
where
  F: Fn(HostCode),
{
  #[inline]
  fn report_fatal_error(&self, code: HostCode) {
    self(code)
  }
}

// -----------------------------------------------------------------------------
// Noway Policy
// -----------------------------------------------------------------------------

/// Decides whether a failed guard raises.
///
/// Consulted for [`ConditionalInvariant`] and [`NotYetImplemented`] failures
/// at raise time. Returning `false` lets execution continue after the guard,
/// e.g. to keep generating code when optimizations are already minimal.
///
/// [`ConditionalInvariant`]: FailureCode::ConditionalInvariant
/// [`NotYetImplemented`]: FailureCode::NotYetImplemented
pub trait NowayPolicy {
  fn should_raise(&self, code: FailureCode, site: &Site) -> bool;
}

impl<F> NowayPolicy for F
where
  F: Fn(FailureCode, &Site) -> bool,
{
  #[inline]
  fn should_raise(&self, code: FailureCode, site: &Site) -> bool {
    self(code, site)
  }
}

/// Returns the number of active traps on the calling thread.
#[inline]
pub fn depth() -> usize {
  stack::depth()
}
