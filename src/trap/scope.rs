use std::panic;
use std::panic::AssertUnwindSafe;
use std::rc::Rc;
use tracing::Level;
use tracing::Span;
use tracing::span;

use crate::error::Failure;
use crate::trap::HostChannel;
use crate::trap::NowayPolicy;
use crate::trap::TrapContext;
use crate::trap::TrapState;
use crate::trap::filter;
use crate::trap::filter::Payload;
use crate::trap::stack;
use crate::trap::stack::FrameGuard;

/// A scoped region around one unit of compilation work.
///
/// A trap claims failures raised by this crate within the dynamic extent of
/// its body and hands them to a recovery block. Any other unwind (a host
/// fault) passes through untouched.
///
/// # Examples
///
/// ```
/// use jittrap::error::FailureCode;
/// use jittrap::error::HostCode;
/// use jittrap::trap::Trap;
///
/// let host = |code: HostCode| eprintln!("compilation failed: {code}");
///
/// let code: FailureCode = Trap::new(&host, "Program::main").run(
///   |_method| {
///     jittrap::badcode!("invalid opcode");
///   },
///   |context| {
///     context.report();
///     context.code()
///   },
/// );
///
/// assert_eq!(code, FailureCode::BadInput);
/// ```
#[must_use = "a trap does nothing until `run` is called"]
pub struct Trap<'h, P, C = fn(&P)> {
  context: TrapContext<'h, P>,
  policy: Option<Rc<dyn NowayPolicy>>,
  cleanup: Option<C>,
}

impl<'h, P> Trap<'h, P> {
  /// Creates a new trap for the unit described by `param`.
  ///
  /// The failure code starts out as [`FailureCode::Internal`].
  ///
  /// [`FailureCode::Internal`]: crate::error::FailureCode::Internal
  #[inline]
  pub fn new(host: &'h dyn HostChannel, param: P) -> Self {
    Self {
      context: TrapContext::new(host, param),
      policy: None,
      cleanup: None,
    }
  }
}

impl<'h, P, C> Trap<'h, P, C>
where
  C: FnOnce(&P),
{
  /// Installs a suppression policy for failed guards raised in the body.
  ///
  /// The policy also applies to nested scopes that do not install their own.
  #[inline]
  pub fn policy<T>(mut self, policy: T) -> Self
  where
    T: NowayPolicy + 'static,
  {
    self.policy = Some(Rc::new(policy));
    self
  }

  /// Registers a cleanup block that runs exactly once when the scope exits.
  ///
  /// The block runs after the body completes, after the recovery block
  /// returns, and also if the scope is left by unwinding.
  #[inline]
  pub fn finally<F>(self, cleanup: F) -> Trap<'h, P, F>
  where
    F: FnOnce(&P),
  {
    Trap {
      context: self.context,
      policy: self.policy,
      cleanup: Some(cleanup),
    }
  }

  /// Runs `body`, claiming failures raised within it.
  ///
  /// If `body` returns, its value is returned and `recover` is never called.
  /// If a failure is claimed, `recover` runs with the captured context and
  /// its value is returned instead. Failures raised by `recover` itself go to
  /// the enclosing scope.
  pub fn run<T, B, R>(self, body: B, recover: R) -> T
  where
    B: FnOnce(&P) -> T,
    R: FnOnce(&mut TrapContext<'h, P>) -> T,
  {
    let span: Span = span!(target: "jittrap", Level::TRACE, "trap", depth = stack::depth() + 1);
    let _enter: _ = span.enter();

    let mut scope: Scope<'h, P, C> = Scope {
      context: self.context,
      cleanup: self.cleanup,
    };

    let frame: FrameGuard = stack::push(self.policy);
    let param: &P = scope.context.param();
    let result: Result<T, Payload> = panic::catch_unwind(AssertUnwindSafe(|| body(param)));

    drop(frame);

    match result {
      Ok(value) => {
        scope.context.set_state(TrapState::Completed);
        tracing::trace!(target: "jittrap", "completed");
        value
      }
      Err(payload) => match filter::claim(payload) {
        Ok(failure) => scope.recover(failure, recover),
        Err(payload) => {
          tracing::trace!(target: "jittrap", "unclaimed fault");
          panic::resume_unwind(payload)
        }
      },
    }
  }
}

// -----------------------------------------------------------------------------
// Scope
// -----------------------------------------------------------------------------

/// Owns the context of a running trap and runs its cleanup block on drop.
struct Scope<'h, P, C>
where
  C: FnOnce(&P),
{
  context: TrapContext<'h, P>,
  cleanup: Option<C>,
}

impl<'h, P, C> Scope<'h, P, C>
where
  C: FnOnce(&P),
{
  fn recover<T, R>(&mut self, failure: Box<Failure>, recover: R) -> T
  where
    R: FnOnce(&mut TrapContext<'h, P>) -> T,
  {
    tracing::debug!(target: "jittrap", failure = %failure, "failure claimed");

    self.context.claim(failure);
    self.context.set_state(TrapState::Recovering);

    let value: T = recover(&mut self.context);

    self.context.set_state(TrapState::Exited);
    value
  }
}

impl<'h, P, C> Drop for Scope<'h, P, C>
where
  C: FnOnce(&P),
{
  fn drop(&mut self) {
    if let Some(cleanup) = self.cleanup.take() {
      cleanup(self.context.param());
    }
  }
}
