use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result;

use crate::error::Failure;
use crate::error::FailureCode;
use crate::error::HostCode;
use crate::trap::HostChannel;

// -----------------------------------------------------------------------------
// Trap State
// -----------------------------------------------------------------------------

/// Lifecycle of a single trap scope.
///
/// ```text
/// Entered ─┬─> Completed
///          └─> Claiming ─> Recovering ─> Exited
/// ```
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum TrapState {
  /// The body is running.
  Entered,
  /// The body returned without raising.
  Completed,
  /// The filter matched a failure and is capturing it.
  Claiming,
  /// The recovery block is running.
  Recovering,
  /// The recovery block returned.
  Exited,
}

// -----------------------------------------------------------------------------
// Trap Context
// -----------------------------------------------------------------------------

/// State owned by one trap scope.
///
/// The recovery block of a [`Trap`] receives the context after a failure was
/// claimed. At that point [`code()`] and [`param()`] are exactly what the
/// failure and the caller supplied.
///
/// [`Trap`]: crate::trap::Trap
/// [`code()`]: TrapContext::code
/// [`param()`]: TrapContext::param
pub struct TrapContext<'h, P> {
  code: FailureCode,
  host: &'h dyn HostChannel,
  param: P,
  failure: Option<Box<Failure>>,
  state: TrapState,
}

impl<'h, P> TrapContext<'h, P> {
  #[inline]
  pub(crate) fn new(host: &'h dyn HostChannel, param: P) -> Self {
    Self {
      code: FailureCode::Internal,
      host,
      param,
      failure: None,
      state: TrapState::Entered,
    }
  }

  /// Returns the claimed failure category.
  ///
  /// This is [`FailureCode::Internal`] until a failure is claimed.
  #[inline]
  pub const fn code(&self) -> FailureCode {
    self.code
  }

  /// Returns the code that [`report()`] forwards to the host.
  ///
  /// [`report()`]: Self::report
  #[inline]
  pub fn host_code(&self) -> HostCode {
    match self.failure.as_deref() {
      Some(failure) => failure.host_code(),
      None => self.code.host_code(),
    }
  }

  /// Returns the payload supplied when the scope was entered.
  #[inline]
  pub const fn param(&self) -> &P {
    &self.param
  }

  /// Returns the host reporting channel.
  #[inline]
  pub fn host(&self) -> &'h dyn HostChannel {
    self.host
  }

  /// Returns the captured failure record.
  #[inline]
  pub fn failure(&self) -> Option<&Failure> {
    self.failure.as_deref()
  }

  /// Returns the current lifecycle state.
  #[inline]
  pub const fn state(&self) -> TrapState {
    self.state
  }

  /// Forwards the terminal failure code to the host reporting channel.
  pub fn report(&self) {
    let code: HostCode = self.host_code();

    tracing::debug!(target: "jittrap", code = %self.code, host = %code, "reporting failure");

    self.host.report_fatal_error(code);
  }

  /// Raises the claimed failure again so the next enclosing scope claims it.
  ///
  /// If nothing was claimed (the context was handed out before a failure,
  /// which cannot happen through [`Trap::run`]), a failure with the
  /// current code is raised instead.
  ///
  /// [`Trap::run`]: crate::trap::Trap::run
  pub fn reraise(&mut self) -> ! {
    tracing::trace!(target: "jittrap", code = %self.code, "re-raising failure");

    match self.failure.take() {
      Some(failure) => failure.resume(),
      None => Failure::new(self.code, self.code.host_code()).raise(),
    }
  }

  #[inline]
  pub(crate) fn claim(&mut self, failure: Box<Failure>) {
    self.state = TrapState::Claiming;
    self.code = failure.code();
    self.failure = Some(failure);
  }

  #[inline]
  pub(crate) fn set_state(&mut self, state: TrapState) {
    self.state = state;
  }
}

impl<'h, P> Debug for TrapContext<'h, P>
where
  P: Debug,
{
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.debug_struct("TrapContext")
      .field("code", &self.code)
      .field("param", &self.param)
      .field("failure", &self.failure)
      .field("state", &self.state)
      .finish_non_exhaustive()
  }
}
