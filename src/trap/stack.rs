//! Per-thread stack of active trap scopes.
//!
//! Each compilation worker owns exactly one stack; frames are pushed when a
//! scope starts running its body and popped before its recovery block runs.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::error::FailureCode;
use crate::error::Site;
use crate::trap::NowayPolicy;

thread_local! {
  static FRAMES: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

struct Frame {
  policy: Option<Rc<dyn NowayPolicy>>,
}

/// A guard proving a frame is on top of the calling thread's stack.
///
/// Dropping the guard pops the frame, including during unwinding.
pub(crate) struct FrameGuard {
  depth: usize,
  /// The raw pointer makes the guard !Send and !Sync.
  phantom: PhantomData<*mut ()>,
}

impl Drop for FrameGuard {
  fn drop(&mut self) {
    FRAMES.with_borrow_mut(|frames| {
      debug_assert_eq!(frames.len(), self.depth, "trap frames popped out of order");
      frames.pop();
    });
  }
}

/// Pushes a new frame onto the calling thread's stack.
pub(crate) fn push(policy: Option<Rc<dyn NowayPolicy>>) -> FrameGuard {
  let depth: usize = FRAMES.with_borrow_mut(|frames| {
    frames.push(Frame { policy });
    frames.len()
  });

  FrameGuard {
    depth,
    phantom: PhantomData,
  }
}

/// Returns the number of active frames on the calling thread.
pub(crate) fn depth() -> usize {
  FRAMES.with_borrow(Vec::len)
}

/// Asks the innermost frame with a suppression policy whether a failed guard
/// should raise.
///
/// Raises if no active frame installed a policy.
pub(crate) fn should_raise(code: FailureCode, site: &Site) -> bool {
  let policy: Option<Rc<dyn NowayPolicy>> = FRAMES.with_borrow(|frames| {
    frames
      .iter()
      .rev()
      .find_map(|frame| frame.policy.as_ref().map(Rc::clone))
  });

  // The stack is not borrowed here; the policy may itself enter a scope.
  match policy {
    Some(policy) => policy.should_raise(code, site),
    None => true,
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
