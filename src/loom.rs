#[cfg(not(loom))]
pub(crate) mod export {
  pub(crate) mod sync {
    #[cfg(test)]
    pub(crate) use std::sync::Barrier;

    pub(crate) mod atomic {
      pub(crate) use std::sync::atomic::AtomicU64;
      pub(crate) use std::sync::atomic::Ordering;
    }
  }
}

#[cfg(loom)]
pub(crate) mod export {
  pub(crate) mod sync {
    #[cfg(test)]
    pub(crate) use loom::sync::Barrier;

    pub(crate) mod atomic {
      pub(crate) use loom::sync::atomic::AtomicU64;
      pub(crate) use loom::sync::atomic::Ordering;
    }
  }
}

#[doc(inline)]
pub(crate) use self::export::*;
