//! jittrap - failure classification and trapping for a JIT compiler backend.
//!
//! Every stage of the compiler signals that compilation of a unit cannot
//! proceed through this crate. A raised failure carries a severity category
//! that decides whether the host abandons the unit, retries it with fewer
//! optimizations, or continues after a suppressed guard.
//!
//! # Quick Start
//!
//! ```
//! use jittrap::error::HostCode;
//! use jittrap::trap::Trap;
//!
//! fn compile(locals: &[u32]) -> u32 {
//!   jittrap::noway_assert!(!locals.is_empty());
//!   locals.iter().sum()
//! }
//!
//! let host = |code: HostCode| eprintln!("compilation failed: {code}");
//!
//! let result: Option<u32> = Trap::new(&host, vec![1, 2, 3]).run(
//!   |locals| Some(compile(locals)),
//!   |context| {
//!     context.report();
//!     None
//!   },
//! );
//!
//! assert_eq!(result, Some(6));
//! ```
//!
//! # Core Modules
//!
//! - [`error`]: Failure categories, payloads and raising macros
//! - [`raise`]: Functions behind the raising macros
//! - [`trap`]: Scopes that claim and recover from failures
//! - [`counters`]: Guard hit counts
//! - [`convert`]: Non-truncating narrowing conversions
//! - [`config`]: Build mode, target and policy configuration
//! - [`init`]: Process-wide initialization
//! - [`consts`]: Host result codes and defaults

mod loom;

pub mod config;
pub mod consts;
pub mod convert;
pub mod counters;
pub mod error;
pub mod init;
pub mod raise;
pub mod trap;
