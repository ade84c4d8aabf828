//! Failure classification for the compiler.
//!
//! This module defines the payload carried by every compiler failure and the
//! macros that raise one.
//!
//! # Failure Model
//!
//! A failure is raised by unwinding the current thread with a boxed
//! [`Failure`] and is claimed by the nearest enclosing [`Trap`]. Each failure
//! carries:
//!
//! 1. **Code**: the severity category ([`FailureCode`])
//! 2. **Host code**: the result forwarded to the embedding host ([`HostCode`])
//! 3. **Detail**: site, message and backtrace (diagnostic mode only)
//!
//! # Raising Failures
//!
//! ```
//! fn import(opcode: u8) -> u8 {
//!   if opcode == 0xFF {
//!     jittrap::badcode!("reserved opcode");
//!   }
//!
//!   opcode
//! }
//!
//! assert_eq!(import(0x2A), 0x2A);
//! ```
//!
//! # Categories
//!
//! - [`BadInput`]: the input program is malformed
//! - [`Unsupported`]: valid input the current strategy cannot handle
//! - [`NotYetImplemented`]: a known gap, may be skipped or suppressed
//! - [`ConditionalInvariant`]: a recoverable internal check failed
//! - [`InternalInvariant`]: an unrecoverable internal check failed
//! - [`OutOfMemory`]: allocation failed
//! - [`Fatal`]: an arbitrary host code
//!
//! [`Trap`]: crate::trap::Trap
//! [`BadInput`]: FailureCode::BadInput
//! [`Unsupported`]: FailureCode::Unsupported
//! [`NotYetImplemented`]: FailureCode::NotYetImplemented
//! [`ConditionalInvariant`]: FailureCode::ConditionalInvariant
//! [`InternalInvariant`]: FailureCode::InternalInvariant
//! [`OutOfMemory`]: FailureCode::OutOfMemory
//! [`Fatal`]: FailureCode::Fatal

mod failure;
mod failure_code;
mod host_code;
mod macros;
mod site;

pub use self::failure::Failure;
pub use self::failure_code::FailureCode;
pub use self::host_code::HostCode;
pub use self::site::Site;
