//! # Breakwater
//!
//! > *Failures stop at the wall; defects go over it.*
//!
//! A Rust library for converting unstructured failures into explicit
//! success/failure values, with retries, backoff and tagged-error dispatch.
//!
//! ## Philosophy
//!
//! **Breakwater** separates two kinds of failure:
//! - **Expected failures** travel as values in the `Err` channel of an
//!   [`Outcome`] until the caller decides what to do with them.
//! - **Defects** in caller-supplied code (a panicking mapper, a missing tag
//!   handler) are never silently absorbed: they are raised as a [`Panic`] or a
//!   [`NonExhaustiveMatch`].
//!
//! The [`safe`] boundary is where the first kind is collected: it runs an
//! operation, retries it according to a [`RetryConfig`], and turns whatever
//! went wrong into an `Err`.
//!
//! ## Quick Example
//!
//! ```rust
//! use breakwater::{safe_with, Fault, RetryConfig, SafeOptions};
//! use std::time::Duration;
//!
//! fn read_port(raw: &str) -> breakwater::Outcome<u16, String> {
//!     safe_with(
//!         SafeOptions::new(
//!             || raw.parse::<u16>(),
//!             |fault: Fault<_>| format!("invalid port {:?}: {}", raw, fault),
//!         ),
//!         RetryConfig::constant(Duration::ZERO),
//!     )
//! }
//!
//! let port = read_port("8080").map(|p| p + 1);
//! assert_eq!(port.unwrap(), 8081);
//!
//! let text = read_port("http").fold(|p| p.to_string(), |e| e);
//! assert_eq!(text, "invalid port \"http\": invalid digit found in string");
//! ```
//!
//! ## Features
//!
//! - `async` (default): [`safe_async`] and [`safe_async_with`], backed by tokio.
//! - `tracing`: retry and defect logging through `tracing`.
//! - `serde`: `Serialize`/`Deserialize` for [`Outcome`] and the config types.
//! - `proptest`: `Arbitrary` for [`Outcome`].

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod cause;
pub mod ops;
pub mod outcome;
pub mod panic;
pub mod safe;
pub mod tagged;
pub mod testing;

// Re-exports
pub use cause::Cause;
pub use outcome::{err, ok, Outcome, Status};
pub use panic::Panic;
#[cfg(feature = "async")]
pub use safe::{safe_async, safe_async_with};
pub use safe::{
    safe, safe_with, Backoff, Fault, ParseBackoffError, RetryConfig, SafeConfig, SafeOptions,
    UnhandledException,
};
pub use tagged::{
    is_error, is_tagged_error, match_partial, match_tag, try_match_tag, Handlers,
    NonExhaustiveMatch, TaggedError,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cause::Cause;
    pub use crate::ops::Pipe;
    pub use crate::outcome::{err, ok, Outcome, Status};
    pub use crate::panic::Panic;
    #[cfg(feature = "async")]
    pub use crate::safe::{safe_async, safe_async_with};
    pub use crate::safe::{
        safe, safe_with, Backoff, Fault, RetryConfig, SafeConfig, SafeOptions, UnhandledException,
    };
    pub use crate::tagged::{Handlers, NonExhaustiveMatch, TaggedError};
}
