//! Defect signalling for misbehaving callbacks.
//!
//! A [`Panic`] means "caller-supplied code broke", as opposed to an expected
//! failure travelling in the `Err` channel of an [`Outcome`](crate::Outcome).
//! Whenever a transformation callback, match handler or `catch` mapper panics,
//! the crate catches the unwind, wraps the original payload as the Panic's
//! [`Cause`], and raises the Panic again. A Panic is never turned into an `Err`.
//!
//! Panics are raised as unwinding panics carrying a `Panic` payload, so they
//! can be recovered at an application boundary with [`catch`]:
//!
//! ```
//! use breakwater::{panic, Outcome};
//!
//! let caught = panic::catch(|| {
//!     Outcome::<i32, String>::ok(1).map(|_| -> i32 { panic!("bad mapper") })
//! });
//!
//! let defect = caught.unwrap_err();
//! assert_eq!(defect.message(), "map failed");
//! assert_eq!(defect.cause().unwrap().to_string(), "bad mapper");
//! ```
//!
//! Guards require the default `panic = "unwind"` strategy; with
//! `panic = "abort"` a panicking callback aborts the process instead.

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;

use crate::cause::Cause;
use crate::tagged::NonExhaustiveMatch;

/// A defect raised by the crate when caller-supplied code misbehaves.
///
/// Panic deliberately does not implement [`TaggedError`](crate::TaggedError):
/// it never takes part in tag dispatch.
#[derive(Debug)]
pub struct Panic {
    message: String,
    cause: Option<Cause>,
}

impl Panic {
    pub(crate) fn new(message: impl Into<String>, cause: Option<Cause>) -> Self {
        Panic {
            message: message.into(),
            cause,
        }
    }

    /// Describes where the defect was detected.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The original raised condition.
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Consume the panic and return its cause.
    pub fn into_cause(self) -> Option<Cause> {
        self.cause
    }

    /// Recover a `Panic` from a payload caught with [`std::panic::catch_unwind`].
    ///
    /// Returns the payload untouched when it is not a `Panic`.
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Result<Self, Box<dyn Any + Send>> {
        payload.downcast::<Panic>().map(|panic| *panic)
    }
}

impl fmt::Display for Panic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panic: {}", self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, " (caused by: {})", cause)?;
        }
        Ok(())
    }
}

impl StdError for Panic {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause.as_ref().and_then(Cause::as_error)
    }
}

/// Returns `true` if a caught panic payload is a [`Panic`].
///
/// # Example
///
/// ```
/// use breakwater::{panic, Outcome};
///
/// let payload = std::panic::catch_unwind(|| {
///     Outcome::<(), &str>::err("missing").unwrap()
/// })
/// .unwrap_err();
///
/// assert!(panic::is_panic(payload.as_ref()));
/// ```
pub fn is_panic(payload: &(dyn Any + Send)) -> bool {
    payload.is::<Panic>()
}

/// Run `f`, returning any [`Panic`] it raises as an `Err`.
///
/// Panics with other payloads (including [`NonExhaustiveMatch`]) keep unwinding.
pub fn catch<T, F>(f: F) -> Result<T, Panic>
where
    F: FnOnce() -> T,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Ok(value),
        Err(payload) => match Panic::from_payload(payload) {
            Ok(defect) => Err(defect),
            Err(other) => panic::resume_unwind(other),
        },
    }
}

/// Raise a Panic.
#[track_caller]
pub(crate) fn raise(defect: Panic) -> ! {
    #[cfg(feature = "tracing")]
    tracing::warn!(panic_message = %defect.message, cause = ?defect.cause, "raising panic");
    panic::panic_any(defect)
}

/// Run a callback, converting anything it raises into a Panic.
pub(crate) fn guard<T, F>(context: &'static str, f: F) -> T
where
    F: FnOnce() -> T,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(payload) => escalate(context, payload),
    }
}

/// Async counterpart of [`guard`]; covers every poll of `fut`.
pub(crate) async fn guard_async<Fut>(context: &'static str, fut: Fut) -> Fut::Output
where
    Fut: Future,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(value) => value,
        Err(payload) => escalate(context, payload),
    }
}

// Defects raised further down keep propagating as they are.
fn escalate(context: &'static str, payload: Box<dyn Any + Send>) -> ! {
    if payload.is::<Panic>() || payload.is::<NonExhaustiveMatch>() {
        panic::resume_unwind(payload)
    }
    raise(Panic::new(context, Some(Cause::from_panic(payload))))
}
