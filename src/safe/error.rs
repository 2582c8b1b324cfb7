//! Failure types produced by the safe boundary.

use std::error::Error as StdError;
use std::fmt;

use crate::cause::Cause;
use crate::tagged::TaggedError;

/// How a single attempt of a wrapped operation failed.
///
/// # Examples
///
/// ```rust
/// use breakwater::{safe, Fault, SafeConfig};
///
/// let outcome = safe(|| Err::<i32, _>("refused"), SafeConfig::default());
///
/// let unhandled = outcome.unwrap_err();
/// assert_eq!(unhandled.fault().failure(), Some(&"refused"));
/// assert!(matches!(unhandled.fault(), Fault::Failed(_)));
/// ```
#[derive(Debug)]
pub enum Fault<E> {
    /// The operation returned an error.
    Failed(E),
    /// The operation panicked.
    Panicked(Cause),
}

impl<E> Fault<E> {
    /// Returns true if the operation returned an error.
    pub fn is_failed(&self) -> bool {
        matches!(self, Fault::Failed(_))
    }

    /// Returns true if the operation panicked.
    pub fn is_panicked(&self) -> bool {
        matches!(self, Fault::Panicked(_))
    }

    /// The returned error, if any.
    pub fn failure(&self) -> Option<&E> {
        match self {
            Fault::Failed(error) => Some(error),
            Fault::Panicked(_) => None,
        }
    }

    /// Extract the returned error, if any.
    pub fn into_failure(self) -> Option<E> {
        match self {
            Fault::Failed(error) => Some(error),
            Fault::Panicked(_) => None,
        }
    }

    /// The panic cause, if the operation panicked.
    pub fn cause(&self) -> Option<&Cause> {
        match self {
            Fault::Failed(_) => None,
            Fault::Panicked(cause) => Some(cause),
        }
    }

    /// Transform the returned error, keeping panics as they are.
    pub fn map<F, M>(self, f: M) -> Fault<F>
    where
        M: FnOnce(E) -> F,
    {
        match self {
            Fault::Failed(error) => Fault::Failed(f(error)),
            Fault::Panicked(cause) => Fault::Panicked(cause),
        }
    }
}

impl<E: fmt::Display> fmt::Display for Fault<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Failed(error) => write!(f, "{}", error),
            Fault::Panicked(cause) => write!(f, "{}", cause),
        }
    }
}

/// A returned error is reported through `Display`; only a panic cause that is
/// itself an error shows up as `source()`. The typed error stays reachable
/// through [`Fault::failure`].
impl<E: fmt::Debug + fmt::Display> StdError for Fault<E> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Fault::Failed(_) => None,
            Fault::Panicked(cause) => cause.as_error(),
        }
    }
}

/// Error value produced by [`safe`](crate::safe) when no `catch` is given.
///
/// Holds the [`Fault`] of the last attempt as its cause.
#[derive(Debug)]
pub struct UnhandledException<E> {
    fault: Fault<E>,
}

impl<E> UnhandledException<E> {
    /// The tag reported by [`TaggedError::tag`].
    pub const TAG: &'static str = "UnhandledException";

    /// Wrap a terminal fault.
    pub fn new(fault: Fault<E>) -> Self {
        Self { fault }
    }

    /// The fault of the last attempt.
    pub fn fault(&self) -> &Fault<E> {
        &self.fault
    }

    /// Extract the fault, discarding the wrapper.
    pub fn into_fault(self) -> Fault<E> {
        self.fault
    }
}

impl<E: fmt::Display> fmt::Display for UnhandledException<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unhandled exception: {}", self.fault)
    }
}

impl<E: fmt::Debug + fmt::Display + 'static> StdError for UnhandledException<E> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.fault)
    }
}

impl<E: fmt::Debug + fmt::Display + 'static> TaggedError for UnhandledException<E> {
    fn tag(&self) -> &str {
        Self::TAG
    }
}
