//! The dynamic value behind a raised condition.
//!
//! Rust code fails in two ways: by returning an error, or by panicking with an
//! arbitrary payload. [`Cause`] gives both a single inspectable shape so that
//! [`Panic`](crate::Panic) and [`Fault`](crate::Fault) can keep the original
//! condition around for diagnosis.
//!
//! A cause is one of:
//!
//! - a [`TaggedError`] (participates in tag inspection),
//! - any other [`std::error::Error`],
//! - an arbitrary non-error value, kept together with its `Debug` rendering.
//!
//! # Examples
//!
//! ```
//! use breakwater::Cause;
//!
//! let cause = Cause::value(404u16);
//! assert!(!cause.is_error());
//! assert_eq!(cause.downcast_value::<u16>(), Some(&404));
//! assert_eq!(cause.to_string(), "404");
//! ```

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;

use crate::panic::Panic;
use crate::tagged::{NonExhaustiveMatch, TaggedError};

/// The original condition behind a panic or failed attempt.
///
/// Each cause owns its value, and errors reach further back only through
/// [`std::error::Error::source`], so a chain of causes cannot loop.
pub enum Cause {
    /// A tagged domain error.
    Tagged(Box<dyn TaggedError + Send>),
    /// An error without a tag.
    Error(Box<dyn StdError + Send>),
    /// A value that is not an error, such as a panic message.
    Value {
        /// `Debug` (or message) rendering of the value.
        repr: String,
        /// The value itself.
        value: Box<dyn Any + Send>,
    },
}

impl Cause {
    /// Wrap a tagged error.
    pub fn tagged<E>(error: E) -> Self
    where
        E: TaggedError + Send + 'static,
    {
        Cause::Tagged(Box::new(error))
    }

    /// Wrap an error that carries no tag.
    pub fn error<E>(error: E) -> Self
    where
        E: StdError + Send + 'static,
    {
        Cause::Error(Box::new(error))
    }

    /// Wrap a non-error value, remembering its `Debug` rendering.
    ///
    /// # Example
    ///
    /// ```
    /// use breakwater::Cause;
    ///
    /// let cause = Cause::value(vec![1, 2]);
    /// assert_eq!(cause.to_string(), "[1, 2]");
    /// ```
    pub fn value<T>(value: T) -> Self
    where
        T: Any + Send + fmt::Debug,
    {
        Cause::Value {
            repr: format!("{:?}", value),
            value: Box::new(value),
        }
    }

    /// Build a cause from a payload caught with [`std::panic::catch_unwind`].
    ///
    /// String payloads (what `panic!("...")` produces) keep their message.
    /// The crate's own defect types stay inspectable as errors.
    ///
    /// # Example
    ///
    /// ```
    /// use breakwater::Cause;
    ///
    /// let payload = std::panic::catch_unwind(|| panic!("boom")).unwrap_err();
    /// let cause = Cause::from_panic(payload);
    /// assert_eq!(cause.to_string(), "boom");
    /// assert_eq!(cause.downcast_value::<&'static str>(), Some(&"boom"));
    /// ```
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<Cause>() {
            Ok(cause) => return *cause,
            Err(other) => other,
        };
        let payload = match payload.downcast::<Panic>() {
            Ok(panic) => return Cause::Error(panic),
            Err(other) => other,
        };
        let payload = match payload.downcast::<NonExhaustiveMatch>() {
            Ok(defect) => return Cause::Error(defect),
            Err(other) => other,
        };
        let payload = match payload.downcast::<String>() {
            Ok(message) => {
                return Cause::Value {
                    repr: (*message).clone(),
                    value: message,
                }
            }
            Err(other) => other,
        };
        match payload.downcast::<&'static str>() {
            Ok(message) => Cause::Value {
                repr: (*message).to_string(),
                value: message,
            },
            Err(other) => Cause::Value {
                repr: "Box<dyn Any>".to_string(),
                value: other,
            },
        }
    }

    /// Returns `true` if the cause is an error (tagged or not).
    pub fn is_error(&self) -> bool {
        !matches!(self, Cause::Value { .. })
    }

    /// Returns `true` if the cause is a tagged error.
    pub fn is_tagged(&self) -> bool {
        matches!(self, Cause::Tagged(_))
    }

    /// The tag of a tagged cause.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Cause::Tagged(error) => Some(error.tag()),
            _ => None,
        }
    }

    /// View the cause as an error, if it is one.
    pub fn as_error(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Cause::Tagged(error) => {
                let error: &(dyn StdError + 'static) = &**error;
                Some(error)
            }
            Cause::Error(error) => Some(&**error),
            Cause::Value { .. } => None,
        }
    }

    /// Borrow a non-error value of type `T`.
    pub fn downcast_value<T: Any>(&self) -> Option<&T> {
        match self {
            Cause::Value { value, .. } => value.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Borrow an error value of concrete type `T`.
    ///
    /// # Example
    ///
    /// ```
    /// use breakwater::Cause;
    /// use std::io;
    ///
    /// let cause = Cause::error(io::Error::new(io::ErrorKind::NotFound, "missing"));
    /// let io_err = cause.downcast_error::<io::Error>().unwrap();
    /// assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
    /// ```
    pub fn downcast_error<T: StdError + 'static>(&self) -> Option<&T> {
        self.as_error()?.downcast_ref::<T>()
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Tagged(error) => write!(f, "{}", error),
            Cause::Error(error) => write!(f, "{}", error),
            Cause::Value { repr, .. } => f.write_str(repr),
        }
    }
}

impl fmt::Debug for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Tagged(error) => f.debug_tuple("Tagged").field(error).finish(),
            Cause::Error(error) => f.debug_tuple("Error").field(error).finish(),
            Cause::Value { repr, .. } => f
                .debug_struct("Value")
                .field("repr", repr)
                .finish_non_exhaustive(),
        }
    }
}

impl From<Panic> for Cause {
    fn from(panic: Panic) -> Self {
        Cause::Error(Box::new(panic))
    }
}

impl From<NonExhaustiveMatch> for Cause {
    fn from(defect: NonExhaustiveMatch) -> Self {
        Cause::Error(Box::new(defect))
    }
}

impl From<String> for Cause {
    fn from(message: String) -> Self {
        Cause::Value {
            repr: message.clone(),
            value: Box::new(message),
        }
    }
}

impl From<&'static str> for Cause {
    fn from(message: &'static str) -> Self {
        Cause::Value {
            repr: message.to_string(),
            value: Box::new(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic;

    #[derive(Debug)]
    struct Timeout;

    impl fmt::Display for Timeout {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "timed out")
        }
    }

    impl StdError for Timeout {}

    impl TaggedError for Timeout {
        fn tag(&self) -> &str {
            "Timeout"
        }
    }

    #[test]
    fn test_tagged_cause_is_error_and_tagged() {
        let cause = Cause::tagged(Timeout);
        assert!(cause.is_error());
        assert!(cause.is_tagged());
        assert_eq!(cause.tag(), Some("Timeout"));
        assert_eq!(cause.to_string(), "timed out");
        assert!(cause.downcast_error::<Timeout>().is_some());
    }

    #[test]
    fn test_plain_error_cause_has_no_tag() {
        let cause = Cause::error(Timeout);
        assert!(cause.is_error());
        assert!(!cause.is_tagged());
        assert_eq!(cause.tag(), None);
    }

    #[test]
    fn test_value_cause_keeps_debug_repr() {
        let cause = Cause::value(("user", 7));
        assert!(!cause.is_error());
        assert_eq!(cause.to_string(), "(\"user\", 7)");
        assert_eq!(cause.downcast_value::<(&'static str, i32)>(), Some(&("user", 7)));
        assert!(cause.as_error().is_none());
    }

    #[test]
    fn test_from_panic_with_formatted_message() {
        let payload = panic::catch_unwind(|| {
            let id = 42;
            panic!("lookup {} failed", id);
        })
        .unwrap_err();

        let cause = Cause::from_panic(payload);
        assert_eq!(cause.to_string(), "lookup 42 failed");
        assert_eq!(
            cause.downcast_value::<String>().map(String::as_str),
            Some("lookup 42 failed")
        );
    }

    #[test]
    fn test_from_panic_with_opaque_payload() {
        let payload = panic::catch_unwind(|| panic::panic_any(17u8)).unwrap_err();
        let cause = Cause::from_panic(payload);
        assert_eq!(cause.to_string(), "Box<dyn Any>");
        assert_eq!(cause.downcast_value::<u8>(), Some(&17));
    }

    #[test]
    fn test_from_panic_unwraps_cause_payload() {
        let payload =
            panic::catch_unwind(|| panic::panic_any(Cause::tagged(Timeout))).unwrap_err();
        let cause = Cause::from_panic(payload);
        assert_eq!(cause.tag(), Some("Timeout"));
    }

    #[test]
    fn test_debug_format() {
        let debug = format!("{:?}", Cause::value("boom"));
        assert!(debug.contains("Value"));
        assert!(debug.contains("boom"));
    }
}
