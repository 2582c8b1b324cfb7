//! Tagged errors and dispatch by tag.
//!
//! A tagged error carries a stable string discriminant next to its message.
//! Applications usually model their failures as one enum per domain and return
//! one tag per variant:
//!
//! ```
//! use breakwater::tagged::{self, Handlers, TaggedError};
//! use std::fmt;
//!
//! #[derive(Debug)]
//! enum RepoError {
//!     NotFound(String),
//!     Invalid { field: String },
//! }
//!
//! impl fmt::Display for RepoError {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         match self {
//!             RepoError::NotFound(id) => write!(f, "Not found: {}", id),
//!             RepoError::Invalid { field } => write!(f, "Invalid field: {}", field),
//!         }
//!     }
//! }
//!
//! impl std::error::Error for RepoError {}
//!
//! impl TaggedError for RepoError {
//!     fn tag(&self) -> &str {
//!         match self {
//!             RepoError::NotFound(_) => "NotFoundError",
//!             RepoError::Invalid { .. } => "ValidationError",
//!         }
//!     }
//! }
//!
//! let status = tagged::match_tag(
//!     RepoError::NotFound("42".into()),
//!     Handlers::new()
//!         .on("NotFoundError", |_| 404)
//!         .on("ValidationError", |_| 422),
//! );
//! assert_eq!(status, 404);
//! ```
//!
//! [`match_tag`] treats a missing handler as a programming defect and raises a
//! [`NonExhaustiveMatch`]; [`match_partial`] falls back to an `otherwise`
//! handler instead. Handlers that panic are converted into a
//! [`Panic`](crate::Panic).

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;

use crate::cause::Cause;
use crate::outcome::Outcome;
use crate::panic::guard;

/// A failure value with a stable discriminant.
///
/// The optional upstream cause is exposed through
/// [`std::error::Error::source`].
pub trait TaggedError: StdError {
    /// Stable, unique identifier of the error kind, e.g. `"NotFoundError"`.
    fn tag(&self) -> &str;

    /// Human-readable description. Defaults to the `Display` output.
    fn message(&self) -> String {
        self.to_string()
    }
}

/// Returns `true` if the cause behaves as an error value.
pub fn is_error(value: &Cause) -> bool {
    value.is_error()
}

/// Returns `true` if the cause additionally exposes a tag and message.
///
/// # Example
///
/// ```
/// use breakwater::{tagged, Cause};
///
/// assert!(!tagged::is_tagged_error(&Cause::from("plain message")));
/// ```
pub fn is_tagged_error(value: &Cause) -> bool {
    value.is_tagged()
}

type Handler<'a, E, B> = Box<dyn FnOnce(E) -> B + 'a>;

/// Handlers keyed by error tag.
///
/// Registering a second handler for the same tag replaces the first.
pub struct Handlers<'a, E, B> {
    by_tag: BTreeMap<String, Handler<'a, E, B>>,
}

impl<'a, E, B> Handlers<'a, E, B> {
    /// Create an empty handler set.
    pub fn new() -> Self {
        Handlers {
            by_tag: BTreeMap::new(),
        }
    }

    /// Register `handler` for errors tagged `tag`.
    pub fn on<F>(mut self, tag: impl Into<String>, handler: F) -> Self
    where
        F: FnOnce(E) -> B + 'a,
    {
        self.by_tag.insert(tag.into(), Box::new(handler));
        self
    }

    /// Returns `true` if a handler is registered for `tag`.
    pub fn contains(&self, tag: &str) -> bool {
        self.by_tag.contains_key(tag)
    }

    /// Registered tags, in sorted order.
    pub fn tags(&self) -> Vec<String> {
        self.by_tag.keys().cloned().collect()
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    /// Returns `true` if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }

    fn take(&mut self, tag: &str) -> Option<Handler<'a, E, B>> {
        self.by_tag.remove(tag)
    }
}

impl<E, B> Default for Handlers<'_, E, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, B> fmt::Debug for Handlers<'_, E, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("tags", &self.by_tag.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Raised when an exhaustive match has no handler for the error's tag.
///
/// This is a defect in the calling code, distinct both from a
/// [`Panic`](crate::Panic) and from an expected `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonExhaustiveMatch {
    tag: String,
    handled: Vec<String>,
}

impl NonExhaustiveMatch {
    pub(crate) fn new(tag: impl Into<String>, handled: Vec<String>) -> Self {
        NonExhaustiveMatch {
            tag: tag.into(),
            handled,
        }
    }

    /// The tag that had no handler.
    pub fn missing_tag(&self) -> &str {
        &self.tag
    }

    /// The tags that did have handlers.
    pub fn handled_tags(&self) -> &[String] {
        &self.handled
    }
}

impl fmt::Display for NonExhaustiveMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no handler for error tag: {}", self.tag)
    }
}

impl StdError for NonExhaustiveMatch {}

/// Dispatch `error` to the handler registered for its tag.
///
/// # Panics
///
/// Raises a [`NonExhaustiveMatch`] payload when no handler is registered for
/// the tag, and a [`Panic`](crate::Panic) when the handler itself panics.
pub fn match_tag<E, B>(error: E, handlers: Handlers<'_, E, B>) -> B
where
    E: TaggedError,
{
    match try_match_tag(error, handlers) {
        Ok(value) => value,
        Err(defect) => {
            #[cfg(feature = "tracing")]
            tracing::error!(
                tag = %defect.tag,
                handled = ?defect.handled,
                "non-exhaustive tagged error match"
            );
            std::panic::panic_any(defect)
        }
    }
}

/// Like [`match_tag`], but reports a missing handler as an `Err`.
///
/// # Example
///
/// ```
/// use breakwater::tagged::{self, Handlers, TaggedError};
/// use std::fmt;
///
/// #[derive(Debug)]
/// struct Conflict;
///
/// impl fmt::Display for Conflict {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "conflict")
///     }
/// }
///
/// impl std::error::Error for Conflict {}
///
/// impl TaggedError for Conflict {
///     fn tag(&self) -> &str {
///         "Conflict"
///     }
/// }
///
/// let missing = tagged::try_match_tag(Conflict, Handlers::new().on("Other", |_| ()));
/// assert_eq!(missing.unwrap_err().missing_tag(), "Conflict");
/// ```
pub fn try_match_tag<E, B>(
    error: E,
    mut handlers: Handlers<'_, E, B>,
) -> Result<B, NonExhaustiveMatch>
where
    E: TaggedError,
{
    let tag = error.tag().to_owned();
    match handlers.take(&tag) {
        Some(handler) => Ok(guard("tagged match handler failed", move || handler(error))),
        None => Err(NonExhaustiveMatch::new(tag, handlers.tags())),
    }
}

/// Dispatch `error` by tag, falling back to `otherwise` for unknown tags.
///
/// Never raises for a missing tag. Handlers (including `otherwise`) that
/// panic are converted into a [`Panic`](crate::Panic).
pub fn match_partial<E, B, O>(error: E, mut handlers: Handlers<'_, E, B>, otherwise: O) -> B
where
    E: TaggedError,
    O: FnOnce(E) -> B,
{
    let handler = handlers.take(error.tag());
    guard("tagged match handler failed", move || match handler {
        Some(handler) => handler(error),
        None => otherwise(error),
    })
}

impl<A, E: TaggedError> Outcome<A, E> {
    /// Dispatch the error channel by tag; `Ok` values pass through.
    ///
    /// # Panics
    ///
    /// Same as [`match_tag`].
    pub fn match_err<F>(self, handlers: Handlers<'_, E, Outcome<A, F>>) -> Outcome<A, F> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(value),
            Outcome::Err(error) => match_tag(error, handlers),
        }
    }

    /// Dispatch the error channel by tag with a fallback; `Ok` values pass through.
    pub fn match_err_partial<F, O>(
        self,
        handlers: Handlers<'_, E, Outcome<A, F>>,
        otherwise: O,
    ) -> Outcome<A, F>
    where
        O: FnOnce(E) -> Outcome<A, F>,
    {
        match self {
            Outcome::Ok(value) => Outcome::Ok(value),
            Outcome::Err(error) => match_partial(error, handlers, otherwise),
        }
    }
}
