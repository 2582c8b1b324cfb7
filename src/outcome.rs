//! A success/failure container whose transformations never swallow defects.
//!
//! # Outcome vs Result
//!
//! `Outcome<A, E>` carries the same two variants as `std::result::Result`, but
//! its combinators guard the callbacks they run: if a callback passed to
//! [`map`](Outcome::map), [`and_then`](Outcome::and_then), [`tap`](Outcome::tap)
//! or [`fold`](Outcome::fold) panics, the panic is converted into a
//! [`Panic`](crate::Panic) carrying the original payload and raised again. A
//! broken callback can therefore never be mistaken for an ordinary `Err`.
//!
//! Expected failures stay in the `Err` channel until an explicit
//! [`unwrap`](Outcome::unwrap) or [`unwrap_err`](Outcome::unwrap_err).
//!
//! # Examples
//!
//! ```rust
//! use breakwater::Outcome;
//!
//! fn parse_port(raw: &str) -> Outcome<u16, String> {
//!     raw.parse::<u16>().map_err(|e| e.to_string()).into()
//! }
//!
//! let port = parse_port("8080")
//!     .map(|p| p + 1)
//!     .and_then(|p| if p > 1024 { Outcome::ok(p) } else { Outcome::err("reserved".into()) });
//!
//! assert_eq!(port, Outcome::ok(8081));
//! assert!(parse_port("http").is_err());
//! ```

use std::fmt;
use std::future::Future;

use crate::cause::Cause;
use crate::panic::{guard, guard_async, raise, Panic};
use crate::tagged::TaggedError;

/// The variant of an [`Outcome`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Status {
    /// The outcome holds a success value.
    Ok,
    /// The outcome holds an error value.
    Err,
}

impl Status {
    /// `"ok"` or `"err"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::Err => "err",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Either a success value `Ok(A)` or an error value `Err(E)`.
///
/// With the `serde` feature an outcome serializes as
/// `{"status": "ok", "value": ...}` or `{"status": "err", "value": ...}`.
///
/// # Example
///
/// ```rust
/// use breakwater::{Outcome, Status};
///
/// let ok: Outcome<i32, String> = Outcome::ok(42);
/// let err: Outcome<i32, String> = Outcome::err("boom".to_string());
///
/// assert_eq!(ok.status(), Status::Ok);
/// assert_eq!(err.status().to_string(), "err");
/// assert_eq!(ok.unwrap_or(0), 42);
/// assert_eq!(err.unwrap_or(0), 0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "status", content = "value", rename_all = "lowercase")
)]
pub enum Outcome<A, E> {
    /// Success value.
    Ok(A),
    /// Error value.
    Err(E),
}

/// Shorthand for [`Outcome::ok`].
#[inline]
pub fn ok<A, E>(value: A) -> Outcome<A, E> {
    Outcome::Ok(value)
}

/// Shorthand for [`Outcome::err`].
#[inline]
pub fn err<A, E>(error: E) -> Outcome<A, E> {
    Outcome::Err(error)
}

impl<A, E> Outcome<A, E> {
    // ========== Constructors ==========

    /// Create a success outcome.
    #[inline]
    pub fn ok(value: A) -> Self {
        Outcome::Ok(value)
    }

    /// Create an error outcome.
    #[inline]
    pub fn err(error: E) -> Self {
        Outcome::Err(error)
    }

    /// Convert a `std::result::Result`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use breakwater::Outcome;
    ///
    /// let outcome = Outcome::from_result("12".parse::<i32>());
    /// assert_eq!(outcome.unwrap(), 12);
    /// ```
    #[inline]
    pub fn from_result(result: Result<A, E>) -> Self {
        match result {
            Ok(value) => Outcome::Ok(value),
            Err(error) => Outcome::Err(error),
        }
    }

    // ========== Predicates ==========

    /// Which variant this is.
    #[inline]
    pub fn status(&self) -> Status {
        match self {
            Outcome::Ok(_) => Status::Ok,
            Outcome::Err(_) => Status::Err,
        }
    }

    /// Returns `true` for `Ok`.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.status() == Status::Ok
    }

    /// Returns `true` for `Err`.
    #[inline]
    pub fn is_err(&self) -> bool {
        self.status() == Status::Err
    }

    // ========== Extractors ==========

    /// The success value, if any.
    #[inline]
    pub fn ok_value(self) -> Option<A> {
        match self {
            Outcome::Ok(value) => Some(value),
            Outcome::Err(_) => None,
        }
    }

    /// The error value, if any.
    #[inline]
    pub fn err_value(self) -> Option<E> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::Err(error) => Some(error),
        }
    }

    /// Convert to `Outcome<&A, &E>`.
    #[inline]
    pub fn as_ref(&self) -> Outcome<&A, &E> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(value),
            Outcome::Err(error) => Outcome::Err(error),
        }
    }

    /// Convert into a `std::result::Result`, e.g. to use `?`.
    #[inline]
    pub fn into_result(self) -> Result<A, E> {
        match self {
            Outcome::Ok(value) => Ok(value),
            Outcome::Err(error) => Err(error),
        }
    }

    /// The success value, or `fallback`. Never raises.
    #[inline]
    pub fn unwrap_or(self, fallback: A) -> A {
        match self {
            Outcome::Ok(value) => value,
            Outcome::Err(_) => fallback,
        }
    }

    /// The success value, or one computed from the error.
    ///
    /// # Panics
    ///
    /// Raises a [`Panic`] if `f` panics.
    pub fn unwrap_or_else<F>(self, f: F) -> A
    where
        F: FnOnce(E) -> A,
    {
        match self {
            Outcome::Ok(value) => value,
            Outcome::Err(error) => guard("unwrap_or_else failed", move || f(error)),
        }
    }

    /// The success value.
    ///
    /// # Panics
    ///
    /// Raises a [`Panic`] on `Err`. The error value is attached as an opaque
    /// [`Cause::Value`] and can be recovered with [`Cause::downcast_value`].
    /// The cause is not treated as an error even when `E` is one; use
    /// [`unwrap_error`](Self::unwrap_error) or
    /// [`unwrap_tagged`](Self::unwrap_tagged) to keep it inspectable through
    /// [`Error::source`](std::error::Error::source).
    ///
    /// # Example
    ///
    /// ```rust
    /// use breakwater::{panic, Outcome};
    ///
    /// let defect = panic::catch(|| Outcome::<i32, &str>::err("gone").unwrap()).unwrap_err();
    /// assert_eq!(defect.message(), "called unwrap on Err: \"gone\"");
    /// assert_eq!(defect.cause().unwrap().downcast_value::<&'static str>(), Some(&"gone"));
    /// ```
    #[track_caller]
    pub fn unwrap(self) -> A
    where
        E: fmt::Debug + Send + 'static,
    {
        match self {
            Outcome::Ok(value) => value,
            Outcome::Err(error) => {
                let message = format!("called unwrap on Err: {:?}", error);
                raise(Panic::new(message, Some(Cause::value(error))))
            }
        }
    }

    /// The success value, raising with `message` on `Err`.
    ///
    /// # Panics
    ///
    /// Raises a [`Panic`] whose message is `message` and whose cause is the
    /// error value.
    #[track_caller]
    pub fn expect(self, message: &str) -> A
    where
        E: fmt::Debug + Send + 'static,
    {
        match self {
            Outcome::Ok(value) => value,
            Outcome::Err(error) => raise(Panic::new(message, Some(Cause::value(error)))),
        }
    }

    /// Like [`unwrap`](Self::unwrap), but attaches the error as a
    /// [`Cause::Error`], so the raised panic's `source()` is the error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use breakwater::{panic, Outcome};
    /// use std::error::Error;
    /// use std::io;
    ///
    /// let outcome = Outcome::<u8, _>::err(io::Error::new(io::ErrorKind::NotFound, "no such file"));
    /// let defect = panic::catch(|| outcome.unwrap_error()).unwrap_err();
    ///
    /// assert_eq!(defect.source().unwrap().to_string(), "no such file");
    /// ```
    #[track_caller]
    pub fn unwrap_error(self) -> A
    where
        E: std::error::Error + Send + 'static,
    {
        match self {
            Outcome::Ok(value) => value,
            Outcome::Err(error) => {
                let message = format!("called unwrap on Err: {:?}", error);
                raise(Panic::new(message, Some(Cause::error(error))))
            }
        }
    }

    /// Like [`unwrap`](Self::unwrap), but attaches the error as a
    /// [`Cause::Tagged`], keeping its tag visible on the raised panic.
    #[track_caller]
    pub fn unwrap_tagged(self) -> A
    where
        E: TaggedError + Send + 'static,
    {
        match self {
            Outcome::Ok(value) => value,
            Outcome::Err(error) => {
                let message = format!("called unwrap on Err: {:?}", error);
                raise(Panic::new(message, Some(Cause::tagged(error))))
            }
        }
    }

    /// The error value.
    ///
    /// # Panics
    ///
    /// Raises a [`Panic`] on `Ok`, with the success value as cause.
    #[track_caller]
    pub fn unwrap_err(self) -> E
    where
        A: fmt::Debug + Send + 'static,
    {
        match self {
            Outcome::Ok(value) => {
                let message = format!("called unwrap_err on Ok: {:?}", value);
                raise(Panic::new(message, Some(Cause::value(value))))
            }
            Outcome::Err(error) => error,
        }
    }

    /// The error value, raising with `message` on `Ok`.
    ///
    /// # Panics
    ///
    /// Raises a [`Panic`] whose message is `message` and whose cause is the
    /// success value.
    #[track_caller]
    pub fn expect_err(self, message: &str) -> E
    where
        A: fmt::Debug + Send + 'static,
    {
        match self {
            Outcome::Ok(value) => raise(Panic::new(message, Some(Cause::value(value)))),
            Outcome::Err(error) => error,
        }
    }

    // ========== Transformations ==========

    /// Transform the success value; errors pass through untouched.
    ///
    /// # Panics
    ///
    /// Raises a [`Panic`] (message `"map failed"`) if `f` panics.
    ///
    /// # Example
    ///
    /// ```rust
    /// use breakwater::Outcome;
    ///
    /// let ok: Outcome<i32, &str> = Outcome::ok(21);
    /// let err: Outcome<i32, &str> = Outcome::err("nope");
    ///
    /// assert_eq!(ok.map(|x| x * 2), Outcome::ok(42));
    /// assert_eq!(err.map(|x| x * 2), Outcome::err("nope"));
    /// ```
    #[inline]
    pub fn map<B, F>(self, f: F) -> Outcome<B, E>
    where
        F: FnOnce(A) -> B,
    {
        match self {
            Outcome::Ok(value) => Outcome::Ok(guard("map failed", move || f(value))),
            Outcome::Err(error) => Outcome::Err(error),
        }
    }

    /// Transform the error value; successes pass through untouched.
    ///
    /// # Panics
    ///
    /// Raises a [`Panic`] (message `"map_err failed"`) if `f` panics.
    #[inline]
    pub fn map_err<F2, F>(self, f: F) -> Outcome<A, F2>
    where
        F: FnOnce(E) -> F2,
    {
        match self {
            Outcome::Ok(value) => Outcome::Ok(value),
            Outcome::Err(error) => Outcome::Err(guard("map_err failed", move || f(error))),
        }
    }

    /// Chain a computation that may itself fail.
    ///
    /// `f` is never invoked on `Err`.
    ///
    /// # Panics
    ///
    /// Raises a [`Panic`] (message `"and_then failed"`) if `f` panics.
    ///
    /// # Example
    ///
    /// ```rust
    /// use breakwater::Outcome;
    ///
    /// let half = |x: i32| if x % 2 == 0 { Outcome::ok(x / 2) } else { Outcome::err("odd") };
    ///
    /// assert_eq!(Outcome::ok(8).and_then(half).and_then(half), Outcome::ok(2));
    /// assert_eq!(Outcome::ok(6).and_then(half).and_then(half), Outcome::err("odd"));
    /// ```
    #[inline]
    pub fn and_then<B, F>(self, f: F) -> Outcome<B, E>
    where
        F: FnOnce(A) -> Outcome<B, E>,
    {
        match self {
            Outcome::Ok(value) => guard("and_then failed", move || f(value)),
            Outcome::Err(error) => Outcome::Err(error),
        }
    }

    /// Run a side effect on the success value and return `self` unchanged.
    ///
    /// # Panics
    ///
    /// Raises a [`Panic`] (message `"tap failed"`) if `f` panics.
    #[inline]
    pub fn tap<F>(self, f: F) -> Self
    where
        F: FnOnce(&A),
    {
        if let Outcome::Ok(value) = &self {
            guard("tap failed", move || f(value));
        }
        self
    }

    /// Run a side effect on the error value and return `self` unchanged.
    ///
    /// # Panics
    ///
    /// Raises a [`Panic`] (message `"tap_err failed"`) if `f` panics.
    #[inline]
    pub fn tap_err<F>(self, f: F) -> Self
    where
        F: FnOnce(&E),
    {
        if let Outcome::Err(error) = &self {
            guard("tap_err failed", move || f(error));
        }
        self
    }

    // ========== Folding ==========

    /// Consume the outcome with exactly one of two handlers.
    ///
    /// # Panics
    ///
    /// Raises a [`Panic`] (message `"match failed"`) if the invoked handler
    /// panics; a degraded value is never returned.
    ///
    /// # Example
    ///
    /// ```rust
    /// use breakwater::Outcome;
    ///
    /// let ok: Outcome<i32, &str> = Outcome::ok(3);
    /// let text = ok.fold(|n| format!("got {}", n), |e| format!("failed: {}", e));
    /// assert_eq!(text, "got 3");
    /// ```
    #[doc(alias = "match")]
    pub fn fold<B, OkF, ErrF>(self, on_ok: OkF, on_err: ErrF) -> B
    where
        OkF: FnOnce(A) -> B,
        ErrF: FnOnce(E) -> B,
    {
        guard("match failed", move || match self {
            Outcome::Ok(value) => on_ok(value),
            Outcome::Err(error) => on_err(error),
        })
    }

    // ========== Async ==========

    /// Async [`and_then`](Outcome::and_then).
    ///
    /// `f` is invoked at most once, only for `Ok`, and its future is awaited
    /// before the new outcome is produced.
    ///
    /// # Panics
    ///
    /// Raises a [`Panic`] (message `"and_then_async failed"`) if `f` or its
    /// future panics.
    ///
    /// # Example
    ///
    /// ```rust
    /// use breakwater::Outcome;
    ///
    /// # tokio_test::block_on(async {
    /// let doubled = Outcome::<i32, String>::ok(4)
    ///     .and_then_async(|n| async move { Outcome::ok(n * 2) })
    ///     .await;
    /// assert_eq!(doubled, Outcome::ok(8));
    /// # });
    /// ```
    pub async fn and_then_async<B, F, Fut>(self, f: F) -> Outcome<B, E>
    where
        F: FnOnce(A) -> Fut,
        Fut: Future<Output = Outcome<B, E>>,
    {
        match self {
            Outcome::Ok(value) => {
                guard_async("and_then_async failed", async move { f(value).await }).await
            }
            Outcome::Err(error) => Outcome::Err(error),
        }
    }

    /// Async [`tap`](Outcome::tap).
    ///
    /// The future returned by `f` must not borrow the value; copy what it
    /// needs out of the reference first.
    ///
    /// # Panics
    ///
    /// Raises a [`Panic`] (message `"tap_async failed"`) if `f` or its future
    /// panics.
    pub async fn tap_async<F, Fut>(self, f: F) -> Self
    where
        F: FnOnce(&A) -> Fut,
        Fut: Future<Output = ()>,
    {
        if let Outcome::Ok(value) = &self {
            guard_async("tap_async failed", async move { f(value).await }).await;
        }
        self
    }
}

impl<A, E> From<Result<A, E>> for Outcome<A, E> {
    #[inline]
    fn from(result: Result<A, E>) -> Self {
        Outcome::from_result(result)
    }
}

impl<A, E> From<Outcome<A, E>> for Result<A, E> {
    #[inline]
    fn from(outcome: Outcome<A, E>) -> Self {
        outcome.into_result()
    }
}

impl<A: fmt::Display, E: fmt::Display> fmt::Display for Outcome<A, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ok(value) => write!(f, "Ok({})", value),
            Outcome::Err(error) => write!(f, "Err({})", error),
        }
    }
}
