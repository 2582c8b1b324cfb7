//! Testing utilities for code built on breakwater.
//!
//! Assertion macros for [`Outcome`](crate::Outcome), helpers that capture the
//! crate's defects ([`Panic`], [`NonExhaustiveMatch`]) raised by a closure,
//! and, with the `proptest` feature, an `Arbitrary` impl for `Outcome`.
//!
//! # Examples
//!
//! ```rust
//! use breakwater::{assert_err, assert_ok, Outcome};
//! use breakwater::testing::expect_panic;
//!
//! assert_ok!(Outcome::<_, String>::ok(42));
//! assert_ok!(Outcome::<_, String>::ok(42), 42);
//! assert_err!(Outcome::<i32, _>::err("boom"));
//!
//! let defect = expect_panic(|| Outcome::<i32, &str>::ok(1).map(|_| -> i32 { panic!("bug") }));
//! assert_eq!(defect.message(), "map failed");
//! ```

use std::panic::{self, AssertUnwindSafe};

use crate::panic::Panic;
use crate::tagged::NonExhaustiveMatch;

/// Assert that an outcome is `Ok`, optionally comparing the value.
///
/// # Example
///
/// ```rust
/// use breakwater::{assert_ok, Outcome};
///
/// let ok = Outcome::<_, String>::ok(vec![1, 2]);
/// assert_ok!(ok, vec![1, 2]);
/// ```
#[macro_export]
macro_rules! assert_ok {
    ($outcome:expr) => {
        match $outcome {
            $crate::Outcome::Ok(_) => {}
            $crate::Outcome::Err(e) => {
                panic!("Expected Ok, got Err: {:?}", e);
            }
        }
    };
    ($outcome:expr, $expected:expr) => {
        match $outcome {
            $crate::Outcome::Ok(value) => {
                assert_eq!(value, $expected);
            }
            $crate::Outcome::Err(e) => {
                panic!("Expected Ok({:?}), got Err: {:?}", $expected, e);
            }
        }
    };
}

/// Assert that an outcome is `Err`, optionally comparing the error.
///
/// # Example
///
/// ```rust
/// use breakwater::{assert_err, Outcome};
///
/// let err = Outcome::<i32, _>::err("not found");
/// assert_err!(err, "not found");
/// ```
#[macro_export]
macro_rules! assert_err {
    ($outcome:expr) => {
        match $outcome {
            $crate::Outcome::Err(_) => {}
            $crate::Outcome::Ok(v) => {
                panic!("Expected Err, got Ok: {:?}", v);
            }
        }
    };
    ($outcome:expr, $expected:expr) => {
        match $outcome {
            $crate::Outcome::Err(error) => {
                assert_eq!(error, $expected);
            }
            $crate::Outcome::Ok(v) => {
                panic!("Expected Err({:?}), got Ok: {:?}", $expected, v);
            }
        }
    };
}

/// Assert that an outcome is `Err` carrying a tagged error with the given tag.
///
/// # Example
///
/// ```rust
/// use breakwater::{assert_err_tag, safe, SafeConfig};
///
/// let outcome = safe(|| "x".parse::<i32>(), SafeConfig::default());
/// assert_err_tag!(outcome, "UnhandledException");
/// ```
#[macro_export]
macro_rules! assert_err_tag {
    ($outcome:expr, $tag:expr) => {
        match $outcome {
            $crate::Outcome::Err(error) => {
                assert_eq!($crate::TaggedError::tag(&error), $tag);
            }
            $crate::Outcome::Ok(v) => {
                panic!("Expected Err tagged {:?}, got Ok: {:?}", $tag, v);
            }
        }
    };
}

/// Run `f` and return the [`Panic`] it raises.
///
/// # Panics
///
/// Panics if `f` returns normally or raises anything other than a `Panic`.
#[track_caller]
pub fn expect_panic<T, F>(f: F) -> Panic
where
    F: FnOnce() -> T,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(_) => panic!("Expected a Panic, but the closure returned normally"),
        Err(payload) => match Panic::from_payload(payload) {
            Ok(defect) => defect,
            Err(_) => panic!("Expected a Panic, but the closure raised another payload"),
        },
    }
}

/// Run `f` and return the [`NonExhaustiveMatch`] it raises.
///
/// # Panics
///
/// Panics if `f` returns normally or raises anything else.
///
/// # Example
///
/// ```rust
/// use breakwater::testing::expect_non_exhaustive;
/// use breakwater::{match_tag, Handlers, TaggedError};
/// use std::fmt;
///
/// #[derive(Debug)]
/// struct Gone;
///
/// impl fmt::Display for Gone {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "gone")
///     }
/// }
///
/// impl std::error::Error for Gone {}
///
/// impl TaggedError for Gone {
///     fn tag(&self) -> &str {
///         "Gone"
///     }
/// }
///
/// let defect = expect_non_exhaustive(|| match_tag(Gone, Handlers::<Gone, ()>::new()));
/// assert_eq!(defect.missing_tag(), "Gone");
/// ```
#[track_caller]
pub fn expect_non_exhaustive<T, F>(f: F) -> NonExhaustiveMatch
where
    F: FnOnce() -> T,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(_) => panic!("Expected a NonExhaustiveMatch, but the closure returned normally"),
        Err(payload) => match payload.downcast::<NonExhaustiveMatch>() {
            Ok(defect) => *defect,
            Err(_) => panic!("Expected a NonExhaustiveMatch, but the closure raised another payload"),
        },
    }
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
impl<A, E> Arbitrary for crate::Outcome<A, E>
where
    A: Arbitrary + 'static,
    E: Arbitrary + 'static,
    A::Strategy: 'static,
    E::Strategy: 'static,
{
    type Parameters = (A::Parameters, E::Parameters);
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(args: Self::Parameters) -> Self::Strategy {
        let (a_params, e_params) = args;
        prop_oneof![
            any_with::<A>(a_params).prop_map(crate::Outcome::ok),
            any_with::<E>(e_params).prop_map(crate::Outcome::err),
        ]
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Outcome;

    #[test]
    fn assert_ok_macro() {
        assert_ok!(Outcome::<_, String>::ok(42));
        assert_ok!(Outcome::<_, String>::ok(42), 42);
    }

    #[test]
    fn assert_err_macro() {
        assert_err!(Outcome::<i32, _>::err("error"));
        assert_err!(Outcome::<i32, _>::err("error"), "error");
    }

    #[test]
    #[should_panic(expected = "Expected Ok, got Err")]
    fn assert_ok_panics_on_err() {
        assert_ok!(Outcome::<i32, _>::err("error"));
    }

    #[test]
    #[should_panic(expected = "Expected Err, got Ok")]
    fn assert_err_panics_on_ok() {
        assert_err!(Outcome::<_, String>::ok(1));
    }

    #[test]
    #[should_panic(expected = "Expected Err tagged")]
    fn assert_err_tag_panics_on_ok() {
        let ok: Outcome<i32, crate::UnhandledException<std::io::Error>> = Outcome::ok(1);
        assert_err_tag!(ok, "UnhandledException");
    }

    #[test]
    fn expect_panic_returns_defect() {
        let defect = expect_panic(|| Outcome::<i32, u8>::err(1).unwrap());
        assert_eq!(defect.message(), "called unwrap on Err: 1");
    }

    #[test]
    #[should_panic(expected = "closure returned normally")]
    fn expect_panic_fails_when_nothing_raised() {
        expect_panic(|| 1);
    }

    #[test]
    #[should_panic(expected = "raised another payload")]
    fn expect_panic_fails_on_foreign_panic() {
        expect_panic(|| -> () { panic!("plain") });
    }

    #[cfg(feature = "proptest")]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn outcome_arbitrary_generates_valid_instances(
                outcome in any::<Outcome<i32, String>>()
            ) {
                match outcome {
                    Outcome::Ok(_) => prop_assert!(outcome.is_ok()),
                    Outcome::Err(_) => prop_assert!(outcome.is_err()),
                }
            }
        }
    }
}
