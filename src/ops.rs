//! Standalone versions of the [`Outcome`] combinators.
//!
//! Two calling conventions are provided:
//!
//! - **data-first** (this module): `ops::map(outcome, f)`, convenient when
//!   passing a combinator where a plain function is expected;
//! - **data-last** ([`curried`]): `curried::map(f)` returns a function that
//!   waits for the outcome, ready to be chained with [`Pipe::pipe`].
//!
//! Both behave exactly like the corresponding methods, including converting
//! callback panics into [`Panic`](crate::Panic).
//!
//! # Example
//!
//! ```rust
//! use breakwater::ops::{self, curried, Pipe};
//! use breakwater::Outcome;
//!
//! let data_first = ops::map(Outcome::<i32, String>::ok(2), |x| x + 1);
//!
//! let data_last = Outcome::<i32, String>::ok(2)
//!     .pipe(curried::map(|x| x + 1))
//!     .pipe(curried::and_then(|x| Outcome::ok(x * 10)));
//!
//! assert_eq!(data_first, Outcome::ok(3));
//! assert_eq!(data_last, Outcome::ok(30));
//! ```

use std::fmt::Debug;
use std::future::Future;

use crate::outcome::Outcome;

/// Data-first [`Outcome::map`].
#[inline]
pub fn map<A, B, E, F>(outcome: Outcome<A, E>, f: F) -> Outcome<B, E>
where
    F: FnOnce(A) -> B,
{
    outcome.map(f)
}

/// Data-first [`Outcome::map_err`].
#[inline]
pub fn map_err<A, E, F2, F>(outcome: Outcome<A, E>, f: F) -> Outcome<A, F2>
where
    F: FnOnce(E) -> F2,
{
    outcome.map_err(f)
}

/// Data-first [`Outcome::and_then`].
#[inline]
pub fn and_then<A, B, E, F>(outcome: Outcome<A, E>, f: F) -> Outcome<B, E>
where
    F: FnOnce(A) -> Outcome<B, E>,
{
    outcome.and_then(f)
}

/// Data-first [`Outcome::tap`].
#[inline]
pub fn tap<A, E, F>(outcome: Outcome<A, E>, f: F) -> Outcome<A, E>
where
    F: FnOnce(&A),
{
    outcome.tap(f)
}

/// Data-first [`Outcome::fold`].
#[doc(alias = "match")]
#[inline]
pub fn fold<A, B, E, OkF, ErrF>(outcome: Outcome<A, E>, on_ok: OkF, on_err: ErrF) -> B
where
    OkF: FnOnce(A) -> B,
    ErrF: FnOnce(E) -> B,
{
    outcome.fold(on_ok, on_err)
}

/// Data-first [`Outcome::unwrap`].
#[track_caller]
pub fn unwrap<A, E>(outcome: Outcome<A, E>) -> A
where
    E: Debug + Send + 'static,
{
    outcome.unwrap()
}

/// Data-first [`Outcome::and_then_async`].
pub async fn and_then_async<A, B, E, F, Fut>(outcome: Outcome<A, E>, f: F) -> Outcome<B, E>
where
    F: FnOnce(A) -> Fut,
    Fut: Future<Output = Outcome<B, E>>,
{
    outcome.and_then_async(f).await
}

/// Data-first [`Outcome::tap_async`].
pub async fn tap_async<A, E, F, Fut>(outcome: Outcome<A, E>, f: F) -> Outcome<A, E>
where
    F: FnOnce(&A) -> Fut,
    Fut: Future<Output = ()>,
{
    outcome.tap_async(f).await
}

/// Data-last combinators: configure the callback now, supply the outcome later.
pub mod curried {
    use std::fmt::Debug;
    use std::future::Future;

    use futures::future::{FutureExt, LocalBoxFuture};

    use crate::outcome::Outcome;

    /// Data-last [`Outcome::map`].
    pub fn map<A, B, E, F>(f: F) -> impl FnOnce(Outcome<A, E>) -> Outcome<B, E>
    where
        F: FnOnce(A) -> B,
    {
        move |outcome| outcome.map(f)
    }

    /// Data-last [`Outcome::map_err`].
    pub fn map_err<A, E, F2, F>(f: F) -> impl FnOnce(Outcome<A, E>) -> Outcome<A, F2>
    where
        F: FnOnce(E) -> F2,
    {
        move |outcome| outcome.map_err(f)
    }

    /// Data-last [`Outcome::and_then`].
    pub fn and_then<A, B, E, F>(f: F) -> impl FnOnce(Outcome<A, E>) -> Outcome<B, E>
    where
        F: FnOnce(A) -> Outcome<B, E>,
    {
        move |outcome| outcome.and_then(f)
    }

    /// Data-last [`Outcome::tap`].
    pub fn tap<A, E, F>(f: F) -> impl FnOnce(Outcome<A, E>) -> Outcome<A, E>
    where
        F: FnOnce(&A),
    {
        move |outcome| outcome.tap(f)
    }

    /// Data-last [`Outcome::fold`].
    #[doc(alias = "match")]
    pub fn fold<A, B, E, OkF, ErrF>(on_ok: OkF, on_err: ErrF) -> impl FnOnce(Outcome<A, E>) -> B
    where
        OkF: FnOnce(A) -> B,
        ErrF: FnOnce(E) -> B,
    {
        move |outcome| outcome.fold(on_ok, on_err)
    }

    /// Data-last [`Outcome::unwrap`].
    pub fn unwrap<A, E>() -> impl FnOnce(Outcome<A, E>) -> A
    where
        E: Debug + Send + 'static,
    {
        |outcome: Outcome<A, E>| outcome.unwrap()
    }

    /// Data-last [`Outcome::and_then_async`].
    ///
    /// ```rust
    /// use breakwater::ops::{curried, Pipe};
    /// use breakwater::Outcome;
    ///
    /// # tokio_test::block_on(async {
    /// let outcome = Outcome::<u32, String>::ok(20)
    ///     .pipe(curried::and_then_async(|n| async move { Outcome::ok(n + 1) }))
    ///     .await;
    /// assert_eq!(outcome, Outcome::ok(21));
    /// # });
    /// ```
    pub fn and_then_async<'a, A, B, E, F, Fut>(
        f: F,
    ) -> impl FnOnce(Outcome<A, E>) -> LocalBoxFuture<'a, Outcome<B, E>>
    where
        A: 'a,
        B: 'a,
        E: 'a,
        F: FnOnce(A) -> Fut + 'a,
        Fut: Future<Output = Outcome<B, E>> + 'a,
    {
        move |outcome| outcome.and_then_async(f).boxed_local()
    }

    /// Data-last [`Outcome::tap_async`].
    pub fn tap_async<'a, A, E, F, Fut>(
        f: F,
    ) -> impl FnOnce(Outcome<A, E>) -> LocalBoxFuture<'a, Outcome<A, E>>
    where
        A: 'a,
        E: 'a,
        F: FnOnce(&A) -> Fut + 'a,
        Fut: Future<Output = ()> + 'a,
    {
        move |outcome| outcome.tap_async(f).boxed_local()
    }
}

/// Left-to-right function application, for data-last pipelines.
///
/// ```rust
/// use breakwater::ops::Pipe;
///
/// assert_eq!(3_i32.pipe(|x| x * 2).pipe(|x| x + 1), 7);
/// ```
pub trait Pipe: Sized {
    /// Apply `f` to `self`.
    #[inline]
    fn pipe<R, F>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

impl<T> Pipe for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panic::catch;
    use std::cell::Cell;

    #[test]
    fn test_data_first_matches_methods() {
        let ok: Outcome<i32, String> = Outcome::ok(4);

        assert_eq!(map(ok.clone(), |x| x * 2), ok.clone().map(|x| x * 2));
        assert_eq!(
            and_then(ok.clone(), |x| Outcome::ok(x + 1)),
            Outcome::ok(5)
        );
        assert_eq!(fold(ok.clone(), |x| x, |_| 0), 4);
        assert_eq!(unwrap(ok), 4);

        let err: Outcome<i32, String> = Outcome::err("bad".into());
        assert_eq!(map_err(err, |e| e.len()), Outcome::err(3));
    }

    #[test]
    fn test_data_first_tap() {
        let seen = Cell::new(0);
        let out = tap(Outcome::<i32, ()>::ok(9), |v| seen.set(*v));
        assert_eq!(out, Outcome::ok(9));
        assert_eq!(seen.get(), 9);
    }

    #[test]
    fn test_data_first_map_panic_becomes_panic() {
        let defect = catch(|| map(Outcome::<i32, String>::ok(1), |_| -> i32 { panic!("bad") }))
            .unwrap_err();
        assert_eq!(defect.message(), "map failed");
    }

    #[test]
    fn test_curried_pipeline() {
        let seen = Cell::new(0);

        let text = Outcome::<i32, String>::ok(5)
            .pipe(curried::map(|x| x * 2))
            .pipe(curried::tap(|x| seen.set(*x)))
            .pipe(curried::and_then(|x| {
                if x > 5 {
                    Outcome::ok(x)
                } else {
                    Outcome::err("too small".to_string())
                }
            }))
            .pipe(curried::map_err(|e: String| e.to_uppercase()))
            .pipe(curried::fold(|v| format!("value {}", v), |e| e));

        assert_eq!(text, "value 10");
        assert_eq!(seen.get(), 10);
    }

    #[test]
    fn test_curried_unwrap_raises_on_err() {
        let defect = catch(|| Outcome::<i32, &str>::err("nope").pipe(curried::unwrap()))
            .unwrap_err();
        assert_eq!(defect.message(), "called unwrap on Err: \"nope\"");
    }

    #[tokio::test]
    async fn test_async_data_first_and_last() {
        let first = and_then_async(Outcome::<i32, String>::ok(1), |x| async move {
            Outcome::ok(x + 1)
        })
        .await;
        assert_eq!(first, Outcome::ok(2));

        let tapped = tap_async(Outcome::<i32, String>::ok(3), |_| async {}).await;
        assert_eq!(tapped, Outcome::ok(3));

        let last = Outcome::<i32, String>::ok(3)
            .pipe(curried::tap_async(|_| async {}))
            .await
            .pipe(curried::and_then_async(|x| async move { Outcome::ok(x * 3) }))
            .await;
        assert_eq!(last, Outcome::ok(9));
    }
}
