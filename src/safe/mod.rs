//! The safe boundary: run a fallible operation and get an [`Outcome`] back.
//!
//! Every way the wrapped operation can fail ends up in the `Err` channel:
//!
//! - returning `Err(e)` becomes [`Fault::Failed`],
//! - panicking becomes [`Fault::Panicked`] with the payload as its [`Cause`].
//!
//! Failed attempts are retried according to the [`RetryConfig`] in the
//! [`SafeConfig`]. Once retries run out, the last fault is either handed to a
//! `catch` mapper ([`safe_with`], [`safe_async_with`]) or wrapped in an
//! [`UnhandledException`] ([`safe`], [`safe_async`]).
//!
//! # Quick Start
//!
//! ```rust
//! use breakwater::{safe_async, RetryConfig};
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let calls = AtomicU32::new(0);
//! let counter = &calls;
//!
//! let outcome = safe_async(
//!     || async move {
//!         if counter.fetch_add(1, Ordering::SeqCst) < 2 {
//!             Err("transient")
//!         } else {
//!             Ok("connected")
//!         }
//!     },
//!     RetryConfig::exponential(Duration::from_millis(1)).with_times(3),
//! )
//! .await;
//!
//! assert_eq!(outcome.unwrap(), "connected");
//! assert_eq!(calls.load(Ordering::SeqCst), 3);
//! # });
//! ```
//!
//! # Retry Strategies
//!
//! - **Constant**: every retry waits `delay`
//! - **Linear**: retry `i` waits `delay * i` (100ms, 200ms, 300ms, ...)
//! - **Exponential**: retry `i` waits `delay * 2^(i-1)` (100ms, 200ms, 400ms, ...)
//!
//! Panics raised by the wrapped operation are retried like any other failure.
//!
//! # Cancellation
//!
//! Dropping a `safe_async` future (for example through `tokio::time::timeout`)
//! cancels the in-flight attempt or backoff timer. No further attempts run and
//! no outcome is produced.

mod config;
mod error;

pub use config::{Backoff, ParseBackoffError, RetryConfig, SafeConfig, SafeOptions};
pub use error::{Fault, UnhandledException};

#[cfg(feature = "async")]
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

#[cfg(feature = "async")]
use futures::FutureExt;

use crate::cause::Cause;
use crate::outcome::Outcome;
use crate::panic::guard;

const CATCH_FAILED: &str = "safe catch handler failed";

/// Run `op` with retries, blocking the thread during backoff.
///
/// The terminal failure is wrapped in an [`UnhandledException`].
///
/// # Examples
///
/// ```rust
/// use breakwater::{safe, RetryConfig, SafeConfig};
/// use std::time::Duration;
///
/// let parsed = safe(|| "42".parse::<i32>(), SafeConfig::default());
/// assert_eq!(parsed.unwrap(), 42);
///
/// let mut calls = 0;
/// let failed = safe(
///     || {
///         calls += 1;
///         "x".parse::<i32>()
///     },
///     RetryConfig::constant(Duration::ZERO).with_times(2),
/// );
/// assert!(failed.is_err());
/// assert_eq!(calls, 3);
/// ```
pub fn safe<A, E, Op>(op: Op, config: impl Into<SafeConfig>) -> Outcome<A, UnhandledException<E>>
where
    Op: FnMut() -> Result<A, E>,
{
    match run(op, config.into()) {
        Ok(value) => Outcome::Ok(value),
        Err(fault) => Outcome::Err(UnhandledException::new(fault)),
    }
}

/// Run `options.try_` with retries, mapping the terminal failure through
/// `options.catch`.
///
/// # Panics
///
/// Raises a [`Panic`](crate::Panic) (message `"safe catch handler failed"`)
/// if `catch` itself panics.
///
/// # Examples
///
/// ```rust
/// use breakwater::{safe_with, Fault, SafeConfig, SafeOptions};
///
/// let outcome = safe_with(
///     SafeOptions::new(
///         || "abc".parse::<u8>(),
///         |fault: Fault<std::num::ParseIntError>| format!("bad input: {}", fault),
///     ),
///     SafeConfig::default(),
/// );
///
/// assert_eq!(
///     outcome.unwrap_err(),
///     "bad input: invalid digit found in string"
/// );
/// ```
pub fn safe_with<A, E, F, Op, C>(
    options: SafeOptions<Op, C>,
    config: impl Into<SafeConfig>,
) -> Outcome<A, F>
where
    Op: FnMut() -> Result<A, E>,
    C: FnOnce(Fault<E>) -> F,
{
    let SafeOptions { try_, catch } = options;
    match run(try_, config.into()) {
        Ok(value) => Outcome::Ok(value),
        Err(fault) => Outcome::Err(guard(CATCH_FAILED, move || catch(fault))),
    }
}

/// Async [`safe`]: awaits each attempt and sleeps with `tokio::time::sleep`.
#[cfg(feature = "async")]
pub async fn safe_async<A, E, Op, Fut>(
    op: Op,
    config: impl Into<SafeConfig>,
) -> Outcome<A, UnhandledException<E>>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<A, E>>,
{
    match run_async(op, config.into()).await {
        Ok(value) => Outcome::Ok(value),
        Err(fault) => Outcome::Err(UnhandledException::new(fault)),
    }
}

/// Async [`safe_with`].
///
/// # Examples
///
/// ```rust
/// use breakwater::{safe_async_with, Fault, RetryConfig, SafeOptions};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let outcome = safe_async_with(
///     SafeOptions::new(
///         || async { Err::<(), _>("timeout") },
///         |fault: Fault<&str>| match fault {
///             Fault::Failed(reason) => format!("gave up: {}", reason),
///             Fault::Panicked(cause) => format!("crashed: {}", cause),
///         },
///     ),
///     RetryConfig::constant(Duration::from_millis(1)).with_times(1),
/// )
/// .await;
///
/// assert_eq!(outcome.unwrap_err(), "gave up: timeout");
/// # });
/// ```
#[cfg(feature = "async")]
pub async fn safe_async_with<A, E, F, Op, Fut, C>(
    options: SafeOptions<Op, C>,
    config: impl Into<SafeConfig>,
) -> Outcome<A, F>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<A, E>>,
    C: FnOnce(Fault<E>) -> F,
{
    let SafeOptions { try_, catch } = options;
    match run_async(try_, config.into()).await {
        Ok(value) => Outcome::Ok(value),
        Err(fault) => Outcome::Err(guard(CATCH_FAILED, move || catch(fault))),
    }
}

fn run<A, E, Op>(mut op: Op, config: SafeConfig) -> Result<A, Fault<E>>
where
    Op: FnMut() -> Result<A, E>,
{
    let schedule = config.schedule();
    let mut attempt: u32 = 0;

    loop {
        let fault = match attempt_once(&mut op) {
            Ok(value) => return Ok(value),
            Err(fault) => fault,
        };

        match next_delay(&schedule, attempt) {
            Some(delay) => {
                log_retry(attempt, delay, &fault);
                if !delay.is_zero() {
                    std::thread::sleep(delay);
                }
                attempt += 1;
            }
            None => {
                log_exhausted(attempt, &fault);
                return Err(fault);
            }
        }
    }
}

#[cfg(feature = "async")]
async fn run_async<A, E, Op, Fut>(mut op: Op, config: SafeConfig) -> Result<A, Fault<E>>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<A, E>>,
{
    let schedule = config.schedule();
    let mut attempt: u32 = 0;

    loop {
        let call = &mut op;
        let fault = match AssertUnwindSafe(async move { call().await })
            .catch_unwind()
            .await
        {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(error)) => Fault::Failed(error),
            Err(payload) => Fault::Panicked(Cause::from_panic(payload)),
        };

        match next_delay(&schedule, attempt) {
            Some(delay) => {
                log_retry(attempt, delay, &fault);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                attempt += 1;
            }
            None => {
                log_exhausted(attempt, &fault);
                return Err(fault);
            }
        }
    }
}

fn attempt_once<A, E, Op>(op: &mut Op) -> Result<A, Fault<E>>
where
    Op: FnMut() -> Result<A, E>,
{
    match panic::catch_unwind(AssertUnwindSafe(op)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(Fault::Failed(error)),
        Err(payload) => Err(Fault::Panicked(Cause::from_panic(payload))),
    }
}

// `attempt` is the 0-indexed attempt that just failed.
fn next_delay(schedule: &RetryConfig, attempt: u32) -> Option<Duration> {
    attempt
        .checked_add(1)
        .and_then(|retry| schedule.delay_for_retry(retry))
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn log_retry<E>(attempt: u32, delay: Duration, fault: &Fault<E>) {
    #[cfg(feature = "tracing")]
    tracing::debug!(
        "attempt {} failed (panicked: {}), retrying in {:?}",
        u64::from(attempt) + 1,
        fault.is_panicked(),
        delay
    );
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn log_exhausted<E>(attempt: u32, fault: &Fault<E>) {
    #[cfg(feature = "tracing")]
    tracing::warn!(
        "giving up after {} attempt(s) (panicked: {})",
        u64::from(attempt) + 1,
        fault.is_panicked()
    );
}

#[cfg(test)]
mod tests;
