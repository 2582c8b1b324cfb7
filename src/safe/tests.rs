//! Behavioural tests for the safe boundary.

use super::*;
use crate::panic::catch;
use crate::tagged::NonExhaustiveMatch;
use std::time::Duration;

#[test]
fn test_safe_succeeds_on_third_attempt() {
    let mut calls = 0;

    let outcome = safe(
        || {
            calls += 1;
            if calls < 3 {
                Err("transient failure")
            } else {
                Ok("success")
            }
        },
        RetryConfig::constant(Duration::from_millis(1)).with_times(5),
    );

    assert_eq!(outcome.unwrap(), "success");
    assert_eq!(calls, 3);
}

#[test]
fn test_safe_exhausted_keeps_last_error() {
    let mut calls = 0;

    let outcome = safe(
        || -> Result<(), String> {
            calls += 1;
            Err(format!("failure {}", calls))
        },
        RetryConfig::constant(Duration::ZERO).with_times(2),
    );

    assert_eq!(calls, 3);
    let unhandled = outcome.unwrap_err();
    assert_eq!(unhandled.fault().failure(), Some(&"failure 3".to_string()));
    assert_eq!(unhandled.to_string(), "Unhandled exception: failure 3");
}

#[test]
fn test_safe_without_retry_runs_once() {
    let mut calls = 0;

    let outcome = safe(
        || -> Result<(), &str> {
            calls += 1;
            Err("nope")
        },
        SafeConfig::default(),
    );

    assert!(outcome.is_err());
    assert_eq!(calls, 1);
}

#[test]
fn test_unhandled_string_error_dispatches_by_tag() {
    let outcome = safe(|| Err::<u8, _>("quota exceeded"), SafeConfig::default());

    let status = outcome.match_err(
        crate::Handlers::new().on("UnhandledException", |unhandled: UnhandledException<&str>| {
            Outcome::err(unhandled.fault().failure().map(|s| s.len()))
        }),
    );

    assert_eq!(status, Outcome::err(Some(14)));
}

#[test]
fn test_safe_captures_panics_as_faults() {
    let outcome = safe(
        || -> Result<i32, String> { panic!("index out of bounds") },
        SafeConfig::default(),
    );

    let fault = outcome.unwrap_err().into_fault();
    assert!(fault.is_panicked());
    assert_eq!(fault.cause().unwrap().to_string(), "index out of bounds");
    assert!(!fault.cause().unwrap().is_error());
}

#[test]
fn test_safe_retries_panics_like_errors() {
    let mut calls = 0;

    let outcome = safe(
        || -> Result<&str, String> {
            calls += 1;
            if calls == 1 {
                panic!("flaky");
            }
            Ok("recovered")
        },
        RetryConfig::constant(Duration::ZERO).with_times(1),
    );

    assert_eq!(outcome.unwrap(), "recovered");
    assert_eq!(calls, 2);
}

#[test]
fn test_safe_captures_non_exhaustive_match_from_operation() {
    let outcome = safe(
        || -> Result<(), String> {
            std::panic::panic_any(NonExhaustiveMatch::new("Unknown", vec!["Known".into()]))
        },
        SafeConfig::default(),
    );

    let fault = outcome.unwrap_err().into_fault();
    let cause = fault.cause().unwrap();
    assert!(cause.is_error());
    assert!(cause.downcast_error::<NonExhaustiveMatch>().is_some());
}

#[test]
fn test_safe_with_maps_terminal_fault_once() {
    let mut catch_calls = 0;

    let outcome = safe_with(
        SafeOptions::new(
            || Err::<(), _>("refused"),
            |fault: Fault<&str>| {
                catch_calls += 1;
                format!("mapped: {}", fault)
            },
        ),
        RetryConfig::constant(Duration::ZERO).with_times(3),
    );

    assert_eq!(outcome.unwrap_err(), "mapped: refused");
    assert_eq!(catch_calls, 1);
}

#[test]
fn test_safe_with_success_skips_catch() {
    let outcome = safe_with(
        SafeOptions::new(
            || Ok::<_, String>(5),
            |_: Fault<String>| -> String { panic!("catch must not run") },
        ),
        SafeConfig::default(),
    );

    assert_eq!(outcome, crate::Outcome::ok(5));
}

#[test]
fn test_panicking_catch_raises_panic() {
    let defect = catch(|| {
        safe_with(
            SafeOptions::new(
                || Err::<(), _>("refused"),
                |_: Fault<&str>| -> String { panic!("mapper bug") },
            ),
            SafeConfig::default(),
        )
    })
    .unwrap_err();

    assert_eq!(defect.message(), "safe catch handler failed");
    assert_eq!(defect.cause().unwrap().to_string(), "mapper bug");
}

#[test]
fn test_sync_backoff_blocks_thread() {
    let start = std::time::Instant::now();

    let outcome = safe(
        || Err::<(), _>("down"),
        RetryConfig::constant(Duration::from_millis(20)).with_times(2),
    );

    assert!(outcome.is_err());
    assert!(
        start.elapsed() >= Duration::from_millis(40),
        "Expected at least 40ms, got {:?}",
        start.elapsed()
    );
}

#[cfg(feature = "async")]
mod async_tests {
    use super::*;
    use futures::FutureExt;
    use std::panic::AssertUnwindSafe;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    fn gaps(instants: &[tokio::time::Instant]) -> Vec<Duration> {
        instants.windows(2).map(|w| w[1] - w[0]).collect()
    }

    fn assert_close(actual: Duration, expected: Duration) {
        assert!(
            actual >= expected && actual < expected + Duration::from_millis(5),
            "expected about {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[tokio::test]
    async fn test_safe_async_succeeds_on_third_attempt() {
        let attempts = Arc::new(AtomicU32::new(0));

        let outcome = safe_async(
            {
                let attempts = attempts.clone();
                move || {
                    let attempts = attempts.clone();
                    async move {
                        let n = attempts.fetch_add(1, Ordering::SeqCst);
                        if n < 2 {
                            Err("transient failure")
                        } else {
                            Ok("success")
                        }
                    }
                }
            },
            RetryConfig::constant(Duration::from_millis(1)).with_times(5),
        )
        .await;

        assert_eq!(outcome.unwrap(), "success");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_safe_async_exhausted_after_times_plus_one() {
        let attempts = Arc::new(AtomicU32::new(0));

        let outcome = safe_async(
            {
                let attempts = attempts.clone();
                move || {
                    let attempts = attempts.clone();
                    async move {
                        attempts.fetch_add(1, Ordering::SeqCst);
                        Err::<(), _>("always fails")
                    }
                }
            },
            RetryConfig::constant(Duration::from_millis(1)).with_times(2),
        )
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert_eq!(
            outcome.unwrap_err().fault().failure(),
            Some(&"always fails")
        );
    }

    #[tokio::test]
    async fn test_safe_async_captures_panic_during_poll() {
        let outcome = safe_async(
            || async {
                tokio::task::yield_now().await;
                if true {
                    panic!("connection pool poisoned");
                }
                Ok::<(), String>(())
            },
            SafeConfig::default(),
        )
        .await;

        let fault = outcome.unwrap_err().into_fault();
        assert_eq!(
            fault.cause().unwrap().to_string(),
            "connection pool poisoned"
        );
    }

    #[tokio::test]
    async fn test_safe_async_with_panicking_catch_raises_panic() {
        let result = AssertUnwindSafe(safe_async_with(
            SafeOptions::new(
                || async { Err::<(), _>("refused") },
                |_: Fault<&str>| -> String { panic!("mapper bug") },
            ),
            SafeConfig::default(),
        ))
        .catch_unwind()
        .await;

        let defect = crate::Panic::from_payload(result.unwrap_err()).unwrap();
        assert_eq!(defect.message(), "safe catch handler failed");
    }

    #[tokio::test(start_paused = true)]
    async fn test_exponential_backoff_schedule() {
        let seen = Arc::new(Mutex::new(Vec::new()));

        let outcome = safe_async(
            {
                let seen = seen.clone();
                move || {
                    seen.lock().unwrap().push(tokio::time::Instant::now());
                    async { Err::<(), _>("unavailable") }
                }
            },
            RetryConfig::exponential(Duration::from_millis(100)).with_times(3),
        )
        .await;

        assert!(outcome.is_err());
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 4);

        let gaps = gaps(&seen);
        assert_close(gaps[0], Duration::from_millis(100));
        assert_close(gaps[1], Duration::from_millis(200));
        assert_close(gaps[2], Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_linear_backoff_schedule() {
        let seen = Arc::new(Mutex::new(Vec::new()));

        let _ = safe_async(
            {
                let seen = seen.clone();
                move || {
                    seen.lock().unwrap().push(tokio::time::Instant::now());
                    async { Err::<(), _>("unavailable") }
                }
            },
            RetryConfig::linear(Duration::from_millis(100)).with_times(3),
        )
        .await;

        let seen = seen.lock().unwrap();
        let gaps = gaps(&seen);
        assert_eq!(gaps.len(), 3);
        assert_close(gaps[0], Duration::from_millis(100));
        assert_close(gaps[1], Duration::from_millis(200));
        assert_close(gaps[2], Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_future_cancels_remaining_attempts() {
        let attempts = Arc::new(AtomicU32::new(0));

        let pending = safe_async(
            {
                let attempts = attempts.clone();
                move || {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    async { Err::<(), _>("unavailable") }
                }
            },
            RetryConfig::constant(Duration::from_millis(100)).with_times(5),
        );

        let timed_out = tokio::time::timeout(Duration::from_millis(150), pending).await;
        assert!(timed_out.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_attempt_records_no_retry() {
        let attempts = Arc::new(AtomicU32::new(0));
        let finished = Arc::new(AtomicU32::new(0));

        let pending = safe_async(
            {
                let attempts = attempts.clone();
                let finished = finished.clone();
                move || {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    let finished = finished.clone();
                    async move {
                        tokio::time::sleep(Duration::from_secs(10)).await;
                        finished.fetch_add(1, Ordering::SeqCst);
                        Err::<(), _>("slow backend")
                    }
                }
            },
            RetryConfig::constant(Duration::from_millis(100)).with_times(5),
        );

        let timed_out = tokio::time::timeout(Duration::from_secs(1), pending).await;
        assert!(timed_out.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(finished.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(finished.load(Ordering::SeqCst), 0);
    }
}

#[cfg(feature = "tracing")]
mod tracing_tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn test_retries_are_logged() {
        let _ = safe(
            || Err::<(), _>("down"),
            RetryConfig::constant(Duration::ZERO).with_times(1),
        );

        assert!(logs_contain("attempt 1 failed"));
        assert!(logs_contain("giving up after 2 attempt(s)"));
    }
}
