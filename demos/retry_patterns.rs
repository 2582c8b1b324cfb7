//! Retry Patterns Example
//!
//! Demonstrates the safe boundary with retries. Shows practical patterns
//! including:
//! - Basic retry with exponential backoff
//! - Comparing backoff schedules
//! - Mapping the terminal failure with `catch`
//! - Panicking operations classified as faults
//! - Cancelling pending retries with a timeout
//! - Blocking retries for synchronous code

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use breakwater::prelude::*;

// ==================== Basic Retry ====================

/// Example 1: Basic retry with exponential backoff
///
/// Demonstrates retrying an operation that fails transiently.
async fn example_basic_retry() {
    println!("\n=== Example 1: Basic Retry ===");

    let attempts = Arc::new(AtomicU32::new(0));

    let outcome = safe_async(
        {
            let attempts = attempts.clone();
            move || {
                let attempts = attempts.clone();
                async move {
                    let n = attempts.fetch_add(1, Ordering::SeqCst);
                    println!("  Attempt {}", n + 1);
                    if n < 2 {
                        Err("transient failure")
                    } else {
                        Ok("success!")
                    }
                }
            }
        },
        RetryConfig::exponential(Duration::from_millis(100)).with_times(5),
    )
    .await;

    match outcome {
        Outcome::Ok(value) => println!(
            "Success after {} attempts: {}",
            attempts.load(Ordering::SeqCst),
            value
        ),
        Outcome::Err(unhandled) => println!("Failed: {}", unhandled),
    }
}

// ==================== Backoff Schedules ====================

/// Example 2: Comparing backoff schedules
///
/// Configs are plain data, so the schedule can be inspected before running.
fn example_backoff_schedules() {
    println!("\n=== Example 2: Backoff Schedules ===");

    let base = Duration::from_millis(100);
    for backoff in [Backoff::Constant, Backoff::Linear, Backoff::Exponential] {
        let config = RetryConfig::constant(base)
            .with_backoff(backoff)
            .with_times(4);
        let delays: Vec<u128> = config.delays().map(|d| d.as_millis()).collect();
        println!(
            "  {:<12} {:?} ms (total {:?})",
            backoff.as_str(),
            delays,
            config.total_delay()
        );
    }
}

// ==================== Catch ====================

#[derive(Debug)]
enum GatewayError {
    Upstream(String),
    Crashed(String),
}

/// Example 3: Mapping the terminal failure with `catch`
async fn example_catch() {
    println!("\n=== Example 3: Catch ===");

    let outcome = safe_async_with(
        SafeOptions::new(
            || async { Err::<String, _>("502 Bad Gateway") },
            |fault: Fault<&str>| match fault {
                Fault::Failed(status) => GatewayError::Upstream(status.to_string()),
                Fault::Panicked(cause) => GatewayError::Crashed(cause.to_string()),
            },
        ),
        RetryConfig::linear(Duration::from_millis(50)).with_times(2),
    )
    .await;

    println!("Outcome: {:?}", outcome);
}

// ==================== Panics ====================

/// Example 4: Panics inside the operation are faults, not crashes
async fn example_panicking_operation() {
    println!("\n=== Example 4: Panicking Operation ===");

    let outcome = safe_async(
        || async {
            let config: Vec<u16> = Vec::new();
            Ok::<u16, String>(config[0])
        },
        SafeConfig::default(),
    )
    .await;

    if let Outcome::Err(unhandled) = outcome {
        println!("Captured: {}", unhandled);
        println!("Panicked: {}", unhandled.fault().is_panicked());
    }
}

// ==================== Cancellation ====================

/// Example 5: Dropping the future cancels the remaining attempts
async fn example_cancellation() {
    println!("\n=== Example 5: Cancellation ===");

    let attempts = Arc::new(AtomicU32::new(0));

    let retrying = safe_async(
        {
            let attempts = attempts.clone();
            move || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>("still down") }
            }
        },
        RetryConfig::constant(Duration::from_millis(200)).with_times(10),
    );

    match tokio::time::timeout(Duration::from_millis(500), retrying).await {
        Ok(outcome) => println!("Finished: {:?}", outcome.is_ok()),
        Err(_) => println!(
            "Gave up waiting after {} attempts",
            attempts.load(Ordering::SeqCst)
        ),
    }
}

// ==================== Blocking ====================

/// Example 6: Synchronous retries block the calling thread
fn example_blocking() {
    println!("\n=== Example 6: Blocking Retry ===");

    let mut remaining = 2;
    let outcome = safe(
        || {
            if remaining > 0 {
                remaining -= 1;
                "not-a-number".parse::<u32>()
            } else {
                "42".parse::<u32>()
            }
        },
        RetryConfig::constant(Duration::from_millis(20)).with_times(3),
    );

    println!("Parsed: {}", outcome.map(|n| n * 2).unwrap_or(0));
}

#[tokio::main]
async fn main() {
    println!("======================================");
    println!("       Retry Patterns Example         ");
    println!("======================================");

    example_basic_retry().await;
    example_backoff_schedules();
    example_catch().await;
    example_panicking_operation().await;
    example_cancellation().await;
    example_blocking();

    println!("\n======================================");
    println!("           Examples Complete           ");
    println!("======================================");
}
