//! Demonstrates retry and defect logging through `tracing`
//!
//! Run with: cargo run --example tracing_demo --features tracing

use std::time::Duration;

use breakwater::prelude::*;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    tracing::info!("Starting tracing demo");

    // Each failed attempt logs at debug, the final one at warn
    let mut remaining: u32 = 2;
    let outcome = safe_async(
        move || {
            let fail = remaining > 0;
            remaining = remaining.saturating_sub(1);
            async move {
                if fail {
                    Err("connection reset")
                } else {
                    Ok("pong")
                }
            }
        },
        RetryConfig::exponential(Duration::from_millis(50)).with_times(3),
    )
    .await;
    tracing::info!("ping: {:?}", outcome.ok_value());

    let outcome = safe(
        || "not-a-port".parse::<u16>(),
        RetryConfig::constant(Duration::from_millis(10)).with_times(1),
    );
    if let Outcome::Err(unhandled) = &outcome {
        tracing::error!("config load failed: {}", unhandled);
    }

    // A panicking mapper is raised as a Panic and logged before it unwinds
    let defect = breakwater::panic::catch(|| Outcome::<u16, String>::ok(0).map(|port| 1000 / port));
    if let Err(defect) = defect {
        tracing::info!("recovered defect: {}", defect);
    }
}
