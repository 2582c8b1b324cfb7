//! Tagged Errors Example
//!
//! Demonstrates dispatching on a closed set of domain errors by tag:
//! - Exhaustive dispatch with `match_tag`
//! - Fallback dispatch with `match_partial`
//! - Dispatching the error channel of an `Outcome`
//! - What happens when a handler is missing or broken

use std::fmt;

use breakwater::prelude::*;
use breakwater::tagged::{self, try_match_tag};

#[derive(Debug)]
enum OrderError {
    NotFound { id: u64 },
    OutOfStock { sku: String },
    PaymentDeclined { reason: String },
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderError::NotFound { id } => write!(f, "order {} does not exist", id),
            OrderError::OutOfStock { sku } => write!(f, "{} is out of stock", sku),
            OrderError::PaymentDeclined { reason } => write!(f, "payment declined: {}", reason),
        }
    }
}

impl std::error::Error for OrderError {}

impl TaggedError for OrderError {
    fn tag(&self) -> &str {
        match self {
            OrderError::NotFound { .. } => "NotFoundError",
            OrderError::OutOfStock { .. } => "OutOfStockError",
            OrderError::PaymentDeclined { .. } => "PaymentError",
        }
    }
}

fn place_order(id: u64) -> Outcome<String, OrderError> {
    match id {
        1 => Outcome::ok("order 1 confirmed".to_string()),
        2 => Outcome::err(OrderError::OutOfStock {
            sku: "KB-87".to_string(),
        }),
        3 => Outcome::err(OrderError::PaymentDeclined {
            reason: "card expired".to_string(),
        }),
        _ => Outcome::err(OrderError::NotFound { id }),
    }
}

fn http_status(error: OrderError) -> u16 {
    tagged::match_tag(
        error,
        Handlers::new()
            .on("NotFoundError", |_| 404)
            .on("OutOfStockError", |_| 409)
            .on("PaymentError", |_| 402),
    )
}

// ==================== Exhaustive ====================

fn example_exhaustive() {
    println!("\n=== Example 1: Exhaustive Dispatch ===");

    for id in 1..=4 {
        let response = place_order(id).fold(
            |body| format!("200 {}", body),
            |error| format!("{} {}", http_status(error), "request failed"),
        );
        println!("  order {} -> {}", id, response);
    }
}

// ==================== Partial ====================

fn example_partial() {
    println!("\n=== Example 2: Partial Dispatch ===");

    let message = place_order(3).match_err_partial(
        Handlers::new().on("OutOfStockError", |e: OrderError| {
            Outcome::err(format!("backorder: {}", e))
        }),
        |other| Outcome::err(format!("[{}] {}", other.tag(), other.message())),
    );

    println!("  {:?}", message);
}

// ==================== Defects ====================

fn example_defects() {
    println!("\n=== Example 3: Missing Handler ===");

    let missing = try_match_tag(
        OrderError::NotFound { id: 9 },
        Handlers::new().on("PaymentError", |_| 402u16),
    );
    match missing {
        Ok(status) => println!("  status {}", status),
        Err(defect) => println!(
            "  {} (handled: {:?})",
            defect,
            defect.handled_tags()
        ),
    }

    println!("\n=== Example 4: Broken Handler ===");

    let caught = breakwater::panic::catch(|| {
        place_order(2).match_err(Handlers::new().on(
            "OutOfStockError",
            |_| -> Outcome<String, u16> { panic!("inventory service unavailable") },
        ))
    });
    if let Err(defect) = caught {
        println!("  {}", defect);
    }
}

fn main() {
    println!("======================================");
    println!("        Tagged Errors Example         ");
    println!("======================================");

    example_exhaustive();
    example_partial();
    example_defects();

    println!("\n======================================");
    println!("           Examples Complete           ");
    println!("======================================");
}
