//! Example: comparing retry strategies and driving a flaky call
//!
//! This example demonstrates:
//! 1. The delay schedule each strategy produces
//! 2. Running an unreliable operation through the attempt loop
//! 3. What the caller sees when retries run out
//!
//! Run with:
//! ```bash
//! RUST_LOG=info cargo run -p httpretry-core --example retry_example
//! ```

use httpretry_core::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// A simulated endpoint that fails the first few times
struct UnreliableApi {
    attempts: AtomicU32,
    fail_count: u32,
}

impl UnreliableApi {
    fn new(fail_count: u32) -> Self {
        Self {
            attempts: AtomicU32::new(0),
            fail_count,
        }
    }

    async fn call(&self) -> Result<String, std::io::Error> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);

        if attempt < self.fail_count {
            Err(std::io::Error::other(format!(
                "503 Service Unavailable (call {})",
                attempt + 1
            )))
        } else {
            Ok("API response data".to_string())
        }
    }

    fn total_attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Delay schedules (ms) ===\n");
    let strategies: Vec<(&str, RetryStrategyOptions)> = vec![
        ("no-retry", RetryStrategyOptions::NoRetry),
        (
            "interval",
            RetryStrategyOptions::Interval {
                max_attempts: 5,
                interval_ms: 100,
            },
        ),
        (
            "exponential",
            RetryStrategyOptions::Exponential {
                max_attempts: 5,
                initial_delay_ms: 100,
            },
        ),
        (
            "polynomial",
            RetryStrategyOptions::Polynomial {
                max_attempts: 5,
                initial_delay_ms: 100,
                degree: 2,
            },
        ),
        (
            "fibonacci",
            RetryStrategyOptions::Fibonacci {
                max_attempts: 5,
                initial_delay_ms: 100,
            },
        ),
    ];

    for (name, options) in &strategies {
        let strategy = options.build()?;
        let schedule: Vec<u64> = (0..strategy.max_attempts())
            .map(|attempt| strategy.delay_ms(attempt))
            .collect();
        println!("  {name:<12} {schedule:?}");
    }

    println!("\n=== Flaky call, Fibonacci backoff ===\n");
    let api = UnreliableApi::new(3);
    let strategy = FibonacciBackoff::new(5, 20)?;
    let start = Instant::now();
    let body = execute(&strategy, "https://api.example.com/items", || api.call()).await?;
    println!(
        "  got {body:?} after {} calls in {:?}",
        api.total_attempts(),
        start.elapsed()
    );

    println!("\n=== Exhausted retries ===\n");
    let api = UnreliableApi::new(10);
    let strategy = ConstantInterval::new(2, 10)?;
    match execute(&strategy, "https://api.example.com/items", || api.call()).await {
        Ok(body) => println!("  unexpected success: {body}"),
        Err(err) => println!("  {err}"),
    }

    Ok(())
}
