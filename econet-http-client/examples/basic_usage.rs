//! Basic usage example for the Econet24 HTTP client
//!
//! This example demonstrates how to:
//! - Create a client with default settings
//! - Create a client with custom base URL (for testing)
//! - Log in and inspect the cached device list
//! - Fetch telemetry over calendar-relative windows
//!
//! Note: this example requires valid Econet24 account credentials, supplied
//! via the ECONET_USERNAME and ECONET_PASSWORD environment variables.

use econet_http_client::{EconetClient, window};
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let username = std::env::var("ECONET_USERNAME")
        .expect("ECONET_USERNAME environment variable not set");
    let password = std::env::var("ECONET_PASSWORD")
        .expect("ECONET_PASSWORD environment variable not set");

    // Example 1: Create a client with default settings
    println!("=== Example 1: Default Client ===");
    let mut client = EconetClient::new()?;
    println!("✓ Client created with default base URL (https://www.econet24.com)");

    // Example 2: Create a client with custom base URL (useful for testing)
    println!("\n=== Example 2: Custom Base URL ===");
    let _custom_client = EconetClient::builder()
        .base_url("https://www.econet24.com")? // Could be a mock server URL for testing
        .build()?;
    println!("✓ Client created with custom base URL");

    // Example 3: Create a client with custom HTTP configuration
    println!("\n=== Example 3: Custom HTTP Configuration ===");
    let _configured_client = EconetClient::builder()
        .client_builder(
            reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(30))
                .use_rustls_tls(),
        )
        .build()?;
    println!("✓ Client created with custom timeout (30s)");

    // Use the default client for the rest of the example
    println!("\n=== Using Default Client ===");

    println!("\nLogging in...");
    match client.login(&username, &password)? {
        Some(response) => println!("✓ Logged in ({})", response.status()),
        None => println!("ℹ Session already established"),
    }

    let devices = client.user_devices();
    println!("✓ {} device(s) on this account", devices.len());
    for uid in devices {
        println!("  - {}", uid);
    }

    // Fetch telemetry for a calendar-relative window
    println!("\nFetching today's telemetry...");
    match client.data_today(None) {
        Ok(payload) => {
            println!("✓ Telemetry fetched successfully");
            println!("Payload: {}", payload);
        }
        Err(e) => {
            println!("✗ Failed to fetch telemetry: {}", e);
        }
    }

    // Deterministic query with an explicit window
    let now = chrono::Local::now().naive_local();
    let last_week = window::prev_week(now);
    println!(
        "\nFetching previous week ({} .. {})...",
        last_week.from_date_param(),
        last_week.to_date_param()
    );
    match client.data_history(last_week, None) {
        Ok(payload) => println!("✓ Previous week fetched ({} bytes pretty-printed)",
            serde_json::to_string_pretty(&payload)?.len()),
        Err(e) => println!("✗ Failed to fetch previous week: {}", e),
    }

    Ok(())
}
