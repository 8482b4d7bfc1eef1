//! Econet24 HTTP Client Library
//!
//! This library is a thin blocking client for the Econet24 web service used
//! by ecoNET-equipped heating and solar installations. It handles
//! session-cookie authentication and fetches the account's device list and
//! historical telemetry over calendar-relative windows.
//!
//! # Features
//!
//! - Session-cookie login with an idempotent short-circuit
//! - Device list fetching, cached at login for use as the default device
//! - History queries over explicit or calendar-relative time windows
//!   (today, yesterday, this/previous week, this/previous month)
//! - Secure TLS using rustls (no OpenSSL dependencies)
//! - Blocking synchronous API
//! - Well-typed errors using thiserror
//!
//! Telemetry payloads are opaque JSON and returned verbatim; no schema
//! validation is performed.
//!
//! # Example
//!
//! ```no_run
//! use econet_http_client::EconetClient;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = EconetClient::new()?;
//! client.login("username", "password")?;
//!
//! for uid in client.user_devices() {
//!     println!("device: {uid}");
//! }
//!
//! // Calendar-relative windows, evaluated against the local wall clock
//! let today = client.data_today(None)?;
//! let last_month = client.data_prev_month(None)?;
//! println!("{today}\n{last_month}");
//!
//! // Deterministic queries take an explicit window instead
//! use econet_http_client::window;
//! let now = chrono::Local::now().naive_local();
//! let report = client.data_history(window::prev_week(now), Some("device-uid"))?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
pub mod window;

pub use client::{EconetClient, EconetClientBuilder};
pub use error::EconetError;
pub use window::TimeWindow;
