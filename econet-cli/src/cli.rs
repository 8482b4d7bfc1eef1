//! CLI argument parsing using clap

use clap::{Parser, ValueEnum};

/// Calendar-relative history window, evaluated against the local wall clock
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Range {
    /// Midnight of the current day through now
    Today,
    /// The full previous calendar day
    Yesterday,
    /// Monday of the current week through now
    ThisWeek,
    /// The full previous week, Monday through Sunday
    PrevWeek,
    /// The 1st of the current month through now
    ThisMonth,
    /// The full previous calendar month
    PrevMonth,
}

/// Econet24 telemetry fetcher
#[derive(Parser, Debug)]
#[command(name = "econet", about = "Fetch heating telemetry from Econet24", version)]
pub struct Args {
    /// History window to fetch after login (prints the device list only if omitted)
    #[arg(short, long, value_enum)]
    pub range: Option<Range>,

    /// Device uid to query (defaults to the first device on the account)
    #[arg(short, long)]
    pub uid: Option<String>,

    /// Base URL of the Econet24 service
    #[arg(long)]
    pub base_url: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}
