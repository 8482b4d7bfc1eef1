//! econet - interactive demo client for the Econet24 telemetry service

mod cli;
mod error;

use clap::Parser;
use cli::{Args, Range};
use econet_http_client::EconetClient;
use error::CliError;
use std::time::Duration;
use zeroize::Zeroizing;

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let mut client = build_client(&args)?;

    let username = prompt_line("Username: ")?;
    let password = Zeroizing::new(rpassword::prompt_password("Password: ")?);

    client.login(&username, &password)?;

    let devices = client.get_user_devices()?;
    println!("{}", serde_json::to_string_pretty(&devices)?);

    if let Some(range) = args.range {
        let uid = args.uid.as_deref();
        let payload = match range {
            Range::Today => client.data_today(uid),
            Range::Yesterday => client.data_yesterday(uid),
            Range::ThisWeek => client.data_this_week(uid),
            Range::PrevWeek => client.data_prev_week(uid),
            Range::ThisMonth => client.data_this_month(uid),
            Range::PrevMonth => client.data_prev_month(uid),
        }?;
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }

    Ok(())
}

/// Build the client from CLI args
fn build_client(args: &Args) -> Result<EconetClient, CliError> {
    let mut builder = EconetClient::builder();

    if let Some(base_url) = &args.base_url {
        builder = builder.base_url(base_url.as_str())?;
    }

    if let Some(secs) = args.timeout {
        builder = builder.client_builder(
            reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(secs))
                .use_rustls_tls(),
        );
    }

    Ok(builder.build()?)
}

/// Prompt for a single line on stdin, trimmed
fn prompt_line(prompt: &str) -> Result<String, CliError> {
    use std::io::Write;
    print!("{}", prompt);
    std::io::stdout().flush().ok();

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
