use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use telldus_sim::{Config, EventEmitter};

#[derive(Parser)]
#[command(name = "telldus-sim")]
#[command(about = "Simulated telldusd event socket for testing consumers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the event emitter
    Serve {
        /// Socket path to bind (default: /tmp/TelldusEvents)
        #[arg(short, long)]
        socket: Option<PathBuf>,
        /// Send interval, e.g. "5s", "2m" or bare seconds
        #[arg(short, long)]
        interval: Option<String>,
    },
    /// Print the encoded event line once and exit
    Print,
    /// Show version information
    Version,
}

/// Parse interval string like "1h", "30m", "15m", "60s" into seconds.
fn parse_interval(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase();
    if let Some(hours) = s.strip_suffix('h') {
        let n: u64 = hours.parse().with_context(|| "Invalid hours value")?;
        n.checked_mul(3600).context("Interval out of range")
    } else if let Some(mins) = s.strip_suffix('m') {
        let n: u64 = mins.parse().with_context(|| "Invalid minutes value")?;
        n.checked_mul(60).context("Interval out of range")
    } else if let Some(secs) = s.strip_suffix('s') {
        let n: u64 = secs.parse().with_context(|| "Invalid seconds value")?;
        Ok(n)
    } else {
        s.parse::<u64>()
            .with_context(|| "Invalid interval. Use formats like 1h, 30m, or 60s")
    }
}

async fn cmd_serve(socket: Option<PathBuf>, interval: Option<String>) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(socket) = socket {
        config.socket_path = socket;
    }
    if let Some(interval) = interval {
        config.interval_secs = parse_interval(&interval)?;
    }
    config.validate()?;

    let emitter = EventEmitter::new(&config);

    tokio::select! {
        result = emitter.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            emitter.stop().await;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) | None => {
            println!("telldus-sim {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Print) => {
            let config = Config::load()?;
            print!("{}", config.event.encode());
        }
        Some(Commands::Serve { socket, interval }) => {
            cmd_serve(socket, interval).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use telldus_sim::DeviceEvent;

    #[test]
    fn test_parse_interval_suffixes() {
        assert_eq!(parse_interval("5s").unwrap(), 5);
        assert_eq!(parse_interval("2m").unwrap(), 120);
        assert_eq!(parse_interval("1h").unwrap(), 3600);
        assert_eq!(parse_interval("30").unwrap(), 30);
    }

    #[test]
    fn test_parse_interval_rejects_garbage() {
        assert!(parse_interval("soon").is_err());
        assert!(parse_interval("m5").is_err());
    }

    #[test]
    fn test_parse_interval_rejects_overflow() {
        assert!(parse_interval("9999999999999999999h").is_err());
        assert!(parse_interval("9999999999999999999m").is_err());
    }

    #[test]
    fn test_default_print_line() {
        assert_eq!(DeviceEvent::default().encode().len(), 119);
    }
}
