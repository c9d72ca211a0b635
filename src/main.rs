//! pingstats - uptime and latency metrics from Pingdom
//!
//! Prints day, week and report aggregations as JSON.

use pingstats::config::Config;
use pingstats::metrics::Metrics;
use pingstats::provider::PingdomClient;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pingstats")]
#[command(about = "Day and week uptime/latency metrics from Pingdom")]
#[command(version)]
struct Args {
    /// Reference day (YYYY-MM-DD), defaults to today
    #[arg(short, long, global = true)]
    date: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Raw results of every check for the day
    Results,
    /// Average latency of every check for the day
    DayLatency,
    /// Uptime ratio of every check for the day
    DayUptime,
    /// Daily average latency for the week ending on the day
    WeekLatency,
    /// Daily uptime ratio for the week ending on the day
    WeekUptime,
    /// Latency and downtime report starting on the day
    Report {
        /// Number of days covered by the report
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    // Initialize logging; stdout carries the JSON output
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("pingstats=info".parse()?))
        .init();

    // Load configuration
    let cfg = Config::load();
    tracing::info!("Using provider at {}", cfg.provider.base_url);

    let client = Arc::new(PingdomClient::new(&cfg.provider)?);
    let metrics = Metrics::new(client, &cfg.aggregation)?;
    let date = args.date.unwrap_or_else(|| metrics.clock().today());

    match args.command {
        Command::Results => print_json(&metrics.check_results(date).await?)?,
        Command::DayLatency => print_json(&metrics.day_latency(date).await?)?,
        Command::DayUptime => print_json(&metrics.day_uptime(date).await?)?,
        Command::WeekLatency => print_json(&metrics.week_latency(date).await?)?,
        Command::WeekUptime => print_json(&metrics.week_uptime(date).await?)?,
        Command::Report { days } => {
            let window = metrics
                .clock()
                .days_window(date, days)
                .ok_or("report window is out of range")?;
            print_json(&metrics.build_report(window).await?)?
        }
    }

    Ok(())
}
