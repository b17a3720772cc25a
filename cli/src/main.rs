//! Pulsewatch CLI
//!
//! Command-line interface for recording pulse counts and querying the pulse log.
//!
//! # Usage
//!
//! ```bash
//! pulsewatch --help
//! pulsewatch record --device /dev/ttyUSB0 --log-file pulses.txt
//! pulsewatch query --start-date 2024-01-01 --end-date 2024-01-02 --points 6
//! ```

#![deny(unsafe_code)]

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use shared::models::{Bucket, TIMESTAMP_FORMAT};
use shared::pipeline::run_query;
use shared::query::{parse_date, WindowQuery};
use shared::recorder::{Clock, Recorder, RecorderStats};
use shared::storage::PulseLog;
use std::fs::File;
use std::future::Future;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

/// Pulsewatch CLI - record and query pulse counts
#[derive(Parser)]
#[command(name = "pulsewatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Pulse log file
    #[arg(
        short,
        long,
        global = true,
        env = "PULSEWATCH_LOG_FILE",
        default_value = "pulses.txt"
    )]
    log_file: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Append readings from a serial device to the pulse log
    Record {
        /// Serial device to read from (line discipline and baud rate are set by the OS)
        #[arg(short, long, env = "PULSEWATCH_DEVICE")]
        device: PathBuf,
    },
    /// Print the bucketed series for a date/time window
    Query(QueryArgs),
}

#[derive(Args)]
struct QueryArgs {
    /// First date (YYYY-MM-DD), defaults to yesterday
    #[arg(long)]
    start_date: Option<String>,

    /// Last date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    end_date: Option<String>,

    /// Time of day on the first date (HH:MM)
    #[arg(long, default_value = "00:00")]
    start_time: String,

    /// Time of day on the last date (HH:MM)
    #[arg(long, default_value = "23:59")]
    end_time: String,

    /// Measurements summed into each point; values below 1 act as 1
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    points: i64,

    /// Print JSON instead of tab-separated lines
    #[arg(long)]
    json: bool,
}

impl QueryArgs {
    fn window_query(&self, today: NaiveDate) -> Result<WindowQuery> {
        let start_date = match &self.start_date {
            Some(date) => parse_date(date)?,
            None => today - Duration::days(1),
        };
        let end_date = match &self.end_date {
            Some(date) => parse_date(date)?,
            None => today,
        };

        Ok(WindowQuery::new(start_date, end_date)
            .with_start_time(self.start_time.clone())
            .with_end_time(self.end_time.clone())
            .with_points(self.points))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Record { device }) => record(&device, &cli.log_file).await?,
        Some(Commands::Query(args)) => {
            let stdout = std::io::stdout();
            query(&cli.log_file, &args, &mut stdout.lock())?;
        }
        None => {
            println!("Pulsewatch CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

/// Records from `device` into `log_file` until the device closes, Ctrl+C or
/// SIGTERM.
async fn record(device: &Path, log_file: &Path) -> Result<()> {
    let input = File::open(device)
        .with_context(|| format!("Failed to open device {}", device.display()))?;
    let output = PulseLog::new(log_file).appender()?;

    tracing::info!(
        device = %device.display(),
        log_file = %log_file.display(),
        "Recording. Press Ctrl+C to stop."
    );

    let recorder = Recorder::new(BufReader::new(input), output);
    let stats = record_until(recorder, stop_signal()).await?;

    tracing::info!(
        lines_written = stats.lines_written,
        log_file = %log_file.display(),
        "Recorder finished"
    );
    Ok(())
}

/// Runs `recorder` until its input ends or `stop` completes.
///
/// The recorder blocks on device reads, so it runs on its own thread and is
/// left behind if `stop` fires while it waits for a reading. Every written
/// line is already flushed at that point.
async fn record_until<R, W, C>(
    mut recorder: Recorder<R, W, C>,
    stop: impl Future<Output = ()>,
) -> Result<RecorderStats>
where
    R: BufRead + Send + 'static,
    W: Write + Send + 'static,
    C: Clock + Send + 'static,
{
    let lines_written = recorder.lines_written_handle();
    let (tx, rx) = tokio::sync::oneshot::channel();
    std::thread::spawn(move || {
        let _ = tx.send(recorder.run());
    });

    let stats = tokio::select! {
        result = rx => result.context("Recorder thread exited unexpectedly")??,
        () = stop => RecorderStats {
            lines_written: lines_written.load(Ordering::Relaxed),
        },
    };
    Ok(stats)
}

/// Waits for Ctrl+C or SIGTERM.
async fn stop_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Recording stopped by user"),
        () = terminate => tracing::info!("Received SIGTERM, stopping recording"),
    }
}

/// Runs one series query and writes the buckets to `out`.
fn query(log_file: &Path, args: &QueryArgs, out: &mut impl Write) -> Result<()> {
    let window = args.window_query(Local::now().date_naive())?;
    let buckets = run_query(&PulseLog::new(log_file), &window)?;
    write_buckets(&buckets, args.json, out)
}

fn write_buckets(buckets: &[Bucket], json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, buckets)?;
        writeln!(out)?;
    } else {
        for bucket in buckets {
            writeln!(
                out,
                "{}\t{}",
                bucket.timestamp.format(TIMESTAMP_FORMAT),
                bucket.value
            )?;
        }
    }
    Ok(())
}
