//! tickwatch CLI: one-shot analysis, continuous watch, and config commands.
//!
//! Commands:
//! - `analyze`: fetch one symbol, analyze the latest bar and print the result
//! - `watch`: refresh a watch list every `refresh_secs` and print each cycle
//! - `config`: print the default watch configuration as TOML

use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use tickwatch_core::data::{
    BarSource, CircuitBreaker, CsvSource, SyntheticSource, VolatilityReading, YahooSource,
};
use tickwatch_core::domain::Interval;
use tickwatch_runner::{
    analyze_symbol, render_detail, render_summary, render_volatility, watch, WatchConfig,
};

/// Bars per synthetic window: one regular session of 1-minute bars.
const SYNTHETIC_BARS: usize = 390;

/// Exit status on a second interrupt (128 + SIGINT).
const INTERRUPTED: i32 = 130;

#[derive(Parser)]
#[command(
    name = "tickwatch",
    about = "tickwatch: intraday technical signal monitor"
)]
struct Cli {
    /// Default log filter when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Where bars come from. Yahoo Finance when neither flag is given.
#[derive(Args)]
struct SourceArgs {
    /// Read `<SYMBOL>.csv` files from this directory.
    #[arg(long, conflicts_with = "synthetic")]
    csv_dir: Option<PathBuf>,

    /// Use deterministic synthetic bars (offline).
    #[arg(long, default_value_t = false)]
    synthetic: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the latest bar of one symbol.
    Analyze {
        /// Symbol to analyze (e.g., TSLA).
        #[arg(long)]
        symbol: String,

        /// Bar interval: 1m, 2m, 5m, 15m, 30m, 60m, 1d.
        #[arg(long, default_value = "1m")]
        interval: Interval,

        /// Volatility gauge symbol.
        #[arg(long, default_value = "^VIX")]
        volatility_symbol: String,

        /// Bar interval of the volatility gauge.
        #[arg(long, default_value = "2m")]
        volatility_interval: Interval,

        /// Print the result as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// Refresh a watch list on a fixed cadence.
    Watch {
        /// Path to a TOML watch config. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Symbols to watch (overrides the config file).
        #[arg(long, num_args = 1..)]
        symbols: Vec<String>,

        /// Bar interval (overrides the config file).
        #[arg(long)]
        interval: Option<Interval>,

        /// Seconds between cycles (overrides the config file).
        #[arg(long)]
        refresh_secs: Option<u64>,

        /// Stop after this many cycles. Runs until interrupted when omitted.
        #[arg(long)]
        cycles: Option<usize>,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the default watch configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Analyze {
            symbol,
            interval,
            volatility_symbol,
            volatility_interval,
            json,
            source,
        } => run_analyze(
            &symbol,
            interval,
            &volatility_symbol,
            volatility_interval,
            json,
            &source,
        ),
        Commands::Watch {
            config,
            symbols,
            interval,
            refresh_secs,
            cycles,
            source,
        } => run_watch(config, symbols, interval, refresh_secs, cycles, &source),
        Commands::Config => {
            print!("{}", WatchConfig::default().to_toml()?);
            Ok(())
        }
    }
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("tickwatch={default_level},{default_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn build_source(args: &SourceArgs) -> Result<Box<dyn BarSource>> {
    if let Some(dir) = &args.csv_dir {
        if !dir.is_dir() {
            bail!("--csv-dir {} is not a directory", dir.display());
        }
        return Ok(Box::new(CsvSource::new(dir)));
    }
    if args.synthetic {
        return Ok(Box::new(SyntheticSource::new(SYNTHETIC_BARS)));
    }
    let circuit_breaker = Arc::new(CircuitBreaker::default_provider());
    let source = YahooSource::new(circuit_breaker).context("build Yahoo Finance client")?;
    Ok(Box::new(source))
}

/// Set `cancel` on the first interrupt so the watch loop stops after its
/// current cycle. A second interrupt exits immediately.
fn spawn_interrupt_handler<S, F>(mut next_interrupt: S, cancel: Arc<AtomicBool>) -> Result<()>
where
    S: FnMut() -> F + Send + 'static,
    F: Future<Output = io::Result<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build signal runtime")?;
    thread::Builder::new()
        .name("interrupt".into())
        .spawn(move || {
            if let Err(e) = runtime.block_on(next_interrupt()) {
                warn!(error = %e, "cannot listen for interrupts");
                return;
            }
            info!("interrupt received, stopping after the current cycle");
            cancel.store(true, Ordering::Relaxed);
            if runtime.block_on(next_interrupt()).is_ok() {
                std::process::exit(INTERRUPTED);
            }
        })
        .context("spawn interrupt handler")?;
    Ok(())
}

fn run_analyze(
    symbol: &str,
    interval: Interval,
    volatility_symbol: &str,
    volatility_interval: Interval,
    json: bool,
    args: &SourceArgs,
) -> Result<()> {
    let source = build_source(args)?;
    let symbol = symbol.trim().to_uppercase();
    let config = WatchConfig::default().analysis;

    let volatility =
        VolatilityReading::fetch(source.as_ref(), volatility_symbol, volatility_interval);
    let result = analyze_symbol(
        source.as_ref(),
        &symbol,
        interval,
        &config,
        None,
        Some(volatility.change),
    )
    .with_context(|| format!("{symbol} unavailable"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", render_volatility(volatility_symbol, &volatility));
        println!();
        println!("{}", render_summary(&result));
        println!();
        println!("{}", render_detail(&result));
    }
    Ok(())
}

fn run_watch(
    config_path: Option<PathBuf>,
    symbols: Vec<String>,
    interval: Option<Interval>,
    refresh_secs: Option<u64>,
    cycles: Option<usize>,
    args: &SourceArgs,
) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => WatchConfig::from_file(path)
            .with_context(|| format!("load watch config {}", path.display()))?,
        None => WatchConfig::default(),
    };
    if !symbols.is_empty() {
        config.symbols = symbols;
    }
    if let Some(interval) = interval {
        config.interval = interval;
    }
    if let Some(secs) = refresh_secs {
        config.refresh_secs = secs;
    }
    config.normalize_symbols();
    config.validate()?;

    if cycles == Some(0) {
        bail!("--cycles must be at least 1");
    }

    let source = build_source(args)?;
    info!(source = source.name(), symbols = ?config.symbols, "starting watch");

    let cancel = Arc::new(AtomicBool::new(false));
    spawn_interrupt_handler(tokio::signal::ctrl_c, Arc::clone(&cancel))?;

    let stdout = io::stdout();
    let mut sink = stdout.lock();
    watch(source.as_ref(), &config, &mut sink, &cancel, cycles)?;
    sink.flush()?;
    Ok(())
}
