use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hangwatch::app::{App, Scenario};
use hangwatch::duration::parse_duration;
use hangwatch::observer::OutputFormat;
use hangwatch::settings::{self, Overrides};

#[derive(Parser, Debug)]
#[command(name = "hangwatch")]
#[command(about = "Watch a simulated UI loop for hangs and print alerts as they change")]
struct Args {
    /// TOML settings file (values use the *_ms keys of the watchdog config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    /// Stall to inject into the monitored loop; repeat for a sequence (e.g. --stall 150ms --stall 400ms)
    #[arg(short, long = "stall")]
    stalls: Vec<String>,

    /// Time between injected stalls
    #[arg(long, default_value = "1s")]
    every: String,

    /// Stop after this long instead of waiting for Ctrl-C
    #[arg(long)]
    run_for: Option<String>,

    /// How alert changes are printed
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let mut config = settings::load(args.config.as_deref())?;
    args.overrides.apply(&mut config)?;

    let stalls = args
        .stalls
        .iter()
        .map(|s| parse_duration(s).with_context(|| format!("invalid --stall {:?}", s)))
        .collect::<Result<Vec<_>>>()?;
    let scenario = Scenario {
        stalls,
        every: parse_duration(&args.every).context("invalid --every")?,
    };
    let run_for = args
        .run_for
        .as_deref()
        .map(parse_duration)
        .transpose()
        .context("invalid --run-for")?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(App::new(config, scenario, args.format, run_for).run())
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},hangwatch_sdk=info", default_level)));

    // Alerts go to stdout; keep logs on stderr so the two can be split.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
