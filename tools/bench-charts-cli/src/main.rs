use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::{Builder, Env};
use log::info;

use bench_charts::config::{load_config, BreakdownConfig, CompareConfig, UnitMode};
use bench_charts::palette::ColorMap;
use bench_charts::render::{ChartSink, MemorySink, PngRenderer};
use bench_charts::report::{breakdown_report, compare_report};
use bench_charts::schema::{breakdown, compare};

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
/// Builds latency charts from block-read benchmark logs
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Build chart models without writing images
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Breakdown of RPC timings next to baseline time from a single CSV file
    Breakdown {
        /// Path to the CSV file
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },
    /// RPC vs baseline comparison from rpc.log and baseline.log
    Compare {
        /// Directory with rpc.log and baseline.log
        #[arg(short, long)]
        log_dir: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Path to a config in YAML format
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for PNG files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Main chart title
    #[arg(short, long)]
    title: Option<String>,

    /// Conversion of nanosecond timings to seconds
    #[arg(short, long, value_enum)]
    units: Option<Units>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Units {
    Force,
    AutoDetect,
    None,
}

impl From<Units> for UnitMode {
    fn from(value: Units) -> Self {
        match value {
            Units::Force => UnitMode::Force,
            Units::AutoDetect => UnitMode::AutoDetect,
            Units::None => UnitMode::None,
        }
    }
}

fn sink(dry_run: bool, components: &[&str]) -> Box<dyn ChartSink> {
    if dry_run {
        Box::new(MemorySink::default())
    } else {
        Box::new(PngRenderer::new(ColorMap::new(components)))
    }
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    let cli = Cli::parse();
    let written = match cli.command {
        Command::Breakdown { input, common } => {
            let mut config: BreakdownConfig = match &common.config {
                Some(path) => load_config(path).context("failed to load breakdown config")?,
                None => Default::default(),
            };
            if let Some(input) = input {
                config.input = input;
            }
            if let Some(dir) = common.output_dir {
                config.output_dir = dir;
            }
            if common.title.is_some() {
                config.title = common.title;
            }
            if let Some(units) = common.units {
                config.unit_mode = units.into();
            }
            let mut sink = sink(cli.dry_run, breakdown::COMPONENTS);
            breakdown_report(&config, sink.as_mut()).context("breakdown report failed")?
        }
        Command::Compare { log_dir, common } => {
            let mut config: CompareConfig = match &common.config {
                Some(path) => load_config(path).context("failed to load compare config")?,
                None => Default::default(),
            };
            if let Some(dir) = log_dir {
                config.log_dir = dir;
            }
            if let Some(dir) = common.output_dir {
                config.output_dir = dir;
            }
            if common.title.is_some() {
                config.title = common.title;
            }
            if let Some(units) = common.units {
                config.unit_mode = units.into();
            }
            let mut sink = sink(cli.dry_run, compare::PARTS);
            let today = chrono::Local::now().date_naive();
            compare_report(&config, today, sink.as_mut()).context("compare report failed")?
        }
    };
    if cli.dry_run {
        for path in written.iter() {
            println!("{}", path.display());
        }
    }
    info!("done: {} charts", written.len());
    Ok(())
}
