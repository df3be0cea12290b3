use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use bean_counter::config::{Keep, MachineConfig};
use bean_counter::experiment::Experiment;
use bean_counter::machine::Mode;
use bean_counter::render::{counts_row, LatticeView};

/// Debug token accepted after the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Trace {
    Debug,
}

/// Drop beans through a Galton board and print the slot counts.
#[derive(Parser)]
#[command(
    name = "bean-counter",
    about = "Galton board simulation",
    after_help = "Examples:\n  bean-counter 10 400 luck\n  bean-counter 20 1000 skill debug"
)]
struct Cli {
    /// Number of slots in the machine
    slot_count: Option<usize>,

    /// Number of beans to drop
    bean_count: Option<usize>,

    /// Decision mode: luck or skill
    #[arg(value_enum)]
    mode: Option<Mode>,

    /// Print the board after every step
    #[arg(value_enum)]
    debug: Option<Trace>,

    /// Path to TOML configuration file
    #[arg(long, default_value = "bean_counter.toml")]
    config: PathBuf,

    /// Seed for the random source
    #[arg(long)]
    seed: Option<u64>,

    /// Keep only the upper or lower half of the settled beans
    #[arg(long, value_enum)]
    keep: Option<Keep>,

    /// Run the same beans again this many times
    #[arg(long)]
    repeats: Option<usize>,

    /// Print one JSON report per run instead of the slot row
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut config = MachineConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(slot_count) = cli.slot_count {
        config.slot_count = slot_count;
    }
    if let Some(bean_count) = cli.bean_count {
        config.bean_count = bean_count;
    }
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.keep.is_some() {
        config.keep = cli.keep;
    }
    if let Some(repeats) = cli.repeats {
        config.repeats = repeats;
    }
    config.validate().context("invalid settings")?;

    let debug = cli.debug.is_some();
    let field_width = config.field_width;
    let experiment = Experiment::new(config);
    let mut board = experiment.build_board();

    if debug {
        println!("{}", LatticeView::new(&board, field_width));
    }
    let reports = experiment.run_with(&mut board, |b| {
        if debug {
            println!("{}", LatticeView::new(b, field_width));
        }
    });

    if cli.json {
        for report in &reports {
            println!(
                "{}",
                serde_json::to_string(report).context("serializing run report")?
            );
        }
        return Ok(());
    }

    // Display experimental results
    println!("Slot bean counts:");
    for report in &reports {
        println!("{}", counts_row(&report.slot_counts, field_width));
    }
    if let Some(last) = reports.last() {
        println!("Average slot: {:.3}", last.average);
    }
    Ok(())
}
