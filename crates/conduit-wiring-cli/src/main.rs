//! Conduit wiring CLI
//!
//! - `assign`: count conductors onto every conduit of a model snapshot
//! - `parse`: decode a wiring code
//! - `targets`: show the counter writes for one wiring code and gauge
//! - `config`: print the default configuration

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use conduit_wiring_core::{
    parse_wiring_code, GaugeAssigner, MissingTargetPolicy, Role, WiringConfig,
};

mod assign;
mod logging;

#[derive(Parser)]
#[command(name = "conduit-wiring")]
#[command(author, version, about = "Assign wire conductors to conduit elements")]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Increment conductor counters on every collected element of a model snapshot.
    Assign(AssignArgs),

    /// Decode a wiring code into role counts.
    Parse {
        /// Wiring code, e.g. FFFNT
        code: String,
    },

    /// Show the counter writes one slot would perform.
    Targets {
        /// Wiring code, e.g. FFNT
        #[arg(short, long)]
        wiring: String,
        /// Raw gauge as stored in the model, e.g. 1.5
        #[arg(short, long)]
        gauge: String,
        /// Configuration JSON (defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the default configuration as JSON.
    Config {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct AssignArgs {
    /// Model snapshot JSON
    #[arg(short, long)]
    pub model: PathBuf,
    /// Configuration JSON (defaults when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Categories to collect (repeatable); defaults to conduits and cable trays
    #[arg(long = "category")]
    pub categories: Vec<String>,
    /// Collect every element regardless of category
    #[arg(long, conflicts_with = "categories")]
    pub all_categories: bool,
    /// Override the configured handling of missing target counters
    #[arg(long, value_enum)]
    pub missing_target: Option<MissingTargetArg>,
    /// Updated snapshot destination (default: overwrite --model)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    /// Write the assignment report as JSON
    #[arg(long)]
    pub report: Option<PathBuf>,
    /// Write the journal of parameter changes as JSON
    #[arg(long)]
    pub journal: Option<PathBuf>,
    /// Process elements in parallel
    #[arg(long)]
    pub parallel: bool,
    /// Run without committing or saving anything
    #[arg(long)]
    pub dry_run: bool,
    /// Exit with an error if any diagnostic or missing target was recorded
    #[arg(long)]
    pub strict: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MissingTargetArg {
    Ignore,
    Record,
    Warn,
}

impl From<MissingTargetArg> for MissingTargetPolicy {
    fn from(arg: MissingTargetArg) -> Self {
        match arg {
            MissingTargetArg::Ignore => MissingTargetPolicy::Ignore,
            MissingTargetArg::Record => MissingTargetPolicy::Record,
            MissingTargetArg::Warn => MissingTargetPolicy::Warn,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Assign(args) => assign::cmd_assign(&args),
        Commands::Parse { code } => cmd_parse(&code),
        Commands::Targets {
            wiring,
            gauge,
            config,
        } => cmd_targets(&wiring, &gauge, config.as_ref()),
        Commands::Config { out } => cmd_config(out.as_ref()),
    }
}

pub(crate) fn load_config(path: Option<&PathBuf>) -> Result<WiringConfig> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            Ok(WiringConfig::from_json_file(path)?)
        }
        None => Ok(WiringConfig::default()),
    }
}

fn cmd_parse(code: &str) -> Result<()> {
    let counts = parse_wiring_code(code);
    println!("{} {:?}", "Wiring".green().bold(), code);
    if counts.is_empty() {
        println!("  (no conductors)");
        return Ok(());
    }
    for (tag, count) in counts.iter() {
        let label = Role::from_tag(tag)
            .map(|role| role.label().to_string())
            .unwrap_or_else(|| "ignored".dimmed().to_string());
        println!("  {} {:<8} {}", tag.to_string().cyan(), label, count);
    }
    println!("  total {}", counts.total());
    Ok(())
}

fn cmd_targets(wiring: &str, gauge: &str, config: Option<&PathBuf>) -> Result<()> {
    let assigner = GaugeAssigner::new(load_config(config)?)?;
    let plan = assigner.plan(wiring, gauge);

    println!(
        "{} wiring {:?} at gauge {}",
        "Targets".green().bold(),
        wiring,
        plan.gauge
    );
    for increment in &plan.increments {
        println!("  {} {} +{}", "→".cyan(), increment.target, increment.amount);
    }
    if plan.increments.is_empty() {
        println!("  (nothing to write)");
    }
    if let Some(count) = plan.phase_overflow {
        println!(
            "  {} {} phase conductors, only {} phase letters",
            "!".yellow().bold(),
            count,
            assigner.targets().phase_letters().len()
        );
    }
    Ok(())
}

fn cmd_config(out: Option<&PathBuf>) -> Result<()> {
    let json = WiringConfig::default().to_json_pretty()?;
    match out {
        Some(path) => {
            fs::write(path, format!("{json}\n"))?;
            println!("{} {}", "Wrote".green().bold(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
