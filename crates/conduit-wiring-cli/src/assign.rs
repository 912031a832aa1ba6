//! `conduit-wiring assign`

use anyhow::{bail, Result};
use colored::Colorize;
use std::fs;

use conduit_wiring_core::{
    run_batch, AssignmentReport, Diagnostic, DiagnosticSink, ExecutionMode, GaugeAssigner,
};
use conduit_wiring_storage::{load_snapshot, save_snapshot, CollectorConfig, Transaction};

use crate::{load_config, AssignArgs};

/// Prints diagnostics to stderr as they arrive.
struct ConsoleSink;

impl DiagnosticSink for ConsoleSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        eprintln!("  {} {}", "!".yellow().bold(), diagnostic);
    }
}

pub fn cmd_assign(args: &AssignArgs) -> Result<()> {
    let mut config = load_config(args.config.as_ref())?;
    if let Some(policy) = args.missing_target {
        config.missing_target = policy.into();
    }
    let assigner = GaugeAssigner::new(config)?;

    let collector_config = if args.all_categories {
        CollectorConfig::all()
    } else if args.categories.is_empty() {
        CollectorConfig::default()
    } else {
        CollectorConfig {
            categories: args.categories.clone(),
        }
    };
    let mode = if args.parallel {
        ExecutionMode::Parallel
    } else {
        ExecutionMode::Sequential
    };

    println!(
        "{} conductors in {}",
        "Assigning".green().bold(),
        args.model.display()
    );
    let mut model = load_snapshot(&args.model)?;

    let mut tx = Transaction::begin(&mut model, "assign wires to conduits");
    let report = run_batch(
        &mut tx.snapshot_mut().collector(&collector_config),
        &assigner,
        &mut ConsoleSink,
        mode,
    )?;

    if args.dry_run {
        tx.rollback();
        println!("  {} dry run, nothing saved", "→".cyan());
    } else {
        let journal = tx.commit();
        let out = args.out.as_ref().unwrap_or(&args.model);
        save_snapshot(out, &model)?;
        println!(
            "  {} {} (changes={})",
            "→".cyan(),
            out.display(),
            journal.changes.len()
        );
        if let Some(path) = &args.journal {
            fs::write(path, journal.to_json_pretty()?)?;
            println!("  {} {}", "→".cyan(), path.display());
        }
    }

    if let Some(path) = &args.report {
        fs::write(path, report.to_json_pretty()?)?;
        println!("  {} {}", "→".cyan(), path.display());
    }

    print_summary(&report);

    if args.strict && !report.is_clean() {
        bail!(
            "assignment finished with {} diagnostics and {} missing targets",
            report.diagnostics_reported,
            report.missing_targets.len()
        );
    }
    Ok(())
}

fn print_summary(report: &AssignmentReport) {
    println!(
        "{} {} elements, {} active slots, {} counters incremented",
        "Done".green().bold(),
        report.elements_processed,
        report.slots_processed,
        report.parameters_incremented
    );
    if report.slots_missing_gauge > 0 {
        println!("  slots without gauge: {}", report.slots_missing_gauge);
    }
    if report.write_failures > 0 {
        println!("  {} write failures: {}", "!".red().bold(), report.write_failures);
    }
    if report.phase_overflows > 0 {
        println!(
            "  {} slots with too many phase conductors: {}",
            "!".yellow().bold(),
            report.phase_overflows
        );
    }
    if !report.missing_targets.is_empty() {
        println!(
            "  {} missing target counters: {}",
            "?".yellow(),
            report.missing_targets.len()
        );
        for missing in report.missing_targets.iter().take(10) {
            println!(
                "    element {} slot {}: {}",
                missing.element, missing.slot, missing.parameter
            );
        }
        if report.missing_targets.len() > 10 {
            println!("    … {} more", report.missing_targets.len() - 10);
        }
    }
}
