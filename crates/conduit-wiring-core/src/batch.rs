//! Batch runs over every collected element.

use crate::assign::{ElementOutcome, GaugeAssigner};
use crate::diagnostics::{CountingSink, Diagnostic, DiagnosticSink};
use crate::report::AssignmentReport;
use crate::store::{ElementCollector, ElementParameters};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    #[default]
    Sequential,
    /// Elements in parallel on the rayon pool; each element's slots stay in order.
    Parallel,
}

/// Assign conductors on every element the collector yields.
///
/// Only a collector failure ends the run early. Diagnostics reach `sink` in
/// collection order regardless of `mode`.
pub fn run_batch<C>(
    collector: &mut C,
    assigner: &GaugeAssigner,
    sink: &mut dyn DiagnosticSink,
    mode: ExecutionMode,
) -> anyhow::Result<AssignmentReport>
where
    C: ElementCollector,
    C::Element: Send,
{
    let mut report = AssignmentReport::start();
    let elements = collector.collect_elements()?;
    tracing::info!(
        run_id = %report.run_id,
        elements = elements.len(),
        ?mode,
        "starting conductor assignment"
    );

    let mut sink = CountingSink::new(sink);
    match mode {
        ExecutionMode::Sequential => {
            for element in elements {
                let outcome = assigner.assign_element(element, &mut sink);
                report.record(&outcome);
            }
        }
        ExecutionMode::Parallel => {
            let processed: Vec<(ElementOutcome, Vec<Diagnostic>)> = elements
                .into_par_iter()
                .map(|element| assign_buffered(assigner, element))
                .collect();
            for (outcome, diagnostics) in processed {
                for diagnostic in diagnostics {
                    sink.report(diagnostic);
                }
                report.record(&outcome);
            }
        }
    }

    report.diagnostics_reported = sink.count();
    report.finish();
    tracing::info!(
        run_id = %report.run_id,
        slots = report.slots_processed,
        incremented = report.parameters_incremented,
        failures = report.write_failures,
        "conductor assignment finished"
    );
    Ok(report)
}

fn assign_buffered<E>(assigner: &GaugeAssigner, element: &mut E) -> (ElementOutcome, Vec<Diagnostic>)
where
    E: ElementParameters,
{
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let outcome = assigner.assign_element(element, &mut diagnostics);
    (outcome, diagnostics)
}
