//! Conduit wiring core
//!
//! Turns the per-slot circuit parameters of a conduit-like element into
//! conductor counts on that element:
//!
//! ```text
//!  slot n: "<n>.3. Wiring" = "FFNT"      "<n>.4. Gauge" = "1.5"
//!                 │                                │
//!                 ▼                                ▼
//!        parse_wiring_code()               Gauge::normalize()
//!          {F:2, N:1, T:1}                       "1,5"
//!                 └──────────────┬─────────────────┘
//!                                ▼
//!                    GaugeAssigner (TargetTable)
//!                                │
//!        1,5mm²_Phase A +1   1,5mm²_Phase B +1
//!        1,5mm²_Neutral +1   1,5mm²_Ground  +1
//! ```
//!
//! The host model is reached only through the capability traits in
//! [`store`]; nothing in this crate knows about a concrete CAD application.
//! `conduit-wiring-storage` provides a JSON snapshot implementation.

pub mod assign;
pub mod batch;
pub mod config;
pub mod diagnostics;
pub mod gauge;
pub mod report;
pub mod store;
pub mod target;
pub mod wiring;

pub use assign::{ElementOutcome, GaugeAssigner, PlannedIncrement, SlotOutcome, SlotPlan};
pub use batch::{run_batch, ExecutionMode};
pub use config::{ConfigError, MissingTargetPolicy, SlotConfig, WiringConfig};
pub use diagnostics::{CountingSink, Diagnostic, DiagnosticSink, TracingSink};
pub use gauge::Gauge;
pub use report::{AssignmentReport, MissingTarget};
pub use store::{
    ElementCollector, ElementId, ElementParameters, Parameter, ParameterValue, WriteError,
};
pub use target::{TargetKind, TargetName, TargetTable};
pub use wiring::{parse_wiring_code, Role, RoleCounts};
