//! Non-fatal conditions raised while assigning conductors.

use crate::store::{ElementId, WriteError};
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Diagnostic {
    #[error("element {element}, slot {slot}: could not write {parameter}: {error}")]
    WriteFailed {
        element: ElementId,
        slot: usize,
        parameter: String,
        error: WriteError,
    },

    #[error("element {element}, slot {slot}: {count} phase conductors exceed the {max} phase letters")]
    TooManyPhaseConductors {
        element: ElementId,
        slot: usize,
        count: usize,
        max: usize,
    },

    #[error("element {element}, slot {slot}: target parameter {parameter} not found")]
    MissingTarget {
        element: ElementId,
        slot: usize,
        parameter: String,
    },
}

impl Diagnostic {
    pub fn element(&self) -> ElementId {
        match self {
            Diagnostic::WriteFailed { element, .. }
            | Diagnostic::TooManyPhaseConductors { element, .. }
            | Diagnostic::MissingTarget { element, .. } => *element,
        }
    }
}

impl Serialize for Diagnostic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Where diagnostics go. Reporting never stops a batch.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// Emits every diagnostic as a `tracing` warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(element = %diagnostic.element(), "{diagnostic}");
    }
}

/// Counts diagnostics on their way to another sink.
#[derive(Debug)]
pub struct CountingSink<S> {
    inner: S,
    count: usize,
}

impl<S: DiagnosticSink> CountingSink<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, count: 0 }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: DiagnosticSink> DiagnosticSink for CountingSink<S> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.count += 1;
        self.inner.report(diagnostic);
    }
}
