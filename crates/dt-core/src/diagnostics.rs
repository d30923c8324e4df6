//! Injected observability sink.
//!
//! Library crates never reach for a process-wide logger.  Every component
//! that reports progress or degraded conditions holds a [`Sink`] handed to it
//! by the composition root, and writes [`Diagnostic`]s into it.
//!
//! | Sink            | Behaviour                                              |
//! |-----------------|--------------------------------------------------------|
//! | [`TracingSink`] | Forwards to `tracing` with the component as a field.   |
//! | [`MemorySink`]  | Keeps every diagnostic; used to assert on warnings.    |
//! | [`NoopSink`]    | Discards everything.                                   |
//!
//! Warnings are the recoverable "missing resource" class: the call that
//! emits one still completes with a best-effort result.

use std::fmt;
use std::sync::{Arc, Mutex};

/// Severity of a [`Diagnostic`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Info,
    Warn,
}

/// One message emitted by a component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub level:     Level,
    /// Short static name of the emitting component, e.g. `"scenario"`.
    pub component: &'static str,
    pub message:   String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            Level::Info => "INFO",
            Level::Warn => "WARN",
        };
        write!(f, "[{level} {}] {}", self.component, self.message)
    }
}

/// Destination for diagnostics.  Shared between components via [`Sink`].
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, diagnostic: Diagnostic);
}

/// Shared handle passed to every component.
pub type Sink = Arc<dyn DiagnosticSink>;

/// `info` / `warn` shorthands on the shared handle.
pub trait SinkExt {
    fn info(&self, component: &'static str, message: impl Into<String>);
    fn warn(&self, component: &'static str, message: impl Into<String>);
}

impl SinkExt for Sink {
    fn info(&self, component: &'static str, message: impl Into<String>) {
        self.record(Diagnostic { level: Level::Info, component, message: message.into() });
    }

    fn warn(&self, component: &'static str, message: impl Into<String>) {
        self.record(Diagnostic { level: Level::Warn, component, message: message.into() });
    }
}

// ── TracingSink ───────────────────────────────────────────────────────────────

/// Forwards diagnostics to the `tracing` facade.  The subscriber (if any) is
/// installed by the application, not by library code.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TracingSink {
    pub fn shared() -> Sink {
        Arc::new(TracingSink)
    }
}

impl DiagnosticSink for TracingSink {
    fn record(&self, d: Diagnostic) {
        match d.level {
            Level::Info => tracing::info!(component = d.component, "{}", d.message),
            Level::Warn => tracing::warn!(component = d.component, "{}", d.message),
        }
    }
}

// ── MemorySink ────────────────────────────────────────────────────────────────

/// Collects diagnostics in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of everything recorded so far.
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Only the `Warn` entries.
    pub fn warnings(&self) -> Vec<Diagnostic> {
        self.entries()
            .into_iter()
            .filter(|d| d.level == Level::Warn)
            .collect()
    }

    /// `true` if some warning's message contains `needle`.
    pub fn has_warning(&self, needle: &str) -> bool {
        self.warnings().iter().any(|d| d.message.contains(needle))
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, diagnostic: Diagnostic) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(diagnostic);
    }
}

// ── NoopSink ──────────────────────────────────────────────────────────────────

/// Discards every diagnostic.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl NoopSink {
    pub fn shared() -> Sink {
        Arc::new(NoopSink)
    }
}

impl DiagnosticSink for NoopSink {
    fn record(&self, _diagnostic: Diagnostic) {}
}
