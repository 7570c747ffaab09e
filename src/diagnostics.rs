//! Side channel for non-fatal warnings.
//!
//! Fill-mode downgrades are reported here instead of through the return
//! value. The CLI routes them to `tracing`; tests collect them to assert on
//! the exact messages.

use tracing::warn;

/// Write-only sink for warnings raised while processing
pub trait Diagnostics {
    fn warn(&mut self, message: &str);
}

/// Forwards every warning to the `tracing` subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&mut self, message: &str) {
        warn!("{}", message);
    }
}

/// Keeps warnings in memory so callers can display them later
#[derive(Debug, Default, Clone)]
pub struct CollectedDiagnostics {
    messages: Vec<String>,
}

impl CollectedDiagnostics {
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

impl Diagnostics for CollectedDiagnostics {
    fn warn(&mut self, message: &str) {
        warn!("{}", message);
        self.messages.push(message.to_string());
    }
}
