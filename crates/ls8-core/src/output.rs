//! Host collaborator seams: `PRN` output and per-step trace hooks.

use crate::Machine;

/// Hook notified immediately before each instruction fetch during a
/// traced run ([`run_traced`](crate::run_traced)).
pub trait TraceSink {
    /// Observes the machine state ahead of the next fetch.
    fn on_step(&mut self, machine: &Machine);
}

/// Sink for values emitted by `PRN`.
///
/// The core never touches stdout; hosts decide where emitted values go.
pub trait OutputSink {
    /// Records one emitted register value, in program order.
    fn print_value(&mut self, value: u8);
}

/// Sink that collects emitted values in memory, for library callers and
/// tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    values: Vec<u8>,
}

impl CapturedOutput {
    /// Creates an empty capture buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// All values emitted so far, in program order.
    #[must_use]
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    /// Renders the captured values the way the CLI prints them: one
    /// decimal value per line.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.values.iter().map(u8::to_string).collect()
    }
}

impl OutputSink for CapturedOutput {
    fn print_value(&mut self, value: u8) {
        self.values.push(value);
    }
}
