//! Accumulator for compiler toolchain diagnostics.
//!
//! The front end reports human-readable diagnostic text alongside most
//! operations (module loading, composition, linking). The driver echoes
//! accumulated text to stdout whenever it is non-empty, regardless of
//! whether the operation succeeded.

/// Collects diagnostic text emitted by front-end operations.
///
/// Single-threaded: modules are processed one at a time, so no locking
/// is needed. Drained between operations so each echo covers exactly
/// one module's pipeline stage.
#[derive(Debug, Default)]
pub struct Diagnostics {
    messages: Vec<String>,
}

impl Diagnostics {
    /// Creates a new empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a diagnostic message. Empty messages are ignored.
    pub fn emit(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !message.is_empty() {
            self.messages.push(message);
        }
    }

    /// Returns `true` if no diagnostics have been emitted.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Takes all accumulated messages, leaving the accumulator empty.
    pub fn take_all(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }
}
