//! User-facing progress output.
//!
//! Errors are not reported through this trait: they are returned to the
//! caller, which decides how to present them.

/// Sink for informational and success messages produced while a run progresses.
pub trait Reporter {
    fn info(&self, message: &str);

    fn success(&self, message: &str);
}

/// Reporter that discards everything.
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn info(&self, _message: &str) {}

    fn success(&self, _message: &str) {}
}
