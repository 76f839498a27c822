//! Console implementation of Reporter with error/info/success severities

use gsc_inject_core::Reporter;
use owo_colors::OwoColorize;

/// Colored terminal output
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "[ERROR]".red().bold(), message.red());
    }
}

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn success(&self, message: &str) {
        println!("{}", message.green());
    }
}
