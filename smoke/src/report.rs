use crate::retry::Retried;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use tabled::{Style, Table, Tabled};

/// The outcome of one probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct ProbeResult {
    #[tabled(rename = "PROBE")]
    pub name: String,
    #[tabled(rename = "RESULT")]
    #[tabled(display_with = "display_passed")]
    pub passed: bool,
    #[tabled(rename = "ATTEMPTS")]
    pub attempts: u32,
    #[tabled(rename = "DETAILS")]
    pub message: String,
}

impl ProbeResult {
    /// Summarize a retried probe. `describe` turns the passing value into a one-line message.
    pub fn from_retried<T, F>(name: &str, retried: &Retried<T>, describe: F) -> Self
    where
        F: FnOnce(&T) -> String,
    {
        let (passed, message) = match &retried.result {
            Ok(value) => (true, describe(value)),
            Err(e) => (false, e.to_string()),
        };
        Self {
            name: name.to_string(),
            passed,
            attempts: retried.attempts,
            message,
        }
    }
}

fn display_passed(passed: &bool) -> String {
    if *passed { "passed" } else { "failed" }.to_string()
}

/// `Report` collects the results of the probes that were run. `Display` renders a table, and
/// `serde_json` can be used to create a json representation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub results: Vec<ProbeResult>,
}

impl Report {
    pub fn push(&mut self, result: ProbeResult) {
        self.results.push(result)
    }

    /// `true` if every probe passed. An empty report has not passed.
    pub fn passed(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(|result| result.passed)
    }

    pub fn failed(&self) -> impl Iterator<Item = &ProbeResult> {
        self.results.iter().filter(|result| !result.passed)
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let table = Table::new(self.results.clone()).with(Style::blank()).to_string();
        write!(f, "{}", table)
    }
}
