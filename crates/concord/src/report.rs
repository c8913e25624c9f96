//! Run reporting.

use colored::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Verdict for one repetition of one case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Fail,
}

/// Outcome of one (case, repetition).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseOutcome {
    /// Case identity.
    pub case: String,
    /// 1-based repetition index.
    pub repetition: u32,
    pub verdict: Verdict,
    /// Distinct trimmed outputs observed across the repetition's runs.
    /// Exactly one entry on a pass.
    pub observed: BTreeSet<String>,
}

/// Aggregate report for a full harness run. Only produced when every
/// repetition passed; any failure aborts the run with an error instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// Selected cases.
    pub cases: usize,
    /// Repetitions executed (cases × repetitions-per-case).
    pub repetitions: usize,
    /// Individual variant runs executed.
    pub runs: usize,
    pub outcomes: Vec<CaseOutcome>,
}

impl RunReport {
    pub fn record(&mut self, outcome: CaseOutcome) {
        self.repetitions += 1;
        self.outcomes.push(outcome);
    }

    /// Print a colored summary to stdout.
    pub fn print_summary(&self) {
        println!("\n{}", "=== Concord Results ===".bold().cyan());
        println!("Cases:       {}", self.cases);
        println!("Repetitions: {}", self.repetitions);
        println!("Runs:        {}", self.runs);
        if self.cases == 0 {
            println!("{}", "No cases matched the selection.".dimmed());
        } else {
            println!("{}", "All variants agreed on every case.".green().bold());
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
