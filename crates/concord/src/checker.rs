//! Incremental cross-variant result reconciliation.
//!
//! One checker instance covers one (case, repetition): it consumes run
//! results as they arrive and decides after each one whether the
//! repetition can still pass, has already failed, or has passed.

use std::collections::BTreeSet;

use crate::runner::RunResult;

/// Where the checker stands after the latest result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    /// Still waiting for results; everything seen so far agrees.
    Collecting,
    /// A disagreement was detected. Terminal.
    Failed,
    /// Every scheduled run reported and all outputs agreed. Terminal.
    Passed,
}

/// Reconciliation state machine for a single case repetition.
#[derive(Debug)]
pub struct ConsistencyChecker {
    expected_runs: usize,
    seen: usize,
    observed: BTreeSet<String>,
    disagreement: Option<(String, String)>,
    state: CheckState,
}

impl ConsistencyChecker {
    /// `expected_runs` is the number of (variant, degree) pairs scheduled
    /// for this repetition; the orchestrator guarantees it is at least 1.
    pub fn new(expected_runs: usize) -> Self {
        debug_assert!(expected_runs > 0);
        Self {
            expected_runs,
            seen: 0,
            observed: BTreeSet::new(),
            disagreement: None,
            state: CheckState::Collecting,
        }
    }

    /// Feed one result and return the state after the transition.
    ///
    /// The first output that differs from an already-observed one is
    /// conclusive: the checker moves to `Failed` and ignores anything fed
    /// to it afterwards, so running fewer or more post-disagreement runs
    /// cannot change the verdict. The conflicting value is recorded before
    /// the transition so the failure report names both sides.
    pub fn observe(&mut self, result: &RunResult) -> CheckState {
        if self.state != CheckState::Collecting {
            return self.state;
        }

        if !self.observed.is_empty() && !self.observed.contains(&result.output) {
            let first = self
                .observed
                .iter()
                .next()
                .cloned()
                .unwrap_or_default();
            self.disagreement = Some((first, result.output.clone()));
            self.observed.insert(result.output.clone());
            self.state = CheckState::Failed;
            return self.state;
        }

        self.observed.insert(result.output.clone());
        self.seen += 1;
        if self.seen == self.expected_runs {
            self.state = CheckState::Passed;
        }
        self.state
    }

    pub fn state(&self) -> CheckState {
        self.state
    }

    /// Distinct outputs seen so far. At most one entry unless `Failed`.
    pub fn observed(&self) -> &BTreeSet<String> {
        &self.observed
    }

    /// The first pair of values found to disagree, once `Failed`.
    pub fn disagreement(&self) -> Option<(&str, &str)> {
        self.disagreement
            .as_ref()
            .map(|(a, b)| (a.as_str(), b.as_str()))
    }

    /// The single agreed value, once `Passed`.
    pub fn agreed(&self) -> Option<&str> {
        match self.state {
            CheckState::Passed => self.observed.iter().next().map(String::as_str),
            _ => None,
        }
    }
}
