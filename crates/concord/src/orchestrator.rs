//! The sequential test-orchestration loop.

use colored::*;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::cases::TestCase;
use crate::catalog::{PrecisionMode, VariantCatalog};
use crate::checker::{CheckState, ConsistencyChecker};
use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::report::{CaseOutcome, RunReport, Verdict};
use crate::runner::Runner;

/// Drives every selected case through every applicable variant at every
/// concurrency degree, several repetitions per case, strictly one run at
/// a time.
///
/// Sequential execution is what makes the shared input/output file pair
/// safe: at most one run is ever in flight, so no locking is needed. Do
/// not parallelize case or variant execution without first isolating
/// staging and output collection per run.
pub struct Orchestrator<'a> {
    config: &'a HarnessConfig,
    catalog: &'a VariantCatalog,
    artifacts: &'a HashMap<String, PathBuf>,
    runner: Runner<'a>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        config: &'a HarnessConfig,
        catalog: &'a VariantCatalog,
        artifacts: &'a HashMap<String, PathBuf>,
    ) -> Self {
        Self {
            config,
            catalog,
            artifacts,
            runner: Runner::new(config),
        }
    }

    /// Run all repetitions of all cases, in order. The first failing
    /// repetition aborts the whole run; a case advances to the next one
    /// only after every repetition passed.
    pub fn run(&self, cases: &[TestCase]) -> Result<RunReport, HarnessError> {
        let mut report = RunReport {
            cases: cases.len(),
            ..Default::default()
        };

        for (index, case) in cases.iter().enumerate() {
            // repetitions are clustered per case: races tend to show up
            // under repeated runs of the same input, not across inputs
            for repetition in 1..=self.config.repetitions {
                let outcome = self.run_repetition(index, case, repetition, &mut report)?;
                report.record(outcome);
            }
        }

        Ok(report)
    }

    fn run_repetition(
        &self,
        index: usize,
        case: &TestCase,
        repetition: u32,
        report: &mut RunReport,
    ) -> Result<CaseOutcome, HarnessError> {
        println!(
            "🟡🟡🟡🟡 Running case #{} {} (repetition {}/{}) 🟡🟡🟡🟡",
            index, case.name, repetition, self.config.repetitions
        );

        self.stage_input(case)?;

        if case.precision == PrecisionMode::Extended {
            println!(
                "🟡 Case #{} {} is an extended-precision case 🟡\n",
                index, case.name
            );
        }

        let variants = self.catalog.applicable(case.precision);
        if variants.is_empty() {
            return Err(HarnessError::Config(format!(
                "no {:?}-precision variant can run case '{}'",
                case.precision, case.name
            )));
        }

        let expected_runs: usize = variants.iter().map(|v| v.kind.degrees().len()).sum();
        let mut checker = ConsistencyChecker::new(expected_runs);

        'runs: for variant in &variants {
            let artifact = self
                .artifacts
                .get(&variant.name)
                .ok_or_else(|| HarnessError::MissingArtifact(variant.name.clone()))?;

            for &degree in variant.kind.degrees() {
                let result = self.runner.execute(variant, artifact, degree)?;
                report.runs += 1;

                if !result.succeeded {
                    println!(
                        "{}",
                        format!(
                            "Command for variant '{}' (degree {}) failed!",
                            variant.name, degree
                        )
                        .red()
                    );
                    return Err(HarnessError::RunFailure {
                        variant: variant.name.clone(),
                        degree,
                        case: case.name.clone(),
                        status: result.status,
                        detail: result.output,
                    });
                }

                if checker.observe(&result) == CheckState::Failed {
                    // doomed repetition; skip the remaining runs
                    break 'runs;
                }
            }
        }

        match checker.state() {
            CheckState::Passed => {
                let agreed = checker.agreed().unwrap_or_default();
                println!(
                    "📗 Case #{} ({}) succeeded with result '{}'!\n\n",
                    index, case.name, agreed
                );
                Ok(CaseOutcome {
                    case: case.name.clone(),
                    repetition,
                    verdict: Verdict::Pass,
                    observed: checker.observed().clone(),
                })
            }
            CheckState::Failed => {
                let outputs: Vec<String> = checker.observed().iter().cloned().collect();
                println!("Multiple results: {:?}", outputs);
                println!(
                    "{}",
                    format!("📙 Case #{} ({}) failed!", index, case.name)
                        .red()
                        .bold()
                );
                Err(HarnessError::ConsistencyFailure {
                    case: case.name.clone(),
                    repetition,
                    outputs,
                })
            }
            CheckState::Collecting => {
                unreachable!("all {} scheduled runs completed without a verdict", expected_runs)
            }
        }
    }

    /// Overwrite the well-known input file with the case payload.
    fn stage_input(&self, case: &TestCase) -> Result<(), HarnessError> {
        let input = self.config.input_path();
        if self.config.verbosity >= 1 {
            println!("Staging case '{}' into {}\n", case.name, input.display());
        }
        fs::write(&input, &case.content)?;
        Ok(())
    }
}
