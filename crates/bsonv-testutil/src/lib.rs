//! Test utilities for bsonv.
//!
//! - [`fixtures`]: sample identifiers and reference-shaped values
//! - [`cases`]: parser and runner for the `tests/cases/*.test` format
//!
//! A case file is run once per entry point. [`CaseReport`] keeps a tally for
//! each run and lists the cases where the two runs produced different
//! outcomes, since sync and async must always agree.

pub mod cases;
pub mod fixtures;

use std::fmt;

/// How one case fared in one run.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Pass,
    Mismatch { expected: String, actual: String },
    /// The case could not be run at all (bad input JSON, unknown schema).
    Error { message: String },
}

/// Which entry point a run went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Run {
    Sync,
    Async,
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Run::Sync => "sync",
            Run::Async => "async",
        })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub passed: usize,
    pub mismatched: usize,
    pub errors: usize,
}

/// A case that did not pass in one of the runs.
#[derive(Debug, Clone)]
pub struct CaseFailure {
    pub name: String,
    pub line: usize,
    pub run: Run,
    pub verdict: Verdict,
}

/// Results of running a case file through both entry points.
#[derive(Debug, Default)]
pub struct CaseReport {
    pub cases: usize,
    pub sync: Tally,
    pub deferred: Tally,
    pub failures: Vec<CaseFailure>,
    /// Names of cases whose sync and async outcomes differ.
    pub disagreements: Vec<String>,
}

impl CaseReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &str, line: usize, run: Run, verdict: Verdict) {
        let tally = match run {
            Run::Sync => &mut self.sync,
            Run::Async => &mut self.deferred,
        };
        match verdict {
            Verdict::Pass => {
                tally.passed += 1;
                return;
            }
            Verdict::Mismatch { .. } => tally.mismatched += 1,
            Verdict::Error { .. } => tally.errors += 1,
        }
        self.failures.push(CaseFailure {
            name: name.to_string(),
            line,
            run,
            verdict,
        });
    }

    pub fn all_passed(&self) -> bool {
        self.failures.is_empty() && self.disagreements.is_empty()
    }
}

impl fmt::Display for CaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} cases", self.cases)?;
        for (run, tally) in [(Run::Sync, &self.sync), (Run::Async, &self.deferred)] {
            writeln!(
                f,
                "  {run:<5}  {} passed, {} mismatched, {} errors",
                tally.passed, tally.mismatched, tally.errors
            )?;
        }
        if !self.disagreements.is_empty() {
            writeln!(f, "  runs disagree on: {}", self.disagreements.join(", "))?;
        }
        for failure in &self.failures {
            writeln!(f, "  [{}] {} (line {})", failure.run, failure.name, failure.line)?;
            match &failure.verdict {
                Verdict::Mismatch { expected, actual } => {
                    writeln!(f, "      expected: {expected}")?;
                    writeln!(f, "      actual:   {actual}")?;
                }
                Verdict::Error { message } => writeln!(f, "      error: {message}")?,
                Verdict::Pass => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tallies_are_kept_per_run() {
        let mut report = CaseReport::new();
        report.cases = 2;
        report.record("a", 1, Run::Sync, Verdict::Pass);
        report.record("a", 1, Run::Async, Verdict::Pass);
        report.record(
            "b",
            5,
            Run::Async,
            Verdict::Mismatch {
                expected: "ok 1".into(),
                actual: "custom @ (root)".into(),
            },
        );
        report.record("b", 5, Run::Sync, Verdict::Error { message: "bad json".into() });

        assert_eq!(report.sync, Tally { passed: 1, mismatched: 0, errors: 1 });
        assert_eq!(report.deferred, Tally { passed: 1, mismatched: 1, errors: 0 });
        assert_eq!(report.failures.len(), 2);
        assert!(!report.all_passed());

        let text = report.to_string();
        assert!(text.contains("[async] b (line 5)"));
        assert!(text.contains("sync   1 passed, 0 mismatched, 1 errors"));
    }

    #[test]
    fn disagreement_alone_fails_the_report() {
        let mut report = CaseReport::new();
        report.disagreements.push("tagged_id".into());
        assert!(!report.all_passed());
        assert!(report.to_string().contains("runs disagree on: tagged_id"));
    }
}
