//! Agreement between predicted and observed growth
use std::fmt::{Display, Formatter};

use crate::validation::scenario::{Expectation, ScenarioOutcome};

/// Confusion matrix of growth calls, growth is the positive class
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BiologReport {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    /// Scenarios whose prediction differs from the observation
    pub disagreements: Vec<String>,
}

impl BiologReport {
    /// Tally outcomes with a growth expectation, infeasibility checks are skipped
    pub fn from_outcomes(outcomes: &[ScenarioOutcome]) -> Self {
        let mut report = BiologReport::default();
        for outcome in outcomes {
            let Expectation::Growth(observed) = outcome.expected else {
                continue;
            };
            match (outcome.growth.is_present(), observed) {
                (true, true) => report.true_positives += 1,
                (false, false) => report.true_negatives += 1,
                (true, false) => report.false_positives += 1,
                (false, true) => report.false_negatives += 1,
            }
            if outcome.growth.is_present() != observed {
                report.disagreements.push(outcome.scenario.clone());
            }
        }
        report
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    /// Share of correct calls, NaN for an empty report
    pub fn accuracy(&self) -> f64 {
        (self.true_positives + self.true_negatives) as f64 / self.total() as f64
    }
}

impl Display for BiologReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:<20}{:>12}{:>12}", "", "predicted +", "predicted -")?;
        writeln!(
            f,
            "{:<20}{:>12}{:>12}",
            "observed growth", self.true_positives, self.false_negatives
        )?;
        writeln!(
            f,
            "{:<20}{:>12}{:>12}",
            "observed no growth", self.false_positives, self.true_negatives
        )?;
        write!(f, "accuracy {:.3} over {} sources", self.accuracy(), self.total())?;
        if !self.disagreements.is_empty() {
            write!(f, "\ndisagreements: {}", self.disagreements.join(", "))?;
        }
        Ok(())
    }
}
