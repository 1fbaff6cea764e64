//! Baseline and single-slot perturbation scenarios for one patient.

use crate::error::Result;
use crate::model::{Molecule, PatientRecord, SLOTS};
use crate::scores::{ScoreMap, softmax};

/// Value a perturbed slot is forced to.
pub const PERTURBED_VALUE: f64 = 1.0;

/// Scenarios per patient: the baseline plus one per (molecule, slot).
pub const SCENARIOS_PER_PATIENT: usize = 1 + Molecule::ALL.len() * SLOTS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Perturbation {
    Baseline,
    Slot { molecule: Molecule, slot: usize },
}

impl Perturbation {
    fn at(position: usize) -> Option<Self> {
        if position == 0 {
            return Some(Perturbation::Baseline);
        }
        if position >= SCENARIOS_PER_PATIENT {
            return None;
        }
        let k = position - 1;
        Some(Perturbation::Slot {
            molecule: Molecule::ALL[k / SLOTS],
            slot: k % SLOTS,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub perturbation: Perturbation,
    pub record: PatientRecord,
    pub scores: ScoreMap,
}

/// Lazy sequence of scenarios over a borrowed baseline. Cloning it, or
/// calling [`scenarios`] again, restarts from the baseline.
#[derive(Debug, Clone)]
pub struct Scenarios<'a> {
    baseline: &'a PatientRecord,
    position: usize,
}

pub fn scenarios(baseline: &PatientRecord) -> Scenarios<'_> {
    Scenarios {
        baseline,
        position: 0,
    }
}

impl Scenarios<'_> {
    fn build(&self, perturbation: Perturbation) -> Result<Scenario> {
        let record = match perturbation {
            Perturbation::Baseline => self.baseline.clone(),
            Perturbation::Slot { molecule, slot } => {
                self.baseline.perturbed(molecule, slot, PERTURBED_VALUE)?
            }
        };
        let scores = softmax(&record)?;
        Ok(Scenario {
            perturbation,
            record,
            scores,
        })
    }
}

impl Iterator for Scenarios<'_> {
    type Item = Result<Scenario>;

    fn next(&mut self) -> Option<Self::Item> {
        let perturbation = Perturbation::at(self.position)?;
        self.position += 1;
        Some(self.build(perturbation))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = SCENARIOS_PER_PATIENT.saturating_sub(self.position);
        (left, Some(left))
    }
}

impl ExactSizeIterator for Scenarios<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_cover_every_slot_once() {
        let mut seen = Vec::new();
        for i in 0..SCENARIOS_PER_PATIENT {
            seen.push(Perturbation::at(i).unwrap());
        }
        assert_eq!(seen[0], Perturbation::Baseline);
        assert_eq!(
            seen[1],
            Perturbation::Slot {
                molecule: Molecule::Acetylcholine,
                slot: 0
            }
        );
        assert_eq!(
            seen[20],
            Perturbation::Slot {
                molecule: Molecule::Serotonin,
                slot: 4
            }
        );
        assert!(Perturbation::at(SCENARIOS_PER_PATIENT).is_none());
    }
}
