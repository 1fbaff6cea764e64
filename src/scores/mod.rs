pub mod softmax;

use crate::model::Molecule;

pub use softmax::{softmax, weighted_sums};

/// Probability per molecule, stored in canonical order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreMap {
    probs: [f64; 4],
}

impl ScoreMap {
    pub fn new(probs: [f64; 4]) -> Self {
        Self { probs }
    }

    pub fn get(&self, molecule: Molecule) -> f64 {
        self.probs[molecule.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Molecule, f64)> + '_ {
        Molecule::ALL.into_iter().map(|m| (m, self.probs[m.index()]))
    }

    pub fn total(&self) -> f64 {
        self.probs.iter().sum()
    }

    /// Molecule with the highest probability; ties go to the earlier one.
    pub fn dominant(&self) -> Molecule {
        let mut best = Molecule::Acetylcholine;
        for m in Molecule::ALL {
            if self.get(m) > self.get(best) {
                best = m;
            }
        }
        best
    }
}
