//! Weighted softmax over the four molecules.
//!
//! No max-subtraction is applied before exponentiating, so the scores match
//! the plain definition exactly. An exponential that overflows, or a
//! denominator that underflows to zero, is reported instead of being carried
//! into the output as `inf`/`NaN`.

use crate::error::{Result, SimError};
use crate::model::{Molecule, PatientRecord};
use crate::scores::ScoreMap;

/// Dot product of each molecule's intensities with the patient weights,
/// indexed by [`Molecule::index`].
pub fn weighted_sums(record: &PatientRecord) -> Result<[f64; 4]> {
    let weights = record
        .weights()
        .ok_or_else(|| SimError::missing_data(record.id(), "no weights row"))?;

    let mut sums = [0.0f64; 4];
    for molecule in Molecule::ALL {
        let intensities = record.intensities(molecule).ok_or_else(|| {
            SimError::missing_data(record.id(), format!("no intensity row for {}", molecule))
        })?;
        sums[molecule.index()] = intensities
            .iter()
            .zip(weights.iter())
            .map(|(a, w)| a * w)
            .sum();
    }
    Ok(sums)
}

pub fn softmax(record: &PatientRecord) -> Result<ScoreMap> {
    let weighted = weighted_sums(record)?;

    let mut exps = [0.0f64; 4];
    for molecule in Molecule::ALL {
        let w = weighted[molecule.index()];
        let e = w.exp();
        if !e.is_finite() {
            return Err(SimError::Overflow {
                patient: record.id(),
                molecule,
                weighted: w,
            });
        }
        exps[molecule.index()] = e;
    }

    let denom: f64 = exps.iter().sum();
    if !denom.is_finite() {
        // Each term fits but the sum does not; attribute it to the largest.
        let molecule = Molecule::ALL
            .into_iter()
            .max_by(|a, b| weighted[a.index()].total_cmp(&weighted[b.index()]))
            .unwrap_or(Molecule::Acetylcholine);
        return Err(SimError::Overflow {
            patient: record.id(),
            molecule,
            weighted: weighted[molecule.index()],
        });
    }

    if denom == 0.0 {
        return Err(SimError::Underflow {
            patient: record.id(),
            weighted: weighted.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        });
    }

    let mut probs = [0.0f64; 4];
    for (p, e) in probs.iter_mut().zip(exps.iter()) {
        *p = e / denom;
    }
    Ok(ScoreMap::new(probs))
}
