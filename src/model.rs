//! Patient record model.
//!
//! A record is assembled row by row while the input sheet is scanned and is
//! treated as a snapshot afterwards: scenario perturbation goes through
//! [`PatientRecord::perturbed`], which returns a fresh record.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::error::{Result, SimError};

/// Number of intensity slots per molecule and weights per patient.
pub const SLOTS: usize = 5;

/// Label that marks a weights row in the input sheet.
pub const WEIGHTS_LABEL: &str = "weights";

pub type Intensities = [f64; SLOTS];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Molecule {
    Acetylcholine,
    Norepinephrine,
    Dopamine,
    Serotonin,
}

impl Molecule {
    /// Canonical order used for scenario generation and output rows.
    pub const ALL: [Molecule; 4] = [
        Molecule::Acetylcholine,
        Molecule::Norepinephrine,
        Molecule::Dopamine,
        Molecule::Serotonin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Molecule::Acetylcholine => "Acetylcholine",
            Molecule::Norepinephrine => "Norepinephrine",
            Molecule::Dopamine => "Dopamine",
            Molecule::Serotonin => "Serotonin",
        }
    }

    /// Position in [`Molecule::ALL`].
    pub fn index(self) -> usize {
        match self {
            Molecule::Acetylcholine => 0,
            Molecule::Norepinephrine => 1,
            Molecule::Dopamine => 2,
            Molecule::Serotonin => 3,
        }
    }
}

impl fmt::Display for Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown molecule '{0}'")]
pub struct UnknownMolecule(pub String);

impl FromStr for Molecule {
    type Err = UnknownMolecule;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Molecule::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMolecule(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecord {
    id: i64,
    weights: Option<Intensities>,
    molecules: BTreeMap<Molecule, Intensities>,
}

impl PatientRecord {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            weights: None,
            molecules: BTreeMap::new(),
        }
    }

    pub fn with_weights(mut self, weights: Intensities) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_molecule(mut self, molecule: Molecule, intensities: Intensities) -> Self {
        self.molecules.insert(molecule, intensities);
        self
    }

    pub fn set_weights(&mut self, weights: Intensities) {
        self.weights = Some(weights);
    }

    pub fn set_molecule(&mut self, molecule: Molecule, intensities: Intensities) {
        self.molecules.insert(molecule, intensities);
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn weights(&self) -> Option<&Intensities> {
        self.weights.as_ref()
    }

    pub fn intensities(&self, molecule: Molecule) -> Option<&Intensities> {
        self.molecules.get(&molecule)
    }

    /// Molecules present on this record, in canonical order.
    pub fn present_molecules(&self) -> impl Iterator<Item = Molecule> + '_ {
        Molecule::ALL
            .into_iter()
            .filter(|m| self.molecules.contains_key(m))
    }

    /// Checks that weights and all four molecules are present.
    pub fn ensure_complete(&self) -> Result<()> {
        if self.weights.is_none() {
            return Err(SimError::missing_data(self.id, "no weights row"));
        }
        let missing: Vec<&str> = Molecule::ALL
            .into_iter()
            .filter(|m| !self.molecules.contains_key(m))
            .map(Molecule::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(SimError::missing_data(
                self.id,
                format!("no intensity row for {}", missing.join(", ")),
            ));
        }
        Ok(())
    }

    /// Copy of this record with `molecules[molecule][slot]` replaced by `value`.
    pub fn perturbed(&self, molecule: Molecule, slot: usize, value: f64) -> Result<Self> {
        if slot >= SLOTS {
            return Err(SimError::missing_data(
                self.id,
                format!("slot {} out of range for {}", slot, molecule),
            ));
        }
        let mut next = self.clone();
        let intensities = next.molecules.get_mut(&molecule).ok_or_else(|| {
            SimError::missing_data(self.id, format!("no intensity row for {}", molecule))
        })?;
        intensities[slot] = value;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn molecule_parse_is_exact() {
        assert_eq!("Dopamine".parse::<Molecule>(), Ok(Molecule::Dopamine));
        assert!("dopamine".parse::<Molecule>().is_err());
        assert!("Histamine".parse::<Molecule>().is_err());
    }

    #[test]
    fn unknown_molecule_names_the_label() {
        let err = "Histamine".parse::<Molecule>().unwrap_err();
        assert_eq!(err, UnknownMolecule("Histamine".to_string()));
        assert_eq!(err.to_string(), "unknown molecule 'Histamine'");
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn canonical_index_matches_all() {
        for (i, m) in Molecule::ALL.into_iter().enumerate() {
            assert_eq!(m.index(), i);
        }
    }

    #[test]
    fn ensure_complete_lists_missing_molecules() {
        let rec = PatientRecord::new(3)
            .with_weights([1.0; SLOTS])
            .with_molecule(Molecule::Acetylcholine, [0.0; SLOTS]);
        let err = rec.ensure_complete().unwrap_err().to_string();
        assert!(err.contains("patient 3"));
        assert!(err.contains("Norepinephrine, Dopamine, Serotonin"));
    }
}
