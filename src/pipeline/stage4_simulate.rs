use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::ctx::{Ctx, PatientOutcome, PeakShift};
use crate::error::SimError;
use crate::io::xlsx_writer::{patient_output_path, write_patient};
use crate::model::PatientRecord;
use crate::pipeline::Stage;
use crate::scenario::{Perturbation, Scenario, scenarios};
use crate::scores::{ScoreMap, weighted_sums};

pub struct Stage4Simulate;

impl Stage4Simulate {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Simulate {
    fn name(&self) -> &'static str {
        "stage4_simulate"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let ids: Vec<i64> = ctx.patients.keys().copied().collect();
        for id in ids {
            let result = match ctx.patients.get(&id) {
                Some(record) => simulate_patient(record, &ctx.template, &ctx.output.out_dir),
                None => continue,
            };
            match result {
                Ok(outcome) => {
                    info!(
                        patient = id,
                        path = %outcome.path.display(),
                        rows = outcome.rows,
                        dominant = %outcome.baseline.dominant(),
                        "patient_written"
                    );
                    ctx.outcomes.push(outcome);
                }
                Err(err) => ctx.isolate_failure(id, err.into())?,
            }
        }
        Ok(())
    }
}

/// Generates, scores and writes every scenario of one patient.
pub fn simulate_patient(
    record: &PatientRecord,
    template: &Path,
    out_dir: &Path,
) -> crate::error::Result<PatientOutcome> {
    let path = patient_output_path(out_dir, record.id());
    let weighted = weighted_sums(record)?;

    let mut baseline: Option<ScoreMap> = None;
    let mut peak: Option<PeakShift> = None;
    let mut count = 0usize;

    let tracked = scenarios(record).inspect(|item| {
        if let Ok(scenario) = item {
            count += 1;
            track_shift(scenario, &mut baseline, &mut peak);
        }
    });
    let rows = write_patient(&path, template, tracked)?;

    let baseline = baseline
        .ok_or_else(|| SimError::missing_data(record.id(), "no baseline scenario produced"))?;

    Ok(PatientOutcome {
        id: record.id(),
        path,
        scenarios: count,
        rows,
        weighted,
        baseline,
        peak,
    })
}

fn track_shift(
    scenario: &Scenario,
    baseline: &mut Option<ScoreMap>,
    peak: &mut Option<PeakShift>,
) {
    let (molecule, slot) = match scenario.perturbation {
        Perturbation::Baseline => {
            *baseline = Some(scenario.scores);
            return;
        }
        Perturbation::Slot { molecule, slot } => (molecule, slot),
    };
    let Some(base) = baseline.as_ref() else {
        return;
    };
    for (affected, p) in scenario.scores.iter() {
        let delta = p - base.get(affected);
        if peak.is_none_or(|pk| delta.abs() > pk.delta.abs()) {
            *peak = Some(PeakShift {
                molecule,
                slot,
                affected,
                delta,
            });
        }
    }
}
