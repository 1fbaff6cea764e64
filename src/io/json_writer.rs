use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::model::Molecule;
use crate::schema::v1::{InputMeta, PatientFailure, PatientReport, PeakShift, SimulationReportV1};

pub fn build_report(ctx: &Ctx) -> Result<SimulationReportV1> {
    let input_meta = InputMeta {
        path: ctx.input.display().to_string(),
        template: ctx.template.display().to_string(),
        rows: Some(ctx.rows_read as u64),
        patients: Some(ctx.patients_read as u64),
    };

    let patients = ctx
        .outcomes
        .iter()
        .map(|o| -> Result<PatientReport> {
            let output = o
                .path
                .file_name()
                .context("patient output path has no file name")?
                .to_string_lossy()
                .to_string();
            Ok(PatientReport {
                id: o.id,
                output,
                scenarios: o.scenarios,
                rows: o.rows,
                weighted_sums: Molecule::ALL
                    .into_iter()
                    .map(|m| (m.to_string(), o.weighted[m.index()]))
                    .collect(),
                baseline: o
                    .baseline
                    .iter()
                    .map(|(m, p)| (m.to_string(), p))
                    .collect::<BTreeMap<_, _>>(),
                dominant: o.baseline.dominant().to_string(),
                peak_shift: o.peak.map(|p| PeakShift {
                    molecule: p.molecule.to_string(),
                    slot: p.slot,
                    affected: p.affected.to_string(),
                    delta: p.delta,
                }),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let failures = ctx
        .failures
        .iter()
        .map(|f| PatientFailure {
            id: f.id,
            error: f.error.clone(),
        })
        .collect();

    Ok(SimulationReportV1 {
        tool: "neurosim".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schema_version: "v1".to_string(),
        input_meta,
        patients,
        failures,
        warnings: ctx.warnings.clone(),
    })
}

pub fn write_json(path: &Path, report: &SimulationReportV1) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}
