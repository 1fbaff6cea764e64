use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::warn;

use crate::model::{Molecule, PatientRecord};
use crate::schema::v1::SimulationReportV1;
use crate::scores::ScoreMap;

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub json_path: PathBuf,
}

/// Perturbation with the largest effect on any molecule's probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakShift {
    pub molecule: Molecule,
    pub slot: usize,
    pub affected: Molecule,
    pub delta: f64,
}

#[derive(Debug, Clone)]
pub struct PatientOutcome {
    pub id: i64,
    pub path: PathBuf,
    pub scenarios: usize,
    pub rows: usize,
    pub weighted: [f64; 4],
    pub baseline: ScoreMap,
    pub peak: Option<PeakShift>,
}

#[derive(Debug, Clone)]
pub struct PatientFailure {
    pub id: i64,
    pub error: String,
}

#[derive(Debug)]
pub struct Ctx {
    pub input: PathBuf,
    pub template: PathBuf,
    pub write_json: bool,
    pub keep_going: bool,
    pub patients: BTreeMap<i64, PatientRecord>,
    pub rows_read: usize,
    pub patients_read: usize,
    pub outcomes: Vec<PatientOutcome>,
    pub failures: Vec<PatientFailure>,
    pub warnings: Vec<String>,
    pub output: OutputPaths,
    pub report: SimulationReportV1,
}

impl Ctx {
    pub fn new(
        input: PathBuf,
        template: PathBuf,
        out_dir: PathBuf,
        write_json: bool,
        keep_going: bool,
        tool_version: &str,
    ) -> Self {
        let json_path = out_dir.join("summary.json");
        let report = SimulationReportV1::empty(tool_version, &input, &template);
        Self {
            input,
            template,
            write_json,
            keep_going,
            patients: BTreeMap::new(),
            rows_read: 0,
            patients_read: 0,
            outcomes: Vec::new(),
            failures: Vec::new(),
            warnings: Vec::new(),
            output: OutputPaths { out_dir, json_path },
            report,
        }
    }

    /// Records a per-patient failure when `keep_going` is set; otherwise
    /// hands the error back so the run aborts.
    pub fn isolate_failure(&mut self, id: i64, err: anyhow::Error) -> anyhow::Result<()> {
        if !self.keep_going {
            return Err(err);
        }
        let error = format!("{:#}", err);
        warn!(patient = id, error = %error, "patient skipped");
        self.warnings.push(format!("patient {} skipped: {}", id, error));
        self.failures.push(PatientFailure { id, error });
        Ok(())
    }
}
