use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputMeta {
    pub path: String,
    pub template: String,
    pub rows: Option<u64>,
    pub patients: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeakShift {
    pub molecule: String,
    pub slot: usize,
    pub affected: String,
    pub delta: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientReport {
    pub id: i64,
    pub output: String,
    pub scenarios: usize,
    pub rows: usize,
    pub weighted_sums: BTreeMap<String, f64>,
    pub baseline: BTreeMap<String, f64>,
    pub dominant: String,
    pub peak_shift: Option<PeakShift>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientFailure {
    pub id: i64,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReportV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub input_meta: InputMeta,
    pub patients: Vec<PatientReport>,
    pub failures: Vec<PatientFailure>,
    pub warnings: Vec<String>,
}

impl SimulationReportV1 {
    pub fn empty(tool_version: &str, input: &Path, template: &Path) -> Self {
        Self {
            tool: "neurosim".to_string(),
            version: tool_version.to_string(),
            schema_version: "v1".to_string(),
            input_meta: InputMeta {
                path: input.display().to_string(),
                template: template.display().to_string(),
                rows: None,
                patients: None,
            },
            patients: Vec::new(),
            failures: Vec::new(),
            warnings: Vec::new(),
        }
    }
}
