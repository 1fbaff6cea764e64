use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::io::xlsx_reader;
use crate::pipeline::Stage;

pub struct Stage1Input;

impl Stage1Input {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Input {
    fn name(&self) -> &'static str {
        "stage1_input"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let input = xlsx_reader::read_patients(&ctx.input)
            .with_context(|| format!("failed to load {}", ctx.input.display()))?;

        if input.blank_rows > 0 {
            ctx.warnings.push(format!("{} blank row(s) skipped", input.blank_rows));
        }

        info!(
            rows = input.rows,
            patients = input.patients.len(),
            "patients_loaded"
        );

        ctx.rows_read = input.rows;
        ctx.patients_read = input.patients.len();
        ctx.patients = input.patients;
        ctx.report.input_meta.rows = Some(ctx.rows_read as u64);
        ctx.report.input_meta.patients = Some(ctx.patients_read as u64);
        Ok(())
    }
}
