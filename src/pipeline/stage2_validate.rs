use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage2Validate;

impl Stage2Validate {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Validate {
    fn name(&self) -> &'static str {
        "stage2_validate"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let incomplete: Vec<(i64, anyhow::Error)> = ctx
            .patients
            .values()
            .filter_map(|p| {
                p.ensure_complete()
                    .err()
                    .map(|e| (p.id(), anyhow::Error::from(e)))
            })
            .collect();

        for (id, err) in incomplete {
            ctx.isolate_failure(id, err)?;
            ctx.patients.remove(&id);
        }

        if ctx.patients.is_empty() && ctx.failures.is_empty() {
            ctx.warnings.push("input contains no patients".to_string());
        }

        info!(patients = ctx.patients.len(), "patients_validated");
        Ok(())
    }
}
