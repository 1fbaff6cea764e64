use anyhow::Result;
use std::fs;
use tracing::info;

use crate::ctx::Ctx;
use crate::error::SimError;
use crate::pipeline::Stage;

pub struct Stage3Scaffold;

impl Stage3Scaffold {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Scaffold {
    fn name(&self) -> &'static str {
        "stage3_scaffold"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        fs::create_dir_all(&ctx.output.out_dir)
            .map_err(|e| SimError::write(&ctx.output.out_dir, e))?;
        info!(
            out_dir = %ctx.output.out_dir.display(),
            "output_dir_ready"
        );
        Ok(())
    }
}
