use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::io::json_writer;
use crate::pipeline::Stage;

pub struct Stage5Report;

impl Stage5Report {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5Report {
    fn name(&self) -> &'static str {
        "stage5_report"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let report = json_writer::build_report(ctx)?;
        ctx.report = report;

        if ctx.write_json {
            json_writer::write_json(&ctx.output.json_path, &ctx.report)?;
            info!(path = %ctx.output.json_path.display(), "summary_json_written");
        }

        info!(
            written = ctx.outcomes.len(),
            failed = ctx.failures.len(),
            "stage5_report_ready"
        );
        Ok(())
    }
}
