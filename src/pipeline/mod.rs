use anyhow::Result;
use std::time::Instant;
use tracing::{info, warn};

use crate::ctx::Ctx;

pub mod stage1_input;
pub mod stage2_validate;
pub mod stage3_scaffold;
pub mod stage4_simulate;
pub mod stage5_report;

use stage1_input::Stage1Input;
use stage2_validate::Stage2Validate;
use stage3_scaffold::Stage3Scaffold;
use stage4_simulate::Stage4Simulate;
use stage5_report::Stage5Report;

pub trait Stage {
    fn name(&self) -> &'static str;
    fn run(&self, ctx: &mut Ctx) -> Result<()>;
}

pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Read, validate, create the results folder, simulate, report.
    pub fn simulation() -> Self {
        Self::new(vec![
            Box::new(Stage1Input::new()),
            Box::new(Stage2Validate::new()),
            Box::new(Stage3Scaffold::new()),
            Box::new(Stage4Simulate::new()),
            Box::new(Stage5Report::new()),
        ])
    }

    /// Input checks only; touches nothing on disk.
    pub fn validation() -> Self {
        Self::new(vec![
            Box::new(Stage1Input::new()),
            Box::new(Stage2Validate::new()),
        ])
    }

    pub fn run(&self, ctx: &mut Ctx) -> Result<()> {
        for stage in &self.stages {
            let start = Instant::now();
            info!(stage = stage.name(), "stage started");
            if let Err(err) = stage.run(ctx) {
                let elapsed_ms = start.elapsed().as_millis();
                warn!(
                    stage = stage.name(),
                    elapsed_ms = elapsed_ms as u64,
                    "stage failed"
                );
                return Err(err);
            }
            let elapsed_ms = start.elapsed().as_millis();
            info!(
                stage = stage.name(),
                elapsed_ms = elapsed_ms as u64,
                "stage finished"
            );
        }
        Ok(())
    }
}
