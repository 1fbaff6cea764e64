use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "neurosim",
    version,
    about = "Softmax sensitivity analysis over patient dosing sheets",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full simulation (same as passing no subcommand).
    Run(RunArgs),
    /// Parse and check the input workbook without writing anything.
    Validate(ValidateArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    #[arg(long, default_value = "drug_delivery_data.xlsx", help = "Single-sheet dosing workbook")]
    pub input: PathBuf,

    #[arg(
        long,
        default_value = "tpl.xlsx",
        help = "Workbook whose active sheet is the output layout"
    )]
    pub template: PathBuf,

    #[arg(long, default_value = "results", help = "Results folder (created if absent)")]
    pub out: PathBuf,

    #[arg(long, default_value_t = false, help = "Also write <out>/summary.json")]
    pub json: bool,

    #[arg(
        long,
        default_value_t = false,
        help = "Skip patients that fail instead of aborting the run"
    )]
    pub keep_going: bool,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long, default_value = "drug_delivery_data.xlsx", help = "Single-sheet dosing workbook")]
    pub input: PathBuf,
}
