use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use neurosim::cli::{Cli, Commands, RunArgs, ValidateArgs};
use neurosim::ctx::Ctx;
use neurosim::io;
use neurosim::pipeline::Pipeline;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run(args)) => run(args),
        Some(Commands::Validate(args)) => validate(args),
        None => run(cli.run),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let mut ctx = Ctx::new(
        args.input,
        args.template,
        args.out,
        args.json,
        args.keep_going,
        env!("CARGO_PKG_VERSION"),
    );

    Pipeline::simulation().run(&mut ctx)?;
    print_summary(&ctx);

    if !ctx.failures.is_empty() {
        anyhow::bail!("{} patient(s) failed", ctx.failures.len());
    }
    Ok(())
}

fn validate(args: ValidateArgs) -> Result<()> {
    let mut ctx = Ctx::new(
        args.input,
        "tpl.xlsx".into(),
        "results".into(),
        false,
        false,
        env!("CARGO_PKG_VERSION"),
    );

    Pipeline::validation().run(&mut ctx)?;
    print_validate_summary(&ctx);
    Ok(())
}

fn print_summary(ctx: &Ctx) {
    print!("{}", io::summary::format_summary(ctx));
    print_warnings(ctx);
}

fn print_validate_summary(ctx: &Ctx) {
    println!("neurosim validate ok");
    println!("rows: {}", ctx.rows_read);
    println!("patients: {}", ctx.patients_read);
    print_warnings(ctx);
}

fn print_warnings(ctx: &Ctx) {
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
}
