use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use smoke_runner::build_client;
use smoke_runner::cli::Cli;
use smoke_runner::load_embedded_catalog;
use smoke_runner::run_smoke_tests;
use smoke_runner::telemetry;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.no_color {
        console::set_colors_enabled(false);
    }
    telemetry::init_tracing(cli.log_level());

    let ir = load_embedded_catalog()?;
    let client = build_client()?;

    let summary = run_smoke_tests(ir, &client, &mut std::io::stdout()).await?;
    tracing::debug!(
        passed = summary.passed,
        failed = summary.failed(),
        total = summary.total,
        "run finished"
    );

    Ok(cli.exit_code(&summary))
}
