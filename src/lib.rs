#![allow(clippy::result_large_err)]

use std::io::Write;

use miette::Diagnostic;
use reqwest::Client;
use thiserror::Error;

use crate::asserter::AssertResult;
use crate::asserter::Asserter;
use crate::outputter::OutPutter;
use crate::outputter::Summary;
use crate::parser::CATALOG_FILE;
use crate::parser::Catalog;
use crate::parser::EMBEDDED_CATALOG;
use crate::runner::RunnerResult;
use crate::runner::run_tests;
use crate::validator::IR;
use crate::validator::ValidationError;
use crate::validator::Validator;

pub mod asserter;
pub mod cli;
pub mod outputter;
pub mod parser;
pub mod runner;
pub mod telemetry;
pub mod validator;

#[derive(Error, Debug, Diagnostic)]
pub enum SmokeError {
    #[error("Failed to parse the test catalog")]
    TomlParsing(#[from] toml::de::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    ValidationError(#[from] ValidationError),

    #[error("Failed to build the HTTP client")]
    ClientError(#[from] reqwest::Error),

    #[error("Failed to write test output")]
    OutputError(#[from] std::io::Error),

    #[error("Test pipeline stopped early: {0}")]
    PipelineError(String),
}

/// Parses and validates a catalog written in the embedded catalog format.
pub fn load_catalog(src: &str, file_name: &str) -> Result<IR, SmokeError> {
    let catalog = Catalog::from_toml(src)?;
    let ir = Validator::new(&catalog, src, file_name).validate()?;

    Ok(ir)
}

pub fn load_embedded_catalog() -> Result<IR, SmokeError> {
    load_catalog(EMBEDDED_CATALOG, CATALOG_FILE)
}

pub fn build_client() -> Result<Client, SmokeError> {
    let client = Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;

    Ok(client)
}

/// Runs the catalog through the runner -> asserter -> outputter pipeline and
/// returns the summary of this run.
///
/// Requests go out one at a time in catalog order. A failing test, whether a
/// wrong status or a transport error, is reported and the run moves on; only
/// problems with the pipeline itself or with writing to `out` are errors.
pub async fn run_smoke_tests<W: Write>(
    ir: IR,
    client: &Client,
    out: &mut W,
) -> Result<Summary, SmokeError> {
    let n_tests = ir.tests.len();

    let (runner_tx, asserter_rx) = flume::unbounded::<RunnerResult>();
    let (asserter_tx, outputter_rx) = flume::unbounded::<AssertResult>();

    let (runner, asserter, outputter) = futures::join!(
        run_tests(ir.tests, client.clone(), runner_tx),
        Asserter::run(asserter_rx, asserter_tx),
        OutPutter::start(outputter_rx, out, &ir.base_url, n_tests)
    );

    let summary = outputter?;
    runner.map_err(|e| SmokeError::PipelineError(e.to_string()))?;
    asserter.map_err(|e| SmokeError::PipelineError(e.to_string()))?;

    Ok(summary)
}
