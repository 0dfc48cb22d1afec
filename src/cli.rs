use std::process::ExitCode;

use clap::ArgAction;
use clap::Parser;

use crate::outputter::Summary;

/// Run the built-in HTTP smoke tests against the local service
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Exit with status 0 even when some tests fail
    #[arg(long)]
    pub allow_failures: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Log request details to stderr (-v for debug, -vv for trace).
    /// RUST_LOG takes precedence when set
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Failing tests exit with 1 unless `--allow-failures` was given.
    pub fn exit_code(&self, summary: &Summary) -> ExitCode {
        if self.fails_run(summary) {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }

    pub fn fails_run(&self, summary: &Summary) -> bool {
        !summary.all_passed() && !self.allow_failures
    }
}
