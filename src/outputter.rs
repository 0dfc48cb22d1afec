use std::fmt;
use std::io::Write;

use console::Style;
use flume::Receiver;

use crate::asserter::AssertResult;
use crate::asserter::Failure;
use crate::asserter::TestResult;

pub struct OutPutter;

/// Outcome of one run.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Summary {
    pub passed: usize,
    pub total: usize,
}

impl Summary {
    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }

    pub fn failed(&self) -> usize {
        self.total - self.passed
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} tests passed", self.passed, self.total)
    }
}

impl fmt::Display for AssertResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            TestResult::Pass => write!(
                f,
                "{} {}",
                console::style("✔").green().bold(),
                console::style(format!("{} passed.", self.name)).green()
            ),
            TestResult::Fail(failure @ Failure::StatusMismatch { .. }) => write!(
                f,
                "{} {}",
                console::style("✘").red().bold(),
                console::style(format!("{} failed. {failure}", self.name)).red()
            ),
            TestResult::Fail(failure @ Failure::TransportFailure(_)) => write!(
                f,
                "{} {}",
                console::style("✘").red().bold(),
                console::style(format!("{} failed with error: {failure}", self.name)).red()
            ),
        }
    }
}

impl OutPutter {
    /// Prints one line per result as it arrives and the closing summary line.
    /// The pass count lives only for this call.
    pub async fn start<W: Write>(
        rx: Receiver<AssertResult>,
        out: &mut W,
        base_url: &str,
        n_tests: usize,
    ) -> std::io::Result<Summary> {
        let style = Style::new().bold().cyan();
        let open_text = format!("Running {n_tests} smoke tests against {base_url}");
        writeln!(out, "{}", style.apply_to(open_text))?;

        let mut i = 1;
        let mut passed = 0;
        while let Ok(result) = rx.recv_async().await {
            if result.passed() {
                passed += 1;
            }

            writeln!(out, "[{i}/{n_tests}] {result}")?;
            i += 1;
        }

        let summary = Summary {
            passed,
            total: n_tests,
        };

        writeln!(out)?;
        writeln!(out, "Summary: {summary}.")?;
        out.flush()?;

        Ok(summary)
    }
}
