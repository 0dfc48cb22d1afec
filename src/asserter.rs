use flume::Receiver;
use flume::SendError;
use flume::Sender;
use reqwest::StatusCode;
use thiserror::Error;

use crate::runner::RunnerResult;

pub struct Asserter {}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TestResult {
    Pass,
    Fail(Failure),
}

/// Why a single test did not pass. Never fatal to the run.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum Failure {
    #[error("Expected {}, got {}", .expected.as_u16(), .actual.as_u16())]
    StatusMismatch {
        expected: StatusCode,
        actual: StatusCode,
    },

    #[error("{0}")]
    TransportFailure(String),
}

#[derive(Debug, Clone)]
pub struct AssertResult {
    pub name: String,
    pub status: TestResult,
}

impl AssertResult {
    pub fn passed(&self) -> bool {
        self.status == TestResult::Pass
    }
}

#[derive(Error, Debug)]
pub enum AsserterError {
    #[error("channel error")]
    ChannelError(#[from] SendError<AssertResult>),
}

pub trait Assert {
    fn assert(&self) -> AssertResult;
}

impl Assert for RunnerResult {
    fn assert(&self) -> AssertResult {
        let status = match &self.response {
            Ok(actual) => assert_status(self.expected_status, *actual),
            Err(error) => TestResult::Fail(Failure::TransportFailure(error.clone())),
        };

        AssertResult {
            name: self.name.clone(),
            status,
        }
    }
}

impl Asserter {
    pub async fn run(
        rx: Receiver<RunnerResult>,
        output_tx: Sender<AssertResult>,
    ) -> Result<(), AsserterError> {
        while let Ok(msg) = rx.recv_async().await {
            output_tx.send_async(msg.assert()).await?;
        }

        Ok(())
    }
}

fn assert_status(expected: StatusCode, actual: StatusCode) -> TestResult {
    if expected != actual {
        return TestResult::Fail(Failure::StatusMismatch { expected, actual });
    }

    TestResult::Pass
}
