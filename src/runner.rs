use std::error::Error;

use flume::SendError;
use flume::Sender;
use reqwest::Client;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use crate::validator::TestCase;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("channel error")]
    ChannelError(#[from] SendError<RunnerResult>),
}

#[derive(Debug)]
pub struct RunnerResult {
    pub name: String,
    pub expected_status: StatusCode,
    /// Observed status, or the transport error when no response arrived.
    pub response: Result<StatusCode, String>,
}

/// Runs every test in catalog order. Each request resolves before the next one
/// is sent.
pub async fn run_tests(
    tests: Vec<TestCase>,
    client: Client,
    tx: Sender<RunnerResult>,
) -> Result<(), RunnerError> {
    for test in tests {
        debug!(name = %test.name, method = %test.method, url = %test.url, "sending request");

        let response = send(&client, &test).await;

        match &response {
            Ok(status) => debug!(name = %test.name, %status, "received response"),
            Err(error) => debug!(name = %test.name, %error, "request failed"),
        }

        tx.send_async(RunnerResult {
            name: test.name,
            expected_status: test.expected_status,
            response,
        })
        .await?;
    }

    Ok(())
}

async fn send(client: &Client, test: &TestCase) -> Result<StatusCode, String> {
    let request = client.request(test.method.clone(), test.url.clone());

    let request = if let Some(body) = &test.body {
        request.json(body)
    } else {
        request
    };

    request
        .send()
        .await
        .map(|resp| resp.status())
        .map_err(|err| error_chain(&err))
}

/// Display text of `err` followed by its sources, so the root cause
/// (e.g. "Connection refused") is visible.
fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }

    message
}
