//! cms-admin support library
//!
//! Fixture loading and batch execution behind the `cms-admin` binary.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod fixtures;

use cms_core::{CommandError, CommandExecutor};
use serde::Serialize;
use serde_json::Value;

pub use fixtures::{ContactFixture, FixtureError, Fixtures, Session};

/// Outcome of one command in a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    /// Command text as given
    pub command: String,
    /// Whether it succeeded
    pub ok: bool,
    /// Command output, or the `{status, message, details?}` error body
    pub result: Value,
}

/// Execute commands in order, continuing past failures
pub async fn run_commands<I, S>(
    executor: &CommandExecutor,
    commands: I,
    actor: Option<&str>,
) -> Vec<Outcome>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut outcomes = Vec::new();
    for command in commands {
        let command = command.as_ref();
        let outcome = match executor.execute(command, actor).await {
            Ok(output) => match serde_json::to_value(&output) {
                Ok(result) => Outcome {
                    command: command.to_string(),
                    ok: true,
                    result,
                },
                Err(err) => failed(command, &CommandError::Internal(err.to_string())),
            },
            Err(err) => failed(command, &err),
        };
        outcomes.push(outcome);
    }
    outcomes
}

fn failed(command: &str, err: &CommandError) -> Outcome {
    Outcome {
        command: command.to_string(),
        ok: false,
        result: err.to_json(),
    }
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
