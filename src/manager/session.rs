//! Managed command state
//!
//! A managed command is accepted, spawned, supervised in the background and
//! forgotten once its notice has been attempted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tokio::task::JoinHandle;

use crate::notify::Delivery;
use crate::types::CommandId;

/// Lifecycle of a managed command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandState {
    /// Checking that the target session exists
    Validating,
    /// Spawned, output being captured
    Running,
    /// Exited; success notice pending or sent
    Completed,
    /// Could not be spawned or supervised; error notice pending or sent
    Failed,
}

impl fmt::Display for CommandState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Acknowledgement returned as soon as a command is accepted
#[derive(Debug, Clone, Serialize)]
pub struct CommandAck {
    /// Unique id, also used as the log prefix
    pub command_id: CommandId,
    /// Command line as requested
    pub command: String,
    /// Process id, absent when the spawn failed
    pub pid: Option<u32>,
    /// Working directory of the command
    pub cwd: PathBuf,
    /// When the command was accepted
    pub started_at: DateTime<Utc>,
    /// State at acknowledgement time
    pub state: CommandState,
}

impl CommandAck {
    /// Human-readable acknowledgement text
    #[must_use]
    pub fn message(&self) -> String {
        let pid = self
            .pid
            .map_or_else(|| "none".to_string(), |pid| pid.to_string());
        format!(
            "Command \"{}\" started in the background (PID: {}, CWD: {}). \
             I will notify you when it finishes.",
            self.command,
            pid,
            self.cwd.display()
        )
    }
}

/// An accepted command and the task that will deliver its notice
#[derive(Debug)]
pub struct LaunchedCommand {
    /// What the caller is told immediately
    pub ack: CommandAck,
    /// Background supervision; resolves once the notice was attempted
    pub completion: JoinHandle<Delivery>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ack(pid: Option<u32>) -> CommandAck {
        CommandAck {
            command_id: CommandId::from("0123456789"),
            command: "make test".to_string(),
            pid,
            cwd: PathBuf::from("/work"),
            started_at: Utc::now(),
            state: CommandState::Running,
        }
    }

    #[test]
    fn ack_message_names_pid_and_cwd() {
        assert_eq!(
            ack(Some(4242)).message(),
            "Command \"make test\" started in the background (PID: 4242, CWD: /work). \
             I will notify you when it finishes."
        );
    }

    #[test]
    fn ack_message_without_pid() {
        assert!(ack(None).message().contains("(PID: none, CWD: /work)"));
    }

    #[test]
    fn ack_serializes_state_snake_case() {
        let json = serde_json::to_value(ack(Some(1))).expect("serialize ack");
        assert_eq!(json["state"], "running");
        assert_eq!(json["command_id"], "0123456789");
    }
}
