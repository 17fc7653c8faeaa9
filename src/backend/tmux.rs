//! tmux CLI backend
//!
//! Every operation is a short-lived `tmux` subprocess invoked with argv
//! (no shell in between), bounded by a timeout so a wedged tmux server
//! cannot stall a notice forever.

use std::path::PathBuf;
use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::{SendKey, TerminalBackend};
use crate::error::{LongCommandError, Result};
use crate::types::PaneTarget;

/// Timeout for a single tmux invocation
const CMD_TIMEOUT: Duration = Duration::from_secs(5);

/// Backend that drives a real tmux server
#[derive(Debug, Clone)]
pub struct TmuxBackend {
    binary: Option<PathBuf>,
}

impl Default for TmuxBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TmuxBackend {
    /// Locate `tmux` on `PATH`
    #[must_use]
    pub fn new() -> Self {
        let binary = which::which("tmux").ok();
        if binary.is_none() {
            log::warn!("tmux not found on PATH; every session probe will fail");
        }
        Self { binary }
    }

    /// Use an explicit tmux binary
    pub fn with_binary(path: impl Into<PathBuf>) -> Self {
        Self {
            binary: Some(path.into()),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<Output> {
        let binary = self
            .binary
            .as_ref()
            .ok_or_else(|| LongCommandError::backend("tmux binary not found"))?;

        let mut cmd = Command::new(binary);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match tokio::time::timeout(CMD_TIMEOUT, cmd.output()).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(LongCommandError::backend(format!(
                "tmux {} timed out after {}s",
                args.first().copied().unwrap_or_default(),
                CMD_TIMEOUT.as_secs()
            ))),
        }
    }

    async fn run_checked(&self, args: &[&str]) -> Result<Output> {
        let output = self.run(args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LongCommandError::backend(format!(
                "tmux {} failed: {}",
                args.first().copied().unwrap_or_default(),
                stderr.trim()
            )));
        }
        Ok(output)
    }
}

/// Argument passed to `send-keys -l` for one literal character.
///
/// tmux splits its own argv on a trailing `;`, so a lone semicolon has to be
/// escaped to reach the pane as text.
#[must_use]
pub fn literal_key_arg(c: char) -> String {
    match c {
        ';' => "\\;".to_string(),
        other => other.to_string(),
    }
}

/// tmux key name for the named keys
fn key_name(key: SendKey) -> Option<&'static str> {
    match key {
        SendKey::Escape => Some("Escape"),
        SendKey::ClearLine => Some("C-u"),
        SendKey::Enter => Some("Enter"),
        SendKey::Char(_) => None,
    }
}

#[async_trait]
impl TerminalBackend for TmuxBackend {
    async fn session_exists(&self, session: &str) -> bool {
        match self.run(&["has-session", "-t", session]).await {
            Ok(output) => output.status.success(),
            Err(e) => {
                log::debug!("has-session for '{session}' failed: {e}");
                false
            }
        }
    }

    async fn capture_pane(&self, target: &PaneTarget) -> Result<String> {
        let output = self
            .run_checked(&["capture-pane", "-p", "-t", target.as_str()])
            .await?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn send_keys(&self, target: &PaneTarget, key: SendKey) -> Result<()> {
        if let Some(name) = key_name(key) {
            self.run_checked(&["send-keys", "-t", target.as_str(), name])
                .await?;
        } else if let SendKey::Char(c) = key {
            let arg = literal_key_arg(c);
            self.run_checked(&["send-keys", "-t", target.as_str(), "-l", &arg])
                .await?;
        }
        Ok(())
    }
}
