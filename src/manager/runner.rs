//! Command runner
//!
//! Accepts a shell command, checks that the agent's tmux session exists,
//! spawns the command detached from the request and hands it to a
//! background supervisor. The caller only ever sees the precondition
//! failure or the acknowledgement; everything after that ends in a notice
//! or a log line.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use chrono::Utc;
use tokio::process::Command;
use tokio::time::Instant;
use tokio_util::task::TaskTracker;

use super::background::{SupervisorContext, spawn_failure_notice, spawn_supervisor};
use super::output::OutputBuffer;
use super::session::{CommandAck, CommandState, LaunchedCommand};
use crate::backend::TerminalBackend;
use crate::error::{LongCommandError, Result};
use crate::notify::{NoticeComposer, SessionInjector};
use crate::types::{CommandId, NotifierOptions};

/// Launches managed commands and wires their notices to one pane
pub struct CommandRunner {
    backend: Arc<dyn TerminalBackend>,
    options: NotifierOptions,
    composer: NoticeComposer,
    injector: Arc<SessionInjector>,
    supervisors: TaskTracker,
}

impl CommandRunner {
    /// Runner notifying the pane described by `options` through `backend`
    pub fn new(backend: Arc<dyn TerminalBackend>, options: NotifierOptions) -> Self {
        let injector = Arc::new(SessionInjector::new(Arc::clone(&backend), &options));
        Self {
            composer: NoticeComposer::from_options(&options),
            backend,
            options,
            injector,
            supervisors: TaskTracker::new(),
        }
    }

    /// Options this runner was built with
    #[must_use]
    pub fn options(&self) -> &NotifierOptions {
        &self.options
    }

    /// Validate, spawn and detach `command`
    ///
    /// # Errors
    /// Returns error if the command is empty, the target session does not
    /// exist, or the working directory cannot be determined. A command that
    /// fails to spawn is *not* an error here: it is acknowledged and its
    /// failure is delivered as a notice.
    pub async fn launch(&self, command: &str) -> Result<LaunchedCommand> {
        if command.trim().is_empty() {
            return Err(LongCommandError::invalid_arguments("command must not be empty"));
        }

        let command_id = CommandId::generate();
        log::debug!("[{command_id}] {}: {command}", CommandState::Validating);

        if !self.backend.session_exists(&self.options.session_name).await {
            log::warn!(
                "[{command_id}] rejected, tmux session '{}' not found",
                self.options.session_name
            );
            return Err(LongCommandError::session_not_found(&self.options.session_name));
        }

        let cwd = self.working_dir()?;
        let started = Instant::now();
        let started_at = Utc::now();
        let ctx = SupervisorContext {
            command_id: command_id.clone(),
            command: command.to_string(),
            started,
            output: OutputBuffer::new(self.options.output_cap),
            composer: self.composer,
            injector: Arc::clone(&self.injector),
        };

        let (pid, state, completion) = match shell_command(command, &cwd).spawn() {
            Ok(child) => {
                let pid = child.id();
                log::info!(
                    "[{command_id}] {} (pid {pid:?}, cwd {}): {command}",
                    CommandState::Running,
                    cwd.display()
                );
                let completion = spawn_supervisor(&self.supervisors, child, ctx);
                (pid, CommandState::Running, completion)
            }
            Err(e) => {
                log::error!("[{command_id}] spawn failed: {e}");
                let completion = spawn_failure_notice(&self.supervisors, e.to_string(), ctx);
                (None, CommandState::Failed, completion)
            }
        };

        Ok(LaunchedCommand {
            ack: CommandAck {
                command_id,
                command: command.to_string(),
                pid,
                cwd,
                started_at,
                state,
            },
            completion,
        })
    }

    /// Commands whose notice has not been attempted yet
    #[must_use]
    pub fn pending(&self) -> usize {
        self.supervisors.len()
    }

    /// Wait until every launched command has exited and its notice has been
    /// attempted. Commands launched while waiting are waited for too.
    pub async fn shutdown(&self) {
        let pending = self.pending();
        if pending > 0 {
            log::info!("waiting for {pending} running command(s) to deliver their notices");
        }
        self.supervisors.close();
        self.supervisors.wait().await;
        self.supervisors.reopen();
    }

    fn working_dir(&self) -> Result<PathBuf> {
        match &self.options.working_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }
}

/// `sh -c <command>` in its own process group with piped output
fn shell_command(command: &str, cwd: &Path) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(command)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(false);

    #[cfg(unix)]
    cmd.process_group(0);

    cmd
}

impl std::fmt::Debug for CommandRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRunner")
            .field("options", &self.options)
            .field("composer", &self.composer)
            .field("injector", &self.injector)
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}
