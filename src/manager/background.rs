//! Background supervision of managed commands
//!
//! Each accepted command gets one detached task. The task owns the child,
//! drains both pipes into the command's output buffer, waits for exit, then
//! composes and delivers the notice. Nothing it does is reported back to the
//! original caller.

use std::sync::Arc;

use tokio::process::Child;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::task::TaskTracker;

use super::output::OutputBuffer;
use super::session::CommandState;
use crate::notify::{Delivery, NoticeComposer, Outcome, SessionInjector};
use crate::types::CommandId;

/// Everything the supervisor needs besides the child itself
pub(super) struct SupervisorContext {
    pub command_id: CommandId,
    pub command: String,
    pub started: Instant,
    pub output: OutputBuffer,
    pub composer: NoticeComposer,
    pub injector: Arc<SessionInjector>,
}

impl SupervisorContext {
    async fn finish(self, outcome: Outcome) -> Delivery {
        let duration = self.started.elapsed();
        let state = match outcome {
            Outcome::Exited(_) => CommandState::Completed,
            Outcome::Failed(_) => CommandState::Failed,
        };
        log::info!(
            "[{}] {state} after {}ms: {outcome:?}",
            self.command_id,
            duration.as_millis()
        );

        let notice =
            self.composer
                .compose(&self.command, &outcome, &self.output.snapshot(), duration);
        let delivery = self.injector.inject(&notice).await;
        if let Delivery::Failed(reason) = &delivery {
            log::error!("[{}] notice dropped: {reason}", self.command_id);
        }
        delivery
    }
}

/// Supervise a running child until its notice has been attempted
pub(super) fn spawn_supervisor(
    tracker: &TaskTracker,
    mut child: Child,
    ctx: SupervisorContext,
) -> JoinHandle<Delivery> {
    tracker.spawn(async move {
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let drain_stdout = async {
            if let Some(stdout) = stdout {
                ctx.output.drain(stdout).await;
            }
        };
        let drain_stderr = async {
            if let Some(stderr) = stderr {
                ctx.output.drain(stderr).await;
            }
        };

        let (status, (), ()) = tokio::join!(child.wait(), drain_stdout, drain_stderr);
        let outcome = match status {
            Ok(status) => Outcome::Exited(status.into()),
            Err(e) => Outcome::Failed(e.to_string()),
        };

        ctx.finish(outcome).await
    })
}

/// Deliver the error notice for a command that never started
pub(super) fn spawn_failure_notice(
    tracker: &TaskTracker,
    message: String,
    ctx: SupervisorContext,
) -> JoinHandle<Delivery> {
    tracker.spawn(async move { ctx.finish(Outcome::Failed(message)).await })
}
