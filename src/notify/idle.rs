//! Pane idle detection
//!
//! The pane is captured on a fixed cadence. Identical consecutive captures
//! count toward stability; any change resets the count. The pane is idle once
//! enough identical captures have been seen in a row. Waiting is capped so a
//! pane that never settles (spinners, clocks) still gets its notice.

use tokio::time::{Instant, sleep};

use crate::backend::TerminalBackend;
use crate::types::{IdleOptions, PaneTarget};

/// Why [`IdleDetector::wait_for_idle`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleOutcome {
    /// Stable content observed after `polls` capture attempts
    Settled {
        /// Capture attempts made, including failed ones
        polls: u32,
    },
    /// The ceiling elapsed first
    TimedOut,
}

/// Polls a pane until its content stops changing
#[derive(Debug, Clone, Copy)]
pub struct IdleDetector {
    options: IdleOptions,
}

impl IdleDetector {
    /// Detector with the given polling parameters
    #[must_use]
    pub const fn new(options: IdleOptions) -> Self {
        Self { options }
    }

    /// Wait until `target` is idle or the ceiling elapses. Never fails.
    pub async fn wait_for_idle(
        &self,
        backend: &dyn TerminalBackend,
        target: &PaneTarget,
    ) -> IdleOutcome {
        let started = Instant::now();
        let mut last_content = String::new();
        let mut stable_checks = 0u32;
        let mut polls = 0u32;

        while started.elapsed() < self.options.max_wait {
            sleep(self.options.poll_interval).await;
            polls += 1;

            let content = match backend.capture_pane(target).await {
                Ok(content) => content,
                Err(e) => {
                    log::warn!("capture of {target} failed, retrying: {e}");
                    continue;
                }
            };

            if content == last_content {
                stable_checks += 1;
            } else {
                stable_checks = 0;
                last_content = content;
            }

            if stable_checks >= self.options.required_stable_checks {
                log::debug!("{target} idle after {polls} polls");
                return IdleOutcome::Settled { polls };
            }
        }

        log::warn!(
            "{target} never settled within {}s; delivering anyway",
            self.options.max_wait.as_secs()
        );
        IdleOutcome::TimedOut
    }
}

impl Default for IdleDetector {
    fn default() -> Self {
        Self::new(IdleOptions::default())
    }
}
