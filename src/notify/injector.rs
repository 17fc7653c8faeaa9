//! Notice delivery into the agent's pane
//!
//! Delivery types the notice the way a person would: wait for the pane to go
//! quiet, cancel whatever is half-typed, clear the line, send the text one
//! character at a time, then submit twice (the first Enter is sometimes eaten
//! by a transient UI state).
//!
//! Only one delivery runs at a time. Concurrent notices queue on a fair
//! async mutex and are typed in arrival order instead of interleaving.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::sleep;

use super::idle::{IdleDetector, IdleOutcome};
use crate::backend::{SendKey, TerminalBackend};
use crate::error::Result;
use crate::types::{NotifierOptions, PaneTarget, TypingOptions};

/// Result of one delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Every key was sent
    Delivered,
    /// A key send failed; the rest of the sequence was abandoned
    Failed(String),
}

impl Delivery {
    /// Whether the notice reached the pane
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// Types notices into a single pane, one at a time
pub struct SessionInjector {
    backend: Arc<dyn TerminalBackend>,
    target: PaneTarget,
    idle: IdleDetector,
    typing: TypingOptions,
    slot: Mutex<()>,
}

impl SessionInjector {
    /// Injector for the pane named by `options`
    pub fn new(backend: Arc<dyn TerminalBackend>, options: &NotifierOptions) -> Self {
        Self {
            backend,
            target: options.target(),
            idle: IdleDetector::new(options.idle),
            typing: options.typing,
            slot: Mutex::new(()),
        }
    }

    /// Pane this injector writes to
    #[must_use]
    pub fn target(&self) -> &PaneTarget {
        &self.target
    }

    /// Deliver `text` to the pane. Best effort: failures are logged and
    /// reported, never raised.
    pub async fn inject(&self, text: &str) -> Delivery {
        let _slot = self.slot.lock().await;

        if let IdleOutcome::Settled { polls } =
            self.idle.wait_for_idle(self.backend.as_ref(), &self.target).await
        {
            log::debug!("{} settled after {polls} polls", self.target);
        }

        match self.type_notice(text).await {
            Ok(()) => {
                log::info!("Notice delivered to {}: {text}", self.target);
                Delivery::Delivered
            }
            Err(e) => {
                log::error!("Failed to notify {} via tmux: {e}", self.target);
                Delivery::Failed(e.to_string())
            }
        }
    }

    async fn type_notice(&self, text: &str) -> Result<()> {
        log::debug!("{}: clearing input line", self.target);
        self.send(SendKey::Escape).await?;
        sleep(self.typing.after_escape).await;
        self.send(SendKey::ClearLine).await?;
        sleep(self.typing.after_clear).await;

        log::debug!("{}: typing {} chars", self.target, text.chars().count());
        for c in text.chars() {
            self.send(SendKey::Char(c)).await?;
            sleep(self.typing.per_char).await;
        }

        sleep(self.typing.before_submit).await;
        log::debug!("{}: submitting", self.target);
        self.send(SendKey::Enter).await?;
        sleep(self.typing.between_submits).await;
        self.send(SendKey::Enter).await
    }

    async fn send(&self, key: SendKey) -> Result<()> {
        self.backend.send_keys(&self.target, key).await
    }
}

impl std::fmt::Debug for SessionInjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionInjector")
            .field("target", &self.target)
            .field("idle", &self.idle)
            .field("typing", &self.typing)
            .finish_non_exhaustive()
    }
}
