//! Terminal backend abstraction
//!
//! Everything the notifier needs from the terminal multiplexer goes through
//! [`TerminalBackend`]: a session existence probe, a pane capture, and a
//! single key send. [`TmuxBackend`] shells out to the `tmux` CLI;
//! [`MemoryBackend`] is an in-memory fake that records every call.

pub mod memory;
pub mod tmux;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::PaneTarget;

pub use memory::{BackendCall, MemoryBackend};
pub use tmux::TmuxBackend;

/// One key-send operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendKey {
    /// Cancel in-progress input
    Escape,
    /// Clear the current input line
    ClearLine,
    /// Submit
    Enter,
    /// A single literal character
    Char(char),
}

/// Capability set the notifier needs from a terminal multiplexer
#[async_trait]
pub trait TerminalBackend: Send + Sync {
    /// Whether the named session exists. Any failure counts as absent.
    async fn session_exists(&self, session: &str) -> bool;

    /// Rendered text currently visible in the pane
    ///
    /// # Errors
    /// Returns error if the pane cannot be captured
    async fn capture_pane(&self, target: &PaneTarget) -> Result<String>;

    /// Send one key to the pane
    ///
    /// # Errors
    /// Returns error if the key could not be delivered
    async fn send_keys(&self, target: &PaneTarget, key: SendKey) -> Result<()>;
}
