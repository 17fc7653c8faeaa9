//! # Long Command Notifier
//!
//! An MCP tool server with a single tool, `run_long_command`. The tool starts
//! a shell command in the background and returns immediately. When the
//! command finishes, a short completion notice is typed into the agent's tmux
//! pane so an agent that was waiting on it wakes up and carries on.
//!
//! ## Quick Start
//!
//! ```no_run
//! use kodegen_long_command::{NotifierOptions, serve_stdio};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     serve_stdio(NotifierOptions::default()).await
//! }
//! ```
//!
//! ## Notice Pipeline
//!
//! 1. [`CommandRunner`] checks that the target tmux session exists. If it
//!    does not, the tool answers with an error and nothing is spawned.
//! 2. The command runs under `sh -c` in its own process group. stdout and
//!    stderr share one buffer capped at 200 characters.
//! 3. On exit, [`NoticeComposer`] builds a notice of at most 64 characters:
//!    `Cmd: "<cmd>" (<code>) Out: [<out>]` or `Err: "<cmd>" (<message>)`.
//! 4. [`SessionInjector`] waits for the pane to stay unchanged for ten
//!    consecutive one-second polls (ten minutes at most), clears the input
//!    line, types the notice one character at a time, and presses Enter twice.
//!
//! Only one notice is typed at a time; concurrent completions queue.
//!
//! ## Testing Without tmux
//!
//! Everything that touches the multiplexer goes through [`TerminalBackend`].
//! [`MemoryBackend`] records calls and serves scripted pane captures:
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use kodegen_long_command::{CommandRunner, MemoryBackend, NotifierOptions};
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = MemoryBackend::with_session("gemini-cli");
//! let runner = CommandRunner::new(Arc::new(backend.clone()), NotifierOptions::default());
//!
//! let launched = runner.launch("echo hi").await?;
//! launched.completion.await?;
//! assert!(backend.typed_text().starts_with("Cmd: \"echo hi\" (0)"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Only precondition failures reach the caller, as
//! [`Result<T, LongCommandError>`](Result). Everything after the spawn ends in
//! a notice or a log line on stderr.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod manager;
pub mod notify;
pub mod tools;
pub mod types;

// Re-export commonly used types for external API
pub use backend::{BackendCall, MemoryBackend, SendKey, TerminalBackend, TmuxBackend};
pub use error::{LongCommandError, Result};
pub use manager::{CommandAck, CommandRunner, CommandState, LaunchedCommand, OutputBuffer};
pub use notify::{
    Delivery, ExitCode, IdleDetector, IdleOutcome, NoticeComposer, Outcome, SessionInjector,
};
pub use tools::{RunLongCommandArgs, RunLongCommandTool};
pub use types::{
    CommandId, IdleOptions, NotifierOptions, NotifierOptionsBuilder, PaneTarget, TypingOptions,
};

/// Version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// STDIO SERVER FUNCTION
// ============================================================================

use rmcp::ServiceExt;
use std::sync::Arc;

/// Serve `run_long_command` over stdin/stdout until the client disconnects
///
/// Uses the real tmux backend. Logging must already be routed to stderr.
///
/// # Errors
/// Returns error if the MCP handshake or transport fails
pub async fn serve_stdio(options: NotifierOptions) -> anyhow::Result<()> {
    let backend: Arc<dyn TerminalBackend> = Arc::new(TmuxBackend::new());
    log::info!(
        "run-long-command {VERSION} serving on stdio, notices go to {}",
        options.target()
    );

    let runner = Arc::new(CommandRunner::new(backend, options));
    let service = RunLongCommandTool::new(Arc::clone(&runner))
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start MCP service: {e}"))?;

    let ended = service.waiting().await;

    log::info!("client disconnected, shutting down");
    runner.shutdown().await;

    ended.map_err(|e| anyhow::anyhow!("MCP service ended abnormally: {e}"))?;
    Ok(())
}
