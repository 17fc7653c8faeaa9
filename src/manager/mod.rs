//! Managed command execution
//!
//! Provides `CommandRunner` for launching shell commands in the background
//! and delivering a completion notice to the agent's tmux pane.
//!
//! # Module Structure
//!
//! - `runner` - `CommandRunner` with the public launch API
//! - `session` - Command state, acknowledgement and launch handle
//! - `background` - Background supervision and notice hand-off
//! - `output` - Capped stdout/stderr capture

mod background;
mod output;
mod runner;
mod session;

pub use output::OutputBuffer;
pub use runner::CommandRunner;
pub use session::{CommandAck, CommandState, LaunchedCommand};
