//! MCP tools
//!
//! Provides the `run_long_command` tool that launches background commands
//! and wakes the agent's tmux pane when they finish.

mod run_long_command;

pub use run_long_command::{RUN_LONG_COMMAND, RunLongCommandArgs, RunLongCommandTool};
