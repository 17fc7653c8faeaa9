// Category stdio Server: Long Command Notifier
//
// This binary serves the run_long_command tool over stdio transport.
// stdout carries the MCP protocol; all logging goes to stderr.

use anyhow::Result;
use kodegen_long_command::{NotifierOptions, serve_stdio};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    serve_stdio(NotifierOptions::default()).await
}
