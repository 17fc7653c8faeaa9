//! Unit tests for the `run_long_command` MCP tool
//!
//! Calls the tool handler directly, the way the MCP router would.

use std::sync::Arc;
use std::time::Duration;

use kodegen_long_command::tools::RUN_LONG_COMMAND;
use kodegen_long_command::{
    CommandRunner, IdleOptions, MemoryBackend, NotifierOptions, RunLongCommandArgs,
    RunLongCommandTool, TypingOptions,
};
use rmcp::ServerHandler;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;

fn tool(backend: &MemoryBackend, dir: &std::path::Path) -> RunLongCommandTool {
    RunLongCommandTool::new(runner(backend, dir))
}

fn runner(backend: &MemoryBackend, dir: &std::path::Path) -> Arc<CommandRunner> {
    let options = NotifierOptions::builder()
        .idle(IdleOptions {
            poll_interval: Duration::from_millis(1),
            required_stable_checks: 2,
            max_wait: Duration::from_secs(1),
        })
        .typing(TypingOptions {
            after_escape: Duration::ZERO,
            after_clear: Duration::ZERO,
            per_char: Duration::ZERO,
            before_submit: Duration::ZERO,
            between_submits: Duration::ZERO,
        })
        .working_dir(dir)
        .build();
    Arc::new(CommandRunner::new(Arc::new(backend.clone()), options))
}

fn text(result: &CallToolResult, index: usize) -> String {
    result
        .content
        .get(index)
        .and_then(|content| content.raw.as_text())
        .map(|text| text.text.clone())
        .expect("text content")
}

fn args(command: &str) -> Parameters<RunLongCommandArgs> {
    Parameters(RunLongCommandArgs {
        command: command.to_string(),
    })
}

#[tokio::test]
async fn test_rejects_outside_session() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().expect("tempdir");
    let backend = MemoryBackend::new();

    let result = tool(&backend, dir.path())
        .run_long_command(args("sleep 1"))
        .await
        .expect("tool call");

    assert_eq!(result.is_error, Some(true));
    assert_eq!(
        text(&result, 0),
        "Error: Not running inside tmux session 'gemini-cli'. This tool requires being in a \
         tmux session named 'gemini-cli' to wake up the agent upon completion."
    );
}

#[tokio::test]
async fn test_rejects_empty_command() {
    let dir = tempfile::tempdir().expect("tempdir");
    let backend = MemoryBackend::with_session("gemini-cli");

    let result = tool(&backend, dir.path())
        .run_long_command(args(""))
        .await
        .expect("tool call");

    assert_eq!(result.is_error, Some(true));
    assert!(text(&result, 0).contains("command must not be empty"));
}

#[tokio::test]
async fn test_acknowledges_and_detaches() {
    let dir = tempfile::tempdir().expect("tempdir");
    let backend = MemoryBackend::with_session("gemini-cli");
    let runner = runner(&backend, dir.path());

    let result = RunLongCommandTool::new(Arc::clone(&runner))
        .run_long_command(args("sleep 0.2; echo done"))
        .await
        .expect("tool call");

    assert_eq!(result.is_error, Some(false));
    let summary = text(&result, 0);
    assert!(summary.starts_with("Command \"sleep 0.2; echo done\" started in the background (PID: "));
    assert!(summary.contains(&format!("CWD: {}", dir.path().display())));
    assert!(summary.ends_with("I will notify you when it finishes."));

    // The call returned before the command finished.
    assert!(backend.sent_keys().is_empty());

    let metadata: serde_json::Value =
        serde_json::from_str(&text(&result, 1)).expect("json metadata");
    assert_eq!(metadata["action"], "run");
    assert_eq!(metadata["command"], "sleep 0.2; echo done");
    assert_eq!(metadata["state"], "running");
    assert!(metadata["pid"].is_u64());

    // The detached supervisor still delivers the notice.
    assert_eq!(runner.pending(), 1);
    tokio::time::timeout(Duration::from_secs(10), runner.shutdown())
        .await
        .expect("notice attempted in time");
    assert_eq!(runner.pending(), 0);
    assert_eq!(
        backend.typed_text(),
        "Cmd: \"sleep 0.2; e...\" (0) Out: [done] (Warn: Instant Exit)"
    );
}

#[tokio::test]
async fn test_server_info_exposes_tools() {
    let dir = tempfile::tempdir().expect("tempdir");
    let backend = MemoryBackend::new();

    let info = tool(&backend, dir.path()).get_info();

    assert!(info.capabilities.tools.is_some());
    assert_eq!(info.server_info.name, "run-long-command-server");
    assert!(
        info.instructions
            .expect("instructions")
            .contains("gemini-cli:0.0")
    );
}

#[test]
fn test_tool_definition() {
    let definition = RunLongCommandTool::run_long_command_tool_attr();

    assert_eq!(definition.name, RUN_LONG_COMMAND);
    assert_eq!(
        definition.description.as_deref(),
        Some("Executes a long-running shell command in the background and notifies the agent when finished.")
    );
}
