use crate::manager::{CommandRunner, LaunchedCommand};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars::JsonSchema;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Registered tool name
pub const RUN_LONG_COMMAND: &str = "run_long_command";

// ============================================================================
// ARGS STRUCTS
// ============================================================================

/// Input for `run_long_command`
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RunLongCommandArgs {
    /// The shell command to execute.
    pub command: String,
}

// ============================================================================
// TOOL STRUCT
// ============================================================================

/// MCP server exposing the `run_long_command` tool
#[derive(Clone)]
pub struct RunLongCommandTool {
    runner: Arc<CommandRunner>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl RunLongCommandTool {
    /// Create the tool around a shared runner
    #[must_use]
    pub fn new(runner: Arc<CommandRunner>) -> Self {
        Self {
            runner,
            tool_router: Self::tool_router(),
        }
    }

    /// Start `command` in the background; the agent's pane is notified when
    /// it finishes.
    #[tool(
        name = "run_long_command",
        description = "Executes a long-running shell command in the background and notifies \
                       the agent when finished.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = true
        )
    )]
    pub async fn run_long_command(
        &self,
        Parameters(args): Parameters<RunLongCommandArgs>,
    ) -> Result<CallToolResult, McpError> {
        log::debug!("{RUN_LONG_COMMAND}: {}", args.command);
        let LaunchedCommand { ack, completion } = match self.runner.launch(&args.command).await {
            Ok(launched) => launched,
            Err(e) if e.is_precondition() => {
                return Ok(CallToolResult::error(vec![Content::text(format!("Error: {e}"))]));
            }
            Err(e) => return Err(e.into()),
        };

        // Detach from this request; the runner still tracks it for shutdown.
        drop(completion);

        let mut contents = Vec::new();

        // Human summary
        contents.push(Content::text(ack.message()));

        // Machine-readable JSON
        let metadata = json!({
            "action": "run",
            "command_id": ack.command_id,
            "command": ack.command,
            "pid": ack.pid,
            "cwd": ack.cwd,
            "started_at": ack.started_at,
            "state": ack.state,
        });
        let json_str =
            serde_json::to_string_pretty(&metadata).unwrap_or_else(|_| "{}".to_string());
        contents.push(Content::text(json_str));

        Ok(CallToolResult::success(contents))
    }
}

#[tool_handler]
impl ServerHandler for RunLongCommandTool {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(format!(
                "Runs long shell commands in the background. Requires the tmux session '{}'; \
                 a completion notice is typed into pane {} when each command finishes.",
                self.runner.options().session_name,
                self.runner.options().target()
            )),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "run-long-command-server".to_string(),
                version: crate::VERSION.to_string(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }
}
