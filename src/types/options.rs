//! Notifier options and configuration
//!
//! This module contains the configuration for the notifier: which tmux pane
//! receives completion notices, how idleness is detected, how fast keys are
//! typed, and the size budgets for notices and captured output. Every value
//! defaults to the constants the tool has always shipped with.

use std::path::PathBuf;
use std::time::Duration;

use super::identifiers::PaneTarget;

// ============================================================================
// Defaults
// ============================================================================

/// Session that hosts the agent waiting for notices
pub const DEFAULT_SESSION_NAME: &str = "gemini-cli";

/// First window, first pane
pub const DEFAULT_PANE: &str = "0.0";

/// Maximum number of characters in a completion notice
pub const DEFAULT_NOTICE_BUDGET: usize = 64;

/// Maximum number of characters of the command shown in a notice
pub const DEFAULT_MAX_COMMAND_CHARS: usize = 15;

/// Runs shorter than this get the instant-exit warning
pub const DEFAULT_INSTANT_EXIT_THRESHOLD: Duration = Duration::from_millis(1000);

/// Captured stdout + stderr cap, in characters
pub const DEFAULT_OUTPUT_CAP: usize = 200;

// ============================================================================
// Idle detection
// ============================================================================

/// Polling parameters for pane idle detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleOptions {
    /// Delay between two pane captures
    pub poll_interval: Duration,
    /// Consecutive identical captures required to call the pane idle
    pub required_stable_checks: u32,
    /// Give up waiting after this long and deliver anyway
    pub max_wait: Duration,
}

impl Default for IdleOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            required_stable_checks: 10,
            max_wait: Duration::from_secs(600),
        }
    }
}

// ============================================================================
// Key injection
// ============================================================================

/// Delays between the keystrokes of one notice delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingOptions {
    /// Pause after the Escape that cancels in-progress input
    pub after_escape: Duration,
    /// Pause after the C-u line clear
    pub after_clear: Duration,
    /// Pause after each typed character
    pub per_char: Duration,
    /// Settle time before the first Enter
    pub before_submit: Duration,
    /// Pause between the two Enters
    pub between_submits: Duration,
}

impl Default for TypingOptions {
    fn default() -> Self {
        Self {
            after_escape: Duration::from_millis(100),
            after_clear: Duration::from_millis(200),
            per_char: Duration::from_millis(20),
            before_submit: Duration::from_millis(500),
            between_submits: Duration::from_millis(500),
        }
    }
}

// ============================================================================
// Notifier Options
// ============================================================================

/// Main options for the notifier
#[derive(Debug, Clone)]
pub struct NotifierOptions {
    /// tmux session that must exist before a command is accepted
    pub session_name: String,
    /// `window.pane` coordinate inside the session
    pub pane: String,
    /// Idle detection parameters
    pub idle: IdleOptions,
    /// Keystroke pacing
    pub typing: TypingOptions,
    /// Maximum notice length in characters
    pub notice_budget: usize,
    /// Maximum command fragment length in characters
    pub max_command_chars: usize,
    /// Instant-exit warning threshold
    pub instant_exit_threshold: Duration,
    /// Captured output cap in characters
    pub output_cap: usize,
    /// Working directory for spawned commands (process cwd when unset)
    pub working_dir: Option<PathBuf>,
}

impl Default for NotifierOptions {
    fn default() -> Self {
        Self {
            session_name: DEFAULT_SESSION_NAME.to_string(),
            pane: DEFAULT_PANE.to_string(),
            idle: IdleOptions::default(),
            typing: TypingOptions::default(),
            notice_budget: DEFAULT_NOTICE_BUDGET,
            max_command_chars: DEFAULT_MAX_COMMAND_CHARS,
            instant_exit_threshold: DEFAULT_INSTANT_EXIT_THRESHOLD,
            output_cap: DEFAULT_OUTPUT_CAP,
            working_dir: None,
        }
    }
}

impl NotifierOptions {
    /// Create a new builder for `NotifierOptions`
    #[must_use]
    pub fn builder() -> NotifierOptionsBuilder {
        NotifierOptionsBuilder::default()
    }

    /// The pane that receives notices
    #[must_use]
    pub fn target(&self) -> PaneTarget {
        PaneTarget::new(&self.session_name, &self.pane)
    }
}

// ============================================================================
// Builder for NotifierOptions
// ============================================================================

/// Builder for `NotifierOptions`
#[derive(Debug, Default)]
pub struct NotifierOptionsBuilder {
    options: NotifierOptions,
}

impl NotifierOptionsBuilder {
    /// Set the tmux session name
    #[must_use]
    pub fn session_name(mut self, name: impl Into<String>) -> Self {
        self.options.session_name = name.into();
        self
    }

    /// Set the `window.pane` coordinate
    #[must_use]
    pub fn pane(mut self, pane: impl Into<String>) -> Self {
        self.options.pane = pane.into();
        self
    }

    /// Set idle detection parameters
    #[must_use]
    pub fn idle(mut self, idle: IdleOptions) -> Self {
        self.options.idle = idle;
        self
    }

    /// Set keystroke pacing
    #[must_use]
    pub fn typing(mut self, typing: TypingOptions) -> Self {
        self.options.typing = typing;
        self
    }

    /// Set the notice budget
    ///
    /// # Panics
    /// Panics if the budget cannot hold the shortest error notice
    #[must_use]
    pub fn notice_budget(mut self, budget: usize) -> Self {
        const MIN_BUDGET: usize = 16;
        assert!(
            budget >= MIN_BUDGET,
            "notice_budget {budget} is below the minimum of {MIN_BUDGET}"
        );
        self.options.notice_budget = budget;
        self
    }

    /// Set the command fragment length
    ///
    /// # Panics
    /// Panics if the length cannot hold the ellipsis marker
    #[must_use]
    pub fn max_command_chars(mut self, chars: usize) -> Self {
        assert!(chars > 3, "max_command_chars {chars} must exceed the ellipsis");
        self.options.max_command_chars = chars;
        self
    }

    /// Set the instant-exit threshold
    #[must_use]
    pub fn instant_exit_threshold(mut self, threshold: Duration) -> Self {
        self.options.instant_exit_threshold = threshold;
        self
    }

    /// Set the captured output cap
    #[must_use]
    pub fn output_cap(mut self, cap: usize) -> Self {
        self.options.output_cap = cap;
        self
    }

    /// Set the working directory for spawned commands
    #[must_use]
    pub fn working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.working_dir = Some(path.into());
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> NotifierOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_constants() {
        let options = NotifierOptions::default();
        assert_eq!(options.target().as_str(), "gemini-cli:0.0");
        assert_eq!(options.idle.poll_interval, Duration::from_secs(1));
        assert_eq!(options.idle.required_stable_checks, 10);
        assert_eq!(options.idle.max_wait, Duration::from_secs(600));
        assert_eq!(options.typing.per_char, Duration::from_millis(20));
        assert_eq!(options.notice_budget, 64);
        assert_eq!(options.max_command_chars, 15);
        assert_eq!(options.output_cap, 200);
        assert!(options.working_dir.is_none());
    }

    #[test]
    fn builder_overrides_target() {
        let options = NotifierOptions::builder()
            .session_name("agent")
            .pane("1.2")
            .build();
        assert_eq!(options.target().as_str(), "agent:1.2");
    }

    #[test]
    #[should_panic(expected = "below the minimum")]
    fn builder_rejects_tiny_budget() {
        let _ = NotifierOptions::builder().notice_budget(4);
    }
}
