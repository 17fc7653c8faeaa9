//! Completion notice composition
//!
//! A notice is the single line typed into the agent's pane when a managed
//! command ends. It has to fit a small fixed budget, so the command, the
//! exit code and the captured output compete for space:
//!
//! ```text
//! Cmd: "<cmd>" (<code>) Out: [<out>]
//! Cmd: "<cmd>" (<code>) Out: [<out>] (Warn: Instant Exit)
//! Err: "<cmd>" (<message>)
//! ```
//!
//! All lengths are counted in `char`s, never bytes, so no input can split a
//! code point or panic a slice.

use std::fmt;
use std::time::Duration;

use crate::types::NotifierOptions;

/// Marker appended to anything cut short
pub const ELLIPSIS: &str = "...";

/// Suffix added when the command finished suspiciously fast
pub const INSTANT_EXIT_WARNING: &str = " (Warn: Instant Exit)";

/// Fixed characters around a success notice's fields
const SUCCESS_OVERHEAD: usize = 17;

/// Fixed characters around an error notice's fields
const ERROR_OVERHEAD: usize = 10;

/// How a finished command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Normal exit with a status code
    Code(i32),
    /// Terminated by a signal
    Signal(i32),
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Signal(signal) => write!(f, "SIG{signal}"),
        }
    }
}

impl From<std::process::ExitStatus> for ExitCode {
    fn from(status: std::process::ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self::Code(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self::Signal(signal);
            }
        }
        Self::Code(-1)
    }
}

/// Terminal state of a managed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The process ran and exited
    Exited(ExitCode),
    /// The process could not be started or supervised
    Failed(String),
}

/// Builds bounded completion notices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeComposer {
    budget: usize,
    max_command_chars: usize,
    instant_exit_threshold: Duration,
}

impl Default for NoticeComposer {
    fn default() -> Self {
        Self::from_options(&NotifierOptions::default())
    }
}

impl NoticeComposer {
    /// Composer using the budgets from `options`
    #[must_use]
    pub fn from_options(options: &NotifierOptions) -> Self {
        Self {
            budget: options.notice_budget,
            max_command_chars: options.max_command_chars,
            instant_exit_threshold: options.instant_exit_threshold,
        }
    }

    /// Maximum notice length in characters
    #[must_use]
    pub const fn budget(&self) -> usize {
        self.budget
    }

    /// Compose the notice for any outcome
    #[must_use]
    pub fn compose(
        &self,
        command: &str,
        outcome: &Outcome,
        output: &str,
        duration: Duration,
    ) -> String {
        match outcome {
            Outcome::Exited(code) => self.compose_exit(command, *code, output, duration),
            Outcome::Failed(message) => self.compose_failure(command, message),
        }
    }

    /// `Cmd: "<cmd>" (<code>) Out: [<out>]`, plus the instant-exit warning
    #[must_use]
    pub fn compose_exit(
        &self,
        command: &str,
        code: ExitCode,
        output: &str,
        duration: Duration,
    ) -> String {
        let cmd = self.command_fragment(command);
        let code = format!("({code})");
        let instant = duration < self.instant_exit_threshold;

        let mut overhead = SUCCESS_OVERHEAD + char_len(&cmd) + char_len(&code);
        if instant {
            overhead += char_len(INSTANT_EXIT_WARNING);
        }
        let out = fit(&collapse_lines(output), available(self.budget, overhead));

        let mut notice = format!("Cmd: \"{cmd}\" {code} Out: [{out}]");
        if instant {
            notice.push_str(INSTANT_EXIT_WARNING);
        }
        clamp(notice, self.budget)
    }

    /// `Err: "<cmd>" (<message>)`
    #[must_use]
    pub fn compose_failure(&self, command: &str, message: &str) -> String {
        let cmd = self.command_fragment(command);
        let overhead = ERROR_OVERHEAD + char_len(&cmd);
        let message = fit(&collapse_lines(message), available(self.budget, overhead));

        clamp(format!("Err: \"{cmd}\" ({message})"), self.budget)
    }

    /// Command text as shown in a notice
    #[must_use]
    pub fn command_fragment(&self, command: &str) -> String {
        let command = collapse_lines(command);
        if char_len(&command) > self.max_command_chars {
            let keep = self.max_command_chars.saturating_sub(char_len(ELLIPSIS));
            format!("{}{ELLIPSIS}", take_chars(&command, keep))
        } else {
            command
        }
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn take_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Space left for a variable field; negative when the fixed parts overflow
fn available(budget: usize, overhead: usize) -> isize {
    budget as isize - overhead as isize
}

/// Cut `text` to `available` characters, ending in the ellipsis when cut
fn fit(text: &str, available: isize) -> String {
    if char_len(text) as isize <= available {
        return text.to_string();
    }
    let keep = usize::try_from(available - char_len(ELLIPSIS) as isize).unwrap_or(0);
    format!("{}{ELLIPSIS}", take_chars(text, keep))
}

/// Last line of defence: never hand out more than `budget` characters
fn clamp(notice: String, budget: usize) -> String {
    if char_len(&notice) <= budget {
        return notice;
    }
    let keep = budget.saturating_sub(char_len(ELLIPSIS));
    format!("{}{ELLIPSIS}", take_chars(&notice, keep))
}

/// Runs of CR/LF become one space; surrounding whitespace is trimmed
fn collapse_lines(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut in_break = false;
    for c in text.chars() {
        if c == '\r' || c == '\n' {
            if !in_break {
                collapsed.push(' ');
                in_break = true;
            }
        } else {
            collapsed.push(c);
            in_break = false;
        }
    }
    collapsed.trim().to_string()
}
