//! In-memory terminal backend
//!
//! Records every call and serves scripted pane captures, so the idle
//! detector, injector and runner can be exercised without a tmux server.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{SendKey, TerminalBackend};
use crate::error::{LongCommandError, Result};
use crate::types::PaneTarget;

/// A call observed by [`MemoryBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    /// `session_exists(session)`
    SessionExists(String),
    /// `capture_pane(target)`
    CapturePane(PaneTarget),
    /// `send_keys(target, key)`
    SendKeys(PaneTarget, SendKey),
}

#[derive(Debug, Default)]
struct State {
    sessions: HashSet<String>,
    captures: VecDeque<Option<String>>,
    steady_pane: String,
    fail_send_keys: bool,
    calls: Vec<BackendCall>,
}

/// Fake backend shared between the code under test and the test body
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<State>>,
}

impl MemoryBackend {
    /// Backend with no sessions and an empty pane
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend where `session` exists
    pub fn with_session(session: impl Into<String>) -> Self {
        let backend = Self::new();
        backend.add_session(session);
        backend
    }

    /// Make `session` exist
    pub fn add_session(&self, session: impl Into<String>) {
        self.state.lock().sessions.insert(session.into());
    }

    /// Content returned once the capture script is exhausted
    pub fn set_pane(&self, content: impl Into<String>) {
        self.state.lock().steady_pane = content.into();
    }

    /// Queue captures; `None` makes that capture fail
    pub fn script_captures<I>(&self, captures: I)
    where
        I: IntoIterator<Item = Option<String>>,
    {
        self.state.lock().captures.extend(captures);
    }

    /// Make every subsequent `send_keys` fail
    pub fn fail_send_keys(&self, fail: bool) {
        self.state.lock().fail_send_keys = fail;
    }

    /// Every call observed so far
    #[must_use]
    pub fn calls(&self) -> Vec<BackendCall> {
        self.state.lock().calls.clone()
    }

    /// Keys sent so far, in order
    #[must_use]
    pub fn sent_keys(&self) -> Vec<SendKey> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::SendKeys(_, key) => Some(*key),
                _ => None,
            })
            .collect()
    }

    /// Literal characters sent so far, concatenated
    #[must_use]
    pub fn typed_text(&self) -> String {
        self.sent_keys()
            .into_iter()
            .filter_map(|key| match key {
                SendKey::Char(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    /// Number of pane captures taken so far
    #[must_use]
    pub fn capture_count(&self) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| matches!(call, BackendCall::CapturePane(_)))
            .count()
    }
}

#[async_trait]
impl TerminalBackend for MemoryBackend {
    async fn session_exists(&self, session: &str) -> bool {
        let mut state = self.state.lock();
        state
            .calls
            .push(BackendCall::SessionExists(session.to_string()));
        state.sessions.contains(session)
    }

    async fn capture_pane(&self, target: &PaneTarget) -> Result<String> {
        let mut state = self.state.lock();
        state.calls.push(BackendCall::CapturePane(target.clone()));
        match state.captures.pop_front() {
            Some(Some(content)) => Ok(content),
            Some(None) => Err(LongCommandError::backend(format!(
                "can't find pane: {target}"
            ))),
            None => Ok(state.steady_pane.clone()),
        }
    }

    async fn send_keys(&self, target: &PaneTarget, key: SendKey) -> Result<()> {
        let mut state = self.state.lock();
        if state.fail_send_keys {
            return Err(LongCommandError::backend("no server running"));
        }
        state.calls.push(BackendCall::SendKeys(target.clone(), key));
        Ok(())
    }
}
