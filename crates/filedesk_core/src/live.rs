//! Live session state machine: `Idle -> Connecting -> Active -> Closed -> Idle`.
//!
//! All transitions go through the methods below so state resets happen in
//! exactly one place ([`LiveSession::closed`]).

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LivePhase {
    #[default]
    Idle,
    Connecting,
    Active,
    Closed,
}

/// Event pushed by the server over the duplex channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveServerEvent {
    Update { text: String },
    Saved { path: String },
}

/// What the driver of the connection must do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveAction {
    /// Nothing to do; the event did not apply in the current phase.
    Ignore,
    /// A row was appended at this index; the view scrolls to it.
    RowAppended { index: usize },
    /// The session reached its terminal event; close the connection.
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiveSessionError {
    #[error("a live session is already {0:?}; stop it before starting another")]
    Busy(LivePhase),
    #[error("server returned an empty session id")]
    EmptySessionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LiveSession {
    phase: LivePhase,
    session_id: String,
    rows: Vec<String>,
    scroll_to: Option<usize>,
    saved_path: Option<String>,
    last_error: Option<String>,
}

impl LiveSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> LivePhase {
        self.phase
    }

    /// Empty unless a session is connecting, active, or just closed.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn scroll_to(&self) -> Option<usize> {
        self.scroll_to
    }

    pub fn saved_path(&self) -> Option<&str> {
        self.saved_path.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn can_start(&self) -> bool {
        self.phase == LivePhase::Idle
    }

    pub fn handoff_ready(&self) -> bool {
        self.saved_path.is_some()
    }

    /// `Idle -> Connecting`. Clears rows and results of the previous session.
    pub fn begin(&mut self, session_id: impl Into<String>) -> Result<(), LiveSessionError> {
        if self.phase != LivePhase::Idle {
            return Err(LiveSessionError::Busy(self.phase));
        }
        let session_id = session_id.into();
        if session_id.is_empty() {
            return Err(LiveSessionError::EmptySessionId);
        }
        self.session_id = session_id;
        self.rows.clear();
        self.scroll_to = None;
        self.saved_path = None;
        self.last_error = None;
        self.phase = LivePhase::Connecting;
        Ok(())
    }

    /// `Connecting -> Active`. Returns the first outbound message: the session id.
    pub fn opened(&mut self) -> Option<String> {
        if self.phase != LivePhase::Connecting {
            return None;
        }
        self.phase = LivePhase::Active;
        Some(self.session_id.clone())
    }

    pub fn apply(&mut self, event: LiveServerEvent) -> LiveAction {
        if self.phase != LivePhase::Active {
            return LiveAction::Ignore;
        }
        match event {
            LiveServerEvent::Update { text } => {
                self.rows.push(text);
                let index = self.rows.len() - 1;
                self.scroll_to = Some(index);
                LiveAction::RowAppended { index }
            }
            LiveServerEvent::Saved { path } => {
                self.saved_path = Some(path);
                self.phase = LivePhase::Closed;
                LiveAction::Close
            }
        }
    }

    /// Transport failure: terminal, no artifact path for this session.
    pub fn fail(&mut self, message: impl Into<String>) {
        if matches!(self.phase, LivePhase::Connecting | LivePhase::Active) {
            self.last_error = Some(message.into());
            self.phase = LivePhase::Closed;
        }
    }

    /// Any close returns to `Idle` and forgets the session id.
    ///
    /// A close while still connecting or active is a dropped connection and
    /// is treated as terminal.
    pub fn closed(&mut self) {
        if self.phase == LivePhase::Idle {
            return;
        }
        self.session_id.clear();
        self.phase = LivePhase::Idle;
    }
}
