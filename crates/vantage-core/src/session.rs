//! Conversational query session
//!
//! A linear, append-only conversation with an answering service:
//!
//! ```text
//!            submit(text)                 complete(ticket, outcome)
//!   Idle ───────────────────▶ Awaiting ───────────────────────────▶ Idle
//!    ▲  empty text / already awaiting: no-op                         │
//!    └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Mutual exclusion is structural. `submit` hands out the only
//! `PendingQuery` ticket, which cannot be cloned or built elsewhere, and
//! `complete` consumes it, or hands it back when it belongs elsewhere.
//! `ask` runs the whole exchange while holding `&mut self`, so no second
//! submission can start during the await. If that future is dropped before
//! the service answers, the exchange is closed with the fallback text.
//!
//! Failures are answered in-line: the assistant message carries the error's
//! detail, or the configured fallback text, and the session is idle again.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::ai::{Answer, AnswerService};
use crate::config::AssistantConfig;
use crate::error::Result;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One entry of the conversation log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

/// Session phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// One request in flight for the given (trimmed) query
    Awaiting { query: String },
}

/// Proof that a request is outstanding
///
/// Only `QuerySession::submit` creates one; `complete` consumes it.
#[derive(Debug)]
#[must_use = "a pending query must be completed or the session stays awaiting"]
pub struct PendingQuery {
    session_id: u64,
    query: String,
}

impl PendingQuery {
    /// The trimmed text to send to the answering service
    pub fn query(&self) -> &str {
        &self.query
    }
}

#[derive(Debug)]
pub struct QuerySession {
    id: u64,
    messages: Vec<Message>,
    phase: Phase,
    next_message_id: u64,
    fallback_message: String,
}

impl QuerySession {
    /// Start a session seeded with the welcome message
    pub fn new(welcome_message: impl Into<String>, fallback_message: impl Into<String>) -> Self {
        let mut session = Self {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            messages: Vec::new(),
            phase: Phase::Idle,
            next_message_id: 1,
            fallback_message: fallback_message.into(),
        };
        session.append(Sender::Assistant, welcome_message.into());
        session
    }

    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(&config.welcome_message, &config.fallback_message)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// True while one request is outstanding
    pub fn is_pending(&self) -> bool {
        matches!(self.phase, Phase::Awaiting { .. })
    }

    /// Accept a user query
    ///
    /// Returns `None` (and changes nothing) when the text is blank or a
    /// request is already in flight. Otherwise appends the user message and
    /// returns the ticket for the single service call.
    pub fn submit(&mut self, text: &str) -> Option<PendingQuery> {
        let query = text.trim();
        if query.is_empty() {
            debug!(session = self.id, "Ignoring empty query");
            return None;
        }
        if self.is_pending() {
            debug!(session = self.id, "Ignoring query while a request is in flight");
            return None;
        }

        self.append(Sender::User, query.to_string());
        self.phase = Phase::Awaiting {
            query: query.to_string(),
        };
        debug!(session = self.id, chars = query.len(), "Query submitted");

        Some(PendingQuery {
            session_id: self.id,
            query: query.to_string(),
        })
    }

    /// Resolve the outstanding request with the service outcome
    ///
    /// Appends exactly one assistant message and returns to idle. A ticket
    /// this session did not issue changes nothing and is handed back, so the
    /// caller can still complete it on its own session.
    pub fn complete(
        &mut self,
        ticket: PendingQuery,
        outcome: Result<Answer>,
    ) -> std::result::Result<&Message, PendingQuery> {
        if ticket.session_id != self.id || !self.is_pending() {
            warn!(
                session = self.id,
                ticket_session = ticket.session_id,
                "Ignoring completion for a request this session did not issue"
            );
            return Err(ticket);
        }

        let text = match outcome {
            Ok(answer) => answer.answer,
            Err(e) => {
                warn!(session = self.id, error = %e, "Query failed");
                e.detail()
                    .map(str::to_string)
                    .unwrap_or_else(|| self.fallback_message.clone())
            }
        };

        self.phase = Phase::Idle;
        Ok(self.append(Sender::Assistant, text))
    }

    /// Submit, call the service once, and complete
    ///
    /// Returns the assistant reply, or `None` when the submission was
    /// rejected (no service call is made in that case).
    pub async fn ask<S>(&mut self, service: &S, text: &str) -> Option<&Message>
    where
        S: AnswerService + ?Sized,
    {
        let ticket = self.submit(text)?;
        let guard = AbandonOnDrop {
            session: &mut *self,
            armed: true,
        };
        let outcome = service.ask(ticket.query()).await;
        guard.disarm();
        self.complete(ticket, outcome).ok()
    }

    /// Close an exchange whose answer will never arrive
    fn abandon(&mut self) {
        if !self.is_pending() {
            return;
        }
        warn!(session = self.id, "Request abandoned before the service answered");
        self.phase = Phase::Idle;
        let fallback = self.fallback_message.clone();
        self.append(Sender::Assistant, fallback);
    }

    fn append(&mut self, sender: Sender, text: String) -> &Message {
        let message = Message {
            id: self.next_message_id,
            text,
            sender,
            timestamp: Utc::now(),
        };
        self.next_message_id += 1;
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }
}

/// Returns the session to idle if `ask` is dropped mid-await
struct AbandonOnDrop<'a> {
    session: &'a mut QuerySession,
    armed: bool,
}

impl AbandonOnDrop<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for AbandonOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.session.abandon();
        }
    }
}
