//! Mock answering service for testing
//!
//! Returns canned answers keyed on words in the query, or replays a script of
//! answers and failures queued by a test. Every query is recorded.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::{Answer, AnswerService};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
enum Reply {
    Answer(String),
    Failure { status: u16, detail: Option<String> },
}

/// Mock answering service
///
/// Clones share the script and the query log, so a test can keep a handle
/// while a session owns another.
#[derive(Clone)]
pub struct MockAnswerService {
    script: Arc<Mutex<VecDeque<Reply>>>,
    queries: Arc<Mutex<Vec<String>>>,
    /// Whether health_check should return true
    pub healthy: bool,
}

impl Default for MockAnswerService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAnswerService {
    /// Create a new mock service (healthy by default)
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            queries: Arc::new(Mutex::new(Vec::new())),
            healthy: true,
        }
    }

    /// Create an unhealthy mock service
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Queue an answer for the next unscripted call
    pub fn with_answer(self, answer: impl Into<String>) -> Self {
        lock(&self.script).push_back(Reply::Answer(answer.into()));
        self
    }

    /// Queue a failure carrying a detail message
    pub fn with_failure(self, status: u16, detail: impl Into<String>) -> Self {
        lock(&self.script).push_back(Reply::Failure {
            status,
            detail: Some(detail.into()),
        });
        self
    }

    /// Queue a failure without any detail
    pub fn with_bare_failure(self, status: u16) -> Self {
        lock(&self.script).push_back(Reply::Failure {
            status,
            detail: None,
        });
        self
    }

    /// Queries received so far, in order
    pub fn queries(&self) -> Vec<String> {
        lock(&self.queries).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.queries).len()
    }
}

#[async_trait]
impl AnswerService for MockAnswerService {
    async fn ask(&self, query: &str) -> Result<Answer> {
        lock(&self.queries).push(query.to_string());

        let scripted = lock(&self.script).pop_front();
        match scripted {
            Some(Reply::Answer(text)) => Ok(Answer::new(text)),
            Some(Reply::Failure { status, detail }) => Err(Error::Service { status, detail }),
            None => Ok(Answer::new(canned_answer(query))),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn name(&self) -> &str {
        "mock"
    }
}

fn canned_answer(query: &str) -> String {
    let q = query.to_lowercase();
    let answer = match q.as_str() {
        q if q.contains("server") => "There are 12 servers in the CMDB; 9 are active.",
        q if q.contains("database") || q.contains("db") => {
            "There are 5 databases; 2 run on end-of-life versions."
        }
        q if q.contains("cost") => "Finance is the largest cost center this month.",
        q if q.contains("sla") => "Most CIs are on the Bronze SLA tier.",
        _ => "I don't have enough information in the CMDB to answer that.",
    };
    answer.to_string()
}

// Poisoning only happens if a panicking test held the lock; the data is still usable
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
