//! The review engine: one pass over a fixed candidate list.
//!
//! A session is a forward-only cursor. Every decision advances it by
//! exactly one; accepted candidates accumulate in order. Once the cursor
//! reaches the end the session is complete and further decisions are
//! no-ops. There is no way back except `reset`, which starts a fresh
//! pass and carries nothing over.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::types::{Candidate, Decision, Progress};

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Reviewing,
    Complete,
}

/// A single review pass over a fixed candidate list.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    candidates: Vec<Candidate>,
    cursor: usize,
    accepted: Vec<Candidate>,
}

impl ReviewSession {
    /// Open a session. An empty candidate list is complete from birth.
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            cursor: 0,
            accepted: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        if self.cursor < self.candidates.len() {
            SessionState::Reviewing
        } else {
            SessionState::Complete
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state() == SessionState::Complete
    }

    /// The candidate awaiting a verdict, `None` once complete.
    pub fn current(&self) -> Option<&Candidate> {
        self.candidates.get(self.cursor)
    }

    pub fn progress(&self) -> Progress {
        Progress {
            reviewed: self.cursor,
            total: self.candidates.len(),
        }
    }

    /// Apply a verdict to the current candidate.
    ///
    /// The sole mutator. Accept appends the current candidate to the
    /// accepted list and advances; reject only advances. Once the
    /// session is complete this is a no-op, so a stray extra input
    /// changes nothing.
    pub fn decide(&mut self, decision: Decision) -> SessionState {
        let Some(candidate) = self.candidates.get(self.cursor) else {
            return SessionState::Complete;
        };

        debug!(cursor = self.cursor, term = %candidate.term, ?decision, "decision");
        if decision == Decision::Accept {
            self.accepted.push(candidate.clone());
        }
        self.cursor += 1;
        self.state()
    }

    /// Start over with a fresh candidate list. Nothing carries over.
    pub fn reset(&mut self, candidates: Vec<Candidate>) {
        self.candidates = candidates;
        self.cursor = 0;
        self.accepted.clear();
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Accepted candidates, in decision order.
    pub fn accepted(&self) -> &[Candidate] {
        &self.accepted
    }

    /// Totals for the session as it stands now.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            total: self.candidates.len(),
            reviewed: self.cursor,
            accepted: self.accepted.len(),
            rejected: self.cursor - self.accepted.len(),
            completed_at: Utc::now(),
        }
    }
}

/// Totals for a finished (or abandoned) session.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionSummary {
    pub total: usize,
    pub reviewed: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub completed_at: DateTime<Utc>,
}
