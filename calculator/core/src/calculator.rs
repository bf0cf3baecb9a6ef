//! Calculator - The Orchestration Core
//!
//! The Calculator owns every piece of session state:
//! - the expression buffer driving the display
//! - the bounded history log
//! - the assistant conversation and its solver
//!
//! Surfaces send [`CalcEvent`]s in and read a [`CalculatorSnapshot`] back.
//! Buffer and history events are applied synchronously. An assistant
//! question is solved on a spawned task; the surface calls
//! [`Calculator::poll_assistant`] from its loop to pick up the reply.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::oneshot;

use crate::backend::{LlmBackend, Solver, FAILURE_REPLY};
use crate::buffer::{BufferError, BufferState, ExpressionBuffer};
use crate::config::AssistantConfig;
use crate::events::CalcEvent;
use crate::history::{EntryId, HistoryEntry, HistoryLog};
use crate::session::{AssistantMessage, AssistantSession, SubmitError};

/// Errors returned for events the calculator cannot apply
///
/// Failed evaluations are not errors: they show up as the `"Error"`
/// display instead.
#[derive(Debug, Error)]
pub enum CalcError {
    /// Keypad input rejected
    #[error(transparent)]
    Buffer(#[from] BufferError),

    /// Selected history entry does not exist
    #[error("no history entry with id {0}")]
    UnknownHistoryEntry(EntryId),

    /// Assistant submission rejected
    #[error(transparent)]
    Submit(#[from] SubmitError),

    /// Assistant questions need a Tokio runtime to run on
    #[error("no async runtime available to send the assistant request")]
    NoRuntime,
}

/// Read-only view of the calculator for rendering
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalculatorSnapshot {
    /// Display text
    pub display: String,
    /// Expression annotation above the display
    pub expression_label: String,
    /// Buffer state
    pub buffer_state: BufferState,
    /// History, newest first
    pub history: Vec<HistoryEntry>,
    /// Assistant conversation, oldest first
    pub messages: Vec<AssistantMessage>,
    /// Whether an assistant request is in flight
    pub pending: bool,
}

/// The Calculator - headless state for one session
pub struct Calculator<B: LlmBackend> {
    /// Keypad input
    buffer: ExpressionBuffer,
    /// Past evaluations
    history: HistoryLog,
    /// Assistant conversation
    session: AssistantSession,
    /// Shared with the in-flight solve task
    solver: Arc<Solver<B>>,
    /// Reply channel of the in-flight request
    pending_reply: Option<oneshot::Receiver<String>>,
}

impl<B: LlmBackend + 'static> Calculator<B> {
    /// Create a calculator with a greeting for the assistant session
    pub fn new(solver: Solver<B>, greeting: impl Into<String>) -> Self {
        Self {
            buffer: ExpressionBuffer::new(),
            history: HistoryLog::new(),
            session: AssistantSession::new(greeting),
            solver: Arc::new(solver),
            pending_reply: None,
        }
    }

    /// Create a calculator from a backend and the assistant configuration
    pub fn from_config(backend: B, config: &AssistantConfig) -> Self {
        Self::new(
            Solver::from_config(backend, config),
            config.greeting.clone(),
        )
    }

    /// Expression buffer
    pub fn buffer(&self) -> &ExpressionBuffer {
        &self.buffer
    }

    /// History log
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Assistant session
    pub fn session(&self) -> &AssistantSession {
        &self.session
    }

    /// Solver used for assistant questions
    pub fn solver(&self) -> &Solver<B> {
        &self.solver
    }

    /// Whether an assistant request is in flight
    pub fn is_pending(&self) -> bool {
        self.session.is_pending()
    }

    /// Handle an event from a surface
    ///
    /// `SubmitAssistant` must be handled inside a Tokio runtime.
    pub fn handle_event(&mut self, event: CalcEvent) -> Result<(), CalcError> {
        match event {
            CalcEvent::Append(token) => self.buffer.append(token)?,
            CalcEvent::DeleteLast => self.buffer.delete_last(),
            CalcEvent::Clear => self.buffer.clear(),
            CalcEvent::Evaluate => self.evaluate(),
            CalcEvent::SelectHistory(id) => self.select_history(&id)?,
            CalcEvent::ClearHistory => {
                tracing::debug!(entries = self.history.len(), "Clearing history");
                self.history.clear();
            }
            CalcEvent::SubmitAssistant(text) => self.submit_assistant(&text)?,
        }
        Ok(())
    }

    /// Evaluate the buffer, recording successful results
    fn evaluate(&mut self) {
        if let Ok(evaluation) = self.buffer.evaluate() {
            self.history.record(evaluation.expression, evaluation.result);
        }
    }

    /// Restore a history entry onto the display
    fn select_history(&mut self, id: &EntryId) -> Result<(), CalcError> {
        let entry = self
            .history
            .get(id)
            .ok_or_else(|| CalcError::UnknownHistoryEntry(id.clone()))?;
        let (label, display) = HistoryLog::select(entry);
        self.buffer.restore(label, display);
        Ok(())
    }

    /// Send a question to the solver
    fn submit_assistant(&mut self, text: &str) -> Result<(), CalcError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| CalcError::NoRuntime)?;

        let query = match self.session.submit(text) {
            Ok(query) => query,
            Err(e) => {
                tracing::warn!(reason = %e, "Rejected assistant submission");
                return Err(e.into());
            }
        };

        tracing::info!(chars = query.len(), "Submitting assistant question");

        let (tx, rx) = oneshot::channel();
        let solver = Arc::clone(&self.solver);
        runtime.spawn(async move {
            let reply = solver.solve(&query).await;
            // Receiver dropped means the calculator is gone
            let _ = tx.send(reply);
        });

        self.pending_reply = Some(rx);
        Ok(())
    }

    /// Deliver the assistant reply if it has arrived
    ///
    /// Non-blocking; call regularly from the surface loop. Returns true if a
    /// reply was delivered.
    pub fn poll_assistant(&mut self) -> bool {
        let Some(rx) = self.pending_reply.as_mut() else {
            return false;
        };

        let reply = match rx.try_recv() {
            Ok(reply) => reply,
            Err(oneshot::error::TryRecvError::Empty) => return false,
            Err(oneshot::error::TryRecvError::Closed) => {
                tracing::error!("Assistant task ended without a reply");
                FAILURE_REPLY.to_string()
            }
        };

        self.pending_reply = None;
        self.session.receive(reply)
    }

    /// Wait for the in-flight assistant reply
    ///
    /// Returns false immediately if nothing is in flight. Dropping the
    /// returned future keeps the request pending.
    pub async fn wait_for_assistant(&mut self) -> bool {
        let Some(rx) = self.pending_reply.as_mut() else {
            return false;
        };

        let reply = rx.await.unwrap_or_else(|_| {
            tracing::error!("Assistant task ended without a reply");
            FAILURE_REPLY.to_string()
        });

        self.pending_reply = None;
        self.session.receive(reply)
    }

    /// Read-only projection for rendering
    pub fn snapshot(&self) -> CalculatorSnapshot {
        CalculatorSnapshot {
            display: self.buffer.display().to_string(),
            expression_label: self.buffer.expression_label().to_string(),
            buffer_state: self.buffer.state(),
            history: self.history.entries(),
            messages: self.session.messages().to_vec(),
            pending: self.session.is_pending(),
        }
    }
}
