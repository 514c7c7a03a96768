//! Inline completion: collaborator contract, request pipeline and the
//! model-backed provider.
//!
//! # Responsibility
//! - Define the wire shape exchanged with the completion collaborator.
//! - Merge returned suggestions back into live block content.
//!
//! # Invariants
//! - Provider failures never escape as errors to the editor; they roll the
//!   block back and are logged.
//! - Requests carry plain text only; markup stays inside the store.

pub mod http;
pub mod pipeline;
pub mod prompt;
pub mod provider;

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Request sent to the completion collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    /// Plain text of preceding non-blank blocks, joined by newlines.
    pub previous_content: String,
    /// Plain text of the target block before the cursor, trimmed.
    pub current_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_id: Option<String>,
}

/// Successful collaborator response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub completion: String,
}

/// Collaborator failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// Transport failed before a response arrived.
    Network(String),
    /// Non-2xx status.
    Http { status: u16, body: String },
    /// Response body could not be decoded.
    Parse(String),
    /// The request was superseded or cancelled by the caller.
    Cancelled,
    /// Provider-side generation failure.
    Provider(String),
}

impl Display for CompletionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(message) => write!(f, "completion transport failed: {message}"),
            Self::Http { status, body } => write!(f, "completion endpoint returned {status}: {body}"),
            Self::Parse(message) => write!(f, "invalid completion response: {message}"),
            Self::Cancelled => write!(f, "completion request cancelled"),
            Self::Provider(message) => write!(f, "completion provider failed: {message}"),
        }
    }
}

impl Error for CompletionError {}

/// Shared cancellation flag for one in-flight request.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// External text-completion collaborator.
pub trait CompletionProvider {
    /// Produces one suggestion. Implementations should return
    /// `CompletionError::Cancelled` early once `cancel` is set.
    fn complete(
        &self,
        request: &CompletionRequest,
        cancel: &CancelToken,
    ) -> Result<CompletionResponse, CompletionError>;
}
