use std::time::Duration;

use crate::message::ChatMessage;

/// Default model name.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Request body sent to the chat-completions endpoint.
///
/// Immutable once issued; `stream` is always `true` for this client.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ChatRequest {
    /// Model identifier (for example `gpt-4o`).
    pub model: String,
    /// Ordered conversation, system prompt first.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Streaming flag; always `true`.
    pub stream: bool,
}

impl ChatRequest {
    /// Creates a streaming request.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature,
            stream: true,
        }
    }
}

/// Generic per-request behavior options.
#[derive(Clone, Debug)]
pub struct RequestOptions {
    /// Optional per-request timeout.
    pub timeout: Option<Duration>,
    /// Bounded event buffer size used by the streaming channel.
    pub stream_buffer_capacity: usize,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            stream_buffer_capacity: 128,
        }
    }
}
