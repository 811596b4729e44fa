//! Streaming chat-completion client with a builder-first async API.
//!
//! Opens one HTTP request per chat, parses the newline-delimited
//! `data: ...` event stream into ordered text deltas, and delivers them to
//! the consumer together with exactly one terminal outcome.
//!
//! # Builder-first usage
//!
//! ```no_run
//! use tutor_chat_stream::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), ClientError> {
//! let client = StreamingChatClient::from_env()?;
//!
//! let mut stream = client
//!     .chat()
//!     .system_prompt("You are a Mathematics tutor. Please explain your solutions step by step.")
//!     .user_text("What is the derivative of x^2?")
//!     .start_stream()
//!     .await?;
//!
//! while let Some(event) = stream.next_event().await {
//!     match event {
//!         ChatEvent::Delta { text, .. } => print!("{text}"),
//!         ChatEvent::Completed { .. } | ChatEvent::Failed { .. } => break,
//!         ChatEvent::Started { .. } => {}
//!     }
//! }
//! # Ok(())
//! # }
//! ```

/// Client, request builder, and streaming handle.
pub mod client;
/// Public error types used by the client API.
pub mod errors;
/// Chat roles and ordered conversation messages.
pub mod message;
/// Common imports for typical usage.
pub mod prelude;
/// Request body and per-request options.
pub mod request;
/// Per-request streaming session over the frame decoder.
pub mod session;
/// Frame decoding for the newline-delimited event stream.
mod sse;
/// Normalized public stream events.
pub mod stream;
/// Transport trait and the HTTP implementation.
pub mod transport;

pub use client::{AbortHandle, ChatBuilder, ChatStream, StreamingChatClient};
pub use errors::{ChatFailure, ClientError, TransportError};
pub use message::{ChatMessage, IMAGE_PLACEHOLDER, Role};
pub use request::{ChatRequest, DEFAULT_MODEL, DEFAULT_TEMPERATURE, RequestOptions};
pub use session::{SessionClose, SessionEvent, StreamingSession};
pub use stream::ChatEvent;
pub use transport::{ByteStream, ChatTransport, ClientConfig, HttpTransport};
