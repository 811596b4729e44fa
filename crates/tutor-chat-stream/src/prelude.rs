//! Common imports for typical client usage.
//!
//! This module intentionally exports the most frequently used builder and
//! streaming types so examples and application code need fewer import lines.
pub use crate::{
    AbortHandle, ChatBuilder, ChatEvent, ChatFailure, ChatMessage, ChatStream, ClientConfig,
    ClientError, Role, StreamingChatClient,
};
