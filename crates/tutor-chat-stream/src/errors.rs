/// Errors produced by a transport before they are normalized for the public
/// chat stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The endpoint returned an application-level failure (HTTP status,
    /// auth, quota, etc.).
    #[error("endpoint error: {message}")]
    Endpoint {
        message: String,
        status_code: Option<u16>,
    },
    /// Connection, timeout, or stream I/O failed.
    #[error("transport error: {message}")]
    Transport { message: String },
}

impl TransportError {
    /// Creates an endpoint-level error.
    pub fn endpoint(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self::Endpoint {
            message: message.into(),
            status_code,
        }
    }

    /// Creates a transport-level error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Returns the human-readable message for this error.
    pub fn message(&self) -> &str {
        match self {
            Self::Endpoint { message, .. } | Self::Transport { message } => message,
        }
    }
}

/// Terminal failure delivered through `ChatEvent::Failed`.
///
/// The `Display` output is written to be usable directly as the text of a
/// final assistant message, so a consumer never leaves its UI in a
/// perpetual loading state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum ChatFailure {
    /// The endpoint rejected the request or reported a failure.
    #[error("the assistant could not be reached: {message}")]
    Endpoint { message: String },
    /// Network or stream transport failed mid-flight.
    #[error("the connection was interrupted: {message}")]
    Transport { message: String },
    /// The request was cancelled by the caller.
    #[error("the request was cancelled")]
    Cancelled,
}

/// Top-level error type for the public client API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Invalid client configuration (credential, endpoint URL).
    #[error("config error: {0}")]
    Config(String),
    /// Invalid builder input, caught before any network call.
    #[error("validation error: {0}")]
    Validation(String),
    /// Terminal failure returned from a started stream.
    #[error(transparent)]
    ChatFailed(ChatFailure),
    /// Internal protocol misuse or invariant violation.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl ClientError {
    pub(crate) fn chat_failed(failure: ChatFailure) -> Self {
        Self::ChatFailed(failure)
    }

    pub(crate) fn protocol_msg(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }
}

impl From<ChatFailure> for ClientError {
    fn from(value: ChatFailure) -> Self {
        ClientError::ChatFailed(value)
    }
}

pub(crate) fn chat_failure_from_transport_error(err: &TransportError) -> ChatFailure {
    match err {
        TransportError::Endpoint { message, .. } => ChatFailure::Endpoint {
            message: message.clone(),
        },
        TransportError::Transport { message } => ChatFailure::Transport {
            message: message.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_maps_to_matching_failure() {
        let endpoint = TransportError::endpoint("401 unauthorized", Some(401));
        assert!(matches!(
            chat_failure_from_transport_error(&endpoint),
            ChatFailure::Endpoint { .. }
        ));
        let transport = TransportError::transport("connection reset");
        assert!(matches!(
            chat_failure_from_transport_error(&transport),
            ChatFailure::Transport { .. }
        ));
    }

    #[test]
    fn failure_display_is_user_presentable() {
        let failure = ChatFailure::Transport {
            message: "connection reset".into(),
        };
        assert_eq!(
            failure.to_string(),
            "the connection was interrupted: connection reset"
        );
    }
}
