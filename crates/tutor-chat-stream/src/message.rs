/// Placeholder content substituted for an attached image.
///
/// The chat-completions body described here is text-only; when the caller's
/// UI attaches an image to a message, the request carries this marker
/// instead of binary content.
pub const IMAGE_PLACEHOLDER: &str = "[User sent an image]";

/// Author of a chat message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instruction message; always first in a request.
    System,
    /// End-user message.
    User,
    /// Model-generated message.
    Assistant,
}

/// One message in an ordered conversation.
///
/// Ordering within a conversation is significant and is serialized into the
/// request verbatim.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChatMessage {
    /// Message author.
    pub role: Role,
    /// Textual content; may be empty while an assistant reply is still
    /// streaming on the caller's side.
    pub content: String,
}

impl ChatMessage {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Creates a user message standing in for an attached image.
    pub fn user_image_placeholder() -> Self {
        Self::user(IMAGE_PLACEHOLDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_value(ChatMessage::system("s")).expect("serialize");
        assert_eq!(json.get("role").and_then(|v| v.as_str()), Some("system"));
        let json = serde_json::to_value(ChatMessage::assistant("a")).expect("serialize");
        assert_eq!(json.get("role").and_then(|v| v.as_str()), Some("assistant"));
    }

    #[test]
    fn image_placeholder_is_a_user_message() {
        let msg = ChatMessage::user_image_placeholder();
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, IMAGE_PLACEHOLDER);
    }
}
