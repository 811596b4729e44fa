use crate::errors::ChatFailure;

/// Normalized stream events exposed by `ChatStream`.
#[derive(Clone, Debug, PartialEq)]
pub enum ChatEvent {
    /// First event for every request.
    Started {
        request_id: uuid::Uuid,
        model: String,
    },
    /// Incremental text output chunk, in arrival order.
    Delta {
        request_id: uuid::Uuid,
        seq: u64,
        text: String,
    },
    /// Terminal success event with the full aggregated reply.
    Completed {
        request_id: uuid::Uuid,
        text: String,
    },
    /// Terminal failure event.
    Failed {
        request_id: uuid::Uuid,
        error: ChatFailure,
    },
}
