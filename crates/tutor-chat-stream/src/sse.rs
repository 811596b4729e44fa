use tracing::debug;

/// Event prefix marking a meaningful stream line.
const DATA_PREFIX: &str = "data: ";

/// Sentinel payload marking end-of-stream.
const DONE_SENTINEL: &str = "[DONE]";

/// One `data: ...` line extracted from the byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SseFrame {
    pub data: String,
}

/// Signal decoded from one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StreamSignal {
    /// Incremental text fragment to append to the in-progress reply.
    Delta(String),
    /// End-of-stream sentinel.
    Done,
}

/// Incremental decoder for the newline-delimited event stream.
///
/// Holds the unterminated tail of received bytes between reads; a line is
/// never interpreted until its terminating newline has been observed, even
/// when the line spans several network reads.
#[derive(Default)]
pub(crate) struct SseDecoder {
    buf: Vec<u8>,
}

impl SseDecoder {
    /// Appends a chunk and returns every complete frame it unlocked, in
    /// stream order.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buf.extend_from_slice(chunk);
        let mut frames = Vec::new();
        while let Some(idx) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=idx).collect();
            let text = String::from_utf8_lossy(&line[..line.len() - 1]);
            if let Some(frame) = parse_data_line(text.trim_end_matches('\r')) {
                frames.push(frame);
            }
        }
        frames
    }
}

/// Extracts a frame from one complete line.
///
/// Blank keep-alive lines and anything without the `data: ` prefix
/// (comments, `event:` fields) are not errors; they are simply skipped.
fn parse_data_line(line: &str) -> Option<SseFrame> {
    line.strip_prefix(DATA_PREFIX).map(|payload| SseFrame {
        data: payload.to_string(),
    })
}

/// Decodes one frame into a signal.
///
/// An undecodable JSON payload is dropped rather than aborting the stream;
/// a well-formed payload whose delta carries no text fragment decodes to
/// nothing.
pub(crate) fn decode_frame(frame: &SseFrame) -> Option<StreamSignal> {
    if frame.data == DONE_SENTINEL {
        return Some(StreamSignal::Done);
    }
    match serde_json::from_str::<StreamResponse>(&frame.data) {
        Ok(response) => response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .map(StreamSignal::Delta),
        Err(err) => {
            debug!(error = %err, "dropping undecodable stream frame");
            None
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct StreamResponse {
    choices: Vec<StreamChoice>,
}

#[derive(Debug, serde::Deserialize)]
struct StreamChoice {
    delta: DeltaPayload,
}

#[derive(Debug, serde::Deserialize)]
struct DeltaPayload {
    content: Option<String>,
}
