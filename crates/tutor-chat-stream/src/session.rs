use crate::sse::{SseDecoder, StreamSignal, decode_frame};

/// Event produced by feeding bytes into a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Ordered incremental text fragment.
    Delta(String),
    /// End-of-stream sentinel was received.
    Done,
}

/// How a session ended when the transport closed without a sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionClose {
    /// The transport closed cleanly; treat as a normal completion.
    Completed,
    /// A terminal signal had already fired; nothing more to deliver.
    AlreadyTerminated,
}

/// Per-request streaming state: one carry-over buffer plus an absorbing
/// terminal flag.
///
/// The session performs no I/O; the owning task feeds it raw transport
/// chunks and forwards the events it returns. Once `Done` has been
/// produced (or `close` has resolved the session), further bytes are
/// ignored.
#[derive(Default)]
pub struct StreamingSession {
    decoder: SseDecoder,
    terminated: bool,
}

impl StreamingSession {
    /// Creates a fresh session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one transport chunk and returns the events it unlocked, in
    /// stream order.
    ///
    /// A `Done` event is final: any frames remaining in the same chunk and
    /// all subsequent chunks are discarded.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SessionEvent> {
        if self.terminated {
            return Vec::new();
        }
        let mut events = Vec::new();
        for frame in self.decoder.push_chunk(chunk) {
            match decode_frame(&frame) {
                Some(StreamSignal::Delta(text)) => events.push(SessionEvent::Delta(text)),
                Some(StreamSignal::Done) => {
                    events.push(SessionEvent::Done);
                    self.terminated = true;
                    break;
                }
                None => {}
            }
        }
        events
    }

    /// Resolves end-of-transport for a session that may or may not have
    /// already seen the sentinel.
    pub fn close(&mut self) -> SessionClose {
        if self.terminated {
            return SessionClose::AlreadyTerminated;
        }
        self.terminated = true;
        SessionClose::Completed
    }

    /// Whether a terminal signal has fired for this session.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta_line(text: &str) -> String {
        format!("data: {{\"choices\":[{{\"delta\":{{\"content\":\"{text}\"}}}}]}}\n")
    }

    fn collect_feeds(session: &mut StreamingSession, reads: &[&[u8]]) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        for read in reads {
            events.extend(session.feed(read));
        }
        events
    }

    #[test]
    fn deltas_arrive_in_frame_order_regardless_of_read_boundaries() {
        let stream = format!(
            "{}{}{}data: [DONE]\n",
            delta_line("a"),
            delta_line("b"),
            delta_line("c")
        );
        let bytes = stream.as_bytes();

        // Whole-stream feed and byte-at-a-time feed must agree.
        let mut whole = StreamingSession::new();
        let whole_events = whole.feed(bytes);

        let mut split = StreamingSession::new();
        let mut split_events = Vec::new();
        for byte in bytes {
            split_events.extend(split.feed(std::slice::from_ref(byte)));
        }

        let expected = vec![
            SessionEvent::Delta("a".into()),
            SessionEvent::Delta("b".into()),
            SessionEvent::Delta("c".into()),
            SessionEvent::Done,
        ];
        assert_eq!(whole_events, expected);
        assert_eq!(split_events, expected);
    }

    #[test]
    fn bytes_after_sentinel_are_ignored() {
        let mut session = StreamingSession::new();
        let trailing = format!("data: [DONE]\n{}", delta_line("late"));
        let events = session.feed(trailing.as_bytes());
        assert_eq!(events, vec![SessionEvent::Done]);
        assert!(session.is_terminated());

        let more = session.feed(delta_line("later").as_bytes());
        assert!(more.is_empty());
        assert_eq!(session.close(), SessionClose::AlreadyTerminated);
    }

    #[test]
    fn partial_read_reassembly_across_three_reads() {
        let mut session = StreamingSession::new();
        let events = collect_feeds(
            &mut session,
            &[
                b"data",
                b": {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n",
                b"data: [DONE]\n",
            ],
        );
        assert_eq!(
            events,
            vec![SessionEvent::Delta("Hi".into()), SessionEvent::Done]
        );
    }

    #[test]
    fn mid_json_split_at_every_offset_yields_one_delta() {
        let line = delta_line("Hello");
        let bytes = line.as_bytes();
        for offset in 1..bytes.len() {
            let mut session = StreamingSession::new();
            let events = collect_feeds(&mut session, &[&bytes[..offset], &bytes[offset..]]);
            assert_eq!(
                events,
                vec![SessionEvent::Delta("Hello".into())],
                "split at byte {offset}"
            );
        }
    }

    #[test]
    fn malformed_frame_is_skipped_and_stream_continues() {
        let mut session = StreamingSession::new();
        let stream = format!("data: {{broken\n{}data: [DONE]\n", delta_line("ok"));
        let events = session.feed(stream.as_bytes());
        assert_eq!(
            events,
            vec![SessionEvent::Delta("ok".into()), SessionEvent::Done]
        );
    }

    #[test]
    fn no_content_frames_produce_no_deltas() {
        let mut session = StreamingSession::new();
        let events =
            session.feed(b"data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n");
        assert!(events.is_empty());
        assert!(!session.is_terminated());
    }

    #[test]
    fn close_without_sentinel_completes_once() {
        let mut session = StreamingSession::new();
        let events = session.feed(delta_line("only").as_bytes());
        assert_eq!(events, vec![SessionEvent::Delta("only".into())]);
        assert_eq!(session.close(), SessionClose::Completed);
        assert_eq!(session.close(), SessionClose::AlreadyTerminated);
        assert!(session.feed(delta_line("late").as_bytes()).is_empty());
    }
}
