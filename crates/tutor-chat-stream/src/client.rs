use std::sync::Arc;

use futures::StreamExt as _;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

use crate::errors::{ChatFailure, ClientError, chat_failure_from_transport_error};
use crate::message::ChatMessage;
use crate::request::{ChatRequest, DEFAULT_MODEL, DEFAULT_TEMPERATURE, RequestOptions};
use crate::session::{SessionEvent, StreamingSession};
use crate::stream::ChatEvent;
use crate::transport::{ChatTransport, ClientConfig, HttpTransport};

/// Handle used to request cancellation of a running stream.
#[derive(Clone, Debug)]
pub struct AbortHandle {
    tx: watch::Sender<bool>,
}

impl AbortHandle {
    /// Requests cancellation.
    ///
    /// Cancellation is best-effort and becomes visible as a terminal
    /// `ChatEvent::Failed` with `ChatFailure::Cancelled`.
    pub fn abort(&self) {
        let _ = self.tx.send(true);
    }
}

/// Streaming chat-completion client.
///
/// One network connection is opened per request; the client performs no
/// retries. Concurrent requests each get an independent session and
/// carry-over buffer.
#[derive(Clone)]
pub struct StreamingChatClient {
    transport: Arc<dyn ChatTransport>,
}

impl StreamingChatClient {
    /// Creates a client from explicit HTTP configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new(config)?)))
    }

    /// Creates a client using `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Creates a client over an arbitrary transport (tests, proxies).
    pub fn with_transport(transport: Arc<dyn ChatTransport>) -> Self {
        Self { transport }
    }

    /// Starts building a chat request.
    pub fn chat(&self) -> ChatBuilder {
        ChatBuilder::new(self.transport.clone())
    }
}

/// Builder for configuring and starting a single streaming chat request.
///
/// This is the main user-facing API for providing the system prompt,
/// conversation history, and runtime options before either streaming
/// events or collecting the full reply.
pub struct ChatBuilder {
    transport: Arc<dyn ChatTransport>,
    model: String,
    system_prompt: Option<String>,
    messages: Vec<ChatMessage>,
    temperature: f32,
    options: RequestOptions,
}

impl ChatBuilder {
    fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            transport,
            model: DEFAULT_MODEL.to_string(),
            system_prompt: None,
            messages: Vec::new(),
            temperature: DEFAULT_TEMPERATURE,
            options: RequestOptions::default(),
        }
    }

    /// Overrides the model identifier.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the system prompt; serialized as the first request message.
    pub fn system_prompt(mut self, text: impl Into<String>) -> Self {
        self.system_prompt = Some(text.into());
        self
    }

    /// Appends one conversation message.
    pub fn message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Appends the conversation history in order.
    pub fn messages(mut self, messages: impl IntoIterator<Item = ChatMessage>) -> Self {
        self.messages.extend(messages);
        self
    }

    /// Appends a plain user text message.
    pub fn user_text(self, text: impl Into<String>) -> Self {
        self.message(ChatMessage::user(text))
    }

    /// Appends the textual placeholder for an attached image.
    pub fn user_image_placeholder(self) -> Self {
        self.message(ChatMessage::user_image_placeholder())
    }

    /// Sets the sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets an optional per-request timeout.
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    /// Sets the bounded stream buffer size used between the streaming task
    /// and the consumer.
    pub fn stream_buffer_capacity(mut self, capacity: usize) -> Self {
        self.options.stream_buffer_capacity = capacity;
        self
    }

    /// Validates the builder state and starts a streaming request.
    ///
    /// The returned `ChatStream` yields normalized events (`Started`,
    /// ordered `Delta`s, and a terminal `Completed`/`Failed` event).
    pub async fn start_stream(self) -> Result<ChatStream, ClientError> {
        let transport = self.transport.clone();
        let (request, options) = self.validate_and_build_request()?;

        let (tx, rx) = mpsc::channel(options.stream_buffer_capacity);
        let (final_tx, final_rx) = oneshot::channel();
        let (abort_tx, abort_rx) = watch::channel(false);

        let abort_handle = AbortHandle { tx: abort_tx };
        let request_id = uuid::Uuid::new_v4();
        let model = request.model.clone();
        tokio::spawn(stream_task(
            transport, request, options, request_id, tx, final_tx, abort_rx,
        ));

        Ok(ChatStream {
            request_id,
            model,
            rx,
            final_rx,
            abort_handle,
            saw_terminal: false,
        })
    }

    /// Runs to completion and returns the full assistant reply.
    pub async fn collect_text(self) -> Result<String, ClientError> {
        let stream = self.start_stream().await?;
        stream.finish().await
    }

    fn validate_and_build_request(self) -> Result<(ChatRequest, RequestOptions), ClientError> {
        if self.model.trim().is_empty() {
            return Err(ClientError::Validation("model must not be empty".into()));
        }
        if self.options.stream_buffer_capacity == 0 {
            return Err(ClientError::Validation(
                "stream_buffer_capacity must be greater than 0".into(),
            ));
        }
        if self.messages.is_empty() {
            return Err(ClientError::Validation(
                "at least one conversation message is required".into(),
            ));
        }

        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        if let Some(prompt) = self
            .system_prompt
            .as_ref()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
        {
            messages.push(ChatMessage::system(prompt));
        }
        messages.extend(self.messages);

        let request = ChatRequest::new(self.model, messages, self.temperature);
        Ok((request, self.options))
    }
}

/// Streaming handle returned by `ChatBuilder::start_stream`.
///
/// Use `next_event()` to consume events as they arrive and `finish()` to
/// obtain the full reply after the terminal event.
#[derive(Debug)]
pub struct ChatStream {
    request_id: uuid::Uuid,
    model: String,
    rx: mpsc::Receiver<ChatEvent>,
    final_rx: oneshot::Receiver<Result<String, ClientError>>,
    abort_handle: AbortHandle,
    saw_terminal: bool,
}

impl ChatStream {
    /// Returns the id for this request.
    pub fn request_id(&self) -> uuid::Uuid {
        self.request_id
    }

    /// Returns a handle that can cancel the request.
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort_handle.clone()
    }

    /// Waits for and returns the next stream event.
    ///
    /// Events for one request form a single ordered sequence; after a
    /// terminal `Completed`/`Failed` event no further `Delta` is delivered.
    /// Returns `None` once the stream channel is closed.
    pub async fn next_event(&mut self) -> Option<ChatEvent> {
        let event = self.rx.recv().await;
        if let Some(ChatEvent::Completed { .. } | ChatEvent::Failed { .. }) = &event {
            self.saw_terminal = true;
        }
        event
    }

    /// Drains the stream (if needed) and returns the full assistant reply.
    ///
    /// This is safe to call after consuming events manually with
    /// `next_event()`.
    pub async fn finish(mut self) -> Result<String, ClientError> {
        while !self.saw_terminal {
            match self.rx.recv().await {
                Some(ChatEvent::Completed { .. } | ChatEvent::Failed { .. }) => {
                    self.saw_terminal = true;
                }
                Some(_) => {}
                None => break,
            }
        }

        match self.final_rx.await {
            Ok(result) => result,
            Err(_) => Err(ClientError::protocol_msg(format!(
                "stream task ended without final result (model={})",
                self.model
            ))),
        }
    }
}

async fn stream_task(
    transport: Arc<dyn ChatTransport>,
    request: ChatRequest,
    options: RequestOptions,
    request_id: uuid::Uuid,
    tx: mpsc::Sender<ChatEvent>,
    final_tx: oneshot::Sender<Result<String, ClientError>>,
    mut abort_rx: watch::Receiver<bool>,
) {
    let model = request.model.clone();

    if !send_event(
        &tx,
        ChatEvent::Started {
            request_id,
            model: model.clone(),
        },
    )
    .await
    {
        let _ = final_tx.send(Err(ClientError::protocol_msg(
            "chat stream receiver dropped before Started",
        )));
        return;
    }

    let started = transport.start_stream(&request, &options).await;
    let mut bytes = match started {
        Ok(stream) => stream,
        Err(err) => {
            let failure = chat_failure_from_transport_error(&err);
            let _ = send_event(
                &tx,
                ChatEvent::Failed {
                    request_id,
                    error: failure.clone(),
                },
            )
            .await;
            let _ = final_tx.send(Err(ClientError::chat_failed(failure)));
            return;
        }
    };

    let mut session = StreamingSession::new();
    let mut seq = 0_u64;
    let mut reply = String::new();
    loop {
        tokio::select! {
            changed = abort_rx.changed() => {
                match changed {
                    Ok(_) if *abort_rx.borrow() => {
                        let failure = ChatFailure::Cancelled;
                        let _ = send_event(&tx, ChatEvent::Failed { request_id, error: failure.clone() }).await;
                        let _ = final_tx.send(Err(ClientError::chat_failed(failure)));
                        return;
                    }
                    Ok(_) => {}
                    Err(_) => {}
                }
            }
            next = bytes.next() => {
                match next {
                    Some(Ok(chunk)) => {
                        for event in session.feed(&chunk) {
                            match event {
                                SessionEvent::Delta(text) => {
                                    if text.is_empty() {
                                        continue;
                                    }
                                    debug!(request_id = %request_id, model = %model, seq, "chat text delta");
                                    reply.push_str(&text);
                                    let sent = send_event(&tx, ChatEvent::Delta { request_id, seq, text }).await;
                                    seq = seq.saturating_add(1);
                                    if !sent {
                                        let _ = final_tx.send(Err(ClientError::protocol_msg("chat stream receiver dropped during output")));
                                        return;
                                    }
                                }
                                SessionEvent::Done => {
                                    let sent = send_event(&tx, ChatEvent::Completed { request_id, text: reply.clone() }).await;
                                    let _ = final_tx.send(if sent { Ok(reply) } else { Err(ClientError::protocol_msg("chat stream receiver dropped before completion")) });
                                    return;
                                }
                            }
                        }
                    }
                    Some(Err(err)) => {
                        let failure = chat_failure_from_transport_error(&err);
                        let _ = send_event(&tx, ChatEvent::Failed { request_id, error: failure.clone() }).await;
                        let _ = final_tx.send(Err(ClientError::chat_failed(failure)));
                        return;
                    }
                    None => {
                        // Clean transport close without a sentinel still
                        // counts as a normal completion.
                        let _ = session.close();
                        let sent = send_event(&tx, ChatEvent::Completed { request_id, text: reply.clone() }).await;
                        let _ = final_tx.send(if sent { Ok(reply) } else { Err(ClientError::protocol_msg("chat stream receiver dropped before completion")) });
                        return;
                    }
                }
            }
        }
    }
}

async fn send_event(tx: &mpsc::Sender<ChatEvent>, event: ChatEvent) -> bool {
    tx.send(event).await.is_ok()
}
