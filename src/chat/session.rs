//! Core chat session management.
//!
//! This module provides the `ChatSession` struct, which owns the transcript and turns each user
//! submission into exactly one request and exactly one bot reply.

use std::fmt;

use crate::chat::config::ChatConfig;
use crate::chat::widget::WidgetState;
use crate::client::{ChatClient, ChatTransport};
use crate::error::{ChatFailure, Result};
use crate::observability::{
    SESSION_EMPTY_RESULTS, SESSION_IGNORED_SUBMISSIONS, SESSION_REPLIES, SESSION_SUBMISSIONS,
    SESSION_TRANSPORT_FAILURES,
};
use crate::render::Renderer;
use crate::types::{ConversationRequest, ConversationResponse, Message, Sender, Transcript};

/// Shown instead of sending when text is submitted to a closed widget.
pub const CLOSED_HINT: &str = "Chat is closed. Type /open to show it.";

/// Whether the session is waiting on the server.
///
/// The thinking indicator is visible exactly while the session is in `AwaitingResponse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No request in flight.
    Idle,
    /// A request has been sent and its response not yet handled.
    AwaitingResponse,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => f.write_str("idle"),
            SessionState::AwaitingResponse => f.write_str("awaiting response"),
        }
    }
}

/// What the bot ended up saying in answer to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// The server's reply.
    Reply(String),
    /// One of the fixed apologies.
    Failed(ChatFailure),
}

impl ChatOutcome {
    /// The text that was rendered as the bot message.
    pub fn text(&self) -> &str {
        match self {
            ChatOutcome::Reply(text) => text,
            ChatOutcome::Failed(failure) => failure.user_message(),
        }
    }

    /// Returns true if the server produced a reply.
    pub fn is_reply(&self) -> bool {
        matches!(self, ChatOutcome::Reply(_))
    }
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// The number of messages in the transcript.
    pub message_count: usize,
    /// Accepted (non-empty) submissions.
    pub submissions: u64,
    /// Submissions answered with a server reply.
    pub replies: u64,
    /// Submissions answered with the transport failure apology.
    pub transport_failures: u64,
    /// Submissions answered with the empty result apology.
    pub empty_results: u64,
    /// Current state.
    pub state: SessionState,
}

/// A chat session that manages the transcript and the request/response exchange.
pub struct ChatSession<T: ChatTransport = ChatClient> {
    transport: T,
    transcript: Transcript,
    state: SessionState,
    submissions: u64,
    replies: u64,
    transport_failures: u64,
    empty_results: u64,
}

impl ChatSession<ChatClient> {
    /// Creates a new session that talks HTTP according to `config`.
    pub fn from_config(config: &ChatConfig) -> Result<Self> {
        Ok(Self::new(config.client()?))
    }
}

impl<T: ChatTransport> ChatSession<T> {
    /// Creates a new session over the given transport.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            transcript: Transcript::new(),
            state: SessionState::Idle,
            submissions: 0,
            replies: 0,
            transport_failures: 0,
            empty_results: 0,
        }
    }

    /// Submits user text and renders the outcome.
    ///
    /// This method:
    /// 1. Ignores the submission if the trimmed text is empty
    /// 2. Renders the user message, clears the input, and shows the thinking indicator
    /// 3. Sends `{conversation: [{role: "user", text}]}` to the server
    /// 4. Hides the indicator and renders exactly one bot message
    ///
    /// Returns `None` when the submission was ignored.  Failures never surface as errors:  they
    /// become one of the fixed apologies, and the detail goes to the log.
    pub async fn submit(&mut self, text: &str, renderer: &mut dyn Renderer) -> Option<ChatOutcome> {
        let request = self.prepare(text, renderer)?;
        let result = self.transport.converse(&request).await;
        Some(self.on_response(result, renderer))
    }

    /// Submits user text only while `widget` is open.
    ///
    /// A closed widget has no input to type into:  nothing is rendered or sent, and the renderer
    /// is told how to reopen it.
    pub async fn submit_if_open(
        &mut self,
        widget: &WidgetState,
        text: &str,
        renderer: &mut dyn Renderer,
    ) -> Option<ChatOutcome> {
        if !widget.is_open() {
            tracing::debug!("submission refused while the widget is closed");
            renderer.print_info(CLOSED_HINT);
            return None;
        }
        self.submit(text, renderer).await
    }

    /// The first half of [`ChatSession::submit`]:  everything up to sending the request.
    ///
    /// Returns the request to send, or `None` if the text was empty after trimming.  The session
    /// is left in [`SessionState::AwaitingResponse`] until [`ChatSession::on_response`] is called.
    pub fn prepare(&mut self, text: &str, renderer: &mut dyn Renderer) -> Option<ConversationRequest> {
        let text = text.trim();
        if text.is_empty() {
            SESSION_IGNORED_SUBMISSIONS.click();
            return None;
        }
        SESSION_SUBMISSIONS.click();
        self.submissions += 1;

        self.render(Sender::User, text, renderer);
        renderer.clear_input();

        self.state = SessionState::AwaitingResponse;
        renderer.show_thinking();
        renderer.scroll_to_bottom();
        tracing::debug!(chars = text.chars().count(), "submitting user turn");
        Some(ConversationRequest::from_user_text(text))
    }

    /// The second half of [`ChatSession::submit`]:  turn the exchange's result into a bot message.
    ///
    /// The thinking indicator is hidden on every path.
    pub fn on_response(
        &mut self,
        result: Result<ConversationResponse>,
        renderer: &mut dyn Renderer,
    ) -> ChatOutcome {
        renderer.hide_thinking();
        self.state = SessionState::Idle;

        let outcome = match result {
            Ok(response) => match response.reply() {
                Some(reply) => {
                    SESSION_REPLIES.click();
                    self.replies += 1;
                    ChatOutcome::Reply(reply.to_string())
                }
                None => {
                    SESSION_EMPTY_RESULTS.click();
                    self.empty_results += 1;
                    tracing::warn!("server response carried no result");
                    ChatOutcome::Failed(ChatFailure::EmptyResult)
                }
            },
            Err(err) => {
                SESSION_TRANSPORT_FAILURES.click();
                self.transport_failures += 1;
                if err.is_transport() {
                    tracing::error!(
                        error = %err,
                        status = ?err.status_code(),
                        "failed to get response from server"
                    );
                } else {
                    tracing::error!(error = %err, "request was never sent");
                }
                ChatOutcome::Failed(ChatFailure::TransportFailure)
            }
        };
        self.render(Sender::Bot, outcome.text(), renderer);
        outcome
    }

    /// Appends a message to the transcript and the view, then scrolls to it.
    pub fn render(&mut self, sender: Sender, text: &str, renderer: &mut dyn Renderer) {
        let message = Message::new(sender, text);
        renderer.append_message(&message);
        renderer.scroll_to_bottom();
        self.transcript.push(message);
    }

    /// Returns the transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Returns the number of messages in the transcript.
    pub fn message_count(&self) -> usize {
        self.transcript.len()
    }

    /// Returns the current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Replaces the transport.  The transcript is kept.
    pub fn set_transport(&mut self, transport: T) {
        self.transport = transport;
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            message_count: self.message_count(),
            submissions: self.submissions,
            replies: self.replies,
            transport_failures: self.transport_failures,
            empty_results: self.empty_results,
            state: self.state,
        }
    }
}
