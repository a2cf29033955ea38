use crate::core::completion::{ChatMessage, CompletionClient, Completer};
use crate::core::failure::Failure;
use derive_more::Display;

pub const CHAT_TEMPERATURE: f32 = 0.7;
pub const NOTHING_TO_DISCUSS: &str = "No summary to discuss";

fn system_instruction(context: &str) -> String {
    format!("You are an AI assistant discussing a video summary. The summary is: {context}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Idle,
    AwaitingReply,
}

/// A line of the visible conversation. Errors show up here but never in the
/// history the model sees.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ChatLogEntry {
    #[display("You: {_0}")]
    You(String),
    #[display("AI: {_0}")]
    Ai(String),
    #[display("Error: {_0}")]
    Error(String),
}

/// One open conversation about a fixed piece of text.
///
/// The context is captured when the session opens and never changes, so
/// whatever the display shows later has no effect on it. `history` only
/// grows: a user message per attempted turn and an assistant message per
/// successful one. A failed turn therefore leaves its user message
/// unanswered, and that message is sent again as part of the next request.
#[derive(Debug, Clone)]
pub struct ChatSession {
    context: String,
    history: Vec<ChatMessage>,
    log: Vec<ChatLogEntry>,
    state: ChatState,
}

impl ChatSession {
    pub fn open(context: impl Into<String>) -> Result<Self, Failure> {
        let context = context.into();
        if context.is_empty() {
            return Err(Failure::EmptyInput(NOTHING_TO_DISCUSS));
        }

        Ok(Self {
            context,
            history: Vec::new(),
            log: Vec::new(),
            state: ChatState::Idle,
        })
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn log(&self) -> &[ChatLogEntry] {
        &self.log
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    /// Record the user's message and return the full message list to send.
    pub fn begin_turn(&mut self, user_text: &str) -> Result<Vec<ChatMessage>, Failure> {
        if self.state == ChatState::AwaitingReply {
            return Err(Failure::Busy);
        }
        if user_text.is_empty() {
            return Err(Failure::EmptyInput("Type a message first"));
        }

        self.history.push(ChatMessage::user(user_text));
        self.log.push(ChatLogEntry::You(user_text.to_string()));
        self.state = ChatState::AwaitingReply;

        let mut messages = Vec::with_capacity(self.history.len() + 1);
        messages.push(ChatMessage::system(system_instruction(&self.context)));
        messages.extend(self.history.iter().cloned());
        Ok(messages)
    }

    pub fn finish_turn(&mut self, reply: Result<String, Failure>) -> Result<String, Failure> {
        self.state = ChatState::Idle;
        match reply {
            Ok(text) => {
                self.history.push(ChatMessage::assistant(text.clone()));
                self.log.push(ChatLogEntry::Ai(text.clone()));
                Ok(text)
            }
            Err(failure) => {
                tracing::warn!(error = %failure, "Chat turn failed");
                self.log.push(ChatLogEntry::Error(failure.to_string()));
                Err(failure)
            }
        }
    }

    pub async fn send_message<C: CompletionClient>(
        &mut self,
        completer: &Completer<C>,
        user_text: &str,
    ) -> Result<String, Failure> {
        let messages = self.begin_turn(user_text)?;
        let reply = completer.complete(CHAT_TEMPERATURE, messages).await;
        self.finish_turn(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::completion::Role;
    use crate::core::stubs::StubCompletion;

    fn completer(stub: &StubCompletion) -> Completer<StubCompletion> {
        Completer::new(stub.clone(), "test-model", None)
    }

    #[test]
    fn cannot_open_on_empty_text() {
        assert_eq!(
            ChatSession::open("").unwrap_err(),
            Failure::EmptyInput(NOTHING_TO_DISCUSS)
        );
    }

    #[tokio::test]
    async fn request_is_system_instruction_then_history() {
        let stub = StubCompletion::replying(vec![Ok("It is about Rust.")]);
        let mut session = ChatSession::open("Summary:\n- Rust").expect("session");

        let reply = session
            .send_message(&completer(&stub), "What is it about?")
            .await
            .expect("reply");

        assert_eq!(reply, "It is about Rust.");
        let requests = stub.requests();
        assert_eq!(requests[0].temperature, CHAT_TEMPERATURE);
        assert_eq!(requests[0].model, "test-model");
        assert_eq!(
            requests[0].messages,
            vec![
                ChatMessage::system(
                    "You are an AI assistant discussing a video summary. The summary is: Summary:\n- Rust"
                ),
                ChatMessage::user("What is it about?"),
            ]
        );
        assert_eq!(
            session.history(),
            &[
                ChatMessage::user("What is it about?"),
                ChatMessage::assistant("It is about Rust."),
            ]
        );
        assert_eq!(session.state(), ChatState::Idle);
    }

    #[tokio::test]
    async fn empty_message_is_a_no_op() {
        let stub = StubCompletion::replying(vec![Ok("unused")]);
        let mut session = ChatSession::open("context").expect("session");

        let result = session.send_message(&completer(&stub), "").await;

        assert_eq!(result, Err(Failure::EmptyInput("Type a message first")));
        assert!(session.history().is_empty());
        assert!(session.log().is_empty());
        assert!(stub.requests().is_empty());
    }

    #[tokio::test]
    async fn failed_turn_keeps_the_unanswered_message_for_the_next_request() {
        let stub = StubCompletion::replying(vec![Err("rate limited"), Ok("Second answer")]);
        let completer = completer(&stub);
        let mut session = ChatSession::open("context").expect("session");

        let first = session.send_message(&completer, "first").await;
        assert_eq!(first, Err(Failure::Service("rate limited".into())));
        assert_eq!(session.history(), &[ChatMessage::user("first")]);
        assert_eq!(
            session.log().last(),
            Some(&ChatLogEntry::Error("rate limited".into()))
        );

        session
            .send_message(&completer, "second")
            .await
            .expect("reply");

        let requests = stub.requests();
        let roles: Vec<Role> = requests[1].messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::User]);
        assert_eq!(requests[1].messages[1].content, "first");
        assert_eq!(requests[1].messages[2].content, "second");
        assert_eq!(
            session.history(),
            &[
                ChatMessage::user("first"),
                ChatMessage::user("second"),
                ChatMessage::assistant("Second answer"),
            ]
        );
    }

    #[test]
    fn second_send_while_waiting_is_rejected() {
        let mut session = ChatSession::open("context").expect("session");

        session.begin_turn("one").expect("first turn");
        assert_eq!(session.begin_turn("two"), Err(Failure::Busy));
        assert_eq!(session.history().len(), 1);

        session.finish_turn(Ok("done".into())).expect("reply");
        assert!(session.begin_turn("two").is_ok());
    }

    #[test]
    fn context_is_fixed_at_open() {
        let mut display = String::from("original summary");
        let mut session = ChatSession::open(display.clone()).expect("session");
        display.push_str(" edited later");

        let messages = session.begin_turn("hi").expect("turn");
        assert!(messages[0].content.ends_with("The summary is: original summary"));
        assert_eq!(session.context(), "original summary");
    }

    #[test]
    fn log_lines_render_with_speaker_prefix() {
        assert_eq!(ChatLogEntry::You("hi".into()).to_string(), "You: hi");
        assert_eq!(ChatLogEntry::Ai("hello".into()).to_string(), "AI: hello");
        assert_eq!(ChatLogEntry::Error("boom".into()).to_string(), "Error: boom");
    }
}
