use crate::core::{
    CHAT_TEMPERATURE, ChatLogEntry, ChatSession, CompletionClient, Completer, DisplayContent,
    Failure, Fragment, MISSING_URL, NOTHING_TO_SUMMARIZE, StyledLine, Summary, Transcript,
    TranscriptSession, TranscriptSource, emphasize, summarize,
};
use crate::error::Result;
use crate::tui::components::{ContentViewer, InputField, StatusLine};
use crate::tui::events::AppEvent;
use crate::tui::theme::Theme;
use crossterm::clipboard::CopyToClipboard;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Main,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Url,
    Display,
}

/// Result of a background request, delivered back to the UI loop.
#[derive(Debug)]
pub enum TaskEvent {
    Transcript(std::result::Result<Transcript, Failure>),
    Summary(std::result::Result<Summary, Failure>),
    ChatReply(std::result::Result<String, Failure>),
}

pub struct ChatPane {
    pub session: ChatSession,
    pub input: InputField,
    pub viewer: ContentViewer,
}

impl ChatPane {
    fn new(session: ChatSession) -> Self {
        let mut input = InputField::new("Message", "Ask about the video summary...");
        input.focused = true;
        Self {
            session,
            input,
            viewer: ContentViewer::new("Chat"),
        }
    }

    fn refresh(&mut self) {
        self.viewer
            .set_content(chat_log_lines(self.session.log()), "Chat");
        self.viewer.scroll_to_end();
    }
}

pub struct App<S, C> {
    pub screen: Screen,
    pub focus: Focus,
    pub should_quit: bool,
    pub theme: Theme,
    /// Keystrokes in the display edit its text instead of running commands.
    pub editing: bool,

    pub url_input: InputField,
    pub display: DisplayContent,
    pub viewer: ContentViewer,
    pub status: StatusLine,
    pub chat: Option<ChatPane>,

    in_flight: bool,
    transcripts: Arc<TranscriptSession<S>>,
    completer: std::result::Result<Arc<Completer<C>>, String>,
    task_tx: mpsc::UnboundedSender<TaskEvent>,
    task_rx: mpsc::UnboundedReceiver<TaskEvent>,
}

impl<S, C> App<S, C>
where
    S: TranscriptSource + 'static,
    C: CompletionClient + 'static,
{
    /// `completer` is an error message when no completion client could be
    /// built; transcripts still work in that case.
    pub fn new(
        transcripts: TranscriptSession<S>,
        completer: std::result::Result<Completer<C>, String>,
        theme: Theme,
    ) -> Self {
        let (task_tx, task_rx) = mpsc::unbounded_channel();
        let mut url_input = InputField::new("Video URL", "https://youtu.be/...");
        url_input.focused = true;

        let mut status = StatusLine::new();
        status.set_message("Enter a video URL or ID and press Enter");

        Self {
            screen: Screen::Main,
            focus: Focus::Url,
            should_quit: false,
            theme,
            editing: false,

            url_input,
            display: DisplayContent::Empty,
            viewer: ContentViewer::new(DisplayContent::Empty.title()),
            status,
            chat: None,

            in_flight: false,
            transcripts: Arc::new(transcripts),
            completer: completer.map(Arc::new),
            task_tx,
            task_rx,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Key(key) => self.handle_key(key)?,
            AppEvent::Paste(text) => self.handle_paste(&text),
            AppEvent::Tick => self.handle_tick(),
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        match self.screen {
            Screen::Main => match self.focus {
                Focus::Url => self.handle_url_key(key),
                Focus::Display => self.handle_display_key(key)?,
            },
            Screen::Chat => self.handle_chat_key(key),
        }
        Ok(())
    }

    fn handle_url_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.start_download(),
            KeyCode::Tab | KeyCode::Esc => self.set_focus(Focus::Display),
            _ => {
                self.url_input.handle_key(key);
            }
        }
    }

    fn handle_display_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.editing {
            self.handle_edit_key(key);
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Char('u') => self.set_focus(Focus::Url),
            KeyCode::Enter | KeyCode::Char('d') => self.start_download(),
            KeyCode::Char('s') => self.start_summary(),
            KeyCode::Char('c') => self.open_chat(),
            KeyCode::Char('e') => self.start_editing(),
            KeyCode::Char('y') => self.copy_display(&mut std::io::stdout())?,
            KeyCode::Char('t') => self.cycle_theme(),
            _ => {
                self.viewer.handle_key(key);
            }
        }
        Ok(())
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.editing = false;
                self.status.set_message("Display edited");
            }
            KeyCode::Enter => self.edit_display(|text| text.push('\n')),
            KeyCode::Backspace => self.edit_display(|text| {
                text.pop();
            }),
            KeyCode::Char(c) => self.edit_display(|text| text.push(c)),
            _ => {
                self.viewer.handle_key(key);
            }
        }
    }

    fn handle_paste(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        match self.screen {
            Screen::Chat => {
                if let Some(chat) = &mut self.chat {
                    chat.input.insert_str(&text);
                }
            }
            Screen::Main => match self.focus {
                Focus::Url => self.url_input.insert_str(&text),
                Focus::Display => self.paste_into_display(&text),
            },
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.close_chat(),
            KeyCode::Enter => self.send_chat_message(),
            KeyCode::Up | KeyCode::Down | KeyCode::PageUp | KeyCode::PageDown => {
                if let Some(chat) = &mut self.chat {
                    chat.viewer.handle_key(key);
                }
            }
            _ => {
                if let Some(chat) = &mut self.chat {
                    chat.input.handle_key(key);
                }
            }
        }
    }

    fn handle_tick(&mut self) {
        self.status.tick();

        let mut events = Vec::new();
        while let Ok(event) = self.task_rx.try_recv() {
            events.push(event);
        }
        for event in events {
            self.apply_task_event(event);
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.editing = false;
        self.url_input.focused = focus == Focus::Url;
    }

    fn set_display(&mut self, content: DisplayContent) {
        self.viewer.set_content(content.lines(), content.title());
        self.display = content;
    }

    /// Reports and returns true when another request is still running.
    fn reject_if_busy(&mut self) -> bool {
        let busy = self.is_busy();
        if busy {
            self.status.set_message(Failure::Busy.to_string());
        }
        busy
    }

    fn spawn<F>(&mut self, status: &str, task: F)
    where
        F: Future<Output = TaskEvent> + Send + 'static,
    {
        self.in_flight = true;
        self.status.start(status);
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            if tx.send(task.await).is_err() {
                tracing::debug!("Task finished after the UI went away");
            }
        });
    }

    fn show_failure(&mut self, failure: Failure, failed_status: &str) {
        match failure {
            Failure::EmptyInput(message) => self.status.finish(message),
            Failure::Busy => self.status.finish(Failure::Busy.to_string()),
            Failure::Service(description) => {
                self.set_display(DisplayContent::Error(description));
                self.status.finish(failed_status);
            }
        }
    }

    pub fn start_download(&mut self) {
        if self.reject_if_busy() {
            return;
        }

        let input = self.url_input.value.trim().to_string();
        if input.is_empty() {
            self.status.set_message(MISSING_URL);
            return;
        }

        let transcripts = Arc::clone(&self.transcripts);
        self.spawn("Downloading transcript...", async move {
            TaskEvent::Transcript(transcripts.download(&input).await)
        });
    }

    pub fn start_summary(&mut self) {
        if self.reject_if_busy() {
            return;
        }

        let text = self.display.plain_text();
        if text.is_empty() {
            self.status.set_message(NOTHING_TO_SUMMARIZE);
            return;
        }

        let completer = match &self.completer {
            Ok(completer) => Arc::clone(completer),
            Err(reason) => {
                let failure = Failure::Service(reason.clone());
                self.show_failure(failure, "Failed to summarize transcript");
                return;
            }
        };

        self.spawn("Summarizing transcript...", async move {
            TaskEvent::Summary(summarize(&*completer, &text).await)
        });
    }

    pub fn copy_display<W: Write>(&mut self, out: &mut W) -> Result<()> {
        if self.display.is_empty() {
            self.status.set_message("Nothing to copy");
            return Ok(());
        }

        execute!(
            out,
            CopyToClipboard::to_clipboard_from(self.display.plain_text())
        )?;
        self.status.set_message("Summary copied to clipboard");
        Ok(())
    }

    pub fn open_chat(&mut self) {
        if self.reject_if_busy() {
            return;
        }

        match ChatSession::open(self.display.plain_text()) {
            Ok(session) => {
                tracing::info!(context_chars = session.context().len(), "Chat opened");
                self.chat = Some(ChatPane::new(session));
                self.screen = Screen::Chat;
                self.status.set_message("Chat opened, Esc to close");
            }
            Err(failure) => self.status.set_message(failure.to_string()),
        }
    }

    pub fn close_chat(&mut self) {
        self.chat = None;
        self.screen = Screen::Main;
        self.status.set_message("Chat closed");
    }

    pub fn send_chat_message(&mut self) {
        if self.reject_if_busy() {
            return;
        }
        let Some(chat) = &mut self.chat else {
            return;
        };

        let messages = match chat.session.begin_turn(&chat.input.value) {
            Ok(messages) => messages,
            Err(Failure::EmptyInput(_)) => return,
            Err(failure) => {
                self.status.set_message(failure.to_string());
                return;
            }
        };
        chat.input.clear();

        let completer = match &self.completer {
            Ok(completer) => Arc::clone(completer),
            Err(reason) => {
                let outcome = chat.session.finish_turn(Err(Failure::Service(reason.clone())));
                chat.refresh();
                if let Err(failure) = outcome {
                    tracing::warn!(error = %failure, "Chat has no completion client");
                    self.status.set_message("Chat request failed");
                }
                return;
            }
        };
        chat.refresh();

        self.spawn("Waiting for reply...", async move {
            TaskEvent::ChatReply(completer.complete(CHAT_TEMPERATURE, messages).await)
        });
    }

    /// Edits append at the end of the display text.
    pub fn start_editing(&mut self) {
        self.set_focus(Focus::Display);
        self.editing = true;
        self.viewer.scroll_to_end();
        self.status.set_message("Editing display, Esc to finish");
    }

    /// Appends while editing; otherwise the pasted text replaces the display.
    pub fn paste_into_display(&mut self, text: &str) {
        if self.editing {
            self.edit_display(|content| content.push_str(text));
        } else {
            self.set_display(DisplayContent::Text(text.to_string()));
            self.status.set_message("Text pasted into the display");
        }
    }

    fn edit_display(&mut self, edit: impl FnOnce(&mut String)) {
        let mut text = self.display.plain_text();
        edit(&mut text);
        self.set_display(DisplayContent::Text(text));
        self.viewer.scroll_to_end();
    }

    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        self.status.set_message(format!("Theme: {}", self.theme));
    }

    pub fn apply_task_event(&mut self, event: TaskEvent) {
        self.in_flight = false;

        match event {
            TaskEvent::Transcript(Ok(transcript)) => {
                self.set_display(DisplayContent::Transcript(transcript));
                self.status.finish("Transcript downloaded successfully");
            }
            TaskEvent::Transcript(Err(failure)) => {
                self.show_failure(failure, "Failed to download transcript");
            }
            TaskEvent::Summary(Ok(summary)) => {
                self.set_display(DisplayContent::Summary(summary));
                self.status.finish("Transcript summarized");
            }
            TaskEvent::Summary(Err(failure)) => {
                self.show_failure(failure, "Failed to summarize transcript");
            }
            TaskEvent::ChatReply(reply) => match &mut self.chat {
                Some(chat) => {
                    let outcome = chat.session.finish_turn(reply);
                    chat.refresh();
                    tracing::debug!(
                        history = chat.session.history().len(),
                        "Chat turn finished"
                    );
                    self.status.finish(match outcome {
                        Ok(_) => "Reply received",
                        Err(_) => "Chat request failed",
                    });
                }
                None => {
                    tracing::debug!("Dropping chat reply for a closed session");
                    self.status.finish("Chat closed before the reply arrived");
                }
            },
        }
    }
}

fn chat_log_lines(log: &[ChatLogEntry]) -> Vec<StyledLine> {
    let mut lines = Vec::new();

    for entry in log {
        let (label, mut body) = match entry {
            ChatLogEntry::You(text) => ("You: ", plain_lines(text)),
            ChatLogEntry::Ai(text) => ("AI: ", emphasize(text)),
            ChatLogEntry::Error(text) => ("Error: ", plain_lines(text)),
        };

        if let Some(first) = body.first_mut() {
            first.insert(
                0,
                Fragment {
                    text: label.to_string(),
                    bold: true,
                },
            );
        }
        lines.append(&mut body);
        lines.push(Vec::new());
    }

    lines
}

fn plain_lines(text: &str) -> Vec<StyledLine> {
    text.split('\n')
        .map(|line| {
            vec![Fragment {
                text: line.to_string(),
                bold: false,
            }]
        })
        .collect()
}
