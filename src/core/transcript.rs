//! The conversation history shown in the chat pane.
//!
//! Turns are only ever appended, with one exception: the assistant turn
//! currently receiving streamed tokens is rewritten in place. At most one such
//! turn exists, and it is always the last element. Every mutation bumps
//! [`Transcript::revision`], so each one is an observable snapshot.

use crate::core::message::{Role, Turn};

pub const GREETING: &str =
    "Hello! I'm your AI assistant powered by Ollama. How can I help you today?";

pub const APOLOGY: &str =
    "Sorry, something went wrong. Please check if your Ollama server is running and try again!";

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
    in_progress: bool,
    revision: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_greeting() -> Self {
        let mut transcript = Self::new();
        transcript.push_assistant(GREETING);
        transcript
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn has_in_progress(&self) -> bool {
        self.in_progress
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Turn::user(content));
    }

    /// Append a complete assistant turn.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(Turn::assistant(content));
    }

    /// Append the empty assistant turn that streamed tokens will fill.
    pub fn begin_assistant(&mut self) {
        self.push(Turn::assistant(String::new()));
        self.in_progress = true;
    }

    /// Append `token` to the in-progress assistant turn. Returns `false` when
    /// no turn is in progress.
    pub fn append_token(&mut self, token: &str) -> bool {
        if !self.in_progress {
            return false;
        }
        let Some(last) = self.turns.last_mut() else {
            return false;
        };
        last.content.push_str(token);
        self.revision += 1;
        true
    }

    pub fn finish_assistant(&mut self) {
        self.in_progress = false;
    }

    /// Record a failed reply. An empty in-progress placeholder is replaced by
    /// `message`; partial streamed text is kept and `message` follows it.
    pub fn fail_with(&mut self, message: impl Into<String>) {
        let replace_placeholder = self.in_progress
            && self
                .turns
                .last()
                .is_some_and(|turn| turn.role == Role::Assistant && turn.content.is_empty());
        self.in_progress = false;

        if replace_placeholder {
            if let Some(last) = self.turns.last_mut() {
                last.content = message.into();
                self.revision += 1;
            }
        } else {
            self.push(Turn::assistant(message));
        }
    }

    fn push(&mut self, turn: Turn) {
        self.in_progress = false;
        self.turns.push(turn);
        self.revision += 1;
    }
}
