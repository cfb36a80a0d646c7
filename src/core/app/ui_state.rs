use std::time::Instant;

use crate::ui::theme::{Theme, ThemeKind};

/// Background activity shown by the pulsing indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    /// Waiting for a reply (live stream or demo delay).
    Reply,

    /// Re-querying the model directory.
    DirectoryRefresh,
}

pub struct UiState {
    pub theme_kind: ThemeKind,
    pub theme: Theme,
    input: String,
    pub status: Option<String>,
    /// Lines scrolled up from the bottom of the transcript; 0 follows new output.
    pub scroll_from_bottom: u16,
    pub exit_requested: bool,
    activity: Option<(ActivityKind, Instant)>,
}

impl UiState {
    pub fn new(theme_kind: ThemeKind) -> Self {
        Self {
            theme_kind,
            theme: Theme::for_kind(theme_kind),
            input: String::new(),
            status: None,
            scroll_from_bottom: 0,
            exit_requested: false,
            activity: None,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input_text(&mut self, text: String) {
        self.input = text;
    }

    pub fn insert_char(&mut self, ch: char) {
        self.input.push(ch);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    pub fn take_input(&mut self) -> String {
        std::mem::take(&mut self.input)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn set_theme(&mut self, kind: ThemeKind) {
        self.theme_kind = kind;
        self.theme = Theme::for_kind(kind);
    }

    pub fn toggle_theme(&mut self) -> ThemeKind {
        self.set_theme(self.theme_kind.toggled());
        self.theme_kind
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_from_bottom = u16::MAX;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_from_bottom = 0;
    }

    pub fn begin_activity(&mut self, kind: ActivityKind) {
        self.activity = Some((kind, Instant::now()));
    }

    pub fn end_activity(&mut self, kind: ActivityKind) {
        if matches!(self.activity, Some((current, _)) if current == kind) {
            self.activity = None;
        }
    }

    pub fn activity(&self) -> Option<ActivityKind> {
        self.activity.map(|(kind, _)| kind)
    }

    pub fn is_activity_indicator_visible(&self) -> bool {
        self.activity.is_some()
    }

    /// Milliseconds since the current activity began, for animation.
    pub fn activity_elapsed_ms(&self) -> u128 {
        self.activity
            .map(|(_, started)| started.elapsed().as_millis())
            .unwrap_or(0)
    }
}
