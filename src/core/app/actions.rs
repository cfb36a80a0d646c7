use std::time::Duration;

use tokio::sync::mpsc;

use super::App;
use crate::core::chat_stream::{DemoReplyParams, StreamParams};
use crate::core::model_directory::ModelDirectory;

mod input;
mod streaming;

pub enum AppAction {
    InsertChar { ch: char },
    InsertNewline,
    Backspace,
    ClearInput,
    /// Submit whatever is in the input box: a slash command or a message.
    SubmitInput,
    SubmitMessage { message: String },
    ProcessCommand { input: String },
    StreamOpened { stream_id: u64 },
    AppendToken { token: String, stream_id: u64 },
    DemoReplyReady { reply: String, stream_id: u64 },
    StreamFailed { message: String, stream_id: u64 },
    StreamCompleted { stream_id: u64 },
    RefreshDirectory,
    DirectoryLoaded { directory: ModelDirectory },
    ToggleTheme,
    NextModel,
    PreviousModel,
    ScrollUp { lines: u16 },
    ScrollDown { lines: u16 },
    PageUp,
    PageDown,
    ScrollToTop,
    ScrollToBottom,
    SetStatus { message: String },
    ClearStatus,
    Quit,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AppActionContext {
    pub term_width: u16,
    pub term_height: u16,
}

pub struct AppActionEnvelope {
    pub action: AppAction,
    pub context: AppActionContext,
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppActionEnvelope>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppActionEnvelope>) -> Self {
        Self { tx }
    }

    pub fn dispatch_many<I>(&self, actions: I, ctx: AppActionContext)
    where
        I: IntoIterator<Item = AppAction>,
    {
        for action in actions.into_iter() {
            let _ = self.tx.send(AppActionEnvelope {
                action,
                context: ctx,
            });
        }
    }
}

pub struct DirectoryRequest {
    pub client: reqwest::Client,
    pub base_url: String,
    pub timeout: Duration,
}

/// Background work requested by an action, executed by the event loop.
pub enum AppCommand {
    SpawnStream(StreamParams),
    SpawnDemoReply(DemoReplyParams),
    RefreshDirectory(DirectoryRequest),
}

pub fn apply_actions(
    app: &mut App,
    envelopes: impl IntoIterator<Item = AppActionEnvelope>,
) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for envelope in envelopes {
        if let Some(cmd) = apply_action(app, envelope.action, envelope.context) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction, ctx: AppActionContext) -> Option<AppCommand> {
    match action {
        AppAction::SubmitMessage { message } => streaming::submit_message(app, message),
        AppAction::StreamOpened { .. }
        | AppAction::AppendToken { .. }
        | AppAction::DemoReplyReady { .. }
        | AppAction::StreamFailed { .. }
        | AppAction::StreamCompleted { .. } => streaming::handle_streaming_action(app, action),
        _ => input::handle_input_action(app, action, ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::test_support::create_test_app;
    use crate::core::message::Turn;
    use crate::core::transcript::{APOLOGY, GREETING};

    fn ctx() -> AppActionContext {
        AppActionContext {
            term_width: 80,
            term_height: 24,
        }
    }

    fn apply(app: &mut App, action: AppAction) -> Option<AppCommand> {
        apply_action(app, action, ctx())
    }

    fn submit(app: &mut App, text: &str) -> (u64, Option<AppCommand>) {
        let command = apply(
            app,
            AppAction::SubmitMessage {
                message: text.to_string(),
            },
        );
        (app.session.current_stream_id, command)
    }

    fn token(app: &mut App, stream_id: u64, text: &str) {
        apply(
            app,
            AppAction::AppendToken {
                token: text.to_string(),
                stream_id,
            },
        );
    }

    #[test]
    fn live_submission_streams_into_one_turn() {
        let mut app = create_test_app(true);
        assert!(!app.is_busy());

        let (id, command) = submit(&mut app, "Hello");
        let Some(AppCommand::SpawnStream(params)) = command else {
            panic!("expected a stream command");
        };
        assert_eq!(params.message, "Hello");
        assert_eq!(params.model, "llama3.2:3b");
        assert_eq!(params.stream_id, id);
        assert!(app.is_busy());
        assert_eq!(app.transcript.last(), Some(&Turn::user("Hello")));

        apply(&mut app, AppAction::StreamOpened { stream_id: id });
        let before = app.transcript.revision();
        for t in ["A", "B", "C"] {
            token(&mut app, id, t);
        }
        apply(&mut app, AppAction::StreamCompleted { stream_id: id });

        assert_eq!(app.transcript.revision() - before, 3);
        assert_eq!(
            app.transcript.turns(),
            &[
                Turn::assistant(GREETING),
                Turn::user("Hello"),
                Turn::assistant("ABC")
            ]
        );
        assert!(!app.is_busy());
    }

    #[test]
    fn demo_submission_schedules_canned_reply() {
        let mut app = create_test_app(false);
        let (id, command) = submit(&mut app, "what is rust?");
        let Some(AppCommand::SpawnDemoReply(params)) = command else {
            panic!("expected a demo reply command");
        };
        assert_eq!(params.stream_id, id);
        assert_eq!(params.delay, Duration::from_millis(10));
        assert!(params.reply.contains("what is rust?"));
        assert!(app.is_busy());

        apply(
            &mut app,
            AppAction::DemoReplyReady {
                reply: params.reply.clone(),
                stream_id: id,
            },
        );
        apply(&mut app, AppAction::StreamCompleted { stream_id: id });

        let turns = app.transcript.turns();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[1], Turn::user("what is rust?"));
        assert_eq!(turns[2], Turn::assistant(params.reply));
        assert!(!app.is_busy());
    }

    #[test]
    fn failure_before_tokens_leaves_single_apology() {
        let mut app = create_test_app(true);
        let (id, _) = submit(&mut app, "hi");
        apply(&mut app, AppAction::StreamOpened { stream_id: id });
        apply(
            &mut app,
            AppAction::StreamFailed {
                message: "connection reset".to_string(),
                stream_id: id,
            },
        );
        assert!(!app.is_busy());
        apply(&mut app, AppAction::StreamCompleted { stream_id: id });

        assert_eq!(
            app.transcript.turns()[1..],
            [Turn::user("hi"), Turn::assistant(APOLOGY)]
        );
        assert!(!app.is_busy());
    }

    #[test]
    fn failure_without_open_appends_apology() {
        let mut app = create_test_app(true);
        let (id, _) = submit(&mut app, "hi");
        apply(
            &mut app,
            AppAction::StreamFailed {
                message: "status 503".to_string(),
                stream_id: id,
            },
        );

        assert_eq!(
            app.transcript.turns()[1..],
            [Turn::user("hi"), Turn::assistant(APOLOGY)]
        );
        assert!(!app.is_busy());
    }

    #[test]
    fn busy_rejects_new_submissions() {
        let mut app = create_test_app(true);
        let (id, _) = submit(&mut app, "first");
        let len = app.transcript.len();

        let (second_id, command) = submit(&mut app, "second");
        assert!(command.is_none());
        assert_eq!(second_id, id);
        assert_eq!(app.transcript.len(), len);
        assert!(app.ui.status.is_some());
    }

    #[test]
    fn blank_submissions_are_ignored() {
        let mut app = create_test_app(true);
        for text in ["", "   ", "\n\t"] {
            let (_, command) = submit(&mut app, text);
            assert!(command.is_none());
        }
        assert_eq!(app.transcript.len(), 1);
        assert!(!app.is_busy());
    }

    #[test]
    fn stale_stream_messages_are_dropped() {
        let mut app = create_test_app(true);
        let (old, _) = submit(&mut app, "one");
        apply(&mut app, AppAction::StreamCompleted { stream_id: old });
        let (current, _) = submit(&mut app, "two");
        apply(&mut app, AppAction::StreamOpened { stream_id: current });

        token(&mut app, old, "stale");
        apply(&mut app, AppAction::StreamCompleted { stream_id: old });
        assert!(app.is_busy());

        token(&mut app, current, "fresh");
        assert_eq!(app.transcript.last(), Some(&Turn::assistant("fresh")));
    }

    #[test]
    fn submit_input_clears_box_and_sends() {
        let mut app = create_test_app(true);
        app.ui.set_input_text("  spaced text ".to_string());
        let command = apply(&mut app, AppAction::SubmitInput);
        assert!(matches!(command, Some(AppCommand::SpawnStream(_))));
        assert!(app.ui.input().is_empty());
        assert_eq!(app.transcript.last(), Some(&Turn::user("  spaced text ")));
    }

    #[test]
    fn blank_input_is_kept_in_box() {
        let mut app = create_test_app(true);
        app.ui.set_input_text("   ".to_string());
        assert!(apply(&mut app, AppAction::SubmitInput).is_none());
        assert_eq!(app.ui.input(), "   ");
    }

    #[test]
    fn input_is_disabled_while_busy() {
        let mut app = create_test_app(true);
        submit(&mut app, "first");
        apply(&mut app, AppAction::InsertChar { ch: 'x' });
        assert!(app.ui.input().is_empty());
        app.ui.set_input_text("queued".to_string());
        assert!(apply(&mut app, AppAction::SubmitInput).is_none());
        assert_eq!(app.ui.input(), "queued");
    }

    #[test]
    fn slash_input_runs_commands() {
        let mut app = create_test_app(true);
        app.ui.set_input_text("/model mistral:7b".to_string());
        assert!(apply(&mut app, AppAction::SubmitInput).is_none());
        assert_eq!(app.session.model, "mistral:7b");
        assert_eq!(app.transcript.len(), 1);
        assert!(app.ui.input().is_empty());
    }

    #[test]
    fn reconnect_requests_directory_refresh() {
        let mut app = create_test_app(false);
        let command = apply(
            &mut app,
            AppAction::ProcessCommand {
                input: "/reconnect".to_string(),
            },
        );
        assert!(matches!(command, Some(AppCommand::RefreshDirectory(_))));

        let directory = ModelDirectory {
            models: vec!["gemma:2b".to_string()],
            connected: true,
        };
        apply(&mut app, AppAction::DirectoryLoaded { directory });
        assert!(app.is_connected());
        assert!(app.ui.status.as_deref().unwrap_or_default().contains("Connected"));
    }

    #[test]
    fn theme_and_model_shortcuts() {
        let mut app = create_test_app(true);
        apply(&mut app, AppAction::ToggleTheme);
        assert_eq!(app.ui.theme_kind, crate::ui::theme::ThemeKind::Light);
        apply(&mut app, AppAction::NextModel);
        assert_eq!(app.session.model, "llama3.2:1b");
        apply(&mut app, AppAction::PreviousModel);
        assert_eq!(app.session.model, "llama3.2:3b");
    }

    #[test]
    fn page_scrolling_uses_terminal_height() {
        let mut app = create_test_app(true);
        apply(&mut app, AppAction::PageUp);
        let page = app.ui.scroll_from_bottom;
        assert!(page > 0 && page < 24);
        apply(&mut app, AppAction::PageDown);
        assert_eq!(app.ui.scroll_from_bottom, 0);
    }

    #[test]
    fn quit_sets_exit_flag() {
        let mut app = create_test_app(true);
        apply(&mut app, AppAction::Quit);
        assert!(app.ui.exit_requested);
    }
}
