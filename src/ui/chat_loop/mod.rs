//! Terminal event loop.
//!
//! The loop owns the [`App`]. Input events, stream updates and background
//! results all arrive as [`AppAction`]s on one queue and are applied in
//! order between frames.

mod keybindings;
mod lifecycle;
mod setup;

use self::keybindings::{map_key_event, map_paste};
use self::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
use self::setup::bootstrap_app;

use crate::core::app::{
    apply_actions, App, AppAction, AppActionContext, AppActionDispatcher, AppActionEnvelope,
    AppCommand, DirectoryRequest,
};
use crate::core::chat_stream::{ChatStreamService, StreamMessage};
use crate::core::config::Config;
use crate::core::model_directory::discover;
use crate::ui::renderer::ui;
use crate::ui::theme::ThemeKind;
use ratatui::crossterm::event::{self, Event, KeyEventKind};
use ratatui::prelude::Size;
use std::error::Error;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::debug;

const MAX_FPS: u64 = 60;

/// Overrides from the command line; `None` defers to the config file.
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub backend: Option<String>,
    pub model: Option<String>,
    pub theme: Option<ThemeKind>,
}

pub enum UiEvent {
    Crossterm(Event),
}

fn try_draw_frame(
    app: &App,
    terminal: &mut ChatTerminal,
    request_redraw: &mut bool,
    last_draw: &mut Instant,
    frame_duration: Duration,
) -> std::io::Result<()> {
    if !*request_redraw {
        return Ok(());
    }

    let now = Instant::now();
    if now.duration_since(*last_draw) < frame_duration {
        return Ok(());
    }

    terminal.draw(|f| ui(f, app))?;
    *last_draw = now;
    *request_redraw = false;
    Ok(())
}

/// Translate pending terminal events into actions. Returns whether any
/// event arrived.
fn process_ui_events(
    dispatcher: &AppActionDispatcher,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    term_size: Size,
) -> bool {
    let ctx = AppActionContext {
        term_width: term_size.width,
        term_height: term_size.height,
    };
    let mut events_processed = false;

    while let Ok(ev) = event_rx.try_recv() {
        events_processed = true;
        match ev {
            UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                dispatcher.dispatch_many(map_key_event(&key), ctx);
            }
            UiEvent::Crossterm(Event::Paste(text)) => {
                dispatcher.dispatch_many(map_paste(&text), ctx);
            }
            UiEvent::Crossterm(_) => {}
        }
    }

    events_processed
}

/// Forward stream messages for the current request as actions, one action
/// per message so every token is its own transcript update.
fn process_stream_updates(
    dispatcher: &AppActionDispatcher,
    rx: &mut mpsc::UnboundedReceiver<(StreamMessage, u64)>,
    ctx: AppActionContext,
    current_stream_id: u64,
) -> bool {
    let mut actions = Vec::new();

    while let Ok((message, stream_id)) = rx.try_recv() {
        if stream_id != current_stream_id {
            debug!(stream_id, current_stream_id, "dropping stale stream message");
            continue;
        }

        actions.push(match message {
            StreamMessage::Opened => AppAction::StreamOpened { stream_id },
            StreamMessage::Token(token) => AppAction::AppendToken { token, stream_id },
            StreamMessage::Reply(reply) => AppAction::DemoReplyReady { reply, stream_id },
            StreamMessage::Failed(message) => AppAction::StreamFailed { message, stream_id },
            StreamMessage::End => AppAction::StreamCompleted { stream_id },
        });
    }

    if actions.is_empty() {
        return false;
    }

    dispatcher.dispatch_many(actions, ctx);
    true
}

fn drain_action_queue(
    app: &mut App,
    dispatcher: &AppActionDispatcher,
    stream_service: &ChatStreamService,
    action_rx: &mut mpsc::UnboundedReceiver<AppActionEnvelope>,
) -> bool {
    let mut pending = Vec::new();
    while let Ok(envelope) = action_rx.try_recv() {
        pending.push(envelope);
    }

    if pending.is_empty() {
        return false;
    }

    for cmd in apply_actions(app, pending) {
        match cmd {
            AppCommand::SpawnStream(params) => stream_service.spawn_stream(params),
            AppCommand::SpawnDemoReply(params) => stream_service.spawn_demo_reply(params),
            AppCommand::RefreshDirectory(request) => {
                spawn_directory_refresh(dispatcher.clone(), request)
            }
        }
    }
    true
}

fn spawn_directory_refresh(dispatcher: AppActionDispatcher, request: DirectoryRequest) {
    tokio::spawn(async move {
        let directory = discover(&request.client, &request.base_url, request.timeout).await;
        dispatcher.dispatch_many(
            [AppAction::DirectoryLoaded { directory }],
            AppActionContext::default(),
        );
    });
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

pub async fn run_chat(options: ChatOptions) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let mut app = bootstrap_app(options, &config).await?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppActionEnvelope>();
    let dispatcher = AppActionDispatcher::new(action_tx);
    let (stream_service, mut stream_rx) = ChatStreamService::new();

    let mut terminal = setup_terminal()?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);

    let result = event_loop(
        &mut app,
        &mut terminal,
        &dispatcher,
        &stream_service,
        &mut action_rx,
        &mut stream_rx,
        &mut event_rx,
    )
    .await;

    app.shutdown();
    event_reader_handle.abort();
    restore_terminal(&mut terminal)?;

    result
}

async fn event_loop(
    app: &mut App,
    terminal: &mut ChatTerminal,
    dispatcher: &AppActionDispatcher,
    stream_service: &ChatStreamService,
    action_rx: &mut mpsc::UnboundedReceiver<AppActionEnvelope>,
    stream_rx: &mut mpsc::UnboundedReceiver<(StreamMessage, u64)>,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
) -> Result<(), Box<dyn Error>> {
    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut request_redraw = true;
    let mut indicator_visible = false;
    let mut last_indicator_frame = Instant::now() - frame_duration;

    loop {
        if app.ui.exit_requested {
            return Ok(());
        }

        try_draw_frame(
            app,
            terminal,
            &mut request_redraw,
            &mut last_draw,
            frame_duration,
        )?;

        let term_size = terminal.size().unwrap_or_default();
        let ctx = AppActionContext {
            term_width: term_size.width,
            term_height: term_size.height,
        };

        let events_processed = process_ui_events(dispatcher, event_rx, term_size);
        let received_any =
            process_stream_updates(dispatcher, stream_rx, ctx, app.session.current_stream_id);
        let actions_applied = drain_action_queue(app, dispatcher, stream_service, action_rx);

        if events_processed || received_any || actions_applied {
            request_redraw = true;
        }

        let indicator_now = app.ui.is_activity_indicator_visible();
        if indicator_now != indicator_visible {
            indicator_visible = indicator_now;
            request_redraw = true;
        }
        if indicator_now {
            let now = Instant::now();
            if now.duration_since(last_indicator_frame) >= frame_duration {
                request_redraw = true;
                last_indicator_frame = now;
            }
        }

        let idle = !events_processed && !received_any && !request_redraw;
        if idle {
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
    }
}
