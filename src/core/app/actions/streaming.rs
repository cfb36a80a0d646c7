use tracing::{debug, warn};

use super::{AppAction, AppCommand};
use crate::core::app::App;
use crate::core::chat_stream::{DemoReplyParams, StreamParams};
use crate::core::demo::pick_demo_reply;
use crate::core::transcript::APOLOGY;

pub(super) fn handle_streaming_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::StreamOpened { stream_id } => {
            if app.is_current_stream(stream_id) && app.is_busy() {
                app.transcript.begin_assistant();
            }
        }
        AppAction::AppendToken { token, stream_id } => {
            if app.is_current_stream(stream_id) {
                app.transcript.append_token(&token);
            }
        }
        AppAction::DemoReplyReady { reply, stream_id } => {
            if app.is_current_stream(stream_id) && app.is_busy() {
                app.transcript.push_assistant(reply);
            }
        }
        AppAction::StreamFailed { message, stream_id } => {
            if app.is_current_stream(stream_id) && app.is_busy() {
                warn!(stream_id, error = %message, "reply failed");
                app.transcript.fail_with(APOLOGY);
                app.end_request();
            }
        }
        AppAction::StreamCompleted { stream_id } => {
            if app.is_current_stream(stream_id) && app.is_busy() {
                debug!(stream_id, "reply completed");
                app.end_request();
            }
        }
        _ => unreachable!("non-streaming action routed to streaming handler"),
    }
    None
}

/// Append the user's turn and start the reply: a live stream when the
/// backend is connected, a delayed canned reply otherwise.
pub(super) fn submit_message(app: &mut App, message: String) -> Option<AppCommand> {
    if app.is_busy() {
        app.ui
            .set_status("Still waiting for the previous reply to finish");
        return None;
    }
    if message.trim().is_empty() {
        return None;
    }

    app.transcript.push_user(message.clone());
    app.ui.clear_input();
    app.ui.clear_status();
    app.ui.scroll_to_bottom();
    let (stream_id, cancel_token) = app.begin_request();

    if !app.is_connected() {
        let reply = pick_demo_reply(app.session.reply_source.as_mut(), &message);
        debug!(stream_id, "scheduling demo reply");
        return Some(AppCommand::SpawnDemoReply(DemoReplyParams {
            reply,
            delay: app.session.demo_delay,
            cancel_token,
            stream_id,
        }));
    }

    debug!(stream_id, model = %app.session.model, "starting chat stream");
    Some(AppCommand::SpawnStream(StreamParams {
        client: app.session.client.clone(),
        base_url: app.session.base_url.clone(),
        model: app.session.model.clone(),
        message,
        cancel_token,
        stream_id,
    }))
}
