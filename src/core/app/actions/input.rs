use super::{AppAction, AppActionContext, AppCommand};
use crate::commands::{process_input, CommandResult};
use crate::core::app::{ActivityKind, App};

/// Rows taken by the input box, status line, and borders.
const PAGE_CHROME_ROWS: u16 = 6;

pub(super) fn handle_input_action(
    app: &mut App,
    action: AppAction,
    ctx: AppActionContext,
) -> Option<AppCommand> {
    match action {
        AppAction::InsertChar { ch } => {
            if !app.is_busy() {
                app.ui.insert_char(ch);
            }
            None
        }
        AppAction::InsertNewline => {
            if !app.is_busy() {
                app.ui.insert_char('\n');
            }
            None
        }
        AppAction::Backspace => {
            if !app.is_busy() {
                app.ui.backspace();
            }
            None
        }
        AppAction::ClearInput => {
            app.ui.clear_input();
            None
        }
        AppAction::SubmitInput => submit_input(app),
        AppAction::ProcessCommand { input } => run_command(app, &input),
        AppAction::RefreshDirectory => Some(refresh_directory(app)),
        AppAction::DirectoryLoaded { directory } => {
            let summary = if directory.connected {
                format!("Connected: {} models available", directory.models.len())
            } else {
                "Backend unreachable, staying in demo mode".to_string()
            };
            app.apply_directory(directory);
            app.ui.end_activity(ActivityKind::DirectoryRefresh);
            app.ui.set_status(summary);
            None
        }
        AppAction::ToggleTheme => {
            let kind = app.ui.toggle_theme();
            app.ui.set_status(format!("Theme: {}", kind.as_str()));
            None
        }
        AppAction::NextModel | AppAction::PreviousModel => {
            let forward = matches!(action, AppAction::NextModel);
            let status = match app.cycle_model(forward) {
                Some(model) => format!("Model: {model}"),
                None => "No models available".to_string(),
            };
            app.ui.set_status(status);
            None
        }
        AppAction::ScrollUp { lines } => {
            app.ui.scroll_up(lines);
            None
        }
        AppAction::ScrollDown { lines } => {
            app.ui.scroll_down(lines);
            None
        }
        AppAction::PageUp => {
            app.ui.scroll_up(page_size(ctx));
            None
        }
        AppAction::PageDown => {
            app.ui.scroll_down(page_size(ctx));
            None
        }
        AppAction::ScrollToTop => {
            app.ui.scroll_to_top();
            None
        }
        AppAction::ScrollToBottom => {
            app.ui.scroll_to_bottom();
            None
        }
        AppAction::SetStatus { message } => {
            app.ui.set_status(message);
            None
        }
        AppAction::ClearStatus => {
            app.ui.clear_status();
            None
        }
        AppAction::Quit => {
            app.ui.exit_requested = true;
            None
        }
        _ => unreachable!("streaming action routed to input handler"),
    }
}

fn page_size(ctx: AppActionContext) -> u16 {
    ctx.term_height.saturating_sub(PAGE_CHROME_ROWS).max(1)
}

fn submit_input(app: &mut App) -> Option<AppCommand> {
    if app.is_busy() || app.ui.input().trim().is_empty() {
        return None;
    }

    let input = app.ui.take_input();
    if input.trim_start().starts_with('/') {
        run_command(app, &input)
    } else {
        super::streaming::submit_message(app, input)
    }
}

fn run_command(app: &mut App, input: &str) -> Option<AppCommand> {
    match process_input(app, input) {
        CommandResult::Continue => None,
        CommandResult::ProcessAsMessage(message) => super::streaming::submit_message(app, message),
        CommandResult::RefreshDirectory => Some(refresh_directory(app)),
    }
}

fn refresh_directory(app: &mut App) -> AppCommand {
    if !app.is_busy() {
        app.ui.begin_activity(ActivityKind::DirectoryRefresh);
    }
    app.ui.set_status("Checking backend...");
    AppCommand::RefreshDirectory(app.directory_request())
}
