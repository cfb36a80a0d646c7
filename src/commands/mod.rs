mod registry;

pub use registry::{all_commands, CommandInvocation};

use crate::core::app::App;
use crate::ui::theme::ThemeKind;

pub enum CommandResult {
    Continue,
    ProcessAsMessage(String),
    RefreshDirectory,
}

pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    if !trimmed.starts_with('/') {
        return CommandResult::ProcessAsMessage(input.to_string());
    }

    let mut parts = trimmed[1..].splitn(2, ' ');
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    if let Some(command) = registry::find_command(command_name) {
        let invocation = CommandInvocation { args };
        (command.handler)(app, invocation)
    } else {
        CommandResult::ProcessAsMessage(input.to_string())
    }
}

pub(super) fn handle_help(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if !invocation.args.is_empty() {
        let name = invocation.args.trim_start_matches('/');
        match registry::find_command(name) {
            Some(command) => app
                .ui
                .set_status(format!("{}: {}", command.usage, command.help)),
            None => app.ui.set_status(format!("Unknown command: /{name}")),
        }
        return CommandResult::Continue;
    }

    let commands = all_commands()
        .iter()
        .map(|command| command.usage)
        .collect::<Vec<_>>()
        .join("  ");
    app.ui.set_status(format!(
        "{commands}  |  Enter send, Alt+Enter newline, Ctrl+T theme, Ctrl+N/Ctrl+P model, Ctrl+C quit"
    ));
    CommandResult::Continue
}

pub(super) fn handle_models(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let directory = &app.session.directory;
    let source = if directory.connected { "backend" } else { "demo" };
    let status = if directory.models.is_empty() {
        format!("No models reported ({source})")
    } else {
        let listed = directory
            .models
            .iter()
            .map(|model| {
                if *model == app.session.model {
                    format!("{model}*")
                } else {
                    model.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("Models ({source}): {listed}")
    };
    app.ui.set_status(status);
    CommandResult::Continue
}

pub(super) fn handle_model(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        app.ui.set_status(format!("Model: {}", app.session.model));
        return CommandResult::Continue;
    }

    match app.select_model(invocation.args) {
        Ok(()) => app.ui.set_status(format!("Model: {}", app.session.model)),
        Err(e) => app.ui.set_status(format!("{e} (see /models)")),
    }
    CommandResult::Continue
}

pub(super) fn handle_theme(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        let kind = app.ui.toggle_theme();
        app.ui.set_status(format!("Theme: {}", kind.as_str()));
        return CommandResult::Continue;
    }

    match ThemeKind::from_name(invocation.args) {
        Some(kind) => {
            app.ui.set_theme(kind);
            app.ui.set_status(format!("Theme: {}", kind.as_str()));
        }
        None => app.ui.set_status(format!(
            "Unknown theme: {} (expected dark or light)",
            invocation.args
        )),
    }
    CommandResult::Continue
}

pub(super) fn handle_reconnect(
    _app: &mut App,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    CommandResult::RefreshDirectory
}
