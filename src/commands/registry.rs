use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&mut App, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help [command]",
        help: "Show commands and key bindings, or details for one command.",
        handler: super::handle_help,
    },
    Command {
        name: "models",
        usage: "/models",
        help: "List the models the backend offers.",
        handler: super::handle_models,
    },
    Command {
        name: "model",
        usage: "/model <id>",
        help: "Show or switch the model used for new messages.",
        handler: super::handle_model,
    },
    Command {
        name: "theme",
        usage: "/theme [dark|light]",
        help: "Toggle the theme or apply one directly.",
        handler: super::handle_theme,
    },
    Command {
        name: "reconnect",
        usage: "/reconnect",
        help: "Query the backend again and leave demo mode if it answers.",
        handler: super::handle_reconnect,
    },
];
