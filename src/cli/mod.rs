//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments and runs the selected command.
//! With no subcommand the terminal chat client starts.

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::api::models::{fetch_health, fetch_models};
use crate::core::config::{Config, CONFIG_KEYS};
use crate::core::model_directory::FALLBACK_MODELS;
use crate::ui::chat_loop::{run_chat, ChatOptions};
use crate::ui::theme::ThemeKind;
use crate::utils::logging::init_tracing;
use crate::utils::url::normalize_base_url;

#[derive(Parser, Debug)]
#[command(name = "ollama-chat", version)]
#[command(about = "A terminal chat client for a local Ollama chat backend")]
#[command(
    long_about = "ollama-chat is a full-screen terminal chat client for a locally hosted \
Ollama chat backend. Replies stream into the conversation token by token. When the \
backend cannot be reached at startup the client runs in demo mode with canned replies.\n\n\
Controls:\n\
  Enter             Send the message\n\
  Alt+Enter         Insert a newline (Shift+Enter where the terminal reports it)\n\
  Up/Down/PgUp/PgDn Scroll the conversation (Home/End jump to the ends)\n\
  Ctrl+T            Toggle dark/light theme\n\
  Ctrl+N / Ctrl+P   Select the next/previous model\n\
  Ctrl+C            Quit\n\n\
Commands:\n\
  /help             Show commands and key bindings\n\
  /models           List the available models\n\
  /model <id>       Switch model\n\
  /theme [name]     Toggle or set the theme\n\
  /reconnect        Query the backend again\n\n\
Logging:\n\
  Diagnostics are written to a log file; set OLLAMA_CHAT_LOG (e.g. debug) to change the level."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend base URL (defaults to the configured backend-url)
    #[arg(short = 'b', long, global = true, value_name = "URL")]
    pub backend: Option<String>,

    /// Model to chat with (defaults to the configured default-model)
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Theme to start with: dark or light
    #[arg(long, global = true, value_name = "THEME", value_parser = parse_theme)]
    pub theme: Option<ThemeKind>,

    /// Write diagnostic logs to this file
    #[arg(short = 'l', long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// List the models the backend offers
    Models,
    /// Show backend health
    Status,
    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key (multiple words are joined with spaces)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Print the current configuration
    Config,
}

fn parse_theme(value: &str) -> Result<ThemeKind, String> {
    ThemeKind::from_name(value).ok_or_else(|| format!("unknown theme '{value}' (expected dark or light)"))
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if let Err(e) = init_tracing(args.log_file.as_deref()) {
        eprintln!("⚠️  Logging disabled: {e}");
    }

    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            run_chat(ChatOptions {
                backend: args.backend,
                model: args.model,
                theme: args.theme,
            })
            .await
        }
        Commands::Models => {
            let config = Config::load()?;
            let base_url = resolve_backend(args.backend.as_deref(), &config);
            let selected = args
                .model
                .unwrap_or_else(|| config.default_model().to_string());
            let client = reqwest::Client::new();

            match fetch_models(&client, &base_url, config.models_timeout()).await {
                Ok(response) => {
                    println!("Models available from {base_url}:");
                    print!("{}", format_model_list(&response.models, &selected));
                }
                Err(e) => {
                    eprintln!("⚠️  Could not load models from {base_url}: {e}");
                    println!("Backend unreachable; demo mode offers:");
                    let fallback: Vec<String> =
                        FALLBACK_MODELS.iter().map(|m| m.to_string()).collect();
                    print!("{}", format_model_list(&fallback, &selected));
                }
            }
            Ok(())
        }
        Commands::Status => {
            let config = Config::load()?;
            let base_url = resolve_backend(args.backend.as_deref(), &config);
            let client = reqwest::Client::new();

            match fetch_health(&client, &base_url, config.models_timeout()).await {
                Ok(health) => {
                    println!("Backend: {base_url}");
                    println!("Status: {}", health.status);
                    println!(
                        "Ollama connected: {}",
                        if health.ollama_connected { "yes" } else { "no" }
                    );
                    Ok(())
                }
                Err(e) => {
                    eprintln!("❌ Backend {base_url} is not reachable: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            if value.is_empty() {
                config.print_all();
                return Ok(());
            }
            let value = value.join(" ");
            if let Err(e) = config.set(&key, &value) {
                eprintln!("❌ {e}");
                eprintln!("   Known keys: {}", CONFIG_KEYS.join(", "));
                std::process::exit(1);
            }
            config.save()?;
            println!("✅ Set {key} to: {value}");
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            if let Err(e) = config.unset(&key) {
                eprintln!("❌ {e}");
                eprintln!("   Known keys: {}", CONFIG_KEYS.join(", "));
                std::process::exit(1);
            }
            config.save()?;
            println!("✅ Unset {key}");
            Ok(())
        }
        Commands::Config => {
            let config = Config::load()?;
            config.print_all();
            Ok(())
        }
    }
}

fn resolve_backend(flag: Option<&str>, config: &Config) -> String {
    normalize_base_url(flag.unwrap_or(config.backend_url()))
}

fn format_model_list(models: &[String], selected: &str) -> String {
    if models.is_empty() {
        return "  (no models reported)\n".to_string();
    }
    models
        .iter()
        .map(|model| {
            let marker = if model == selected { "*" } else { " " };
            format!("{marker} {model}\n")
        })
        .collect()
}
