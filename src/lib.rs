//! A terminal chat client for a locally hosted Ollama chat backend.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the transcript, the model directory, demo replies, and
//!   the streaming consumer that turns `data:` records into assistant text.
//! - [`ui`] renders the terminal interface and runs the event loop that
//!   drives user input and display updates.
//! - [`commands`] implements the slash commands typed into the input box.
//! - [`api`] defines the request/response payloads spoken by the backend.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
