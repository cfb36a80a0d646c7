pub mod app;
pub mod chat_stream;
pub mod config;
pub mod demo;
pub mod message;
pub mod model_directory;
pub mod stream_decoder;
pub mod transcript;
