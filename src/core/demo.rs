//! Canned replies used while the backend is unreachable.

use std::time::Duration;

pub const DEMO_REPLY_DELAY: Duration = Duration::from_millis(1000);

/// Number of canned replies; the echo reply is one of them.
pub const DEMO_REPLY_COUNT: usize = 4;

const ECHO_REPLY_INDEX: usize = 2;

/// Source of the uniform choice between canned replies.
pub trait ReplySource: Send {
    /// Return an index in `0..count`.
    fn pick(&mut self, count: usize) -> usize;
}

/// Draws from the operating system's random number generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsReplySource;

impl ReplySource for OsReplySource {
    fn pick(&mut self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        let mut buf = [0u8; 8];
        match getrandom::fill(&mut buf) {
            Ok(()) => (u64::from_le_bytes(buf) % count as u64) as usize,
            Err(err) => {
                tracing::warn!(error = %err, "random source unavailable, using first demo reply");
                0
            }
        }
    }
}

/// Always picks the same index. Useful for reproducible sessions.
#[derive(Debug, Clone, Copy)]
pub struct FixedReplySource(pub usize);

impl ReplySource for FixedReplySource {
    fn pick(&mut self, count: usize) -> usize {
        if count == 0 {
            0
        } else {
            self.0 % count
        }
    }
}

pub fn demo_reply(index: usize, message: &str) -> String {
    match index % DEMO_REPLY_COUNT {
        0 => "I'm running in demo mode since the Ollama server isn't available. In a real setup, I would connect to your local Ollama instance to provide AI responses.".to_string(),
        1 => "This is a demonstration response. To get real AI responses, please ensure your Ollama server is running on localhost:8000.".to_string(),
        ECHO_REPLY_INDEX => format!(
            "Demo mode active! Your message was: \"{message}\". Connect to Ollama server for actual AI responses."
        ),
        _ => "I'm simulating a response since the Ollama server is not connected. Please check your server configuration.".to_string(),
    }
}

pub fn pick_demo_reply(source: &mut dyn ReplySource, message: &str) -> String {
    let index = source.pick(DEMO_REPLY_COUNT);
    demo_reply(index, message)
}
