use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::core::demo::ReplySource;
use crate::core::model_directory::ModelDirectory;
use crate::core::transcript::Transcript;
use crate::ui::theme::ThemeKind;

pub mod actions;
pub mod ui_state;

pub use actions::{
    apply_action, apply_actions, AppAction, AppActionContext, AppActionDispatcher,
    AppActionEnvelope, AppCommand, DirectoryRequest,
};
pub use ui_state::{ActivityKind, UiState};

/// Everything needed to build an [`App`] once the model directory is known.
pub struct AppInitConfig {
    pub client: reqwest::Client,
    pub base_url: String,
    pub model: String,
    pub directory: ModelDirectory,
    pub theme: ThemeKind,
    pub models_timeout: Duration,
    pub demo_delay: Duration,
    pub reply_source: Box<dyn ReplySource>,
}

pub struct SessionContext {
    pub client: reqwest::Client,
    pub base_url: String,
    pub model: String,
    pub directory: ModelDirectory,
    pub models_timeout: Duration,
    pub demo_delay: Duration,
    pub reply_source: Box<dyn ReplySource>,
    /// Set from submission until the reply reaches a terminal state.
    pub busy: bool,
    pub current_stream_id: u64,
    pub stream_cancel_token: Option<CancellationToken>,
}

/// Client state. The event loop is its only writer.
pub struct App {
    pub session: SessionContext,
    pub transcript: Transcript,
    pub ui: UiState,
}

impl App {
    pub fn new(init: AppInitConfig) -> Self {
        let AppInitConfig {
            client,
            base_url,
            model,
            directory,
            theme,
            models_timeout,
            demo_delay,
            reply_source,
        } = init;

        App {
            session: SessionContext {
                client,
                base_url,
                model,
                directory,
                models_timeout,
                demo_delay,
                reply_source,
                busy: false,
                current_stream_id: 0,
                stream_cancel_token: None,
            },
            transcript: Transcript::with_greeting(),
            ui: UiState::new(theme),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.session.busy
    }

    pub fn is_connected(&self) -> bool {
        self.session.directory.connected
    }

    pub fn is_current_stream(&self, stream_id: u64) -> bool {
        stream_id == self.session.current_stream_id
    }

    /// Mark a submission in flight and hand out the token and id for it.
    pub(crate) fn begin_request(&mut self) -> (u64, CancellationToken) {
        self.session.current_stream_id += 1;
        let token = CancellationToken::new();
        self.session.stream_cancel_token = Some(token.clone());
        self.session.busy = true;
        self.ui.begin_activity(ActivityKind::Reply);
        (self.session.current_stream_id, token)
    }

    pub(crate) fn end_request(&mut self) {
        self.transcript.finish_assistant();
        self.session.busy = false;
        self.session.stream_cancel_token = None;
        self.ui.end_activity(ActivityKind::Reply);
    }

    /// Abort background work when the application exits.
    pub fn shutdown(&mut self) {
        if let Some(token) = self.session.stream_cancel_token.take() {
            token.cancel();
        }
    }

    pub fn select_model(&mut self, model: &str) -> Result<(), String> {
        let model = model.trim();
        if !self.session.directory.contains(model) {
            return Err(format!("Unknown model: {model}"));
        }
        self.session.model = model.to_string();
        Ok(())
    }

    pub fn cycle_model(&mut self, forward: bool) -> Option<&str> {
        let next = if forward {
            self.session.directory.next_after(&self.session.model)
        } else {
            self.session.directory.previous_before(&self.session.model)
        }?
        .to_string();
        self.session.model = next;
        Some(&self.session.model)
    }

    pub fn apply_directory(&mut self, directory: ModelDirectory) {
        self.session.directory = directory;
    }

    pub fn directory_request(&self) -> DirectoryRequest {
        DirectoryRequest {
            client: self.session.client.clone(),
            base_url: self.session.base_url.clone(),
            timeout: self.session.models_timeout,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::core::demo::FixedReplySource;
    use crate::core::model_directory::DEFAULT_MODEL;

    pub fn create_test_app(connected: bool) -> App {
        let mut directory = ModelDirectory::fallback();
        directory.connected = connected;
        App::new(AppInitConfig {
            client: reqwest::Client::new(),
            base_url: "http://127.0.0.1:9".to_string(),
            model: DEFAULT_MODEL.to_string(),
            directory,
            theme: ThemeKind::Dark,
            models_timeout: Duration::from_millis(100),
            demo_delay: Duration::from_millis(10),
            reply_source: Box::new(FixedReplySource(2)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::create_test_app;
    use super::*;

    #[test]
    fn new_app_is_idle_with_greeting() {
        let app = create_test_app(true);
        assert!(!app.is_busy());
        assert_eq!(app.transcript.len(), 1);
        assert!(app.transcript.turns()[0].is_assistant());
    }

    #[test]
    fn select_model_requires_listed_model() {
        let mut app = create_test_app(true);
        assert!(app.select_model("mistral:7b").is_ok());
        assert_eq!(app.session.model, "mistral:7b");
        assert!(app.select_model("gpt-4o").is_err());
        assert_eq!(app.session.model, "mistral:7b");
    }

    #[test]
    fn cycling_models_wraps() {
        let mut app = create_test_app(true);
        assert_eq!(app.cycle_model(false), Some("phi3:mini"));
        assert_eq!(app.cycle_model(true), Some("llama3.2:3b"));
    }

    #[test]
    fn request_ids_increase_and_shutdown_cancels() {
        let mut app = create_test_app(true);
        let (first, _) = app.begin_request();
        app.end_request();
        let (second, token) = app.begin_request();
        assert!(second > first);
        assert!(app.is_busy());

        app.shutdown();
        assert!(token.is_cancelled());
    }
}
