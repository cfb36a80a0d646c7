use std::error::Error;

use tracing::info;

use super::ChatOptions;
use crate::core::app::{App, AppInitConfig};
use crate::core::config::Config;
use crate::core::demo::OsReplySource;
use crate::core::model_directory::discover;
use crate::utils::url::normalize_base_url;

/// Resolve settings and query the model directory before the terminal is
/// taken over, so a slow backend never leaves a blank screen.
///
/// Command-line options win over the config file, which wins over defaults.
pub async fn bootstrap_app(options: ChatOptions, config: &Config) -> Result<App, Box<dyn Error>> {
    let base_url = normalize_base_url(options.backend.as_deref().unwrap_or(config.backend_url()));
    let model = options
        .model
        .unwrap_or_else(|| config.default_model().to_string());
    let theme = options.theme.unwrap_or_else(|| config.theme());
    let models_timeout = config.models_timeout();

    let client = reqwest::Client::builder().build()?;
    let directory = discover(&client, &base_url, models_timeout).await;
    info!(
        backend = %base_url,
        connected = directory.connected,
        models = directory.models.len(),
        "chat session starting"
    );

    Ok(App::new(AppInitConfig {
        client,
        base_url,
        model,
        directory,
        theme,
        models_timeout,
        demo_delay: config.demo_delay(),
        reply_source: Box::new(OsReplySource),
    }))
}
