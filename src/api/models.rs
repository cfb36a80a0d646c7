use std::time::Duration;

use crate::api::{HealthResponse, ModelsResponse};
use crate::utils::url::construct_api_url;

pub async fn fetch_models(
    client: &reqwest::Client,
    base_url: &str,
    timeout: Duration,
) -> Result<ModelsResponse, Box<dyn std::error::Error>> {
    let models_url = construct_api_url(base_url, "models");
    let response = client.get(models_url).timeout(timeout).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(format!("API request failed with status {status}: {error_text}").into());
    }

    let models_response = response.json::<ModelsResponse>().await?;
    Ok(models_response)
}

pub async fn fetch_health(
    client: &reqwest::Client,
    base_url: &str,
    timeout: Duration,
) -> Result<HealthResponse, Box<dyn std::error::Error>> {
    let health_url = construct_api_url(base_url, "health");
    let response = client.get(health_url).timeout(timeout).send().await?;

    if !response.status().is_success() {
        return Err(format!("Health check failed with status {}", response.status()).into());
    }

    Ok(response.json::<HealthResponse>().await?)
}
