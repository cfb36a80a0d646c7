//! Joining the backend base URL with endpoint paths.

/// Strip trailing slashes from a configured backend URL.
///
/// ```
/// use ollama_chat::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:8000/"), "http://localhost:8000");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Build the URL of a backend endpoint such as `models` or `chat/stream`.
///
/// ```
/// use ollama_chat::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:8000/", "/chat/stream"),
///     "http://localhost:8000/chat/stream"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        normalize_base_url(base_url),
        endpoint.trim_start_matches('/')
    )
}
