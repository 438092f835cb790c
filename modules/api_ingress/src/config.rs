use std::time::Duration;

/// HTTP host configuration.
#[derive(Debug, Clone)]
pub struct ApiIngressConfig {
    /// Serve the OpenAPI document at [`crate::OPENAPI_PATH`].
    pub enable_docs: bool,
    pub cors_enabled: bool,
    /// Handler timeout; requests running longer get 408.
    pub request_timeout: Duration,
    pub body_limit_bytes: usize,
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            enable_docs: false,
            cors_enabled: false,
            request_timeout: Duration::from_secs(30),
            body_limit_bytes: 1024 * 1024,
        }
    }
}
