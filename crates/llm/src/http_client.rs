//! HTTP Client Factory
//!
//! Builds reqwest clients with a bounded timeout and a product user agent.
//! Shared by the model clients and the research tools so every outbound
//! request carries the same deadline discipline.

use std::time::Duration;

/// Build a `reqwest::Client` with the given request timeout.
pub fn build_http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent("ReliefForge/0.1")
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let _client = build_http_client(Duration::from_secs(5));
    }
}
