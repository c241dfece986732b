//! Client configuration

use std::time::Duration;

/// Client configuration for connecting to the hall server
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:5000")
    pub base_url: String,

    /// Path of the snapshot stream endpoint
    pub stream_path: String,

    /// Action request timeout in seconds
    pub timeout: u64,

    /// Delay between stream reconnect attempts in milliseconds
    pub reconnect_delay_ms: u64,

    /// Number of physical tables in the hall
    pub table_count: u32,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            stream_path: "/stream".to_string(),
            timeout: 30,
            reconnect_delay_ms: 5000,
            table_count: 15,
        }
    }

    /// Set the stream endpoint path
    pub fn with_stream_path(mut self, path: impl Into<String>) -> Self {
        self.stream_path = path.into();
        self
    }

    /// Set the action request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the stream reconnect delay
    pub fn with_reconnect_delay_ms(mut self, millis: u64) -> Self {
        self.reconnect_delay_ms = millis;
        self
    }

    /// Set the number of tables seeded into the registry
    pub fn with_table_count(mut self, count: u32) -> Self {
        self.table_count = count;
        self
    }

    /// Full URL of the snapshot stream endpoint
    pub fn stream_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.stream_path.trim_start_matches('/')
        )
    }

    /// Reconnect delay as a `Duration`
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:5000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_url_joins_cleanly() {
        let config = ClientConfig::new("http://localhost:5000/").with_stream_path("stream");
        assert_eq!(config.stream_url(), "http://localhost:5000/stream");
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.reconnect_delay(), Duration::from_secs(5));
        assert_eq!(config.table_count, 15);
    }
}
