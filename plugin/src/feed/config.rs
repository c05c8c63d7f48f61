use std::time::Duration;

use tokio_tungstenite::tungstenite::http::HeaderValue;
use url::Url;

use crate::feed::backoff::ReconnectPolicy;
use crate::feed::error::{FeedError, Result};

/// Address the sentiment producer listens on by default.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8765";

/// Id of the list container entries are inserted into by default.
pub const DEFAULT_CONTAINER_ID: &str = "posts";

/// Connection and rendering settings for a live feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub endpoint: String,
    pub container_id: String,
    pub reconnect: ReconnectPolicy,
    /// Upper bound for TCP connect plus the WebSocket handshake.
    pub connect_timeout: Duration,
    /// Sent as the `Origin` header when set.
    pub origin: Option<String>,
    /// Frames buffered between the connection thread and the renderer.
    pub channel_capacity: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            reconnect: ReconnectPolicy::default(),
            connect_timeout: Duration::from_secs(10),
            origin: None,
            channel_capacity: 256,
        }
    }
}

impl FeedConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::default().with_endpoint(endpoint)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_container_id(mut self, container_id: impl Into<String>) -> Self {
        self.container_id = container_id.into();
        self
    }

    pub fn with_reconnect(mut self, reconnect: ReconnectPolicy) -> Self {
        self.reconnect = reconnect;
        self
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_channel_capacity(mut self, channel_capacity: usize) -> Self {
        self.channel_capacity = channel_capacity;
        self
    }

    /// Parse and check the endpoint. Only `ws://` URLs with a host are accepted.
    pub fn endpoint_url(&self) -> Result<Url> {
        let url = Url::parse(&self.endpoint).map_err(|source| FeedError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            source,
        })?;

        if url.scheme() != "ws" {
            return Err(FeedError::UnsupportedScheme(url.scheme().to_string()));
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(FeedError::MissingHost(self.endpoint.clone()));
        }

        Ok(url)
    }

    /// The Origin header value, if one is configured.
    pub fn origin_header(&self) -> Result<Option<HeaderValue>> {
        self.origin
            .as_deref()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| FeedError::InvalidOrigin(origin.to_string()))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FeedConfig::default();

        assert_eq!(config.endpoint, "ws://localhost:8765");
        assert_eq!(config.container_id, "posts");
        assert_eq!(config.channel_capacity, 256);
        assert!(config.origin.is_none());
    }

    #[test]
    fn test_endpoint_url() {
        let url = FeedConfig::new("ws://127.0.0.1:9000/feed").endpoint_url().unwrap();

        assert_eq!(url.host_str(), Some("127.0.0.1"));
        assert_eq!(url.port(), Some(9000));
        assert_eq!(url.path(), "/feed");
    }

    #[test]
    fn test_endpoint_url_errors() {
        assert!(matches!(
            FeedConfig::new("not a url").endpoint_url(),
            Err(FeedError::InvalidEndpoint { .. })
        ));
        assert!(matches!(
            FeedConfig::new("http://localhost:8765").endpoint_url(),
            Err(FeedError::UnsupportedScheme(scheme)) if scheme == "http"
        ));
        assert!(matches!(
            FeedConfig::new("wss://localhost:8765").endpoint_url(),
            Err(FeedError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_origin_header() {
        let config = FeedConfig::default();
        assert!(config.origin_header().unwrap().is_none());

        let config = config.with_origin("http://localhost:8000");
        assert_eq!(
            config.origin_header().unwrap().unwrap(),
            "http://localhost:8000"
        );

        let config = FeedConfig::default().with_origin("bad\norigin");
        assert!(matches!(
            config.origin_header(),
            Err(FeedError::InvalidOrigin(_))
        ));
    }
}
