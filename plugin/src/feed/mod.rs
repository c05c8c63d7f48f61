//! Feed Module
//!
//! Wire schema, score formatting and the WebSocket connection for a live
//! sentiment feed. No Bevy dependencies - this can be used standalone.

mod backoff;
mod config;
mod connection;
mod error;
mod message;

pub use backoff::ReconnectPolicy;
pub use config::{DEFAULT_CONTAINER_ID, DEFAULT_ENDPOINT, FeedConfig};
pub use connection::{ConnectionState, FeedConnection, FeedEvent, FeedEventReceiver};
pub(crate) use connection::event_channel;
pub use error::{FeedError, Result};
pub use message::{EntryView, FeedMessage, Post, Sentiment, format_score};
