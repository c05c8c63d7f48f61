//! Live sentiment feed for Bevy UI.
//!
//! [`feed`] holds the Bevy-free pieces: the wire schema, score formatting and
//! the WebSocket connection. [`live_feed`] renders that feed into Bevy UI.

pub mod feed;
pub mod live_feed;

pub use feed::{
    ConnectionState, EntryView, FeedConfig, FeedConnection, FeedError, FeedEvent,
    FeedEventReceiver, FeedMessage, ReconnectPolicy, format_score,
};
pub use live_feed::*;
