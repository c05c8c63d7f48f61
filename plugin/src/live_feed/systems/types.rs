use std::ops::Deref;

use bevy::prelude::*;

use crate::feed::{
    ConnectionState, DEFAULT_CONTAINER_ID, EntryView, FeedConnection, FeedEventReceiver,
};

/// Marker component for the list container entries are inserted into
#[derive(Component, Debug, Clone)]
pub struct FeedList {
    pub id: String,
}

impl Default for FeedList {
    fn default() -> Self {
        Self {
            id: DEFAULT_CONTAINER_ID.to_string(),
        }
    }
}

#[derive(Bundle)]
pub struct FeedListBundle {
    list: FeedList,
    node: Node,
}

impl FeedListBundle {
    /// A list container with the given id. Entries stack top to bottom, so
    /// the node is forced into a column layout.
    pub fn new(mut node: Node, id: impl Into<String>) -> Self {
        node.flex_direction = FlexDirection::Column;
        Self {
            list: FeedList { id: id.into() },
            node,
        }
    }
}

/// One rendered message
#[derive(Component, Debug, Clone)]
pub struct FeedEntry {
    /// Position in arrival order, starting at 0.
    pub sequence: u64,
    pub view: EntryView,
}

/// The sentiment label an entry is drawn with.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct FeedCategory(pub String);

/// Marker for the author line of an entry
#[derive(Component)]
pub struct EntryAuthor;

/// Marker for the body line of an entry
#[derive(Component)]
pub struct EntryBody;

/// Marker for the "Sentiment: label (score)" line of an entry
#[derive(Component)]
pub struct EntrySentiment;

/// Marker for text nodes that show the connection state
#[derive(Component)]
pub struct ConnectionIndicator;

/// Which container the renderer writes to.
#[derive(Resource, Debug, Clone)]
pub struct FeedSettings {
    pub container_id: String,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            container_id: DEFAULT_CONTAINER_ID.to_string(),
        }
    }
}

/// Connection state and counters as seen by the renderer.
#[derive(Resource, Debug, Clone, Default)]
pub struct FeedStatus {
    pub endpoint: String,
    pub state: ConnectionState,
    /// Messages rendered so far.
    pub rendered: u64,
    /// Frames dropped because they failed to decode or had nowhere to go.
    pub dropped: u64,
}

#[derive(Resource)]
pub struct FeedEventQueue(pub FeedEventReceiver);

/// Bevy Resource wrapper for FeedConnection (keeps the connection thread alive).
#[derive(Resource)]
pub struct FeedConnectionResource(pub FeedConnection);

impl Deref for FeedConnectionResource {
    type Target = FeedConnection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
