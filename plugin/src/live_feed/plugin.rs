//! Live Feed Plugin
//!
//! Owns the feed connection for the lifetime of the app and wires the render
//! and status systems into `Update`.

use bevy::prelude::*;

use crate::feed::{FeedConfig, FeedConnection};
use crate::live_feed::style::FeedTheme;
use crate::live_feed::systems::*;

/// Bevy plugin for a live sentiment feed.
///
/// This plugin:
/// - Opens the feed connection on a dedicated thread
/// - Exposes `FeedStatus` and `FeedTheme` as resources
/// - Renders incoming messages into the matching `FeedList` each frame
/// - Shuts the connection down when the app exits
pub struct LiveFeedPlugin {
    config: FeedConfig,
}

impl LiveFeedPlugin {
    pub fn new(config: FeedConfig) -> Self {
        Self { config }
    }
}

impl Default for LiveFeedPlugin {
    fn default() -> Self {
        Self::new(FeedConfig::default())
    }
}

impl Plugin for LiveFeedPlugin {
    fn build(&self, app: &mut App) {
        log::info!("Building live feed plugin...");

        app.insert_resource(FeedSettings {
            container_id: self.config.container_id.clone(),
        })
        .insert_resource(FeedStatus {
            endpoint: self.config.endpoint.clone(),
            ..default()
        })
        .init_resource::<FeedTheme>();

        match FeedConnection::open(&self.config) {
            Ok((connection, events)) => {
                app.insert_resource(FeedConnectionResource(connection))
                    .insert_resource(FeedEventQueue(events));
            }
            Err(e) => {
                log::error!(
                    "[LiveFeed] Failed to open feed connection to {}: {}",
                    self.config.endpoint,
                    e
                );
            }
        }

        app.add_systems(
            Update,
            (process_feed_events, update_connection_indicator).chain(),
        )
        .add_systems(Last, close_feed_on_exit);

        log::info!("Live feed plugin configured");
    }
}

/// Stop the connection thread as soon as the app starts exiting. The resource
/// itself joins the thread when the world is dropped.
fn close_feed_on_exit(
    mut exits: MessageReader<AppExit>,
    connection: Option<Res<FeedConnectionResource>>,
) {
    if exits.read().next().is_none() {
        return;
    }

    if let Some(connection) = connection {
        log::info!("[LiveFeed] App exiting, closing {}", connection.endpoint());
        connection.shutdown();
    }
}
