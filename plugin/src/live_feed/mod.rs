//! # Live Feed Plugin for Bevy
//!
//! Connects to a WebSocket endpoint that streams sentiment-analysis results
//! and renders each result as a new entry at the top of a Bevy UI list.
//!
//! ## Example
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_live_feed::{ConnectionIndicator, FeedConfig, FeedListBundle, LiveFeedPlugin};
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(LiveFeedPlugin::new(FeedConfig::new("ws://localhost:8765")))
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands) {
//!     commands.spawn(Camera2d);
//!     commands.spawn((Text::new(""), ConnectionIndicator));
//!
//!     // Entries are inserted into the list whose id matches the config ("posts")
//!     commands.spawn(FeedListBundle::new(
//!         Node {
//!             width: Val::Percent(100.0),
//!             ..default()
//!         },
//!         "posts",
//!     ));
//! }
//! ```
pub mod plugin;

mod style;
mod systems;

pub use plugin::LiveFeedPlugin;
pub use style::*;
pub use systems::*;
