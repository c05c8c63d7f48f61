use bevy::prelude::*;
use bevy_live_feed::{ConnectionIndicator, FeedConfig, FeedListBundle, LiveFeedPlugin};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Live sentiment feed viewer", long_about = None)]
struct Cli {
    /// WebSocket endpoint streaming sentiment results
    #[arg(long, env = "LIVE_FEED_ENDPOINT", default_value = bevy_live_feed::feed::DEFAULT_ENDPOINT)]
    endpoint: String,
}

fn main() {
    let cli = Cli::parse();

    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(LiveFeedPlugin::new(FeedConfig::new(cli.endpoint)))
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);

    // Status line on top, scrolling list of posts underneath
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            padding: UiRect::all(Val::Px(16.0)),
            row_gap: Val::Px(12.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("Starting..."),
                TextFont::from_font_size(14.0),
                TextColor::default(),
                ConnectionIndicator,
            ));

            parent.spawn(FeedListBundle::new(
                Node {
                    width: Val::Percent(100.0),
                    flex_grow: 1.0,
                    overflow: Overflow::scroll_y(),
                    ..default()
                },
                "posts",
            ));
        });
}
