use bevy::prelude::*;

use crate::feed::ConnectionState;
use crate::live_feed::style::FeedTheme;
use crate::live_feed::systems::types::{ConnectionIndicator, FeedStatus};

/// Human-readable connection state for the indicator
pub fn status_line(status: &FeedStatus) -> String {
    match &status.state {
        ConnectionState::Connecting { attempt } => {
            format!("Connecting to {} (attempt {})", status.endpoint, attempt)
        }
        ConnectionState::Connected => format!("Connected to {}", status.endpoint),
        ConnectionState::Reconnecting { attempt, delay } => format!(
            "Disconnected, retrying in {:.1}s (attempt {})",
            delay.as_secs_f64(),
            attempt
        ),
        ConnectionState::Disconnected => "Disconnected".to_string(),
    }
}

/// Rewrite connection indicators when the feed status changes, and fill in
/// indicators spawned since the last run
pub fn update_connection_indicator(
    status: Res<FeedStatus>,
    theme: Res<FeedTheme>,
    mut indicators: Query<(Ref<ConnectionIndicator>, &mut Text, Option<&mut TextColor>)>,
) {
    let refresh_all = status.is_changed();
    let line = status_line(&status);
    let color = theme.state_color(&status.state);

    for (indicator, mut text, text_color) in &mut indicators {
        if !refresh_all && !indicator.is_added() {
            continue;
        }
        if text.0 != line {
            text.0 = line.clone();
        }
        if let Some(mut text_color) = text_color {
            text_color.0 = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn status(state: ConnectionState) -> FeedStatus {
        FeedStatus {
            endpoint: "ws://localhost:8765/".to_string(),
            state,
            ..default()
        }
    }

    #[test]
    fn test_status_line() {
        assert_eq!(
            status_line(&status(ConnectionState::Connecting { attempt: 1 })),
            "Connecting to ws://localhost:8765/ (attempt 1)"
        );
        assert_eq!(
            status_line(&status(ConnectionState::Connected)),
            "Connected to ws://localhost:8765/"
        );
        assert_eq!(
            status_line(&status(ConnectionState::Reconnecting {
                attempt: 2,
                delay: Duration::from_secs(1)
            })),
            "Disconnected, retrying in 1.0s (attempt 2)"
        );
        assert_eq!(
            status_line(&status(ConnectionState::Disconnected)),
            "Disconnected"
        );
    }

    #[test]
    fn test_indicator_follows_status() {
        let mut app = App::new();
        app.insert_resource(status(ConnectionState::Connecting { attempt: 1 }))
            .init_resource::<FeedTheme>()
            .add_systems(Update, update_connection_indicator);

        let indicator = app
            .world_mut()
            .spawn((Text::new(""), TextColor::default(), ConnectionIndicator))
            .id();
        let unrelated = app.world_mut().spawn(Text::new("title")).id();

        app.update();
        assert_eq!(
            app.world().get::<Text>(indicator).unwrap().0,
            "Connecting to ws://localhost:8765/ (attempt 1)"
        );

        app.world_mut().resource_mut::<FeedStatus>().state = ConnectionState::Connected;
        app.update();

        let theme = app.world().resource::<FeedTheme>().clone();
        assert_eq!(
            app.world().get::<Text>(indicator).unwrap().0,
            "Connected to ws://localhost:8765/"
        );
        assert_eq!(
            app.world().get::<TextColor>(indicator).unwrap().0,
            theme.connected
        );
        assert_eq!(app.world().get::<Text>(unrelated).unwrap().0, "title");
    }

    #[test]
    fn test_late_indicator_shows_current_status() {
        let mut app = App::new();
        app.insert_resource(status(ConnectionState::Connected))
            .init_resource::<FeedTheme>()
            .add_systems(Update, update_connection_indicator);

        app.update();
        app.update();

        let late = app
            .world_mut()
            .spawn((Text::new(""), TextColor::default(), ConnectionIndicator))
            .id();
        app.update();

        assert_eq!(
            app.world().get::<Text>(late).unwrap().0,
            "Connected to ws://localhost:8765/"
        );
    }
}
