use bevy::prelude::*;

use crate::feed::{EntryView, FeedEvent, FeedMessage};
use crate::live_feed::style::{
    AUTHOR_FONT_SIZE, BODY_FONT_SIZE, DETAIL_FONT_SIZE, FeedTheme, entry_node,
};
use crate::live_feed::systems::types::*;

/// Drain connection events, rendering each decoded message as the first child
/// of the feed list.
pub fn process_feed_events(
    mut commands: Commands,
    queue: Option<Res<FeedEventQueue>>,
    settings: Res<FeedSettings>,
    theme: Res<FeedTheme>,
    mut status: ResMut<FeedStatus>,
    lists: Query<(Entity, &FeedList)>,
) {
    let Some(queue) = queue else {
        return;
    };

    let list = lists
        .iter()
        .find(|(_, list)| list.id == settings.container_id)
        .map(|(entity, _)| entity);

    while let Some(event) = queue.0.try_recv() {
        match event {
            FeedEvent::State(state) => {
                status.state = state;
            }

            FeedEvent::Frame(frame) => {
                let Some(list) = list else {
                    log::warn!(
                        "[LiveFeed] No feed list with id '{}', dropping message",
                        settings.container_id
                    );
                    status.dropped += 1;
                    continue;
                };

                let message = match FeedMessage::decode(&frame) {
                    Ok(message) => message,
                    Err(e) => {
                        log::error!(
                            "[LiveFeed] Dropping message: {} ({})",
                            e,
                            frame.chars().take(100).collect::<String>()
                        );
                        status.dropped += 1;
                        continue;
                    }
                };

                let sequence = status.rendered;
                status.rendered += 1;

                let entry = spawn_entry(&mut commands, &theme, sequence, EntryView::from(message));
                commands.entity(list).insert_children(0, &[entry]);
            }
        }
    }
}

/// Spawn the node tree for one entry: author, body and sentiment lines.
fn spawn_entry(
    commands: &mut Commands,
    theme: &FeedTheme,
    sequence: u64,
    view: EntryView,
) -> Entity {
    log::debug!(
        "[LiveFeed] Rendering entry {}: {} by {}",
        sequence,
        view.class_name(),
        view.author
    );

    commands
        .spawn((
            entry_node(),
            BackgroundColor(theme.color_for(&view.label)),
            BorderColor::all(theme.border),
            FeedCategory(view.label.clone()),
            children![
                (
                    Text::new(view.author.clone()),
                    TextFont::from_font_size(AUTHOR_FONT_SIZE),
                    TextColor(theme.text),
                    EntryAuthor,
                ),
                (
                    Text::new(view.text.clone()),
                    TextFont::from_font_size(BODY_FONT_SIZE),
                    TextColor(theme.text),
                    EntryBody,
                ),
                (
                    Text::new(view.sentiment_line()),
                    TextFont::from_font_size(DETAIL_FONT_SIZE),
                    TextColor(theme.muted_text),
                    EntrySentiment,
                ),
            ],
            FeedEntry { sequence, view },
        ))
        .id()
}
