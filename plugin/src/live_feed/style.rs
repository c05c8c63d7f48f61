use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::feed::ConnectionState;

pub const AUTHOR_FONT_SIZE: f32 = 18.0;
pub const BODY_FONT_SIZE: f32 = 16.0;
pub const DETAIL_FONT_SIZE: f32 = 13.0;

/// Colours used to draw entries and the connection indicator.
///
/// Labels come from the producer and are not a closed set, so anything
/// without an explicit colour is drawn with `fallback`.
#[derive(Resource, Debug, Clone)]
pub struct FeedTheme {
    /// Entry background per label. Lookup is case-sensitive.
    pub labels: HashMap<String, Color>,
    pub fallback: Color,
    pub border: Color,
    pub text: Color,
    pub muted_text: Color,
    pub connected: Color,
    pub pending: Color,
    pub disconnected: Color,
}

impl Default for FeedTheme {
    fn default() -> Self {
        let mut labels = HashMap::default();
        labels.insert("positive".to_string(), Color::srgb_u8(46, 125, 50));
        labels.insert("negative".to_string(), Color::srgb_u8(198, 40, 40));
        labels.insert("neutral".to_string(), Color::srgb_u8(97, 97, 97));

        Self {
            labels,
            fallback: Color::srgb_u8(55, 71, 79),
            border: Color::srgb_u8(38, 50, 56),
            text: Color::WHITE,
            muted_text: Color::srgb(0.8, 0.8, 0.8),
            connected: Color::srgb_u8(129, 199, 132),
            pending: Color::srgb_u8(255, 183, 77),
            disconnected: Color::srgb_u8(229, 115, 115),
        }
    }
}

impl FeedTheme {
    /// Set the background for a label from a CSS-like colour string.
    /// Unparseable colours are logged and ignored.
    pub fn with_label_color(mut self, label: impl Into<String>, color: &str) -> Self {
        let label = label.into();
        match parse_color(color) {
            Some(color) => {
                self.labels.insert(label, color);
            }
            None => log::warn!("[LiveFeed] Ignoring color '{}' for label '{}'", color, label),
        }
        self
    }

    pub fn color_for(&self, label: &str) -> Color {
        self.labels.get(label).copied().unwrap_or(self.fallback)
    }

    pub fn state_color(&self, state: &ConnectionState) -> Color {
        match state {
            ConnectionState::Connected => self.connected,
            ConnectionState::Connecting { .. } | ConnectionState::Reconnecting { .. } => self.pending,
            ConnectionState::Disconnected => self.disconnected,
        }
    }
}

/// Layout of a single entry card
pub fn entry_node() -> Node {
    Node {
        flex_direction: FlexDirection::Column,
        padding: UiRect::all(Val::Px(10.0)),
        margin: UiRect::bottom(Val::Px(8.0)),
        border: UiRect::all(Val::Px(1.0)),
        row_gap: Val::Px(4.0),
        ..default()
    }
}

/// Parse a CSS color string to Bevy Color
/// Supports: a few names, "#f00", "#ff0000", "#ff000080", "rgb(255, 0, 0)", "rgba(255, 0, 0, 0.5)"
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim().to_lowercase();

    match value.as_str() {
        "transparent" => return Some(Color::NONE),
        "black" => return Some(Color::BLACK),
        "white" => return Some(Color::WHITE),
        "red" => return Some(Color::srgb(1.0, 0.0, 0.0)),
        "green" => return Some(Color::srgb(0.0, 0.5, 0.0)),
        "blue" => return Some(Color::srgb(0.0, 0.0, 1.0)),
        "orange" => return Some(Color::srgb(1.0, 0.65, 0.0)),
        "gray" | "grey" => return Some(Color::srgb(0.5, 0.5, 0.5)),
        _ => {}
    }

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex_color(hex);
    }

    if value.starts_with("rgb") {
        return parse_rgb_color(&value);
    }

    None
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }

    // Short forms double each digit: #f80 == #ff8800
    let expanded: String = match hex.len() {
        3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => hex.to_string(),
        _ => return None,
    };

    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    let r = channel(0)?;
    let g = channel(2)?;
    let b = channel(4)?;
    let a = if expanded.len() == 8 { channel(6)? } else { 255 };

    Some(Color::srgba_u8(r, g, b, a))
}

fn parse_rgb_color(value: &str) -> Option<Color> {
    let inner = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))?
        .strip_suffix(')')?;

    let parts: Vec<&str> = inner.split(',').map(|s| s.trim()).collect();
    if !(3..=4).contains(&parts.len()) {
        return None;
    }

    let r: f32 = parts[0].parse().ok()?;
    let g: f32 = parts[1].parse().ok()?;
    let b: f32 = parts[2].parse().ok()?;
    let a: f32 = match parts.get(3) {
        Some(a) => a.parse().ok()?,
        None => 1.0,
    };

    Some(Color::srgba(r / 255.0, g / 255.0, b / 255.0, a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("white"), Some(Color::WHITE));
        assert_eq!(parse_color("#ff0000"), Some(Color::srgba_u8(255, 0, 0, 255)));
        assert_eq!(parse_color("#f80"), parse_color("#ff8800"));
        assert_eq!(parse_color("#ff000080"), Some(Color::srgba_u8(255, 0, 0, 128)));
        assert!(parse_color("rgb(255, 0, 0)").is_some());
        assert!(parse_color("rgba(255, 0, 0, 0.5)").is_some());
    }

    #[test]
    fn test_parse_color_rejects_garbage() {
        assert!(parse_color("chartreuse-ish").is_none());
        assert!(parse_color("#12345").is_none());
        assert!(parse_color("#zzzzzz").is_none());
        assert!(parse_color("rgb(1, 2)").is_none());
    }

    #[test]
    fn test_theme_label_lookup() {
        let theme = FeedTheme::default();

        assert_eq!(theme.color_for("positive"), Color::srgb_u8(46, 125, 50));
        assert_eq!(theme.color_for("sarcastic"), theme.fallback);
        // Labels behave like class names: case matters.
        assert_eq!(theme.color_for("Positive"), theme.fallback);
    }

    #[test]
    fn test_theme_custom_label_color() {
        let theme = FeedTheme::default()
            .with_label_color("mixed", "#ff8800")
            .with_label_color("angry", "not a color");

        assert_eq!(theme.color_for("mixed"), Color::srgba_u8(255, 136, 0, 255));
        assert_eq!(theme.color_for("angry"), theme.fallback);
    }

    #[test]
    fn test_state_color() {
        let theme = FeedTheme::default();

        assert_eq!(theme.state_color(&ConnectionState::Connected), theme.connected);
        assert_eq!(
            theme.state_color(&ConnectionState::Connecting { attempt: 1 }),
            theme.pending
        );
        assert_eq!(
            theme.state_color(&ConnectionState::Disconnected),
            theme.disconnected
        );
    }
}
