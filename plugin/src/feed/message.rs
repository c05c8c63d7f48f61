//! Wire schema for sentiment results and the view model rendered per entry.

use serde::Deserialize;

use crate::feed::error::Result;

/// A single sentiment result as sent by the producer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedMessage {
    pub post: Post,
    pub sentiment: Sentiment,
}

/// The analysed post. The producer forwards whole dataset rows here, so
/// anything beyond `author` and `text` is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Post {
    pub author: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Sentiment {
    /// Category chosen by the producer. Not a closed set.
    pub label: String,
    pub score: f64,
}

impl FeedMessage {
    /// Decode one text frame.
    pub fn decode(frame: &str) -> Result<Self> {
        Ok(serde_json::from_str(frame)?)
    }
}

/// Everything needed to draw one entry, already formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryView {
    pub author: String,
    pub text: String,
    pub label: String,
    pub score: String,
}

impl EntryView {
    /// Class list the entry would carry on a styled page: `post <label>`.
    pub fn class_name(&self) -> String {
        format!("post {}", self.label)
    }

    /// The summary line shown under the post body.
    pub fn sentiment_line(&self) -> String {
        format!("Sentiment: {} ({})", self.label, self.score)
    }
}

impl From<FeedMessage> for EntryView {
    fn from(message: FeedMessage) -> Self {
        Self {
            score: format_score(message.sentiment.score),
            author: message.post.author,
            text: message.post.text,
            label: message.sentiment.label,
        }
    }
}

/// Format a score with two decimals, rounding exact ties away from zero.
///
/// `{:.2}` already rounds on the exact binary value, which settles every
/// case except values that sit exactly on a half (0.125, 0.375, ...). Those
/// it rounds to even, so they are detected and rounded up in magnitude.
pub fn format_score(score: f64) -> String {
    if !score.is_finite() {
        return format!("{:.2}", score);
    }

    if is_exact_tie(score) {
        let rounded = (score * 100.0).round() / 100.0;
        return format!("{:.2}", rounded);
    }

    format!("{:.2}", score)
}

/// True when the exact decimal expansion is `d.dd5` followed only by zeros.
fn is_exact_tie(score: f64) -> bool {
    // Any finite f64 that is not an exact tie differs from one well before
    // the 32nd decimal place.
    let exact = format!("{:.32}", score.abs());
    let Some((_, fraction)) = exact.split_once('.') else {
        return false;
    };

    let digits = fraction.as_bytes();
    digits.get(2) == Some(&b'5') && digits[3..].iter().all(|d| *d == b'0')
}
