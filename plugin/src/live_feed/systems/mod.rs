mod render;
mod status;
mod types;

pub use render::process_feed_events;
pub use status::{status_line, update_connection_indicator};
pub use types::*;
