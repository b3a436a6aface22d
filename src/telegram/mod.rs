//! Telegram Bot API transport: wire types, typed client, update poller.

mod bot_client;
mod poller;
pub mod types;

pub use bot_client::BotClient;
pub use poller::UpdatePoller;

/// Convert a configured channel identifier into canonical chat-id form.
///
/// Broadcast channels are addressed with a `-100` prefix on the wire. A
/// value already carrying the prefix passes through; a bare positive id of
/// at least 10 digits gets the prefix added; anything unparseable maps to 0
/// (rejected by startup validation).
pub fn normalize_channel_id(value: &str) -> i64 {
    let value = value.trim();
    if value.starts_with("-100") {
        return value.parse().unwrap_or(0);
    }
    match value.parse::<i64>() {
        Ok(id) if id > 0 && value.len() >= 10 => format!("-100{id}").parse().unwrap_or(0),
        Ok(id) => id,
        Err(_) => 0,
    }
}
