//! Long-polling bridge from the Bot API to the engine's event queue.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::error::SendError;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::engine::{Event, InboundMessage};
use crate::telegram::types::{Message, Update};
use crate::telegram::BotClient;

/// Server-side long-poll wait per getUpdates call.
const POLL_TIMEOUT_SECS: u64 = 30;

/// Initial delay before retrying a failed poll.
const INITIAL_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Maximum delay between poll retries.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Pulls updates from the Bot API and feeds them into the engine channel.
/// Chat filtering happens in the engine; the poller only lifts updates into
/// events.
pub struct UpdatePoller {
    client: Arc<BotClient>,
    sender: UnboundedSender<Event>,
}

impl UpdatePoller {
    pub fn new(client: Arc<BotClient>, sender: UnboundedSender<Event>) -> Self {
        Self { client, sender }
    }

    /// Poll until the engine side of the channel closes. Transient API
    /// failures back off exponentially and reset on the first success.
    pub async fn run(self) {
        let mut offset: Option<i64> = None;
        let mut retry_delay = INITIAL_RETRY_DELAY;

        info!("Update poller started");
        loop {
            match self.client.get_updates(offset, POLL_TIMEOUT_SECS).await {
                Ok(updates) => {
                    retry_delay = INITIAL_RETRY_DELAY;
                    for update in updates {
                        offset = Some(update.update_id + 1);
                        if self.dispatch(update).is_err() {
                            info!("Engine channel closed, stopping update poller");
                            return;
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        retry_in_secs = retry_delay.as_secs(),
                        "getUpdates failed, backing off"
                    );
                    tokio::time::sleep(retry_delay).await;
                    retry_delay = (retry_delay * 2).min(MAX_RETRY_DELAY);
                }
            }
        }
    }

    fn dispatch(&self, update: Update) -> Result<(), SendError<Event>> {
        if let Some(event) = classify(update) {
            self.sender.send(event)?;
        }
        Ok(())
    }
}

/// Lift an update into an engine event. Updates without text (media,
/// service messages) carry nothing to parse and are dropped.
fn classify(update: Update) -> Option<Event> {
    if let Some(msg) = update.message {
        return inbound(msg).map(Event::NewMessage);
    }
    if let Some(msg) = update.channel_post {
        return inbound(msg).map(Event::NewMessage);
    }
    if let Some(msg) = update.edited_message {
        return inbound(msg).map(Event::EditedMessage);
    }
    if let Some(msg) = update.edited_channel_post {
        return inbound(msg).map(Event::EditedMessage);
    }
    debug!(update_id = update.update_id, "Update carried no message payload");
    None
}

fn inbound(msg: Message) -> Option<InboundMessage> {
    let text = msg.text?;
    Some(InboundMessage {
        chat_id: msg.chat.id,
        sender_id: msg.from.map(|u| u.id),
        is_private: msg.chat.is_private(),
        text,
    })
}
