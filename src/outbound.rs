//! Outbound publishing seam for the prediction feed and admin channel.
//!
//! Publishing is best-effort with at-most-once semantics: failures surface
//! as outcome values, never as errors, so the engine can branch into its
//! degraded local-only path. Abstracts the transport to enable testing and
//! mocking.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::telegram::BotClient;

/// Opaque handle to a message previously placed in the output feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub chat_id: i64,
    pub message_id: i64,
}

/// Result of publishing a new message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Message is live in the output feed.
    Published(MessageRef),
    /// Send failed or the output channel is unavailable; proceed degraded.
    Failed,
}

impl PublishOutcome {
    pub fn message_ref(self) -> Option<MessageRef> {
        match self {
            PublishOutcome::Published(msg_ref) => Some(msg_ref),
            PublishOutcome::Failed => None,
        }
    }
}

/// Result of editing a previously published message in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Edited,
    Failed,
}

/// Trait for the output feed and admin notification collaborators.
#[async_trait]
pub trait PredictionPublisher: Send + Sync {
    /// Send a new message to the prediction channel. Failures are logged
    /// inside the implementation and surface only as `Failed`.
    async fn publish(&self, text: &str) -> PublishOutcome;

    /// Edit a previously published message in place.
    async fn edit(&self, msg_ref: MessageRef, text: &str) -> EditOutcome;

    /// Best-effort text send to an arbitrary chat (command replies).
    async fn send_to(&self, chat_id: i64, text: &str);

    /// Best-effort text send to the admin recipient.
    async fn notify_admin(&self, text: &str);
}

/// Publisher backed by the Telegram transport.
pub struct TelegramPublisher {
    client: Arc<BotClient>,
    prediction_chat_id: i64,
    admin_id: i64,
    /// Whether the prediction channel was reachable at startup.
    prediction_channel_ok: bool,
}

impl TelegramPublisher {
    pub fn new(
        client: Arc<BotClient>,
        prediction_chat_id: i64,
        admin_id: i64,
        prediction_channel_ok: bool,
    ) -> Self {
        Self {
            client,
            prediction_chat_id,
            admin_id,
            prediction_channel_ok,
        }
    }
}

#[async_trait]
impl PredictionPublisher for TelegramPublisher {
    async fn publish(&self, text: &str) -> PublishOutcome {
        if self.prediction_chat_id == 0 || !self.prediction_channel_ok {
            warn!("Prediction channel not accessible, skipping publish");
            return PublishOutcome::Failed;
        }
        match self.client.send_message(self.prediction_chat_id, text).await {
            Ok(msg) => {
                info!(message_id = msg.message_id, "Prediction published");
                PublishOutcome::Published(MessageRef {
                    chat_id: self.prediction_chat_id,
                    message_id: msg.message_id,
                })
            }
            Err(e) => {
                error!(error = %e, "Failed to publish prediction");
                PublishOutcome::Failed
            }
        }
    }

    async fn edit(&self, msg_ref: MessageRef, text: &str) -> EditOutcome {
        match self
            .client
            .edit_message_text(msg_ref.chat_id, msg_ref.message_id, text)
            .await
        {
            Ok(_) => EditOutcome::Edited,
            Err(e) => {
                error!(
                    error = %e,
                    message_id = msg_ref.message_id,
                    "Failed to edit prediction message"
                );
                EditOutcome::Failed
            }
        }
    }

    async fn send_to(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.client.send_message(chat_id, text).await {
            error!(error = %e, chat_id, "Failed to send message");
        }
    }

    async fn notify_admin(&self, text: &str) {
        if self.admin_id == 0 {
            return;
        }
        self.send_to(self.admin_id, text).await;
    }
}
