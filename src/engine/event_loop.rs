//! Event vocabulary and the single-owner processing loop.

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

use super::PredictionEngine;
use crate::outbound::PredictionPublisher;

/// Where a reset request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetSource {
    /// 2-hour interval timer.
    Periodic,
    /// Daily 00:59 feed-timezone timer.
    Daily,
    /// `/reset` admin command.
    Manual,
}

/// A text message lifted out of a transport update.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub chat_id: i64,
    /// Absent for channel posts.
    pub sender_id: Option<i64>,
    pub is_private: bool,
    pub text: String,
}

/// One unit of work for the engine. Everything that mutates state arrives
/// through this queue, including reset requests from the timers.
#[derive(Debug, Clone)]
pub enum Event {
    NewMessage(InboundMessage),
    EditedMessage(InboundMessage),
    Reset(ResetSource),
}

impl<P: PredictionPublisher> PredictionEngine<P> {
    /// Process events until every sender is dropped.
    pub async fn run(mut self, mut receiver: UnboundedReceiver<Event>) {
        info!(
            source_chat_id = self.config.source_chat_id,
            prediction_chat_id = self.config.prediction_chat_id,
            "Prediction engine started"
        );
        while let Some(event) = receiver.recv().await {
            self.handle_event(event).await;
        }
        info!("Event channel closed, stopping prediction engine");
    }

    /// Dispatch one event. Every path is total: misses and transport
    /// failures are absorbed as logged no-ops, so a bad event can never
    /// poison the loop.
    pub(crate) async fn handle_event(&mut self, event: Event) {
        match event {
            Event::NewMessage(msg) => {
                if msg.chat_id == self.config.source_chat_id {
                    self.forward_to_admin(&msg.text).await;
                    // Prediction first (does not wait for finalization),
                    // then verification on the same text.
                    self.process_prediction(&msg.text).await;
                    self.process_verification(&msg.text).await;
                } else if msg.is_private {
                    self.handle_command(&msg).await;
                }
            }
            Event::EditedMessage(msg) => {
                if msg.chat_id == self.config.source_chat_id {
                    self.process_verification(&msg.text).await;
                }
            }
            Event::Reset(source) => self.reset_and_notify(source).await,
        }
    }

    /// Full reset plus the best-effort admin notification.
    pub(crate) async fn reset_and_notify(&mut self, source: ResetSource) {
        info!(?source, "Reset triggered");
        let cleared = self.reset();
        self.publisher
            .notify_admin(&format!(
                "🔄 **Reset automatique effectué**\n\n{cleared} prédictions effacées."
            ))
            .await;
    }

    /// Passthrough copy of a source message to the admin, when enabled.
    async fn forward_to_admin(&self, text: &str) {
        if self.forwarding_enabled {
            self.publisher
                .notify_admin(&format!("📨 Message:\n\n{text}"))
                .await;
        }
    }
}
