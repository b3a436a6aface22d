//! Prediction engine: the single owner of all mutable bot state.
//!
//! The engine runs as one event-loop task; every mutation (both processing
//! paths, admin commands, resets) happens inline in that task, so state
//! needs no lock at all. Collaborators feed it through an mpsc channel.

mod commands;
mod event_loop;
mod handlers;
mod ledger;
mod reset;
#[cfg(test)]
mod tests;

pub use event_loop::{Event, InboundMessage, ResetSource};
pub use ledger::DedupLedger;
pub use reset::spawn_reset_timers;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::outbound::{MessageRef, PredictionPublisher};
use crate::suits::Suit;

/// Status of a tracked prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionStatus {
    Pending,
    Confirmed,
    Refuted,
}

impl PredictionStatus {
    /// Status glyph used in outbound message templates.
    pub fn glyph(self) -> &'static str {
        match self {
            PredictionStatus::Pending => "⏳",
            PredictionStatus::Confirmed => "✅",
            PredictionStatus::Refuted => "❌",
        }
    }
}

/// An open forecast for a specific future round.
#[derive(Debug, Clone)]
pub struct PendingPrediction {
    /// Round this prediction is for (base round + 1). Unique key.
    pub target_round: u64,
    pub predicted_suit: Suit,
    /// Round and suit the prediction was derived from (audit/display).
    pub base_round: u64,
    pub base_suit: Suit,
    /// Handle to the published message; `None` when the publish failed and
    /// only the local record exists.
    pub outbound: Option<MessageRef>,
    pub status: PredictionStatus,
    pub created_at: DateTime<Utc>,
}

/// Engine configuration: chat identities and feature flags.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Source channel watched for round announcements.
    pub source_chat_id: i64,
    /// Prediction channel published to (0 disables publishing).
    pub prediction_chat_id: i64,
    /// Admin user for commands and notifications (0 disables).
    pub admin_id: i64,
    /// Whether passthrough forwarding to the admin starts enabled.
    pub forward_to_admin: bool,
    /// Channel access established at startup (advisory, shown by /debug).
    pub source_channel_ok: bool,
    pub prediction_channel_ok: bool,
}

pub struct PredictionEngine<P: PredictionPublisher> {
    config: EngineConfig,
    publisher: P,
    /// Open forecasts keyed by target round.
    pending: BTreeMap<u64, PendingPrediction>,
    /// Identity sets guarding both processing paths.
    ledger: DedupLedger,
    /// Last round number observed. Display only.
    current_round: u64,
    /// Passthrough forwarding flag, toggled at runtime.
    forwarding_enabled: bool,
}

impl<P: PredictionPublisher> PredictionEngine<P> {
    pub fn new(config: EngineConfig, publisher: P) -> Self {
        let forwarding_enabled = config.forward_to_admin;
        Self {
            config,
            publisher,
            pending: BTreeMap::new(),
            ledger: DedupLedger::new(),
            current_round: 0,
            forwarding_enabled,
        }
    }

    /// Clear the pending set, both ledgers and the round counter. Returns
    /// the number of predictions dropped. Idempotent.
    pub fn reset(&mut self) -> usize {
        let cleared = self.pending.len();
        self.pending.clear();
        self.ledger.clear();
        self.current_round = 0;
        info!(cleared, "State reset complete");
        cleared
    }

    pub fn current_round(&self) -> u64 {
        self.current_round
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Open forecasts in target-round order.
    pub fn pending(&self) -> impl Iterator<Item = &PendingPrediction> {
        self.pending.values()
    }

    #[cfg(test)]
    pub(crate) fn publisher(&self) -> &P {
        &self.publisher
    }
}
