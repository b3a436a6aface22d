//! The two processing paths over source-feed messages.
//!
//! The immediate path forecasts round N+1 from round N's announcement as
//! soon as the round number appears; the verification path waits for the
//! finalized result of a round and resolves the forecast made for it.

use chrono::Utc;
use tracing::{info, warn};

use super::{DedupLedger, PendingPrediction, PredictionEngine, PredictionStatus};
use crate::consts::PREDICTION_PREFIX;
use crate::outbound::{EditOutcome, PredictionPublisher};
use crate::suits::Suit;
use crate::{parser, transform};

impl<P: PredictionPublisher> PredictionEngine<P> {
    /// Immediate path. Runs at most once per round number, on new messages
    /// only: edits of an already-predicted round cannot change the
    /// prediction.
    pub(crate) async fn process_prediction(&mut self, text: &str) {
        let Some(round) = parser::extract_round_number(text) else {
            return;
        };
        self.current_round = round;

        if !self.ledger.record_predicted(round) {
            return;
        }

        let groups = parser::extract_groups(text);
        if groups.len() < 2 {
            info!(round, "Not enough groups for a prediction");
            return;
        }

        let Some(base_suit) = parser::first_suit_in(&groups[1]) else {
            return;
        };

        let target_round = round + 1;
        if self.pending.contains_key(&target_round) {
            info!(target_round, "Prediction already active");
            return;
        }

        let predicted = transform::predict(base_suit, round);
        info!(
            round,
            parity = transform::parity_label(round),
            base_suit = %base_suit,
            target_round,
            predicted_suit = %predicted,
            "New prediction"
        );
        self.send_prediction(target_round, predicted, round, base_suit)
            .await;
    }

    /// Publish and record a new pending prediction for `target_round`.
    async fn send_prediction(
        &mut self,
        target_round: u64,
        predicted_suit: Suit,
        base_round: u64,
        base_suit: Suit,
    ) {
        let text = pending_text(target_round, predicted_suit);
        let outbound = self.publisher.publish(&text).await.message_ref();
        if outbound.is_none() {
            warn!(
                target_round,
                "Prediction tracked locally with no published message"
            );
        }

        self.pending.insert(
            target_round,
            PendingPrediction {
                target_round,
                predicted_suit,
                base_round,
                base_suit,
                outbound,
                status: PredictionStatus::Pending,
                created_at: Utc::now(),
            },
        );
        info!(
            target_round,
            suit = %predicted_suit,
            base_round,
            "Prediction active"
        );
    }

    /// Verification path. Runs on new and edited messages, but only once a
    /// result is finalized; an edited-but-still-pending message is ignored
    /// every time until then.
    pub(crate) async fn process_verification(&mut self, text: &str) {
        if !parser::is_finalized(text) {
            return;
        }
        let Some(round) = parser::extract_round_number(text) else {
            return;
        };

        let fingerprint = DedupLedger::fingerprint(round, text);
        if !self.ledger.record_verified(fingerprint) {
            return;
        }

        let groups = parser::extract_groups(text);
        let Some(first_group) = groups.first() else {
            return;
        };

        let Some(prediction) = self.pending.get(&round) else {
            // A round with no associated forecast; nothing to verify.
            return;
        };
        let predicted_suit = prediction.predicted_suit;

        let status = if parser::contains_suit(first_group, predicted_suit) {
            info!(round, suit = %predicted_suit, "Predicted suit found in first group");
            PredictionStatus::Confirmed
        } else {
            info!(round, suit = %predicted_suit, "Predicted suit not found in first group");
            PredictionStatus::Refuted
        };
        self.resolve_prediction(round, status).await;
    }

    /// Flip the pending prediction for `round` to a terminal status, edit
    /// the published message when one exists, and drop the entry.
    async fn resolve_prediction(&mut self, round: u64, status: PredictionStatus) {
        let Some(mut prediction) = self.pending.remove(&round) else {
            return;
        };
        prediction.status = status;

        let text = resolution_text(&prediction);
        match prediction.outbound {
            Some(msg_ref) => {
                if self.publisher.edit(msg_ref, &text).await == EditOutcome::Edited {
                    info!(round, status = status.glyph(), "Prediction message updated");
                }
            }
            None => {
                info!(round, "No published message to update");
            }
        }
        info!(round, status = status.glyph(), "Prediction resolved");
    }
}

/// Outbound wording for a freshly published prediction.
fn pending_text(target_round: u64, suit: Suit) -> String {
    format!(
        "{PREDICTION_PREFIX}Game:{target_round}:{} statut :{}",
        suit.display(),
        PredictionStatus::Pending.glyph()
    )
}

/// Final wording for a resolved prediction message.
fn resolution_text(prediction: &PendingPrediction) -> String {
    let display = prediction.predicted_suit.display();
    match prediction.status {
        PredictionStatus::Confirmed => {
            let base_display = prediction.base_suit.display();
            let parity = transform::parity_label(prediction.base_round);
            format!(
                "{PREDICTION_PREFIX}Game:{}:{display} statut :✅\n\
                 ⚜🟩validé   premier enseigne du Banquier : {base_display} numero du jeu precedent {parity}\n\
                 {base_display}={display}",
                prediction.target_round
            )
        }
        _ => format!(
            "{PREDICTION_PREFIX}Game:{}:{display} statut :{}",
            prediction.target_round,
            prediction.status.glyph()
        ),
    }
}
