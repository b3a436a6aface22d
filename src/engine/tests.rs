//! Engine scenario tests driven through the event interface with a
//! recording publisher.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Event, InboundMessage, PredictionEngine, PredictionStatus, ResetSource};
use crate::outbound::{EditOutcome, MessageRef, PredictionPublisher, PublishOutcome};
use crate::suits::Suit;
use crate::EngineConfig;

const SOURCE: i64 = -1002682552255;
const PREDICTION: i64 = -1003343276131;
const ADMIN: i64 = 4242;

#[derive(Default)]
struct MockPublisher {
    published: Mutex<Vec<String>>,
    edits: Mutex<Vec<(MessageRef, String)>>,
    sends: Mutex<Vec<(i64, String)>>,
    admin_notes: Mutex<Vec<String>>,
    fail_publish: AtomicBool,
    next_message_id: AtomicI64,
}

impl MockPublisher {
    fn failing() -> Self {
        let publisher = Self::default();
        publisher.fail_publish.store(true, Ordering::SeqCst);
        publisher
    }

    fn published(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }

    fn edits(&self) -> Vec<(MessageRef, String)> {
        self.edits.lock().unwrap().clone()
    }

    fn sends(&self) -> Vec<(i64, String)> {
        self.sends.lock().unwrap().clone()
    }

    fn admin_notes(&self) -> Vec<String> {
        self.admin_notes.lock().unwrap().clone()
    }
}

#[async_trait]
impl PredictionPublisher for MockPublisher {
    async fn publish(&self, text: &str) -> PublishOutcome {
        if self.fail_publish.load(Ordering::SeqCst) {
            return PublishOutcome::Failed;
        }
        self.published.lock().unwrap().push(text.to_string());
        let message_id = self.next_message_id.fetch_add(1, Ordering::SeqCst) + 1;
        PublishOutcome::Published(MessageRef {
            chat_id: PREDICTION,
            message_id,
        })
    }

    async fn edit(&self, msg_ref: MessageRef, text: &str) -> EditOutcome {
        self.edits.lock().unwrap().push((msg_ref, text.to_string()));
        EditOutcome::Edited
    }

    async fn send_to(&self, chat_id: i64, text: &str) {
        self.sends.lock().unwrap().push((chat_id, text.to_string()));
    }

    async fn notify_admin(&self, text: &str) {
        self.admin_notes.lock().unwrap().push(text.to_string());
    }
}

fn config() -> EngineConfig {
    EngineConfig {
        source_chat_id: SOURCE,
        prediction_chat_id: PREDICTION,
        admin_id: ADMIN,
        forward_to_admin: false,
        source_channel_ok: true,
        prediction_channel_ok: true,
    }
}

fn engine() -> PredictionEngine<MockPublisher> {
    PredictionEngine::new(config(), MockPublisher::default())
}

fn src_new(text: &str) -> Event {
    Event::NewMessage(InboundMessage {
        chat_id: SOURCE,
        sender_id: None,
        is_private: false,
        text: text.to_string(),
    })
}

fn src_edit(text: &str) -> Event {
    Event::EditedMessage(InboundMessage {
        chat_id: SOURCE,
        sender_id: None,
        is_private: false,
        text: text.to_string(),
    })
}

fn private(sender_id: i64, text: &str) -> Event {
    Event::NewMessage(InboundMessage {
        chat_id: sender_id,
        sender_id: Some(sender_id),
        is_private: true,
        text: text.to_string(),
    })
}

const ROUND_1219: &str = "Baccarat #N1219. (Banker ♠) (Player ♥️)";

#[tokio::test]
async fn test_prediction_from_second_group() {
    let mut engine = engine();
    engine.handle_event(src_new(ROUND_1219)).await;

    assert_eq!(engine.current_round(), 1219);
    assert_eq!(engine.pending_count(), 1);
    let prediction = engine.pending().next().unwrap();
    assert_eq!(prediction.target_round, 1220);
    assert_eq!(prediction.predicted_suit, Suit::Spade);
    assert_eq!(prediction.base_round, 1219);
    assert_eq!(prediction.base_suit, Suit::Heart);
    assert_eq!(prediction.status, PredictionStatus::Pending);
    assert!(prediction.outbound.is_some());

    assert_eq!(
        engine.publisher().published(),
        vec!["📲Game:1220:♠️ statut :⏳".to_string()]
    );
}

#[tokio::test]
async fn test_confirmation_when_suit_in_first_group() {
    let mut engine = engine();
    engine.handle_event(src_new(ROUND_1219)).await;
    engine
        .handle_event(src_new("#N1220 ✅ (Banker ♠ ♦) (Player ♣)"))
        .await;

    assert!(!engine.pending.contains_key(&1220));
    let edits = engine.publisher().edits();
    assert_eq!(edits.len(), 1);
    assert_eq!(
        edits[0].1,
        "📲Game:1220:♠️ statut :✅\n\
         ⚜🟩validé   premier enseigne du Banquier : ❤️ numero du jeu precedent Impaire\n\
         ❤️=♠️"
    );
}

#[tokio::test]
async fn test_refutation_when_suit_absent_from_first_group() {
    let mut engine = engine();
    engine.handle_event(src_new(ROUND_1219)).await;
    engine
        .handle_event(src_new("#N1220 ✅ (Banker ♦ ♥) (Player ♣)"))
        .await;

    assert!(!engine.pending.contains_key(&1220));
    let edits = engine.publisher().edits();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].1, "📲Game:1220:♠️ statut :❌");
}

#[tokio::test]
async fn test_pending_marker_blocks_verification() {
    let mut engine = engine();
    engine.handle_event(src_new(ROUND_1219)).await;
    engine
        .handle_event(src_edit("#N1220 ⏰ ✅ (Banker ♠) (Player ♣)"))
        .await;

    // Still open: the pending marker wins over the completion marker.
    assert!(engine.pending.contains_key(&1220));
    assert!(engine.publisher().edits().is_empty());
}

#[tokio::test]
async fn test_redelivered_finalized_text_is_deduplicated() {
    let mut engine = engine();
    engine.handle_event(src_new(ROUND_1219)).await;

    let finalized = "#N1220 ✅ (Banker ♠ ♦) (Player ♣)";
    engine.handle_event(src_new(finalized)).await;
    engine.handle_event(src_edit(finalized)).await;

    assert_eq!(engine.publisher().edits().len(), 1);
}

#[tokio::test]
async fn test_immediate_path_is_idempotent_per_round() {
    let mut engine = engine();
    engine.handle_event(src_new(ROUND_1219)).await;
    engine.handle_event(src_new(ROUND_1219)).await;

    assert_eq!(engine.pending_count(), 1);
    assert_eq!(engine.publisher().published().len(), 1);
}

#[tokio::test]
async fn test_first_prediction_wins_for_a_target_round() {
    let mut engine = engine();
    engine
        .handle_event(src_new("#N10 (Banker ♠) (Player ♥)"))
        .await;
    assert_eq!(engine.pending[&11].base_suit, Suit::Heart);

    // Push the round ledger past its cap so round 10 is trimmed out, then
    // re-deliver it with a different second group.
    for round in 11..=511u64 {
        engine.handle_event(src_new(&format!("#N{round}."))).await;
    }
    engine
        .handle_event(src_new("#N10 (Banker ♠) (Player ♦)"))
        .await;

    assert_eq!(engine.publisher().published().len(), 1);
    assert_eq!(engine.pending[&11].base_suit, Suit::Heart);
}

#[tokio::test]
async fn test_message_without_round_marker_ignored() {
    let mut engine = engine();
    engine
        .handle_event(src_new("tirage en cours (Banker ♠) (Player ♥)"))
        .await;
    assert_eq!(engine.pending_count(), 0);
    assert_eq!(engine.current_round(), 0);
}

#[tokio::test]
async fn test_too_few_groups_is_a_no_op() {
    let mut engine = engine();
    engine.handle_event(src_new("#N1219 (Banker ♠)")).await;
    assert_eq!(engine.pending_count(), 0);
    // The round still counts as processed.
    assert_eq!(engine.ledger.predicted_len(), 1);
}

#[tokio::test]
async fn test_second_group_without_suit_is_a_no_op() {
    let mut engine = engine();
    engine
        .handle_event(src_new("#N1219 (Banker ♠) (Player 9 8)"))
        .await;
    assert_eq!(engine.pending_count(), 0);
}

#[tokio::test]
async fn test_verification_without_pending_entry_is_a_no_op() {
    let mut engine = engine();
    engine
        .handle_event(src_new("#N500 ✅ (Banker ♠) (Player ♥)"))
        .await;
    // The immediate path produced a forecast for 501, but nothing was
    // resolved and nothing edited.
    assert!(engine.publisher().edits().is_empty());
}

#[tokio::test]
async fn test_messages_from_other_chats_ignored() {
    let mut engine = engine();
    engine
        .handle_event(Event::NewMessage(InboundMessage {
            chat_id: -100999,
            sender_id: None,
            is_private: false,
            text: ROUND_1219.to_string(),
        }))
        .await;
    assert_eq!(engine.pending_count(), 0);
}

#[tokio::test]
async fn test_reset_clears_all_state() {
    let mut engine = engine();
    engine.handle_event(src_new(ROUND_1219)).await;
    engine
        .handle_event(src_edit("#N1100 ✅ (Banker ♣) (x)"))
        .await;
    assert!(engine.pending_count() > 0);

    engine.handle_event(Event::Reset(ResetSource::Periodic)).await;

    assert_eq!(engine.pending_count(), 0);
    assert_eq!(engine.current_round(), 0);
    assert_eq!(engine.ledger.predicted_len(), 0);
    assert_eq!(engine.ledger.verified_len(), 0);
    let notes = engine.publisher().admin_notes();
    assert_eq!(notes.len(), 1);
    assert!(notes[0].contains("1 prédictions effacées"));
}

#[tokio::test]
async fn test_failed_publish_still_tracked_and_resolved_locally() {
    let mut engine = PredictionEngine::new(config(), MockPublisher::failing());
    engine.handle_event(src_new(ROUND_1219)).await;

    let prediction = engine.pending().next().unwrap();
    assert_eq!(prediction.target_round, 1220);
    assert!(prediction.outbound.is_none());

    engine
        .handle_event(src_edit("#N1220 ✅ (Banker ♠) (Player ♣)"))
        .await;

    // Resolved locally; no message existed to edit.
    assert_eq!(engine.pending_count(), 0);
    assert!(engine.publisher().edits().is_empty());
}

#[tokio::test]
async fn test_non_admin_commands_refused() {
    let mut engine = engine();
    engine.handle_event(private(777, "/status")).await;

    let sends = engine.publisher().sends();
    assert_eq!(sends.len(), 1);
    assert_eq!(sends[0].0, 777);
    assert_eq!(sends[0].1, "Commande réservée à l'administrateur");
}

#[tokio::test]
async fn test_admin_status_lists_pending_predictions() {
    let mut engine = engine();
    engine.handle_event(src_new(ROUND_1219)).await;
    engine.handle_event(private(ADMIN, "/status")).await;

    let sends = engine.publisher().sends();
    assert_eq!(sends.len(), 1);
    assert!(sends[0].1.contains("🎮 Jeu actuel: #1219"));
    assert!(sends[0].1.contains("• Jeu #1220: ♠️ - Statut: ⏳"));
}

#[tokio::test]
async fn test_admin_manual_reset() {
    let mut engine = engine();
    engine.handle_event(src_new(ROUND_1219)).await;
    engine.handle_event(private(ADMIN, "/reset")).await;

    assert_eq!(engine.pending_count(), 0);
    let sends = engine.publisher().sends();
    assert!(sends.iter().any(|(_, text)| text.contains("Reset manuel")));
}

#[tokio::test]
async fn test_forwarding_toggle() {
    let mut engine = engine();
    // Off by default in this config: nothing forwarded.
    engine.handle_event(src_new("#Nx not a round")).await;
    assert!(engine.publisher().admin_notes().is_empty());

    engine.handle_event(private(ADMIN, "/transfert")).await;
    engine.handle_event(src_new("hello feed")).await;

    let notes = engine.publisher().admin_notes();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0], "📨 Message:\n\nhello feed");

    engine.handle_event(private(ADMIN, "/stoptransfert")).await;
    engine.handle_event(src_new("more feed")).await;
    assert_eq!(engine.publisher().admin_notes().len(), 1);
}

#[tokio::test]
async fn test_help_available_to_everyone() {
    let mut engine = engine();
    engine.handle_event(private(777, "/help")).await;

    let sends = engine.publisher().sends();
    assert_eq!(sends.len(), 1);
    assert!(sends[0].1.contains("Aide - Bot de Prédiction Baccarat"));
}

#[tokio::test]
async fn test_command_with_bot_suffix() {
    let mut engine = engine();
    engine.handle_event(private(ADMIN, "/status@PredictorBot")).await;

    let sends = engine.publisher().sends();
    assert_eq!(sends.len(), 1);
    assert!(sends[0].1.contains("État des prédictions"));
}

#[tokio::test]
async fn test_debug_reports_channel_access() {
    let mut engine = engine();
    engine.handle_event(private(ADMIN, "/debug")).await;

    let sends = engine.publisher().sends();
    assert_eq!(sends.len(), 1);
    assert!(sends[0].1.contains("• Canal source: ✅ OK"));
    assert!(sends[0].1.contains(&format!("• Source Channel: {SOURCE}")));
}
