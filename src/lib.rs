#![deny(unreachable_pub)]

// Core modules
mod consts;
mod errors;
mod prelude;
mod req;

// Domain modules
pub mod parser;
pub mod suits;
pub mod transform;

// Feature modules
pub mod engine;
mod outbound;
pub mod telegram;

// Re-exports
pub use consts::{
    FINGERPRINT_CHARS, PERIODIC_RESET_INTERVAL, PREDICTED_ROUNDS_CAP, PREDICTED_ROUNDS_TRIM,
    TELEGRAM_API_URL, VERIFIED_FINGERPRINTS_CAP,
};
pub use engine::{
    spawn_reset_timers, DedupLedger, EngineConfig, Event, InboundMessage, PendingPrediction,
    PredictionEngine, PredictionStatus, ResetSource,
};
pub use errors::Error;
pub use outbound::{
    EditOutcome, MessageRef, PredictionPublisher, PublishOutcome, TelegramPublisher,
};
pub use suits::Suit;
pub use telegram::{normalize_channel_id, BotClient, UpdatePoller};
