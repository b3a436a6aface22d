//! Parity-selected suit transform for next-round predictions.

use crate::suits::Suit;

/// Predicted suit for the round after `base_round`, derived from the base
/// suit and the parity of the base round number.
///
/// Odd base rounds:  ♠→♥, ♣→♦, ♦→♣, ♥→♠
/// Even base rounds: ♠→♣, ♣→♠, ♦→♥, ♥→♦
///
/// Both tables are fixed-point-free bijections over the four suits.
pub fn predict(base: Suit, base_round: u64) -> Suit {
    if base_round % 2 != 0 {
        match base {
            Suit::Spade => Suit::Heart,
            Suit::Club => Suit::Diamond,
            Suit::Diamond => Suit::Club,
            Suit::Heart => Suit::Spade,
        }
    } else {
        match base {
            Suit::Spade => Suit::Club,
            Suit::Club => Suit::Spade,
            Suit::Diamond => Suit::Heart,
            Suit::Heart => Suit::Diamond,
        }
    }
}

/// Parity label used in resolved-message wording.
pub fn parity_label(round: u64) -> &'static str {
    if round % 2 != 0 {
        "Impaire"
    } else {
        "Paire"
    }
}
