//! Bounded identity sets preventing reprocessing of rounds and finalized
//! result messages.

use std::collections::{BTreeSet, HashSet};

use crate::consts::{
    FINGERPRINT_CHARS, PREDICTED_ROUNDS_CAP, PREDICTED_ROUNDS_TRIM, VERIFIED_FINGERPRINTS_CAP,
};

/// Two dedup sets with deliberately different bounding policies: the round
/// set keeps a rolling window trimmed by numeric value, the fingerprint set
/// is dropped wholesale past its cap.
#[derive(Debug, Default)]
pub struct DedupLedger {
    predicted_rounds: BTreeSet<u64>,
    verified_fingerprints: HashSet<String>,
}

impl DedupLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the immediate path ran for `round`. Returns `false` if
    /// it had already run (idempotency guard).
    pub fn record_predicted(&mut self, round: u64) -> bool {
        if !self.predicted_rounds.insert(round) {
            return false;
        }
        if self.predicted_rounds.len() > PREDICTED_ROUNDS_CAP {
            // Trim by numeric value, not arrival order.
            let split_key = self
                .predicted_rounds
                .iter()
                .nth(PREDICTED_ROUNDS_TRIM)
                .copied();
            if let Some(split_key) = split_key {
                let kept = self.predicted_rounds.split_off(&split_key);
                self.predicted_rounds = kept;
            }
        }
        true
    }

    /// Identity fingerprint of a finalized result message: round number
    /// plus a bounded character prefix of the text.
    pub fn fingerprint(round: u64, text: &str) -> String {
        let prefix: String = text.chars().take(FINGERPRINT_CHARS).collect();
        format!("{round}_{prefix}")
    }

    /// Record a verification fingerprint. Returns `false` when it was
    /// already present.
    pub fn record_verified(&mut self, fingerprint: String) -> bool {
        if self.verified_fingerprints.contains(&fingerprint) {
            return false;
        }
        self.verified_fingerprints.insert(fingerprint);
        if self.verified_fingerprints.len() > VERIFIED_FINGERPRINTS_CAP {
            // Coarser policy than the round set: drop everything.
            self.verified_fingerprints.clear();
        }
        true
    }

    pub fn predicted_len(&self) -> usize {
        self.predicted_rounds.len()
    }

    pub fn verified_len(&self) -> usize {
        self.verified_fingerprints.len()
    }

    pub fn clear(&mut self) {
        self.predicted_rounds.clear();
        self.verified_fingerprints.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicted_round_recorded_once() {
        let mut ledger = DedupLedger::new();
        assert!(ledger.record_predicted(1219));
        assert!(!ledger.record_predicted(1219));
        assert_eq!(ledger.predicted_len(), 1);
    }

    #[test]
    fn test_predicted_rounds_trim_drops_smallest() {
        let mut ledger = DedupLedger::new();
        for round in 1..=501 {
            ledger.record_predicted(round);
        }
        // 501 entries exceeded the cap: the 250 smallest are gone.
        assert_eq!(ledger.predicted_len(), 251);
        assert!(!ledger.record_predicted(251));
        assert!(ledger.record_predicted(100));
    }

    #[test]
    fn test_trim_is_by_value_not_arrival() {
        let mut ledger = DedupLedger::new();
        // A very recent but numerically small round is evicted by the trim.
        ledger.record_predicted(1);
        for round in 1000..1500 {
            ledger.record_predicted(round);
        }
        assert!(ledger.record_predicted(1));
    }

    #[test]
    fn test_fingerprint_truncates_by_characters() {
        let text: String = "♠️".repeat(200);
        let fp = DedupLedger::fingerprint(7, &text);
        assert_eq!(fp.chars().count(), 2 + 80);
        assert!(fp.starts_with("7_♠"));
    }

    #[test]
    fn test_fingerprint_distinguishes_rounds() {
        let a = DedupLedger::fingerprint(1, "same text");
        let b = DedupLedger::fingerprint(2, "same text");
        assert_ne!(a, b);
    }

    #[test]
    fn test_verified_cleared_past_cap() {
        let mut ledger = DedupLedger::new();
        for i in 0..=500 {
            assert!(ledger.record_verified(format!("{i}_text")));
        }
        assert_eq!(ledger.verified_len(), 0);
        // A previously seen fingerprint is accepted again after the drop.
        assert!(ledger.record_verified("0_text".to_string()));
    }

    #[test]
    fn test_verified_dedup() {
        let mut ledger = DedupLedger::new();
        assert!(ledger.record_verified("1220_#N1220 ✅".to_string()));
        assert!(!ledger.record_verified("1220_#N1220 ✅".to_string()));
    }

    #[test]
    fn test_clear_empties_both_sets() {
        let mut ledger = DedupLedger::new();
        ledger.record_predicted(9);
        ledger.record_verified("9_x".to_string());
        ledger.clear();
        assert_eq!(ledger.predicted_len(), 0);
        assert_eq!(ledger.verified_len(), 0);
    }
}
