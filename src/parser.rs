//! Parsing of raw round announcements from the source feed.
//!
//! Round texts are noisy and partially edited in place, so every accessor
//! here is total: a miss is an `Option`/empty result, never an error. Suit
//! detection runs over a fixed character table rather than a regex engine.

use crate::consts::{FINAL_MARKERS, PENDING_MARKER};
use crate::suits::Suit;

/// Extract the round number from the first case-insensitive `#N<digits>`
/// marker. Whitespace may separate the marker from the digits and a
/// trailing period is tolerated. `None` means the text is not a round
/// announcement.
pub fn extract_round_number(text: &str) -> Option<u64> {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '#' && matches!(chars.get(i + 1), Some('N' | 'n')) {
            let mut j = i + 2;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            let start = j;
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            if j > start {
                let digits: String = chars[start..j].iter().collect();
                return digits.parse().ok();
            }
        }
        i += 1;
    }
    None
}

/// Contents of every non-nested parenthesized span, in appearance order.
/// Empty parentheses yield an empty string element; position matters for
/// group indexing downstream.
pub fn extract_groups(text: &str) -> Vec<String> {
    let mut groups = Vec::new();
    let mut current: Option<String> = None;
    for c in text.chars() {
        match c {
            '(' => match current.as_mut() {
                None => current = Some(String::new()),
                Some(group) => group.push(c),
            },
            ')' => {
                if let Some(group) = current.take() {
                    groups.push(group);
                }
            }
            _ => {
                if let Some(group) = current.as_mut() {
                    group.push(c);
                }
            }
        }
    }
    groups
}

/// First suit token in a group, scanning left to right.
pub fn first_suit_in(group: &str) -> Option<Suit> {
    group.chars().find_map(Suit::from_char)
}

/// Whether any token in the group denotes `target`. All occurrences are
/// scanned, not just the first.
pub fn contains_suit(group: &str, target: Suit) -> bool {
    group.chars().any(|c| Suit::from_char(c) == Some(target))
}

/// Whether the text is a finalized round result. A pending marker anywhere
/// forces `false`; otherwise true iff a completion marker is present.
pub fn is_finalized(text: &str) -> bool {
    if text.contains(PENDING_MARKER) {
        return false;
    }
    FINAL_MARKERS.iter().any(|m| text.contains(*m))
}
