//! Canonical card-suit symbols and their textual variants.
//!
//! The source feed encodes suits inconsistently: bare glyphs (`♠`), glyphs
//! followed by the emoji variation selector (`♠️`), and for hearts the red
//! heart emoji (`❤`, `❤️`). Everything downstream of the parser works on the
//! canonical enum.

use std::fmt;

/// Emoji variation selector (U+FE0F) that may trail a suit glyph.
pub(crate) const VARIATION_SELECTOR: char = '\u{FE0F}';

/// The four canonical suits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Spade,
    Heart,
    Diamond,
    Club,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spade, Suit::Heart, Suit::Diamond, Suit::Club];

    /// Canonical single-glyph form.
    pub fn glyph(self) -> char {
        match self {
            Suit::Spade => '♠',
            Suit::Heart => '♥',
            Suit::Diamond => '♦',
            Suit::Club => '♣',
        }
    }

    /// Suit denoted by a single character, accepting the heart emoji alias.
    pub fn from_char(c: char) -> Option<Suit> {
        match c {
            '♠' => Some(Suit::Spade),
            '♥' | '❤' => Some(Suit::Heart),
            '♦' => Some(Suit::Diamond),
            '♣' => Some(Suit::Club),
            _ => None,
        }
    }

    /// Normalize one textual suit token: bare glyph, glyph + variation
    /// selector, or heart emoji alias. `None` for anything else.
    pub fn from_token(token: &str) -> Option<Suit> {
        let mut chars = token.chars();
        let suit = Suit::from_char(chars.next()?)?;
        match chars.next() {
            None => Some(suit),
            Some(VARIATION_SELECTOR) if chars.next().is_none() => Some(suit),
            Some(_) => None,
        }
    }

    /// Display form used in outbound messages.
    pub fn display(self) -> &'static str {
        match self {
            Suit::Spade => "♠️",
            Suit::Heart => "❤️",
            Suit::Diamond => "♦️",
            Suit::Club => "♣️",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// Canonicalize a raw symbol: recognized suit variants map to the bare
/// glyph, anything else is returned unchanged.
pub fn normalize(raw: &str) -> String {
    match Suit::from_token(raw) {
        Some(suit) => suit.glyph().to_string(),
        None => raw.to_string(),
    }
}
