// src/defs.rs
// Shared definitions for the dual attention game: colors, layout hints and timing constants.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub type Number = u16;

// Level progression
pub const INITIAL_PAIRS: Number = 4; // first level: 4 red + 4 blue cards
pub const PAIRS_INCREMENT: Number = 2; // every completed level adds 2 cards per color
pub const FIRSTNUMBER: Number = 1;

// Timing
pub const PULSE_DURATION: Duration = Duration::from_millis(1000);
pub const ADVANCE_DELAY: Duration = Duration::from_millis(750);
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

// Layout
pub const GRID_COLUMNS: usize = 5;
pub const MAX_SPACING: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
}

impl Color {
    pub fn opposite(self) -> Self {
        match self {
            Color::Red => Color::Blue,
            Color::Blue => Color::Red,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the number sits inside its grid cell. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Top,
    Bottom,
    Left,
    Right,
    Middle,
}

impl Position {
    pub const ALL: [Position; 5] = [
        Position::Top,
        Position::Bottom,
        Position::Left,
        Position::Right,
        Position::Middle,
    ];
}

/// Horizontal padding around a card, in cells (1..=MAX_SPACING each side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpacingHint {
    pub left: u8,
    pub right: u8,
}

impl Default for SpacingHint {
    fn default() -> Self {
        Self { left: 1, right: 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_opposite() {
        assert_eq!(Color::Red.opposite(), Color::Blue);
        assert_eq!(Color::Blue.opposite(), Color::Red);
        assert_eq!(Color::Red.opposite().opposite(), Color::Red);
    }

    #[test]
    fn test_color_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Color::Blue).unwrap(), "\"blue\"");
        assert_eq!(serde_json::to_string(&Position::Middle).unwrap(), "\"middle\"");
    }

    #[test]
    fn test_advance_delay_shorter_than_pulse() {
        assert!(ADVANCE_DELAY < PULSE_DURATION);
    }
}
