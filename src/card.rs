// src/card.rs
// A single numbered card on the game board.

use serde::{Deserialize, Serialize};

use crate::defs::{Color, FIRSTNUMBER, Number, Position, SpacingHint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Generation index, unique within a board.
    pub id: usize,
    pub color: Color,
    pub number: Number,
    pub position: Position,
    pub spacing: Option<SpacingHint>,
}

impl Card {
    pub fn new(id: usize, color: Color, number: Number) -> Self {
        Self {
            id,
            color,
            number,
            position: Position::Middle,
            spacing: None,
        }
    }

    pub fn is_start(&self) -> bool {
        self.number == FIRSTNUMBER
    }

    /// True when this card is the legal successor of `prev`:
    /// the next number, in the other color.
    pub fn follows(&self, prev: &Card) -> bool {
        self.number == prev.number + 1 && self.color != prev.color
    }

    pub fn label(&self) -> String {
        format!("{}({})", self.number, self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follows_requires_next_number_and_other_color() {
        let one_red = Card::new(0, Color::Red, 1);
        let two_blue = Card::new(1, Color::Blue, 2);
        let two_red = Card::new(2, Color::Red, 2);
        let three_blue = Card::new(3, Color::Blue, 3);

        assert!(two_blue.follows(&one_red));
        assert!(!two_red.follows(&one_red));
        assert!(!three_blue.follows(&one_red));
        assert!(!one_red.follows(&two_blue));
    }

    #[test]
    fn test_is_start() {
        assert!(Card::new(0, Color::Red, 1).is_start());
        assert!(Card::new(5, Color::Blue, 1).is_start());
        assert!(!Card::new(1, Color::Blue, 2).is_start());
    }

    #[test]
    fn test_label() {
        assert_eq!(Card::new(3, Color::Blue, 7).label(), "7(blue)");
    }
}
