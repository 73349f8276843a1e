// src/board.rs
// Board generation for the dual attention game.
//
// A board of `pairs` holds 2 × pairs cards. Colors alternate red/blue in generation
// order, the first card is always number 1, and each color carries every number in
// 1..=pairs exactly once. A board is cleared by one alternating chain 1..=pairs.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::defs::{Color, FIRSTNUMBER, MAX_SPACING, Number, Position, SpacingHint};

/// Option pools for the cosmetic card attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub positions: Vec<Position>,
    pub left_spacing: Vec<u8>,
    pub right_spacing: Vec<u8>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            positions: Position::ALL.to_vec(),
            left_spacing: (1..=MAX_SPACING).collect(),
            right_spacing: (1..=MAX_SPACING).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Board {
    pairs: Number,
    cards: Vec<Card>,
}

impl Board {
    pub fn pairs(&self) -> Number {
        self.pairs
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of correct selections needed to clear this board. Each color only
    /// carries 1..=pairs, so the longest alternating chain is `pairs` long.
    pub fn required_length(&self) -> usize {
        self.pairs as usize
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn get(&self, id: usize) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.get(card.id) == Some(card)
    }

    /// Numbers carried by `color`, in generation order.
    pub fn numbers_for(&self, color: Color) -> Vec<Number> {
        self.cards
            .iter()
            .filter(|card| card.color == color)
            .map(|card| card.number)
            .collect()
    }

    /// Cards sorted by the order they must be clicked in, starting from `start`.
    pub fn solution_from(&self, start: Color) -> Vec<Card> {
        let mut color = start;
        let mut path = Vec::with_capacity(self.required_length());
        for number in FIRSTNUMBER..=self.pairs {
            match self.cards.iter().find(|c| c.color == color && c.number == number) {
                Some(card) => path.push(*card),
                None => break,
            }
            color = color.opposite();
        }
        path
    }

    /// Re-check every generation invariant.
    pub fn validate(&self) -> Result<(), String> {
        if self.cards.len() != self.pairs as usize * 2 {
            return Err(format!(
                "Board has {} cards, expected {}",
                self.cards.len(),
                self.pairs as usize * 2
            ));
        }

        let mut seen_ids = HashSet::new();
        for (index, card) in self.cards.iter().enumerate() {
            if !seen_ids.insert(card.id) {
                return Err(format!("Duplicate card id {}", card.id));
            }
            let expected_color = if index % 2 == 0 { Color::Red } else { Color::Blue };
            if card.color != expected_color {
                return Err(format!("Card {} should be {expected_color}, found {}", index, card.color));
            }
        }

        if let Some(first) = self.cards.first() {
            if first.number != FIRSTNUMBER {
                return Err(format!("First card must be {FIRSTNUMBER}, found {}", first.number));
            }
        }

        for color in [Color::Red, Color::Blue] {
            let mut numbers = self.numbers_for(color);
            numbers.sort_unstable();
            let expected: Vec<Number> = (FIRSTNUMBER..=self.pairs).collect();
            if numbers != expected {
                return Err(format!("{color} numbers are not a permutation of 1..={}", self.pairs));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct BoardGenerator {
    options: GeneratorOptions,
}

impl BoardGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    pub fn generate<R: Rng>(&self, pairs: Number, rng: &mut R) -> Board {
        let total = pairs as usize * 2;
        let mut cards = Vec::with_capacity(total);
        let mut used_red: HashSet<Number> = HashSet::with_capacity(pairs as usize);
        let mut used_blue: HashSet<Number> = HashSet::with_capacity(pairs as usize);
        let mut color = Color::Red;

        for id in 0..total {
            let used = match color {
                Color::Red => &mut used_red,
                Color::Blue => &mut used_blue,
            };

            let number = if id == 0 {
                FIRSTNUMBER
            } else {
                // A color never has more cards than values, so a free value always exists.
                loop {
                    let candidate = rng.random_range(FIRSTNUMBER..=pairs);
                    if !used.contains(&candidate) {
                        break candidate;
                    }
                }
            };
            used.insert(number);

            let position = self
                .options
                .positions
                .choose(rng)
                .copied()
                .unwrap_or(Position::Middle);
            let spacing = self.draw_spacing(rng);

            cards.push(Card {
                id,
                color,
                number,
                position,
                spacing,
            });

            color = color.opposite();
        }

        Board { pairs, cards }
    }

    pub fn generate_seeded(&self, pairs: Number, seed: u64) -> Board {
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate(pairs, &mut rng)
    }

    fn draw_spacing<R: Rng>(&self, rng: &mut R) -> Option<SpacingHint> {
        let left = self.options.left_spacing.choose(rng).copied()?;
        let right = self.options.right_spacing.choose(rng).copied()?;
        Some(SpacingHint { left, right })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> BoardGenerator {
        BoardGenerator::default()
    }

    #[test]
    fn test_empty_board() {
        let board = generator().generate_seeded(0, 1);
        assert!(board.is_empty());
        assert_eq!(board.required_length(), 0);
        assert!(board.validate().is_ok());
    }

    #[test]
    fn test_single_pair_board() {
        let board = generator().generate_seeded(1, 99);
        let cards = board.cards();
        assert_eq!(cards.len(), 2);
        assert_eq!((cards[0].id, cards[0].color, cards[0].number), (0, Color::Red, 1));
        assert_eq!((cards[1].id, cards[1].color, cards[1].number), (1, Color::Blue, 1));
    }

    #[test]
    fn test_generation_invariants_hold_for_many_seeds() {
        let generator = generator();
        for pairs in 0..=20 {
            for seed in 0..25 {
                let board = generator.generate_seeded(pairs, seed);
                assert_eq!(board.len(), pairs as usize * 2);
                assert_eq!(board.pairs(), pairs);
                if let Err(e) = board.validate() {
                    panic!("pairs={pairs} seed={seed}: {e}");
                }
            }
        }
    }

    #[test]
    fn test_first_card_is_red_one() {
        for seed in 0..50 {
            let board = generator().generate_seeded(6, seed);
            let first = board.cards()[0];
            assert_eq!(first.color, Color::Red);
            assert_eq!(first.number, 1);
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generator().generate_seeded(8, 42);
        let b = generator().generate_seeded(8, 42);
        assert_eq!(a.cards(), b.cards());
    }

    #[test]
    fn test_option_pools_are_respected() {
        let options = GeneratorOptions {
            positions: vec![Position::Top],
            left_spacing: vec![3],
            right_spacing: vec![2],
        };
        let board = BoardGenerator::new(options).generate_seeded(5, 7);
        for card in board.cards() {
            assert_eq!(card.position, Position::Top);
            assert_eq!(card.spacing, Some(SpacingHint { left: 3, right: 2 }));
        }
    }

    #[test]
    fn test_empty_spacing_pool_yields_no_hint() {
        let options = GeneratorOptions {
            positions: Vec::new(),
            left_spacing: Vec::new(),
            right_spacing: vec![1],
        };
        let board = BoardGenerator::new(options).generate_seeded(3, 7);
        for card in board.cards() {
            assert_eq!(card.position, Position::Middle);
            assert_eq!(card.spacing, None);
        }
        assert!(board.validate().is_ok());
    }

    #[test]
    fn test_solution_path_alternates() {
        let board = generator().generate_seeded(4, 3);
        let path = board.solution_from(Color::Red);
        assert_eq!(path.len(), 4);
        assert!(path[0].is_start());
        for window in path.windows(2) {
            assert!(window[1].follows(&window[0]));
        }
    }

    #[test]
    fn test_both_colors_can_start_a_full_chain() {
        let board = generator().generate_seeded(6, 21);
        assert_eq!(board.solution_from(Color::Red).len(), board.required_length());
        assert_eq!(board.solution_from(Color::Blue).len(), board.required_length());
    }

    #[test]
    fn test_validate_rejects_broken_board() {
        let mut board = generator().generate_seeded(3, 5);
        board.cards[2].number = board.cards[0].number;
        board.cards[0].number = 2;
        assert!(board.validate().is_err());
    }

    #[test]
    fn test_get_and_contains() {
        let board = generator().generate_seeded(2, 11);
        let card = board.cards()[3];
        assert_eq!(board.get(3), Some(&card));
        assert!(board.contains(&card));
        assert!(board.get(4).is_none());

        let foreign = Card::new(3, card.color.opposite(), card.number);
        assert!(!board.contains(&foreign));
    }
}
