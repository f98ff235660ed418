//! Core of the falling-block puzzle: piece patterns and rotation, the
//! settled board, wall-kicked rotation, row clearing and scoring. No
//! engine types in here, which keeps the whole module testable as plain
//! data transforms.

pub const BOARD_W: usize = 10;
pub const BOARD_H: usize = 20;

/// score for 0..=4 rows cleared at once, multiplied by the level
pub const LINE_SCORES: [u64; 5] = [0, 100, 300, 500, 800];

/// kick offsets tried in order when a rotation's default placement is
/// invalid: left 1, right 1, left 2, right 2, up 1. The order is part of
/// the rotation contract.
pub const KICKS: [(i16, i16); 5] = [(-1, 0), (1, 0), (-2, 0), (2, 0), (0, -1)];

pub const PIECE_KINDS: usize = 7;

pub mod board;
pub mod piece;

pub use board::Board;
pub use piece::{Pattern, Piece};

/// seconds between gravity steps at a level
pub fn drop_interval(level: u32) -> f32 {
    (1.0 - 0.1 * (level.saturating_sub(1)) as f32).max(0.1)
}

/// level derived from total cleared lines, never decreasing
pub fn level_for_lines(lines: u32) -> u32 {
    lines / 10 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_interval_shrinks_to_floor() {
        assert!((drop_interval(1) - 1.0).abs() < 1e-6);
        assert!((drop_interval(2) - 0.9).abs() < 1e-6);
        assert!((drop_interval(10) - 0.1).abs() < 1e-6);
        // clamped at the floor from level 10 on
        assert!((drop_interval(25) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn level_progression() {
        assert_eq!(level_for_lines(0), 1);
        assert_eq!(level_for_lines(9), 1);
        assert_eq!(level_for_lines(10), 2);
        assert_eq!(level_for_lines(43), 5);
    }
}
