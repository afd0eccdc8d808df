//! Spawn column selection with overlap avoidance near the top of the field.
//!
//! Only words still within [`NEAR_SPAWN_ROWS`] of the spawn line are checked. Words
//! further down have either drifted apart or left, so two aliens can still overlap
//! lower in the field; this is an approximation, not a full-field guarantee.

use super::entity::{FallingWord, WING_WIDTH, visual_width};
use rand::Rng;

/// Columns kept free at both screen edges.
pub const EDGE_PADDING: i32 = 7;
/// Random columns tried before giving up on a spawn.
pub const MAX_ATTEMPTS: usize = 10;
/// Words with `y` at or below this are considered near the spawn line.
pub const NEAR_SPAWN_ROWS: f64 = 3.0;
/// Ticks to wait before retrying a spawn that found no free column.
pub const SPAWN_RETRY_TICKS: i32 = 3;

/// True if `word` placed at column `x` would touch a near-spawn word (one-column gap required).
pub fn overlaps_existing(words: &[FallingWord], word: &str, x: i32) -> bool {
    let new_left = x - WING_WIDTH;
    let new_right = x + word.chars().count() as i32 + WING_WIDTH;
    words
        .iter()
        .filter(|fw| fw.y <= NEAR_SPAWN_ROWS)
        .any(|fw| new_left < fw.right_edge() + 1 && new_right > fw.left_edge() - 1)
}

/// Inclusive range of left-edge columns a word may spawn at.
pub fn column_range(word: &str, screen_width: i32) -> (i32, i32) {
    let min_x = EDGE_PADDING;
    let max_x = (screen_width - visual_width(word) - EDGE_PADDING).max(min_x);
    (min_x, max_x)
}

/// Picks a free column for `word`, or `None` when every attempt collided.
pub fn choose_column<R: Rng + ?Sized>(
    words: &[FallingWord],
    word: &str,
    screen_width: i32,
    rng: &mut R,
) -> Option<i32> {
    let (min_x, max_x) = column_range(word, screen_width);
    (0..MAX_ATTEMPTS)
        .map(|_| rng.random_range(min_x..=max_x))
        .find(|&x| !overlaps_existing(words, word, x))
}
