//! Random tile placement.
//!
//! All randomness comes from a caller-supplied [`Rng`], so seeded generators
//! give reproducible games.

use crate::board::{Board, CellPos};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Chance that a spawned tile is a 4 rather than a 2
pub const FOUR_PROBABILITY: f64 = 0.1;

/// Number of tiles placed on a fresh board
pub const STARTING_TILES: usize = 2;

/// A tile placed by the spawner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnedTile {
    pub pos: CellPos,
    pub value: u32,
}

/// Place one tile on a uniformly chosen empty cell.
///
/// Returns the new board together with the tile that was placed. A full board
/// comes back unchanged with `None`.
///
/// # Panics
///
/// Panics if `four_probability` is outside `0.0..=1.0`.
pub fn place_random_tile<R: Rng + ?Sized>(
    board: &Board,
    rng: &mut R,
    four_probability: f64,
) -> (Board, Option<SpawnedTile>) {
    let empty = board.empty_cells();
    let Some(&pos) = empty.choose(rng) else {
        return (board.clone(), None);
    };

    let value = if rng.gen_bool(four_probability) { 4 } else { 2 };
    (board.with_tile(pos, value), Some(SpawnedTile { pos, value }))
}

/// Place a 2 (90%) or a 4 (10%) on a random empty cell.
pub fn spawn_tile<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Board {
    spawn_tile_with(board, rng, FOUR_PROBABILITY)
}

/// Like [`spawn_tile`] with an explicit chance of spawning a 4.
pub fn spawn_tile_with<R: Rng + ?Sized>(board: &Board, rng: &mut R, four_probability: f64) -> Board {
    place_random_tile(board, rng, four_probability).0
}

/// Create a board of `size` holding two random tiles.
pub fn init_board<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Board {
    init_board_with(size, rng, FOUR_PROBABILITY)
}

/// Like [`init_board`] with an explicit chance of spawning a 4.
pub fn init_board_with<R: Rng + ?Sized>(size: usize, rng: &mut R, four_probability: f64) -> Board {
    (0..STARTING_TILES).fold(Board::new(size), |board, _| {
        spawn_tile_with(&board, rng, four_probability)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn board(rows: &[&[u32]]) -> Board {
        Board::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn test_spawn_fills_exactly_one_empty_cell() {
        let mut rng = StdRng::seed_from_u64(7);
        let before = board(&[&[2, 0, 4], &[0, 8, 0], &[16, 0, 0]]);

        for _ in 0..50 {
            let after = spawn_tile(&before, &mut rng);
            assert_eq!(after.tile_count(), before.tile_count() + 1);
            for (old, new) in before.rows().flatten().zip(after.rows().flatten()) {
                if *old != 0 {
                    assert_eq!(old, new, "spawn overwrote an occupied cell");
                }
            }
        }
    }

    #[test]
    fn test_spawn_on_full_board_is_noop() {
        let mut rng = StdRng::seed_from_u64(1);
        let full = board(&[&[2, 4], &[8, 16]]);
        let (after, spawned) = place_random_tile(&full, &mut rng, FOUR_PROBABILITY);
        assert_eq!(after, full);
        assert_eq!(spawned, None);
        assert_eq!(spawn_tile(&full, &mut rng), full);
    }

    #[test]
    fn test_spawn_uses_only_empty_cell() {
        let mut rng = StdRng::seed_from_u64(3);
        let b = board(&[&[2, 4], &[0, 16]]);
        let (after, spawned) = place_random_tile(&b, &mut rng, FOUR_PROBABILITY);
        let spawned = spawned.unwrap();
        assert_eq!(spawned.pos, CellPos::new(1, 0));
        assert!(spawned.value == 2 || spawned.value == 4);
        assert_eq!(after.get(CellPos::new(1, 0)), Some(spawned.value));
    }

    #[test]
    fn test_spawn_value_distribution() {
        let mut rng = StdRng::seed_from_u64(2048);
        let empty = Board::new(4);
        let trials = 10_000;
        let mut fours = 0;
        for _ in 0..trials {
            let (_, spawned) = place_random_tile(&empty, &mut rng, FOUR_PROBABILITY);
            match spawned.unwrap().value {
                2 => {}
                4 => fours += 1,
                other => panic!("unexpected tile value {}", other),
            }
        }
        let ratio = fours as f64 / trials as f64;
        assert!((0.07..0.13).contains(&ratio), "four ratio was {}", ratio);
    }

    #[test]
    fn test_forced_values() {
        let mut rng = StdRng::seed_from_u64(9);
        let b = Board::new(3);
        assert_eq!(place_random_tile(&b, &mut rng, 0.0).1.unwrap().value, 2);
        assert_eq!(place_random_tile(&b, &mut rng, 1.0).1.unwrap().value, 4);
    }

    #[test]
    fn test_init_board_places_two_tiles() {
        for size in 3..=8 {
            let mut rng = StdRng::seed_from_u64(size as u64);
            let b = init_board(size, &mut rng);
            assert_eq!(b.size(), size);
            assert_eq!(b.tile_count(), STARTING_TILES);
        }
    }

    #[test]
    fn test_seeded_spawns_are_reproducible() {
        let a = init_board(4, &mut StdRng::seed_from_u64(42));
        let b = init_board(4, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
