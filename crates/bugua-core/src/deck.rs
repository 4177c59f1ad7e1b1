//! Deck shuffling for flip mode.

use crate::piece::{Piece, initial_deck};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Returns a Fisher–Yates permutation of `deck` driven by `rng`.
pub fn shuffle_with<R: rand::Rng + ?Sized>(deck: &[Piece], rng: &mut R) -> Vec<Piece> {
    let mut shuffled = deck.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

/// A freshly shuffled full deck using the thread-local RNG.
pub fn shuffled_deck() -> Vec<Piece> {
    shuffle_with(&initial_deck(), &mut rand::thread_rng())
}

/// A full deck shuffled from a fixed seed, for reproducible rounds.
pub fn shuffled_deck_from_seed(seed: u64) -> Vec<Piece> {
    let mut rng = StdRng::seed_from_u64(seed);
    shuffle_with(&initial_deck(), &mut rng)
}
