use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{PlayType, RawPlay, RecordStore};

/// A first-and-ten play at midfield, early in a tied game, gaining nothing.
pub(crate) fn play(play_type: PlayType) -> RawPlay {
    RawPlay {
        play_type,
        down: 1,
        distance_needed: 10,
        yard_line: 50,
        minutes: 45,
        own_score: 0,
        opp_score: 0,
        distance_gained: 0,
        turned_over: false,
    }
}

pub(crate) fn finalized_store<I>(plays: I) -> RecordStore
where
    I: IntoIterator<Item = RawPlay>,
{
    let mut store = RecordStore::new();
    for raw in plays {
        store.insert(raw).unwrap();
    }
    store.finalize().unwrap();
    store
}

pub(crate) fn random_play<R: Rng + ?Sized>(rng: &mut R) -> RawPlay {
    let play_type = PlayType::ALL[rng.random_range(0..PlayType::LEN)];
    RawPlay {
        play_type,
        down: rng.random_range(0..=4),
        distance_needed: rng.random_range(0..=30),
        yard_line: rng.random_range(1..=99),
        minutes: rng.random_range(0..=60),
        own_score: rng.random_range(0..=40),
        opp_score: rng.random_range(0..=40),
        distance_gained: rng.random_range(-10..=40),
        turned_over: rng.random_bool(0.05),
    }
}

/// A finalized store of `len` seeded random plays.
///
/// `play_types` restricts which play types occur, which keeps the class mix
/// small enough for splits to carry information.
pub(crate) fn random_store(seed: u64, len: usize, play_types: &[PlayType]) -> RecordStore {
    let mut rng = Pcg32::seed_from_u64(seed);
    finalized_store((0..len).map(|_| {
        let mut raw = random_play(&mut rng);
        raw.play_type = play_types[rng.random_range(0..play_types.len())];
        raw
    }))
}
