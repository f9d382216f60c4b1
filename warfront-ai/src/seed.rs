//! Deterministic per-faction, per-turn seed derivation.
//!
//! Each faction's engine runs independently; deriving its stream from the
//! game seed, faction id, and turn number keeps every turn reproducible
//! without factions sharing RNG state.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::territory::FactionId;

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash = (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Seed for one faction's planning on one turn.
#[must_use]
pub fn turn_seed(game_seed: u64, faction: &FactionId, turn: u32) -> u64 {
    // Domain-separated FNV input
    let mut buf = Vec::with_capacity(8 + 1 + faction.as_str().len() + 1 + 4);
    buf.extend_from_slice(b"WARFRONT");
    buf.push(b'|');
    buf.extend_from_slice(faction.as_str().as_bytes());
    buf.push(b'|');
    buf.extend_from_slice(&turn.to_le_bytes());
    fnv1a64(&buf) ^ game_seed.rotate_left(17)
}

/// RNG used for score jitter, seeded from a turn seed.
#[must_use]
pub fn planning_rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}
