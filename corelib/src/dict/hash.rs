/*
 * Created on Wed Mar 13 2024
 *
 * This file is a part of Skytable
 * Skytable (formerly known as TerrabaseDB or Skybase) is a free and open-source
 * NoSQL database written by Sayan Nandan ("the Author") with the
 * vision to provide flexibility in data modelling without compromising
 * on performance, queryability or scalability.
 *
 * Copyright (c) 2024, Sayan Nandan <nandansayan@outlook.com>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

/*!
    Seeded, non-cryptographic byte hashing for the dictionary. The seed is the
    one piece of process-global state in this crate: set it once at startup
    (before any dictionary exists) so an adversary can't precompute colliding
    keys against a known constant.
*/

use core::sync::atomic::{AtomicU32, Ordering};

// the structures are single-threaded; the atomic is only here because statics
// demand Sync. Relaxed everywhere
static HASH_SEED: AtomicU32 = AtomicU32::new(5381);

/// Set the process-global hash seed. Call once, at startup
pub fn set_hash_seed(seed: u32) {
    HASH_SEED.store(seed, Ordering::Relaxed)
}

pub fn hash_seed() -> u32 {
    HASH_SEED.load(Ordering::Relaxed)
}

/// Hash `key` with the process-global seed
pub fn hash_bytes(key: &[u8]) -> u32 {
    hash_bytes_seeded(hash_seed(), key)
}

/// MurmurHash2, 32-bit. Word-at-a-time mixing with two multiplies per round;
/// the tail bytes fold in MSB-first
pub fn hash_bytes_seeded(seed: u32, key: &[u8]) -> u32 {
    const M: u32 = 0x5bd1_e995;
    const R: u32 = 24;
    let mut h: u32 = seed ^ key.len() as u32;
    let mut b = key;
    while b.len() >= 4 {
        let mut k = u32::from_le_bytes([b[0], b[1], b[2], b[3]]);
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);
        h = h.wrapping_mul(M) ^ k;
        b = &b[4..];
    }
    if b.len() >= 3 {
        h ^= (b[2] as u32) << 16;
    }
    if b.len() >= 2 {
        h ^= (b[1] as u32) << 8;
    }
    if !b.is_empty() {
        h ^= b[0] as u32;
        h = h.wrapping_mul(M);
    }
    h ^= h >> 13;
    h = h.wrapping_mul(M);
    h ^= h >> 15;
    h
}

/// Case-insensitive djb2 variant for text keys, seeded like
/// [`hash_bytes_seeded`]
pub fn hash_bytes_ci(key: &[u8]) -> u32 {
    hash_bytes_ci_seeded(hash_seed(), key)
}

pub fn hash_bytes_ci_seeded(seed: u32, key: &[u8]) -> u32 {
    let mut h = seed;
    for &c in key {
        h = (h << 5)
            .wrapping_add(h)
            .wrapping_add(c.to_ascii_lowercase() as u32);
    }
    h
}
