//! Per-key byte stream used to index the radix table.
//!
//! A sponge absorbs a key once per round and is squeezed one byte at a time.
//! Each byte selects a bucket at the next level of the table. After the eight
//! bytes of a round are used up the key is hashed again, seeded with the round
//! number, so two distinct keys whose first hashes collide still diverge
//! further down (unless their `Hash` impls are identical, which the table
//! handles with collision buckets).

use std::hash::{BuildHasher, Hash, Hasher};

/// Number of bytes the table squeezes before it gives up branching.
pub const MAX_DEPTH: usize = 64;

pub struct Sponge<'a, K: ?Sized, S> {
    key: &'a K,
    hash_builder: &'a S,
    state: u64,
    round: u64,
    squeezed: usize,
}

impl<'a, K: ?Sized, S> Clone for Sponge<'a, K, S> {
    fn clone(&self) -> Self {
        Sponge {
            key: self.key,
            hash_builder: self.hash_builder,
            state: self.state,
            round: self.round,
            squeezed: self.squeezed,
        }
    }
}

impl<'a, K: Hash + ?Sized, S: BuildHasher> Sponge<'a, K, S> {
    pub fn new(key: &'a K, hash_builder: &'a S) -> Self {
        let mut sponge = Sponge {
            key,
            hash_builder,
            state: 0,
            round: 0,
            squeezed: 0,
        };
        sponge.state = sponge.absorb();
        sponge
    }

    fn absorb(&self) -> u64 {
        let mut hasher = self.hash_builder.build_hasher();
        hasher.write_u64(self.round);
        self.key.hash(&mut hasher);
        hasher.finish()
    }

    /// Squeezes the next byte out of the sponge.
    pub fn squeeze(&mut self) -> u8 {
        let offset = self.squeezed % 8;
        if offset == 0 && self.squeezed > 0 {
            self.round += 1;
            self.state = self.absorb();
        }
        self.squeezed += 1;
        (self.state >> (offset * 8)) as u8
    }

    pub fn hash_builder(&self) -> &'a S {
        self.hash_builder
    }

    /// How many bytes have been squeezed so far.
    pub fn depth(&self) -> usize {
        self.squeezed
    }

    /// Advances this sponge to the same depth as `other`.
    pub fn matching<Q: ?Sized>(&mut self, other: &Sponge<'_, Q, S>) {
        while self.squeezed < other.squeezed {
            self.squeeze();
        }
    }

    /// Whether the two streams differ somewhere between the current depth and
    /// [`MAX_DEPTH`]. Both sponges must be at the same depth.
    pub fn diverges_from<Q: Hash + ?Sized>(&self, other: &Sponge<'_, Q, S>) -> bool {
        debug_assert_eq!(self.squeezed, other.squeezed);
        let mut a = self.clone();
        let mut b = other.clone();
        while a.depth() < MAX_DEPTH {
            if a.squeeze() != b.squeeze() {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::RandomState;

    #[test]
    fn deterministic_per_builder() {
        let builder = RandomState::new();
        let mut a = Sponge::new(&"key", &builder);
        let mut b = Sponge::new(&"key", &builder);
        for _ in 0..MAX_DEPTH {
            assert_eq!(a.squeeze(), b.squeeze());
        }
    }

    #[test]
    fn matching_catches_up() {
        let builder = RandomState::new();
        let mut a = Sponge::new(&1u32, &builder);
        let mut b = Sponge::new(&2u32, &builder);
        for _ in 0..11 {
            a.squeeze();
        }
        b.matching(&a);
        assert_eq!(b.depth(), 11);

        let mut fresh = Sponge::new(&2u32, &builder);
        for _ in 0..11 {
            fresh.squeeze();
        }
        assert_eq!(b.squeeze(), fresh.squeeze());
    }

    #[test]
    fn distinct_keys_diverge() {
        let builder = RandomState::new();
        let a = Sponge::new(&"left", &builder);
        let b = Sponge::new(&"right", &builder);
        assert!(a.diverges_from(&b));
        assert!(!a.diverges_from(&a.clone()));
    }
}
