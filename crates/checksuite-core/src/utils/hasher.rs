//! xxh3-backed hashing for group keys.
use std::hash::{BuildHasher, Hasher};
use xxhash_rust::xxh3::Xxh3;

/// Streaming xxh3 hasher used by the grouping tables.
#[derive(Default, Clone)]
pub struct Xxh3Hasher(Xxh3);

impl Hasher for Xxh3Hasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0.digest()
    }
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }
}

/// `BuildHasher` plugging xxh3 into std maps, e.g.
/// `HashMap<GroupKey, usize, Xxh3Builder>`.
#[derive(Clone, Copy, Default, Debug)]
pub struct Xxh3Builder;

impl BuildHasher for Xxh3Builder {
    type Hasher = Xxh3Hasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        Xxh3Hasher(Xxh3::new())
    }
}
