/*
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Stable 32/64-bit string and word-id-sequence hashing.
//!
//! `str_hash64` is a djb2-derived string hash widened to 64 bits so it can
//! double as a `phrase_uid`. `mix64` is the fast-hash finalizer used both
//! by [`crate::fixed_hash_map`] to spread bucket indices and by the
//! G2DMap trie to select a bucket from a combined word id hash.

use std::hash::{BuildHasher, Hasher};

const DJB2_SEED: u64 = 5381;

/// Stable 64-bit hash of a string. Used to derive `phrase_uid`s and as the
/// key for the Hashing word-index variant.
pub fn str_hash64(s: &str) -> u64 {
    let mut hash = DJB2_SEED;
    for b in s.as_bytes() {
        hash = (hash << 5).wrapping_add(hash).wrapping_add(*b as u64);
    }
    hash
}

/// Combines two phrase uids into one source+target composite id. A simple
/// odd-constant multiplicative mix keeps the combination order-sensitive
/// and sidesteps the overflow issues the original's Cantor/Szudzik pairing
/// functions documented against large inputs.
pub fn mix_phrase_ids(source: u64, target: u64) -> u64 {
    let h = source.rotate_left(23) ^ target;
    h.wrapping_mul(0x9E3779B97F4A7C15)
}

/// The fast-hash mixing finalizer: spreads input bits so that keys which
/// would otherwise land in the same bucket are distributed across the
/// table.
#[inline(always)]
pub fn mix64(mut h: u64) -> u64 {
    h ^= h >> 23;
    h = h.wrapping_mul(0x2127599bf4325c37);
    h ^= h >> 47;
    h
}

/// Computes a combined hash for a sequence of word ids, used to select the
/// G2DMap bucket for an m-gram. Order-sensitive: `[a, b] != [b, a]`.
pub fn hash_word_ids(word_ids: &[u32]) -> u64 {
    let mut h = DJB2_SEED;
    for &id in word_ids {
        h = h.rotate_left(5) ^ (id as u64);
        h = h.wrapping_mul(0x100000001b3);
    }
    h
}

const MULTIPLIER: u64 = 0x6eed0e9da4d94a4fu64;
const SEED: u64 = 0x16f11fe89b0d677cu64;

/// Ro(tate) + Mu(ltiply) Hasher Factory
pub struct RoMu {}

impl RoMu {
    pub fn new() -> RoMu {
        RoMu {}
    }
}

impl Default for RoMu {
    fn default() -> Self {
        RoMu::new()
    }
}

impl BuildHasher for RoMu {
    type Hasher = RoMuHash;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        RoMuHash::new()
    }
}

pub struct RoMuHash {
    state: u64,
}

// from https://github.com/ku-nlp/jumanpp/blob/master/src/util/fast_hash_rot.h
// It is very fast (xor+mul+rot) for extremely small values (e.g. 1 field)
impl RoMuHash {
    #[inline(always)]
    pub fn new() -> RoMuHash {
        RoMuHash { state: SEED }
    }

    #[inline(always)]
    fn consume(&mut self, value: u64) {
        let data = self.state ^ value;
        let data = data.wrapping_mul(MULTIPLIER);
        self.state = data.rotate_left(32);
    }
}

impl Hasher for RoMuHash {
    #[inline(always)]
    fn finish(&self) -> u64 {
        self.state
    }

    #[inline(always)]
    fn write(&mut self, _bytes: &[u8]) {
        panic!("not supported for bytes")
    }

    #[inline(always)]
    fn write_u8(&mut self, _: u8) {
        panic!("not supported for u8")
    }

    #[inline(always)]
    fn write_u16(&mut self, _: u16) {
        panic!("not supported for u16")
    }

    #[inline(always)]
    fn write_u32(&mut self, i: u32) {
        self.consume(i as u64);
    }

    #[inline(always)]
    fn write_u64(&mut self, i: u64) {
        self.consume(i as u64);
    }

    #[inline(always)]
    fn write_u128(&mut self, _: u128) {
        panic!("not supported for u128")
    }

    #[inline(always)]
    fn write_usize(&mut self, i: usize) {
        self.consume(i as u64);
    }

    #[inline(always)]
    fn write_i8(&mut self, _: i8) {
        panic!("not supported for i8")
    }

    #[inline(always)]
    fn write_i16(&mut self, _: i16) {
        panic!("not supported for i16")
    }

    #[inline(always)]
    fn write_i32(&mut self, i: i32) {
        self.consume(i as u64)
    }

    #[inline(always)]
    fn write_i64(&mut self, i: i64) {
        self.consume(i as u64)
    }

    #[inline(always)]
    fn write_i128(&mut self, _: i128) {
        panic!("not supported for i128")
    }

    #[inline(always)]
    fn write_isize(&mut self, i: isize) {
        self.consume(i as u64)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;
    use std::hash::Hash;

    #[derive(Eq, PartialEq)]
    struct Small(i32, i32);

    impl Hash for Small {
        fn hash<H: Hasher>(&self, state: &mut H) {
            state.write_u64((self.0 as u64) << 32 | (self.1 as u64))
        }
    }

    #[test]
    fn works_in_hashmap() {
        let mut map = HashMap::with_hasher(RoMu::new());
        map.insert(Small(5, 6), "data");
        map.insert(Small(6, 5), "data2");
        assert_eq!(*map.get(&Small(5, 6)).unwrap(), "data");
        assert!(!map.contains_key(&Small(0, 0)));
    }

    #[test]
    fn str_hash_is_deterministic() {
        assert_eq!(str_hash64("banana"), str_hash64("banana"));
        assert_ne!(str_hash64("banana"), str_hash64("apple"));
    }

    #[test]
    fn hash_word_ids_is_order_sensitive() {
        assert_ne!(hash_word_ids(&[1, 2]), hash_word_ids(&[2, 1]));
        assert_eq!(hash_word_ids(&[1, 2, 3]), hash_word_ids(&[1, 2, 3]));
    }

    #[test]
    fn mix64_is_not_identity() {
        assert_ne!(mix64(12345), 12345);
    }

    #[test]
    fn mix_phrase_ids_order_sensitive() {
        assert_ne!(mix_phrase_ids(1, 2), mix_phrase_ids(2, 1));
    }
}
