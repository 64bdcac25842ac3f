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

//! A bucket is a contiguous, ordered list of `(m_gram_id, payload)`
//! entries sorted by id for binary search. Two storage modes:
//! [`Bucket::ByteId`] (the primary G2DMap variant, variable-width ids
//! compared via [`crate::mgram_id::compare`]) and [`Bucket::HashId`] (the
//! hash-only variant, 64-bit hashes sorted numerically, collisions
//! treated as matches -- a documented lossy approximation).

use super::GramPayload;
use crate::mgram_id;
use std::cmp::Ordering;

#[derive(Debug, Clone)]
pub enum Bucket {
    ByteId(Vec<(Box<[u8]>, GramPayload)>),
    HashId(Vec<(u64, GramPayload)>),
}

impl Bucket {
    pub fn new_byte_id() -> Self {
        Bucket::ByteId(Vec::new())
    }

    pub fn new_hash_id() -> Self {
        Bucket::HashId(Vec::new())
    }

    pub fn len(&self) -> usize {
        match self {
            Bucket::ByteId(v) => v.len(),
            Bucket::HashId(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push_byte_id(&mut self, id: Box<[u8]>, payload: GramPayload) {
        match self {
            Bucket::ByteId(v) => v.push((id, payload)),
            Bucket::HashId(_) => panic!("push_byte_id called on a hash-id bucket"),
        }
    }

    pub fn push_hash_id(&mut self, hash: u64, payload: GramPayload) {
        match self {
            Bucket::HashId(v) => v.push((hash, payload)),
            Bucket::ByteId(_) => panic!("push_hash_id called on a byte-id bucket"),
        }
    }

    /// Sorts the bucket's entries by id and drops any spare capacity.
    /// Called exactly once per level, after all of that level's m-grams
    /// have been added.
    pub fn sort_and_shrink(&mut self, level: usize) {
        match self {
            Bucket::ByteId(v) => {
                v.sort_unstable_by(|a, b| mgram_id::compare(&a.0, &b.0, level));
                v.shrink_to_fit();
            }
            Bucket::HashId(v) => {
                v.sort_unstable_by_key(|(h, _)| *h);
                v.shrink_to_fit();
            }
        }
    }

    /// Looks up a byte-id bucket entry. Uses an explicit-compare scan for
    /// the common 1- and 2-entry buckets and binary search above that.
    pub fn find_by_id(&self, level: usize, query: &[u8]) -> Option<&GramPayload> {
        let v = match self {
            Bucket::ByteId(v) => v,
            Bucket::HashId(_) => panic!("find_by_id called on a hash-id bucket"),
        };
        match v.len() {
            0 => None,
            1 => (mgram_id::compare(&v[0].0, query, level) == Ordering::Equal).then(|| &v[0].1),
            2 => v
                .iter()
                .find(|(id, _)| mgram_id::compare(id, query, level) == Ordering::Equal)
                .map(|(_, p)| p),
            _ => v
                .binary_search_by(|(id, _)| mgram_id::compare(id, query, level))
                .ok()
                .map(|i| &v[i].1),
        }
    }

    /// Looks up a hash-id bucket entry. Any match on the 64-bit hash is
    /// accepted, even if it came from a different, colliding m-gram.
    pub fn find_by_hash(&self, hash: u64) -> Option<&GramPayload> {
        let v = match self {
            Bucket::HashId(v) => v,
            Bucket::ByteId(_) => panic!("find_by_hash called on a byte-id bucket"),
        };
        v.binary_search_by_key(&hash, |(h, _)| *h).ok().map(|i| &v[i].1)
    }
}
