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

//! The G2DMap trie. Per-level bucketed storage of m-gram payloads keyed by
//! m-gram id, with a raw-indexed, `get_unchecked`-adjacent hot path.
//!
//! Lifecycle: `pre_allocate(counts)` -> `add_m_gram(level)*` (levels in
//! increasing order) -> `post_grams(level)` once per level -> frozen. After
//! freeze, `get_payload` is safe for unsynchronized concurrent reads.

pub mod bitmap_cache;
pub mod bucket;

use crate::config::Params;
use crate::hash::hash_word_ids;
use crate::mgram_id;
use crate::word_index::{WordId, UNKNOWN_WORD_ID};
use bitmap_cache::BitmapHashCache;
use bucket::Bucket;

/// Per-step probability floor: the conventional ARPA-style sentinel used
/// when no better estimate exists (see DESIGN.md for the choice of
/// −99.0 over other `log10`-scale `f32` floor constants).
pub const ZERO_PROB: f32 = -99.0;
pub const ZERO_BACK_OFF: f32 = 0.0;

/// `(log_prob, back_off)` for m < N, `log_prob` only for m == N.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GramPayload {
    Interior { log_prob: f32, back_off: f32 },
    Final { log_prob: f32 },
}

impl GramPayload {
    pub const UNKNOWN: GramPayload = GramPayload::Interior {
        log_prob: ZERO_PROB,
        back_off: ZERO_BACK_OFF,
    };

    pub fn log_prob(&self) -> f32 {
        match self {
            GramPayload::Interior { log_prob, .. } => *log_prob,
            GramPayload::Final { log_prob } => *log_prob,
        }
    }

    /// Back-off weight, `ZERO_BACK_OFF` for a final-level (no-back-off)
    /// payload.
    pub fn back_off(&self) -> f32 {
        match self {
            GramPayload::Interior { back_off, .. } => *back_off,
            GramPayload::Final { .. } => ZERO_BACK_OFF,
        }
    }
}

/// Query outcome for a sub-m-gram lookup. Never a `Result`:
/// a missing key is an expected, common outcome, not a failure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GramLookup<'a> {
    Found(&'a GramPayload),
    NotFound,
    EndUnknown,
}

/// Selects whether non-unigram levels store variable-width byte ids
/// (the primary mode) or 64-bit hashes (the lossy hash-only mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketMode {
    ByteId,
    HashId,
}

pub struct Trie {
    max_level: usize,
    mode: BucketMode,
    unigram_payload: Vec<GramPayload>,
    /// `mid_buckets[m - 2]` holds level-`m` buckets for `2 <= m < max_level`.
    mid_buckets: Vec<Vec<Bucket>>,
    /// Level-`max_level` buckets.
    n_gram_buckets: Vec<Bucket>,
    /// `masks[m - 2]` is `num_buckets_at_level(m) - 1`, for `2 <= m <= max_level`.
    masks: Vec<usize>,
    /// Parallel to `masks`; `None` when the bitmap hash cache is disabled.
    bitmap_caches: Vec<Option<BitmapHashCache>>,
}

impl Trie {
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    pub fn new(max_level: usize, mode: BucketMode) -> Self {
        assert!(max_level >= 1, "a trie needs at least a unigram level");
        Trie {
            max_level,
            mode,
            unigram_payload: Vec::new(),
            mid_buckets: Vec::new(),
            n_gram_buckets: Vec::new(),
            masks: Vec::new(),
            bitmap_caches: Vec::new(),
        }
    }

    /// Allocates per-level bucket arrays. `counts[m - 1]` is the number of
    /// distinct m-grams expected at level `m`; `counts[0]` additionally
    /// sizes the direct-indexed unigram array.
    pub fn pre_allocate(&mut self, counts: &[usize], params: &Params) {
        assert_eq!(counts.len(), self.max_level, "counts must cover every level 1..=max_level");

        self.unigram_payload = vec![GramPayload::UNKNOWN; counts[0]];

        let non_unigram_levels = self.max_level.saturating_sub(1);
        self.masks = Vec::with_capacity(non_unigram_levels);
        self.bitmap_caches = Vec::with_capacity(non_unigram_levels);
        self.mid_buckets = Vec::with_capacity(non_unigram_levels.saturating_sub(1));

        for level in 2..=self.max_level {
            let n_buckets = params.bucket_count(counts[level - 1]);
            self.masks.push(n_buckets - 1);

            let cache = if cfg!(feature = "bitmap-hash-cache") && params.enable_bitmap_hash_cache {
                Some(BitmapHashCache::new(n_buckets))
            } else {
                None
            };
            self.bitmap_caches.push(cache);

            let new_bucket = || match self.mode {
                BucketMode::ByteId => Bucket::new_byte_id(),
                BucketMode::HashId => Bucket::new_hash_id(),
            };
            let buckets: Vec<Bucket> = (0..n_buckets).map(|_| new_bucket()).collect();
            if level == self.max_level {
                self.n_gram_buckets = buckets;
            } else {
                self.mid_buckets.push(buckets);
            }
        }
    }

    fn mask_for(&self, level: usize) -> usize {
        self.masks[level - 2]
    }

    fn buckets_mut(&mut self, level: usize) -> &mut Vec<Bucket> {
        if level == self.max_level {
            &mut self.n_gram_buckets
        } else {
            &mut self.mid_buckets[level - 2]
        }
    }

    fn buckets(&self, level: usize) -> &Vec<Bucket> {
        if level == self.max_level {
            &self.n_gram_buckets
        } else {
            &self.mid_buckets[level - 2]
        }
    }

    /// Adds one m-gram's payload. For `level == 1` this is a direct store
    /// into `unigram_payload[word_id]`; otherwise the bucket is chosen by
    /// `combined_hash(word_ids) & mask`.
    pub fn add_m_gram(&mut self, word_ids: &[WordId], payload: GramPayload) {
        let level = word_ids.len();
        assert!(level >= 1 && level <= self.max_level, "level {} out of range", level);

        if level == 1 {
            let word_id = word_ids[0] as usize;
            if word_id >= self.unigram_payload.len() {
                self.unigram_payload.resize(word_id + 1, GramPayload::UNKNOWN);
            }
            self.unigram_payload[word_id] = payload;
            return;
        }

        let h = hash_word_ids(word_ids);
        let bucket_idx = (h as usize) & self.mask_for(level);
        if let Some(Some(cache)) = self.bitmap_caches.get_mut(level - 2) {
            cache.insert(h);
        }
        let mode = self.mode;
        let bucket = &mut self.buckets_mut(level)[bucket_idx];
        match mode {
            BucketMode::ByteId => {
                let id = mgram_id::create(word_ids);
                bucket.push_byte_id(id.as_bytes().into(), payload);
            }
            BucketMode::HashId => bucket.push_hash_id(h, payload),
        }
    }

    /// Sorts and shrinks every bucket at `level`. Must be called exactly
    /// once per level, after all of that level's `add_m_gram` calls and
    /// before any query or `add_m_gram` at `level + 1`.
    pub fn post_grams(&mut self, level: usize) {
        assert!(level >= 2 && level <= self.max_level, "post_grams only applies to bucketed levels");
        for bucket in self.buckets_mut(level).iter_mut() {
            bucket.sort_and_shrink(level);
        }
    }

    /// Looks up the payload for a sub-m-gram `word_ids`. The level is
    /// `word_ids.len()`.
    ///
    /// The `EndUnknown` short-circuit only applies above the unigram level:
    /// it exists to skip a wasted hash+bucket probe when no higher-order
    /// m-gram can possibly match an unknown final word. The unigram level
    /// is a direct array read, so `UNKNOWN_WORD_ID` itself is looked up
    /// like any other id (its payload is exactly what the LM engine's
    /// unknown-word fallback reads).
    pub fn get_payload(&self, word_ids: &[WordId]) -> GramLookup<'_> {
        let level = word_ids.len();

        if level == 1 {
            let word_id = word_ids[0] as usize;
            return match self.unigram_payload.get(word_id) {
                Some(p) => GramLookup::Found(p),
                None => GramLookup::NotFound,
            };
        }

        if *word_ids.last().expect("empty m-gram query") == UNKNOWN_WORD_ID {
            return GramLookup::EndUnknown;
        }

        assert!(level <= self.max_level, "query level {} exceeds trie max level {}", level, self.max_level);

        let h = hash_word_ids(word_ids);
        if let Some(Some(cache)) = self.bitmap_caches.get(level - 2) {
            if !cache.maybe_contains(h) {
                return GramLookup::NotFound;
            }
        }

        let bucket_idx = (h as usize) & self.mask_for(level);
        let bucket = &self.buckets(level)[bucket_idx];
        let found = match self.mode {
            BucketMode::ByteId => {
                let id = mgram_id::create(word_ids);
                bucket.find_by_id(level, id.as_bytes())
            }
            BucketMode::HashId => bucket.find_by_hash(h),
        };
        match found {
            Some(p) => GramLookup::Found(p),
            None => GramLookup::NotFound,
        }
    }
}
