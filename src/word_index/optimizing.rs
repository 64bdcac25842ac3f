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

//! Optimizing word index: wraps a Basic or Counting index as a disposable
//! builder. `do_post_actions` (here, [`OptimizingWordIndex::build`])
//! copies the builder's entries into a fixed-size open-addressing table
//! keyed by word-text hash, then drops the builder. Average lookup cost
//! afterwards is about one probe.

use super::{WordId, WordIndex, UNKNOWN_SURFACE, UNKNOWN_WORD_ID};
use crate::config::Params;
use crate::fixed_hash_map::FixedSizeHashMap;
use crate::hash::str_hash64;

/// Anything that can hand over its `(word, id)` pairs and be consumed in
/// the process -- the "disposable builder" half of the Optimizing variant.
/// Implemented by [`super::basic::BasicWordIndex`] and
/// [`super::counting::CountingWordIndex`].
pub trait IntoWordEntries: WordIndex {
    fn into_entries(self) -> Vec<(String, WordId)>;
}

pub struct OptimizingWordIndex {
    table: FixedSizeHashMap<WordId>,
    len: usize,
}

impl OptimizingWordIndex {
    /// Consumes `builder`, freezing its entries into a fixed hash map sized
    /// to `params.buckets_factor * n_words` (next power of two).
    pub fn build<B: IntoWordEntries>(builder: B, params: &Params) -> Self {
        let entries = builder.into_entries();
        let mut table = FixedSizeHashMap::new(params.bucket_count(entries.len()));
        let len = entries.iter().filter(|(word, _)| word != UNKNOWN_SURFACE).count();
        for (word, id) in entries {
            table.insert(str_hash64(&word), id);
        }
        OptimizingWordIndex { table, len }
    }
}

impl WordIndex for OptimizingWordIndex {
    const NEEDS_REGISTRATION: bool = false;
    const NEEDS_COUNTING: bool = false;
    const NEEDS_POST_ACTIONS: bool = true;
    const IS_CONTINUOUS: bool = false;

    fn reserve(&mut self, _n: usize) {}

    fn get_word_id(&self, text: &str) -> WordId {
        self.table.get(str_hash64(text)).copied().unwrap_or(UNKNOWN_WORD_ID)
    }

    /// The optimizing index is frozen once built: registration was the
    /// disposed builder's job, so this only ever looks a word up.
    fn register_word(&mut self, text: &str) -> WordId {
        self.get_word_id(text)
    }

    fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::word_index::basic::BasicWordIndex;
    use crate::word_index::counting::CountingWordIndex;

    #[test]
    fn preserves_all_registered_words_from_basic() {
        let mut builder = BasicWordIndex::new();
        let ids: Vec<WordId> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|w| builder.register_word(w))
            .collect();
        let params = Params::default();
        let optimized = OptimizingWordIndex::build(builder, &params);

        for (w, expected) in ["a", "b", "c", "d", "e"].iter().zip(ids) {
            assert_eq!(optimized.get_word_id(w), expected);
        }
        assert_eq!(optimized.len(), 5);
    }

    #[test]
    fn preserves_frequency_ordering_from_counting() {
        let mut builder = CountingWordIndex::new();
        for _ in 0..5 {
            builder.count_word("common");
        }
        builder.count_word("rare");
        builder.do_post_word_count();
        let common_id = builder.register_word("common");
        let rare_id = builder.register_word("rare");

        let params = Params::default();
        let optimized = OptimizingWordIndex::build(builder, &params);
        assert_eq!(optimized.get_word_id("common"), common_id);
        assert_eq!(optimized.get_word_id("rare"), rare_id);
    }

    #[test]
    fn unknown_word_after_freeze_returns_unknown_id() {
        let builder = BasicWordIndex::new();
        let optimized = OptimizingWordIndex::build(builder, &Params::default());
        assert_eq!(optimized.get_word_id("never registered"), UNKNOWN_WORD_ID);
    }
}
