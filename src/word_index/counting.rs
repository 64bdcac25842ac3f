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

//! Counting word index: extends Basic with a counting phase. The most
//! frequent words get the lowest ids, which shrinks the average
//! `bytes_needed` width of the word ids that dominate the corpus and, in
//! turn, the average m-gram id length.

use super::{WordId, WordIndex, MIN_KNOWN_WORD_ID, UNKNOWN_SURFACE, UNKNOWN_WORD_ID};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct CountingWordIndex {
    counts: HashMap<String, u64>,
    word_to_id: HashMap<String, WordId>,
    next_id: WordId,
    counting_done: bool,
}

impl CountingWordIndex {
    pub fn new() -> Self {
        let mut word_to_id = HashMap::new();
        word_to_id.insert(UNKNOWN_SURFACE.to_string(), UNKNOWN_WORD_ID);
        CountingWordIndex {
            counts: HashMap::new(),
            word_to_id,
            next_id: MIN_KNOWN_WORD_ID,
            counting_done: false,
        }
    }
}

impl WordIndex for CountingWordIndex {
    const NEEDS_REGISTRATION: bool = true;
    const NEEDS_COUNTING: bool = true;
    const NEEDS_POST_ACTIONS: bool = false;
    const IS_CONTINUOUS: bool = true;

    fn reserve(&mut self, n: usize) {
        self.counts.reserve(n);
        self.word_to_id.reserve(n);
    }

    fn get_word_id(&self, text: &str) -> WordId {
        self.word_to_id.get(text).copied().unwrap_or(UNKNOWN_WORD_ID)
    }

    fn register_word(&mut self, text: &str) -> WordId {
        if let Some(&id) = self.word_to_id.get(text) {
            return id;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.word_to_id.insert(text.to_string(), id);
        id
    }

    fn len(&self) -> usize {
        self.word_to_id.len() - 1
    }

    fn count_word(&mut self, text: &str) {
        debug_assert!(!self.counting_done, "count_word called after do_post_word_count");
        if text == UNKNOWN_SURFACE {
            return;
        }
        *self.counts.entry(text.to_string()).or_insert(0) += 1;
    }

    /// Sorts the counted vocabulary by descending frequency (ties broken
    /// lexicographically for determinism) and re-issues ids in that order,
    /// so `next_id` after this call continues from the tail of the sorted
    /// range for any word seen only via `register_word` later. `<unk>`
    /// never enters the counted pool and keeps [`UNKNOWN_WORD_ID`].
    fn do_post_word_count(&mut self) {
        let mut entries: Vec<(String, u64)> = self.counts.drain().collect();
        entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        self.word_to_id.clear();
        self.word_to_id.insert(UNKNOWN_SURFACE.to_string(), UNKNOWN_WORD_ID);
        self.next_id = MIN_KNOWN_WORD_ID;
        for (word, _count) in entries {
            let id = self.next_id;
            self.next_id += 1;
            self.word_to_id.insert(word, id);
        }
        self.counting_done = true;
    }
}

impl super::optimizing::IntoWordEntries for CountingWordIndex {
    fn into_entries(self) -> Vec<(String, WordId)> {
        self.word_to_id.into_iter().collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::word_index::test_support::assert_continuous_ids;

    #[test]
    fn most_frequent_word_gets_lowest_id() {
        let mut idx = CountingWordIndex::new();
        for _ in 0..10 {
            idx.count_word("common");
        }
        idx.count_word("rare");
        idx.do_post_word_count();

        let common_id = idx.register_word("common");
        let rare_id = idx.register_word("rare");
        assert!(common_id < rare_id);
        assert_eq!(common_id, MIN_KNOWN_WORD_ID);
    }

    #[test]
    fn literal_unk_surface_is_pre_registered_and_excluded_from_ranking() {
        let mut idx = CountingWordIndex::new();
        assert_eq!(idx.get_word_id(super::UNKNOWN_SURFACE), UNKNOWN_WORD_ID);
        idx.count_word(super::UNKNOWN_SURFACE);
        idx.count_word(super::UNKNOWN_SURFACE);
        idx.count_word("rare");
        idx.do_post_word_count();
        assert_eq!(idx.get_word_id(super::UNKNOWN_SURFACE), UNKNOWN_WORD_ID);
        assert_eq!(idx.register_word("rare"), MIN_KNOWN_WORD_ID);
    }

    #[test]
    fn words_registered_after_counting_still_get_continuous_ids() {
        let mut idx = CountingWordIndex::new();
        idx.count_word("a");
        idx.count_word("b");
        idx.do_post_word_count();
        idx.register_word("a");
        idx.register_word("b");
        let c = idx.register_word("c");
        assert_eq!(c, MIN_KNOWN_WORD_ID + 2);
        assert_continuous_ids(&idx, &["a", "b", "c"]);
    }
}
