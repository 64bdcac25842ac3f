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

//! Basic word index: a plain hash map assigning ids sequentially on first
//! sight. Continuous (ids never get reassigned after registration).

use super::{WordId, WordIndex, MIN_KNOWN_WORD_ID, UNKNOWN_SURFACE, UNKNOWN_WORD_ID};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct BasicWordIndex {
    word_to_id: HashMap<String, WordId>,
    next_id: WordId,
}

impl BasicWordIndex {
    pub fn new() -> Self {
        let mut word_to_id = HashMap::new();
        word_to_id.insert(UNKNOWN_SURFACE.to_string(), UNKNOWN_WORD_ID);
        BasicWordIndex {
            word_to_id,
            next_id: MIN_KNOWN_WORD_ID,
        }
    }
}

impl WordIndex for BasicWordIndex {
    const NEEDS_REGISTRATION: bool = true;
    const NEEDS_COUNTING: bool = false;
    const NEEDS_POST_ACTIONS: bool = false;
    const IS_CONTINUOUS: bool = true;

    fn reserve(&mut self, n: usize) {
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
}

impl super::optimizing::IntoWordEntries for BasicWordIndex {
    fn into_entries(self) -> Vec<(String, WordId)> {
        self.word_to_id.into_iter().collect()
    }
}
