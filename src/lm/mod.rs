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

//! The LM query engine. Computes the cumulative log probability of a
//! token sequence with Katz-style back-off through a resumable query
//! object with a no-branch, inlined-lookup hot path.
//!
//! A query holds no locks after model freeze: all scratch state (the
//! token buffer, running total) lives on the query object itself.

use crate::trie::{GramLookup, GramPayload, Trie};
use crate::word_index::{WordId, UNKNOWN_WORD_ID};

/// Upper bound on a single query's token sequence length. Chosen generously
/// above any realistic decoder hypothesis length; exceeding it is a
/// programming error, not a data condition, so it is asserted rather than
/// surfaced as a typed error.
pub const MAX_QUERY_LEN: usize = 256;

/// Scores one sub-m-gram `w_{a..b}` (`word_ids` in left-to-right order),
/// applying Katz back-off recursively when the trie has no entry for the
/// full span.
fn score_mgram(trie: &Trie, word_ids: &[WordId]) -> f32 {
    match trie.get_payload(word_ids) {
        GramLookup::Found(p) => p.log_prob(),
        GramLookup::NotFound | GramLookup::EndUnknown => {
            if word_ids.len() == 1 {
                match trie.get_payload(&[UNKNOWN_WORD_ID]) {
                    GramLookup::Found(p) => p.log_prob(),
                    _ => GramPayload::UNKNOWN.log_prob(),
                }
            } else {
                let prefix = &word_ids[..word_ids.len() - 1];
                let back_off = match trie.get_payload(prefix) {
                    GramLookup::Found(p) => p.back_off(),
                    _ => crate::trie::ZERO_BACK_OFF,
                };
                let suffix = &word_ids[1..];
                back_off + score_mgram(trie, suffix)
            }
        }
    }
}

/// Scores `tokens[min_level - 1..]` against `trie`, summing each
/// position's conditional log probability. One-shot convenience over
/// [`ResumableQuery`] for callers that have the whole sequence up front.
pub fn score(trie: &Trie, tokens: &[WordId], min_level: usize) -> f32 {
    ResumableQuery::new(trie).extend(tokens, min_level)
}

/// A query object that can be extended with additional right-context
/// tokens across calls, so a decoder can reuse partial scores across
/// hypothesis expansions instead of rescoring the whole prefix (spec
/// §4.H "Ordering and resumption").
pub struct ResumableQuery<'a> {
    trie: &'a Trie,
    tokens: Vec<WordId>,
    total: f32,
}

impl<'a> ResumableQuery<'a> {
    pub fn new(trie: &'a Trie) -> Self {
        ResumableQuery { trie, tokens: Vec::new(), total: 0.0 }
    }

    /// Appends `new_tokens` to the sequence scored so far and adds the
    /// incremental score for every newly covered position starting at
    /// `min_level` (1-based, counted over the *whole* sequence including
    /// previously fed tokens). Returns the updated running total.
    pub fn extend(&mut self, new_tokens: &[WordId], min_level: usize) -> f32 {
        self.tokens.extend_from_slice(new_tokens);
        assert!(
            self.tokens.len() <= MAX_QUERY_LEN,
            "query sequence length {} exceeds MAX_QUERY_LEN",
            self.tokens.len()
        );
        assert!(
            min_level >= 1 && min_level <= self.tokens.len(),
            "min_level {} out of range for sequence length {}",
            min_level,
            self.tokens.len()
        );

        let n = self.trie.max_level();
        for i in min_level..=self.tokens.len() {
            let m = n.min(i);
            let start = i - m;
            self.total += score_mgram(self.trie, &self.tokens[start..i]);
        }
        self.total
    }

    pub fn total(&self) -> f32 {
        self.total
    }

    pub fn tokens(&self) -> &[WordId] {
        &self.tokens
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::trie::{BucketMode, Trie};
    use crate::config::Params;

    fn trie_with_unigram_unk(log_prob: f32) -> Trie {
        let mut trie = Trie::new(1, BucketMode::ByteId);
        trie.pre_allocate(&[4], &Params::default());
        trie.add_m_gram(&[UNKNOWN_WORD_ID], GramPayload::Interior { log_prob, back_off: 0.0 });
        trie
    }

    #[test]
    fn s1_unigram_lookup() {
        let trie = trie_with_unigram_unk(-5.0);
        let result = score(&trie, &[UNKNOWN_WORD_ID], 1);
        assert_eq!(result, -5.0);
    }

    #[test]
    fn s2_bigram_back_off() {
        let mut trie = Trie::new(2, BucketMode::ByteId);
        trie.pre_allocate(&[4, 4], &Params::default());
        let a = 2u32;
        let b = 3u32;
        trie.add_m_gram(&[a], GramPayload::Interior { log_prob: -1.0, back_off: -0.5 });
        trie.add_m_gram(&[b], GramPayload::Interior { log_prob: -2.0, back_off: 0.0 });
        trie.post_grams(2);

        let result = score(&trie, &[a, b], 2);
        assert!((result - (-2.5)).abs() < 1e-6);
    }

    #[test]
    fn s3_trigram_hit_skips_back_off() {
        let mut trie = Trie::new(3, BucketMode::ByteId);
        trie.pre_allocate(&[5, 4, 2], &Params::default());
        let a = 2u32;
        let b = 3u32;
        let c = 4u32;
        trie.add_m_gram(&[a], GramPayload::Interior { log_prob: -1.0, back_off: -0.5 });
        trie.add_m_gram(&[b], GramPayload::Interior { log_prob: -2.0, back_off: 0.0 });
        trie.add_m_gram(&[c], GramPayload::Interior { log_prob: -3.0, back_off: 0.0 });
        trie.post_grams(2);
        trie.add_m_gram(&[a, b, c], GramPayload::Final { log_prob: -0.7 });
        trie.post_grams(3);

        let result = score(&trie, &[a, b, c], 3);
        assert!((result - (-0.7)).abs() < 1e-6);
    }

    #[test]
    fn resumable_query_matches_one_shot_score() {
        let mut trie = Trie::new(2, BucketMode::ByteId);
        trie.pre_allocate(&[4, 4], &Params::default());
        let a = 2u32;
        let b = 3u32;
        trie.add_m_gram(&[a], GramPayload::Interior { log_prob: -1.0, back_off: -0.5 });
        trie.add_m_gram(&[b], GramPayload::Interior { log_prob: -2.0, back_off: 0.0 });
        trie.post_grams(2);

        let one_shot = score(&trie, &[a, b], 1);

        let mut q = ResumableQuery::new(&trie);
        q.extend(&[a], 1);
        let resumed = q.extend(&[b], 2);
        assert!((one_shot - resumed).abs() < 1e-6);
    }
}
