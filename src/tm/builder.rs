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

//! Two build strategies for turning parsed phrase-table candidates into a
//! [`SourceEntry`]: counting then inserting (`TwoPassBuilder`), or
//! maintaining a bounded ordered list during a single pass
//! (`BoundedListBuilder`).
//!
//! Both take already line-parsed candidates -- text parsing is
//! [`crate::reader`] / [`crate::build`]'s job; this module only implements
//! the filtering, capping, and scoring rules that turn parsed candidates
//! into a [`SourceEntry`].

use super::source_entry::SourceEntry;
use super::target_entry::TargetEntry;
use crate::config::{Params, NUM_TM_FEATURES};
use crate::hash::str_hash64;
use crate::word_index::{WordId, WordIndex};

/// One not-yet-filtered target candidate read from a phrase-table line:
/// surface target phrase plus its four (or five, with phrase penalty
/// dropped upstream) raw feature probabilities.
#[derive(Debug, Clone)]
pub struct RawCandidate {
    pub target_phrase: String,
    pub raw_features: [f32; NUM_TM_FEATURES],
}

/// `tm_basic_builder` analog: counts/filters candidates for a source
/// phrase, caps at `trans_limit`, then builds a fully scored `SourceEntry`
/// in one step, over an in-memory candidate list (see DESIGN.md for the
/// collapsing of counting and insertion into a single pass).
pub struct TwoPassBuilder;

impl TwoPassBuilder {
    /// Returns `None` if no candidate survives the feature threshold, i.e.
    /// the source phrase has zero surviving targets.
    pub fn build<W, F>(
        source_phrase: &str,
        candidates: &[RawCandidate],
        params: &Params,
        word_index: &W,
        mut lm_score_fn: F,
    ) -> Option<SourceEntry>
    where
        W: WordIndex,
        F: FnMut(&[WordId]) -> f32,
    {
        let kept: Vec<&RawCandidate> = candidates
            .iter()
            .filter(|c| {
                c.raw_features[0] >= params.tm_min_trans_prob && c.raw_features[2] >= params.tm_min_trans_prob
            })
            .take(params.tm_trans_lim)
            .collect();
        if kept.is_empty() {
            return None;
        }

        let source_uid = str_hash64(source_phrase);
        let mut entry = SourceEntry::new(source_uid, kept.len());
        for candidate in kept {
            let token_ids: Vec<WordId> = candidate
                .target_phrase
                .split_whitespace()
                .map(|w| word_index.get_word_id(w))
                .collect();
            let features = TargetEntry::process_features(&candidate.raw_features, &params.tm_feature_weights);
            let lm_score = lm_score_fn(&token_ids);
            let target_uid = str_hash64(&candidate.target_phrase);
            entry.push_target(TargetEntry {
                target_uid,
                target_token_ids: token_ids,
                features,
                lm_score,
            });
        }
        entry.finalize();
        Some(entry)
    }
}

/// `tm_limiting_builder` analog: maintains a capacity-bounded, score-sorted
/// list of already-built `TargetEntry` values, evicting the lowest scorer
/// when a better candidate arrives. Use when candidates stream in
/// one-at-a-time rather than arriving as a pre-collected `Vec`.
pub struct BoundedListBuilder {
    trans_limit: usize,
    ordered: Vec<TargetEntry>,
}

impl BoundedListBuilder {
    pub fn new(trans_limit: usize) -> Self {
        BoundedListBuilder { trans_limit, ordered: Vec::new() }
    }

    /// Offers one candidate target, already filtered by the feature
    /// threshold at the call site. Keeps `ordered` sorted descending by
    /// [`TargetEntry::score_key`], capped at `trans_limit`.
    pub fn offer(&mut self, target: TargetEntry) {
        let key = target.score_key();
        let pos = self.ordered.partition_point(|t| t.score_key() > key);
        self.ordered.insert(pos, target);
        if self.ordered.len() > self.trans_limit {
            self.ordered.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Flushes the bounded list into a `SourceEntry`, or `None` if nothing
    /// was ever offered.
    pub fn finish(self, source_uid: u64) -> Option<SourceEntry> {
        if self.ordered.is_empty() {
            return None;
        }
        let mut entry = SourceEntry::new(source_uid, self.ordered.len());
        for target in self.ordered {
            entry.push_target(target);
        }
        Some(entry)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::word_index::basic::BasicWordIndex;

    fn candidate(phrase: &str, f: [f32; NUM_TM_FEATURES]) -> RawCandidate {
        RawCandidate { target_phrase: phrase.to_string(), raw_features: f }
    }

    #[test]
    fn two_pass_builder_drops_below_threshold_candidates() {
        let mut word_index = BasicWordIndex::new();
        word_index.register_word("b");
        let params = Params { tm_min_trans_prob: 0.001, ..Default::default() };
        let candidates = vec![
            candidate("b", [0.01, 0.5, 0.0005, 0.5]),
        ];
        let entry = TwoPassBuilder::build("a", &candidates, &params, &word_index, |_| 0.0);
        assert!(entry.is_none());
    }

    #[test]
    fn two_pass_builder_keeps_passing_candidate() {
        let mut word_index = BasicWordIndex::new();
        word_index.register_word("b");
        let params = Params { tm_min_trans_prob: 0.001, ..Default::default() };
        let candidates = vec![candidate("b", [0.01, 0.5, 0.0005, 0.5]), candidate("b", [0.01, 0.5, 0.5, 0.5])];
        let entry = TwoPassBuilder::build("a", &candidates, &params, &word_index, |_| 0.0).unwrap();
        assert_eq!(entry.targets().len(), 1);
    }

    #[test]
    fn two_pass_builder_respects_trans_limit() {
        let word_index = BasicWordIndex::new();
        let params = Params { tm_min_trans_prob: 0.0, tm_trans_lim: 2, ..Default::default() };
        let candidates: Vec<RawCandidate> = (0..5).map(|i| candidate("x", [0.5, 0.5, 0.5, i as f32 / 10.0])).collect();
        let entry = TwoPassBuilder::build("a", &candidates, &params, &word_index, |_| 0.0).unwrap();
        assert!(entry.targets().len() <= 2);
    }

    #[test]
    fn bounded_list_builder_evicts_the_lowest_scorer() {
        let mut builder = BoundedListBuilder::new(2);
        let mk = |uid, lm| TargetEntry {
            target_uid: uid,
            target_token_ids: vec![],
            features: [0.0; NUM_TM_FEATURES],
            lm_score: lm,
        };
        builder.offer(mk(1, 1.0));
        builder.offer(mk(2, 3.0));
        builder.offer(mk(3, 2.0));
        assert_eq!(builder.len(), 2);
        let entry = builder.finish(42).unwrap();
        let scores: Vec<f32> = entry.targets().iter().map(|t| t.lm_score).collect();
        assert_eq!(scores, vec![3.0, 2.0]);
    }
}
