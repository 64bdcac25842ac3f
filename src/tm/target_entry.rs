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

//! A single target-phrase candidate for a source phrase: target token
//! ids, a post-processed feature vector, and a precomputed LM score.

use super::PhraseUid;
use crate::config::NUM_TM_FEATURES;
use crate::word_index::WordId;

#[derive(Debug, Clone)]
pub struct TargetEntry {
    pub target_uid: PhraseUid,
    pub target_token_ids: Vec<WordId>,
    pub features: [f32; NUM_TM_FEATURES],
    pub lm_score: f32,
}

impl TargetEntry {
    /// Converts raw feature probabilities into `log10(f_i) * lambda_i`.
    pub fn process_features(raw: &[f32; NUM_TM_FEATURES], weights: &[f32; NUM_TM_FEATURES]) -> [f32; NUM_TM_FEATURES] {
        let mut out = [0.0f32; NUM_TM_FEATURES];
        for i in 0..NUM_TM_FEATURES {
            out[i] = raw[i].log10() * weights[i];
        }
        out
    }

    /// Aggregate ranking key used to keep the per-source target list
    /// score-ordered: the sum of the post-processed features plus the LM
    /// score, matching the bounded-list builder's linear-combination-of-
    /// features ordering rule.
    pub fn score_key(&self) -> f32 {
        self.features.iter().sum::<f32>() + self.lm_score
    }
}
