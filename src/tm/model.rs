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

//! The frozen, query-only translation model: `source_uid -> SourceEntry`.
//! Built via [`TranslationModelBuilder`],
//! which also synthesizes the unknown-source sentinel entry at finalize
//! time.

use super::source_entry::SourceEntry;
use super::target_entry::TargetEntry;
use super::{PhraseUid, UNKNOWN_PHRASE_UID};
use crate::config::Params;
use crate::word_index::WordId;
use std::collections::HashMap;

pub struct TranslationModel {
    entries: HashMap<PhraseUid, SourceEntry>,
}

impl TranslationModel {
    pub fn get_source_entry(&self, source_uid: PhraseUid) -> Option<&SourceEntry> {
        self.entries.get(&source_uid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accumulates built `SourceEntry` values and freezes them into a
/// [`TranslationModel`]. Not `Sync`; discarded once `finalize` runs.
#[derive(Default)]
pub struct TranslationModelBuilder {
    entries: HashMap<PhraseUid, SourceEntry>,
}

impl TranslationModelBuilder {
    pub fn new() -> Self {
        TranslationModelBuilder { entries: HashMap::new() }
    }

    pub fn insert(&mut self, entry: SourceEntry) {
        self.entries.insert(entry.source_uid, entry);
    }

    /// Synthesizes the unknown-source entry -- one target carrying
    /// `params.tm_unk_features` processed the same way as every other
    /// target, the configured unknown-target surface's word ids, and the
    /// LM engine's unknown-word probability -- then freezes the model.
    pub fn finalize(
        mut self,
        params: &Params,
        unk_target_token_ids: Vec<WordId>,
        lm_unknown_score: f32,
    ) -> TranslationModel {
        let features = TargetEntry::process_features(&params.tm_unk_features, &params.tm_feature_weights);
        let unk_target = TargetEntry {
            target_uid: UNKNOWN_PHRASE_UID,
            target_token_ids: unk_target_token_ids,
            features,
            lm_score: lm_unknown_score,
        };
        let mut unk_entry = SourceEntry::new(UNKNOWN_PHRASE_UID, 1);
        unk_entry.push_target(unk_target);
        unk_entry.finalize();
        self.entries.insert(UNKNOWN_PHRASE_UID, unk_entry);

        TranslationModel { entries: self.entries }
    }
}
