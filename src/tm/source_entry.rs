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

//! A source phrase's bounded, score-ordered target list.

use super::target_entry::TargetEntry;
use super::PhraseUid;

#[derive(Debug, Clone)]
pub struct SourceEntry {
    pub source_uid: PhraseUid,
    targets: Vec<TargetEntry>,
}

impl SourceEntry {
    pub fn new(source_uid: PhraseUid, capacity: usize) -> Self {
        SourceEntry {
            source_uid,
            targets: Vec::with_capacity(capacity),
        }
    }

    pub fn push_target(&mut self, target: TargetEntry) {
        self.targets.push(target);
    }

    pub fn targets(&self) -> &[TargetEntry] {
        &self.targets
    }

    /// Sorts targets into descending score order. Must be called once,
    /// after every target has been pushed.
    pub fn finalize(&mut self) {
        self.targets
            .sort_unstable_by(|a, b| b.score_key().partial_cmp(&a.score_key()).unwrap_or(std::cmp::Ordering::Equal));
    }
}
