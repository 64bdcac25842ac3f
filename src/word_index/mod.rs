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

//! Token -> word-id mapping, with four trade-off variants.
//!
//! The four variants share one capability trait (`WordIndex`) with
//! associated const capability flags, so the builder (`crate::build`) can
//! branch on capability at compile time instead of through dynamic
//! dispatch.
//!
//! Lifecycle, shared by all variants: `reserve` -> (`count_word`)* ->
//! `do_post_word_count` -> (`register_word` / `get_word_id`)* ->
//! `do_post_actions` -> frozen. Variants that don't need a given phase
//! implement it as a no-op (the default trait method).

pub mod basic;
pub mod counting;
pub mod hashing;
pub mod optimizing;

/// Compact integer surrogate for a surface token.
pub type WordId = u32;

/// Reserved id meaning "no word assigned yet".
pub const UNDEFINED_WORD_ID: WordId = 0;
/// Reserved id for the out-of-vocabulary token.
pub const UNKNOWN_WORD_ID: WordId = 1;
/// First id available for a real, known word.
pub const MIN_KNOWN_WORD_ID: WordId = 2;

/// Surface form that must always resolve to [`UNKNOWN_WORD_ID`], matching
/// the ARPA/Moses convention of reserving `<unk>`.
pub const UNKNOWN_SURFACE: &str = "<unk>";

/// Shared query+register capability for every word-index variant.
pub trait WordIndex {
    /// Whether `register_word` must be called to mint new ids (false only
    /// for Hashing, which derives ids directly from the token text).
    const NEEDS_REGISTRATION: bool;
    /// Whether a counting phase (`count_word` / `do_post_word_count`)
    /// affects id assignment.
    const NEEDS_COUNTING: bool;
    /// Whether `do_post_actions` performs meaningful work (true only for
    /// Optimizing, which freezes into a fixed hash map at that point).
    const NEEDS_POST_ACTIONS: bool;
    /// Whether new words may still be registered after the post-count
    /// phase (false for Optimizing, whose fixed table is sized up front).
    const IS_CONTINUOUS: bool;

    /// Hints the expected vocabulary size so the backing storage can be
    /// pre-sized.
    fn reserve(&mut self, n: usize);

    /// Looks up `text`'s word id, returning [`UNKNOWN_WORD_ID`] if absent.
    fn get_word_id(&self, text: &str) -> WordId;

    /// Registers `text`, returning its word id -- either newly minted or
    /// the one already on file.
    fn register_word(&mut self, text: &str) -> WordId;

    /// Number of distinct known words registered so far (excludes the
    /// reserved `UNKNOWN`/`UNDEFINED` ids).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Counting-phase hook; a no-op unless `NEEDS_COUNTING`.
    fn count_word(&mut self, _text: &str) {}

    /// Runs after all `count_word` calls, before any `register_word` /
    /// `get_word_id`; a no-op unless `NEEDS_COUNTING`.
    fn do_post_word_count(&mut self) {}
}
