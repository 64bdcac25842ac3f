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

//! The model builder. A stateless orchestrator invoked once per model:
//! reads the ARPA-like LM text and the Moses-style phrase table, drives
//! the word index and trie through their build lifecycle, and runs the
//! two-pass translation-model build.
//!
//! Malformed-line errors carry their line number and content via
//! [`LineError`] rather than surfacing a bare parse failure.

use std::collections::HashMap;
use std::io::BufRead;

use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use thiserror::Error;

use crate::config::{Params, NUM_TM_FEATURES};
use crate::lm;
use crate::reader::{split_fields, split_whitespace_fields, LineReader};
use crate::tm::builder::{RawCandidate, TwoPassBuilder};
use crate::tm::model::{TranslationModel, TranslationModelBuilder};
use crate::trie::{GramPayload, Trie};
use crate::word_index::WordIndex;

/// Surface form used for the out-of-vocabulary word/phrase, matching the
/// ARPA/Moses convention of reserving `<s>`, `</s>`, and `<unk>`.
pub use crate::word_index::UNKNOWN_SURFACE;

lazy_static! {
    /// Matches an ARPA count-header line, e.g. `ngram 2=15000`.
    static ref NGRAM_COUNT_LINE: Regex = Regex::new(r"^ngram\s+(\d+)=(\d+)$").unwrap();
    /// Matches an m-grams section marker, e.g. `\2-grams:`.
    static ref SECTION_HEADER: Regex = Regex::new(r"^\\(\d+)-grams:$").unwrap();
}

#[derive(Error, Debug)]
pub enum LineErrorKind {
    #[error("expected {expected} whitespace-separated fields (log-prob, {expected_tokens} tokens[, back-off]), found {found}")]
    MGramFieldCount { expected: usize, expected_tokens: usize, found: usize },
    #[error("expected at least 3 ` ||| `-separated fields (source, target, features), found {found}")]
    PhraseFieldCount { found: usize },
    #[error("feature count mismatch: expected {expected}, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },
    #[error("could not parse {field:?} as a number: {text:?}")]
    UnparsableNumber { field: &'static str, text: String },
    #[error("expected an ngram count header line like \"ngram 1=100\", found {0:?}")]
    MalformedCountHeader(String),
    #[error("expected a \"\\N-grams:\" section header, found {0:?}")]
    MalformedSectionHeader(String),
}

/// Wraps a [`LineErrorKind`] with the 1-based line number it occurred on,
/// so the error message identifies the offending line content (spec
/// §4.J: "malformed lines are rejected with a fatal error message that
/// identifies line content").
#[derive(Error, Debug)]
#[error("line {line}: {cause}")]
pub struct LineError {
    pub line: usize,
    pub cause: LineErrorKind,
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BuildError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Line(#[from] LineError),
}

fn parse_f32(field: &str, name: &'static str) -> Result<f32, LineErrorKind> {
    field
        .parse::<f32>()
        .map_err(|_| LineErrorKind::UnparsableNumber { field: name, text: field.to_string() })
}

/// Stateless orchestrator for loading a language model and/or a
/// translation model into their respective storage structures.
pub struct ModelBuilder;

impl ModelBuilder {
    /// Parses the ARPA-like LM header (`ngram <level>=<count>` lines) up
    /// to and including the first `\<level>-grams:` section marker,
    /// returning the per-level m-gram counts.
    fn parse_header<R: BufRead>(reader: &mut LineReader<R>, max_level: usize) -> Result<Vec<usize>, BuildError> {
        let mut counts = vec![0usize; max_level];
        let mut seen = 0;
        while seen < max_level {
            let (line_no, line) = match reader.next() {
                Some(r) => r?,
                None => break,
            };
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed == "\\data\\" {
                continue;
            }
            if let Some(caps) = NGRAM_COUNT_LINE.captures(trimmed) {
                let level: usize = caps[1].parse().expect("regex guarantees digits");
                let count: usize = caps[2].parse().expect("regex guarantees digits");
                if level >= 1 && level <= max_level {
                    counts[level - 1] = count;
                    seen += 1;
                }
                continue;
            }
            // first section header ends the count-header block.
            if trimmed.starts_with('\\') {
                break;
            }
            return Err(LineError { line: line_no, cause: LineErrorKind::MalformedCountHeader(trimmed.to_string()) }.into());
        }
        Ok(counts)
    }

    /// Parses one `log10_prob \t tokens... \t [back_off]` line at a known
    /// level.
    fn parse_mgram_line(
        line_no: usize,
        line: &str,
        level: usize,
        max_level: usize,
    ) -> Result<(f32, Vec<String>, Option<f32>), LineError> {
        let fields: Vec<&str> = line.split('\t').map(str::trim).filter(|f| !f.is_empty()).collect();
        let min_fields = 1 + level;
        let has_back_off = level < max_level;
        if fields.len() < min_fields {
            return Err(LineError {
                line: line_no,
                cause: LineErrorKind::MGramFieldCount { expected: min_fields, expected_tokens: level, found: fields.len() },
            });
        }

        let log_prob = parse_f32(fields[0], "log10_prob").map_err(|cause| LineError { line: line_no, cause })?;
        let tokens: Vec<String> = fields[1..1 + level].iter().map(|s| s.to_string()).collect();
        let back_off = if has_back_off && fields.len() > 1 + level {
            Some(parse_f32(fields[1 + level], "back_off").map_err(|cause| LineError { line: line_no, cause })?)
        } else {
            None
        };
        Ok((log_prob, tokens, back_off))
    }

    /// Loads an ARPA-like language model: header counts, then
    /// `\m-grams:` sections of `log10_prob \t tokens… \t [back_off]`
    /// lines. Drives `word_index` (registering every token) and `trie`
    /// (`pre_allocate` then level-ordered `add_m_gram` / `post_grams`).
    pub fn load_language_model<R: BufRead, W: WordIndex>(
        reader: R,
        params: &Params,
        word_index: &mut W,
        trie: &mut Trie,
    ) -> Result<(), BuildError> {
        let max_level = trie.max_level();
        let mut lines = LineReader::new(reader);
        let counts = Self::parse_header(&mut lines, max_level)?;
        debug!("parsed LM header counts: {:?}", counts);
        trie.pre_allocate(&counts, params);

        let mut current_level = 0usize;
        while let Some(result) = lines.next() {
            let (line_no, line) = result?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed == "\\end\\" {
                break;
            }
            if let Some(caps) = SECTION_HEADER.captures(trimmed) {
                if current_level >= 2 {
                    trie.post_grams(current_level);
                    info!("finished level {} ({} buckets populated)", current_level, counts[current_level - 1]);
                }
                current_level = caps[1].parse().expect("regex guarantees digits");
                continue;
            }
            if trimmed.starts_with('\\') {
                return Err(LineError { line: line_no, cause: LineErrorKind::MalformedSectionHeader(trimmed.to_string()) }.into());
            }

            let (log_prob, tokens, back_off) = Self::parse_mgram_line(line_no, trimmed, current_level, max_level)?;
            let word_ids: Vec<_> = tokens.iter().map(|t| word_index.register_word(t)).collect();
            let payload = if current_level == max_level {
                GramPayload::Final { log_prob }
            } else {
                GramPayload::Interior { log_prob, back_off: back_off.unwrap_or(0.0) }
            };
            trie.add_m_gram(&word_ids, payload);
        }
        if current_level >= 2 {
            trie.post_grams(current_level);
        }
        Ok(())
    }

    /// Loads a Moses-style phrase table: one entry per line, fields
    /// separated by `" ||| "`. Four scores are mandatory (inverse φ,
    /// inverse lex, direct φ, direct lex); an optional phrase-penalty
    /// field is accepted and ignored. Rejects a line below
    /// `params.tm_min_trans_prob` on inverse or direct φ at the per-source
    /// filtering stage inside [`TwoPassBuilder`].
    pub fn load_phrase_table<R: BufRead, W: WordIndex>(
        reader: R,
        params: &Params,
        word_index: &W,
        trie: &Trie,
    ) -> Result<TranslationModel, BuildError> {
        let mut by_source: HashMap<String, Vec<RawCandidate>> = HashMap::new();

        for result in LineReader::new(reader) {
            let (line_no, line) = result?;
            if line.trim().is_empty() {
                continue;
            }
            let fields = split_fields(&line, " ||| ");
            if fields.len() < 3 {
                return Err(LineError { line: line_no, cause: LineErrorKind::PhraseFieldCount { found: fields.len() } }.into());
            }
            let source_phrase = fields[0].to_string();
            let target_phrase = fields[1].to_string();
            let score_fields = split_whitespace_fields(fields[2]);
            if score_fields.len() < NUM_TM_FEATURES {
                return Err(LineError {
                    line: line_no,
                    cause: LineErrorKind::FeatureCountMismatch { expected: NUM_TM_FEATURES, actual: score_fields.len() },
                }
                .into());
            }
            let mut raw_features = [0.0f32; NUM_TM_FEATURES];
            for (i, slot) in raw_features.iter_mut().enumerate() {
                *slot = parse_f32(score_fields[i], "tm_feature").map_err(|cause| LineError { line: line_no, cause })?;
            }

            by_source
                .entry(source_phrase)
                .or_default()
                .push(RawCandidate { target_phrase, raw_features });
        }
        info!("read {} distinct source phrases from the phrase table", by_source.len());

        let mut builder = TranslationModelBuilder::new();
        for (source_phrase, candidates) in by_source {
            let entry = TwoPassBuilder::build(&source_phrase, &candidates, params, word_index, |tokens| {
                lm::score(trie, tokens, 1)
            });
            if let Some(entry) = entry {
                builder.insert(entry);
            }
        }

        let unk_token_ids = vec![word_index.get_word_id(UNKNOWN_SURFACE)];
        let unk_lm_score = lm::score(trie, &unk_token_ids, 1);
        Ok(builder.finalize(params, unk_token_ids, unk_lm_score))
    }

    /// Convenience wrapper over [`Self::load_language_model`] for a
    /// memory-mapped or in-memory file (see [`crate::storage::Storage`]).
    pub fn load_language_model_from_storage<W: WordIndex>(
        storage: &crate::storage::Storage,
        params: &Params,
        word_index: &mut W,
        trie: &mut Trie,
    ) -> Result<(), BuildError> {
        Self::load_language_model(storage.cursor(), params, word_index, trie)
    }

    /// Convenience wrapper over [`Self::load_phrase_table`] for a
    /// memory-mapped or in-memory file (see [`crate::storage::Storage`]).
    pub fn load_phrase_table_from_storage<W: WordIndex>(
        storage: &crate::storage::Storage,
        params: &Params,
        word_index: &W,
        trie: &Trie,
    ) -> Result<TranslationModel, BuildError> {
        Self::load_phrase_table(storage.cursor(), params, word_index, trie)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::trie::BucketMode;
    use crate::word_index::basic::BasicWordIndex;
    use std::io::Cursor;

    fn arpa_fixture() -> &'static str {
        "\\data\\\nngram 1=2\nngram 2=1\n\\1-grams:\n-1.0\ta\t-0.5\n-2.0\tb\t0.0\n\\2-grams:\n-0.3\ta\tb\n\\end\\\n"
    }

    #[test]
    fn loads_arpa_fixture_and_scores_bigram() {
        let mut word_index = BasicWordIndex::new();
        let mut trie = Trie::new(2, BucketMode::ByteId);
        let params = Params::default();
        ModelBuilder::load_language_model(Cursor::new(arpa_fixture()), &params, &mut word_index, &mut trie).unwrap();

        let a = word_index.get_word_id("a");
        let b = word_index.get_word_id("b");
        let score = lm::score(&trie, &[a, b], 2);
        assert!((score - (-0.3)).abs() < 1e-6);
    }

    #[test]
    fn rejects_malformed_mgram_line() {
        let bad = "\\data\\\nngram 1=1\n\\1-grams:\nnot-a-number\ta\n\\end\\\n";
        let mut word_index = BasicWordIndex::new();
        let mut trie = Trie::new(1, BucketMode::ByteId);
        let params = Params::default();
        let result = ModelBuilder::load_language_model(Cursor::new(bad), &params, &mut word_index, &mut trie);
        assert!(result.is_err());
    }

    #[test]
    fn loads_language_model_from_owned_storage() {
        let storage = crate::storage::Storage::from_owned(arpa_fixture().as_bytes().to_vec());
        let mut word_index = BasicWordIndex::new();
        let mut trie = Trie::new(2, BucketMode::ByteId);
        let params = Params::default();
        ModelBuilder::load_language_model_from_storage(&storage, &params, &mut word_index, &mut trie).unwrap();
        assert_eq!(word_index.get_word_id("a"), word_index.get_word_id("a"));
    }

    #[test]
    fn loads_phrase_table_and_drops_low_scoring_candidates() {
        let mut word_index = BasicWordIndex::new();
        word_index.register_word("b");
        let mut trie = Trie::new(1, BucketMode::ByteId);
        trie.pre_allocate(&[4], &Params::default());

        let moses = "a ||| b ||| 0.01 0.5 0.0005 0.5 ||| extra\nc ||| b ||| 0.01 0.5 0.5 0.5 ||| extra\n";
        let params = Params { tm_min_trans_prob: 0.001, ..Default::default() };
        let model = ModelBuilder::load_phrase_table(Cursor::new(moses), &params, &word_index, &trie).unwrap();

        assert!(model.get_source_entry(crate::hash::str_hash64("a")).is_none());
        assert!(model.get_source_entry(crate::hash::str_hash64("c")).is_some());
        assert!(model.get_source_entry(crate::tm::UNKNOWN_PHRASE_UID).is_some());
    }
}
