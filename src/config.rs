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

//! Configuration parameters for building and sizing the storage engine.
//!
//! `Params` is a plain value passed into the builder and query objects --
//! there is no process-wide mutable singleton. It can optionally be loaded
//! from a JSON file, but construction from literal Rust values is the
//! primary path since this is a pure library.

use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

pub const NUM_TM_FEATURES: usize = 4;

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("buckets_factor must be >= 1.0, was {0}")]
    InvalidBucketsFactor(f64),

    #[error("tm_unk_features[{0}] must be > 0, was {1}")]
    InvalidUnkFeature(usize, f32),
}

/// The memory growth strategy for a [`crate::dynamic_array::DynamicArray`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MemIncStrategy {
    /// Always grow by `mem_inc_min` elements.
    Constant,
    /// Grow by `capacity * mem_inc_factor`, floored at `mem_inc_min`.
    Linear,
    /// Grow by `capacity / ln(capacity) * mem_inc_factor`.
    Log2,
    /// Grow by `capacity / log10(capacity) * mem_inc_factor`.
    Log10,
}

impl Default for MemIncStrategy {
    fn default() -> Self {
        MemIncStrategy::Linear
    }
}

impl MemIncStrategy {
    /// Computes the new capacity given the current one, per
    /// `MemIncreaseStrategy::computeNewCapacity` in the original.
    pub fn grow(&self, capacity: usize, factor: f32, min_inc: usize) -> usize {
        let fcap = if capacity > 0 { capacity as f32 } else { 1.0 };
        let raw = match self {
            MemIncStrategy::Constant => 0.0,
            MemIncStrategy::Linear => fcap,
            MemIncStrategy::Log2 => fcap / fcap.ln(),
            MemIncStrategy::Log10 => fcap / fcap.log10(),
        };
        let inc = (factor * raw) as usize;
        capacity + inc.max(min_inc)
    }
}

/// Per-level bucket sizing and growth configuration, plus translation
/// model feature weights.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Weight applied to log10 of the LM probability when used as a TM feature.
    pub lm_feature_lambda: f32,
    /// Per-feature weights (lambda_i) for the translation model.
    pub tm_feature_weights: [f32; NUM_TM_FEATURES],
    /// Raw feature values used to synthesize the unknown-source entry.
    pub tm_unk_features: [f32; NUM_TM_FEATURES],
    /// Maximum surviving targets per source phrase.
    pub tm_trans_lim: usize,
    /// Feature threshold for keeping a target (applies to feature[0] and feature[2]).
    pub tm_min_trans_prob: f32,
    /// Bucket count multiplier, per trie level.
    pub buckets_factor: f32,
    pub mem_inc_strategy: MemIncStrategy,
    pub mem_inc_factor: f32,
    pub mem_inc_min: usize,
    /// Enables the per-level bitmap hash cache.
    pub enable_bitmap_hash_cache: bool,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            lm_feature_lambda: 1.0,
            tm_feature_weights: [1.0; NUM_TM_FEATURES],
            tm_unk_features: [1e-5; NUM_TM_FEATURES],
            tm_trans_lim: 30,
            tm_min_trans_prob: 1e-4,
            buckets_factor: 2.0,
            mem_inc_strategy: MemIncStrategy::Linear,
            mem_inc_factor: 1.0,
            mem_inc_min: 8,
            enable_bitmap_hash_cache: false,
        }
    }
}

impl Params {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buckets_factor < 1.0 {
            return Err(ConfigError::InvalidBucketsFactor(self.buckets_factor as f64));
        }
        for (idx, f) in self.tm_unk_features.iter().enumerate() {
            if *f <= 0.0 {
                return Err(ConfigError::InvalidUnkFeature(idx, *f));
            }
        }
        Ok(())
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let params: Params = serde_json::from_reader(reader)?;
        params.validate()?;
        Ok(params)
    }

    /// Computes the bucket count for a non-unigram level, given the number
    /// of m-grams observed at that level: the next power of two that is
    /// `>= buckets_factor * count`.
    pub fn bucket_count(&self, count: usize) -> usize {
        let want = (self.buckets_factor as f64 * (count.max(1) as f64)).ceil() as usize;
        want.next_power_of_two().max(1)
    }
}
