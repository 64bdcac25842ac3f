/*
 *  Copyright (c) 2021 Works Applications Co., Ltd.
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *   Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! An in-memory storage engine for n-gram language models and phrase
//! translation tables: the read-hot-path half of a statistical machine
//! translation back-end. Build a model once from ARPA/Moses text via
//! [`build::ModelBuilder`], then query it concurrently from as many
//! readers as you like -- nothing in the frozen structures mutates after
//! `post_grams`/`finalize` return.
//!
//! There is no decoder, no CLI, and no network layer here; see
//! `DESIGN.md` for what this crate intentionally leaves out.

pub mod bitio;
pub mod build;
pub mod config;
pub mod dynamic_array;
pub mod error;
pub mod fixed_hash_map;
pub mod hash;
pub mod lm;
pub mod mgram_id;
pub mod reader;
pub mod storage;
pub mod tm;
pub mod trie;
pub mod word_index;

pub mod prelude {
    pub use crate::build::ModelBuilder;
    pub use crate::config::Params;
    pub use crate::error::{StoreError, StoreResult};
    pub use crate::lm::{score, ResumableQuery};
    pub use crate::tm::model::TranslationModel;
    pub use crate::trie::{GramLookup, GramPayload, Trie};
    pub use crate::word_index::{WordId, WordIndex};
}
