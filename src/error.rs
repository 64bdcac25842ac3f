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

use thiserror::Error;

use crate::build::BuildError;
use crate::config::ConfigError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Top level error for the storage engine.
///
/// Query-path failures are never represented here: `Trie::get_payload`,
/// `TranslationModel::get_source_entry` and the LM query engine return
/// status enums instead of `Result`: a missing key on query is an expected
/// outcome, not an error. This type only covers build-phase and
/// configuration failures, which are always fatal to the load.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StoreError {
    #[error("{context}: {cause}")]
    Io {
        cause: std::io::Error,
        context: String,
    },

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),

    #[error("Level misuse: {0}")]
    LevelMisuse(String),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io {
            cause: e,
            context: String::from("IO error"),
        }
    }
}

impl StoreError {
    pub fn with_context<S: Into<String>>(self, ctx: S) -> Self {
        match self {
            StoreError::Io { cause, .. } => StoreError::Io {
                cause,
                context: ctx.into(),
            },
            other => other,
        }
    }
}
