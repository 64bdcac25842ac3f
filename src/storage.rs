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

//! Backing storage for a source text file: a large ARPA/Moses dump can be
//! memory-mapped instead of read fully into the heap before
//! [`crate::build::ModelBuilder`] parses it line by line.

use std::fs::File;
use std::io::Cursor;
use std::path::Path;

use memmap2::Mmap;

pub enum Storage {
    File(Mmap),
    Owned(Vec<u8>),
}

impl AsRef<[u8]> for Storage {
    fn as_ref(&self) -> &[u8] {
        match self {
            Storage::File(m) => m.as_ref(),
            Storage::Owned(v) => v.as_ref(),
        }
    }
}

impl Storage {
    /// Memory-maps `path`. The caller must ensure the file is not mutated
    /// out from under the mapping while it's in use.
    pub fn map_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Storage::File(mmap))
    }

    /// Wraps an in-memory buffer, for callers that already have the text
    /// (e.g. fetched over the network, or a test fixture).
    pub fn from_owned(bytes: Vec<u8>) -> Self {
        Storage::Owned(bytes)
    }

    /// A `BufRead`-compatible cursor over the storage's bytes, suitable for
    /// [`crate::reader::LineReader`].
    pub fn cursor(&self) -> Cursor<&[u8]> {
        Cursor::new(self.as_ref())
    }
}
