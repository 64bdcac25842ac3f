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

//! Line-oriented text reading support for the model builder: closure-based
//! field splitting generalized to the ARPA tab-separated and Moses
//! ` ||| `-separated record formats. No in-memory copy of the whole file:
//! lines are yielded one at a time from the underlying `BufRead`.

use std::io::{BufRead, Lines};

/// Yields `(1-based line number, line content)` pairs from a `BufRead`.
pub struct LineReader<R: BufRead> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        LineReader { lines: reader.lines(), line_no: 0 }
    }

    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = std::io::Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        self.line_no += 1;
        Some(line.map(|text| (self.line_no, text)))
    }
}

/// Splits `line` on the literal delimiter `delim` (e.g. Moses' `" ||| "`),
/// trimming each field. Does not allocate a copy of `line` itself.
pub fn split_fields<'a>(line: &'a str, delim: &str) -> Vec<&'a str> {
    line.split(delim).map(str::trim).collect()
}

/// Splits `line` on runs of ASCII whitespace (ARPA's token/column
/// separator).
pub fn split_whitespace_fields(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}
