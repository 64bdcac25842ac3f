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

//! The byte-packed m-gram id codec.
//!
//! An m-gram id is `[type_bytes | word_bytes[m-1] | ... | word_bytes[0]]`.
//! `type_bytes` records, per word position, how many
//! bytes (1..=4) that word's id occupies; the words themselves are then
//! stored back-to-front since the last word of an m-gram is usually the
//! most discriminating one for bucket lookup.
//!
//! Only the byte-packed variant is implemented; a bit-packed sibling
//! codec was never wired into the active G2DMap trie.

use crate::bitio::{bytes_needed, copy_end_bits_to_pos, read_be_bytes};
use std::cmp::Ordering;

/// Minimum supported m-gram level for the codec. Unigrams (m=1) are
/// direct-indexed by the trie and never go through this codec.
pub const MIN_LEVEL: usize = 2;
/// Maximum supported m-gram level: the `type_bytes` width table below only
/// covers up to 6, matching the source.
pub const MAX_LEVEL: usize = 6;

/// Number of bytes used to encode the `type` field, by m-gram level.
/// `4^m` possible width combinations fit in `ceil(log2(4^m) / 8)` bytes:
/// 1 byte for m in {2,3,4} (up to 4^4 = 256 combinations), 2 bytes for
/// m in {5,6} (up to 4^6 = 4096 combinations).
pub fn type_bytes_len(level: usize) -> usize {
    match level {
        2 | 3 | 4 => 1,
        5 | 6 => 2,
        _ => panic!("unsupported m-gram level {} for the byte-packed id codec", level),
    }
}

/// An owned, self-describing m-gram id. Ownership lives with the bucket
/// entry that created it; `compare`/`decode` only ever borrow it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MGramId(Box<[u8]>);

impl MGramId {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Encodes a level-`m` tuple of word ids into a byte id. `word_ids.len()`
/// is the m-gram level and must be in `[MIN_LEVEL, MAX_LEVEL]`.
pub fn create(word_ids: &[u32]) -> MGramId {
    let m = word_ids.len();
    assert!(
        (MIN_LEVEL..=MAX_LEVEL).contains(&m),
        "m-gram level {} out of supported range [{}, {}]",
        m,
        MIN_LEVEL,
        MAX_LEVEL
    );

    let mut widths = [0u8; MAX_LEVEL];
    let mut type_val: u32 = 0;
    for (i, &w) in word_ids.iter().enumerate() {
        let width = bytes_needed(w);
        widths[i] = width;
        type_val += (width as u32 - 1) * 4u32.pow(i as u32);
    }

    let type_len = type_bytes_len(m);
    let body_len: usize = widths[..m].iter().map(|&w| w as usize).sum();
    let total_len = type_len + body_len;
    let mut buf = vec![0u8; total_len];

    copy_end_bits_to_pos(type_val, (type_len * 8) as u32, &mut buf, 0);

    let mut offset = type_len;
    for i in (0..m).rev() {
        let width = widths[i] as usize;
        copy_end_bits_to_pos(word_ids[i], (width * 8) as u32, &mut buf, offset * 8);
        offset += width;
    }

    MGramId(buf.into_boxed_slice())
}

/// Reads back the `type` integer for a level-`m` id.
fn type_value(id: &[u8], m: usize) -> u32 {
    let type_len = type_bytes_len(m);
    read_be_bytes(id, 0, type_len)
}

/// Decodes the per-word byte widths encoded in `type_val` for a level-`m`
/// id, in word-position order (`widths[0]` is the width of `word_ids[0]`).
fn decode_widths(type_val: u32, m: usize) -> [u8; MAX_LEVEL] {
    let mut widths = [0u8; MAX_LEVEL];
    let mut rem = type_val;
    for w in widths.iter_mut().take(m) {
        *w = (rem % 4) as u8 + 1;
        rem /= 4;
    }
    widths
}

/// Total byte length of a level-`m` id, given only its bytes. The length
/// is uniquely recoverable from `type_bytes` plus the known level.
pub fn length_of(id: &[u8], m: usize) -> usize {
    let type_val = type_value(id, m);
    let widths = decode_widths(type_val, m);
    type_bytes_len(m) + widths[..m].iter().map(|&w| w as usize).sum::<usize>()
}

/// Decodes a level-`m` id back into its word id tuple.
pub fn decode(id: &[u8], m: usize) -> Vec<u32> {
    let type_val = type_value(id, m);
    let widths = decode_widths(type_val, m);
    let mut word_ids = vec![0u32; m];
    let mut offset = type_bytes_len(m);
    for i in (0..m).rev() {
        let width = widths[i] as usize;
        word_ids[i] = read_be_bytes(id, offset, width);
        offset += width;
    }
    word_ids
}

/// Compares two level-`m` ids: `type` fields first (numerically), then a
/// byte-wise comparison of the remaining (word) bytes. Equal types imply
/// equal total lengths, since the type uniquely determines every word's
/// byte width.
pub fn compare(a: &[u8], b: &[u8], m: usize) -> Ordering {
    let ta = type_value(a, m);
    let tb = type_value(b, m);
    match ta.cmp(&tb) {
        Ordering::Equal => {
            let type_len = type_bytes_len(m);
            a[type_len..].cmp(&b[type_len..])
        }
        other => other,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn s4_scenario_from_spec() {
        // word_ids=[300, 1, 70000] at m=3
        let id = create(&[300, 1, 70000]);
        assert_eq!(type_bytes_len(3), 1);
        assert_eq!(type_value(id.as_bytes(), 3), 33);
        assert_eq!(id.len(), 7);
        assert_eq!(length_of(id.as_bytes(), 3), 7);
        assert_eq!(decode(id.as_bytes(), 3), vec![300, 1, 70000]);
    }

    #[test]
    fn round_trip_property() {
        let tuples: Vec<Vec<u32>> = vec![
            vec![1, 2],
            vec![1, 2, 3],
            vec![u32::MAX, 1, 2, 3],
            vec![1, 1, 1, 1, 1],
            vec![7, 500, 70000, 16_000_000, 2, 9],
        ];
        for t in tuples {
            let m = t.len();
            let id = create(&t);
            assert_eq!(length_of(id.as_bytes(), m), id.len());
            assert_eq!(decode(id.as_bytes(), m), t);
            assert_eq!(compare(id.as_bytes(), id.as_bytes(), m), Ordering::Equal);
        }
    }

    #[test]
    fn identical_word_sequences_are_byte_equal() {
        let a = create(&[10, 20, 30]);
        let b = create(&[10, 20, 30]);
        assert_eq!(a, b);
    }

    #[test]
    fn different_word_sequences_differ() {
        let a = create(&[10, 20, 30]);
        let b = create(&[10, 20, 31]);
        assert_ne!(a, b);
        assert_ne!(compare(a.as_bytes(), b.as_bytes(), 3), Ordering::Equal);
    }

    #[test]
    fn compare_is_antisymmetric_and_transitive() {
        let triples = [
            (vec![1u32, 1], vec![1u32, 2]),
            (vec![1, 255], vec![2, 1]),
            (vec![70000, 1], vec![1, 70000]),
        ];
        for (x, y) in triples.iter() {
            let ix = create(x);
            let iy = create(y);
            let fwd = compare(ix.as_bytes(), iy.as_bytes(), x.len());
            let bwd = compare(iy.as_bytes(), ix.as_bytes(), x.len());
            assert_eq!(fwd.reverse(), bwd);
        }
    }
}
