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

//! Bit-range copy utilities used by the m-gram id codec to pack
//! variable-width word ids into a byte string. No allocation; the caller
//! owns both buffers.

/// Smallest `k` in `1..=4` such that `x < 2^(8k)`. Used to choose the byte
/// width of a word id when packing an m-gram id.
#[inline]
pub fn bytes_needed(x: u32) -> u8 {
    if x < (1 << 8) {
        1
    } else if x < (1 << 16) {
        2
    } else if x < (1 << 24) {
        3
    } else {
        4
    }
}

/// Writes the low `n_bits` (`<= 32`) of `src` into `dst` starting at bit
/// offset `dst_bit_off`, converting to big-endian bit order on little
/// endian hosts so the resulting byte layout is host-independent.
///
/// Only whole-byte-aligned destinations are used by the m-gram id codec
/// (each word id occupies a whole number of bytes), so this takes the fast
/// path unconditionally; `copy_bits` below handles the general unaligned
/// case for callers outside the codec.
pub fn copy_end_bits_to_pos(src: u32, n_bits: u32, dst: &mut [u8], dst_bit_off: usize) {
    debug_assert!(n_bits <= 32);
    debug_assert_eq!(dst_bit_off % 8, 0, "m-gram id words are byte-aligned");
    let n_bytes = ((n_bits + 7) / 8) as usize;
    let byte_off = dst_bit_off / 8;
    // big-endian: most significant byte of the low n_bits goes first.
    let be = src.to_be_bytes();
    let start = 4 - n_bytes;
    dst[byte_off..byte_off + n_bytes].copy_from_slice(&be[start..]);
}

/// Reads `n_bytes` (`<= 4`) big-endian bytes starting at `byte_off` back
/// into a `u32`. Inverse of [`copy_end_bits_to_pos`] for whole-byte widths.
pub fn read_be_bytes(src: &[u8], byte_off: usize, n_bytes: usize) -> u32 {
    debug_assert!(n_bytes <= 4);
    let mut buf = [0u8; 4];
    buf[4 - n_bytes..].copy_from_slice(&src[byte_off..byte_off + n_bytes]);
    u32::from_be_bytes(buf)
}

/// Copies `n_bits` bits from `src` (starting at `src_bit_off`) into `dst`
/// (starting at `dst_bit_off`). Takes the byte-aligned fast path (`memcpy`
/// whole bytes, then a tail of up to 7 bits) when both offsets share the
/// same alignment modulo 8; otherwise copies bit by bit.
pub fn copy_bits(
    src: &[u8],
    src_bit_off: usize,
    dst: &mut [u8],
    dst_bit_off: usize,
    n_bits: usize,
) {
    if n_bits == 0 {
        return;
    }
    if src_bit_off % 8 == 0 && dst_bit_off % 8 == 0 {
        let whole_bytes = n_bits / 8;
        let src_byte = src_bit_off / 8;
        let dst_byte = dst_bit_off / 8;
        if whole_bytes > 0 {
            dst[dst_byte..dst_byte + whole_bytes]
                .copy_from_slice(&src[src_byte..src_byte + whole_bytes]);
        }
        let tail_bits = n_bits % 8;
        if tail_bits > 0 {
            copy_bits_naive(
                src,
                src_bit_off + whole_bytes * 8,
                dst,
                dst_bit_off + whole_bytes * 8,
                tail_bits,
            );
        }
    } else {
        copy_bits_naive(src, src_bit_off, dst, dst_bit_off, n_bits);
    }
}

fn get_bit(buf: &[u8], bit_off: usize) -> bool {
    let byte = buf[bit_off / 8];
    let shift = 7 - (bit_off % 8);
    (byte >> shift) & 1 == 1
}

fn set_bit(buf: &mut [u8], bit_off: usize, value: bool) {
    let byte = &mut buf[bit_off / 8];
    let shift = 7 - (bit_off % 8);
    if value {
        *byte |= 1 << shift;
    } else {
        *byte &= !(1 << shift);
    }
}

fn copy_bits_naive(
    src: &[u8],
    src_bit_off: usize,
    dst: &mut [u8],
    dst_bit_off: usize,
    n_bits: usize,
) {
    for i in 0..n_bits {
        let bit = get_bit(src, src_bit_off + i);
        set_bit(dst, dst_bit_off + i, bit);
    }
}
