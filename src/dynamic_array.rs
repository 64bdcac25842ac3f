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

//! A growable array that keeps `Vec`'s contiguous-storage behaviour but
//! lets the caller pick the growth curve (see
//! [`crate::config::MemIncStrategy`]).
//!
//! Used during the build phase to accumulate m-gram payloads and bucket
//! entries before the final bucket sizes are known; `Vec`'s own doubling
//! strategy is a fine default, but some trie levels are built from a count
//! estimate the caller trusts and wants `CONSTANT`/`LOG_2`/`LOG_10` growth
//! for instead, to avoid Linear's over-allocation at high counts.

use crate::config::MemIncStrategy;

/// A `Vec`-like container whose capacity growth is driven by a
/// [`MemIncStrategy`] rather than the standard library's fixed doubling.
#[derive(Debug, Clone)]
pub struct DynamicArray<T> {
    data: Vec<T>,
    strategy: MemIncStrategy,
    factor: f32,
    min_inc: usize,
}

impl<T> DynamicArray<T> {
    pub fn new(strategy: MemIncStrategy, factor: f32, min_inc: usize) -> Self {
        DynamicArray {
            data: Vec::new(),
            strategy,
            factor,
            min_inc,
        }
    }

    pub fn with_capacity(capacity: usize, strategy: MemIncStrategy, factor: f32, min_inc: usize) -> Self {
        DynamicArray {
            data: Vec::with_capacity(capacity),
            strategy,
            factor,
            min_inc,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn get(&self, idx: usize) -> Option<&T> {
        self.data.get(idx)
    }

    /// Grows the backing storage ahead of a push if the array is at
    /// capacity, following `self.strategy` instead of `Vec`'s default.
    fn grow_if_full(&mut self) {
        if self.data.len() == self.data.capacity() {
            let new_cap = self.strategy.grow(self.data.capacity(), self.factor, self.min_inc);
            let extra = new_cap.saturating_sub(self.data.capacity());
            if extra > 0 {
                self.data.reserve_exact(extra);
            }
        }
    }

    pub fn push(&mut self, value: T) {
        self.grow_if_full();
        self.data.push(value);
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn into_boxed_slice(self) -> Box<[T]> {
        self.data.into_boxed_slice()
    }
}

impl<T> From<DynamicArray<T>> for Vec<T> {
    fn from(arr: DynamicArray<T>) -> Self {
        arr.data
    }
}

impl<T> std::ops::Index<usize> for DynamicArray<T> {
    type Output = T;

    fn index(&self, idx: usize) -> &T {
        &self.data[idx]
    }
}

impl<T> std::ops::IndexMut<usize> for DynamicArray<T> {
    fn index_mut(&mut self, idx: usize) -> &mut T {
        &mut self.data[idx]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn push_and_index_roundtrip() {
        let mut arr: DynamicArray<u32> = DynamicArray::new(MemIncStrategy::Linear, 1.0, 4);
        for i in 0..50 {
            arr.push(i);
        }
        assert_eq!(arr.len(), 50);
        for i in 0..50 {
            assert_eq!(arr[i as usize], i);
        }
    }

    #[test]
    fn constant_strategy_grows_by_min_inc_each_time() {
        let mut arr: DynamicArray<u8> = DynamicArray::new(MemIncStrategy::Constant, 0.0, 4);
        assert_eq!(arr.capacity(), 0);
        arr.push(1);
        assert!(arr.capacity() >= 4);
    }

    #[test]
    fn with_capacity_preallocates() {
        let arr: DynamicArray<u8> = DynamicArray::with_capacity(16, MemIncStrategy::Linear, 1.0, 1);
        assert!(arr.capacity() >= 16);
        assert_eq!(arr.len(), 0);
    }

    #[test]
    fn into_boxed_slice_preserves_order() {
        let mut arr: DynamicArray<i32> = DynamicArray::new(MemIncStrategy::Log2, 1.0, 2);
        arr.push(3);
        arr.push(1);
        arr.push(4);
        let boxed = arr.into_boxed_slice();
        assert_eq!(&*boxed, &[3, 1, 4]);
    }
}
