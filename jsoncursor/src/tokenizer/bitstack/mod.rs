// SPDX-License-Identifier: Apache-2.0

//! Fixed-size storage for the object/array nesting of the tokenizer.
//!
//! Each open container takes one bit: `true` for an object, `false` for an
//! array. The depth itself is kept by a separate [`DepthCounter`], so a bucket
//! never needs to know how many bits are in use.

use core::ops::{BitAnd, BitOr, Shl, Shr};

/// Bit storage for the container stack.
pub trait BitBucket: Default {
    /// Number of nesting levels this bucket can remember.
    const CAPACITY: usize;

    /// Pushes a bit onto the stack.
    fn push(&mut self, bit: bool);
    /// Pops the top bit. An empty stack pops `false`.
    fn pop(&mut self) -> bool;
    /// Returns the top bit without removing it.
    fn top(&self) -> bool;
}

impl<T> BitBucket for T
where
    T: Shl<u8, Output = T>
        + Shr<u8, Output = T>
        + BitAnd<T, Output = T>
        + BitOr<Output = T>
        + PartialEq
        + Copy
        + Default
        + From<u8>,
{
    const CAPACITY: usize = core::mem::size_of::<T>() * 8;

    fn push(&mut self, bit: bool) {
        *self = (*self << 1u8) | T::from(bit as u8);
    }

    fn pop(&mut self) -> bool {
        let bit = self.top();
        *self = *self >> 1u8;
        bit
    }

    fn top(&self) -> bool {
        (*self & T::from(1)) != T::from(0)
    }
}

/// Nesting depth counter.
pub trait DepthCounter: core::fmt::Debug + Copy + Default {
    /// Returns the incremented depth, or `None` when the counter is saturated.
    fn increment(self) -> Option<Self>;
    /// Returns the decremented depth, or `None` at zero.
    fn decrement(self) -> Option<Self>;
    /// Depth as a plain `usize`, used by the cursor to remember entry depths.
    fn as_usize(self) -> usize;
}

macro_rules! impl_depth_counter {
    ($($t:ty),*) => {
        $(
            impl DepthCounter for $t {
                #[inline]
                fn increment(self) -> Option<Self> { self.checked_add(1) }

                #[inline]
                fn decrement(self) -> Option<Self> { self.checked_sub(1) }

                #[inline]
                fn as_usize(self) -> usize { self as usize }
            }
        )*
    };
}

impl_depth_counter!(u8, u16, u32, usize);

/// Chooses the bucket and counter types used by a [`Tokenizer`](super::Tokenizer).
pub trait BitStackConfig {
    /// Storage for the container bits.
    type Bucket: BitBucket;
    /// Depth counter.
    type Counter: DepthCounter;
}

/// 32 levels of nesting: a [u32] bucket with a [u8] counter.
pub struct DefaultConfig;

impl BitStackConfig for DefaultConfig {
    type Bucket = u32;
    type Counter = u8;
}

/// Custom bucket/counter pair, e.g. `BitStackStruct<u64, u8>` for 64 levels.
pub struct BitStackStruct<B, C> {
    _phantom: core::marker::PhantomData<(B, C)>,
}

impl<B: BitBucket, C: DepthCounter> BitStackConfig for BitStackStruct<B, C> {
    type Bucket = B;
    type Counter = C;
}

/// Deep nesting: `ArrayBitStack<8, u32, u16>` remembers 256 levels.
pub type ArrayBitStack<const N: usize, T, D> = BitStackStruct<ArrayBitBucket<N, T>, D>;

/// A bucket made of `N` integer words, shifted as one long register.
#[derive(Debug, Clone, Copy)]
pub struct ArrayBitBucket<const N: usize, T>(pub [T; N]);

impl<const N: usize, T: Default + Copy> Default for ArrayBitBucket<N, T> {
    fn default() -> Self {
        ArrayBitBucket([T::default(); N])
    }
}

impl<const N: usize, T> BitBucket for ArrayBitBucket<N, T>
where
    T: Shl<u8, Output = T>
        + Shr<u8, Output = T>
        + BitAnd<T, Output = T>
        + BitOr<Output = T>
        + PartialEq
        + Copy
        + Default
        + From<u8>,
{
    const CAPACITY: usize = N * core::mem::size_of::<T>() * 8;

    fn push(&mut self, bit: bool) {
        let msb = (core::mem::size_of::<T>() * 8 - 1) as u8;
        let mut carry = T::from(bit as u8);
        // The last word holds the top of the stack.
        for word in self.0.iter_mut().rev() {
            let lost = (*word >> msb) & T::from(1);
            *word = (*word << 1u8) | carry;
            carry = lost;
        }
    }

    fn pop(&mut self) -> bool {
        let bit = self.top();
        let msb = (core::mem::size_of::<T>() * 8 - 1) as u8;
        let mut carry = T::from(0);
        for word in self.0.iter_mut() {
            let lost = *word & T::from(1);
            *word = (*word >> 1u8) | (carry << msb);
            carry = lost;
        }
        bit
    }

    fn top(&self) -> bool {
        self.0
            .last()
            .is_some_and(|word| (*word & T::from(1)) != T::from(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_bucket_is_lifo() {
        let mut bucket = 0u8;
        bucket.push(true);
        bucket.push(false);
        assert!(!bucket.top());
        assert!(!bucket.pop());
        assert!(bucket.pop());
        assert!(!bucket.pop());
    }

    #[test]
    fn test_capacity() {
        assert_eq!(<u32 as BitBucket>::CAPACITY, 32);
        assert_eq!(<ArrayBitBucket<4, u16> as BitBucket>::CAPACITY, 64);
    }

    #[test]
    fn test_array_bucket_carries_across_words() {
        let mut bucket: ArrayBitBucket<2, u8> = ArrayBitBucket::default();
        let bits = [true, false, true, true, false, false, true, false, true, true, false];
        for &bit in &bits {
            bucket.push(bit);
        }
        for &expected in bits.iter().rev() {
            assert_eq!(bucket.pop(), expected);
        }
        assert!(!bucket.top());
    }

    #[test]
    fn test_depth_counter_saturates() {
        assert_eq!(254u8.increment(), Some(255));
        assert_eq!(255u8.increment(), None);
        assert_eq!(0u16.decrement(), None);
        assert_eq!(7u16.as_usize(), 7);
    }
}
