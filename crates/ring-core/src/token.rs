//! Positions on the hash circle.
//!
//! Both partition keys and ketama virtual points are mapped onto the same
//! `u64` circle. Keys are hashed with XXH3-64.

use std::fmt;

use xxhash_rust::xxh3::xxh3_64;

/// A position on the `u64` hash circle.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Token(pub u64);

impl Token {
    /// Hash a partition key onto the circle.
    #[inline]
    pub fn for_key(key: &[u8]) -> Self {
        Token(xxh3_64(key))
    }

    /// Clockwise distance from `self` to `other`.
    pub fn distance_to(&self, other: &Self) -> u64 {
        other.0.wrapping_sub(self.0)
    }

    /// Bucket index in `0..n`. `n` must be non-zero.
    #[inline]
    pub fn bucket(&self, n: usize) -> usize {
        (self.0 % n as u64) as usize
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_key_is_stable() {
        assert_eq!(Token::for_key(b"key1"), Token::for_key(b"key1"));
        assert_ne!(Token::for_key(b"key1"), Token::for_key(b"key2"));
    }

    #[test]
    fn test_distance_wraps() {
        assert_eq!(Token(100).distance_to(&Token(200)), 100);
        assert_eq!(Token(u64::MAX).distance_to(&Token(0)), 1);
        assert_eq!(Token(200).distance_to(&Token(100)), u64::MAX - 99);
    }

    #[test]
    fn test_bucket_in_range() {
        for n in 1..10 {
            assert!(Token::for_key(b"partition-7").bucket(n) < n);
        }
    }
}
