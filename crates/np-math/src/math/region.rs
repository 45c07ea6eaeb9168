//! Rejection regions and their enumeration.
//!
//! A region is a subset of the outcome indices `{0, .., n-1}`. It is stored as
//! a fixed-width bit pattern (bit `i` set iff outcome `i` rejects), so equality,
//! hashing and membership are O(1) and two descriptions of the same subset
//! always compare equal.
//!
//! The region universe for `n` outcomes is the full powerset, `2^n` regions,
//! produced by [`Regions`] in a deterministic order:
//!
//! ```text
//! n = 3:  {}  {0}  {1}  {2}  {0, 1}  {0, 2}  {1, 2}  {0, 1, 2}
//! ```
//!
//! i.e. by increasing subset size, and within one size by the lexicographic
//! order of the index combinations.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::fmt;

/// Largest outcome count a [`Region`] can represent.
pub const MAX_REGION_OUTCOMES: usize = 63;

/// A set of outcome indices, one bit per outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Region(u64);

impl Region {
    /// The region that rejects nothing.
    pub const fn empty() -> Self {
        Region(0)
    }

    /// The region containing every outcome in `0..n`.
    ///
    /// # Panics
    /// Panics if `n > MAX_REGION_OUTCOMES`.
    pub fn full(n: usize) -> Self {
        assert!(
            n <= MAX_REGION_OUTCOMES,
            "region supports at most {} outcomes, got {}",
            MAX_REGION_OUTCOMES,
            n
        );
        if n == 0 {
            Region(0)
        } else {
            Region(u64::MAX >> (64 - n))
        }
    }

    /// Build a region from its raw bit pattern.
    pub const fn from_bits(bits: u64) -> Self {
        Region(bits)
    }

    /// Raw bit pattern.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Build a region from outcome indices. Duplicates are ignored.
    ///
    /// # Panics
    /// Panics if an index is `>= MAX_REGION_OUTCOMES`.
    pub fn from_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        indices.into_iter().fold(Region::empty(), Region::with)
    }

    /// Return a copy of this region with `outcome` added.
    ///
    /// # Panics
    /// Panics if `outcome >= MAX_REGION_OUTCOMES`.
    pub fn with(self, outcome: usize) -> Self {
        assert!(
            outcome < MAX_REGION_OUTCOMES,
            "outcome index {} out of range",
            outcome
        );
        Region(self.0 | (1u64 << outcome))
    }

    /// Whether `outcome` is in the region.
    pub fn contains(self, outcome: usize) -> bool {
        outcome < MAX_REGION_OUTCOMES && (self.0 >> outcome) & 1 == 1
    }

    /// Number of outcomes in the region.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_subset_of(self, other: Region) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn union(self, other: Region) -> Region {
        Region(self.0 | other.0)
    }

    /// Complement within the outcome space `0..n`.
    pub fn complement(self, n: usize) -> Region {
        Region(!self.0 & Region::full(n).0)
    }

    /// Member indices in ascending order.
    pub fn indices(self) -> Indices {
        Indices { bits: self.0 }
    }
}

/// Ascending iterator over the outcome indices of a [`Region`].
#[derive(Debug, Clone)]
pub struct Indices {
    bits: u64,
}

impl Iterator for Indices {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.bits == 0 {
            return None;
        }
        let idx = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        Some(idx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Indices {}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (pos, idx) in self.indices().enumerate() {
            if pos > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", idx)?;
        }
        write!(f, "}}")
    }
}

impl Serialize for Region {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for idx in self.indices() {
            seq.serialize_element(&idx)?;
        }
        seq.end()
    }
}

/// Iterator over the whole region universe of `n` outcomes.
///
/// Yields `2^n` regions: empty first, full last, ordered by size and then
/// lexicographically by index combination.
#[derive(Debug, Clone)]
pub struct Regions {
    n: usize,
    /// Current combination of `combo.len()` indices.
    combo: Vec<usize>,
    remaining: u64,
}

impl Regions {
    /// # Panics
    /// Panics if `n > MAX_REGION_OUTCOMES`.
    pub fn new(n: usize) -> Self {
        assert!(
            n <= MAX_REGION_OUTCOMES,
            "region universe supports at most {} outcomes, got {}",
            MAX_REGION_OUTCOMES,
            n
        );
        Regions {
            n,
            combo: Vec::with_capacity(n),
            remaining: 1u64 << n,
        }
    }

    /// Move `combo` to the next combination of the same size, or to the first
    /// combination of the next size.
    fn advance(&mut self) {
        let k = self.combo.len();
        let n = self.n;
        // Rightmost position that can still be incremented.
        if let Some(i) = (0..k).rev().find(|&i| self.combo[i] < n - k + i) {
            self.combo[i] += 1;
            for j in i + 1..k {
                self.combo[j] = self.combo[j - 1] + 1;
            }
        } else {
            self.combo.clear();
            self.combo.extend(0..(k + 1).min(n));
        }
    }
}

impl Iterator for Regions {
    type Item = Region;

    fn next(&mut self) -> Option<Region> {
        if self.remaining == 0 {
            return None;
        }
        let region = Region::from_indices(self.combo.iter().copied());
        self.remaining -= 1;
        if self.remaining > 0 {
            self.advance();
        }
        Some(region)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

/// Collect the full region universe for `n` outcomes.
pub fn enumerate_regions(n: usize) -> Vec<Region> {
    Regions::new(n).collect()
}
