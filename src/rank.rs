//! Node rank type and the arithmetic consolidation relies on.
//!
//! A node's rank is a proxy for the logarithm of its subtree size. Ranked
//! linking during consolidation only ever joins two trees of equal rank, so
//! a heap with `n` live elements never produces a rank above `log₂(n)`.
//! That makes `u8` far more than enough: 2⁶⁴ elements would need rank 64.
//!
//! Decrease-key gives the node it creates a rank two below the node it
//! hollows. Without that discount, repeated decrease-keys would pile up
//! high-rank debris and break the O(log n) bound on delete-min.

/// Type alias for node rank.
pub type Rank = u8;

/// Maximum valid rank value.
pub const MAX_RANK: Rank = u8::MAX;

/// Number of rank buckets consolidation allocates up front.
///
/// Covers every heap that fits in a 64-bit address space; the bucket array
/// still grows on demand if a larger rank ever shows up.
pub const INITIAL_BUCKETS: usize = 64;

/// Rank discount applied to the node created by decrease-key.
pub const DECREASE_KEY_DISCOUNT: Rank = 2;

/// Increment a rank after a ranked link, panicking on overflow.
///
/// # Panics
///
/// Panics if `rank == MAX_RANK`, which would require a heap with more than
/// 2²⁵⁵ elements.
///
/// # Example
///
/// ```rust
/// use hollow_heap::rank::{checked_increment, Rank};
///
/// let rank: Rank = 5;
/// assert_eq!(checked_increment(rank), 6);
/// ```
#[inline]
pub fn checked_increment(rank: Rank) -> Rank {
    rank.checked_add(1).expect(
        "rank overflow: ranked links only join equal ranks, so this needs \
         more than 2²⁵⁵ live elements",
    )
}

/// Rank of the node decrease-key creates for a node of rank `hollowed`.
///
/// # Example
///
/// ```rust
/// use hollow_heap::rank::discounted;
///
/// assert_eq!(discounted(5), 3);
/// assert_eq!(discounted(1), 0);
/// ```
#[inline]
pub fn discounted(hollowed: Rank) -> Rank {
    hollowed.saturating_sub(DECREASE_KEY_DISCOUNT)
}
