use std::{
    marker::PhantomData,
    sync::atomic::{AtomicU64, Ordering},
};

use serde::{Deserialize, Serialize};

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Into,
)]
#[serde(transparent)]
pub struct BillId(pub u64);

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Into,
)]
#[serde(transparent)]
pub struct ConsumerId(pub u64);

/// Hands out monotonically increasing identifiers.
///
/// Allocation is a single atomic increment, so a shared reference is enough
/// to allocate from several places at once.
pub struct IdAllocator<I> {
    next: AtomicU64,
    marker: PhantomData<fn() -> I>,
}

impl<I> Default for IdAllocator<I> {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl<I> IdAllocator<I> {
    pub const fn starting_at(next: u64) -> Self {
        Self { next: AtomicU64::new(next), marker: PhantomData }
    }
}

impl<I: Copy + From<u64> + Into<u64>> IdAllocator<I> {
    /// Continue after the greatest of the already taken identifiers.
    pub fn resuming_after(taken: impl IntoIterator<Item = I>) -> Self {
        Self::starting_at(taken.into_iter().map(Into::into).max().map_or(1, |max| max + 1))
    }

    pub fn allocate(&self) -> I {
        I::from(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
