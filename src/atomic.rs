//! Atomic types used across the crate.
//!
//! With the `portable-atomic` feature these come from `portable-atomic`, which covers targets
//! without native compare-and-swap. Otherwise they are the `core` types.

#[cfg(feature = "portable-atomic")]
pub(crate) use portable_atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering, fence};

#[cfg(not(feature = "portable-atomic"))]
pub(crate) use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering, fence};
