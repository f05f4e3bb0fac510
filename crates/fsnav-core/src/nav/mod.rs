//! Ordering of cached entries.
//!
//! - [`natural`] — the folder-first, digit-aware comparator that keeps every
//!   node's children sorted.

pub mod natural;
