//! Domain model shared by dashboard features.
//!
//! # Responsibility
//! - Define persisted shapes (mood entries and snapshots).
//! - Define input rejections common to every feature.
//!
//! # Invariants
//! - Persisted shapes keep their wire field names stable across releases.

pub mod input;
pub mod mood;
