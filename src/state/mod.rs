//! State module
//!
//! Derived state rebuilt from previously saved pages on every run.
//!
//! # Overview
//!
//! The state module provides:
//! - `PostIndex` - post id to title mapping built from saved `posts` pages,
//!   iterated in identifier order

mod index;

pub use index::{is_safe_id, PostIndex};
