//! Pagination module
//!
//! Time-bisection pagination over a worklist of windows.
//!
//! # Overview
//!
//! The forums list items by creation-time window with a hard page size and
//! no usable cursor. A page that comes back full is assumed incomplete, so
//! its window is halved and both halves are queued. A page that comes back
//! short is the complete content of its window and gets saved. Windows are
//! processed depth-first, earlier half first.

mod bisect;

pub use bisect::{BisectConfig, PageDecision, PendingWindow, WindowPaginator};
