//! # lc-core
//!
//! Core types shared across the limitcard workspace: the error type and
//! the histogram primitives used for binned yields and shape systematics.

#![warn(clippy::all)]

pub mod error;
pub mod histogram;

pub use error::{Error, Result};
pub use histogram::{Histogram, Histogram2};
