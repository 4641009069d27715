//! Orders
//!
//! - [`placement`]: validate a request and place it atomically
//! - [`batch`]: place many requests, one transaction each
//! - [`outcome`]: accepted/rejected records for callers
//! - [`lifecycle`]: reads, close, update, delete

pub mod batch;
pub mod error;
pub mod lifecycle;
pub mod money;
pub mod outcome;
pub mod placement;

#[cfg(test)]
mod tests;

pub use error::{OrderError, Shortfall};
pub use placement::{Placement, ValidatedOrder, place_order};
