//! A module containing [`Unique`], a move-only pointer with exclusive ownership of a heap value.
//!
//! [`Unique`] is also re-exported under the parent module.

mod unique;

pub use unique::*;
