//! Helpers shared between the types of this crate. Errors are public, the rest is internal.

pub mod error;

#[cfg(test)]
pub(crate) mod alloc;
#[cfg(test)]
pub(crate) mod panic;
