//! This crate is a small collection of hand-written ownership primitives: a move-only pointer, a
//! counted shared pointer with non-owning observers, and a value-semantic array.
//!
//! # Purpose
//! This crate is a learning exercise, with no expectation for it to be used in production. Each
//! type manages its own heap memory, which makes the rules of ownership visible: who frees a
//! value, when it is freed and what is left behind after a move.
//!
//! # Method
//! Memory is allocated either through [`Box`] or directly through [`std::alloc`], and held as raw
//! pointers. Every `unsafe` block states why it is sound. Each type frees what it owns exactly once
//! in its [`Drop`] implementation, so cleanup happens on every exit path, including unwinding.
//!
//! A moved-from value is always left valid but empty: [`Unique::take`](pointer::Unique::take)
//! leaves an empty pointer behind and [`ValueArray::take`](contiguous::ValueArray::take) leaves an
//! array of size 0 with no storage.
//!
//! # Error Handling
//! Misuse that can reasonably be checked for is reported with strongly typed errors from the
//! [`error`] module, one struct per kind of failure, via [`Result`]s. The panicking counterparts
//! (indexing, dereferencing) panic with the message of the same error.
//!
//! # Dependencies
//! This crate only depends on some derive macros because they're helpful and remove the need for
//! some very repetitive programming.
#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

#[cfg(feature = "contiguous")]
pub mod contiguous;
#[cfg(any(feature = "unique", feature = "shared"))]
pub mod pointer;

pub(crate) mod util;

pub use util::error;
