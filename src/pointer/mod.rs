//! Smart pointers over single heap-allocated values.
//!
//! # Purpose
//! [`Unique`] owns its value exclusively and can only be moved, never copied. [`Shared`] counts its
//! owners instead, with [`Observer`] as a way to refer to a shared value without owning it, which
//! is what keeps two values that know about each other from keeping each other alive forever.
#![warn(missing_docs)]

#[cfg(feature = "shared")]
pub mod shared;
#[cfg(feature = "unique")]
pub mod unique;

#[cfg(feature = "shared")]
#[doc(inline)]
pub use shared::{Observer, Shared};
#[cfg(feature = "unique")]
#[doc(inline)]
pub use unique::Unique;
