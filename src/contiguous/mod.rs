//! Contiguous collection types. Namely [`ValueArray`], a value-semantic array that is sized at
//! runtime.
#![warn(missing_docs)]

pub mod array;

#[doc(inline)]
pub use array::ValueArray;
