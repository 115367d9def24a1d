//! A module containing [`ValueArray`] and associated types.
//!
//! Currently, the only other included type is [`IntoIter`] for owned iteration over a ValueArray.
//! [`IterMut`](std::slice::IterMut) and [`Iter`](std::slice::Iter) from [`std::slice`] are used for
//! borrowed iteration.
//!
//! [`ValueArray`] is also re-exported under the parent module.

mod array;
mod builder;
mod iter;
mod storage;
mod tests;

pub use array::*;
pub use iter::*;
