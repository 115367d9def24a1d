//! A module containing [`Shared`], a pointer with counted shared ownership, and [`Observer`], its
//! non-owning counterpart.
//!
//! Both are also re-exported under the parent module.

mod shared;

pub use shared::{Observer, Shared};
