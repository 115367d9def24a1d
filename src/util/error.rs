use derive_more::{Display, Error, From, IsVariant};

/// An index was used to access a collection, but it was greater than or equal to the number of
/// elements in the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Index {index} out of bounds for collection with {len} elements!")]
pub struct IndexOutOfBounds {
    /// The index that was requested.
    pub index: usize,
    /// The number of elements in the collection at the time of access.
    pub len: usize,
}

/// An empty pointer was dereferenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Attempted to dereference an empty pointer!")]
pub struct NullDereference;

/// Any of the errors produced by checked access into the types of this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From, IsVariant)]
pub enum AccessError {
    IndexOutOfBounds(IndexOutOfBounds),
    NullDereference(NullDereference),
}
