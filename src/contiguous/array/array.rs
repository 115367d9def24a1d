use std::borrow::{Borrow, BorrowMut};
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::slice;

use super::builder::ArrayBuilder;
use super::storage;
use crate::util::error::IndexOutOfBounds;

/// A value-semantic array whose size is fixed when it is created at runtime. Similar to a
/// [`Box<[T]>`](Box<T>).
///
/// Cloning a ValueArray copies every element into new storage of exactly the same size, so the
/// two arrays never share anything. Moving one out with [`ValueArray::take`] leaves an empty array
/// behind, which owns no storage at all.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the ValueArray.
///
/// | Method | Complexity |
/// |-|-|
/// | `at` | `O(1)` |
/// | `size` | `O(1)` |
/// | `take` | `O(1)` |
/// | `swap` | `O(1)` |
/// | `clone` | `O(n)` |
/// | `clone_from` | `O(n)` |
/// | `eq` | `O(n)` |
pub struct ValueArray<T> {
    pub(crate) ptr: NonNull<T>,
    pub(crate) size: usize,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T> ValueArray<T> {
    /// Creates an empty ValueArray with size 0, without allocating.
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::contiguous::ValueArray;
    /// let arr: ValueArray<u8> = ValueArray::empty();
    /// assert_eq!(arr.size(), 0);
    /// assert!(arr.is_empty());
    /// ```
    pub const fn empty() -> ValueArray<T> {
        ValueArray {
            ptr: NonNull::dangling(),
            size: 0,
            _phantom: PhantomData,
        }
    }

    /// Creates a ValueArray of `size` elements, producing each element by calling `f` with its
    /// index.
    ///
    /// If `f` panics, the elements produced so far are dropped and no memory is leaked.
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::contiguous::ValueArray;
    /// let squares = ValueArray::from_fn(5, |i| (i + 1) * (i + 1));
    /// assert_eq!(squares, ValueArray::from([1, 4, 9, 16, 25]));
    /// ```
    pub fn from_fn<F: FnMut(usize) -> T>(size: usize, f: F) -> ValueArray<T> {
        (0..size).map(f).collect()
    }

    /// Returns the number of elements in the ValueArray.
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::contiguous::ValueArray;
    /// let arr = ValueArray::from([1, 2, 3]);
    /// assert_eq!(arr.size(), 3);
    /// ```
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if `index >= size`.
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::contiguous::ValueArray;
    /// let arr = ValueArray::from([1, 2, 3]);
    /// assert_eq!(arr.at(1), Ok(&2));
    /// assert!(arr.at(3).is_err());
    /// ```
    pub fn at(&self, index: usize) -> Result<&T, IndexOutOfBounds> {
        self.get(index).ok_or(IndexOutOfBounds {
            index,
            len: self.size,
        })
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if `index >= size`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, IndexOutOfBounds> {
        let len = self.size;
        self.get_mut(index).ok_or(IndexOutOfBounds { index, len })
    }

    /// Exchanges the contents of two ValueArrays, without allocating or touching any elements.
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::contiguous::ValueArray;
    /// let mut a = ValueArray::from([1, 2, 3]);
    /// let mut b = ValueArray::from([665, 667]);
    /// a.swap(&mut b);
    /// assert_eq!(a, ValueArray::from([665, 667]));
    /// assert_eq!(b, ValueArray::from([1, 2, 3]));
    /// ```
    pub fn swap(&mut self, other: &mut ValueArray<T>) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.size, &mut other.size);
    }

    /// Moves the contents out into a new ValueArray, leaving this one empty with no storage.
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::contiguous::ValueArray;
    /// let mut row = ValueArray::from([1, 2, 3]);
    /// let moved = row.take();
    /// assert_eq!(moved, ValueArray::from([1, 2, 3]));
    /// assert_eq!(row.size(), 0);
    /// ```
    pub fn take(&mut self) -> ValueArray<T> {
        let mut taken = ValueArray::empty();
        self.swap(&mut taken);
        taken
    }

    /// Creates a `ValueArray<T>` from its raw components.
    ///
    /// # Safety
    /// - `ptr` must have been allocated in the global allocator for exactly `size` elements of `T`,
    ///   or be dangling if that allocation would be zero-sized.
    /// - `ptr` must refer to `size` properly initialized values of `T`.
    /// - Ownership of the storage passes to the ValueArray.
    pub(crate) const unsafe fn from_parts(ptr: NonNull<T>, size: usize) -> ValueArray<T> {
        ValueArray {
            ptr,
            size,
            _phantom: PhantomData,
        }
    }

    /// Decomposes a ValueArray into its pointer and size, without dropping or freeing anything.
    pub(crate) const fn into_parts(self) -> (NonNull<T>, usize) {
        let parts = (self.ptr, self.size);
        mem::forget(self);
        parts
    }
}

impl<T: Default> ValueArray<T> {
    /// Creates a ValueArray of `size` elements, each set to the default (zero) value of `T`.
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::contiguous::ValueArray;
    /// let arr: ValueArray<i32> = ValueArray::new(4);
    /// assert_eq!(arr.size(), 4);
    /// assert_eq!(&*arr, &[0, 0, 0, 0]);
    /// ```
    pub fn new(size: usize) -> ValueArray<T> {
        ValueArray::from_fn(size, |_| T::default())
    }
}

impl<T> Default for ValueArray<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> FromIterator<T> for ValueArray<T> {
    /// Collects the items of an iterator into a ValueArray of exactly that many elements.
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`].
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut builder = ArrayBuilder::with_cap(iter.size_hint().0);

        for item in iter {
            builder.push(item);
        }

        builder.finish()
    }
}

impl<T, const N: usize> From<[T; N]> for ValueArray<T> {
    /// Creates a ValueArray from a literal list of values.
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::contiguous::ValueArray;
    /// let arr = ValueArray::from([1, 2, 3, 4, 5, 6]);
    /// assert_eq!(arr.size(), 6);
    /// assert_eq!(arr[2], 3);
    /// ```
    fn from(value: [T; N]) -> Self {
        value.into_iter().collect()
    }
}

impl<T: Clone> From<&[T]> for ValueArray<T> {
    fn from(value: &[T]) -> Self {
        value.iter().cloned().collect()
    }
}

impl<T> Drop for ValueArray<T> {
    fn drop(&mut self) {
        // SAFETY: All size elements are initialized and the storage was allocated for exactly size
        // elements. Neither is used again.
        unsafe {
            storage::drop_elements(self.ptr, self.size);
            storage::dealloc_storage(self.ptr, self.size);
        }
    }
}

impl<T> Deref for ValueArray<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        // SAFETY: The held data uses Layout::array(size) and is therefore valid and properly
        // aligned for (size * mem::size_of::<T>()) bytes. Data is properly initialized and has a
        // length no greater than isize::MAX. ValueArray's safe API doesn't provide access to raw
        // pointers, so the borrow checker prevents mutation throughout the borrow.
        unsafe {
            slice::from_raw_parts(self.ptr.as_ptr(), self.size)
        }
    }
}

impl<T> DerefMut for ValueArray<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: As with deref, and self is borrowed mutably so no other access can occur.
        unsafe {
            slice::from_raw_parts_mut(self.ptr.as_ptr(), self.size)
        }
    }
}

impl<T> AsRef<[T]> for ValueArray<T> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T> AsMut<[T]> for ValueArray<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T> Borrow<[T]> for ValueArray<T> {
    fn borrow(&self) -> &[T] {
        self
    }
}

impl<T> BorrowMut<[T]> for ValueArray<T> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self
    }
}

// SAFETY: ValueArrays own their storage uniquely, so they are Send when T: Send.
unsafe impl<T: Send> Send for ValueArray<T> {}
// SAFETY: ValueArray's safe API obeys all rules of the borrow checker, so no interior mutability
// occurs. This means that ValueArray<T> can safely implement Sync when T: Sync.
unsafe impl<T: Sync> Sync for ValueArray<T> {}

impl<T: Clone> Clone for ValueArray<T> {
    /// Deep-copies every element into new storage of the same size.
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }

    /// Replaces the contents of self with a deep copy of `source`, by building a complete copy and
    /// then swapping it in. If cloning an element panics, self is left unmodified.
    fn clone_from(&mut self, source: &Self) {
        let mut temp = source.clone();
        self.swap(&mut temp);
    }
}

impl<T: PartialEq> PartialEq for ValueArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && **self == **other
    }
}

impl<T: Eq> Eq for ValueArray<T> {}

impl<T: PartialEq> PartialEq<[T]> for ValueArray<T> {
    fn eq(&self, other: &[T]) -> bool {
        **self == *other
    }
}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for ValueArray<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        **self == *other
    }
}

impl<T: Hash> Hash for ValueArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (**self).hash(state);
    }
}

impl<T: Debug> Debug for ValueArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueArray")
            .field("contents", &&**self)
            .field("size", &self.size)
            .finish()
    }
}

impl<T: Display> Display for ValueArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (index, item) in self.iter().enumerate() {
            if index != 0 {
                write!(f, ", ")?;
            }
            Display::fmt(item, f)?;
        }
        write!(f, "]")
    }
}
