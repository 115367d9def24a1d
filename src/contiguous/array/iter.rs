use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;
use std::slice;

use super::ValueArray;
use super::storage;

impl<T> IntoIterator for ValueArray<T> {
    type Item = T;

    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let (ptr, size) = self.into_parts();

        IntoIter {
            ptr,
            size,
            start: 0,
            end: size,
            _phantom: PhantomData,
        }
    }
}

impl<'a, T> IntoIterator for &'a ValueArray<T> {
    type Item = &'a T;

    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut ValueArray<T> {
    type Item = &'a mut T;

    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A type for owned iteration over a [`ValueArray`]. See [`ValueArray::into_iter`].
///
/// Elements in `start..end` haven't been yielded yet. The storage itself is freed when the iterator
/// is dropped.
pub struct IntoIter<T> {
    pub(crate) ptr: NonNull<T>,
    pub(crate) size: usize,
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T> IntoIter<T> {
    /// Returns the elements that haven't been yielded yet as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: Elements in start..end are initialized and within the allocation.
        unsafe { slice::from_raw_parts(self.ptr.add(self.start).as_ptr(), self.end - self.start) }
    }
}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // SAFETY: Only the elements in start..end are still initialized, the rest have been moved
        // out. The storage was allocated for size elements and isn't used again.
        unsafe {
            storage::drop_elements(self.ptr.add(self.start), self.end - self.start);
            storage::dealloc_storage(self.ptr, self.size);
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start < self.end {
            // SAFETY: start is within the allocation and initialized. Incrementing start afterwards
            // means that the value is effectively moved off of the heap.
            let value = unsafe { self.ptr.add(self.start).read() };
            self.start += 1;
            Some(value)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start < self.end {
            self.end -= 1;
            // SAFETY: The newly decremented end is within the allocation and initialized.
            let value = unsafe { self.ptr.add(self.end).read() };
            Some(value)
        } else {
            None
        }
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> ExactSizeIterator for IntoIter<T> {}

// SAFETY: IntoIter owns the remaining elements uniquely, just like the ValueArray it came from.
unsafe impl<T: Send> Send for IntoIter<T> {}
// SAFETY: Shared access only provides shared references to the remaining elements.
unsafe impl<T: Sync> Sync for IntoIter<T> {}

// Borrowed iteration uses the iter and iter_mut definitions provided by Deref<Target = [T]>.
