use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use super::ValueArray;
use super::storage;

const MIN_CAP: usize = 4;
const GROWTH_FACTOR: usize = 2;

/// A [`ValueArray`] under construction. Elements are written one at a time, and only once every
/// element is in place is the storage handed over with [`ArrayBuilder::finish`].
///
/// If construction is abandoned part way through (e.g. because producing an element panicked),
/// dropping the builder drops the elements written so far and frees the storage, so nothing that
/// was built leaks and nothing outside the builder is modified.
pub(crate) struct ArrayBuilder<T> {
    ptr: NonNull<T>,
    cap: usize,
    len: usize,
    _phantom: PhantomData<T>,
}

impl<T> ArrayBuilder<T> {
    /// Creates a builder with storage for `cap` elements.
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`].
    pub(crate) fn with_cap(cap: usize) -> ArrayBuilder<T> {
        ArrayBuilder {
            ptr: storage::alloc_storage(cap),
            cap,
            len: 0,
            _phantom: PhantomData,
        }
    }

    /// Appends `item`, growing the storage if it is already full.
    ///
    /// # Panics
    /// Panics if the grown memory layout size would exceed [`isize::MAX`].
    pub(crate) fn push(&mut self, item: T) {
        if self.len == self.cap {
            let new_cap = self.cap.saturating_mul(GROWTH_FACTOR).max(MIN_CAP);
            self.resize_storage(new_cap);
        }

        // SAFETY: len < cap, so the offset is within the allocation and the slot is uninitialized.
        unsafe { self.ptr.add(self.len).write(item) }
        self.len += 1;
    }

    fn resize_storage(&mut self, new_cap: usize) {
        // SAFETY: ptr was allocated for cap elements, and new_cap is never less than len.
        self.ptr = unsafe { storage::realloc_storage(self.ptr, self.cap, new_cap) };
        self.cap = new_cap;
    }

    /// Hands over the written elements as a [`ValueArray`], shrinking the storage to fit exactly.
    pub(crate) fn finish(mut self) -> ValueArray<T> {
        if self.len != self.cap {
            self.resize_storage(self.len);
        }

        // SAFETY: Storage now holds exactly len initialized elements, and the builder is forgotten
        // below so it doesn't drop them.
        let arr = unsafe { ValueArray::from_parts(self.ptr, self.len) };
        mem::forget(self);
        arr
    }
}

impl<T> Drop for ArrayBuilder<T> {
    fn drop(&mut self) {
        // SAFETY: The first len elements are initialized and the builder is never used again.
        unsafe {
            storage::drop_elements(self.ptr, self.len);
            storage::dealloc_storage(self.ptr, self.cap);
        }
    }
}
