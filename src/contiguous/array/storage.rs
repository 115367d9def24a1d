//! Raw allocation helpers for contiguous storage of exactly `size` elements.

use std::alloc::{self, Layout};
use std::mem;
use std::ptr::{self, NonNull};

/// Creates a [`Layout`] for `size` contiguous elements of type `T`.
///
/// # Panics
/// Panics if the layout size exceeds [`isize::MAX`].
pub(crate) fn make_layout<T>(size: usize) -> Layout {
    Layout::array::<T>(size).expect("Capacity overflow!")
}

/// Allocates uninitialized storage for `size` elements. Returns a dangling pointer instead of
/// allocating when the layout is zero-sized.
///
/// # Panics
/// Panics if the layout size exceeds [`isize::MAX`]. Allocation failure calls
/// [`alloc::handle_alloc_error`] rather than panicking.
pub(crate) fn alloc_storage<T>(size: usize) -> NonNull<T> {
    let layout = make_layout::<T>(size);

    if layout.size() == 0 {
        NonNull::dangling()
    } else {
        NonNull::new(
            // SAFETY: Zero-sized layouts have been guarded against.
            unsafe { alloc::alloc(layout).cast() }
        ).unwrap_or_else(|| alloc::handle_alloc_error(layout))
    }
}

/// Resizes storage allocated by [`alloc_storage`] from `old_size` to `new_size` elements. Elements
/// within both sizes are kept, anything past `old_size` is uninitialized.
///
/// # Safety
/// `ptr` must have been returned by [`alloc_storage`] (or this function) for `old_size` elements of
/// `T`. Any elements past `new_size` must already have been dropped or moved out. `ptr` must not be
/// used afterwards, only the returned pointer.
///
/// # Panics
/// Panics if the new layout size exceeds [`isize::MAX`].
pub(crate) unsafe fn realloc_storage<T>(
    ptr: NonNull<T>,
    old_size: usize,
    new_size: usize,
) -> NonNull<T> {
    let old_layout = make_layout::<T>(old_size);
    let new_layout = make_layout::<T>(new_size);

    match (old_layout.size(), new_layout.size()) {
        // Zero-sized types are never allocated, so the dangling pointer can be kept.
        _ if mem::size_of::<T>() == 0 => ptr,
        (old, new) if old == new => ptr,
        (0, _) => alloc_storage(new_size),
        (_, 0) => {
            // SAFETY: The caller guarantees that ptr was allocated with old_layout.
            unsafe { dealloc_storage(ptr, old_size) };
            NonNull::dangling()
        },
        (_, new) => {
            // SAFETY: The same layout and allocator are used for the allocation, and the new
            // layout size is > 0 and <= isize::MAX.
            let raw_ptr: *mut T = unsafe {
                alloc::realloc(ptr.as_ptr().cast(), old_layout, new).cast()
            };

            NonNull::new(raw_ptr).unwrap_or_else(|| alloc::handle_alloc_error(new_layout))
        },
    }
}

/// Frees storage allocated by [`alloc_storage`] without dropping any elements.
///
/// # Safety
/// `ptr` must have been returned by [`alloc_storage`] or [`realloc_storage`] for `size` elements of
/// `T` and must not be used afterwards.
pub(crate) unsafe fn dealloc_storage<T>(ptr: NonNull<T>, size: usize) {
    let layout = make_layout::<T>(size);

    if layout.size() != 0 {
        // SAFETY: ptr is always allocated in the global allocator and layout is the same as when
        // allocated. Zero-sized layouts aren't allocated and are guarded against deallocation.
        unsafe { alloc::dealloc(ptr.as_ptr().cast(), layout) }
    }
}

/// Drops `count` initialized elements starting at `ptr`, without freeing the storage.
///
/// # Safety
/// All `count` elements must be initialized, and must not be used again afterwards.
pub(crate) unsafe fn drop_elements<T>(ptr: NonNull<T>, count: usize) {
    // SAFETY: The caller guarantees that the elements are initialized and won't be reused.
    unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(ptr.as_ptr(), count)) }
}
