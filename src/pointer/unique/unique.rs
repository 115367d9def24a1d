use std::fmt::{self, Debug, Display, Formatter, Pointer};
use std::marker::PhantomData;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};

use crate::util::error::NullDereference;

// NOTE: Allocation goes through Box<T> rather than alloc directly. Box handles zero-sized types
// and gives us a matching deallocation for free, while still letting us hold a bare pointer.

/// A pointer with exclusive ownership of a single heap-allocated value. Similar to a
/// [`Box<T>`], except that a Unique can also be empty.
///
/// A Unique can't be cloned, ownership can only be moved from one Unique to another. The owned
/// value is dropped and freed exactly once, when the owning Unique is dropped, reset or assigned
/// over.
///
/// ```compile_fail
/// # use ownership_lib::pointer::Unique;
/// fn duplicate<T: Clone>(value: &T) -> T {
///     value.clone()
/// }
///
/// let ptr = Unique::new(5);
/// let other = duplicate(&ptr);
/// ```
///
/// # Time Complexity
/// All methods are `O(1)`, excluding the time taken to drop the owned value.
pub struct Unique<T> {
    pub(crate) ptr: Option<NonNull<T>>,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T> Unique<T> {
    /// Creates an empty Unique, which doesn't own anything.
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::pointer::Unique;
    /// let ptr: Unique<u8> = Unique::empty();
    /// assert!(ptr.is_empty());
    /// assert_eq!(ptr.get(), None);
    /// ```
    pub const fn empty() -> Unique<T> {
        Unique {
            ptr: None,
            _phantom: PhantomData,
        }
    }

    /// Moves `value` onto the heap and creates a Unique that owns it.
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::pointer::Unique;
    /// let ptr = Unique::new(String::from("ipad"));
    /// assert!(ptr.is_some());
    /// assert_eq!(ptr.len(), 4);
    /// ```
    pub fn new(value: T) -> Unique<T> {
        Unique::from(Box::new(value))
    }

    /// Takes ownership of the value behind `raw`. A null pointer produces an empty Unique.
    ///
    /// # Safety
    /// If non-null, `raw` must have been produced by [`Box::into_raw`] or [`Unique::into_raw`] and
    /// must not be owned by anything else. The value will be freed when the Unique is dropped.
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::pointer::Unique;
    /// let raw = Box::into_raw(Box::new(42));
    /// let ptr = unsafe { Unique::from_raw(raw) };
    /// assert_eq!(*ptr, 42);
    ///
    /// let null: Unique<i32> = unsafe { Unique::from_raw(std::ptr::null_mut()) };
    /// assert!(null.is_empty());
    /// ```
    pub unsafe fn from_raw(raw: *mut T) -> Unique<T> {
        Unique {
            ptr: NonNull::new(raw),
            _phantom: PhantomData,
        }
    }

    /// Gives up ownership of the held value and returns its raw pointer, which is null if the
    /// Unique was empty. The caller becomes responsible for freeing the value, e.g. by passing it
    /// back to [`Unique::from_raw`].
    pub fn into_raw(self) -> *mut T {
        let raw = self.as_ptr().cast_mut();
        mem::forget(self);
        raw
    }

    /// Gives up ownership of the held value as a [`Box<T>`], or returns [`None`] if empty.
    pub fn into_box(mut self) -> Option<Box<T>> {
        self.release()
    }

    /// Releases the held value as a [`Box<T>`], leaving this Unique empty.
    pub fn release(&mut self) -> Option<Box<T>> {
        self.ptr.take().map(|ptr| {
            // SAFETY: The pointer was created from a Box and ownership has just been removed from
            // self, so this is the only owner.
            unsafe { Box::from_raw(ptr.as_ptr()) }
        })
    }

    /// Moves ownership out of this Unique into a new one, leaving this one empty. This is the
    /// equivalent of moving out of a place that remains in use afterwards.
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::pointer::Unique;
    /// let mut ptr = Unique::new(42);
    /// let other = ptr.take();
    ///
    /// assert!(ptr.is_empty());
    /// assert_eq!(*other, 42);
    /// ```
    pub fn take(&mut self) -> Unique<T> {
        Unique {
            ptr: self.ptr.take(),
            _phantom: PhantomData,
        }
    }

    /// Drops the currently owned value (if any) and takes ownership of the value held by `other`.
    ///
    /// Assigning a Unique to itself can't be expressed in safe code, but if `other` refers to the
    /// same address as self, nothing is dropped. Zero-sized values all share one dangling address,
    /// so for them the old value is always dropped.
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::pointer::Unique;
    /// let mut ptr = Unique::new(String::from("ipad"));
    /// let mut other = Unique::new(String::from("smartwatch"));
    ///
    /// ptr.assign(other.take());
    /// assert_eq!(*ptr, "smartwatch");
    /// assert!(other.is_empty());
    /// ```
    pub fn assign(&mut self, mut other: Unique<T>) {
        let same_value = match (self.ptr, other.ptr) {
            (None, None) => true,
            // Only reachable through from_raw misuse. Distinct zero-sized values share an address.
            (Some(ours), Some(theirs)) => ours == theirs && mem::size_of::<T>() != 0,
            _ => false,
        };

        if same_value {
            mem::forget(other);
            return;
        }

        mem::swap(self, &mut other);
        // other now holds the old value and is dropped here.
    }

    /// Drops the owned value, leaving the Unique empty.
    pub fn reset(&mut self) {
        drop(self.release());
    }

    /// Returns true if this Unique owns a value.
    pub const fn is_some(&self) -> bool {
        self.ptr.is_some()
    }

    /// Returns true if this Unique doesn't own a value.
    pub const fn is_empty(&self) -> bool {
        self.ptr.is_none()
    }

    /// Returns the address of the owned value, or a null pointer if empty. The pointer is only
    /// valid for as long as this Unique keeps ownership.
    pub const fn as_ptr(&self) -> *const T {
        match self.ptr {
            Some(ptr) => ptr.as_ptr(),
            None => ptr::null(),
        }
    }

    /// Returns a reference to the owned value, or [`None`] if empty.
    pub const fn get(&self) -> Option<&T> {
        match self.ptr {
            // SAFETY: The pointer is valid, aligned and initialized for as long as self owns it.
            // The returned reference borrows self, so it can't outlive the owner.
            Some(ptr) => Some(unsafe { ptr.as_ref() }),
            None => None,
        }
    }

    /// Returns a mutable reference to the owned value, or [`None`] if empty.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self.ptr {
            // SAFETY: As with get, and self is borrowed mutably so no other reference exists.
            Some(mut ptr) => Some(unsafe { ptr.as_mut() }),
            None => None,
        }
    }

    /// Returns a reference to the owned value.
    ///
    /// # Errors
    /// Returns [`NullDereference`] if the Unique is empty.
    pub fn try_get(&self) -> Result<&T, NullDereference> {
        self.get().ok_or(NullDereference)
    }

    /// Returns a mutable reference to the owned value.
    ///
    /// # Errors
    /// Returns [`NullDereference`] if the Unique is empty.
    pub fn try_get_mut(&mut self) -> Result<&mut T, NullDereference> {
        self.get_mut().ok_or(NullDereference)
    }
}

impl<T> Default for Unique<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<Box<T>> for Unique<T> {
    fn from(value: Box<T>) -> Self {
        Unique {
            ptr: Some(NonNull::from(Box::leak(value))),
            _phantom: PhantomData,
        }
    }
}

impl<T> Drop for Unique<T> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<T> Deref for Unique<T> {
    type Target = T;

    /// # Panics
    /// Panics with [`NullDereference`] if the Unique is empty.
    fn deref(&self) -> &Self::Target {
        match self.try_get() {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }
}

impl<T> DerefMut for Unique<T> {
    /// # Panics
    /// Panics with [`NullDereference`] if the Unique is empty.
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self.try_get_mut() {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }
}

impl<T> PartialEq for Unique<T> {
    /// Two Uniques are equal if they refer to the same address. In safe code that only happens
    /// when both are empty, or when `T` is zero-sized, since every zero-sized value lives at the
    /// same dangling address.
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }
}

impl<T> Eq for Unique<T> {}

// SAFETY: A Unique is the only owner of its value, so sending it is the same as sending a T.
unsafe impl<T: Send> Send for Unique<T> {}
// SAFETY: Shared access to a Unique only gives out shared references to T.
unsafe impl<T: Sync> Sync for Unique<T> {}

impl<T: Debug> Debug for Unique<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => f.debug_tuple("Unique").field(value).finish(),
            None => write!(f, "Unique(<empty>)"),
        }
    }
}

impl<T: Display> Display for Unique<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => Display::fmt(value, f),
            None => write!(f, "<empty>"),
        }
    }
}

impl<T> Pointer for Unique<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Pointer::fmt(&self.as_ptr(), f)
    }
}
