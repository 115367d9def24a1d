use std::cell::Cell;
use std::fmt::{self, Debug, Display, Formatter};
use std::marker::PhantomData;
use std::mem::{self, ManuallyDrop};
use std::ops::Deref;
use std::ptr::NonNull;

/// The heap block shared by every [`Shared`] and [`Observer`] of a value.
///
/// `observers` counts every Observer, plus one on behalf of all Shared pointers together. This
/// keeps the block alive while the value is being dropped, even if the value itself holds the
/// last Observer of its own block.
pub(crate) struct SharedBlock<T> {
    pub(crate) owners: Cell<usize>,
    pub(crate) observers: Cell<usize>,
    pub(crate) value: ManuallyDrop<T>,
}

impl<T> SharedBlock<T> {
    // The accessors below only ever borrow a single field, so an owner reading the counts never
    // aliases the value while the last owner is dropping it.

    /// # Safety
    /// `ptr` must refer to a block that is still allocated for the whole of `'a`.
    unsafe fn owners<'a>(ptr: NonNull<SharedBlock<T>>) -> &'a Cell<usize> {
        // SAFETY: The caller guarantees that the block is allocated.
        unsafe { &(*ptr.as_ptr()).owners }
    }

    /// # Safety
    /// `ptr` must refer to a block that is still allocated for the whole of `'a`.
    unsafe fn observers<'a>(ptr: NonNull<SharedBlock<T>>) -> &'a Cell<usize> {
        // SAFETY: The caller guarantees that the block is allocated.
        unsafe { &(*ptr.as_ptr()).observers }
    }

    /// Frees the block itself. The value must already have been dropped or moved out.
    ///
    /// # Safety
    /// `ptr` must have come from [`Shared::new`], no handles may refer to it any longer and it must
    /// not be used after this call.
    unsafe fn free(ptr: NonNull<SharedBlock<T>>) {
        // SAFETY: The block was allocated with Box in Shared::new and the caller guarantees that
        // nothing refers to it. ManuallyDrop prevents the value from being dropped a second time.
        drop(unsafe { Box::from_raw(ptr.as_ptr()) });
    }
}

/// A pointer with shared ownership of a single heap-allocated value, counting its owners. Similar
/// to an [`Rc<T>`](std::rc::Rc).
///
/// Cloning a Shared adds an owner rather than copying the value. The value is dropped once the last
/// owner is, regardless of how many [`Observer`]s remain.
///
/// Owners that refer to each other form a cycle that is never dropped. Use an [`Observer`] for one
/// direction of the relationship instead.
///
/// Shared is single-threaded, it is neither [`Send`] nor [`Sync`].
///
/// # Time Complexity
/// All methods are `O(1)`, excluding the time taken to drop the owned value.
pub struct Shared<T> {
    pub(crate) ptr: NonNull<SharedBlock<T>>,
    pub(crate) _phantom: PhantomData<SharedBlock<T>>,
}

impl<T> Shared<T> {
    /// Moves `value` onto the heap and creates its first owner.
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::pointer::Shared;
    /// let gadget = Shared::new("ipad");
    /// assert_eq!(Shared::owner_count(&gadget), 1);
    /// assert_eq!(*gadget, "ipad");
    /// ```
    pub fn new(value: T) -> Shared<T> {
        let block = Box::new(SharedBlock {
            owners: Cell::new(1),
            observers: Cell::new(1),
            value: ManuallyDrop::new(value),
        });

        Shared {
            ptr: NonNull::from(Box::leak(block)),
            _phantom: PhantomData,
        }
    }

    fn owners(&self) -> &Cell<usize> {
        // SAFETY: The block stays allocated while any owner exists, and self is one.
        unsafe { SharedBlock::owners(self.ptr) }
    }

    fn observers(&self) -> &Cell<usize> {
        // SAFETY: The block stays allocated while any owner exists, and self is one.
        unsafe { SharedBlock::observers(self.ptr) }
    }

    /// Returns the number of owners of the value, including `this`.
    pub fn owner_count(this: &Self) -> usize {
        this.owners().get()
    }

    /// Returns the number of [`Observer`]s of the value.
    pub fn observer_count(this: &Self) -> usize {
        this.observers().get() - 1
    }

    /// Returns true if both Shareds own the same value.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        this.ptr == other.ptr
    }

    /// Creates an [`Observer`] of the value, which doesn't keep it alive.
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::pointer::Shared;
    /// let gadget = Shared::new(42);
    /// let observer = Shared::downgrade(&gadget);
    /// assert_eq!(observer.upgrade().as_deref(), Some(&42));
    ///
    /// drop(gadget);
    /// assert!(observer.upgrade().is_none());
    /// ```
    pub fn downgrade(this: &Self) -> Observer<T> {
        let observers = this.observers();
        observers.set(observers.get() + 1);

        Observer {
            ptr: Some(this.ptr),
            _phantom: PhantomData,
        }
    }

    /// Returns a mutable reference to the value, if `this` is its only owner and it has no
    /// observers.
    pub fn get_mut(this: &mut Self) -> Option<&mut T> {
        if Shared::owner_count(this) == 1 && Shared::observer_count(this) == 0 {
            // SAFETY: this is the only handle to the block, and it is borrowed mutably.
            Some(unsafe { &mut *(*this.ptr.as_ptr()).value })
        } else {
            None
        }
    }

    /// Moves the value out if `this` is its only owner, otherwise returns `this` unchanged.
    /// Remaining observers can no longer upgrade afterwards.
    ///
    /// # Errors
    /// Returns `this` if the value has other owners.
    pub fn try_unwrap(this: Self) -> Result<T, Self> {
        if Shared::owner_count(&this) != 1 {
            return Err(this);
        }

        let ptr = this.ptr;
        mem::forget(this);

        // SAFETY: The only owner has just been forgotten, so nothing else can read the value. The
        // owner count is set to zero straight away, so the value is never read or dropped again.
        let value = unsafe { ManuallyDrop::take(&mut (*ptr.as_ptr()).value) };

        // SAFETY: The block is still allocated, the implicit observer held by owners hasn't been
        // released yet.
        let (owners, observers) = unsafe { (SharedBlock::owners(ptr), SharedBlock::observers(ptr)) };
        owners.set(0);
        observers.set(observers.get() - 1);

        if observers.get() == 0 {
            // SAFETY: There are no owners or observers left.
            unsafe { SharedBlock::free(ptr) };
        }

        Ok(value)
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        let owners = self.owners();
        owners.set(owners.get().checked_add(1).expect("Owner count overflow!"));

        Shared {
            ptr: self.ptr,
            _phantom: PhantomData,
        }
    }
}

impl<T> Drop for Shared<T> {
    fn drop(&mut self) {
        let owners = self.owners();
        owners.set(owners.get() - 1);

        if owners.get() != 0 {
            return;
        }

        // SAFETY: This was the last owner, so no references to the value remain and it won't be
        // accessed again. The block itself is kept alive by the implicit observer.
        unsafe { ManuallyDrop::drop(&mut (*self.ptr.as_ptr()).value) };

        // The value may have dropped Observers of this block in the meantime.
        let observers = self.observers();
        observers.set(observers.get() - 1);

        if observers.get() == 0 {
            // SAFETY: There are no owners or observers left.
            unsafe { SharedBlock::free(self.ptr) };
        }
    }
}

impl<T> Deref for Shared<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        // SAFETY: The value is only dropped or moved out once the last owner is gone, and self is
        // an owner for the lifetime of the reference.
        unsafe { &(*self.ptr.as_ptr()).value }
    }
}

impl<T> AsRef<T> for Shared<T> {
    fn as_ref(&self) -> &T {
        self
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Shared::new(T::default())
    }
}

impl<T> From<T> for Shared<T> {
    fn from(value: T) -> Self {
        Shared::new(value)
    }
}

impl<T: PartialEq> PartialEq for Shared<T> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<T: Eq> Eq for Shared<T> {}

impl<T: Debug> Debug for Shared<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shared")
            .field("value", &**self)
            .field("owners", &Shared::owner_count(self))
            .field("observers", &Shared::observer_count(self))
            .finish()
    }
}

impl<T: Display> Display for Shared<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&**self, f)
    }
}

/// A non-owning reference to a value owned by [`Shared`] pointers. An Observer can look the value
/// up with [`Observer::upgrade`] while it is alive, but never keeps it alive itself.
pub struct Observer<T> {
    pub(crate) ptr: Option<NonNull<SharedBlock<T>>>,
    pub(crate) _phantom: PhantomData<SharedBlock<T>>,
}

impl<T> Observer<T> {
    /// Creates an Observer that doesn't observe anything. Upgrading it always returns [`None`].
    pub const fn new() -> Observer<T> {
        Observer {
            ptr: None,
            _phantom: PhantomData,
        }
    }

    fn owners(&self) -> Option<&Cell<usize>> {
        // SAFETY: The block stays allocated while any observer refers to it, and self is one.
        self.ptr.map(|ptr| unsafe { SharedBlock::owners(ptr) })
    }

    fn observers(&self) -> Option<&Cell<usize>> {
        // SAFETY: The block stays allocated while any observer refers to it, and self is one.
        self.ptr.map(|ptr| unsafe { SharedBlock::observers(ptr) })
    }

    /// Attempts to create a new owner of the observed value. Returns [`None`] if the value has
    /// already been dropped, or if this Observer was created with [`Observer::new`].
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::pointer::{Observer, Shared};
    /// let nothing: Observer<u8> = Observer::new();
    /// assert!(nothing.upgrade().is_none());
    ///
    /// let gadget = Shared::new(42);
    /// let observer = Shared::downgrade(&gadget);
    /// let owner = observer.upgrade();
    /// assert_eq!(Shared::owner_count(&gadget), 2);
    /// assert!(owner.is_some_and(|owner| Shared::ptr_eq(&owner, &gadget)));
    /// ```
    pub fn upgrade(&self) -> Option<Shared<T>> {
        let ptr = self.ptr?;
        let owners = self.owners()?;

        if owners.get() == 0 {
            return None;
        }

        owners.set(owners.get() + 1);
        Some(Shared {
            ptr,
            _phantom: PhantomData,
        })
    }

    /// Returns true if the observed value hasn't been dropped yet.
    pub fn is_alive(&self) -> bool {
        self.owner_count() != 0
    }

    /// Returns the number of owners of the observed value, zero if it has been dropped.
    pub fn owner_count(&self) -> usize {
        self.owners().map_or(0, Cell::get)
    }

    /// Returns true if both Observers refer to the same allocation, or both observe nothing.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }
}

impl<T> Default for Observer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Observer<T> {
    fn clone(&self) -> Self {
        if let Some(observers) = self.observers() {
            observers.set(observers.get() + 1);
        }

        Observer {
            ptr: self.ptr,
            _phantom: PhantomData,
        }
    }
}

impl<T> Drop for Observer<T> {
    fn drop(&mut self) {
        let Some(ptr) = self.ptr else {
            return;
        };

        // SAFETY: self still counts as an observer, so the block is allocated.
        let observers = unsafe { SharedBlock::observers(ptr) };
        observers.set(observers.get() - 1);

        if observers.get() == 0 {
            // SAFETY: Owners hold an implicit observer, so reaching zero means none of them remain
            // either.
            unsafe { SharedBlock::free(ptr) };
        }
    }
}

impl<T> Debug for Observer<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.ptr {
            Some(_) if self.is_alive() => write!(f, "Observer(<alive>)"),
            Some(_) => write!(f, "Observer(<dropped>)"),
            None => write!(f, "Observer(<none>)"),
        }
    }
}
