use std::cell::Cell;
use std::fmt::{self, Debug, Formatter};
use std::rc::Rc;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ZeroSizedType;

/// Counts how many [`Tracked`] values created from it have been dropped.
#[derive(Debug, Default, Clone)]
pub struct DropCounter(Rc<Cell<usize>>);

impl DropCounter {
    pub fn new() -> DropCounter {
        DropCounter::default()
    }

    pub fn track<T>(&self, value: T) -> Tracked<T> {
        Tracked {
            value,
            counter: self.clone(),
        }
    }

    pub fn drops(&self) -> usize {
        self.0.get()
    }
}

/// A value that reports its own drop to a [`DropCounter`]. Clones report to the same counter.
#[derive(Clone)]
pub struct Tracked<T> {
    pub value: T,
    counter: DropCounter,
}

impl<T: PartialEq> PartialEq for Tracked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Debug> Debug for Tracked<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tracked").field(&self.value).finish()
    }
}

impl<T> Drop for Tracked<T> {
    fn drop(&mut self) {
        let count = &self.counter.0;
        count.set(count.get() + 1);
    }
}
