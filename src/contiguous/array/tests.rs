#![cfg(test)]

use std::borrow::Borrow;
use std::cell::Cell;
use std::hash::{BuildHasher, RandomState};
use std::iter;

use super::*;
use crate::util::alloc::{DropCounter, ZeroSizedType};
use crate::util::error::IndexOutOfBounds;
use crate::util::panic::assert_panics;

fn create_squares(size: usize, start: i32) -> ValueArray<i32> {
    let mut squares = ValueArray::new(size);

    for (item, i) in squares.iter_mut().zip(start..) {
        *item = i * i;
    }

    squares
}

#[test]
fn test_construction() {
    let arr: ValueArray<i32> = ValueArray::new(10);
    assert_eq!(arr.size(), 10);
    assert!(arr.iter().all(|i| *i == 0), "All elements should be zero-initialized.");

    let arr = ValueArray::from([1, 2, 3, 4, 5, 6]);
    assert_eq!(arr.size(), 6);
    assert_eq!(arr[2], 3);

    let strings = ValueArray::from(["one", "two", "three"].map(String::from));
    assert_eq!(strings[1], "two");

    let from_slice = ValueArray::from(&[1, 2, 3][..]);
    assert_eq!(from_slice, [1, 2, 3]);

    assert_eq!(create_squares(5, 1), ValueArray::from([1, 4, 9, 16, 25]));
}

#[test]
fn test_empty_owns_no_storage() {
    let arr: ValueArray<i32> = ValueArray::new(0);
    assert_eq!(arr.size(), 0);
    assert_eq!(arr.ptr, ValueArray::<i32>::empty().ptr, "An empty array shouldn't allocate.");
    assert_eq!(ValueArray::<i32>::default(), arr);
}

#[test]
fn test_exact_storage() {
    let arr: ValueArray<u64> = iter::repeat_n(7, 5).chain(iter::once(8)).collect();
    assert_eq!(arr.size(), 6);
    assert_eq!(*arr, [7, 7, 7, 7, 7, 8]);

    // An iterator without an accurate size hint still produces an exactly sized array.
    let arr: ValueArray<usize> = (0..100).filter(|i| i % 3 == 0).collect();
    assert_eq!(arr.size(), 34);
    assert_eq!(arr[33], 99);
}

#[test]
fn test_at() {
    let mut arr: ValueArray<i32> = ValueArray::new(10);

    arr[0] = 42;
    if let Ok(item) = arr.at_mut(1) {
        *item = 665;
    }
    assert_eq!(arr.at(0), Ok(&42));
    assert_eq!(arr.at(1), Ok(&665));

    assert_eq!(arr.at(100), Err(IndexOutOfBounds { index: 100, len: 10 }));
    assert_eq!(arr.at(10), Err(IndexOutOfBounds { index: 10, len: 10 }));
    assert!(arr.at_mut(10).is_err());

    assert_eq!(
        arr.at(10).map_err(|e| e.to_string()),
        Err(String::from("Index 10 out of bounds for collection with 10 elements!"))
    );

    assert_panics!({
        let arr: ValueArray<i32> = ValueArray::new(10);
        let _item = arr[10];
    });
}

#[test]
fn test_copy() {
    let mut data1 = ValueArray::from([1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(data1.size(), 8);

    let data2 = data1.clone();
    assert_eq!(data2.size(), 8);
    assert_eq!(data2[2], 3);
    assert_ne!(data1.ptr, data2.ptr, "A copy should have its own storage.");

    let mut data4 = ValueArray::from([1, 2, 3]);
    assert_ne!(data1, data4);

    data4.clone_from(&data1);
    assert_eq!(data1, data4);

    data1[0] = 100;
    assert_eq!(data4[0], 1, "Mutating the source shouldn't affect the copy.");
    assert_eq!(data2[0], 1);
}

#[test]
fn test_copy_assignment_is_all_or_nothing() {
    #[derive(Debug, PartialEq)]
    struct Fragile(u32);

    thread_local! {
        static CLONES_LEFT: Cell<u32> = const { Cell::new(u32::MAX) };
    }

    impl Clone for Fragile {
        fn clone(&self) -> Self {
            let left = CLONES_LEFT.get();
            if left == 0 {
                panic!("Out of clones!");
            }
            CLONES_LEFT.set(left - 1);
            Fragile(self.0)
        }
    }

    let source = ValueArray::from([Fragile(1), Fragile(2), Fragile(3)]);
    let mut target = ValueArray::from([Fragile(9)]);

    CLONES_LEFT.set(2);
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        target.clone_from(&source);
    }));
    CLONES_LEFT.set(u32::MAX);

    assert!(result.is_err());
    assert_eq!(
        target,
        ValueArray::from([Fragile(9)]),
        "A failed copy assignment should leave the target unmodified."
    );

    target.clone_from(&source);
    assert_eq!(target, source);
}

#[test]
fn test_move() {
    let mut row = ValueArray::from([1, 2, 3, 4, 5, 6]);
    let old_ptr = row.ptr;

    let moved = row.take();
    assert_eq!(moved, [1, 2, 3, 4, 5, 6]);
    assert_eq!(moved.ptr, old_ptr, "Moving shouldn't reallocate.");
    assert_eq!(row.size(), 0, "Moved-from array should be empty.");
    assert!(row.is_empty());

    row = ValueArray::from([0, 0, 0]);
    assert_eq!(row.size(), 3, "Moved-from array should be reusable.");

    let counter = DropCounter::new();
    let mut arr = ValueArray::from_fn(4, |i| counter.track(i));
    let moved = arr.take();
    drop(arr);
    assert_eq!(counter.drops(), 0, "Dropping a moved-from array shouldn't drop anything.");
    drop(moved);
    assert_eq!(counter.drops(), 4, "Elements should be dropped exactly once.");
}

#[test]
fn test_swap() {
    let mut data1 = ValueArray::from([1, 2, 3, 4, 5, 6, 7, 8]);
    let mut data5 = ValueArray::from([665, 667]);

    data1.swap(&mut data5);
    assert_eq!(data1, ValueArray::from([665, 667]));
    assert_eq!(data5, ValueArray::from([1, 2, 3, 4, 5, 6, 7, 8]));

    data1.swap(&mut data5);
    assert_eq!(data1, ValueArray::from([1, 2, 3, 4, 5, 6, 7, 8]));
    assert_eq!(data5, ValueArray::from([665, 667]));
}

#[test]
fn test_drop() {
    let counter = DropCounter::new();
    let arr = ValueArray::from_fn(10, |i| counter.track(i));

    drop(arr);

    assert_eq!(counter.drops(), 10, "10 elements should have been dropped.");
}

#[test]
fn test_panicking_construction() {
    let counter = DropCounter::new();

    assert_panics!(
        {
            ValueArray::from_fn(10, |i| {
                if i == 6 {
                    panic!("Construction failed!");
                }
                counter.track(i)
            });
        },
        message = "Construction failed!"
    );

    assert_eq!(
        counter.drops(),
        6,
        "Elements built before the panic should have been dropped."
    );

    assert_panics!({
        ValueArray::<u64>::new(isize::MAX as usize);
    });
}

#[test]
fn test_zst_support() {
    let arr = ValueArray::<ZeroSizedType>::new(5);
    assert_eq!(arr[0], ZeroSizedType, "Indexing with no offset should work.");
    assert_eq!(arr[4], ZeroSizedType, "Indexing with an in-bounds offset should work.");
    assert_eq!(arr.iter().count(), 5, "Should iterate over the right number of ZST instances.");

    let counter = DropCounter::new();
    let arr: ValueArray<_> = iter::repeat_with(|| counter.track(ZeroSizedType)).take(7).collect();
    assert_eq!(arr.into_iter().rev().count(), 7);
    assert_eq!(counter.drops(), 7);
}

#[test]
fn test_equality_and_hash() {
    let arr = ValueArray::from_fn(5, |i| i);

    assert_eq!(arr, arr, "Equality should be reflexive.");
    assert_eq!(
        arr,
        ValueArray::from([0, 1, 2, 3, 4]),
        "Different construction methods should produce equal results."
    );
    assert_ne!(ValueArray::from([0, 1, 2, 5, 4]), arr);
    assert_ne!(ValueArray::from([0, 1, 2]), arr, "Arrays of different sizes are never equal.");
    assert_ne!(ValueArray::from([1, 2, 3, 4, 5, 6, 7, 8]), ValueArray::from([1, 2, 3]));

    let borrowed: &[usize] = arr.borrow();
    assert_eq!(borrowed, &[0, 1, 2, 3, 4], "Borrow equality should be upheld.");
    assert_eq!(&*arr, &[0, 1, 2, 3, 4], "Deref equality should be upheld.");

    let state = RandomState::new();
    assert_eq!(
        state.hash_one(&arr),
        state.hash_one(ValueArray::from_fn(5, |i| i)),
        "Equal arrays should produce the same hash."
    );
    assert_eq!(
        state.hash_one(&arr),
        state.hash_one([0_usize, 1, 2, 3, 4]),
        "Borrow hash equality should be upheld."
    );
}

#[test]
fn test_iterators() {
    let mut arr = ValueArray::from([1, 2, 3, 4, 5, 6]);

    for item in &mut arr {
        *item *= 2;
    }
    assert_eq!(arr, [2, 4, 6, 8, 10, 12], "Array mutated by iterator should equal this slice.");

    let mut total = 0;
    for item in &arr {
        total += item;
    }
    assert_eq!(total, 42);

    assert_eq!(
        arr,
        arr.clone().into_iter().collect::<ValueArray<_>>(),
        "Cloned and collected array should be equal."
    );

    let mut iter = arr.into_iter();
    assert_eq!(iter.len(), 6);
    assert_eq!(iter.next(), Some(2));
    assert_eq!(iter.next_back(), Some(12));
    assert_eq!(iter.next_back(), Some(10));
    assert_eq!(iter.as_slice(), &[4, 6, 8]);
    assert_eq!(iter.next(), Some(4));
    assert_eq!(iter.next_back(), Some(8));
    assert_eq!(iter.next(), Some(6));
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next_back(), None);

    let counter = DropCounter::new();
    let arr = ValueArray::from_fn(10, |i| counter.track(i));

    let mut iter = arr.into_iter();
    let first = iter.next();
    drop(iter);
    assert_eq!(counter.drops(), 9, "Dropping an owned iterator should drop the remaining elements.");
    drop(first);
    assert_eq!(counter.drops(), 10);
}

/// A type holding a ValueArray needs no special functions of its own to be copied and moved.
#[derive(Debug, Clone, PartialEq)]
struct Person {
    id: u32,
    name: String,
    data: ValueArray<i32>,
}

#[test]
fn test_composition() {
    let mut p1 = Person {
        id: 42,
        name: String::from("Jan"),
        data: ValueArray::from([1, 2, 3]),
    };
    let p2 = Person {
        id: 66,
        name: String::from("Adam"),
        data: ValueArray::from([53, 52, 51]),
    };

    let p3 = p1.clone();
    assert_eq!(p3, p1);

    p1.clone_from(&p2);
    assert_eq!(p1.data, [53, 52, 51]);
    assert_eq!(p3.data, [1, 2, 3], "Copies of the whole type should be deep.");

    let p4 = std::mem::replace(
        &mut p1,
        Person {
            id: 665,
            name: String::from("LessEvil"),
            data: ValueArray::from([665, 667]),
        },
    );
    assert_eq!(p4, p2);
    assert_eq!(p1.id, 665);
}

#[test]
fn test_formatting() {
    let arr = ValueArray::from([1, 2, 3]);
    assert_eq!(format!("{}", arr), "[1, 2, 3]");
    assert_eq!(format!("{:?}", arr), "ValueArray { contents: [1, 2, 3], size: 3 }");
    assert_eq!(format!("{}", ValueArray::<u8>::empty()), "[]");
}

mod properties {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn new_is_zeroed(size in 0_usize..256) {
            let arr: ValueArray<i32> = ValueArray::new(size);
            prop_assert_eq!(arr.size(), size);
            prop_assert!(arr.iter().all(|i| *i == 0));
        }

        #[test]
        fn from_list_keeps_order(list in proptest::collection::vec(any::<i32>(), 0..64)) {
            let arr = ValueArray::from(&list[..]);
            prop_assert_eq!(arr.size(), list.len());
            for (i, item) in list.iter().enumerate() {
                prop_assert_eq!(&arr[i], item);
            }
        }

        #[test]
        fn copies_are_independent(
            list in proptest::collection::vec(any::<i32>(), 1..64),
            value in any::<i32>(),
        ) {
            let mut arr = ValueArray::from(&list[..]);
            let copy = arr.clone();
            prop_assert_eq!(&copy, &arr);

            arr[0] = value;
            prop_assert_eq!(copy[0], list[0]);
        }

        #[test]
        fn take_leaves_empty(list in proptest::collection::vec(any::<i32>(), 0..64)) {
            let mut arr = ValueArray::from(&list[..]);
            let moved = arr.take();
            prop_assert_eq!(&*moved, &list[..]);
            prop_assert_eq!(arr.size(), 0);
        }

        #[test]
        fn at_checks_bounds(list in proptest::collection::vec(any::<i32>(), 0..32), index in 0_usize..48) {
            let arr = ValueArray::from(&list[..]);
            match arr.at(index) {
                Ok(item) => {
                    prop_assert!(index < arr.size());
                    prop_assert_eq!(item, &arr[index]);
                },
                Err(error) => {
                    prop_assert!(index >= arr.size());
                    prop_assert_eq!(error, IndexOutOfBounds { index, len: list.len() });
                },
            }
        }

        #[test]
        fn equality_is_elementwise(
            a in proptest::collection::vec(0_i32..4, 0..8),
            b in proptest::collection::vec(0_i32..4, 0..8),
        ) {
            let arr_a = ValueArray::from(&a[..]);
            let arr_b = ValueArray::from(&b[..]);
            prop_assert_eq!(&arr_a, &arr_a);
            prop_assert_eq!(arr_a == arr_b, arr_b == arr_a);
            prop_assert_eq!(arr_a == arr_b, a == b);
        }

        #[test]
        fn double_swap_restores(
            a in proptest::collection::vec(any::<i32>(), 0..32),
            b in proptest::collection::vec(any::<i32>(), 0..32),
        ) {
            let mut arr_a = ValueArray::from(&a[..]);
            let mut arr_b = ValueArray::from(&b[..]);
            arr_a.swap(&mut arr_b);
            arr_a.swap(&mut arr_b);
            prop_assert_eq!(&*arr_a, &a[..]);
            prop_assert_eq!(&*arr_b, &b[..]);
        }
    }
}
