//! Whole-tree teardown must not touch the heap beyond freeing it.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use topdown_rbtree::{NaturalOrder, RBTree};

/// Counts allocations made by the current thread while armed.
struct CountingAlloc;

static ALLOCATIONS: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static ARMED: Cell<bool> = const { Cell::new(false) };
}

fn note_allocation() {
    if ARMED.try_with(Cell::get).unwrap_or(false) {
        ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
    }
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        note_allocation();
        unsafe { System.alloc(layout) }
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        note_allocation();
        unsafe { System.alloc_zeroed(layout) }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        note_allocation();
        unsafe { System.realloc(ptr, layout, new_size) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) }
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

/// Runs `f` and returns how many allocations it made on this thread.
fn allocations_during(f: impl FnOnce()) -> usize {
    let before = ALLOCATIONS.load(Ordering::Relaxed);
    ARMED.with(|armed| armed.set(true));
    f();
    ARMED.with(|armed| armed.set(false));
    ALLOCATIONS.load(Ordering::Relaxed) - before
}

#[test]
fn teardown_never_allocates() {
    // Random order leaves the tree bushy, so clearing rotates many left links.
    let mut x: u64 = 12_345;
    let keys: Vec<u64> = (0..100_000)
        .map(|_| {
            x = x.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            x >> 20
        })
        .collect();

    let mut tree: RBTree<u64> = keys.iter().copied().collect();
    let len = tree.len();
    assert!(len > 90_000);
    assert_eq!(allocations_during(|| tree.clear()), 0, "clear allocated");
    assert!(tree.is_empty());

    // Refilling reuses the retained slot storage.
    tree.extend(keys.iter().copied());
    assert_eq!(tree.len(), len);
    assert_eq!(allocations_during(|| drop(tree)), 0, "drop allocated");

    let mut released = 0usize;
    let mut counted = RBTree::with_comparator_and_disposer(NaturalOrder, |_: u64| released += 1);
    counted.extend(keys.iter().copied());
    assert_eq!(allocations_during(|| counted.destroy()), 0, "destroy allocated");
    assert_eq!(released, len);
}
