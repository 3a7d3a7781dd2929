use alloc::collections::TryReserveError;
use alloc::vec::Vec;

use super::handle::Handle;

/// Why the arena could not guarantee room for one more element.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum ReserveError {
    /// Every representable `Handle` is already in use.
    Exhausted,
    /// The backing allocation could not grow.
    Alloc(TryReserveError),
}

pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Makes sure the next [`alloc`](Self::alloc) neither allocates nor panics.
    ///
    /// On failure the arena is left untouched.
    pub(crate) fn reserve_one(&mut self) -> Result<(), ReserveError> {
        if !self.free.is_empty() {
            return Ok(());
        }
        if self.slots.len() >= Handle::MAX {
            return Err(ReserveError::Exhausted);
        }
        self.slots.try_reserve(1).map_err(ReserveError::Alloc)
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(h) = self.free.pop() {
            // Reuse a free slot/handle.
            self.slots[h.to_index()] = Some(element);
            h
        } else {
            // Strict less-than keeps every slot index representable as a `Handle`.
            assert!(
                self.slots.len() < Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX
            );
            self.slots.push(Some(element));
            Handle::from_index(self.slots.len() - 1)
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.to_index()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    /// Empties a slot without recording it for reuse.
    ///
    /// Only for callers that finish with [`clear`](Self::clear): the slot stays
    /// unusable until then, and the arena's length stops being meaningful.
    pub(crate) fn evict(&mut self, handle: Handle) -> T {
        self.slots[handle.to_index()].take().expect("`Arena::evict()` - `handle` is invalid!")
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn arena_capacity() {
        let arena: Arena<u32> = Arena::with_capacity(10);
        assert!(arena.capacity() >= 10);
    }

    #[test]
    fn reserve_one_reuses_free_slots() {
        let mut arena: Arena<u32> = Arena::new();
        let handle = arena.alloc(7);
        assert_eq!(arena.take(handle), 7);
        assert_eq!(arena.reserve_one(), Ok(()));
        assert_eq!(arena.alloc(8), handle);
    }

    #[test]
    fn reserve_one_reports_exhaustion() {
        let mut arena: Arena<()> = Arena::new();
        for _ in 0..Handle::MAX {
            assert_eq!(arena.reserve_one(), Ok(()));
            arena.alloc(());
        }
        assert_eq!(arena.reserve_one(), Err(ReserveError::Exhausted));
        assert_eq!(arena.len(), Handle::MAX);
    }

    #[test]
    fn evict_leaves_free_list_empty() {
        let mut arena: Arena<u32> = Arena::new();
        let handles: Vec<Handle> = (0..8).map(|v| arena.alloc(v)).collect();
        for (value, &handle) in handles.iter().enumerate() {
            assert_eq!(arena.evict(handle) as usize, value);
        }
        assert!(arena.free.is_empty());
        assert_eq!(arena.free.capacity(), 0);

        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.alloc(9), Handle::from_index(0));
    }

    #[test]
    #[should_panic(expected = "`Arena::evict()` - `handle` is invalid!")]
    fn evict_twice_panics() {
        let mut arena: Arena<u32> = Arena::new();
        let handle = arena.alloc(1);
        arena.evict(handle);
        arena.evict(handle);
    }

    #[test]
    #[should_panic(expected = "`Arena::get()` - `handle` is invalid!")]
    fn get_after_take_panics() {
        let mut arena: Arena<u32> = Arena::new();
        let handle = arena.alloc(1);
        arena.take(handle);
        let _ = arena.get(handle);
    }

    proptest! {
        #[test]
        fn arena_behaves_like_vec(operations in prop::collection::vec(strategy(), 0..256)) {
            let mut model: Vec<(Handle, u32)> = Vec::new();
            let mut arena: Arena<u32> = Arena::new();

            for operation in operations {
                match operation {
                    Operation::Alloc(value) => {
                        prop_assert!(arena.reserve_one().is_ok());
                        let handle = arena.alloc(value);
                        model.push((handle, value));
                    }
                    Operation::GetMut(which, value) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let handle = model[index].0;
                        *arena.get_mut(handle) = value;
                        model[index].1 = value;
                    }
                    Operation::Take(which) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let handle = model[index].0;
                        let value1 = arena.take(handle);
                        let (_, value2) = model.swap_remove(index);
                        prop_assert_eq!(value1, value2);
                    }
                    Operation::Clear => {
                        arena.clear();
                        model.clear();
                    }
                }

                prop_assert_eq!(arena.len(), model.len());
                prop_assert_eq!(arena.is_empty(), model.is_empty());

                for &(handle, value) in &model {
                    prop_assert_eq!(*arena.get(handle), value);
                }
            }
        }
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Alloc(u32),
        GetMut(usize, u32),
        Take(usize),
        Clear,
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            20 => any::<u32>().prop_map(Operation::Alloc),
            5 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Operation::GetMut(which, value)),
            5 => any::<usize>().prop_map(Operation::Take),
            1 => Just(Operation::Clear),
        ]
    }
}
