//! Workgroup-local scratch memory.
//!
//! A cache passes through three states during processing of one tile:
//!
//! 1. [SharedCache]: writable; invocations of the workgroup store
//!    the tile and its halo.
//! 2. [SealedCache]: read-only; produced by [SharedCache::barrier],
//!    the rendezvous of all invocations of the workgroup after loading.
//! 3. Discarded: [SealedCache::discard] invalidates the content and
//!    gives back the storage to be reused for the next tile.
//!
//! Cached values are never carried over from one tile to another.

/// Writable state of a workgroup cache.
#[derive(Debug)]
pub(crate) struct SharedCache<T> {
    slots: Vec<T>,
    #[cfg(debug_assertions)]
    written: Vec<bool>,
}

impl<T: Copy + Default> SharedCache<T> {
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![T::default(); len],
            #[cfg(debug_assertions)]
            written: vec![false; len],
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline(always)]
    pub fn store(&mut self, slot: usize, value: T) {
        self.slots[slot] = value;
        #[cfg(debug_assertions)]
        {
            self.written[slot] = true;
        }
    }

    /// Intra-group barrier: returns read-only view of the cache after
    /// all invocations of the workgroup have finished their writes.
    pub fn barrier(self) -> SealedCache<T> {
        #[cfg(debug_assertions)]
        {
            let missed = self.written.iter().filter(|&&w| !w).count();
            debug_assert!(missed == 0, "{missed} cache slots weren't loaded");
        }
        SealedCache { inner: self }
    }
}

/// Read-only state of a workgroup cache.
#[derive(Debug)]
pub(crate) struct SealedCache<T> {
    inner: SharedCache<T>,
}

impl<T: Copy + Default> SealedCache<T> {
    #[inline(always)]
    pub fn get(&self, slot: usize) -> T {
        self.inner.slots[slot]
    }

    /// Invalidates content of the cache.
    pub fn discard(self) -> SharedCache<T> {
        let mut inner = self.inner;
        #[cfg(debug_assertions)]
        inner.written.iter_mut().for_each(|w| *w = false);
        inner
    }
}
