//! Buffer pool handle.
//!
//! Page caching and eviction belong to the storage engine. What the rest of
//! the system sees is a pool with a fixed page capacity, shared by reference
//! and replaced wholesale when a test harness asks for a fresh one.

/// Size of a page in bytes.
pub const PAGE_SIZE: usize = 4096;

/// The buffer pool shared by every operator in the process.
#[derive(Debug)]
pub struct BufferPool {
    num_pages: usize,
}

impl BufferPool {
    /// Default number of pages held by a pool.
    pub const DEFAULT_PAGES: usize = 50;

    /// Create a pool that caches up to `num_pages` pages.
    pub fn new(num_pages: usize) -> Self {
        Self { num_pages }
    }

    /// Maximum number of pages this pool holds.
    pub fn num_pages(&self) -> usize {
        self.num_pages
    }

    /// Memory budget of the pool in bytes.
    pub fn capacity_bytes(&self) -> usize {
        self.num_pages.saturating_mul(PAGE_SIZE)
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGES)
    }
}
