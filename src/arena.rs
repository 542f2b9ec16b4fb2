//! Linear arena - bump allocator over the host's permanent memory
//!
//! The host hands over one pre-sized byte region at startup. Everything the
//! simulation keeps for the lifetime of the process (the tile grid) is carved
//! out of it front to back. Nothing is ever freed individually; the region is
//! reclaimed as a whole when the host drops it.

use bytemuck::Pod;

/// Bump allocator over a borrowed byte region.
///
/// Every reservation hands out the block starting at `base + used` and then
/// advances `used`. Handed-out blocks live as long as the region itself.
pub struct Arena<'a> {
    /// Not-yet-reserved tail of the region
    remaining: &'a mut [u8],
    /// Total size of the region in bytes
    capacity: usize,
    /// Bytes handed out so far (including alignment padding)
    used: usize,
}

impl<'a> Arena<'a> {
    /// Wrap the host's memory region.
    pub fn new(memory: &'a mut [u8]) -> Self {
        let capacity = memory.len();
        log::debug!("Arena created over {} bytes", capacity);
        Self {
            remaining: memory,
            capacity,
            used: 0,
        }
    }

    /// Reserve `size` raw bytes.
    ///
    /// # Panics
    /// If `size` exceeds the free space. Running out of arena is a
    /// configuration error, never a recoverable condition.
    pub fn reserve(&mut self, size: usize) -> &'a mut [u8] {
        assert!(
            size <= self.free(),
            "arena exhausted: requested {} bytes, {} free of {}",
            size,
            self.free(),
            self.capacity
        );

        let memory = std::mem::take(&mut self.remaining);
        let (block, rest) = memory.split_at_mut(size);
        self.remaining = rest;
        self.used += size;
        block
    }

    /// Reserve room for `count` values of `T`.
    ///
    /// The block is aligned for `T`; any padding this needs is counted as used.
    ///
    /// # Panics
    /// If `size_of::<T>() * count` overflows or the block does not fit.
    pub fn reserve_array<T: Pod>(&mut self, count: usize) -> &'a mut [T] {
        let size = std::mem::size_of::<T>()
            .checked_mul(count)
            .unwrap_or_else(|| panic!("arena array size overflow: {} x {}", count, std::mem::size_of::<T>()));

        let padding = self.remaining.as_ptr().align_offset(std::mem::align_of::<T>());
        assert!(
            padding < std::mem::align_of::<T>(),
            "arena memory cannot be aligned for this type"
        );
        if padding > 0 {
            self.reserve(padding);
        }

        bytemuck::cast_slice_mut(self.reserve(size))
    }

    /// Total size of the region in bytes
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes handed out so far
    pub fn used(&self) -> usize {
        self.used
    }

    /// Bytes still available
    pub fn free(&self) -> usize {
        self.remaining.len()
    }
}
