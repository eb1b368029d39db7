use thiserror::Error;

/// Granularity of driver-owned framebuffer allocations.
pub const FB_CHUNK_ALIGN: u32 = 0x1000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FbAllocError {
    #[error("out of framebuffer memory: requested {requested:#x} bytes, {available:#x} available")]
    OutOfMemory { requested: u32, available: u32 },

    #[error("zero-sized framebuffer allocation")]
    ZeroSize,
}

/// Bump allocator over the tail of the framebuffer aperture.
///
/// Driver-owned surfaces (cursor images and the like) are carved out once at init time and never
/// returned, so there is no free path. Every allocation is rounded up to [`FB_CHUNK_ALIGN`].
#[derive(Debug, Clone)]
pub struct FbAllocator {
    next: u32,
    end: u32,
}

impl FbAllocator {
    /// Allocator over `start..start + size` (VRAM offsets). `start` is rounded up to a chunk.
    pub fn new(start: u32, size: u32) -> Self {
        let end = start.saturating_add(size);
        let next = align_up(start).unwrap_or(end).min(end);
        Self { next, end }
    }

    pub fn available(&self) -> u32 {
        self.end - self.next
    }

    /// Reserve `size` bytes; returns the VRAM offset of the chunk.
    pub fn alloc(&mut self, size: u32, what: &str) -> Result<u32, FbAllocError> {
        if size == 0 {
            return Err(FbAllocError::ZeroSize);
        }
        let chunk = align_up(size).ok_or(FbAllocError::OutOfMemory {
            requested: size,
            available: self.available(),
        })?;
        if chunk > self.available() {
            return Err(FbAllocError::OutOfMemory {
                requested: chunk,
                available: self.available(),
            });
        }
        let base = self.next;
        self.next += chunk;
        tracing::debug!(what, size = chunk, "framebuffer chunk reserved at {base:#x}");
        Ok(base)
    }
}

fn align_up(value: u32) -> Option<u32> {
    value
        .checked_add(FB_CHUNK_ALIGN - 1)
        .map(|v| v & !(FB_CHUNK_ALIGN - 1))
}
