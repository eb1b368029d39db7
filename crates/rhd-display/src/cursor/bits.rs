use crate::error::CursorError;

use super::regs::{CURSOR_PIXELS, MAX_CURSOR_HEIGHT, MAX_CURSOR_WIDTH};

/// Bytes per row of a 1bpp cursor bitmap; rows are padded to 32 bits.
pub fn bitmap_pitch(width: u32) -> usize {
    (((width as usize) + 31) >> 5) << 2
}

/// A realized two-color cursor: 1bpp source and mask planes, LSB first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorBits {
    width: u32,
    height: u32,
    source: Vec<u8>,
    mask: Vec<u8>,
}

impl CursorBits {
    /// Take a copy of the host's source and mask bitmaps.
    pub fn new(width: u32, height: u32, source: &[u8], mask: &[u8]) -> Result<Self, CursorError> {
        let len = bitmap_pitch(width) * height as usize;
        for plane in [source, mask] {
            if plane.len() < len {
                return Err(CursorError::ShortImage {
                    expected: len,
                    actual: plane.len(),
                });
            }
        }
        Ok(Self {
            width,
            height,
            source: source[..len].to_vec(),
            mask: mask[..len].to_vec(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Render into a 64x64 ARGB image (stride 64).
    ///
    /// Masked-out pixels are transparent; the rest take `color1` where the source bit is set and
    /// `color0` otherwise. Anything beyond 64x64 is dropped.
    pub fn to_argb(&self, dest: &mut [u32], color0: u32, color1: u32) {
        let stride = MAX_CURSOR_WIDTH as usize;
        let pitch = bitmap_pitch(self.width);
        let width = self.width.min(MAX_CURSOR_WIDTH) as usize;
        let height = self.height.min(MAX_CURSOR_HEIGHT) as usize;

        let dest_len = dest.len();
        let dest = &mut dest[..CURSOR_PIXELS.min(dest_len)];
        dest.fill(0);

        let rows = self
            .source
            .chunks_exact(pitch.max(1))
            .zip(self.mask.chunks_exact(pitch.max(1)))
            .take(height);
        for ((src, mask), out) in rows.zip(dest.chunks_mut(stride)) {
            for (x, px) in out.iter_mut().take(width).enumerate() {
                let bit = 1u8 << (x & 7);
                *px = if mask[x / 8] & bit == 0 {
                    0
                } else if src[x / 8] & bit != 0 {
                    color1
                } else {
                    color0
                };
            }
        }
    }
}
