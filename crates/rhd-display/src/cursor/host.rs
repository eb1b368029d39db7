//! Cursor path for hosts that hand over a prepared 32bpp image and draw it themselves.

use rhd_mmio::RegisterAccess;

use super::regs::{
    HwCursor, CURSOR_CONTROL_MODE_MASK, CURSOR_CONTROL_MODE_SHIFT, CURSOR_PIXELS,
    MAX_CURSOR_HEIGHT, MAX_CURSOR_WIDTH,
};

/// Position the hardware parks a hidden cursor at.
pub const HIDDEN_CURSOR_POS: u32 = 0x1FFF;

/// Largest hotspot the host path programs.
pub const MAX_HOT_SPOT: u32 = 0x3F;

/// Control register mode for the 32bpp host cursor.
pub const HOST_CURSOR_MODE_ARGB: u8 = 3;

/// A cursor image the host converted to 32bpp ARGB, `width` pixels per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCursor {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl PreparedCursor {
    /// Copy into a 64x64 staging image, clearing everything outside the prepared size and
    /// passing every pixel through `gamma`.
    pub(crate) fn stage(&self, image: &mut [u32], gamma: &dyn Fn(u32) -> u32) {
        let stride = MAX_CURSOR_WIDTH as usize;
        let width = self.width.min(MAX_CURSOR_WIDTH) as usize;
        let height = self.height.min(MAX_CURSOR_HEIGHT) as usize;

        for (i, row) in image.chunks_mut(stride).take(CURSOR_PIXELS / stride).enumerate() {
            for (j, px) in row.iter_mut().enumerate() {
                let src = if i < height && j < width {
                    self.pixels
                        .get(i * self.width as usize + j)
                        .copied()
                        .unwrap_or(0)
                } else {
                    0
                };
                *px = gamma(src);
            }
        }
    }
}

/// Last state drawn through the host path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostCursorState {
    pub x: i32,
    pub y: i32,
    pub visible: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct HostCursor {
    pub mode: u8,
    pub bit_depth: u32,
    pub set: bool,
    pub visible: bool,
    pub x: i32,
    pub y: i32,
}

impl HostCursor {
    pub fn state(&self) -> Option<HostCursorState> {
        self.set.then_some(HostCursorState {
            x: self.x,
            y: self.y,
            visible: self.visible,
        })
    }

    /// Update visibility on one cursor; a cursor without an image cannot be shown.
    pub fn draw(
        &mut self,
        cursor: &HwCursor,
        regs: &mut dyn RegisterAccess,
        fb_int_address: u32,
        x: i32,
        y: i32,
        visible: bool,
    ) {
        self.visible = false;
        if visible && (self.bit_depth == 0 || !self.set) {
            return;
        }
        self.visible = visible;
        let mode = self.mode;
        cursor.locked(regs, |cursor, regs| {
            program(cursor, regs, fb_int_address, mode, x, y, visible)
        });
    }
}

fn program(
    cursor: &HwCursor,
    regs: &mut dyn RegisterAccess,
    fb_int_address: u32,
    mode: u8,
    x: i32,
    y: i32,
    visible: bool,
) {
    let (x, y, hot_x, hot_y) = if visible {
        let (x, y, hot_x, hot_y) = super::geometry::clamp_position(x, y);
        (x, y, hot_x.min(MAX_HOT_SPOT), hot_y.min(MAX_HOT_SPOT))
    } else {
        (HIDDEN_CURSOR_POS, HIDDEN_CURSOR_POS, 0, 0)
    };

    cursor.set_position(regs, x, y, hot_x, hot_y);

    let control = cursor.read_control(regs);
    let wanted = (u32::from(mode) << CURSOR_CONTROL_MODE_SHIFT)
        | (control & !CURSOR_CONTROL_MODE_MASK)
        | 1;
    if wanted != control {
        cursor.write_control(regs, wanted);
    }
    cursor.set_image(regs, fb_int_address);
}
