use rhd_mmio::{RegisterAccess, VramAccess};
use tracing::{debug, warn};

pub const D1CUR_CONTROL: u32 = 0x6400;
pub const D1CUR_SURFACE_ADDRESS: u32 = 0x6408;
pub const D1CUR_SIZE: u32 = 0x6410;
pub const D1CUR_POSITION: u32 = 0x6414;
pub const D1CUR_HOT_SPOT: u32 = 0x6418;
pub const D1CUR_UPDATE: u32 = 0x6424;

/// Distance between the D1 and D2 cursor register blocks.
pub const CURSOR_REG_STRIDE: u32 = 0x800;

/// D*CURSOR_UPDATE_LOCK. `*_DISABLE_MULTIPLE_UPDATE` stays zero and the other bits are read-only,
/// so the update register is written whole.
pub const CURSOR_UPDATE_LOCK: u32 = 0x0001_0000;

/// Pre-multiplied ARGB mode, enabled. The mode is kept when disabling.
pub const CURSOR_CONTROL_ENABLE: u32 = 0x0000_0201;
pub const CURSOR_CONTROL_DISABLE: u32 = 0x0000_0200;
pub const CURSOR_CONTROL_MODE_MASK: u32 = 0x0000_0300;
pub const CURSOR_CONTROL_MODE_SHIFT: u32 = 8;

pub const MAX_CURSOR_WIDTH: u32 = 64;
pub const MAX_CURSOR_HEIGHT: u32 = 64;
pub const CURSOR_PIXELS: usize = (MAX_CURSOR_WIDTH * MAX_CURSOR_HEIGHT) as usize;
pub const CURSOR_IMAGE_BYTES: u32 = MAX_CURSOR_WIDTH * MAX_CURSOR_HEIGHT * 4;

/// Register values captured for VT switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorSnapshot {
    pub control: u32,
    /// Surface address relative to the framebuffer's internal address.
    pub offset: u32,
    pub size: u32,
    pub position: u32,
    pub hot_spot: u32,
}

/// Hardware cursor of one CRTC.
///
/// The cursor registers are double buffered and latched at vertical blank. Writes between
/// [`HwCursor::lock`]`(true)` and `lock(false)` are applied together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HwCursor {
    index: usize,
    reg_offset: u32,
    base: u32,
    x: i32,
    y: i32,
    snapshot: Option<CursorSnapshot>,
}

impl HwCursor {
    /// Cursor of CRTC `index` with its image at VRAM offset `base`.
    pub fn new(index: usize, base: u32) -> Self {
        Self {
            index,
            reg_offset: index as u32 * CURSOR_REG_STRIDE,
            base,
            x: 0,
            y: 0,
            snapshot: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn reg_offset(&self) -> u32 {
        self.reg_offset
    }

    /// VRAM offset of the 64x64 ARGB image.
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Last requested position, before negative coordinates are folded into the hotspot.
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub(crate) fn set_requested_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub fn snapshot(&self) -> Option<&CursorSnapshot> {
        self.snapshot.as_ref()
    }

    fn reg(&self, reg: u32) -> u32 {
        self.reg_offset + reg
    }

    pub fn lock(&self, regs: &mut dyn RegisterAccess, lock: bool) {
        let value = if lock { CURSOR_UPDATE_LOCK } else { 0 };
        regs.write(self.reg(D1CUR_UPDATE), value);
    }

    /// Run `f` with the update lock held.
    pub fn locked<R>(
        &self,
        regs: &mut dyn RegisterAccess,
        f: impl FnOnce(&Self, &mut dyn RegisterAccess) -> R,
    ) -> R {
        self.lock(regs, true);
        let result = f(self, regs);
        self.lock(regs, false);
        result
    }

    /// Coordinates are absolute, and must already be non-negative.
    pub fn set_position(
        &self,
        regs: &mut dyn RegisterAccess,
        x: u32,
        y: u32,
        hot_x: u32,
        hot_y: u32,
    ) {
        regs.write(self.reg(D1CUR_POSITION), x << 16 | y);
        regs.write(self.reg(D1CUR_HOT_SPOT), hot_x << 16 | hot_y);
    }

    pub fn set_size(&self, regs: &mut dyn RegisterAccess, width: u32, height: u32) {
        debug_assert!((1..=MAX_CURSOR_WIDTH).contains(&width));
        debug_assert!((1..=MAX_CURSOR_HEIGHT).contains(&height));
        regs.write(self.reg(D1CUR_SIZE), (width - 1) << 16 | (height - 1));
    }

    pub fn enable(&self, regs: &mut dyn RegisterAccess, enable: bool) {
        let value = if enable {
            CURSOR_CONTROL_ENABLE
        } else {
            CURSOR_CONTROL_DISABLE
        };
        regs.write(self.reg(D1CUR_CONTROL), value);
    }

    /// Point the cursor at its (already uploaded) image.
    pub fn set_image(&self, regs: &mut dyn RegisterAccess, fb_int_address: u32) {
        regs.write(
            self.reg(D1CUR_SURFACE_ADDRESS),
            fb_int_address.wrapping_add(self.base),
        );
    }

    /// Copy a full 64x64 ARGB image into the cursor's VRAM chunk.
    pub fn upload(&self, vram: &mut dyn VramAccess, image: &[u32]) {
        let len = image.len().min(CURSOR_PIXELS);
        vram.write_u32_slice(self.base, &image[..len]);
    }

    pub fn read_control(&self, regs: &mut dyn RegisterAccess) -> u32 {
        regs.read(self.reg(D1CUR_CONTROL))
    }

    pub fn write_control(&self, regs: &mut dyn RegisterAccess, value: u32) {
        regs.write(self.reg(D1CUR_CONTROL), value);
    }

    pub fn save(&mut self, regs: &mut dyn RegisterAccess, fb_int_address: u32) {
        let snapshot = CursorSnapshot {
            control: regs.read(self.reg(D1CUR_CONTROL)),
            offset: regs
                .read(self.reg(D1CUR_SURFACE_ADDRESS))
                .wrapping_sub(fb_int_address),
            size: regs.read(self.reg(D1CUR_SIZE)),
            position: regs.read(self.reg(D1CUR_POSITION)),
            hot_spot: regs.read(self.reg(D1CUR_HOT_SPOT)),
        };
        debug!("cursor {}: saved {snapshot:x?}", self.index);
        self.snapshot = Some(snapshot);
    }

    /// Write the saved registers back. Returns `false` (and writes nothing) without a prior save.
    pub fn restore(&self, regs: &mut dyn RegisterAccess, fb_int_address: u32) -> bool {
        let Some(s) = self.snapshot else {
            warn!("cursor {}: trying to restore uninitialized values", self.index);
            return false;
        };
        regs.write(self.reg(D1CUR_CONTROL), s.control);
        regs.write(
            self.reg(D1CUR_SURFACE_ADDRESS),
            s.offset.wrapping_add(fb_int_address),
        );
        regs.write(self.reg(D1CUR_SIZE), s.size);
        regs.write(self.reg(D1CUR_POSITION), s.position);
        regs.write(self.reg(D1CUR_HOT_SPOT), s.hot_spot);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rhd_mmio::{RegisterFile, RegisterWrite};

    #[test]
    fn second_cursor_uses_the_d2_block() {
        let cursor = HwCursor::new(1, 0x4000);
        let mut regs = RegisterFile::new();
        cursor.enable(&mut regs, true);
        assert_eq!(regs.peek(0x6c00), CURSOR_CONTROL_ENABLE);
    }

    #[test]
    fn locked_brackets_the_writes() {
        let cursor = HwCursor::new(0, 0);
        let mut regs = RegisterFile::new();
        cursor.locked(&mut regs, |c, regs| c.set_size(regs, 64, 64));
        assert_eq!(
            regs.writes(),
            &[
                RegisterWrite {
                    offset: D1CUR_UPDATE,
                    value: CURSOR_UPDATE_LOCK
                },
                RegisterWrite {
                    offset: D1CUR_SIZE,
                    value: 0x003f_003f
                },
                RegisterWrite {
                    offset: D1CUR_UPDATE,
                    value: 0
                },
            ]
        );
    }

    #[test]
    fn save_and_restore_round_trip_the_surface_offset() {
        let mut cursor = HwCursor::new(0, 0x1000);
        let mut regs = RegisterFile::new();
        regs.set(D1CUR_CONTROL, 0x201);
        regs.set(D1CUR_SURFACE_ADDRESS, 0xC000_1000);
        regs.set(D1CUR_POSITION, 0x0010_0020);

        cursor.save(&mut regs, 0xC000_0000);
        assert_eq!(cursor.snapshot().map(|s| s.offset), Some(0x1000));

        // The framebuffer moved while we were switched away.
        assert!(cursor.restore(&mut regs, 0xD000_0000));
        assert_eq!(regs.peek(D1CUR_SURFACE_ADDRESS), 0xD000_1000);
        assert_eq!(regs.peek(D1CUR_POSITION), 0x0010_0020);
    }

    #[test]
    fn restore_without_save_writes_nothing() {
        let cursor = HwCursor::new(0, 0);
        let mut regs = RegisterFile::new();
        assert!(!cursor.restore(&mut regs, 0));
        assert!(regs.writes().is_empty());
    }
}
