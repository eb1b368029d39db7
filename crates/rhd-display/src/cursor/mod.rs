//! Hardware cursor support.
//!
//! Each CRTC has a 64x64 pre-multiplied ARGB cursor plane. Two-color bitmap cursors are converted
//! to ARGB in a staging image which is then uploaded into the cursor's VRAM chunk. All register
//! updates go through the cursor update lock so they latch together.
//!
//! [`CursorController`] implements the per-screen entry points a host cursor layer calls (show,
//! hide, move, load, colors, VT save/restore), plus the per-CRTC operations used by RandR.

mod bits;
pub mod geometry;
mod host;
pub mod regs;

use rhd_mmio::{FbAllocator, RegisterAccess, VramAccess};
use tracing::{debug, trace};

use crate::crtc::{dual_head_active, CrtcPair};
use crate::error::CursorError;

pub use bits::{bitmap_pitch, CursorBits};
pub use host::{
    HostCursorState, PreparedCursor, HIDDEN_CURSOR_POS, HOST_CURSOR_MODE_ARGB, MAX_HOT_SPOT,
};
pub use regs::{
    CursorSnapshot, HwCursor, CURSOR_IMAGE_BYTES, CURSOR_PIXELS, MAX_CURSOR_HEIGHT,
    MAX_CURSOR_WIDTH,
};

use geometry::{has_visible_cursor, place_cursor};
use host::HostCursor;

/// Cursor state of one screen, covering both CRTCs.
#[derive(Debug, Clone)]
pub struct CursorController {
    screen: usize,
    fb_int_address: u32,
    cursors: [HwCursor; 2],
    color0: u32,
    color1: u32,
    bits: Option<CursorBits>,
    image: Vec<u32>,
    image_loaded: bool,
    frame_x: i32,
    frame_y: i32,
    host: HostCursor,
}

impl CursorController {
    /// Reserve one cursor image chunk per CRTC.
    ///
    /// `fb_int_address` is the framebuffer's address in the GPU's internal address space; cursor
    /// surface registers take internal addresses.
    pub fn new(
        screen: usize,
        fb_int_address: u32,
        allocator: &mut FbAllocator,
    ) -> Result<Self, CursorError> {
        let base0 = allocator.alloc(CURSOR_IMAGE_BYTES, "cursor image")?;
        let base1 = allocator.alloc(CURSOR_IMAGE_BYTES, "cursor image")?;
        debug!("screen {screen}: cursor images at {base0:#x} and {base1:#x}");

        Ok(Self {
            screen,
            fb_int_address,
            cursors: [HwCursor::new(0, base0), HwCursor::new(1, base1)],
            color0: 0,
            color1: 0,
            bits: None,
            image: vec![0; CURSOR_PIXELS],
            image_loaded: false,
            frame_x: 0,
            frame_y: 0,
            host: HostCursor::default(),
        })
    }

    pub fn cursor(&self, index: usize) -> &HwCursor {
        &self.cursors[index & 1]
    }

    /// Current 64x64 staging image.
    pub fn image(&self) -> &[u32] {
        &self.image
    }

    /// `(background, foreground)`, both forced opaque.
    pub fn colors(&self) -> (u32, u32) {
        (self.color0, self.color1)
    }

    pub fn bits(&self) -> Option<&CursorBits> {
        self.bits.as_ref()
    }

    /// Origin of the visible part of the framebuffer; host positions are relative to it.
    pub fn set_frame_origin(&mut self, x: i32, y: i32) {
        self.frame_x = x;
        self.frame_y = y;
    }

    /// Whether a cursor of this size fits the hardware.
    pub fn use_hw_cursor(width: u32, height: u32) -> bool {
        width <= MAX_CURSOR_WIDTH && height <= MAX_CURSOR_HEIGHT
    }

    /// Keep a private copy of a two-color cursor for later loading.
    pub fn realize(
        width: u32,
        height: u32,
        source: &[u8],
        mask: &[u8],
    ) -> Result<CursorBits, CursorError> {
        CursorBits::new(width, height, source, mask)
    }

    fn on_screen(&self, crtcs: &CrtcPair) -> Vec<usize> {
        (0..crtcs.len())
            .filter(|&i| crtcs[i].screen == self.screen)
            .collect()
    }

    fn active_on_screen(&self, crtcs: &CrtcPair) -> Vec<usize> {
        (0..crtcs.len())
            .filter(|&i| crtcs[i].screen == self.screen && crtcs[i].active)
            .collect()
    }

    pub fn show(&mut self, regs: &mut dyn RegisterAccess, crtcs: &CrtcPair) {
        for i in self.active_on_screen(crtcs) {
            let (x, y) = self.cursors[i].position();
            if has_visible_cursor(&crtcs[i], x, y) {
                self.crtc_show(regs, i);
            }
        }
    }

    pub fn hide(&mut self, regs: &mut dyn RegisterAccess, crtcs: &CrtcPair) {
        for i in self.active_on_screen(crtcs) {
            self.crtc_hide(regs, i);
        }
    }

    /// Move the cursor to `x`,`y` relative to the frame origin.
    pub fn set_position(
        &mut self,
        regs: &mut dyn RegisterAccess,
        crtcs: &CrtcPair,
        x: i32,
        y: i32,
    ) {
        let (x, y) = (x.saturating_add(self.frame_x), y.saturating_add(self.frame_y));
        for i in self.active_on_screen(crtcs) {
            if has_visible_cursor(&crtcs[i], x, y) {
                self.crtc_set_position(regs, crtcs, i, x, y);
            }
        }
    }

    /// Set the two bitmap colors. An active bitmap cursor is re-rendered and reloaded.
    pub fn set_colors(
        &mut self,
        regs: &mut dyn RegisterAccess,
        vram: &mut dyn VramAccess,
        crtcs: &CrtcPair,
        bg: u32,
        fg: u32,
    ) {
        self.crtc_set_colors(bg, fg);
        let Some(bits) = self.bits.as_ref() else {
            return;
        };
        bits.to_argb(&mut self.image, self.color0, self.color1);
        self.load_all(regs, vram, crtcs);
    }

    pub fn load_bitmap(
        &mut self,
        regs: &mut dyn RegisterAccess,
        vram: &mut dyn VramAccess,
        crtcs: &CrtcPair,
        bits: CursorBits,
    ) {
        bits.to_argb(&mut self.image, self.color0, self.color1);
        self.bits = Some(bits);
        self.load_all(regs, vram, crtcs);
    }

    /// Load a true-color cursor of `width`x`height` pixels, `width` pixels per row.
    pub fn load_argb(
        &mut self,
        regs: &mut dyn RegisterAccess,
        vram: &mut dyn VramAccess,
        crtcs: &CrtcPair,
        width: u32,
        height: u32,
        argb: &[u32],
    ) -> Result<(), CursorError> {
        if !Self::use_hw_cursor(width, height) {
            return Err(CursorError::TooLarge { width, height });
        }
        let expected = width as usize * height as usize;
        if argb.len() < expected {
            return Err(CursorError::ShortImage {
                expected,
                actual: argb.len(),
            });
        }

        self.bits = None;
        self.image.fill(0);
        if width > 0 {
            let stride = MAX_CURSOR_WIDTH as usize;
            for (row, src) in self
                .image
                .chunks_mut(stride)
                .zip(argb.chunks(width as usize))
                .take(height as usize)
            {
                row[..src.len()].copy_from_slice(src);
            }
        }
        self.load_all(regs, vram, crtcs);
        Ok(())
    }

    /// Save the cursor registers of every CRTC on this screen, active or not.
    pub fn save(&mut self, regs: &mut dyn RegisterAccess, crtcs: &CrtcPair) {
        let fb = self.fb_int_address;
        for i in self.on_screen(crtcs) {
            self.cursors[i].save(regs, fb);
        }
    }

    pub fn restore(&mut self, regs: &mut dyn RegisterAccess, crtcs: &CrtcPair) {
        let fb = self.fb_int_address;
        for i in self.active_on_screen(crtcs) {
            self.cursors[i].locked(regs, |cursor, regs| cursor.restore(regs, fb));
        }
    }

    /// Upload the current image again, e.g. after VRAM contents were lost.
    pub fn reload(
        &mut self,
        regs: &mut dyn RegisterAccess,
        vram: &mut dyn VramAccess,
        crtcs: &CrtcPair,
    ) {
        if !self.image_loaded {
            trace!("screen {}: no cursor image to reload", self.screen);
            return;
        }
        self.load_all(regs, vram, crtcs);
    }

    fn load_all(
        &mut self,
        regs: &mut dyn RegisterAccess,
        vram: &mut dyn VramAccess,
        crtcs: &CrtcPair,
    ) {
        for i in self.on_screen(crtcs) {
            self.crtc_load_argb(regs, vram, i);
        }
    }

    pub fn crtc_show(&mut self, regs: &mut dyn RegisterAccess, index: usize) {
        self.cursors[index & 1].locked(regs, |cursor, regs| cursor.enable(regs, true));
    }

    pub fn crtc_hide(&mut self, regs: &mut dyn RegisterAccess, index: usize) {
        self.cursors[index & 1].locked(regs, |cursor, regs| cursor.enable(regs, false));
    }

    /// Position the cursor of CRTC `index` at absolute `x`,`y`.
    pub fn crtc_set_position(
        &mut self,
        regs: &mut dyn RegisterAccess,
        crtcs: &CrtcPair,
        index: usize,
        x: i32,
        y: i32,
    ) {
        let index = index & 1;
        let placement = place_cursor(&crtcs[index], dual_head_active(crtcs), x, y);
        let cursor = &mut self.cursors[index];
        cursor.set_requested_position(x, y);

        cursor.locked(regs, |cursor, regs| {
            if let Some(width) = placement.width {
                cursor.set_size(regs, width, MAX_CURSOR_HEIGHT);
            }
            cursor.set_position(
                regs,
                placement.x,
                placement.y,
                placement.hot_x,
                placement.hot_y,
            );
        });
    }

    /// Store both colors, forced opaque. Does not touch the hardware.
    pub fn crtc_set_colors(&mut self, bg: u32, fg: u32) {
        self.color0 = bg | 0xff00_0000;
        self.color1 = fg | 0xff00_0000;
    }

    /// Upload the staging image for CRTC `index` and make it current at full size.
    pub fn crtc_load_argb(
        &mut self,
        regs: &mut dyn RegisterAccess,
        vram: &mut dyn VramAccess,
        index: usize,
    ) {
        let fb = self.fb_int_address;
        let image = &self.image;
        self.cursors[index & 1].locked(regs, |cursor, regs| {
            cursor.upload(vram, image);
            cursor.set_image(regs, fb);
            cursor.set_size(regs, MAX_CURSOR_WIDTH, MAX_CURSOR_HEIGHT);
        });
        self.image_loaded = true;
    }

    /// Install a host-prepared cursor on every active CRTC.
    ///
    /// `prepared` is `None` when the host could not produce a 32bpp image; the cursor is then
    /// hidden and `false` returned.
    pub fn set_hardware_cursor(
        &mut self,
        regs: &mut dyn RegisterAccess,
        vram: &mut dyn VramAccess,
        crtcs: &CrtcPair,
        prepared: Option<&PreparedCursor>,
        gamma: &dyn Fn(u32) -> u32,
    ) -> bool {
        let active: Vec<usize> = (0..crtcs.len()).filter(|&i| crtcs[i].active).collect();
        if active.is_empty() {
            return true;
        }

        self.host.set = false;
        let Some(prepared) = prepared else {
            self.host.mode = 0;
            self.host.bit_depth = 0;
            for i in active {
                self.host
                    .draw(&self.cursors[i], regs, self.fb_int_address, 0, 0, false);
            }
            return false;
        };

        self.host.mode = HOST_CURSOR_MODE_ARGB;
        self.host.bit_depth = 32;
        prepared.stage(&mut self.image, gamma);
        self.bits = None;
        for i in active {
            self.crtc_load_argb(regs, vram, i);
        }
        self.host.set = true;
        true
    }

    /// Move and show or hide the host cursor. Returns `false` when no cursor is installed.
    pub fn draw_hardware_cursor(
        &mut self,
        regs: &mut dyn RegisterAccess,
        crtcs: &CrtcPair,
        x: i32,
        y: i32,
        visible: bool,
    ) -> bool {
        if !self.host.set {
            return false;
        }
        self.host.x = x;
        self.host.y = y;
        for i in (0..2).filter(|&i| crtcs[i].active) {
            self.host
                .draw(&self.cursors[i], regs, self.fb_int_address, x, y, visible);
        }
        true
    }

    /// Position and visibility last drawn, `None` before a cursor was installed.
    pub fn hardware_cursor_state(&self) -> Option<HostCursorState> {
        self.host.state()
    }
}
