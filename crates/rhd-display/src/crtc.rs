/// Driver-side view of one CRTC, as far as outputs and cursors care.
///
/// `x`/`y` is the origin of the CRTC's viewport inside the framebuffer and `width`/`height` its
/// visible size. `screen` identifies the logical screen that owns the CRTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Crtc {
    pub index: usize,
    pub screen: usize,
    pub active: bool,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Crtc {
    pub fn new(index: usize, screen: usize) -> Self {
        Self {
            index,
            screen,
            ..Self::default()
        }
    }

    /// Mark the CRTC active and scanning out the given viewport.
    pub fn activate(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.active = true;
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

/// The chip has exactly two CRTCs.
pub type CrtcPair = [Crtc; 2];

/// Both CRTCs, idle, owned by `screen`.
pub fn crtc_pair(screen: usize) -> CrtcPair {
    [Crtc::new(0, screen), Crtc::new(1, screen)]
}

/// Whether both CRTCs are scanning out.
pub fn dual_head_active(crtcs: &CrtcPair) -> bool {
    crtcs[0].active && crtcs[1].active
}
