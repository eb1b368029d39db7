/// CPU-visible framebuffer aperture.
///
/// Offsets are relative to the start of VRAM as mapped through the framebuffer BAR, which is the
/// same coordinate space the [`crate::FbAllocator`] hands out.
pub trait VramAccess {
    fn write_bytes(&mut self, offset: u32, data: &[u8]);
    fn read_bytes(&mut self, offset: u32, buf: &mut [u8]);

    fn write_u32_slice(&mut self, offset: u32, data: &[u32]) {
        let mut bytes = Vec::with_capacity(data.len() * 4);
        for px in data {
            bytes.extend_from_slice(&px.to_le_bytes());
        }
        self.write_bytes(offset, &bytes);
    }
}

/// `Vec`-backed VRAM.
///
/// Out-of-range accesses are clipped: writes past the end are dropped and reads past the end fill
/// with zero. Real apertures behave similarly (writes beyond the BAR are ignored).
#[derive(Debug, Clone)]
pub struct VecVram {
    data: Vec<u8>,
}

impl VecVram {
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size],
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Little-endian `u32` at `offset`, or `None` if it does not fit.
    pub fn read_u32(&self, offset: u32) -> Option<u32> {
        let start = usize::try_from(offset).ok()?;
        let end = start.checked_add(4)?;
        let bytes = self.data.get(start..end)?;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn clip(&self, offset: u32, len: usize) -> Option<core::ops::Range<usize>> {
        let start = usize::try_from(offset).ok()?;
        if start >= self.data.len() {
            return None;
        }
        let end = start.saturating_add(len).min(self.data.len());
        Some(start..end)
    }
}

impl VramAccess for VecVram {
    fn write_bytes(&mut self, offset: u32, data: &[u8]) {
        let Some(range) = self.clip(offset, data.len()) else {
            tracing::warn!(offset, len = data.len(), "VRAM write outside aperture dropped");
            return;
        };
        let n = range.len();
        self.data[range].copy_from_slice(&data[..n]);
    }

    fn read_bytes(&mut self, offset: u32, buf: &mut [u8]) {
        buf.fill(0);
        if let Some(range) = self.clip(offset, buf.len()) {
            let n = range.len();
            buf[..n].copy_from_slice(&self.data[range]);
        }
    }
}
