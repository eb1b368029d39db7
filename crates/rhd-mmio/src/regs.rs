use std::collections::BTreeMap;

/// Abstraction for 32-bit memory-mapped register access.
///
/// Reads are defined as `&mut self` since some registers have read side effects (status bits that
/// clear on read), and so that recording implementations can log accesses.
pub trait RegisterAccess {
    fn read(&mut self, offset: u32) -> u32;
    fn write(&mut self, offset: u32, value: u32);

    /// Read-modify-write: only the bits set in `mask` are replaced by the bits of `value`.
    fn mask(&mut self, offset: u32, value: u32, mask: u32) {
        let old = self.read(offset);
        self.write(offset, (old & !mask) | (value & mask));
    }
}

impl<T: RegisterAccess + ?Sized> RegisterAccess for &mut T {
    fn read(&mut self, offset: u32) -> u32 {
        (**self).read(offset)
    }

    fn write(&mut self, offset: u32, value: u32) {
        (**self).write(offset, value)
    }

    fn mask(&mut self, offset: u32, value: u32, mask: u32) {
        (**self).mask(offset, value, mask)
    }
}

/// A single register write, as captured by [`RegisterFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterWrite {
    pub offset: u32,
    pub value: u32,
}

/// Sparse in-memory register file.
///
/// Unwritten registers read back as zero unless seeded with [`RegisterFile::set`]. Every call to
/// [`RegisterAccess::write`] (including the write half of [`RegisterAccess::mask`]) is appended to
/// the write log so sequencing can be inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct RegisterFile {
    values: BTreeMap<u32, u32>,
    writes: Vec<RegisterWrite>,
}

impl RegisterFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a register value without recording a write.
    pub fn set(&mut self, offset: u32, value: u32) {
        self.values.insert(offset, value);
    }

    /// Current value of a register without going through the access trait.
    pub fn peek(&self, offset: u32) -> u32 {
        self.values.get(&offset).copied().unwrap_or(0)
    }

    /// All writes in issue order.
    pub fn writes(&self) -> &[RegisterWrite] {
        &self.writes
    }

    /// Writes that targeted `offset`, in issue order.
    pub fn writes_to(&self, offset: u32) -> impl Iterator<Item = u32> + '_ {
        self.writes
            .iter()
            .filter(move |w| w.offset == offset)
            .map(|w| w.value)
    }
}

impl RegisterAccess for RegisterFile {
    fn read(&mut self, offset: u32) -> u32 {
        self.peek(offset)
    }

    fn write(&mut self, offset: u32, value: u32) {
        tracing::trace!("reg write {offset:#06x} <- {value:#010x}");
        self.values.insert(offset, value);
        self.writes.push(RegisterWrite { offset, value });
    }
}
