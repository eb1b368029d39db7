/// A register captured while a command table executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedRegister {
    pub offset: u32,
    /// Value the register held before the first captured write.
    pub value: u32,
}

/// Registers touched by command tables, with the values needed to undo them.
///
/// Only the first capture of each register is kept: restoring the list must bring a register back
/// to what it was before the driver started sequencing, not to an intermediate value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterSaveList {
    entries: Vec<SavedRegister>,
}

impl RegisterSaveList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pre-write value of `offset`. Returns `false` if the register was already
    /// captured (the earlier value wins).
    pub fn record(&mut self, offset: u32, value: u32) -> bool {
        if self.entries.iter().any(|e| e.offset == offset) {
            return false;
        }
        self.entries.push(SavedRegister { offset, value });
        true
    }

    pub fn get(&self, offset: u32) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.offset == offset)
            .map(|e| e.value)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, SavedRegister> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a RegisterSaveList {
    type Item = &'a SavedRegister;
    type IntoIter = core::slice::Iter<'a, SavedRegister>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
