use rhd_atombios::AtomEncoder;

use super::OutputKind;
use crate::error::OutputError;

/// One of the two shared DIG encoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigEncoderSlot {
    Dig1,
    Dig2,
}

impl DigEncoderSlot {
    pub const ALL: [Self; 2] = [Self::Dig1, Self::Dig2];

    pub fn index(self) -> usize {
        match self {
            Self::Dig1 => 0,
            Self::Dig2 => 1,
        }
    }

    pub fn encoder(self) -> AtomEncoder {
        match self {
            Self::Dig1 => AtomEncoder::Dig1,
            Self::Dig2 => AtomEncoder::Dig2,
        }
    }
}

/// Which slots an output may be given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPolicy {
    /// Take DIG1 when free, otherwise DIG2.
    PreferFirst,
    /// The LVTMA transmitter can only be fed by DIG2.
    SecondOnly,
}

/// Assignment of the two shared digital encoders to outputs.
///
/// Owned by the device context; every output that needs a DIG encoder allocates from here. The
/// pool assumes the caller serializes access (it is only ever touched from the driver thread).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigEncoderPool {
    slots: [Option<OutputKind>; 2],
}

impl DigEncoderPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holder(&self, slot: DigEncoderSlot) -> Option<OutputKind> {
        self.slots[slot.index()]
    }

    /// Slot currently held by `kind`, if any.
    pub fn slot_of(&self, kind: OutputKind) -> Option<DigEncoderSlot> {
        DigEncoderSlot::ALL
            .into_iter()
            .find(|slot| self.slots[slot.index()] == Some(kind))
    }

    /// Give `kind` a slot according to `policy`.
    ///
    /// Idempotent: an output that already holds a slot gets the same slot back.
    pub fn allocate(
        &mut self,
        kind: OutputKind,
        policy: SlotPolicy,
    ) -> Result<DigEncoderSlot, OutputError> {
        if let Some(slot) = self.slot_of(kind) {
            return Ok(slot);
        }

        let candidates: &[DigEncoderSlot] = match policy {
            SlotPolicy::PreferFirst => &DigEncoderSlot::ALL,
            SlotPolicy::SecondOnly => &[DigEncoderSlot::Dig2],
        };
        let slot = candidates
            .iter()
            .copied()
            .find(|slot| self.slots[slot.index()].is_none())
            .ok_or(OutputError::NoFreeEncoder(kind))?;

        self.slots[slot.index()] = Some(kind);
        Ok(slot)
    }

    /// Release whatever slot `kind` holds.
    pub fn release(&mut self, kind: OutputKind) -> Result<DigEncoderSlot, OutputError> {
        let slot = self
            .slot_of(kind)
            .ok_or(OutputError::EncoderNotHeld(kind))?;
        self.slots[slot.index()] = None;
        Ok(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_dig1_and_falls_back_to_dig2() {
        let mut pool = DigEncoderPool::new();
        assert_eq!(
            pool.allocate(OutputKind::UniphyA, SlotPolicy::PreferFirst),
            Ok(DigEncoderSlot::Dig1)
        );
        assert_eq!(
            pool.allocate(OutputKind::UniphyB, SlotPolicy::PreferFirst),
            Ok(DigEncoderSlot::Dig2)
        );
        assert_eq!(
            pool.allocate(OutputKind::UniphyC, SlotPolicy::PreferFirst),
            Err(OutputError::NoFreeEncoder(OutputKind::UniphyC))
        );
    }

    #[test]
    fn second_only_never_takes_dig1() {
        let mut pool = DigEncoderPool::new();
        assert_eq!(
            pool.allocate(OutputKind::KldskpLvtma, SlotPolicy::SecondOnly),
            Ok(DigEncoderSlot::Dig2)
        );
        assert_eq!(pool.holder(DigEncoderSlot::Dig1), None);

        let mut pool = DigEncoderPool::new();
        pool.allocate(OutputKind::UniphyA, SlotPolicy::PreferFirst).unwrap();
        pool.allocate(OutputKind::UniphyB, SlotPolicy::PreferFirst).unwrap();
        pool.release(OutputKind::UniphyA).unwrap();
        assert_eq!(
            pool.allocate(OutputKind::KldskpLvtma, SlotPolicy::SecondOnly),
            Err(OutputError::NoFreeEncoder(OutputKind::KldskpLvtma))
        );
    }

    #[test]
    fn allocation_is_idempotent() {
        let mut pool = DigEncoderPool::new();
        let first = pool.allocate(OutputKind::UniphyC, SlotPolicy::PreferFirst);
        let second = pool.allocate(OutputKind::UniphyC, SlotPolicy::PreferFirst);
        assert_eq!(first, second);
        assert_eq!(pool.holder(DigEncoderSlot::Dig2), None);
    }

    #[test]
    fn releasing_an_unheld_slot_is_an_error() {
        let mut pool = DigEncoderPool::new();
        assert_eq!(
            pool.release(OutputKind::UniphyD),
            Err(OutputError::EncoderNotHeld(OutputKind::UniphyD))
        );
    }
}
