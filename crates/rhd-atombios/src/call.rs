use crate::config::{CrtcSourceConfig, EncoderConfig, TransmitterConfig};
use crate::ids::{
    AtomCrtc, AtomEncoder, AtomOutputControl, AtomTransmitter, EncoderAction, OutputControlAction,
    TransmitterAction,
};

/// One command table invocation.
///
/// Parameter blocks are borrowed: the interpreter copies what it needs into its argument space and
/// never keeps references past [`crate::AtomBios::execute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomCall<'a> {
    EncoderControl {
        encoder: AtomEncoder,
        action: EncoderAction,
        config: &'a EncoderConfig,
    },
    DigTransmitterControl {
        transmitter: AtomTransmitter,
        action: TransmitterAction,
        config: &'a TransmitterConfig,
    },
    OutputControl {
        output: AtomOutputControl,
        action: OutputControlAction,
    },
    SelectCrtcSource {
        crtc: AtomCrtc,
        config: &'a CrtcSourceConfig,
    },
}

impl AtomCall<'_> {
    /// Parameter-free description of this call, for logs and failure reports.
    pub fn step(&self) -> AtomStep {
        match *self {
            Self::EncoderControl { action, .. } => AtomStep::Encoder(action),
            Self::DigTransmitterControl { action, .. } => AtomStep::Transmitter(action),
            Self::OutputControl { action, .. } => AtomStep::OutputControl(action),
            Self::SelectCrtcSource { .. } => AtomStep::SelectCrtcSource,
        }
    }
}

/// A sequencing step, as named in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomStep {
    Encoder(EncoderAction),
    Transmitter(TransmitterAction),
    OutputControl(OutputControlAction),
    SelectCrtcSource,
}

impl core::fmt::Display for AtomStep {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Encoder(action) => write!(f, "EncoderControl({action:?})"),
            Self::Transmitter(action) => write!(f, "DigTransmitterControl({action:?})"),
            Self::OutputControl(action) => write!(f, "OutputControl({action:?})"),
            Self::SelectCrtcSource => f.write_str("SelectCrtcSource"),
        }
    }
}

/// Values read out of the BIOS data tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomQuery {
    /// Panel power sequencing: digital on to data enable, in ms.
    LvdsSeqDigOntoDe,
    /// Panel power sequencing: data enable to backlight, in ms.
    LvdsSeqDeToBl,
    LvdsOffDelay,
    LvdsDualLink,
    Lvds24Bit,
    LvdsFpdi,
    LvdsTemporalDither,
    LvdsSpatialDither,
    LvdsGreyLevel,
    /// PCIe lane assignment of the chassis connector (IGP only).
    PcieLanes,
}
