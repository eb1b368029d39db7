use rhd_atombios::{AtomStep, CodeTableVersion};
use rhd_mmio::FbAllocError;
use thiserror::Error;

use crate::output::{ConnectorType, OutputKind, OutputProperty};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OutputError {
    #[error("{kind}: connector type {connector:?} is not supported")]
    UnsupportedConnector {
        kind: OutputKind,
        connector: ConnectorType,
    },

    #[error("{kind}: unsupported {table} table version {version}")]
    UnsupportedTableVersion {
        kind: OutputKind,
        table: &'static str,
        version: CodeTableVersion,
    },

    #[error("{0}: PCIe lane configuration unavailable from the BIOS")]
    PcieLanesUnavailable(OutputKind),

    #[error("{0}: no CRTC assigned")]
    NoCrtc(OutputKind),

    #[error("{0}: both digital encoders are in use")]
    NoFreeEncoder(OutputKind),

    #[error("{0}: does not hold a digital encoder")]
    EncoderNotHeld(OutputKind),

    #[error("{kind}: command table steps failed: {steps:?}")]
    SequenceFailed {
        kind: OutputKind,
        steps: Vec<AtomStep>,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PropertyError {
    #[error("property {0:?} is not supported on this output")]
    NotSupported(OutputProperty),

    #[error("property value has the wrong type for {0:?}")]
    WrongType(OutputProperty),

    #[error("cannot commit {0:?}: no mode has been set")]
    NoMode(OutputProperty),

    #[error(transparent)]
    Output(#[from] OutputError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CursorError {
    #[error("cannot reserve cursor image: {0}")]
    OutOfVram(#[from] FbAllocError),

    #[error("cursor {width}x{height} exceeds the 64x64 hardware limit")]
    TooLarge { width: u32, height: u32 },

    #[error("cursor image data too short: expected {expected} entries, got {actual}")]
    ShortImage { expected: usize, actual: usize },
}
