//! Interface to the ATOM BIOS command table interpreter.
//!
//! The interpreter itself (byte-code execution, data table parsing) lives outside of this
//! workspace. This crate only defines the boundary the display engine programs against:
//! - typed identifiers for encoders, transmitters, output controls, devices and CRTCs ([`ids`]),
//! - the parameter blocks handed to the command tables ([`EncoderConfig`], [`TransmitterConfig`],
//!   [`CrtcSourceConfig`]),
//! - the set of command table invocations the engine issues ([`AtomCall`]), and
//! - the register capture list that records what a command table wrote ([`RegisterSaveList`]).
//!
//! All command table calls report success as a plain `bool`, mirroring the firmware contract:
//! there is no richer failure information to surface, so callers log the failing step by name
//! (see [`AtomStep`]) and decide locally whether the rest of a sequence still makes sense.

#![forbid(unsafe_code)]

mod call;
mod config;
pub mod ids;
mod savelist;

pub use call::{AtomCall, AtomQuery, AtomStep};
pub use config::{
    CrtcSourceConfig, DacStandard, EncoderConfig, EncoderParams, Lvds2Params, LvdsParams,
    TemporalDither, TransmitterConfig,
};
pub use ids::{
    AtomCrtc, AtomDevice, AtomEncoder, AtomOutputControl, AtomTransmitter, EncoderAction,
    EncoderMode, LinkCount, OutputControlAction, TransmitterAction, TransmitterLink,
};
pub use savelist::{RegisterSaveList, SavedRegister};

/// Version of an ATOM command table as reported by its header.
///
/// Only the content revision (`cref`) drives parameter layout decisions in the display engine; the
/// format revision is carried along for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodeTableVersion {
    pub fref: u8,
    pub cref: u8,
}

impl CodeTableVersion {
    pub const fn new(fref: u8, cref: u8) -> Self {
        Self { fref, cref }
    }
}

impl core::fmt::Display for CodeTableVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}", self.fref, self.cref)
    }
}

/// Boundary between the display engine and the ATOM BIOS interpreter.
///
/// Implementations execute firmware command tables synchronously. The engine never assumes
/// anything about what a table does beyond its return value; register side effects are only
/// observable through the capture list (see [`AtomBios::set_register_list_location`]).
pub trait AtomBios {
    /// Execute one command table. Returns `true` on success.
    fn execute(&mut self, call: AtomCall<'_>) -> bool;

    /// Header version of the encoder control table used for `encoder`.
    fn encoder_control_version(&mut self, encoder: AtomEncoder) -> CodeTableVersion;

    /// Header version of the SelectCRTC_Source table.
    fn select_crtc_source_version(&mut self) -> CodeTableVersion;

    /// Read a value out of the BIOS data tables. `None` if the table or field is missing.
    fn query(&mut self, query: AtomQuery) -> Option<u32>;

    /// Backlight level stored in the BIOS scratch registers, if the BIOS tracks one.
    fn backlight_level(&mut self) -> Option<i32>;

    /// Store a backlight level into the BIOS scratch registers.
    fn set_backlight_level(&mut self, level: i32);

    /// Install (`Some`) or remove (`None`) the register capture list.
    ///
    /// While a list is installed, every register write performed by an executed command table is
    /// recorded into it. Installing hands the list to the interpreter; removing hands it back.
    /// The return value is whatever list was installed before the call.
    fn set_register_list_location(
        &mut self,
        list: Option<RegisterSaveList>,
    ) -> Option<RegisterSaveList>;

    /// Write every register of a capture list back to its recorded value.
    fn restore_registers(&mut self, list: &RegisterSaveList) -> bool;
}

impl<T: AtomBios + ?Sized> AtomBios for &mut T {
    fn execute(&mut self, call: AtomCall<'_>) -> bool {
        (**self).execute(call)
    }

    fn encoder_control_version(&mut self, encoder: AtomEncoder) -> CodeTableVersion {
        (**self).encoder_control_version(encoder)
    }

    fn select_crtc_source_version(&mut self) -> CodeTableVersion {
        (**self).select_crtc_source_version()
    }

    fn query(&mut self, query: AtomQuery) -> Option<u32> {
        (**self).query(query)
    }

    fn backlight_level(&mut self) -> Option<i32> {
        (**self).backlight_level()
    }

    fn set_backlight_level(&mut self, level: i32) {
        (**self).set_backlight_level(level)
    }

    fn set_register_list_location(
        &mut self,
        list: Option<RegisterSaveList>,
    ) -> Option<RegisterSaveList> {
        (**self).set_register_list_location(list)
    }

    fn restore_registers(&mut self, list: &RegisterSaveList) -> bool {
        (**self).restore_registers(list)
    }
}
