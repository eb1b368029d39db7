//! RadeonHD display output control.
//!
//! Two subsystems live here:
//! - [`output`]: the ATOM-driven output configuration engine. It turns mode, power and property
//!   requests for one display path into encoder/transmitter parameter blocks and drives the ATOM
//!   BIOS command tables in the order the hardware needs them.
//! - [`cursor`]: the hardware cursor register protocol for the two CRTCs (double-buffered
//!   registers updated under the cursor update lock, bitmap to ARGB conversion, visibility).
//!
//! Register access and the ATOM interpreter are external collaborators, reached through
//! [`rhd_mmio::RegisterAccess`]/[`rhd_mmio::VramAccess`] and [`rhd_atombios::AtomBios`].
//!
//! Everything runs on the caller's thread; methods take `&mut self` and borrow the collaborators
//! for the duration of one call. The digital encoder pool ([`output::DigEncoderPool`]) is the only
//! state shared between outputs and is passed explicitly.

#![forbid(unsafe_code)]

pub mod crtc;
pub mod cursor;
pub mod error;
pub mod mode;
pub mod output;

pub use crtc::{crtc_pair, Crtc, CrtcPair};
pub use cursor::{CursorBits, CursorController, HostCursorState, HwCursor, PreparedCursor};
pub use error::{CursorError, OutputError, PropertyError};
pub use mode::{DisplayMode, ModeStatus};
pub use output::{
    AtomBacklight, AtomOutput, AtomOutputConfig, ConnectorType, DigEncoderPool, DigEncoderSlot,
    HdmiBlock, OutputCaps, OutputKind, OutputProperty, PowerState, PropertyAction, PropertyValue,
    SensedType, TvMode,
};
