use rhd_atombios::{AtomEncoder, EncoderMode};

use super::analog::AnalogPath;
use super::legacy::LegacyDigitalPath;
use super::sequence::Sequence;
use super::state::OutputState;
use super::unified::UnifiedDigitalPath;
use super::{ConnectorType, SlotPolicy};

/// Behaviour that differs between the three classes of ATOM outputs.
pub(crate) trait OutputPath {
    /// Encoder the power sequence switches on and off.
    fn encoder(&self, state: &OutputState) -> Option<AtomEncoder>;

    /// Encoder mode reported to SelectCRTC_Source (table v2).
    fn encoder_mode(&self, state: &OutputState) -> EncoderMode;

    /// Recompute the parameter blocks for `state.pixel_clock`.
    fn update_link_config(&self, state: &mut OutputState, connector: ConnectorType);

    /// Steps before CRTC source selection. Returns `false` to abort the mode set.
    fn mode_set(&self, _seq: &mut Sequence<'_>, _state: &OutputState) -> bool {
        true
    }

    /// Runs after the encoder has been switched on.
    fn power_on(&self, seq: &mut Sequence<'_>, state: &OutputState);

    fn power_reset(&self, seq: &mut Sequence<'_>, state: &OutputState);

    /// Runs before the encoder is switched off.
    fn power_shutdown(&self, seq: &mut Sequence<'_>, state: &OutputState);

    /// Program the backlight level currently stored in `state`.
    fn apply_backlight(&self, seq: &mut Sequence<'_>, state: &OutputState);

    fn hdmi_enabled(&self, _state: &OutputState) -> bool {
        false
    }

    fn set_hdmi_enabled(&self, _state: &mut OutputState, _enabled: bool) {}

    /// `None` when the output does not use the shared DIG encoders.
    fn slot_policy(&self) -> Option<SlotPolicy> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputVariant {
    Analog(AnalogPath),
    Legacy(LegacyDigitalPath),
    Unified(UnifiedDigitalPath),
}

impl OutputVariant {
    pub fn path(&self) -> &dyn OutputPath {
        match self {
            Self::Analog(path) => path,
            Self::Legacy(path) => path,
            Self::Unified(path) => path,
        }
    }
}
