use rhd_atombios::{
    AtomCall, AtomEncoder, AtomOutputControl, EncoderMode, EncoderParams, LinkCount,
    OutputControlAction,
};

use super::link::wants_dual_link;
use super::path::OutputPath;
use super::sequence::Sequence;
use super::state::OutputState;
use super::ConnectorType;

/// TMDSA and LVTMA: an LVDS/TMDS encoder switched through an output control table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LegacyDigitalPath {
    pub encoder: AtomEncoder,
    pub control: AtomOutputControl,
    /// Driving an LVDS panel rather than a TMDS sink.
    pub panel: bool,
}

impl LegacyDigitalPath {
    fn control(&self, seq: &mut Sequence<'_>, action: OutputControlAction) -> bool {
        seq.run(AtomCall::OutputControl {
            output: self.control,
            action,
        })
    }
}

impl OutputPath for LegacyDigitalPath {
    fn encoder(&self, _state: &OutputState) -> Option<AtomEncoder> {
        Some(self.encoder)
    }

    fn encoder_mode(&self, state: &OutputState) -> EncoderMode {
        if self.panel {
            EncoderMode::Lvds
        } else if self.hdmi_enabled(state) {
            EncoderMode::Hdmi
        } else {
            EncoderMode::Dvi
        }
    }

    fn update_link_config(&self, state: &mut OutputState, connector: ConnectorType) {
        state.set_pixel_clock(state.pixel_clock);
        let count = if wants_dual_link(connector, state.pixel_clock) {
            LinkCount::Dual
        } else {
            LinkCount::Single
        };
        match &mut state.encoder_config.params {
            EncoderParams::Lvds(params) => params.link_count = count,
            EncoderParams::Lvds2(params) => {
                params.link_count = count;
                params.coherent = state.coherent;
            }
            _ => {}
        }
    }

    fn power_on(&self, seq: &mut Sequence<'_>, _state: &OutputState) {
        self.control(seq, OutputControlAction::Enable);
    }

    fn power_reset(&self, seq: &mut Sequence<'_>, _state: &OutputState) {
        self.control(seq, OutputControlAction::Disable);
    }

    fn power_shutdown(&self, seq: &mut Sequence<'_>, _state: &OutputState) {
        self.control(seq, OutputControlAction::Disable);
    }

    fn apply_backlight(&self, seq: &mut Sequence<'_>, _state: &OutputState) {
        self.control(seq, OutputControlAction::LcdBrightnessControl);
    }

    fn hdmi_enabled(&self, state: &OutputState) -> bool {
        matches!(state.encoder_config.params, EncoderParams::Lvds2(params) if params.hdmi)
    }

    fn set_hdmi_enabled(&self, state: &mut OutputState, enabled: bool) {
        if let EncoderParams::Lvds2(params) = &mut state.encoder_config.params {
            params.hdmi = enabled;
        }
    }
}
