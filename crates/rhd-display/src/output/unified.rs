use rhd_atombios::{
    AtomCall, AtomEncoder, AtomTransmitter, EncoderMode, EncoderParams, TransmitterAction,
};
use tracing::debug;

use super::link::compute_link_config;
use super::path::OutputPath;
use super::sequence::Sequence;
use super::state::OutputState;
use super::{ConnectorType, SlotPolicy};

/// KLDSKP_LVTMA and UNIPHYA-F: a shared DIG encoder feeding a transmitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UnifiedDigitalPath {
    pub transmitter: AtomTransmitter,
    /// The LVTMA transmitter has no init step and can only use DIG2.
    pub lvtma: bool,
}

impl UnifiedDigitalPath {
    fn transmit(
        &self,
        seq: &mut Sequence<'_>,
        state: &OutputState,
        action: TransmitterAction,
    ) -> bool {
        seq.run(AtomCall::DigTransmitterControl {
            transmitter: self.transmitter,
            action,
            config: &state.transmitter_config,
        })
    }
}

impl OutputPath for UnifiedDigitalPath {
    fn encoder(&self, state: &OutputState) -> Option<AtomEncoder> {
        state.transmitter_config.encoder
    }

    fn encoder_mode(&self, state: &OutputState) -> EncoderMode {
        state.dig_mode().unwrap_or(state.transmitter_config.mode)
    }

    fn update_link_config(&self, state: &mut OutputState, connector: ConnectorType) {
        state.set_pixel_clock(state.pixel_clock);
        let link = compute_link_config(
            connector,
            state.pixel_clock,
            state.transmitter_config.link,
        );
        let tc = &mut state.transmitter_config;
        if tc.link_count != link.count {
            debug!("{:?}: switching to {:?} link", self.transmitter, link.count);
        }
        tc.link_count = link.count;
        tc.link = link.link;
        tc.coherent = state.coherent;
        if let EncoderParams::Dig { link_count, .. } = &mut state.encoder_config.params {
            *link_count = link.count;
        }
    }

    fn mode_set(&self, seq: &mut Sequence<'_>, state: &OutputState) -> bool {
        if !self.lvtma && !self.transmit(seq, state, TransmitterAction::Init) {
            return false;
        }
        self.transmit(seq, state, TransmitterAction::Setup)
    }

    fn power_on(&self, seq: &mut Sequence<'_>, state: &OutputState) {
        if self.transmit(seq, state, TransmitterAction::Enable) {
            self.transmit(seq, state, TransmitterAction::EnableOutput);
        }
    }

    fn power_reset(&self, seq: &mut Sequence<'_>, state: &OutputState) {
        self.transmit(seq, state, TransmitterAction::DisableOutput);
    }

    fn power_shutdown(&self, seq: &mut Sequence<'_>, state: &OutputState) {
        if state.transmitter_config.encoder.is_none() {
            return;
        }
        if self.transmit(seq, state, TransmitterAction::DisableOutput) {
            self.transmit(seq, state, TransmitterAction::Disable);
        }
    }

    fn apply_backlight(&self, seq: &mut Sequence<'_>, state: &OutputState) {
        self.transmit(seq, state, TransmitterAction::LcdBlBrightness);
    }

    fn hdmi_enabled(&self, state: &OutputState) -> bool {
        state.transmitter_config.mode == EncoderMode::Hdmi
            && state.dig_mode() == Some(EncoderMode::Hdmi)
    }

    fn set_hdmi_enabled(&self, state: &mut OutputState, enabled: bool) {
        let mode = if enabled {
            EncoderMode::Hdmi
        } else {
            EncoderMode::Dvi
        };
        state.transmitter_config.mode = mode;
        if let EncoderParams::Dig { mode: dig_mode, .. } = &mut state.encoder_config.params {
            *dig_mode = mode;
        }
    }

    fn slot_policy(&self) -> Option<SlotPolicy> {
        Some(if self.lvtma {
            SlotPolicy::SecondOnly
        } else {
            SlotPolicy::PreferFirst
        })
    }
}
