use rhd_atombios::{
    AtomCall, AtomEncoder, AtomOutputControl, DacStandard, EncoderMode, EncoderParams,
    OutputControlAction,
};
use tracing::warn;

use super::path::OutputPath;
use super::sequence::Sequence;
use super::state::OutputState;
use super::{ConnectorType, SensedType, TvMode};

/// DAC outputs, switched through the DAC output control tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AnalogPath {
    pub encoder: AtomEncoder,
    pub control: AtomOutputControl,
}

impl AnalogPath {
    fn control(&self, seq: &mut Sequence<'_>, action: OutputControlAction) -> bool {
        seq.run(AtomCall::OutputControl {
            output: self.control,
            action,
        })
    }
}

pub(crate) fn dac_standard(sensed: SensedType, tv_mode: TvMode) -> DacStandard {
    match sensed {
        SensedType::None | SensedType::Vga => DacStandard::Vga,
        SensedType::TvComponent => DacStandard::Cv,
        SensedType::TvSvideo | SensedType::TvComposite => match tv_mode {
            TvMode::Ntsc | TvMode::NtscJ => DacStandard::Ntsc,
            TvMode::Pal | TvMode::PalN | TvMode::PalCn | TvMode::Pal60 => DacStandard::Pal,
        },
        SensedType::Dvi => {
            warn!("sensed {sensed:?} on a DAC, programming VGA");
            DacStandard::Vga
        }
    }
}

impl OutputPath for AnalogPath {
    fn encoder(&self, _state: &OutputState) -> Option<AtomEncoder> {
        Some(self.encoder)
    }

    fn encoder_mode(&self, _state: &OutputState) -> EncoderMode {
        EncoderMode::Crt
    }

    fn update_link_config(&self, state: &mut OutputState, _connector: ConnectorType) {
        state.set_pixel_clock(state.pixel_clock);
        state.encoder_config.params = EncoderParams::Dac {
            standard: dac_standard(state.sensed, state.tv_mode),
        };
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tv_loads_pick_the_configured_standard() {
        assert_eq!(dac_standard(SensedType::TvSvideo, TvMode::NtscJ), DacStandard::Ntsc);
        assert_eq!(dac_standard(SensedType::TvComposite, TvMode::Pal60), DacStandard::Pal);
        assert_eq!(dac_standard(SensedType::TvComponent, TvMode::Pal), DacStandard::Cv);
    }

    #[test]
    fn monitors_and_unknown_loads_get_vga() {
        for sensed in [SensedType::None, SensedType::Vga, SensedType::Dvi] {
            assert_eq!(dac_standard(sensed, TvMode::Pal), DacStandard::Vga);
        }
    }
}
