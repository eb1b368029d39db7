use crate::ids::{AtomDevice, AtomEncoder, AtomTransmitter, EncoderMode, LinkCount, TransmitterLink};

/// Analog standard programmed into a DAC encoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DacStandard {
    #[default]
    Vga,
    /// Component video.
    Cv,
    Ntsc,
    Pal,
}

/// Temporal dithering grey level count for LVDS panels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TemporalDither {
    #[default]
    Dither0,
    Dither2,
    Dither4,
}

impl TemporalDither {
    /// Map the grey level count reported by the LVDS info table; unknown counts disable dithering.
    pub fn from_grey_levels(levels: u32) -> Self {
        match levels {
            2 => Self::Dither2,
            4 => Self::Dither4,
            _ => Self::Dither0,
        }
    }
}

/// LVDS/TMDS encoder parameters, encoder control table v1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LvdsParams {
    pub link_count: LinkCount,
    pub is_24bit: bool,
}

/// LVDS/TMDS encoder parameters, encoder control table v2 and v3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lvds2Params {
    pub link_count: LinkCount,
    pub is_24bit: bool,
    pub spatial_dither: bool,
    pub link_b: bool,
    pub hdmi: bool,
    pub temporal_grey: TemporalDither,
    pub coherent: bool,
}

/// Per-encoder-class part of the encoder parameter block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderParams {
    None,
    Dac {
        standard: DacStandard,
    },
    Lvds(LvdsParams),
    Lvds2(Lvds2Params),
    Dig {
        link_count: LinkCount,
        link: TransmitterLink,
        transmitter: AtomTransmitter,
        mode: EncoderMode,
    },
}

/// Parameter block for the encoder control tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Pixel clock in kHz. Zero or negative when configuring for power down.
    pub pixel_clock: i32,
    pub params: EncoderParams,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            pixel_clock: 0,
            params: EncoderParams::None,
        }
    }
}

/// Parameter block for the digital transmitter control table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransmitterConfig {
    /// Pixel clock in kHz.
    pub pixel_clock: i32,
    pub link_count: LinkCount,
    pub link: TransmitterLink,
    /// Encoder feeding this transmitter; `None` until a digital encoder is assigned.
    pub encoder: Option<AtomEncoder>,
    pub mode: EncoderMode,
    pub coherent: bool,
    /// PCIe PHY lane selection (IGP only).
    pub lanes: Option<u32>,
}

impl Default for TransmitterConfig {
    fn default() -> Self {
        Self {
            pixel_clock: 0,
            link_count: LinkCount::Single,
            link: TransmitterLink::A,
            encoder: None,
            mode: EncoderMode::Dvi,
            coherent: false,
            lanes: None,
        }
    }
}

/// Parameter block for SelectCRTC_Source.
///
/// The layout depends on the table version: v1 routes a BIOS device to the CRTC, v2 routes an
/// encoder running in a given mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrtcSourceConfig {
    Device(AtomDevice),
    Encoder {
        encoder: Option<AtomEncoder>,
        mode: EncoderMode,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grey_levels_map_to_temporal_dither() {
        assert_eq!(TemporalDither::from_grey_levels(0), TemporalDither::Dither0);
        assert_eq!(TemporalDither::from_grey_levels(2), TemporalDither::Dither2);
        assert_eq!(TemporalDither::from_grey_levels(4), TemporalDither::Dither4);
        assert_eq!(TemporalDither::from_grey_levels(3), TemporalDither::Dither0);
    }
}
