use rhd_atombios::{
    AtomBios, AtomEncoder, AtomQuery, AtomTransmitter, CodeTableVersion, EncoderConfig,
    EncoderMode, EncoderParams, LinkCount, RegisterSaveList, TransmitterConfig, TransmitterLink,
};
use tracing::{debug, warn};

use super::{SensedType, TvMode};

/// LVDS panel parameters from the BIOS LVDS info table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LvdsPanelInfo {
    /// Panel power sequencing delays, in ms.
    pub power_dig_to_de: u32,
    pub power_de_to_bl: u32,
    pub off_delay: u32,
    pub dual_link: bool,
    pub is_24bit: bool,
    pub fpdi: bool,
    pub temporal_dither: bool,
    pub spatial_dither: bool,
    pub grey_level: u32,
}

const LVDS_INFO_QUERIES: [AtomQuery; 9] = [
    AtomQuery::LvdsSeqDigOntoDe,
    AtomQuery::LvdsSeqDeToBl,
    AtomQuery::LvdsOffDelay,
    AtomQuery::LvdsDualLink,
    AtomQuery::Lvds24Bit,
    AtomQuery::LvdsFpdi,
    AtomQuery::LvdsTemporalDither,
    AtomQuery::LvdsSpatialDither,
    AtomQuery::LvdsGreyLevel,
];

impl LvdsPanelInfo {
    /// Read the panel info table. Fields past the first missing entry stay zero.
    fn retrieve(bios: &mut dyn AtomBios) -> Self {
        let mut values = [0u32; LVDS_INFO_QUERIES.len()];
        for (value, query) in values.iter_mut().zip(LVDS_INFO_QUERIES) {
            match bios.query(query) {
                Some(v) => *value = v,
                None => {
                    warn!("LVDS info table has no {query:?}");
                    break;
                }
            }
        }
        let [dig_to_de, de_to_bl, off_delay, dual_link, is_24bit, fpdi, temporal, spatial, grey] =
            values;
        debug!("BIOS reports {grey} grey levels");
        Self {
            power_dig_to_de: dig_to_de,
            power_de_to_bl: de_to_bl,
            off_delay,
            dual_link: dual_link != 0,
            is_24bit: is_24bit != 0,
            fpdi: fpdi != 0,
            temporal_dither: temporal != 0,
            spatial_dither: spatial != 0,
            grey_level: grey,
        }
    }
}

/// Parameter blocks and bookkeeping of one output.
#[derive(Debug, Clone)]
pub(crate) struct OutputState {
    pub encoder_version: CodeTableVersion,
    pub crtc_source_version: CodeTableVersion,
    pub encoder_config: EncoderConfig,
    pub transmitter_config: TransmitterConfig,
    pub pixel_clock: i32,
    pub coherent: bool,
    pub backlight: i32,
    pub panel: LvdsPanelInfo,
    pub sensed: SensedType,
    pub tv_mode: TvMode,
    pub save: RegisterSaveList,
}

impl OutputState {
    pub fn new(tv_mode: TvMode) -> Self {
        Self {
            encoder_version: CodeTableVersion::default(),
            crtc_source_version: CodeTableVersion::default(),
            encoder_config: EncoderConfig::default(),
            transmitter_config: TransmitterConfig::default(),
            pixel_clock: 0,
            coherent: false,
            backlight: -1,
            panel: LvdsPanelInfo::default(),
            sensed: SensedType::None,
            tv_mode,
            save: RegisterSaveList::new(),
        }
    }

    /// Panel outputs read the LVDS info table and the BIOS scratch backlight level; everything
    /// else gets TMDS defaults and no backlight.
    pub fn load_panel_info(&mut self, bios: &mut dyn AtomBios, panel: bool) {
        if panel {
            self.panel = LvdsPanelInfo::retrieve(bios);
            self.backlight = bios.backlight_level().unwrap_or(-1);
        } else {
            self.panel = LvdsPanelInfo::default();
            self.backlight = -1;
        }
        self.coherent = false;
    }

    /// Initial DIG parameter blocks for a transmitter-based output. No encoder is assigned yet.
    pub fn init_dig(
        &mut self,
        transmitter: AtomTransmitter,
        link: TransmitterLink,
        mode: EncoderMode,
    ) {
        self.transmitter_config.link = link;
        self.transmitter_config.mode = mode;
        self.transmitter_config.encoder = None;
        self.encoder_config.params = EncoderParams::Dig {
            link_count: LinkCount::Single,
            link,
            transmitter,
            mode,
        };
    }

    pub fn set_dig_encoder(&mut self, encoder: Option<AtomEncoder>) {
        self.transmitter_config.encoder = encoder;
    }

    pub fn dig_mode(&self) -> Option<EncoderMode> {
        match self.encoder_config.params {
            EncoderParams::Dig { mode, .. } => Some(mode),
            _ => None,
        }
    }

    pub fn set_pixel_clock(&mut self, clock: i32) {
        self.encoder_config.pixel_clock = clock;
        self.transmitter_config.pixel_clock = clock;
    }
}
