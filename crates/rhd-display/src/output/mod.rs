//! ATOM-driven output configuration.
//!
//! An [`AtomOutput`] is one display path (DAC, TMDS/LVDS, or a DIG encoder feeding a UNIPHY/LVTMA
//! transmitter). It keeps the encoder and transmitter parameter blocks for that path and turns
//! mode-set, power and property requests into ordered ATOM command table calls.
//!
//! Register writes issued by the command tables during mode set and power transitions are captured
//! into the output's [`RegisterSaveList`] so they can be replayed on restore.

mod analog;
mod encoder_pool;
mod hdmi;
mod legacy;
pub mod link;
mod path;
mod property;
mod sequence;
mod state;
mod unified;

use core::fmt;

use bitflags::bitflags;
use rhd_atombios::{
    AtomBios, AtomCall, AtomCrtc, AtomDevice, AtomEncoder, AtomOutputControl, AtomQuery,
    AtomTransmitter, CodeTableVersion, CrtcSourceConfig, EncoderAction, EncoderConfig,
    EncoderMode, EncoderParams, LinkCount, Lvds2Params, LvdsParams, RegisterSaveList,
    TemporalDither, TransmitterConfig, TransmitterLink,
};
use tracing::{debug, warn};

use crate::error::OutputError;
use crate::mode::{DisplayMode, ModeStatus};

pub use encoder_pool::{DigEncoderPool, DigEncoderSlot, SlotPolicy};
pub use hdmi::HdmiBlock;
pub use property::{AtomBacklight, OutputProperty, PropertyAction, PropertyValue};
pub use state::LvdsPanelInfo;

use analog::AnalogPath;
use legacy::LegacyDigitalPath;
use path::{OutputPath, OutputVariant};
use property::PropertyClass;
use sequence::Sequence;
use state::OutputState;
use unified::UnifiedDigitalPath;

/// Output blocks an [`AtomOutput`] can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    DacA,
    DacB,
    Tmdsa,
    Lvtma,
    /// LVTMA transmitter fed by a DIG encoder (RS690 and later).
    KldskpLvtma,
    UniphyA,
    UniphyB,
    UniphyC,
    UniphyD,
    UniphyE,
    UniphyF,
}

impl OutputKind {
    pub const ALL: [Self; 11] = [
        Self::DacA,
        Self::DacB,
        Self::Tmdsa,
        Self::Lvtma,
        Self::KldskpLvtma,
        Self::UniphyA,
        Self::UniphyB,
        Self::UniphyC,
        Self::UniphyD,
        Self::UniphyE,
        Self::UniphyF,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::DacA => "DACA",
            Self::DacB => "DACB",
            Self::Tmdsa => "TMDSA",
            Self::Lvtma => "LVTMA",
            Self::KldskpLvtma => "KLDSKP_LVTMA",
            Self::UniphyA => "UNIPHYA",
            Self::UniphyB => "UNIPHYB",
            Self::UniphyC => "UNIPHYC",
            Self::UniphyD => "UNIPHYD",
            Self::UniphyE => "UNIPHYE",
            Self::UniphyF => "UNIPHYF",
        }
    }

    /// Whether this output goes through a DIG encoder and a transmitter table.
    pub fn is_unified(self) -> bool {
        matches!(
            self,
            Self::KldskpLvtma
                | Self::UniphyA
                | Self::UniphyB
                | Self::UniphyC
                | Self::UniphyD
                | Self::UniphyE
                | Self::UniphyF
        )
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorType {
    Vga,
    /// Dual-link capable DVI.
    Dvi,
    DviSingle,
    Panel,
    Tv,
    HdmiA,
    HdmiB,
    DisplayPort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    On,
    /// Output disabled, encoder left running.
    Reset,
    Shutdown,
}

/// TV standard configured for the card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TvMode {
    #[default]
    Ntsc,
    NtscJ,
    Pal,
    PalN,
    PalCn,
    Pal60,
}

/// What load detection found on an analog output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SensedType {
    #[default]
    None,
    Vga,
    TvComponent,
    TvSvideo,
    TvComposite,
    Dvi,
}

/// Card-level settings outputs need at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AtomOutputConfig {
    /// Integrated (IGP) parts route digital outputs through the PCIe PHY.
    pub igp: bool,
    pub tv_mode: TvMode,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OutputCaps: u32 {
        const DUAL_LINK = 1 << 0;
        const COHERENT = 1 << 1;
        const HDMI = 1 << 2;
        const BACKLIGHT = 1 << 3;
    }
}

/// One ATOM-controlled display path.
pub struct AtomOutput {
    kind: OutputKind,
    connector: ConnectorType,
    device: AtomDevice,
    crtc: Option<usize>,
    mode: Option<DisplayMode>,
    variant: OutputVariant,
    properties: PropertyClass,
    state: OutputState,
    hdmi: Option<Box<dyn HdmiBlock>>,
}

impl fmt::Debug for AtomOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomOutput")
            .field("kind", &self.kind)
            .field("connector", &self.connector)
            .field("device", &self.device)
            .field("crtc", &self.crtc)
            .field("mode", &self.mode)
            .field("hdmi", &self.hdmi.is_some())
            .finish_non_exhaustive()
    }
}

impl AtomOutput {
    /// Probe-time construction.
    ///
    /// Picks the encoder, transmitter and output control blocks for `kind`, reads the LVDS panel
    /// parameters (panel connectors) from the BIOS and fills in the initial parameter blocks. The
    /// HDMI block is only kept for non-panel digital outputs.
    pub fn new(
        bios: &mut dyn AtomBios,
        config: &AtomOutputConfig,
        kind: OutputKind,
        connector: ConnectorType,
        device: AtomDevice,
        crtc: Option<usize>,
        hdmi: Option<Box<dyn HdmiBlock>>,
    ) -> Result<Self, OutputError> {
        let panel = connector == ConnectorType::Panel;
        let mut state = OutputState::new(config.tv_mode);

        let variant = match kind {
            OutputKind::DacA | OutputKind::DacB => {
                let (encoder, control) = if kind == OutputKind::DacA {
                    (AtomEncoder::DacA, AtomOutputControl::Dac1)
                } else {
                    (AtomEncoder::DacB, AtomOutputControl::Dac2)
                };
                state.encoder_config.params = EncoderParams::Dac {
                    standard: Default::default(),
                };
                OutputVariant::Analog(AnalogPath { encoder, control })
            }
            OutputKind::Tmdsa | OutputKind::Lvtma => {
                let (encoder, control) = match (kind, panel) {
                    (OutputKind::Lvtma, true) => (AtomEncoder::Lvds, AtomOutputControl::Lcd),
                    (OutputKind::Lvtma, false) => (AtomEncoder::Tmds2, AtomOutputControl::Lvtma),
                    _ => (AtomEncoder::Tmds1, AtomOutputControl::Tmdsa),
                };
                state.load_panel_info(bios, panel);
                state.encoder_version = bios.encoder_control_version(encoder);
                state.encoder_config.params = legacy_params(state.encoder_version, &state.panel);
                debug!(
                    "{kind}: encoder table version {}, params {:?}",
                    state.encoder_version, state.encoder_config.params
                );
                OutputVariant::Legacy(LegacyDigitalPath {
                    encoder,
                    control,
                    panel,
                })
            }
            OutputKind::KldskpLvtma => {
                let mode = if panel {
                    EncoderMode::Lvds
                } else {
                    EncoderMode::Dvi
                };
                state.load_panel_info(bios, panel);
                state.init_dig(AtomTransmitter::Lvtma, TransmitterLink::A, mode);
                OutputVariant::Unified(UnifiedDigitalPath {
                    transmitter: AtomTransmitter::Lvtma,
                    lvtma: true,
                })
            }
            _ => {
                let transmitter = if config.igp {
                    AtomTransmitter::PciePhy
                } else {
                    uniphy_transmitter(kind)
                };
                let mode = match connector {
                    ConnectorType::Dvi | ConnectorType::DviSingle => EncoderMode::Dvi,
                    ConnectorType::Panel => EncoderMode::Lvds,
                    _ => {
                        warn!("{kind}: unknown connector type {connector:?}");
                        return Err(OutputError::UnsupportedConnector { kind, connector });
                    }
                };
                state.init_dig(transmitter, uniphy_link(kind), mode);
                if config.igp {
                    let lanes = bios
                        .query(AtomQuery::PcieLanes)
                        .ok_or(OutputError::PcieLanesUnavailable(kind))?;
                    state.transmitter_config.lanes = Some(lanes);
                }
                state.load_panel_info(bios, panel);
                OutputVariant::Unified(UnifiedDigitalPath {
                    transmitter,
                    lvtma: false,
                })
            }
        };

        let hdmi = match variant {
            OutputVariant::Analog(_) => None,
            _ if panel => None,
            _ => hdmi,
        };
        state.crtc_source_version = bios.select_crtc_source_version();

        debug!(
            "{kind}: created on {connector:?}, crtc source table {}",
            state.crtc_source_version
        );

        Ok(Self {
            kind,
            connector,
            device,
            crtc,
            mode: None,
            variant,
            properties: if panel {
                PropertyClass::Panel
            } else {
                PropertyClass::Digital
            },
            state,
            hdmi,
        })
    }

    pub fn kind(&self) -> OutputKind {
        self.kind
    }

    pub fn connector(&self) -> ConnectorType {
        self.connector
    }

    pub fn device(&self) -> AtomDevice {
        self.device
    }

    pub fn crtc(&self) -> Option<usize> {
        self.crtc
    }

    pub fn set_crtc(&mut self, crtc: Option<usize>) {
        self.crtc = crtc;
    }

    /// Last mode handed to [`AtomOutput::set_mode`].
    pub fn mode(&self) -> Option<&DisplayMode> {
        self.mode.as_ref()
    }

    pub fn pixel_clock(&self) -> i32 {
        self.state.pixel_clock
    }

    /// Encoder currently driving this output. `None` for DIG outputs without a slot.
    pub fn encoder(&self) -> Option<AtomEncoder> {
        self.variant.path().encoder(&self.state)
    }

    pub fn transmitter(&self) -> Option<AtomTransmitter> {
        match &self.variant {
            OutputVariant::Unified(path) => Some(path.transmitter),
            _ => None,
        }
    }

    pub fn output_control(&self) -> Option<AtomOutputControl> {
        match &self.variant {
            OutputVariant::Analog(path) => Some(path.control),
            OutputVariant::Legacy(path) => Some(path.control),
            OutputVariant::Unified(_) => None,
        }
    }

    pub fn encoder_config(&self) -> &EncoderConfig {
        &self.state.encoder_config
    }

    pub fn transmitter_config(&self) -> &TransmitterConfig {
        &self.state.transmitter_config
    }

    pub fn panel_info(&self) -> &LvdsPanelInfo {
        &self.state.panel
    }

    /// Register writes captured from the command tables so far.
    pub fn saved_registers(&self) -> &RegisterSaveList {
        &self.state.save
    }

    pub fn backlight(&self) -> i32 {
        self.state.backlight
    }

    pub fn coherent(&self) -> bool {
        self.state.coherent
    }

    pub fn hdmi_enabled(&self) -> bool {
        self.variant.path().hdmi_enabled(&self.state)
    }

    pub fn set_sensed_type(&mut self, sensed: SensedType) {
        self.state.sensed = sensed;
    }

    pub fn caps(&self) -> OutputCaps {
        let mut caps = OutputCaps::empty();
        let digital = !matches!(self.variant, OutputVariant::Analog(_));
        if digital && self.connector == ConnectorType::Dvi {
            caps |= OutputCaps::DUAL_LINK;
        }
        if digital && self.properties == PropertyClass::Digital {
            caps |= OutputCaps::COHERENT;
        }
        if self.hdmi.is_some() {
            caps |= OutputCaps::HDMI;
        }
        if self.properties == PropertyClass::Panel && self.state.backlight >= 0 {
            caps |= OutputCaps::BACKLIGHT;
        }
        caps
    }

    pub fn mode_valid(&self, mode: &DisplayMode) -> ModeStatus {
        if mode.clock < link::MIN_PIXEL_CLOCK {
            return ModeStatus::ClockLow;
        }
        let limit = match self.connector {
            ConnectorType::DviSingle => link::SINGLE_LINK_MAX_CLOCK,
            ConnectorType::Dvi => link::DUAL_LINK_MAX_CLOCK,
            _ => return ModeStatus::Ok,
        };
        if mode.clock > limit {
            ModeStatus::ClockHigh
        } else {
            ModeStatus::Ok
        }
    }

    fn update_link_config(&mut self) {
        self.variant
            .path()
            .update_link_config(&mut self.state, self.connector);
    }

    fn crtc_source_config(&self) -> Result<CrtcSourceConfig, OutputError> {
        let path = self.variant.path();
        match self.state.crtc_source_version.cref {
            1 => Ok(CrtcSourceConfig::Device(self.device)),
            2 => Ok(CrtcSourceConfig::Encoder {
                encoder: path.encoder(&self.state),
                mode: path.encoder_mode(&self.state),
            }),
            _ => {
                warn!(
                    "{}: unknown SelectCrtcSource table version {}",
                    self.kind, self.state.crtc_source_version
                );
                Err(OutputError::UnsupportedTableVersion {
                    kind: self.kind,
                    table: "SelectCrtcSource",
                    version: self.state.crtc_source_version,
                })
            }
        }
    }

    /// Program the output for `mode` and route it to the bound CRTC.
    ///
    /// Transmitter setup and CRTC source selection run with register capture on. The sequence
    /// stops at the first failing command table; the HDMI block only sees the mode when every
    /// step succeeded.
    pub fn set_mode(
        &mut self,
        bios: &mut dyn AtomBios,
        mode: &DisplayMode,
    ) -> Result<(), OutputError> {
        let crtc = self.crtc.ok_or(OutputError::NoCrtc(self.kind))?;

        self.mode = Some(mode.clone());
        self.state.pixel_clock = mode.synth_clock;
        self.update_link_config();
        let source = self.crtc_source_config()?;

        debug!("{}: set mode {} on crtc {crtc}", self.kind, mode.name);

        let path = self.variant.path();
        let mut seq = Sequence::new(bios, self.kind);
        seq.capture_begin(&mut self.state.save);
        let routed = path.mode_set(&mut seq, &self.state)
            && seq.run(AtomCall::SelectCrtcSource {
                crtc: AtomCrtc::from_index(crtc),
                config: &source,
            });
        seq.capture_end(&mut self.state.save);

        // A failed table leaves the path unrouted, so HDMI keeps its previous mode.
        if routed {
            if let Some(hdmi) = self.hdmi.as_mut() {
                hdmi.set_mode(mode);
            }
        }
        seq.finish()
    }

    /// Switch the output to `power`.
    ///
    /// Failing steps are logged and collected; independent steps still run.
    pub fn set_power(
        &mut self,
        bios: &mut dyn AtomBios,
        power: PowerState,
    ) -> Result<(), OutputError> {
        self.update_link_config();

        debug!("{}: power {power:?}", self.kind);

        let path = self.variant.path();
        let encoder = path.encoder(&self.state);
        let mut seq = Sequence::new(bios, self.kind);
        seq.capture_begin(&mut self.state.save);

        match power {
            PowerState::On => {
                match encoder {
                    Some(encoder) => {
                        seq.run(AtomCall::EncoderControl {
                            encoder,
                            action: EncoderAction::On,
                            config: &self.state.encoder_config,
                        });
                    }
                    None => warn!("{}: powering on without a digital encoder", self.kind),
                }
                path.power_on(&mut seq, &self.state);
                let hdmi_on = path.hdmi_enabled(&self.state);
                if let Some(hdmi) = self.hdmi.as_mut() {
                    hdmi.enable(hdmi_on);
                }
            }
            PowerState::Reset => path.power_reset(&mut seq, &self.state),
            PowerState::Shutdown => {
                path.power_shutdown(&mut seq, &self.state);
                if let Some(encoder) = encoder {
                    seq.run(AtomCall::EncoderControl {
                        encoder,
                        action: EncoderAction::Off,
                        config: &self.state.encoder_config,
                    });
                }
                if let Some(hdmi) = self.hdmi.as_mut() {
                    hdmi.enable(false);
                }
            }
        }

        seq.capture_end(&mut self.state.save);
        seq.finish()
    }

    /// Give this output a DIG encoder from `pool`. A no-op for outputs without one.
    pub fn allocate_encoder(&mut self, pool: &mut DigEncoderPool) -> Result<(), OutputError> {
        let Some(policy) = self.variant.path().slot_policy() else {
            return Ok(());
        };
        let slot = pool.allocate(self.kind, policy)?;
        if self.state.transmitter_config.encoder != Some(slot.encoder()) {
            debug!("mapping {:?} encoder to {}", slot.encoder(), self.kind);
        }
        self.state.set_dig_encoder(Some(slot.encoder()));
        Ok(())
    }

    /// Return this output's DIG encoder to `pool`. A no-op for outputs without one.
    pub fn free_encoder(&mut self, pool: &mut DigEncoderPool) -> Result<(), OutputError> {
        if self.variant.path().slot_policy().is_none() {
            return Ok(());
        }
        self.state.set_dig_encoder(None);
        pool.release(self.kind).map(|_| ()).map_err(|err| {
            warn!("{}: freeing a digital encoder it does not hold", self.kind);
            err
        })
    }

    /// Snapshot state that is not covered by the register capture list.
    pub fn save(&mut self) {
        if let Some(hdmi) = self.hdmi.as_mut() {
            hdmi.save();
        }
    }

    /// Write back everything the command tables changed, then the panel backlight and HDMI state.
    pub fn restore(&mut self, bios: &mut dyn AtomBios) -> Result<(), OutputError> {
        if !bios.restore_registers(&self.state.save) {
            warn!(
                "{}: restoring {} captured registers failed",
                self.kind,
                self.state.save.len()
            );
        }
        let result = if self.connector == ConnectorType::Panel {
            property::apply_backlight(bios, self.kind, &self.variant, &mut self.state)
        } else {
            Ok(())
        };
        if let Some(hdmi) = self.hdmi.as_mut() {
            hdmi.restore();
        }
        result
    }
}

fn uniphy_transmitter(kind: OutputKind) -> AtomTransmitter {
    match kind {
        OutputKind::UniphyC | OutputKind::UniphyD => AtomTransmitter::Uniphy1,
        OutputKind::UniphyE | OutputKind::UniphyF => AtomTransmitter::Uniphy2,
        _ => AtomTransmitter::Uniphy,
    }
}

fn uniphy_link(kind: OutputKind) -> TransmitterLink {
    match kind {
        OutputKind::UniphyB | OutputKind::UniphyD | OutputKind::UniphyF => TransmitterLink::B,
        _ => TransmitterLink::A,
    }
}

/// LVDS/TMDS encoder block for the given encoder table version.
fn legacy_params(version: CodeTableVersion, panel: &LvdsPanelInfo) -> EncoderParams {
    match version.cref {
        1 => EncoderParams::Lvds(LvdsParams {
            link_count: LinkCount::Single,
            is_24bit: panel.is_24bit,
        }),
        2 | 3 => EncoderParams::Lvds2(Lvds2Params {
            link_count: LinkCount::Single,
            is_24bit: panel.is_24bit,
            spatial_dither: panel.spatial_dither,
            link_b: false,
            hdmi: false,
            temporal_grey: TemporalDither::from_grey_levels(panel.grey_level),
            coherent: false,
        }),
        _ => EncoderParams::None,
    }
}
