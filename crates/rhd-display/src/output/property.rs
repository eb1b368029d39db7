//! Runtime output properties (backlight, coherent mode, HDMI).
//!
//! Panels expose only the backlight, and only once a level has been established. Other outputs
//! expose coherent mode and HDMI; changing either only touches the parameter blocks until the
//! property is committed, which replays the last mode set and powers the output back on.

use rhd_atombios::{
    AtomBios, AtomEncoder, AtomOutputControl, AtomTransmitter, EncoderMode, TransmitterLink,
};
use tracing::debug;

use super::legacy::LegacyDigitalPath;
use super::path::OutputVariant;
use super::sequence::Sequence;
use super::state::OutputState;
use super::unified::UnifiedDigitalPath;
use super::{AtomOutput, ConnectorType, DigEncoderPool, OutputKind, PowerState};
use crate::error::{OutputError, PropertyError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputProperty {
    /// Panel backlight level (integer).
    Backlight,
    /// TMDS coherent mode (bool).
    Coherent,
    /// HDMI signalling instead of DVI (bool).
    Hdmi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyValue {
    Integer(i32),
    Bool(bool),
}

impl PropertyValue {
    fn integer(self, property: OutputProperty) -> Result<i32, PropertyError> {
        match self {
            Self::Integer(value) => Ok(value),
            Self::Bool(_) => Err(PropertyError::WrongType(property)),
        }
    }

    fn boolean(self, property: OutputProperty) -> Result<bool, PropertyError> {
        match self {
            Self::Bool(value) => Ok(value),
            Self::Integer(_) => Err(PropertyError::WrongType(property)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyAction {
    Check,
    Get,
    /// Update the in-memory value; takes effect on commit.
    Set(PropertyValue),
    Commit,
}

/// Which property set an output exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PropertyClass {
    Panel,
    Digital,
}

fn panel_supports(state: &OutputState, property: OutputProperty) -> Result<(), PropertyError> {
    if property != OutputProperty::Backlight || state.backlight < 0 {
        return Err(PropertyError::NotSupported(property));
    }
    Ok(())
}

/// Program the stored backlight level. Levels below 1 are left alone.
pub(crate) fn apply_backlight(
    bios: &mut dyn AtomBios,
    kind: OutputKind,
    variant: &OutputVariant,
    state: &mut OutputState,
) -> Result<(), OutputError> {
    if state.backlight < 1 {
        return Ok(());
    }
    debug!("{kind}: setting backlight level {}", state.backlight);

    let path = variant.path();
    if let OutputVariant::Unified(_) = variant {
        path.update_link_config(state, ConnectorType::Panel);
    }
    let mut seq = Sequence::new(bios, kind);
    path.apply_backlight(&mut seq, state);
    seq.finish()
}

/// Store the level in the BIOS scratch registers, then program it.
fn commit_backlight(
    bios: &mut dyn AtomBios,
    kind: OutputKind,
    variant: &OutputVariant,
    state: &mut OutputState,
) -> Result<(), PropertyError> {
    bios.set_backlight_level(state.backlight);
    apply_backlight(bios, kind, variant, state)?;
    Ok(())
}

impl AtomOutput {
    pub fn check_property(&self, property: OutputProperty) -> bool {
        match self.properties {
            PropertyClass::Panel => panel_supports(&self.state, property).is_ok(),
            PropertyClass::Digital => {
                matches!(property, OutputProperty::Coherent | OutputProperty::Hdmi)
            }
        }
    }

    pub fn get_property(&self, property: OutputProperty) -> Result<PropertyValue, PropertyError> {
        if !self.check_property(property) {
            return Err(PropertyError::NotSupported(property));
        }
        Ok(match property {
            OutputProperty::Backlight => PropertyValue::Integer(self.state.backlight),
            OutputProperty::Coherent => PropertyValue::Bool(self.state.coherent),
            OutputProperty::Hdmi => PropertyValue::Bool(self.hdmi_enabled()),
        })
    }

    pub fn set_property(
        &mut self,
        property: OutputProperty,
        value: PropertyValue,
    ) -> Result<(), PropertyError> {
        if !self.check_property(property) {
            return Err(PropertyError::NotSupported(property));
        }
        match property {
            OutputProperty::Backlight => self.state.backlight = value.integer(property)?,
            OutputProperty::Coherent => self.state.coherent = value.boolean(property)?,
            OutputProperty::Hdmi => {
                let enabled = value.boolean(property)?;
                self.variant
                    .path()
                    .set_hdmi_enabled(&mut self.state, enabled);
            }
        }
        Ok(())
    }

    /// Make a previously set value take effect on the hardware.
    pub fn commit_property(
        &mut self,
        bios: &mut dyn AtomBios,
        property: OutputProperty,
    ) -> Result<(), PropertyError> {
        // Only the class gates Commit; an unknown backlight level is simply not applied.
        match (self.properties, property) {
            (PropertyClass::Panel, OutputProperty::Backlight) => {
                commit_backlight(bios, self.kind, &self.variant, &mut self.state)
            }
            (PropertyClass::Digital, OutputProperty::Coherent | OutputProperty::Hdmi) => {
                let mode = self
                    .mode
                    .clone()
                    .ok_or(PropertyError::NoMode(property))?;
                self.set_mode(bios, &mode)?;
                self.set_power(bios, PowerState::On)?;
                Ok(())
            }
            _ => Err(PropertyError::NotSupported(property)),
        }
    }

    /// Single entry point for the host's property callback.
    ///
    /// Returns the value for [`PropertyAction::Get`] and `None` for every other action.
    pub fn property(
        &mut self,
        bios: &mut dyn AtomBios,
        property: OutputProperty,
        action: PropertyAction,
    ) -> Result<Option<PropertyValue>, PropertyError> {
        match action {
            PropertyAction::Check => self
                .check_property(property)
                .then_some(None)
                .ok_or(PropertyError::NotSupported(property)),
            PropertyAction::Get => self.get_property(property).map(Some),
            PropertyAction::Set(value) => self.set_property(property, value).map(|()| None),
            PropertyAction::Commit => self.commit_property(bios, property).map(|()| None),
        }
    }
}

/// Backlight control through ATOM for panels whose output is not an [`AtomOutput`].
#[derive(Debug, Clone)]
pub struct AtomBacklight {
    kind: OutputKind,
    variant: OutputVariant,
    state: OutputState,
}

impl AtomBacklight {
    /// Set up backlight control for the panel on `kind`.
    ///
    /// Returns `None` for outputs that have no ATOM backlight path. Otherwise also returns the
    /// level currently stored in the BIOS scratch registers (`-1` when there is none).
    pub fn new(
        bios: &mut dyn AtomBios,
        kind: OutputKind,
        pool: &DigEncoderPool,
    ) -> Option<(Self, i32)> {
        let mut state = OutputState::new(Default::default());
        let variant = match kind {
            OutputKind::KldskpLvtma | OutputKind::UniphyE | OutputKind::UniphyF => {
                let (transmitter, link) = match kind {
                    OutputKind::UniphyE => (AtomTransmitter::Uniphy2, TransmitterLink::A),
                    OutputKind::UniphyF => (AtomTransmitter::Uniphy2, TransmitterLink::B),
                    _ => (AtomTransmitter::Lvtma, TransmitterLink::A),
                };
                state.init_dig(transmitter, link, EncoderMode::Lvds);
                state.set_dig_encoder(pool.slot_of(kind).map(|slot| slot.encoder()));
                state.load_panel_info(bios, true);
                OutputVariant::Unified(UnifiedDigitalPath {
                    transmitter,
                    lvtma: kind == OutputKind::KldskpLvtma,
                })
            }
            OutputKind::Lvtma => {
                state.backlight = 0;
                OutputVariant::Legacy(LegacyDigitalPath {
                    encoder: AtomEncoder::Lvds,
                    control: AtomOutputControl::Lcd,
                    panel: true,
                })
            }
            _ => return None,
        };

        let level = bios.backlight_level().unwrap_or(-1);
        debug!("{kind}: ATOM backlight control, BIOS level {level}");
        Some((
            Self {
                kind,
                variant,
                state,
            },
            level,
        ))
    }

    pub fn kind(&self) -> OutputKind {
        self.kind
    }

    pub fn check(&self, property: OutputProperty) -> bool {
        panel_supports(&self.state, property).is_ok()
    }

    pub fn get(&self, property: OutputProperty) -> Result<PropertyValue, PropertyError> {
        panel_supports(&self.state, property)?;
        Ok(PropertyValue::Integer(self.state.backlight))
    }

    pub fn set(
        &mut self,
        property: OutputProperty,
        value: PropertyValue,
    ) -> Result<(), PropertyError> {
        panel_supports(&self.state, property)?;
        self.state.backlight = value.integer(property)?;
        Ok(())
    }

    pub fn commit(
        &mut self,
        bios: &mut dyn AtomBios,
        property: OutputProperty,
    ) -> Result<(), PropertyError> {
        if property != OutputProperty::Backlight {
            return Err(PropertyError::NotSupported(property));
        }
        commit_backlight(bios, self.kind, &self.variant, &mut self.state)
    }
}
