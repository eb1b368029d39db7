//! Scripted collaborators shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use rhd_atombios::{
    AtomBios, AtomCall, AtomCrtc, AtomEncoder, AtomOutputControl, AtomQuery, AtomStep,
    AtomTransmitter, CodeTableVersion, CrtcSourceConfig, EncoderAction, EncoderConfig,
    OutputControlAction, RegisterSaveList, TransmitterAction, TransmitterConfig,
};
use rhd_display::{DisplayMode, HdmiBlock};

/// Owned copy of an [`AtomCall`], parameter blocks included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Encoder {
        encoder: AtomEncoder,
        action: EncoderAction,
        config: EncoderConfig,
    },
    Transmitter {
        transmitter: AtomTransmitter,
        action: TransmitterAction,
        config: TransmitterConfig,
    },
    OutputControl {
        output: AtomOutputControl,
        action: OutputControlAction,
    },
    SelectCrtcSource {
        crtc: AtomCrtc,
        config: CrtcSourceConfig,
    },
}

impl Call {
    pub fn step(&self) -> AtomStep {
        match self {
            Self::Encoder { action, .. } => AtomStep::Encoder(*action),
            Self::Transmitter { action, .. } => AtomStep::Transmitter(*action),
            Self::OutputControl { action, .. } => AtomStep::OutputControl(*action),
            Self::SelectCrtcSource { .. } => AtomStep::SelectCrtcSource,
        }
    }
}

/// Each executed command table "writes" one register, at `CAPTURE_BASE + 4 * call number`.
pub const CAPTURE_BASE: u32 = 0x7000;

pub struct FakeBios {
    pub calls: Vec<Call>,
    pub failing: Vec<AtomStep>,
    pub encoder_version: CodeTableVersion,
    pub crtc_source_version: CodeTableVersion,
    pub answers: HashMap<AtomQuery, u32>,
    pub backlight: Option<i32>,
    pub capture: Option<RegisterSaveList>,
    pub restored: Vec<RegisterSaveList>,
}

impl Default for FakeBios {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            failing: Vec::new(),
            encoder_version: CodeTableVersion::new(1, 2),
            crtc_source_version: CodeTableVersion::new(1, 2),
            answers: HashMap::new(),
            backlight: None,
            capture: None,
            restored: Vec::new(),
        }
    }
}

impl FakeBios {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(mut self, step: AtomStep) -> Self {
        self.failing.push(step);
        self
    }

    pub fn answer(mut self, query: AtomQuery, value: u32) -> Self {
        self.answers.insert(query, value);
        self
    }

    pub fn steps(&self) -> Vec<AtomStep> {
        self.calls.iter().map(Call::step).collect()
    }

    pub fn transmitter_calls(&self) -> Vec<(TransmitterAction, TransmitterConfig)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Transmitter { action, config, .. } => Some((*action, *config)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl AtomBios for FakeBios {
    fn execute(&mut self, call: AtomCall<'_>) -> bool {
        let step = call.step();
        self.calls.push(match call {
            AtomCall::EncoderControl {
                encoder,
                action,
                config,
            } => Call::Encoder {
                encoder,
                action,
                config: *config,
            },
            AtomCall::DigTransmitterControl {
                transmitter,
                action,
                config,
            } => Call::Transmitter {
                transmitter,
                action,
                config: *config,
            },
            AtomCall::OutputControl { output, action } => Call::OutputControl { output, action },
            AtomCall::SelectCrtcSource { crtc, config } => Call::SelectCrtcSource {
                crtc,
                config: *config,
            },
        });
        let n = self.calls.len() as u32;
        if let Some(list) = self.capture.as_mut() {
            list.record(CAPTURE_BASE + 4 * n, n);
        }
        !self.failing.contains(&step)
    }

    fn encoder_control_version(&mut self, _encoder: AtomEncoder) -> CodeTableVersion {
        self.encoder_version
    }

    fn select_crtc_source_version(&mut self) -> CodeTableVersion {
        self.crtc_source_version
    }

    fn query(&mut self, query: AtomQuery) -> Option<u32> {
        self.answers.get(&query).copied()
    }

    fn backlight_level(&mut self) -> Option<i32> {
        self.backlight
    }

    fn set_backlight_level(&mut self, level: i32) {
        self.backlight = Some(level);
    }

    fn set_register_list_location(
        &mut self,
        list: Option<RegisterSaveList>,
    ) -> Option<RegisterSaveList> {
        std::mem::replace(&mut self.capture, list)
    }

    fn restore_registers(&mut self, list: &RegisterSaveList) -> bool {
        self.restored.push(list.clone());
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HdmiEvent {
    SetMode(String),
    Enable(bool),
    Save,
    Restore,
}

/// HDMI block that logs what the output engine asked of it.
#[derive(Debug, Clone, Default)]
pub struct RecordingHdmi {
    pub events: Rc<RefCell<Vec<HdmiEvent>>>,
}

impl RecordingHdmi {
    pub fn new() -> (Self, Rc<RefCell<Vec<HdmiEvent>>>) {
        let hdmi = Self::default();
        let events = Rc::clone(&hdmi.events);
        (hdmi, events)
    }
}

impl HdmiBlock for RecordingHdmi {
    fn set_mode(&mut self, mode: &DisplayMode) {
        self.events
            .borrow_mut()
            .push(HdmiEvent::SetMode(mode.name.clone()));
    }

    fn enable(&mut self, enable: bool) {
        self.events.borrow_mut().push(HdmiEvent::Enable(enable));
    }

    fn save(&mut self) {
        self.events.borrow_mut().push(HdmiEvent::Save);
    }

    fn restore(&mut self) {
        self.events.borrow_mut().push(HdmiEvent::Restore);
    }
}
