use rhd_atombios::{AtomBios, AtomCall, AtomStep, RegisterSaveList};
use tracing::{error, trace};

use super::OutputKind;
use crate::error::OutputError;

/// Runs the command table calls of one output operation and remembers which ones failed.
pub(crate) struct Sequence<'a> {
    bios: &'a mut dyn AtomBios,
    kind: OutputKind,
    failed: Vec<AtomStep>,
}

impl<'a> Sequence<'a> {
    pub fn new(bios: &'a mut dyn AtomBios, kind: OutputKind) -> Self {
        Self {
            bios,
            kind,
            failed: Vec::new(),
        }
    }

    /// Execute `call`, logging and recording it on failure.
    pub fn run(&mut self, call: AtomCall<'_>) -> bool {
        let step = call.step();
        trace!("{}: {step}", self.kind);
        if self.bios.execute(call) {
            return true;
        }
        error!("{}: {step} failed", self.kind);
        self.failed.push(step);
        false
    }

    /// Hand `save` to the interpreter so table register writes get appended to it.
    pub fn capture_begin(&mut self, save: &mut RegisterSaveList) {
        let list = core::mem::take(save);
        if self.bios.set_register_list_location(Some(list)).is_some() {
            error!("{}: register capture was already active", self.kind);
        }
    }

    /// Take the capture list back from the interpreter.
    pub fn capture_end(&mut self, save: &mut RegisterSaveList) {
        match self.bios.set_register_list_location(None) {
            Some(list) => *save = list,
            None => error!("{}: register capture list was lost", self.kind),
        }
    }

    pub fn finish(self) -> Result<(), OutputError> {
        if self.failed.is_empty() {
            Ok(())
        } else {
            Err(OutputError::SequenceFailed {
                kind: self.kind,
                steps: self.failed,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhd_atombios::{
        AtomEncoder, AtomOutputControl, AtomQuery, CodeTableVersion, EncoderAction, EncoderConfig,
        OutputControlAction,
    };

    /// Fails every output control call and records register writes during execution.
    #[derive(Default)]
    struct Bios {
        list: Option<RegisterSaveList>,
        executed: usize,
    }

    impl AtomBios for Bios {
        fn execute(&mut self, call: AtomCall<'_>) -> bool {
            self.executed += 1;
            if let Some(list) = self.list.as_mut() {
                list.record(0x7880 + self.executed as u32 * 4, self.executed as u32);
            }
            !matches!(call, AtomCall::OutputControl { .. })
        }

        fn encoder_control_version(&mut self, _: AtomEncoder) -> CodeTableVersion {
            CodeTableVersion::new(1, 1)
        }

        fn select_crtc_source_version(&mut self) -> CodeTableVersion {
            CodeTableVersion::new(1, 1)
        }

        fn query(&mut self, _: AtomQuery) -> Option<u32> {
            None
        }

        fn backlight_level(&mut self) -> Option<i32> {
            None
        }

        fn set_backlight_level(&mut self, _: i32) {}

        fn set_register_list_location(
            &mut self,
            list: Option<RegisterSaveList>,
        ) -> Option<RegisterSaveList> {
            core::mem::replace(&mut self.list, list)
        }

        fn restore_registers(&mut self, _: &RegisterSaveList) -> bool {
            true
        }
    }

    #[test]
    fn failed_steps_are_reported_in_order() {
        let mut bios = Bios::default();
        let cfg = EncoderConfig::default();
        let mut seq = Sequence::new(&mut bios, OutputKind::Tmdsa);
        assert!(seq.run(AtomCall::EncoderControl {
            encoder: AtomEncoder::Tmds1,
            action: EncoderAction::On,
            config: &cfg,
        }));
        assert!(!seq.run(AtomCall::OutputControl {
            output: AtomOutputControl::Tmdsa,
            action: OutputControlAction::Enable,
        }));
        assert_eq!(
            seq.finish(),
            Err(OutputError::SequenceFailed {
                kind: OutputKind::Tmdsa,
                steps: vec![AtomStep::OutputControl(OutputControlAction::Enable)],
            })
        );
    }

    #[test]
    fn capture_collects_writes_between_begin_and_end() {
        let mut bios = Bios::default();
        let mut save = RegisterSaveList::new();
        let cfg = EncoderConfig::default();
        let call = AtomCall::EncoderControl {
            encoder: AtomEncoder::DacA,
            action: EncoderAction::On,
            config: &cfg,
        };

        let mut seq = Sequence::new(&mut bios, OutputKind::DacA);
        seq.run(call);
        seq.capture_begin(&mut save);
        seq.run(call);
        seq.capture_end(&mut save);
        seq.run(call);
        assert_eq!(seq.finish(), Ok(()));

        assert_eq!(save.len(), 1);
        assert_eq!(save.get(0x7880 + 8), Some(2));
        assert!(bios.list.is_none());
    }
}
