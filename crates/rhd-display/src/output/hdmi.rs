use crate::mode::DisplayMode;

/// HDMI audio/infoframe block attached to a digital output.
///
/// The output engine only forwards lifecycle events; what the block programs is up to the
/// implementation.
pub trait HdmiBlock {
    fn set_mode(&mut self, mode: &DisplayMode);

    fn enable(&mut self, enable: bool);

    fn save(&mut self);

    fn restore(&mut self);
}
