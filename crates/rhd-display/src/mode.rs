/// The parts of a display mode the output engine consumes.
///
/// Timing computation happens elsewhere; outputs only need the clocks (for link width decisions)
/// and keep the whole mode around so a property commit can replay it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMode {
    pub name: String,
    /// Requested pixel clock in kHz.
    pub clock: i32,
    /// Pixel clock the PLL actually synthesizes, in kHz.
    pub synth_clock: i32,
    pub h_display: u32,
    pub v_display: u32,
}

impl DisplayMode {
    pub fn new(name: impl Into<String>, clock: i32, h_display: u32, v_display: u32) -> Self {
        Self {
            name: name.into(),
            clock,
            synth_clock: clock,
            h_display,
            v_display,
        }
    }
}

/// Result of validating a mode against an output's link limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeStatus {
    Ok,
    ClockLow,
    ClockHigh,
}
