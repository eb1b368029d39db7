//! Single/dual link policy for digital outputs.

use rhd_atombios::{LinkCount, TransmitterLink};

use super::ConnectorType;

/// Highest pixel clock (kHz) a single TMDS link carries.
pub const SINGLE_LINK_MAX_CLOCK: i32 = 165_000;

/// Highest pixel clock (kHz) accepted on a dual-link DVI connector.
pub const DUAL_LINK_MAX_CLOCK: i32 = 330_000;

/// Lowest pixel clock (kHz) any ATOM output accepts.
pub const MIN_PIXEL_CLOCK: i32 = 25_000;

/// Whether a digital output should drive both links.
///
/// Only dual-link DVI connectors ever run dual-link, and only above the single link limit. A
/// non-positive clock means the configuration is for power down; both links are then selected so
/// the second channel is switched off as well.
pub fn wants_dual_link(connector: ConnectorType, pixel_clock: i32) -> bool {
    if pixel_clock <= 0 {
        return true;
    }
    connector == ConnectorType::Dvi && pixel_clock > SINGLE_LINK_MAX_CLOCK
}

/// Link count plus the link assignment derived from the output's primary link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkConfig {
    pub count: LinkCount,
    pub link: TransmitterLink,
}

/// Compute the link configuration for `connector` at `pixel_clock`, starting from the link the
/// transmitter is currently assigned.
pub fn compute_link_config(
    connector: ConnectorType,
    pixel_clock: i32,
    current: TransmitterLink,
) -> LinkConfig {
    let count = if wants_dual_link(connector, pixel_clock) {
        LinkCount::Dual
    } else {
        LinkCount::Single
    };
    LinkConfig {
        count,
        link: current.with_link_count(count),
    }
}
