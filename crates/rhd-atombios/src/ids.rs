//! Identifiers understood by the ATOM command tables.

/// Encoder blocks addressable through the encoder control tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomEncoder {
    DacA,
    DacB,
    Tmds1,
    Tmds2,
    Lvds,
    Dvo,
    /// First shared digital encoder.
    Dig1,
    /// Second shared digital encoder.
    Dig2,
}

/// Physical-layer transmitter blocks (UNIPHY/LVTMA class).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomTransmitter {
    Uniphy,
    Uniphy1,
    Uniphy2,
    /// IGP parts drive their digital outputs through the PCIe PHY.
    PciePhy,
    Lvtma,
    Dvo,
}

/// Output control tables for outputs without a separate transmitter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomOutputControl {
    Dac1,
    Dac2,
    Tmdsa,
    Lvtma,
    Lcd,
    Dvo,
}

/// Devices as enumerated by the BIOS object/device tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomDevice {
    Crt1,
    Crt2,
    Lcd1,
    Lcd2,
    Tv1,
    Tv2,
    Cv,
    Dfp1,
    Dfp2,
    Dfp3,
    Dfp4,
    Dfp5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomCrtc {
    Crtc1,
    Crtc2,
}

impl AtomCrtc {
    /// CRTC for a zero-based hardware index; anything non-zero maps to the second CRTC.
    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            Self::Crtc1
        } else {
            Self::Crtc2
        }
    }
}

/// Signalling mode an encoder/transmitter pair is programmed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncoderMode {
    Dp,
    Lvds,
    Dvi,
    Hdmi,
    Sdvo,
    TvComposite,
    TvSvideo,
    TvComponent,
    Crt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkCount {
    Single,
    Dual,
}

/// Which lane pair(s) of a transmitter a link uses.
///
/// `AB`/`BA` are dual-link pairings whose first letter is the primary link. The assignment always
/// agrees with the link count: see [`TransmitterLink::with_link_count`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransmitterLink {
    A,
    B,
    AB,
    BA,
}

impl TransmitterLink {
    pub fn link_count(self) -> LinkCount {
        match self {
            Self::A | Self::B => LinkCount::Single,
            Self::AB | Self::BA => LinkCount::Dual,
        }
    }

    /// The same primary link widened to a pair (dual) or narrowed back to itself (single).
    pub fn with_link_count(self, count: LinkCount) -> Self {
        match (count, self) {
            (LinkCount::Dual, Self::A) => Self::AB,
            (LinkCount::Dual, Self::B) => Self::BA,
            (LinkCount::Single, Self::AB) => Self::A,
            (LinkCount::Single, Self::BA) => Self::B,
            (_, link) => link,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncoderAction {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransmitterAction {
    Init,
    Setup,
    Enable,
    Disable,
    EnableOutput,
    DisableOutput,
    LcdBlOff,
    LcdBlOn,
    LcdBlBrightness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputControlAction {
    Enable,
    Disable,
    LcdBrightnessControl,
    LcdSelfTest,
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_assignment_follows_link_count() {
        use TransmitterLink::*;

        for link in [A, B, AB, BA] {
            assert_eq!(link.with_link_count(LinkCount::Dual).link_count(), LinkCount::Dual);
            assert_eq!(
                link.with_link_count(LinkCount::Single).link_count(),
                LinkCount::Single
            );
        }

        assert_eq!(A.with_link_count(LinkCount::Dual), AB);
        assert_eq!(B.with_link_count(LinkCount::Dual), BA);
        assert_eq!(AB.with_link_count(LinkCount::Single), A);
        assert_eq!(BA.with_link_count(LinkCount::Single), B);
        assert_eq!(AB.with_link_count(LinkCount::Dual), AB);
    }

    #[test]
    fn crtc_from_index() {
        assert_eq!(AtomCrtc::from_index(0), AtomCrtc::Crtc1);
        assert_eq!(AtomCrtc::from_index(1), AtomCrtc::Crtc2);
    }
}
