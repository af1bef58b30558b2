use num_enum::TryFromPrimitive;

/// This parameter is used to indicate the version of the SMPP protocol.
///
/// Versions are ordered, which is what bind negotiation relies on: an SMSC
/// answers with the lower of its own version and the one the ESME advertised.
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InterfaceVersion {
    SmppV33 = 0x33,
    #[default]
    SmppV34 = 0x34,
    SmppV50 = 0x50,
}

impl InterfaceVersion {
    /// Interpret a raw interface_version octet.
    ///
    /// Anything at or below 0x33 is treated as 3.3 (the 3.4 specification
    /// says so for the whole 0x00-0x33 range), values between 3.4 and 5.0
    /// as 3.4.
    pub fn from_octet(value: u8) -> Self {
        match value {
            0x00..=0x33 => InterfaceVersion::SmppV33,
            0x34..=0x4F => InterfaceVersion::SmppV34,
            _ => InterfaceVersion::SmppV50,
        }
    }

    /// Negotiate the version to use with a peer that advertised `peer`.
    pub fn negotiate(self, peer: InterfaceVersion) -> InterfaceVersion {
        self.min(peer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octet_ranges() {
        assert_eq!(InterfaceVersion::from_octet(0x00), InterfaceVersion::SmppV33);
        assert_eq!(InterfaceVersion::from_octet(0x34), InterfaceVersion::SmppV34);
        assert_eq!(InterfaceVersion::from_octet(0x50), InterfaceVersion::SmppV50);
    }

    #[test]
    fn negotiation_picks_lower_version() {
        assert_eq!(
            InterfaceVersion::SmppV50.negotiate(InterfaceVersion::SmppV34),
            InterfaceVersion::SmppV34
        );
        assert_eq!(
            InterfaceVersion::SmppV34.negotiate(InterfaceVersion::SmppV50),
            InterfaceVersion::SmppV34
        );
    }
}
