// ABOUTME: SME address triple (TON, NPI, address string) shared by the message PDUs
// ABOUTME: Encodes and decodes against a per-field string rule so length errors map to the right status

use crate::codec::{CodecError, decode_cstring, decode_u8, encode_cstring};
use crate::datatypes::string_rules::{StringField, StringRule};
use crate::datatypes::{CommandStatus, NumericPlanIndicator, TypeOfNumber};
use bytes::{BufMut, BytesMut};
use std::fmt;
use std::io::Cursor;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Address {
    pub ton: TypeOfNumber,
    pub npi: NumericPlanIndicator,
    pub address: String,
}

impl Address {
    pub fn new(ton: TypeOfNumber, npi: NumericPlanIndicator, address: impl Into<String>) -> Self {
        Self {
            ton,
            npi,
            address: address.into(),
        }
    }

    /// An international ISDN (E.164) number.
    pub fn international(address: impl Into<String>) -> Self {
        Self::new(TypeOfNumber::International, NumericPlanIndicator::Isdn, address)
    }

    pub fn encode(&self, buf: &mut BytesMut, rule: StringRule) -> Result<(), CodecError> {
        buf.put_u8(self.ton as u8);
        buf.put_u8(self.npi as u8);
        encode_cstring(buf, &self.address, rule)
    }

    pub fn decode(buf: &mut Cursor<&[u8]>, rule: StringRule) -> Result<Self, CodecError> {
        let (ton_status, npi_status) = match rule.field {
            StringField::DestinationAddr | StringField::EsmeAddr => (
                CommandStatus::InvalidDestinationAddressTon,
                CommandStatus::InvalidDestinationAddressNpi,
            ),
            _ => (
                CommandStatus::InvalidSourceAddressTon,
                CommandStatus::InvalidSourceAddressNpi,
            ),
        };

        let raw_ton = decode_u8(buf)?;
        let ton = TypeOfNumber::try_from(raw_ton).map_err(|_| CodecError::InvalidFieldValue {
            field: "addr_ton",
            value: raw_ton.into(),
            status: ton_status,
        })?;
        let raw_npi = decode_u8(buf)?;
        let npi =
            NumericPlanIndicator::try_from(raw_npi).map_err(|_| CodecError::InvalidFieldValue {
                field: "addr_npi",
                value: raw_npi.into(),
                status: npi_status,
            })?;
        let address = decode_cstring(buf, rule)?;

        Ok(Self { ton, npi, address })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:?}/{:?}", self.address, self.ton, self.npi)
    }
}

impl From<&str> for Address {
    fn from(address: &str) -> Self {
        Self::new(TypeOfNumber::Unknown, NumericPlanIndicator::Unknown, address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::string_rules::{DESTINATION_ADDR, SOURCE_ADDR};

    #[test]
    fn address_round_trip() {
        let address = Address::international("447700900123");
        let mut buf = BytesMut::new();
        address.encode(&mut buf, SOURCE_ADDR).unwrap();
        assert_eq!(&buf[..2], &[0x01, 0x01]);

        let mut cursor = Cursor::new(buf.as_ref());
        assert_eq!(Address::decode(&mut cursor, SOURCE_ADDR).unwrap(), address);
    }

    #[test]
    fn bad_ton_maps_to_side_specific_status() {
        let data = [0x07u8, 0x00, b'1', 0x00];
        let err = Address::decode(&mut Cursor::new(&data[..]), DESTINATION_ADDR).unwrap_err();
        assert_eq!(err.to_command_status(), CommandStatus::InvalidDestinationAddressTon);

        let err = Address::decode(&mut Cursor::new(&data[..]), SOURCE_ADDR).unwrap_err();
        assert_eq!(err.to_command_status(), CommandStatus::InvalidSourceAddressTon);
    }

    #[test]
    fn over_long_destination_is_rejected() {
        let address = Address::from("1".repeat(21).as_str());
        let err = address.encode(&mut BytesMut::new(), DESTINATION_ADDR).unwrap_err();
        assert_eq!(err.to_command_status(), CommandStatus::InvalidDestinationAddress);
    }
}
