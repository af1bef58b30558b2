// ABOUTME: Length and charset rules for SMPP string fields, with the command_status each violation maps to
// ABOUTME: Lets a receiver answer a malformed field with a precise negative response instead of a generic failure

use crate::datatypes::CommandStatus;
use std::fmt;
use thiserror::Error;

/// Every string-valued mandatory field the codec knows about.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StringField {
    SystemId,
    Password,
    SystemType,
    AddressRange,
    ServiceType,
    SourceAddr,
    DestinationAddr,
    EsmeAddr,
    ScheduleDeliveryTime,
    ValidityPeriod,
    FinalDate,
    MessageId,
    DlName,
    ShortMessage,
}

impl StringField {
    pub fn name(&self) -> &'static str {
        match self {
            StringField::SystemId => "system_id",
            StringField::Password => "password",
            StringField::SystemType => "system_type",
            StringField::AddressRange => "address_range",
            StringField::ServiceType => "service_type",
            StringField::SourceAddr => "source_addr",
            StringField::DestinationAddr => "destination_addr",
            StringField::EsmeAddr => "esme_addr",
            StringField::ScheduleDeliveryTime => "schedule_delivery_time",
            StringField::ValidityPeriod => "validity_period",
            StringField::FinalDate => "final_date",
            StringField::MessageId => "message_id",
            StringField::DlName => "dl_name",
            StringField::ShortMessage => "short_message",
        }
    }

    /// The command_status a receiver answers with when this field is malformed.
    pub fn command_status(&self) -> CommandStatus {
        match self {
            StringField::SystemId => CommandStatus::InvalidSystemId,
            StringField::Password => CommandStatus::InvalidPassword,
            StringField::SystemType => CommandStatus::InvalidSystemTypeField,
            StringField::AddressRange | StringField::SourceAddr => {
                CommandStatus::InvalidSourceAddress
            }
            StringField::DestinationAddr | StringField::EsmeAddr => {
                CommandStatus::InvalidDestinationAddress
            }
            StringField::ServiceType => CommandStatus::InvalidServiceType,
            StringField::ScheduleDeliveryTime => CommandStatus::InvalidScheduledDeliveryTime,
            StringField::ValidityPeriod => CommandStatus::InvalidExpiryTime,
            StringField::FinalDate => CommandStatus::UnknownError,
            StringField::MessageId => CommandStatus::InvalidMessageId,
            StringField::DlName => CommandStatus::InvalidDistributionListName,
            StringField::ShortMessage => CommandStatus::InvalidMsgLength,
        }
    }
}

impl fmt::Display for StringField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StringKind {
    /// NUL terminated, lengths count the terminator.
    COctet,
    /// Length-prefixed raw octets.
    Octet,
}

/// Allowed size of one field, in octets on the wire.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StringRule {
    pub field: StringField,
    pub kind: StringKind,
    pub min: usize,
    pub max: usize,
    /// Whether an empty value is accepted regardless of `min`.
    pub nullable: bool,
}

impl StringRule {
    /// Variable length C-octet string of up to `max` octets including NUL.
    pub const fn c_string(field: StringField, max: usize) -> Self {
        Self {
            field,
            kind: StringKind::COctet,
            min: 1,
            max,
            nullable: true,
        }
    }

    /// C-octet string that is either empty or exactly `len` octets including NUL.
    pub const fn fixed(field: StringField, len: usize) -> Self {
        Self {
            field,
            kind: StringKind::COctet,
            min: len,
            max: len,
            nullable: true,
        }
    }

    pub const fn octets(field: StringField, max: usize) -> Self {
        Self {
            field,
            kind: StringKind::Octet,
            min: 0,
            max,
            nullable: true,
        }
    }

    /// Validate a value of `content_len` octets (without terminator).
    pub fn check_len(&self, content_len: usize) -> Result<(), StringValidationError> {
        if content_len == 0 && self.nullable {
            return Ok(());
        }
        let wire_len = match self.kind {
            StringKind::COctet => content_len + 1,
            StringKind::Octet => content_len,
        };
        if wire_len < self.min || wire_len > self.max {
            return Err(StringValidationError::Length {
                field: self.field,
                length: content_len,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Validate and convert a string to its Latin-1 wire form (without NUL).
    pub fn encode(&self, value: &str) -> Result<Vec<u8>, StringValidationError> {
        let bytes = to_latin1(self.field, value)?;
        self.check_len(bytes.len())?;
        Ok(bytes)
    }
}

pub const SYSTEM_ID: StringRule = StringRule::c_string(StringField::SystemId, 16);
pub const PASSWORD: StringRule = StringRule::c_string(StringField::Password, 9);
pub const SYSTEM_TYPE: StringRule = StringRule::c_string(StringField::SystemType, 13);
pub const ADDRESS_RANGE: StringRule = StringRule::c_string(StringField::AddressRange, 41);
pub const SERVICE_TYPE: StringRule = StringRule::c_string(StringField::ServiceType, 6);
pub const SOURCE_ADDR: StringRule = StringRule::c_string(StringField::SourceAddr, 21);
pub const SOURCE_ADDR_65: StringRule = StringRule::c_string(StringField::SourceAddr, 65);
pub const DESTINATION_ADDR: StringRule = StringRule::c_string(StringField::DestinationAddr, 21);
pub const DESTINATION_ADDR_65: StringRule =
    StringRule::c_string(StringField::DestinationAddr, 65);
pub const ESME_ADDR: StringRule = StringRule::c_string(StringField::EsmeAddr, 65);
pub const SCHEDULE_DELIVERY_TIME: StringRule =
    StringRule::fixed(StringField::ScheduleDeliveryTime, 17);
pub const VALIDITY_PERIOD: StringRule = StringRule::fixed(StringField::ValidityPeriod, 17);
pub const FINAL_DATE: StringRule = StringRule::fixed(StringField::FinalDate, 17);
pub const MESSAGE_ID: StringRule = StringRule::c_string(StringField::MessageId, 65);
pub const DL_NAME: StringRule = StringRule::c_string(StringField::DlName, 21);
pub const SHORT_MESSAGE: StringRule = StringRule::octets(StringField::ShortMessage, 254);

/// A string field broke its rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StringValidationError {
    #[error("{field}: length {length} is outside {min}..={max} octets")]
    Length {
        field: StringField,
        length: usize,
        min: usize,
        max: usize,
    },

    #[error("{field}: character {ch:?} is not representable in Latin-1")]
    Charset { field: StringField, ch: char },

    #[error("{field}: no NUL terminator within {max} octets")]
    Unterminated { field: StringField, max: usize },
}

impl StringValidationError {
    pub fn field(&self) -> StringField {
        match self {
            StringValidationError::Length { field, .. }
            | StringValidationError::Charset { field, .. }
            | StringValidationError::Unterminated { field, .. } => *field,
        }
    }

    pub fn command_status(&self) -> CommandStatus {
        self.field().command_status()
    }
}

pub fn to_latin1(field: StringField, value: &str) -> Result<Vec<u8>, StringValidationError> {
    value
        .chars()
        .map(|ch| u8::try_from(u32::from(ch)).map_err(|_| StringValidationError::Charset { field, ch }))
        .collect()
}

pub fn from_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_id_limits() {
        assert!(SYSTEM_ID.encode(&"A".repeat(15)).is_ok());
        let err = SYSTEM_ID.encode(&"A".repeat(16)).unwrap_err();
        assert_eq!(err.field(), StringField::SystemId);
        assert_eq!(err.command_status(), CommandStatus::InvalidSystemId);
    }

    #[test]
    fn password_maps_to_invalid_password() {
        let err = PASSWORD.encode("123456789").unwrap_err();
        assert_eq!(err.command_status(), CommandStatus::InvalidPassword);
    }

    #[test]
    fn fixed_length_fields_accept_empty_or_exact() {
        assert!(SCHEDULE_DELIVERY_TIME.encode("").is_ok());
        assert!(SCHEDULE_DELIVERY_TIME.encode("260101120000000+").is_ok());
        let err = SCHEDULE_DELIVERY_TIME.encode("2601011200").unwrap_err();
        assert_eq!(err.command_status(), CommandStatus::InvalidScheduledDeliveryTime);
    }

    #[test]
    fn short_message_is_octet_counted() {
        assert!(SHORT_MESSAGE.check_len(254).is_ok());
        let err = SHORT_MESSAGE.check_len(255).unwrap_err();
        assert_eq!(err.command_status(), CommandStatus::InvalidMsgLength);
    }

    #[test]
    fn latin1_round_trip_and_rejects_wide_chars() {
        let bytes = to_latin1(StringField::SourceAddr, "caf\u{e9}").unwrap();
        assert_eq!(bytes, vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(from_latin1(&bytes), "caf\u{e9}");

        let err = to_latin1(StringField::SourceAddr, "\u{20ac}").unwrap_err();
        assert!(matches!(err, StringValidationError::Charset { .. }));
    }
}
