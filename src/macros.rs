// ABOUTME: This module provides macros to reduce boilerplate in SMPP PDU implementations
// ABOUTME: Includes macros for header-only PDUs, frame conversions and request/response pairing

/// Macro for implementing codec traits on header-only PDUs (no body)
///
/// # Arguments
/// * `$pdu_type` - The PDU struct name (e.g., EnquireLink)
/// * `$command_id` - The CommandId variant (e.g., CommandId::EnquireLink)
///
/// # Generated code
/// - Decodable with header validation; a body on the wire is rejected
/// - Encodable writing the 16-byte header only
macro_rules! impl_header_only_pdu {
    ($pdu_type:ident, $command_id:expr) => {
        impl $crate::codec::Decodable for $pdu_type {
            fn command_ids() -> &'static [$crate::datatypes::CommandId] {
                &[$command_id]
            }

            fn decode(
                header: $crate::codec::PduHeader,
                buf: &mut std::io::Cursor<&[u8]>,
            ) -> Result<Self, $crate::codec::CodecError> {
                use bytes::Buf;

                Self::validate_header(&header)?;

                // Header-only PDUs should have no body
                if buf.has_remaining() {
                    return Err($crate::codec::CodecError::FieldValidation {
                        field: concat!(stringify!($pdu_type), "_body"),
                        reason: concat!(stringify!($pdu_type), " PDU should have no body")
                            .to_string(),
                    });
                }

                Ok($pdu_type {
                    command_status: header.command_status,
                    sequence_number: header.sequence_number,
                })
            }
        }

        impl $crate::codec::Encodable for $pdu_type {
            fn command_id(&self) -> $crate::datatypes::CommandId {
                $command_id
            }

            fn encode(&self, buf: &mut bytes::BytesMut) -> Result<(), $crate::codec::CodecError> {
                $crate::codec::PduHeader::new($command_id, self.command_status, self.sequence_number)
                    .encode(buf);
                Ok(())
            }
        }
    };
}

/// Macro for generating constructor methods for header-only PDUs
///
/// # Generated code
/// - `new(sequence_number: u32)` - Creates PDU with Ok status
/// - `error(sequence_number: u32, status: CommandStatus)` - Creates PDU with error status
macro_rules! impl_header_only_constructors {
    ($pdu_type:ident) => {
        impl $pdu_type {
            /// Create a new PDU with Ok status
            pub fn new(sequence_number: u32) -> Self {
                Self {
                    command_status: $crate::datatypes::CommandStatus::Ok,
                    sequence_number,
                }
            }

            /// Create a PDU with error status
            pub fn error(sequence_number: u32, status: $crate::datatypes::CommandStatus) -> Self {
                Self {
                    command_status: status,
                    sequence_number,
                }
            }
        }
    };
}

/// Codec implementation plus constructors for a header-only PDU
macro_rules! impl_complete_header_only_pdu {
    ($pdu_type:ident, $command_id:expr) => {
        $crate::macros::impl_header_only_pdu!($pdu_type, $command_id);
        $crate::macros::impl_header_only_constructors!($pdu_type);
    };
}

/// Codec for submit_sm and deliver_sm, which share one body layout.
///
/// The struct must carry the fields listed in `SubmitSm`.
macro_rules! impl_short_message_pdu {
    ($pdu_type:ident, $command_id:expr) => {
        impl $crate::codec::Encodable for $pdu_type {
            fn command_id(&self) -> $crate::datatypes::CommandId {
                $command_id
            }

            fn encode(&self, buf: &mut bytes::BytesMut) -> Result<(), $crate::codec::CodecError> {
                use bytes::BufMut;
                use $crate::codec::encode_cstring;
                use $crate::datatypes::string_rules as rules;

                $crate::codec::PduHeader::new($command_id, self.command_status, self.sequence_number)
                    .encode(buf);
                encode_cstring(buf, &self.service_type, rules::SERVICE_TYPE)?;
                self.source.encode(buf, rules::SOURCE_ADDR)?;
                self.destination.encode(buf, rules::DESTINATION_ADDR)?;
                buf.put_u8(self.esm_class);
                buf.put_u8(self.protocol_id);
                buf.put_u8(self.priority_flag);
                encode_cstring(buf, &self.schedule_delivery_time, rules::SCHEDULE_DELIVERY_TIME)?;
                encode_cstring(buf, &self.validity_period, rules::VALIDITY_PERIOD)?;
                buf.put_u8(self.registered_delivery);
                buf.put_u8(self.replace_if_present_flag);
                buf.put_u8(self.data_coding);
                buf.put_u8(self.sm_default_msg_id);
                $crate::codec::encode_short_message(buf, &self.short_message)?;
                self.optional_parameters.encode(buf)
            }
        }

        impl $crate::codec::Decodable for $pdu_type {
            fn command_ids() -> &'static [$crate::datatypes::CommandId] {
                &[$command_id]
            }

            fn decode(
                header: $crate::codec::PduHeader,
                buf: &mut std::io::Cursor<&[u8]>,
            ) -> Result<Self, $crate::codec::CodecError> {
                use $crate::codec::{decode_cstring, decode_u8};
                use $crate::datatypes::Address;
                use $crate::datatypes::string_rules as rules;

                Ok(Self {
                    command_status: header.command_status,
                    sequence_number: header.sequence_number,
                    service_type: decode_cstring(buf, rules::SERVICE_TYPE)?,
                    source: Address::decode(buf, rules::SOURCE_ADDR)?,
                    destination: Address::decode(buf, rules::DESTINATION_ADDR)?,
                    esm_class: decode_u8(buf)?,
                    protocol_id: decode_u8(buf)?,
                    priority_flag: decode_u8(buf)?,
                    schedule_delivery_time: decode_cstring(buf, rules::SCHEDULE_DELIVERY_TIME)?,
                    validity_period: decode_cstring(buf, rules::VALIDITY_PERIOD)?,
                    registered_delivery: decode_u8(buf)?,
                    replace_if_present_flag: decode_u8(buf)?,
                    data_coding: decode_u8(buf)?,
                    sm_default_msg_id: decode_u8(buf)?,
                    short_message: $crate::codec::decode_short_message(buf)?,
                    optional_parameters: $crate::codec::decode_tlvs(buf)?,
                })
            }
        }
    };
}

/// Responses whose body is a message_id followed by optional parameters.
///
/// The body is omitted on the wire for a negative response with no
/// message_id.
macro_rules! impl_message_id_response {
    ($pdu_type:ident, $command_id:expr) => {
        impl $pdu_type {
            pub fn new(sequence_number: u32, message_id: impl Into<String>) -> Self {
                Self {
                    command_status: $crate::datatypes::CommandStatus::Ok,
                    sequence_number,
                    message_id: message_id.into(),
                    optional_parameters: $crate::datatypes::OptionalParameters::new(),
                }
            }

            pub fn error(sequence_number: u32, status: $crate::datatypes::CommandStatus) -> Self {
                Self {
                    command_status: status,
                    ..Self::new(sequence_number, "")
                }
            }
        }

        impl $crate::codec::Encodable for $pdu_type {
            fn command_id(&self) -> $crate::datatypes::CommandId {
                $command_id
            }

            fn encode(&self, buf: &mut bytes::BytesMut) -> Result<(), $crate::codec::CodecError> {
                $crate::codec::PduHeader::new($command_id, self.command_status, self.sequence_number)
                    .encode(buf);
                if !self.command_status.is_ok()
                    && self.message_id.is_empty()
                    && self.optional_parameters.is_empty()
                {
                    return Ok(());
                }
                $crate::codec::encode_cstring(
                    buf,
                    &self.message_id,
                    $crate::datatypes::string_rules::MESSAGE_ID,
                )?;
                self.optional_parameters.encode(buf)
            }
        }

        impl $crate::codec::Decodable for $pdu_type {
            fn command_ids() -> &'static [$crate::datatypes::CommandId] {
                &[$command_id]
            }

            fn decode(
                header: $crate::codec::PduHeader,
                buf: &mut std::io::Cursor<&[u8]>,
            ) -> Result<Self, $crate::codec::CodecError> {
                if $crate::codec::response_body_absent(&header, buf) {
                    return Ok(Self::error(header.sequence_number, header.command_status));
                }
                Ok(Self {
                    command_status: header.command_status,
                    sequence_number: header.sequence_number,
                    message_id: $crate::codec::decode_cstring(
                        buf,
                        $crate::datatypes::string_rules::MESSAGE_ID,
                    )?,
                    optional_parameters: $crate::codec::decode_tlvs(buf)?,
                })
            }
        }
    };
}

/// `From<T> for Frame` and `TryFrom<Frame> for T` for one frame variant.
///
/// The `boxed` form is for large PDUs stored boxed inside the frame. A
/// failed conversion hands the frame back unchanged.
macro_rules! impl_frame_conversions {
    ($variant:ident, $pdu_type:ty) => {
        impl From<$pdu_type> for $crate::frame::Frame {
            fn from(pdu: $pdu_type) -> Self {
                $crate::frame::Frame::$variant(pdu)
            }
        }

        impl TryFrom<$crate::frame::Frame> for $pdu_type {
            type Error = $crate::frame::Frame;

            fn try_from(frame: $crate::frame::Frame) -> Result<Self, Self::Error> {
                match frame {
                    $crate::frame::Frame::$variant(pdu) => Ok(pdu),
                    other => Err(other),
                }
            }
        }
    };
    (boxed $variant:ident, $pdu_type:ty) => {
        impl From<$pdu_type> for $crate::frame::Frame {
            fn from(pdu: $pdu_type) -> Self {
                $crate::frame::Frame::$variant(Box::new(pdu))
            }
        }

        impl TryFrom<$crate::frame::Frame> for $pdu_type {
            type Error = $crate::frame::Frame;

            fn try_from(frame: $crate::frame::Frame) -> Result<Self, Self::Error> {
                match frame {
                    $crate::frame::Frame::$variant(pdu) => Ok(*pdu),
                    other => Err(other),
                }
            }
        }
    };
}

/// Pair a request type with the response type the peer answers it with.
macro_rules! impl_request {
    ($($request:ty => $response:ty),* $(,)?) => {
        $(
            impl $crate::frame::Request for $request {
                type Response = $response;

                fn sequence_number(&self) -> u32 {
                    self.sequence_number
                }

                fn set_sequence_number(&mut self, sequence_number: u32) {
                    self.sequence_number = sequence_number;
                }
            }
        )*
    };
}

/// Match a frame and bind the PDU inside whichever variant it is.
macro_rules! with_pdu {
    ($frame:expr, $pdu:ident => $body:expr) => {
        match $frame {
            $crate::frame::Frame::GenericNack($pdu) => $body,
            $crate::frame::Frame::Bind($pdu) => $body,
            $crate::frame::Frame::BindResp($pdu) => $body,
            $crate::frame::Frame::Outbind($pdu) => $body,
            $crate::frame::Frame::Unbind($pdu) => $body,
            $crate::frame::Frame::UnbindResp($pdu) => $body,
            $crate::frame::Frame::EnquireLink($pdu) => $body,
            $crate::frame::Frame::EnquireLinkResp($pdu) => $body,
            $crate::frame::Frame::SubmitSm($pdu) => $body,
            $crate::frame::Frame::SubmitSmResp($pdu) => $body,
            $crate::frame::Frame::DeliverSm($pdu) => $body,
            $crate::frame::Frame::DeliverSmResp($pdu) => $body,
            $crate::frame::Frame::DataSm($pdu) => $body,
            $crate::frame::Frame::DataSmResp($pdu) => $body,
            $crate::frame::Frame::SubmitMulti($pdu) => $body,
            $crate::frame::Frame::SubmitMultiResp($pdu) => $body,
            $crate::frame::Frame::QuerySm($pdu) => $body,
            $crate::frame::Frame::QuerySmResp($pdu) => $body,
            $crate::frame::Frame::CancelSm($pdu) => $body,
            $crate::frame::Frame::CancelSmResp($pdu) => $body,
            $crate::frame::Frame::ReplaceSm($pdu) => $body,
            $crate::frame::Frame::ReplaceSmResp($pdu) => $body,
            $crate::frame::Frame::AlertNotification($pdu) => $body,
            $crate::frame::Frame::BroadcastSm($pdu) => $body,
            $crate::frame::Frame::BroadcastSmResp($pdu) => $body,
            $crate::frame::Frame::QueryBroadcastSm($pdu) => $body,
            $crate::frame::Frame::QueryBroadcastSmResp($pdu) => $body,
            $crate::frame::Frame::CancelBroadcastSm($pdu) => $body,
            $crate::frame::Frame::CancelBroadcastSmResp($pdu) => $body,
        }
    };
}

// Make macros available to the rest of the crate
pub(crate) use {
    impl_complete_header_only_pdu, impl_frame_conversions, impl_header_only_constructors,
    impl_header_only_pdu, impl_message_id_response, impl_request, impl_short_message_pdu,
    with_pdu,
};
