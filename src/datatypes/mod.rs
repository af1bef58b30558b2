mod address;
mod alert_notification;
mod bind;
mod broadcast_sm;
mod cancel_broadcast_sm;
mod cancel_sm;
mod command_id;
mod command_status;
mod data_sm;
mod deliver_sm;
mod enquire_link;
mod generic_nack;
mod interface_version;
mod numeric_plan_indicator;
mod outbind;
mod query_broadcast_sm;
mod query_sm;
mod replace_sm;
pub mod string_rules;
mod submit_multi;
mod submit_sm;
pub mod tlv;
mod type_of_number;
mod unbind;

pub use address::Address;
pub use alert_notification::AlertNotification;
pub use bind::{Bind, BindResponse, BindType};
pub use broadcast_sm::{BroadcastSm, BroadcastSmResponse};
pub use cancel_broadcast_sm::{CancelBroadcastSm, CancelBroadcastSmResponse};
pub use cancel_sm::{CancelSm, CancelSmResponse};
pub use command_id::CommandId;
pub use command_status::CommandStatus;
pub use data_sm::{DataSm, DataSmResponse};
pub use deliver_sm::{DeliverSm, DeliverSmResponse};
pub use enquire_link::{EnquireLink, EnquireLinkResponse};
pub use generic_nack::GenericNack;
pub use interface_version::InterfaceVersion;
pub use numeric_plan_indicator::NumericPlanIndicator;
pub use outbind::Outbind;
pub use query_broadcast_sm::{QueryBroadcastSm, QueryBroadcastSmResponse};
pub use query_sm::{QuerySm, QuerySmResponse};
pub use replace_sm::{ReplaceSm, ReplaceSmResponse};
pub use string_rules::{StringField, StringValidationError};
pub use submit_multi::{Destination, SubmitMulti, SubmitMultiResponse, UnsuccessfulDelivery};
pub use submit_sm::{SubmitSm, SubmitSmResponse};
pub use tlv::{OptionalParameters, Tlv, TlvIter};
pub use type_of_number::TypeOfNumber;
pub use unbind::{Unbind, UnbindResponse};
