// ABOUTME: command_status codes carried in every response header and in submit_multi_resp
// ABOUTME: Each code keeps its protocol mnemonic for logs; codes outside the table read as UnknownError

use num_enum::TryFromPrimitive;
use std::fmt;

macro_rules! command_statuses {
    ($($(#[$doc:meta])* $variant:ident = $code:literal => $mnemonic:literal,)+) => {
        /// Outcome of a request, reported in the response header. Requests
        /// always carry `Ok`.
        #[derive(TryFromPrimitive, Copy, Clone, Debug, PartialEq, Eq, Hash)]
        #[repr(u32)]
        pub enum CommandStatus {
            $($(#[$doc])* $variant = $code,)+
        }

        impl CommandStatus {
            /// The ESME_R* mnemonic.
            pub fn mnemonic(&self) -> &'static str {
                match self {
                    $(CommandStatus::$variant => $mnemonic,)+
                }
            }
        }
    };
}

command_statuses! {
    Ok = 0x0000_0000 => "ESME_ROK",
    InvalidMsgLength = 0x0000_0001 => "ESME_RINVMSGLEN",
    InvalidCommandLength = 0x0000_0002 => "ESME_RINVCMDLEN",
    InvalidCommandId = 0x0000_0003 => "ESME_RINVCMDID",
    /// The command is not allowed in the session's current state.
    IncorrectBindStatus = 0x0000_0004 => "ESME_RINVBNDSTS",
    AlreadyBoundState = 0x0000_0005 => "ESME_RALYBND",
    InvalidPriorityFlag = 0x0000_0006 => "ESME_RINVPRTFLG",
    InvalidRegisteredDeliveryFlag = 0x0000_0007 => "ESME_RINVREGDLVFLG",
    SystemError = 0x0000_0008 => "ESME_RSYSERR",
    InvalidSourceAddress = 0x0000_000A => "ESME_RINVSRCADR",
    InvalidDestinationAddress = 0x0000_000B => "ESME_RINVDSTADR",
    InvalidMessageId = 0x0000_000C => "ESME_RINVMSGID",
    BindFailed = 0x0000_000D => "ESME_RBINDFAIL",
    InvalidPassword = 0x0000_000E => "ESME_RINVPASWD",
    InvalidSystemId = 0x0000_000F => "ESME_RINVSYSID",
    CancelSmFailed = 0x0000_0011 => "ESME_RCANCELFAIL",
    ReplaceSmFailed = 0x0000_0013 => "ESME_RREPLACEFAIL",
    MessageQueueFull = 0x0000_0014 => "ESME_RMSGQFUL",
    InvalidServiceType = 0x0000_0015 => "ESME_RINVSERTYP",
    InvalidNumberOfDestinations = 0x0000_0033 => "ESME_RINVNUMDESTS",
    InvalidDistributionListName = 0x0000_0034 => "ESME_RINVDLNAME",
    InvalidDestinationFlag = 0x0000_0040 => "ESME_RINVDESTFLAG",
    InvalidSubmitWithReplaceRequest = 0x0000_0042 => "ESME_RINVSUBREP",
    InvalidEsmClassFieldData = 0x0000_0043 => "ESME_RINVESMCLASS",
    CannotSubmitToDistributionList = 0x0000_0044 => "ESME_RCNTSUBDL",
    SubmitFailed = 0x0000_0045 => "ESME_RSUBMITFAIL",
    InvalidSourceAddressTon = 0x0000_0048 => "ESME_RINVSRCTON",
    InvalidSourceAddressNpi = 0x0000_0049 => "ESME_RINVSRCNPI",
    InvalidDestinationAddressTon = 0x0000_0050 => "ESME_RINVDSTTON",
    InvalidDestinationAddressNpi = 0x0000_0051 => "ESME_RINVDSTNPI",
    InvalidSystemTypeField = 0x0000_0053 => "ESME_RINVSYSTYP",
    InvalidReplaceIfPresentFlag = 0x0000_0054 => "ESME_RINVREPFLAG",
    InvalidNumberOfMessages = 0x0000_0055 => "ESME_RINVNUMMSGS",
    ThrottlingError = 0x0000_0058 => "ESME_RTHROTTLED",
    InvalidScheduledDeliveryTime = 0x0000_0061 => "ESME_RINVSCHED",
    InvalidExpiryTime = 0x0000_0062 => "ESME_RINVEXPIRY",
    InvalidPredefinedMessageId = 0x0000_0063 => "ESME_RINVDFTMSGID",
    ReceiverTemporaryAppError = 0x0000_0064 => "ESME_RX_T_APPN",
    ReceiverPermanentAppError = 0x0000_0065 => "ESME_RX_P_APPN",
    ReceiverRejectMessageError = 0x0000_0066 => "ESME_RX_R_APPN",
    QuerySmRequestFailed = 0x0000_0067 => "ESME_RQUERYFAIL",
    ErrorInOptionalPartofPduBody = 0x0000_00C0 => "ESME_RINVTLVSTREAM",
    OptionalParameterNotAllowed = 0x0000_00C1 => "ESME_RTLVNOTALLWD",
    InvalidParameterLength = 0x0000_00C2 => "ESME_RINVTLVLEN",
    ExpectedOptionalParameterMissing = 0x0000_00C3 => "ESME_RMISSINGTLV",
    InvalidOptionalParameterValue = 0x0000_00C4 => "ESME_RINVTLVVAL",
    DeliveryFailed = 0x0000_00FE => "ESME_RDELIVERYFAILURE",
    /// Also stands in for reserved and vendor specific codes on receipt.
    UnknownError = 0x0000_00FF => "ESME_RUNKNOWNERR",
    // SMPP 5.0
    ServiceTypeUnauthorized = 0x0000_0100 => "ESME_RSERTYPUNAUTH",
    Prohibited = 0x0000_0101 => "ESME_RPROHIBITED",
    ServiceTypeUnavailable = 0x0000_0102 => "ESME_RSERTYPUNAVAIL",
    ServiceTypeDenied = 0x0000_0103 => "ESME_RSERTYPDENIED",
    InvalidDataCoding = 0x0000_0104 => "ESME_RINVDCS",
    InvalidSourceAddressSubunit = 0x0000_0105 => "ESME_RINVSRCADDRSUBUNIT",
    InvalidDestinationAddressSubunit = 0x0000_0106 => "ESME_RINVDSTADDRSUBUNIT",
    InvalidBroadcastFrequencyInterval = 0x0000_0107 => "ESME_RINVBCASTFREQINT",
    InvalidBroadcastAliasName = 0x0000_0108 => "ESME_RINVBCASTALIAS_NAME",
    InvalidBroadcastAreaFormat = 0x0000_0109 => "ESME_RINVBCASTAREAFMT",
    InvalidNumberOfBroadcastAreas = 0x0000_010A => "ESME_RINVNUMBCAST_AREAS",
    InvalidBroadcastContentType = 0x0000_010B => "ESME_RINVBCASTCNTTYPE",
    InvalidBroadcastMessageClass = 0x0000_010C => "ESME_RINVBCASTMSGCLASS",
    BroadcastFailed = 0x0000_010D => "ESME_RBCASTFAIL",
    BroadcastQueryFailed = 0x0000_010E => "ESME_RBCASTQUERYFAIL",
    BroadcastCancelFailed = 0x0000_010F => "ESME_RBCASTCANCELFAIL",
    InvalidBroadcastRepeat = 0x0000_0110 => "ESME_RINVBCAST_REP",
    InvalidBroadcastServiceGroup = 0x0000_0111 => "ESME_RINVBCASTSRVGRP",
    InvalidBroadcastChannelIndicator = 0x0000_0112 => "ESME_RINVBCASTCHANIND",
}

impl CommandStatus {
    pub fn from_code(code: u32) -> Self {
        CommandStatus::try_from(code).unwrap_or_else(|_| {
            tracing::warn!(code = %format!("{code:#010x}"), "unknown command_status");
            CommandStatus::UnknownError
        })
    }

    pub fn code(&self) -> u32 {
        *self as u32
    }

    pub fn is_ok(&self) -> bool {
        *self == CommandStatus::Ok
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#04x})", self.mnemonic(), self.code())
    }
}
