//! Error types for the classification framework

use crate::types::ClassificationType;
use thiserror::Error;
use uuid::Uuid;

/// Classification framework error type
///
/// Every validation failure is detected before any write and aborts the
/// whole operation; the variants carry enough context to render a precise
/// user-facing message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// Definition contains a field outside the type's schema
    #[error("field '{field}' is not valid for {c_type} classifications")]
    InvalidClassificationDefinition {
        /// Protocol type the definition was validated against
        c_type: ClassificationType,
        /// Offending field name
        field: String,
    },

    /// A field value failed its range/format validator
    #[error("invalid {field} value: {value}")]
    InvalidClassificationMark {
        /// Validator label (dscp, ecn, protocol, address, ...)
        field: String,
        /// Offending value
        value: String,
    },

    /// A mask/range half of a field failed its validator
    #[error("invalid {field} mask: {value}")]
    InvalidClassificationMask {
        /// Validator label
        field: String,
        /// Offending value
        value: String,
    },

    /// A protocol-type string that names no known type
    #[error("unknown classification type '{given}'")]
    UnknownClassificationType {
        /// The string as received
        given: String,
    },

    /// Referenced classification id does not exist (or is not visible)
    #[error("classification {0} does not exist")]
    InvalidClassificationId(Uuid),

    /// Referenced classification group id does not exist (or is not visible)
    #[error("classification group {0} does not exist")]
    InvalidClassificationGroupId(Uuid),

    /// Delete refused: the classification is a member of some group
    #[error("classification {0} is consumed by a classification group")]
    ConsumedClassification(Uuid),

    /// Delete or nesting refused: the group is a member of another group
    #[error("classification group {0} is consumed by another classification group")]
    ConsumedClassificationGroup(Uuid),

    /// Update payload includes a field outside {name, description}
    #[error("field '{field}' cannot be updated")]
    InvalidUpdateRequest {
        /// The frozen field the payload tried to write
        field: String,
    },

    /// Group membership would close a nesting cycle
    #[error("nesting classification group {group_id} would create a cycle")]
    ClassificationGroupCycle {
        /// The member whose edge closes the cycle
        group_id: Uuid,
    },

    /// Declared ethertype disagrees with the rule protocol
    #[error("invalid ethertype {ethertype} for protocol {protocol}")]
    EthertypeConflictWithProtocol {
        /// Declared ethertype
        ethertype: String,
        /// Rule protocol
        protocol: String,
    },

    /// IP address version disagrees with the declared ethertype
    #[error("IP addresses do not agree with the declared IP version")]
    IpAddressConflict,

    /// Port parameters combined with an ICMP protocol
    #[error("{param} not allowed when protocol is set to ICMP")]
    InvalidIcmpParameter {
        /// The offending parameter
        param: String,
    },

    /// Port range with min above max
    #[error("invalid port range {min}:{max}")]
    InvalidPortRange {
        /// Lower bound as received
        min: u32,
        /// Upper bound as received
        max: u32,
    },
}

impl ClassifierError {
    /// Stable machine-readable code for API error envelopes
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidClassificationDefinition { .. } => "INVALID_CLASSIFICATION_DEFINITION",
            Self::InvalidClassificationMark { .. } => "INVALID_CLASSIFICATION_MARK",
            Self::InvalidClassificationMask { .. } => "INVALID_CLASSIFICATION_MASK",
            Self::UnknownClassificationType { .. } => "UNKNOWN_CLASSIFICATION_TYPE",
            Self::InvalidClassificationId(_) => "INVALID_CLASSIFICATION_ID",
            Self::InvalidClassificationGroupId(_) => "INVALID_CLASSIFICATION_GROUP_ID",
            Self::ConsumedClassification(_) => "CONSUMED_CLASSIFICATION",
            Self::ConsumedClassificationGroup(_) => "CONSUMED_CLASSIFICATION_GROUP",
            Self::InvalidUpdateRequest { .. } => "INVALID_UPDATE_REQUEST",
            Self::ClassificationGroupCycle { .. } => "CLASSIFICATION_GROUP_CYCLE",
            Self::EthertypeConflictWithProtocol { .. } => "ETHERTYPE_CONFLICT_WITH_PROTOCOL",
            Self::IpAddressConflict => "IP_ADDRESS_CONFLICT",
            Self::InvalidIcmpParameter { .. } => "INVALID_ICMP_PARAMETER",
            Self::InvalidPortRange { .. } => "INVALID_PORT_RANGE",
        }
    }
}

/// Result type for the classification framework
pub type ClassifierResult<T> = Result<T, ClassifierError>;
