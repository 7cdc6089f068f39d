//! Core taxonomy vocabulary

use crate::error::ClassifierError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Classification record id
pub type ClassificationId = Uuid;

/// Classification group id
pub type ClassificationGroupId = Uuid;

/// Protocol-type discriminator of a classification record
///
/// The tag is write-once: it selects the field schema the record's
/// definition is validated against and cannot change after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationType {
    /// Ethernet header fields
    Ethernet,
    /// IPv4 header fields
    Ipv4,
    /// IPv6 header fields
    Ipv6,
    /// TCP header fields
    Tcp,
    /// UDP header fields
    Udp,
}

impl ClassificationType {
    /// Every protocol type, in registry order
    pub const ALL: [Self; 5] = [Self::Ethernet, Self::Ipv4, Self::Ipv6, Self::Tcp, Self::Udp];

    /// Wire name of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ethernet => "ethernet",
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        }
    }
}

impl fmt::Display for ClassificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassificationType {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ethernet" => Ok(Self::Ethernet),
            "ipv4" => Ok(Self::Ipv4),
            "ipv6" => Ok(Self::Ipv6),
            "tcp" => Ok(Self::Tcp),
            "udp" => Ok(Self::Udp),
            other => Err(ClassifierError::UnknownClassificationType {
                given: other.to_string(),
            }),
        }
    }
}

/// Boolean combinator applied across a group's members
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroupOperator {
    /// Every member must match
    #[default]
    And,
    /// Any member may match
    Or,
}

impl fmt::Display for GroupOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => f.write_str("AND"),
            Self::Or => f.write_str("OR"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_round_trips_through_str() {
        for c_type in ClassificationType::ALL {
            assert_eq!(c_type.as_str().parse::<ClassificationType>().unwrap(), c_type);
        }
        assert!("vlan".parse::<ClassificationType>().is_err());
    }

    #[test]
    fn test_operator_wire_names() {
        assert_eq!(serde_json::to_string(&GroupOperator::And).unwrap(), "\"AND\"");
        assert_eq!(serde_json::to_string(&GroupOperator::Or).unwrap(), "\"OR\"");
        assert_eq!(GroupOperator::default(), GroupOperator::And);
    }
}
