//! Deriving classifications from security-group rules
//!
//! Downstream services hand over their own rule shapes; the derivation
//! checks cross-field consistency first, then emits one classification per
//! header layer the rule constrains. Ingress rules put the remote prefix on
//! the source side, egress rules on the destination side.

use crate::engine::NewClassification;
use ccf_common::{ClassificationType, ClassifierError, ClassifierResult};
use ccf_schema::{ETHERTYPE_IPV4, ETHERTYPE_IPV6};
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const PROTO_NAME_TCP: &str = "tcp";
const PROTO_NAME_UDP: &str = "udp";
const PROTO_NAME_ICMP: &str = "icmp";
const PROTO_NAME_ICMP_V6: &str = "icmpv6";

/// Ethertype declared on a security-group rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleEthertype {
    /// IPv4 payloads
    #[serde(rename = "IPv4")]
    Ipv4,
    /// IPv6 payloads
    #[serde(rename = "IPv6")]
    Ipv6,
}

impl RuleEthertype {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Ipv4 => "IPv4",
            Self::Ipv6 => "IPv6",
        }
    }

    fn ethertype_value(&self) -> i64 {
        match self {
            Self::Ipv4 => ETHERTYPE_IPV4,
            Self::Ipv6 => ETHERTYPE_IPV6,
        }
    }
}

/// Traffic direction of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleDirection {
    /// Traffic arriving at the protected port
    Ingress,
    /// Traffic leaving the protected port
    Egress,
}

impl RuleDirection {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Ingress => "ingress",
            Self::Egress => "egress",
        }
    }
}

/// A security-group rule to translate into classification records
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityGroupRule {
    /// Declared IP version
    pub ethertype: RuleEthertype,
    /// Traffic direction
    pub direction: RuleDirection,
    /// Protocol name (tcp, udp, icmp, icmpv6) or number
    #[serde(default)]
    pub protocol: Option<String>,
    /// Remote CIDR the rule matches against
    #[serde(default)]
    pub remote_ip_prefix: Option<String>,
    /// Lower port bound
    #[serde(default)]
    pub port_range_min: Option<u32>,
    /// Upper port bound
    #[serde(default)]
    pub port_range_max: Option<u32>,
}

/// Translate one security-group rule into classification create requests
///
/// Always emits an ethernet record for the declared ethertype; adds an
/// ipv4/ipv6 record when the rule constrains protocol or remote prefix, and
/// a tcp/udp record when it constrains ports.
pub fn derive_from_security_group(
    rule: &SecurityGroupRule,
) -> ClassifierResult<Vec<NewClassification>> {
    validate_rule(rule)?;

    let direction = rule.direction.as_str();
    let mut records = Vec::new();

    let mut definition = Map::new();
    definition.insert("ethertype".into(), Value::from(rule.ethertype.ethertype_value()));
    records.push(request(
        ClassificationType::Ethernet,
        format!("sg-{direction}-ethernet"),
        definition,
    ));

    let protocol_number = rule.protocol.as_deref().map(protocol_number).transpose()?;
    if protocol_number.is_some() || rule.remote_ip_prefix.is_some() {
        let mut definition = Map::new();
        let (c_type, protocol_field) = match rule.ethertype {
            RuleEthertype::Ipv4 => (ClassificationType::Ipv4, "protocol"),
            RuleEthertype::Ipv6 => (ClassificationType::Ipv6, "next_header"),
        };
        if let Some(number) = protocol_number {
            definition.insert(protocol_field.into(), Value::from(number));
        }
        if let Some(prefix) = &rule.remote_ip_prefix {
            let addr_field = match rule.direction {
                RuleDirection::Ingress => "src_addr",
                RuleDirection::Egress => "dst_addr",
            };
            definition.insert(addr_field.into(), Value::from(prefix.clone()));
        }
        records.push(request(
            c_type,
            format!("sg-{direction}-{}", c_type.as_str()),
            definition,
        ));
    }

    if let Some(protocol) = rule.protocol.as_deref() {
        let transport = match protocol {
            PROTO_NAME_TCP => Some(ClassificationType::Tcp),
            PROTO_NAME_UDP => Some(ClassificationType::Udp),
            _ => None,
        };
        if let Some(c_type) = transport {
            if rule.port_range_min.is_some() || rule.port_range_max.is_some() {
                let mut definition = Map::new();
                if let Some(min) = rule.port_range_min {
                    definition.insert("dst_port_min".into(), Value::from(min));
                }
                if let Some(max) = rule.port_range_max {
                    definition.insert("dst_port_max".into(), Value::from(max));
                }
                records.push(request(
                    c_type,
                    format!("sg-{direction}-{protocol}"),
                    definition,
                ));
            }
        }
    }

    Ok(records)
}

fn request(
    c_type: ClassificationType,
    name: String,
    definition: Map<String, Value>,
) -> NewClassification {
    NewClassification {
        c_type,
        name,
        description: "derived from a security-group rule".into(),
        shared: false,
        negated: false,
        definition,
    }
}

/// Cross-field consistency checks, run before any record is built
fn validate_rule(rule: &SecurityGroupRule) -> ClassifierResult<()> {
    if let Some(protocol) = rule.protocol.as_deref() {
        let has_ports = rule.port_range_min.is_some() || rule.port_range_max.is_some();
        if matches!(protocol, PROTO_NAME_ICMP | PROTO_NAME_ICMP_V6) && has_ports {
            return Err(ClassifierError::InvalidIcmpParameter {
                param: "port range".into(),
            });
        }
        if protocol == PROTO_NAME_ICMP_V6 && rule.ethertype == RuleEthertype::Ipv4 {
            return Err(ClassifierError::EthertypeConflictWithProtocol {
                ethertype: rule.ethertype.as_str().into(),
                protocol: protocol.into(),
            });
        }
    }

    if let Some(prefix) = rule.remote_ip_prefix.as_deref() {
        let network: IpNetwork =
            prefix
                .parse()
                .map_err(|_| ClassifierError::InvalidClassificationMark {
                    field: "address".into(),
                    value: prefix.into(),
                })?;
        let agrees = match rule.ethertype {
            RuleEthertype::Ipv4 => matches!(network, IpNetwork::V4(_)),
            RuleEthertype::Ipv6 => matches!(network, IpNetwork::V6(_)),
        };
        if !agrees {
            return Err(ClassifierError::IpAddressConflict);
        }
    }

    if let (Some(min), Some(max)) = (rule.port_range_min, rule.port_range_max) {
        if min > max {
            return Err(ClassifierError::InvalidPortRange { min, max });
        }
    }

    Ok(())
}

/// Map a protocol name (or number string) to its protocol number
fn protocol_number(protocol: &str) -> ClassifierResult<i64> {
    match protocol {
        PROTO_NAME_TCP => Ok(6),
        PROTO_NAME_UDP => Ok(17),
        PROTO_NAME_ICMP => Ok(1),
        PROTO_NAME_ICMP_V6 => Ok(58),
        other => {
            let number = other.parse::<i64>().map_err(|_| {
                ClassifierError::InvalidClassificationMark {
                    field: "protocol".into(),
                    value: other.into(),
                }
            })?;
            ccf_schema::validators::check_valid_protocol_mark(number)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ClassifierEngine;
    use ccf_common::RequestScope;
    use serde_json::json;

    fn rule() -> SecurityGroupRule {
        SecurityGroupRule {
            ethertype: RuleEthertype::Ipv4,
            direction: RuleDirection::Ingress,
            protocol: Some("tcp".into()),
            remote_ip_prefix: Some("10.0.0.0/24".into()),
            port_range_min: Some(80),
            port_range_max: Some(80),
        }
    }

    #[test]
    fn test_tcp_rule_derives_three_layers() {
        let records = derive_from_security_group(&rule()).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].c_type, ClassificationType::Ethernet);
        assert_eq!(records[0].definition["ethertype"], json!(0x0800));

        assert_eq!(records[1].c_type, ClassificationType::Ipv4);
        assert_eq!(records[1].definition["protocol"], json!(6));
        assert_eq!(records[1].definition["src_addr"], json!("10.0.0.0/24"));

        assert_eq!(records[2].c_type, ClassificationType::Tcp);
        assert_eq!(records[2].definition["dst_port_min"], json!(80));
    }

    #[test]
    fn test_egress_puts_prefix_on_destination() {
        let mut egress = rule();
        egress.direction = RuleDirection::Egress;
        let records = derive_from_security_group(&egress).unwrap();
        assert_eq!(records[1].definition["dst_addr"], json!("10.0.0.0/24"));
    }

    #[test]
    fn test_ipv6_rule_uses_next_header() {
        let rule = SecurityGroupRule {
            ethertype: RuleEthertype::Ipv6,
            direction: RuleDirection::Ingress,
            protocol: Some("udp".into()),
            remote_ip_prefix: Some("2001:db8::/64".into()),
            port_range_min: Some(53),
            port_range_max: Some(53),
        };
        let records = derive_from_security_group(&rule).unwrap();
        assert_eq!(records[0].definition["ethertype"], json!(0x86DD));
        assert_eq!(records[1].c_type, ClassificationType::Ipv6);
        assert_eq!(records[1].definition["next_header"], json!(17));
        assert_eq!(records[2].c_type, ClassificationType::Udp);
    }

    #[test]
    fn test_icmp_with_ports_rejected() {
        let mut bad = rule();
        bad.protocol = Some("icmp".into());
        assert_eq!(
            derive_from_security_group(&bad).unwrap_err(),
            ClassifierError::InvalidIcmpParameter { param: "port range".into() }
        );
    }

    #[test]
    fn test_icmpv6_with_ipv4_ethertype_rejected() {
        let bad = SecurityGroupRule {
            ethertype: RuleEthertype::Ipv4,
            direction: RuleDirection::Ingress,
            protocol: Some("icmpv6".into()),
            remote_ip_prefix: None,
            port_range_min: None,
            port_range_max: None,
        };
        assert_eq!(
            derive_from_security_group(&bad).unwrap_err(),
            ClassifierError::EthertypeConflictWithProtocol {
                ethertype: "IPv4".into(),
                protocol: "icmpv6".into(),
            }
        );
    }

    #[test]
    fn test_prefix_version_must_agree_with_ethertype() {
        let mut bad = rule();
        bad.remote_ip_prefix = Some("2001:db8::/64".into());
        assert_eq!(
            derive_from_security_group(&bad).unwrap_err(),
            ClassifierError::IpAddressConflict
        );
    }

    #[test]
    fn test_inverted_port_range_rejected() {
        let mut bad = rule();
        bad.port_range_min = Some(90);
        bad.port_range_max = Some(80);
        assert_eq!(
            derive_from_security_group(&bad).unwrap_err(),
            ClassifierError::InvalidPortRange { min: 90, max: 80 }
        );
    }

    #[test]
    fn test_derived_records_pass_engine_validation() {
        let engine = ClassifierEngine::new();
        let scope = RequestScope::new("p1");
        for request in derive_from_security_group(&rule()).unwrap() {
            engine.create_classification(&scope, request).unwrap();
        }
        assert_eq!(engine.list_classifications(&scope, None).len(), 3);
    }
}
