//! Schema registry
//!
//! One `TypeSchema` per protocol type: the ordered legal field set and the
//! validator dispatched for each field. Replaces the per-type validator
//! dictionaries of older designs with a single immutable value.

use crate::validators::{
    check_valid_dscp_mark, check_valid_dscp_mask, check_valid_ecn_mark, check_valid_ecn_mask,
    check_valid_ethertype, check_valid_flags, check_valid_flags_mask, check_valid_ipv4_address,
    check_valid_ipv4_cidr, check_valid_ipv6_address, check_valid_ipv6_cidr, check_valid_length,
    check_valid_mac_address, check_valid_port, check_valid_protocol_mark, check_valid_ttl,
    check_valid_window, parse_int_value, string_value,
};
use ccf_common::{ClassificationType, ClassifierError, ClassifierResult};
use serde_json::Value;
use std::collections::BTreeMap;

/// Validator dispatched for one definition field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValidator {
    /// Standard DSCP codepoint
    DscpMark,
    /// DSCP mask bits
    DscpMask,
    /// ECN codepoint
    EcnMark,
    /// ECN mask bits
    EcnMask,
    /// IP protocol / next-header number
    Protocol,
    /// IPv4 address, optionally `addr/prefix`
    Ipv4Address,
    /// IPv6 address, optionally `addr/prefix`
    Ipv6Address,
    /// MAC address
    MacAddress,
    /// Ethertype value
    Ethertype,
    /// Transport port
    Port,
    /// Length bound
    Length,
    /// TTL / hop-limit bound
    Ttl,
    /// Header flag bits
    Flags,
    /// Flag mask bits
    FlagsMask,
    /// TCP window bound
    Window,
}

impl FieldValidator {
    /// Whether the field holds an address literal rather than an integer
    pub fn is_address(&self) -> bool {
        matches!(self, Self::Ipv4Address | Self::Ipv6Address | Self::MacAddress)
    }

    /// Validate one field value, returning the normalized value to persist
    pub fn validate(&self, value: &Value) -> ClassifierResult<Value> {
        match self {
            Self::DscpMark => check_valid_dscp_mark(parse_int_value("dscp", value)?).map(Value::from),
            Self::DscpMask => check_valid_dscp_mask(parse_int_value("dscp", value)?).map(Value::from),
            Self::EcnMark => check_valid_ecn_mark(parse_int_value("ecn", value)?).map(Value::from),
            Self::EcnMask => check_valid_ecn_mask(parse_int_value("ecn", value)?).map(Value::from),
            Self::Protocol => {
                check_valid_protocol_mark(parse_int_value("protocol", value)?).map(Value::from)
            }
            Self::Ipv4Address => {
                let s = string_value("address", value)?;
                match s.split_once('/') {
                    Some((addr, prefix)) => {
                        check_valid_ipv4_address(addr)?;
                        check_valid_ipv4_cidr(parse_int_value("cidr", &Value::from(prefix))?)?;
                    }
                    None => {
                        check_valid_ipv4_address(s)?;
                    }
                }
                Ok(Value::from(s))
            }
            Self::Ipv6Address => {
                let s = string_value("address", value)?;
                match s.split_once('/') {
                    Some((addr, prefix)) => {
                        check_valid_ipv6_address(addr)?;
                        check_valid_ipv6_cidr(parse_int_value("cidr", &Value::from(prefix))?)?;
                    }
                    None => {
                        check_valid_ipv6_address(s)?;
                    }
                }
                Ok(Value::from(s))
            }
            Self::MacAddress => {
                let s = string_value("mac address", value)?;
                check_valid_mac_address(s)?;
                Ok(Value::from(s))
            }
            Self::Ethertype => {
                check_valid_ethertype(parse_int_value("ethertype", value)?).map(Value::from)
            }
            Self::Port => check_valid_port(parse_int_value("port", value)?).map(Value::from),
            Self::Length => check_valid_length(parse_int_value("length", value)?).map(Value::from),
            Self::Ttl => check_valid_ttl(parse_int_value("ttl", value)?).map(Value::from),
            Self::Flags => check_valid_flags(parse_int_value("flags", value)?).map(Value::from),
            Self::FlagsMask => {
                check_valid_flags_mask(parse_int_value("flags", value)?).map(Value::from)
            }
            Self::Window => check_valid_window(parse_int_value("window", value)?).map(Value::from),
        }
    }
}

/// A single legal field of a protocol type
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    /// Field name as it appears in definitions
    pub name: &'static str,
    /// Validator applied to the field's value
    pub validator: FieldValidator,
}

const fn field(name: &'static str, validator: FieldValidator) -> FieldDef {
    FieldDef { name, validator }
}

const ETHERNET_FIELDS: &[FieldDef] = &[
    field("ethertype", FieldValidator::Ethertype),
    field("src_addr", FieldValidator::MacAddress),
    field("dst_addr", FieldValidator::MacAddress),
];

const IPV4_FIELDS: &[FieldDef] = &[
    field("dscp", FieldValidator::DscpMark),
    field("dscp_mask", FieldValidator::DscpMask),
    field("ecn", FieldValidator::EcnMark),
    field("length_min", FieldValidator::Length),
    field("length_max", FieldValidator::Length),
    field("flags", FieldValidator::Flags),
    field("flags_mask", FieldValidator::FlagsMask),
    field("ttl_min", FieldValidator::Ttl),
    field("ttl_max", FieldValidator::Ttl),
    field("protocol", FieldValidator::Protocol),
    field("src_addr", FieldValidator::Ipv4Address),
    field("dst_addr", FieldValidator::Ipv4Address),
];

const IPV6_FIELDS: &[FieldDef] = &[
    field("dscp", FieldValidator::DscpMark),
    field("dscp_mask", FieldValidator::DscpMask),
    field("ecn", FieldValidator::EcnMark),
    field("length_min", FieldValidator::Length),
    field("length_max", FieldValidator::Length),
    field("next_header", FieldValidator::Protocol),
    field("hops_min", FieldValidator::Ttl),
    field("hops_max", FieldValidator::Ttl),
    field("src_addr", FieldValidator::Ipv6Address),
    field("dst_addr", FieldValidator::Ipv6Address),
];

const TCP_FIELDS: &[FieldDef] = &[
    field("src_port_min", FieldValidator::Port),
    field("src_port_max", FieldValidator::Port),
    field("dst_port_min", FieldValidator::Port),
    field("dst_port_max", FieldValidator::Port),
    field("flags", FieldValidator::Flags),
    field("flags_mask", FieldValidator::FlagsMask),
    field("window_min", FieldValidator::Window),
    field("window_max", FieldValidator::Window),
];

const UDP_FIELDS: &[FieldDef] = &[
    field("src_port_min", FieldValidator::Port),
    field("src_port_max", FieldValidator::Port),
    field("dst_port_min", FieldValidator::Port),
    field("dst_port_max", FieldValidator::Port),
    field("length_min", FieldValidator::Length),
    field("length_max", FieldValidator::Length),
];

/// The legal field set of one protocol type
#[derive(Debug, Clone, Copy)]
pub struct TypeSchema {
    c_type: ClassificationType,
    fields: &'static [FieldDef],
}

impl TypeSchema {
    /// Protocol type this schema belongs to
    pub fn c_type(&self) -> ClassificationType {
        self.c_type
    }

    /// Fields in registry order
    pub fn fields(&self) -> &'static [FieldDef] {
        self.fields
    }

    /// Field names in registry order
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Look up one field definition
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether `name` is a legal field of this type
    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Validate a definition map against this schema
    ///
    /// Rejects unknown keys, applies the value/mask shorthand (a string
    /// value containing `/` splits into `<field>` and `<field>_mask` when
    /// the schema carries that sibling), dispatches every field validator
    /// and returns the normalized map. Null values are treated as absent.
    pub fn validate_definition(
        &self,
        definition: &serde_json::Map<String, Value>,
    ) -> ClassifierResult<BTreeMap<String, Value>> {
        let mut normalized = BTreeMap::new();
        for (key, value) in definition {
            if value.is_null() {
                continue;
            }
            let def = self
                .field(key)
                .ok_or_else(|| ClassifierError::InvalidClassificationDefinition {
                    c_type: self.c_type,
                    field: key.clone(),
                })?;
            if let Some(raw) = value.as_str() {
                if !def.validator.is_address() {
                    if let Some((base, mask)) = raw.split_once('/') {
                        let mask_field = format!("{key}_mask");
                        let mask_def = self.field(&mask_field).ok_or_else(|| {
                            ClassifierError::InvalidClassificationDefinition {
                                c_type: self.c_type,
                                field: mask_field.clone(),
                            }
                        })?;
                        normalized
                            .insert(key.clone(), def.validator.validate(&Value::from(base))?);
                        normalized
                            .insert(mask_field, mask_def.validator.validate(&Value::from(mask))?);
                        continue;
                    }
                }
            }
            normalized.insert(key.clone(), def.validator.validate(value)?);
        }
        Ok(normalized)
    }
}

/// Immutable per-type field schemas, constructed at startup and injected
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: [TypeSchema; 5],
}

impl SchemaRegistry {
    /// Build the canonical registry
    pub fn new() -> Self {
        Self {
            schemas: [
                TypeSchema {
                    c_type: ClassificationType::Ethernet,
                    fields: ETHERNET_FIELDS,
                },
                TypeSchema {
                    c_type: ClassificationType::Ipv4,
                    fields: IPV4_FIELDS,
                },
                TypeSchema {
                    c_type: ClassificationType::Ipv6,
                    fields: IPV6_FIELDS,
                },
                TypeSchema {
                    c_type: ClassificationType::Tcp,
                    fields: TCP_FIELDS,
                },
                TypeSchema {
                    c_type: ClassificationType::Udp,
                    fields: UDP_FIELDS,
                },
            ],
        }
    }

    /// Schema of one protocol type
    pub fn schema(&self, c_type: ClassificationType) -> &TypeSchema {
        // `schemas` is laid out in registry order
        let index = match c_type {
            ClassificationType::Ethernet => 0,
            ClassificationType::Ipv4 => 1,
            ClassificationType::Ipv6 => 2,
            ClassificationType::Tcp => 3,
            ClassificationType::Udp => 4,
        };
        &self.schemas[index]
    }

    /// Every schema, in registry order
    pub fn schemas(&self) -> impl Iterator<Item = &TypeSchema> {
        self.schemas.iter()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
