//! Payload flattening and reconstruction
//!
//! Incoming payloads nest the protocol-specific fields under `definition`;
//! persisted records keep them as first-class attributes. `break_out_headers`
//! flattens one way, `merge_header` reconstructs the other, selecting exactly
//! the schema's field set and defaulting absent fields to null.

use ccf_common::{ClassificationType, ClassifierError, ClassifierResult};
use ccf_schema::SchemaRegistry;
use ccf_store::Classification;
use serde_json::{Map, Value};

/// Attributes shared by every classification, whatever its type
const COMMON_FIELDS: &[&str] = &[
    "id",
    "name",
    "description",
    "project_id",
    "shared",
    "negated",
    "c_type",
    "created_at",
    "updated_at",
];

/// Flatten a `{"classification": {..., "definition": {...}}}` payload
///
/// Accepts the wrapped or the bare form. The client-supplied `id` is
/// dropped; definition fields are validated against the type's schema
/// (including the value/mask shorthand split) and hoisted beside the common
/// attributes.
pub fn break_out_headers(
    registry: &SchemaRegistry,
    payload: &Value,
) -> ClassifierResult<Map<String, Value>> {
    let body = payload.get("classification").unwrap_or(payload);
    let object = body
        .as_object()
        .ok_or_else(|| ClassifierError::UnknownClassificationType {
            given: body.to_string(),
        })?;

    let c_type: ClassificationType = object
        .get("c_type")
        .and_then(Value::as_str)
        .unwrap_or("null")
        .parse()?;
    let schema = registry.schema(c_type);

    let mut flat = Map::new();
    for (key, value) in object {
        match key.as_str() {
            "id" | "definition" => {}
            _ => {
                flat.insert(key.clone(), value.clone());
            }
        }
    }
    if let Some(definition) = object.get("definition") {
        let def_object = definition.as_object().ok_or_else(|| {
            ClassifierError::InvalidClassificationDefinition {
                c_type,
                field: "definition".into(),
            }
        })?;
        for (field, value) in schema.validate_definition(def_object)? {
            flat.insert(field, value);
        }
    }
    Ok(flat)
}

/// Rebuild the nested payload from a flat attribute map
///
/// Selects exactly the keys belonging to the record's type schema,
/// defaulting any schema key absent on the record to null.
pub fn merge_header(
    registry: &SchemaRegistry,
    flat: &Map<String, Value>,
) -> ClassifierResult<Value> {
    let c_type: ClassificationType = flat
        .get("c_type")
        .and_then(Value::as_str)
        .unwrap_or("null")
        .parse()?;
    let schema = registry.schema(c_type);

    let mut payload = Map::new();
    for key in COMMON_FIELDS {
        if let Some(value) = flat.get(*key) {
            payload.insert((*key).to_string(), value.clone());
        }
    }
    let mut definition = Map::new();
    for name in schema.field_names() {
        definition.insert(name.to_string(), flat.get(name).cloned().unwrap_or(Value::Null));
    }
    payload.insert("definition".into(), Value::Object(definition));
    Ok(Value::Object(payload))
}

/// Flatten a stored record into the attribute map `merge_header` consumes
pub fn flatten_record(record: &Classification) -> Map<String, Value> {
    let mut flat = Map::new();
    flat.insert("id".into(), Value::from(record.id.to_string()));
    flat.insert("c_type".into(), Value::from(record.c_type.as_str()));
    flat.insert("name".into(), Value::from(record.name.clone()));
    flat.insert("description".into(), Value::from(record.description.clone()));
    flat.insert("project_id".into(), Value::from(record.project_id.clone()));
    flat.insert("shared".into(), Value::Bool(record.shared));
    flat.insert("negated".into(), Value::Bool(record.negated));
    flat.insert(
        "created_at".into(),
        serde_json::to_value(record.created_at).unwrap_or(Value::Null),
    );
    flat.insert(
        "updated_at".into(),
        serde_json::to_value(record.updated_at).unwrap_or(Value::Null),
    );
    for (field, value) in &record.definition {
        flat.insert(field.clone(), value.clone());
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccf_schema::registry::FieldValidator;
    use ccf_schema::validators::DSCP_VALID_MARKS;
    use proptest::prelude::*;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new()
    }

    #[test]
    fn test_break_out_headers_flattens_definition() {
        let payload = json!({
            "classification": {
                "id": "6f3bb6f4-6e35-4a5b-9b3e-9a3f5ce0a1de",
                "name": "test_ethernet_classification",
                "description": "Test Ethernet Classification",
                "project_id": "p1",
                "shared": true,
                "negated": true,
                "c_type": "ethernet",
                "definition": {
                    "src_addr": "00:07:E9:63:CE:53",
                    "dst_addr": "00:07:E9:42:AC:28",
                    "ethertype": 0x8100,
                }
            }
        });

        let flat = break_out_headers(&registry(), &payload).unwrap();
        assert!(flat.get("id").is_none());
        assert_eq!(flat["name"], json!("test_ethernet_classification"));
        assert_eq!(flat["src_addr"], json!("00:07:E9:63:CE:53"));
        assert_eq!(flat["ethertype"], json!(0x8100));
        assert!(flat.get("definition").is_none());
    }

    #[test]
    fn test_merge_header_defaults_absent_fields_to_null() {
        let mut flat = Map::new();
        flat.insert("name".into(), json!("eth"));
        flat.insert("description".into(), json!(""));
        flat.insert("project_id".into(), json!("p1"));
        flat.insert("shared".into(), json!(false));
        flat.insert("negated".into(), json!(false));
        flat.insert("c_type".into(), json!("ethernet"));
        flat.insert("ethertype".into(), json!(0x0800));

        let payload = merge_header(&registry(), &flat).unwrap();
        assert_eq!(payload["definition"]["ethertype"], json!(0x0800));
        assert_eq!(payload["definition"]["src_addr"], Value::Null);
        assert_eq!(payload["definition"]["dst_addr"], Value::Null);
    }

    #[test]
    fn test_round_trip_ethernet_payload() {
        let payload = json!({
            "name": "eth",
            "description": "d",
            "project_id": "p1",
            "shared": true,
            "negated": false,
            "c_type": "ethernet",
            "definition": {
                "ethertype": 0x0800,
                "src_addr": "00:07:E9:63:CE:53",
                "dst_addr": "00:07:E9:42:AC:28",
            }
        });

        let reg = registry();
        let flat = break_out_headers(&reg, &payload).unwrap();
        assert_eq!(merge_header(&reg, &flat).unwrap(), payload);
    }

    fn field_value(validator: FieldValidator, seed: u64) -> Value {
        match validator {
            FieldValidator::DscpMark => {
                json!(DSCP_VALID_MARKS[(seed as usize) % DSCP_VALID_MARKS.len()])
            }
            FieldValidator::DscpMask => json!(seed % 64),
            FieldValidator::EcnMark | FieldValidator::EcnMask => json!(seed % 4),
            FieldValidator::Protocol | FieldValidator::Ttl => json!(seed % 256),
            FieldValidator::Flags | FieldValidator::FlagsMask => json!(seed % 256),
            FieldValidator::Ethertype
            | FieldValidator::Port
            | FieldValidator::Length
            | FieldValidator::Window => json!(seed % 65_536),
            FieldValidator::Ipv4Address => {
                json!(format!("10.{}.{}.{}", seed % 256, (seed / 256) % 256, (seed / 65_536) % 256))
            }
            FieldValidator::Ipv6Address => json!(format!("2001:db8::{:x}", seed % 0xFFFF)),
            FieldValidator::MacAddress => {
                json!(format!("00:07:e9:63:ce:{:02x}", seed % 256))
            }
        }
    }

    proptest! {
        #[test]
        fn round_trip_preserves_well_formed_payloads(
            type_index in 0usize..5,
            seeds in proptest::collection::vec(proptest::option::of(any::<u64>()), 12),
            shared in any::<bool>(),
            negated in any::<bool>(),
        ) {
            let reg = registry();
            let c_type = ccf_common::ClassificationType::ALL[type_index];
            let schema = reg.schema(c_type);

            let mut definition = Map::new();
            for (i, field) in schema.fields().iter().enumerate() {
                let value = match seeds.get(i).copied().flatten() {
                    Some(seed) => field_value(field.validator, seed),
                    None => Value::Null,
                };
                definition.insert(field.name.to_string(), value);
            }

            let payload = json!({
                "name": "generated",
                "description": "round trip",
                "project_id": "p1",
                "shared": shared,
                "negated": negated,
                "c_type": c_type.as_str(),
                "definition": definition,
            });

            let flat = break_out_headers(&reg, &payload).unwrap();
            prop_assert_eq!(merge_header(&reg, &flat).unwrap(), payload);
        }
    }
}
