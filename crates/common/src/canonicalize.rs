use serde_json::Value;

/// Deterministic byte encoding of a JSON value: object keys are sorted and
/// every string is length-prefixed, so two documents that differ only in
/// key order encode identically.
pub fn canonical_bytes(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    encode_value(&mut out, value);
    out
}

pub fn canonical_sequence(values: &[Value]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(values.len() as u32).to_le_bytes());
    for v in values {
        encode_value(&mut out, v);
    }
    out
}

fn write_str(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(&(s.len() as u32).to_le_bytes());
    out.extend_from_slice(s.as_bytes());
}

fn encode_value(out: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Null => out.push(0x00),
        Value::Bool(b) => {
            out.push(0x01);
            out.push(u8::from(*b));
        }
        Value::Number(n) => {
            out.push(0x02);
            write_str(out, &n.to_string());
        }
        Value::String(s) => {
            out.push(0x03);
            write_str(out, s);
        }
        Value::Array(items) => {
            out.push(0x04);
            out.extend_from_slice(&(items.len() as u32).to_le_bytes());
            for item in items {
                encode_value(out, item);
            }
        }
        Value::Object(map) => {
            out.push(0x05);
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by_key(|(k, _)| k.as_str());
            out.extend_from_slice(&(entries.len() as u32).to_le_bytes());
            for (k, v) in entries {
                write_str(out, k);
                encode_value(out, v);
            }
        }
    }
}
