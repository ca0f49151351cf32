//! Deterministic fingerprint of a mutation's logical identity.
//!
//! The triple (type, action, payload) is rendered as canonical JSON (object
//! keys sorted at every depth, arrays in order, no whitespace) and hashed with
//! blake3. Owner and enqueue time are excluded, so the same logical write
//! collapses to one queue record.

use serde_json::Value;

use super::MutationAction;

/// Compute the dedup signature for a mutation.
pub fn compute_signature(mutation_type: &str, action: MutationAction, payload: &Value) -> String {
    let identity = serde_json::json!({
        "type": mutation_type,
        "action": action.as_str(),
        "payload": payload,
    });
    let canonical = canonical_json(&identity);
    blake3::hash(canonical.as_bytes()).to_hex().to_string()
}

/// Render a JSON value with sorted object keys, independent of insertion order.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(&mut out, value);
    out
}

fn write_canonical(out: &mut String, value: &Value) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // Display on a JSON string yields the escaped, quoted form.
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(out, item);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(out, item);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
