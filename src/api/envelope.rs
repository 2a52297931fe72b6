use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ApiError;

fn is_false(value: &Value) -> bool {
    match value {
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "false" | "0" | "no"),
        _ => false,
    }
}

pub(crate) fn backend_message(root: &Value) -> Option<String> {
    ["message", "error", "msg"]
        .iter()
        .filter_map(|k| root.get(*k))
        .find_map(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        })
}

/// Parses a response body and rejects envelopes flagged `success: false`.
///
/// Envelopes without a `success` key are treated as successful; some scripts
/// return the bare payload.
pub fn decode(endpoint: &str, body: &str) -> Result<Value, ApiError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }
    let root: Value = serde_json::from_str(trimmed).map_err(|e| ApiError::Decode {
        endpoint: endpoint.to_string(),
        source: e,
    })?;
    if let Some(flag) = root.get("success") {
        if is_false(flag) {
            return Err(ApiError::Backend {
                endpoint: endpoint.to_string(),
                message: backend_message(&root).unwrap_or_else(|| "request failed".to_string()),
            });
        }
    }
    Ok(root)
}

/// Locates the payload inside an envelope.
///
/// Lookup order: top-level named keys, `data.<key>`, then `data`. A root
/// without `success`/`data` is itself the payload.
pub fn locate<'a>(root: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let present = |v: &&Value| !v.is_null();
    if let Some(v) = keys.iter().filter_map(|k| root.get(*k)).find(present) {
        return Some(v);
    }
    if let Some(data) = root.get("data").filter(present) {
        if let Some(v) = keys.iter().filter_map(|k| data.get(*k)).find(present) {
            return Some(v);
        }
        return Some(data);
    }
    let is_envelope = root.get("success").is_some() || root.get("data").is_some();
    if is_envelope || root.is_null() {
        None
    } else {
        Some(root)
    }
}

/// Like [`locate`], but falls back to the root for scripts that spread the
/// payload's sections beside `success`.
pub fn payload_or_root<'a>(root: &'a Value, keys: &[&str]) -> &'a Value {
    locate(root, keys).unwrap_or(root)
}

/// Decodes the payload under `keys`, falling back to `T::default()` when the
/// envelope carries none.
pub fn extract<T>(endpoint: &str, root: &Value, keys: &[&str]) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    match locate(root, keys) {
        Some(payload) => {
            serde_json::from_value(payload.clone()).map_err(|e| ApiError::Decode {
                endpoint: endpoint.to_string(),
                source: e,
            })
        }
        None => Ok(T::default()),
    }
}
