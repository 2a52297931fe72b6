pub mod academic;
pub mod access;
pub mod dashboard;
pub mod finance;
pub mod report;
pub mod settings;
pub mod staff;

pub use academic::{EducationLevel, SchoolClass, Student};
pub use access::{Permission, Role};
pub use dashboard::{DashboardPayload, Insight};
pub use finance::{Invoice, Payment};
pub use report::{Report, ReportBody, ReportKind};
pub use settings::SchoolSettings;
pub use staff::{Employee, HrSummary, LeaveRequest, Teacher};

/// Deserializers that accept whatever PHP emits for a field (numbers as
/// strings, `"1"`/`"0"` flags, nulls) and never reject a document.
pub(crate) mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub(crate) fn number(value: &Value) -> f64 {
        let n = match value {
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::String(s) => s.trim().replace(',', "").parse::<f64>().unwrap_or(0.0),
            Value::Bool(true) => 1.0,
            _ => 0.0,
        };
        if n.is_finite() {
            n
        } else {
            0.0
        }
    }

    pub(crate) fn text(value: &Value) -> String {
        match value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => other.to_string(),
        }
    }

    pub(crate) fn flag(value: &Value) -> bool {
        match value {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
            Value::String(s) => matches!(
                s.trim().to_lowercase().as_str(),
                "1" | "true" | "yes" | "on" | "active"
            ),
            _ => false,
        }
    }

    pub fn f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(number(&Value::deserialize(d)?))
    }

    pub fn i64<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(match &value {
            Value::Number(n) => n.as_i64().unwrap_or_else(|| number(&value) as i64),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .unwrap_or_else(|_| number(&value) as i64),
            _ => number(&value) as i64,
        })
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(text(&Value::deserialize(d)?))
    }

    pub fn bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(flag(&Value::deserialize(d)?))
    }

    /// Accepts `["a", "b"]`, `[{"slug": "a"}]` or `"a,b"`.
    pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        let value = Value::deserialize(d)?;
        let out = match value {
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Object(obj) => ["slug", "name", "permission"]
                        .iter()
                        .find_map(|k| obj.get(*k))
                        .map(text)
                        .unwrap_or_default(),
                    other => text(other),
                })
                .collect(),
            Value::String(s) => s.split(',').map(|p| p.trim().to_string()).collect(),
            _ => Vec::new(),
        };
        Ok(out.into_iter().filter(|s: &String| !s.is_empty()).collect())
    }

    /// Decodes a nested section, substituting the default for `null` or a
    /// malformed shape.
    pub fn or_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = Value::deserialize(d)?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }
}
