use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient;

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct SchoolSettings {
    #[serde(default, deserialize_with = "lenient::string")]
    pub school_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub school_address: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub school_phone: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub school_email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub currency: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub academic_year: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub current_term: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub logo_url: String,
}

impl SchoolSettings {
    /// Decodes either an object or the `[{setting_key, setting_value}]` row
    /// list some installations return.
    pub fn from_value(value: &Value) -> Self {
        let normalized = match value {
            Value::Array(rows) => {
                let mut map = Map::new();
                for row in rows {
                    let key = row
                        .get("setting_key")
                        .or_else(|| row.get("key"))
                        .map(lenient::text)
                        .unwrap_or_default();
                    if key.is_empty() {
                        continue;
                    }
                    let value = row
                        .get("setting_value")
                        .or_else(|| row.get("value"))
                        .cloned()
                        .unwrap_or(Value::Null);
                    map.insert(key, value);
                }
                Value::Object(map)
            }
            other => other.clone(),
        };
        serde_json::from_value(normalized).unwrap_or_default()
    }

    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("School name", self.school_name.as_str()),
            ("Address", self.school_address.as_str()),
            ("Phone", self.school_phone.as_str()),
            ("Email", self.school_email.as_str()),
            ("Currency", self.currency.as_str()),
            ("Academic year", self.academic_year.as_str()),
            ("Current term", self.current_term.as_str()),
            ("Logo", self.logo_url.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_value_rows_are_folded() {
        let s = SchoolSettings::from_value(&json!([
            {"setting_key": "school_name", "setting_value": "Hillside"},
            {"setting_key": "currency", "setting_value": "KES"},
            {"setting_value": "orphan"}
        ]));
        assert_eq!(s.school_name, "Hillside");
        assert_eq!(s.currency, "KES");
    }

    #[test]
    fn object_shape_is_read_directly() {
        let s = SchoolSettings::from_value(&json!({"academic_year": 2024}));
        assert_eq!(s.academic_year, "2024");
        assert_eq!(SchoolSettings::from_value(&Value::Null), SchoolSettings::default());
    }
}
