use serde::{Deserialize, Serialize};

use super::lenient;

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Role {
    #[serde(default, deserialize_with = "lenient::i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string", alias = "role_name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub permissions: Vec<String>,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub is_active: bool,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Permission {
    #[serde(default, deserialize_with = "lenient::i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string", alias = "permission_key")]
    pub slug: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::string", alias = "category")]
    pub module: String,
}

impl Role {
    pub fn has_permission(&self, slug: &str) -> bool {
        self.permissions.iter().any(|p| p == slug)
    }
}
