use serde::{Deserialize, Serialize};

use super::lenient;

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct EducationLevel {
    #[serde(default, deserialize_with = "lenient::i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string", alias = "level_name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string", alias = "level_code")]
    pub code: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::i64", alias = "sort_order")]
    pub display_order: i64,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub is_active: bool,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct SchoolClass {
    #[serde(default, deserialize_with = "lenient::i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string", alias = "class_name")]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient::string",
        alias = "level_name",
        alias = "education_level"
    )]
    pub level: String,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub capacity: i64,
    #[serde(
        default,
        deserialize_with = "lenient::i64",
        alias = "students_count",
        alias = "enrolled"
    )]
    pub student_count: i64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Student {
    #[serde(default, deserialize_with = "lenient::i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string", alias = "admission_number")]
    pub admission_no: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub class_id: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub class_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub gender: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub address: String,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }
}

impl SchoolClass {
    /// Seats left, never negative.
    pub fn available_seats(&self) -> i64 {
        (self.capacity - self.student_count).max(0)
    }
}
