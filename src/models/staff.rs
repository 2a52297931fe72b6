use serde::{Deserialize, Serialize};

use super::lenient;

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Teacher {
    #[serde(default, deserialize_with = "lenient::i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::string", alias = "specialization")]
    pub subject: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub qualification: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Employee {
    #[serde(default, deserialize_with = "lenient::i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub department: String,
    #[serde(default, deserialize_with = "lenient::string", alias = "job_title")]
    pub position: String,
    #[serde(default, deserialize_with = "lenient::f64", alias = "basic_salary")]
    pub salary: f64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct LeaveRequest {
    #[serde(default, deserialize_with = "lenient::i64", alias = "leave_id")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub employee_id: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub employee_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub leave_type: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub start_date: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub end_date: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub reason: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct HrSummary {
    #[serde(default, deserialize_with = "lenient::i64")]
    pub total_employees: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub active_employees: i64,
    #[serde(default, deserialize_with = "lenient::i64", alias = "employees_on_leave")]
    pub on_leave: i64,
    #[serde(default, deserialize_with = "lenient::i64", alias = "pending_leave_requests")]
    pub pending_leaves: i64,
    #[serde(default, deserialize_with = "lenient::f64", alias = "total_payroll")]
    pub monthly_payroll: f64,
}

fn join_name(first: &str, last: &str) -> String {
    format!("{} {}", first.trim(), last.trim()).trim().to_string()
}

impl Teacher {
    pub fn full_name(&self) -> String {
        join_name(&self.first_name, &self.last_name)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_empty() || self.status.eq_ignore_ascii_case("active")
    }
}

impl Employee {
    pub fn full_name(&self) -> String {
        join_name(&self.first_name, &self.last_name)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_empty() || self.status.eq_ignore_ascii_case("active")
    }
}

impl LeaveRequest {
    pub fn is_pending(&self) -> bool {
        self.status.is_empty() || self.status.eq_ignore_ascii_case("pending")
    }
}
