use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::finance::{Invoice, Payment};
use super::lenient;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    ClassPerformance,
    RevenueReport,
    FeeCollection,
    EnrollmentReport,
    AttendanceReport,
}

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        ReportKind::ClassPerformance,
        ReportKind::RevenueReport,
        ReportKind::FeeCollection,
        ReportKind::EnrollmentReport,
        ReportKind::AttendanceReport,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::ClassPerformance => "class_performance",
            ReportKind::RevenueReport => "revenue_report",
            ReportKind::FeeCollection => "fee_collection",
            ReportKind::EnrollmentReport => "enrollment_report",
            ReportKind::AttendanceReport => "attendance_report",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|k| {
            k.as_str() == key || k.as_str().trim_end_matches("_report") == key
        })
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::ClassPerformance => "Class Performance Report",
            ReportKind::RevenueReport => "Revenue Report",
            ReportKind::FeeCollection => "Fee Collection Report",
            ReportKind::EnrollmentReport => "Enrollment Report",
            ReportKind::AttendanceReport => "Attendance Report",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reporting window. The backend sends either a label string or an object
/// with `start_date`/`end_date`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(from = "Value")]
pub struct ReportPeriod {
    pub start_date: String,
    pub end_date: String,
    pub label: String,
}

impl From<Value> for ReportPeriod {
    fn from(value: Value) -> Self {
        match &value {
            Value::Object(obj) => Self {
                start_date: obj.get("start_date").map(lenient::text).unwrap_or_default(),
                end_date: obj.get("end_date").map(lenient::text).unwrap_or_default(),
                label: obj.get("label").map(lenient::text).unwrap_or_default(),
            },
            Value::Null => Self::default(),
            other => Self {
                label: lenient::text(other),
                ..Self::default()
            },
        }
    }
}

impl ReportPeriod {
    pub fn describe(&self) -> String {
        match (self.start_date.is_empty(), self.end_date.is_empty()) {
            (false, false) => format!("{} to {}", self.start_date, self.end_date),
            (false, true) => format!("from {}", self.start_date),
            (true, false) => format!("until {}", self.end_date),
            (true, true) => self.label.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ClassPerformanceRow {
    #[serde(default, deserialize_with = "lenient::string", alias = "name")]
    pub class_name: String,
    #[serde(default, deserialize_with = "lenient::i64", alias = "total_students")]
    pub student_count: i64,
    #[serde(default, deserialize_with = "lenient::f64", alias = "avg_score")]
    pub average_score: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub pass_rate: f64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub top_student: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct PerformanceSummary {
    #[serde(default, deserialize_with = "lenient::i64")]
    pub total_students: i64,
    #[serde(default, deserialize_with = "lenient::f64", alias = "overall_average")]
    pub average_score: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub pass_rate: f64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct RevenueTotals {
    #[serde(default, deserialize_with = "lenient::f64", alias = "total_amount")]
    pub total_revenue: f64,
    #[serde(default, deserialize_with = "lenient::i64", alias = "payment_count")]
    pub total_payments: i64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub average_payment: f64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct DailyRevenue {
    #[serde(default, deserialize_with = "lenient::string", alias = "day")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient::f64", alias = "total")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub count: i64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct FeeTotals {
    #[serde(default, deserialize_with = "lenient::f64")]
    pub total_invoiced: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub total_collected: f64,
    #[serde(default, deserialize_with = "lenient::f64", alias = "total_outstanding")]
    pub outstanding: f64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct EnrollmentRow {
    #[serde(default, deserialize_with = "lenient::string", alias = "name")]
    pub class_name: String,
    #[serde(default, deserialize_with = "lenient::string", alias = "level_name")]
    pub level: String,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub capacity: i64,
    #[serde(default, deserialize_with = "lenient::i64", alias = "student_count")]
    pub enrolled: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub male: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub female: i64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct EnrollmentSummary {
    #[serde(default, deserialize_with = "lenient::i64")]
    pub total_students: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub total_capacity: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub new_admissions: i64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct AttendanceRow {
    #[serde(default, deserialize_with = "lenient::string", alias = "name")]
    pub class_name: String,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub present: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub absent: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub late: i64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct AttendanceSummary {
    #[serde(default, deserialize_with = "lenient::i64")]
    pub total_present: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub total_absent: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub total_late: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub school_days: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReportBody {
    ClassPerformance {
        classes: Vec<ClassPerformanceRow>,
        summary: PerformanceSummary,
    },
    Revenue {
        totals: RevenueTotals,
        payments: Vec<Payment>,
        daily_breakdown: Vec<DailyRevenue>,
    },
    FeeCollection {
        totals: FeeTotals,
        invoices: Vec<Invoice>,
    },
    Enrollment {
        classes: Vec<EnrollmentRow>,
        summary: EnrollmentSummary,
    },
    Attendance {
        classes: Vec<AttendanceRow>,
        summary: AttendanceSummary,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub kind: ReportKind,
    pub title: String,
    pub generated_at: String,
    pub period: ReportPeriod,
    pub body: ReportBody,
}

fn section<T: DeserializeOwned + Default>(root: &Value, key: &str) -> T {
    root.get(key)
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

impl Report {
    /// Builds the typed report for `kind` from a decoded payload. Missing
    /// or malformed sections become empty; this never fails.
    pub fn from_value(kind: ReportKind, root: &Value) -> Self {
        let body = match kind {
            ReportKind::ClassPerformance => ReportBody::ClassPerformance {
                classes: section(root, "classes"),
                summary: section(root, "summary"),
            },
            ReportKind::RevenueReport => ReportBody::Revenue {
                totals: section(root, "totals"),
                payments: section(root, "payments"),
                daily_breakdown: section(root, "daily_breakdown"),
            },
            ReportKind::FeeCollection => ReportBody::FeeCollection {
                totals: section(root, "totals"),
                invoices: section(root, "invoices"),
            },
            ReportKind::EnrollmentReport => ReportBody::Enrollment {
                classes: section(root, "classes"),
                summary: section(root, "summary"),
            },
            ReportKind::AttendanceReport => ReportBody::Attendance {
                classes: section(root, "classes"),
                summary: section(root, "summary"),
            },
        };
        let title = root
            .get("report_title")
            .map(lenient::text)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| kind.title().to_string());
        Self {
            kind,
            title,
            generated_at: root.get("generated_at").map(lenient::text).unwrap_or_default(),
            period: section(root, "period"),
            body,
        }
    }
}

impl ReportBody {
    /// True when the body has no rows and all totals are zero.
    pub fn is_empty(&self) -> bool {
        match self {
            ReportBody::ClassPerformance { classes, summary } => {
                classes.is_empty() && *summary == PerformanceSummary::default()
            }
            ReportBody::Revenue {
                totals,
                payments,
                daily_breakdown,
            } => {
                payments.is_empty()
                    && daily_breakdown.is_empty()
                    && *totals == RevenueTotals::default()
            }
            ReportBody::FeeCollection { totals, invoices } => {
                invoices.is_empty() && *totals == FeeTotals::default()
            }
            ReportBody::Enrollment { classes, summary } => {
                classes.is_empty() && *summary == EnrollmentSummary::default()
            }
            ReportBody::Attendance { classes, summary } => {
                classes.is_empty() && *summary == AttendanceSummary::default()
            }
        }
    }
}
