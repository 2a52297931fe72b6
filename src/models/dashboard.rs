use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient;
use super::staff::HrSummary;

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct DashboardPayload {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub stats: DashboardStats,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub financial: FinancialSummary,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub academic: AcademicSummary,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub hr: HrSummary,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub charts: Charts,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub activities: Vec<Activity>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub insights: Vec<Insight>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct DashboardStats {
    #[serde(default, deserialize_with = "lenient::i64")]
    pub total_students: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub active_students: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub total_teachers: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub total_classes: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub total_employees: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub new_admissions: i64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub attendance_rate: f64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct FinancialSummary {
    #[serde(default, deserialize_with = "lenient::f64")]
    pub total_invoiced: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub total_collected: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub outstanding: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub current_month_revenue: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub previous_month_revenue: f64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct AcademicSummary {
    #[serde(default, deserialize_with = "lenient::i64")]
    pub total_levels: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub total_classes: i64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub average_class_size: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub pass_rate: f64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Charts {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub enrollment_trend: Vec<ChartPoint>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub revenue_trend: Vec<ChartPoint>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub gender_distribution: Vec<ChartPoint>,
}

/// One labelled value of a chart series. The backend names the two halves
/// differently per series (`month`/`total`, `gender`/`count`, ...).
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(from = "Value")]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

impl From<Value> for ChartPoint {
    fn from(value: Value) -> Self {
        let first = |keys: &[&str]| keys.iter().find_map(|k| value.get(*k)).cloned();
        Self {
            label: first(&["label", "month", "name", "gender", "date", "period"])
                .map(|v| lenient::text(&v))
                .unwrap_or_default(),
            value: first(&["value", "total", "count", "amount"])
                .map(|v| lenient::number(&v))
                .unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Activity {
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub user: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created_at: String,
}

/// Server-generated advisory shown as an alert card.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Insight {
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub message: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub priority: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub action: String,
}

impl Insight {
    /// Lower sorts first; unknown priorities go last.
    pub fn priority_rank(&self) -> u8 {
        match self.priority.trim().to_ascii_lowercase().as_str() {
            "critical" | "urgent" => 0,
            "high" => 1,
            "medium" | "normal" => 2,
            "low" => 3,
            _ => 4,
        }
    }
}

impl DashboardPayload {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn sorted_insights(&self) -> Vec<&Insight> {
        let mut out: Vec<&Insight> = self.insights.iter().collect();
        out.sort_by_key(|i| i.priority_rank());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sections_fall_back_independently() {
        let p: DashboardPayload = serde_json::from_value(json!({
            "stats": {"total_students": "120"},
            "financial": "unavailable",
            "hr": null,
            "insights": [{"type": "warning", "title": "Fees", "priority": "low"}]
        }))
        .unwrap();
        assert_eq!(p.stats.total_students, 120);
        assert_eq!(p.financial, FinancialSummary::default());
        assert_eq!(p.hr, HrSummary::default());
        assert_eq!(p.insights[0].kind, "warning");
        assert!(p.activities.is_empty());
    }

    #[test]
    fn chart_points_take_series_specific_keys() {
        let charts: Charts = serde_json::from_value(json!({
            "revenue_trend": [{"month": "Jan", "total": "300.5"}],
            "gender_distribution": [{"gender": "female", "count": 7}]
        }))
        .unwrap();
        assert_eq!(charts.revenue_trend[0].label, "Jan");
        assert_eq!(charts.revenue_trend[0].value, 300.5);
        assert_eq!(charts.gender_distribution[0].value, 7.0);
    }

    #[test]
    fn insights_sort_by_priority() {
        let p = DashboardPayload {
            insights: vec![
                Insight {
                    title: "a".into(),
                    priority: "low".into(),
                    ..Default::default()
                },
                Insight {
                    title: "b".into(),
                    priority: "High".into(),
                    ..Default::default()
                },
                Insight {
                    title: "c".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let titles: Vec<&str> = p.sorted_insights().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a", "c"]);
    }
}
