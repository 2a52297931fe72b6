use serde_json::Value;

use super::{Page, PageData, PageState};
use crate::api::{envelope, ApiClient, ApiRequest};
use crate::models::dashboard::{Activity, ChartPoint};
use crate::models::{DashboardPayload, Insight};
use crate::output::{render_card, Record};
use crate::stats;

const BAR_WIDTH: usize = 30;

impl PageData for DashboardPayload {
    fn is_empty(&self) -> bool {
        DashboardPayload::is_empty(self)
    }
}

impl Record for Insight {
    const COLUMNS: &'static [&'static str] = &[
        "Priority",
        "Type",
        "Category",
        "Title",
        "Message",
        "Action",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.priority.clone(),
            self.kind.clone(),
            self.category.clone(),
            self.title.clone(),
            self.message.clone(),
            self.action.clone(),
        ]
    }
}

impl Record for Activity {
    const COLUMNS: &'static [&'static str] = &["When", "Type", "User", "Description"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.created_at.clone(),
            self.kind.clone(),
            self.user.clone(),
            self.description.clone(),
        ]
    }
}

pub fn stat_cards(p: &DashboardPayload) -> Vec<(&'static str, String)> {
    let s = &p.stats;
    vec![
        ("Students", s.total_students.to_string()),
        (
            "Active students",
            format!(
                "{} ({})",
                s.active_students,
                stats::format_percent(stats::percentage(
                    s.active_students as f64,
                    s.total_students as f64
                ))
            ),
        ),
        ("Teachers", s.total_teachers.to_string()),
        ("Classes", s.total_classes.to_string()),
        ("Employees", s.total_employees.to_string()),
        ("New admissions", s.new_admissions.to_string()),
        ("Attendance", stats::format_percent(s.attendance_rate)),
    ]
}

pub fn financial_card(p: &DashboardPayload) -> Vec<(&'static str, String)> {
    let f = &p.financial;
    vec![
        ("Invoiced", stats::format_amount(f.total_invoiced)),
        ("Collected", stats::format_amount(f.total_collected)),
        ("Outstanding", stats::format_amount(f.outstanding)),
        (
            "Collection rate",
            stats::format_percent(stats::collection_rate(f.total_collected, f.total_invoiced)),
        ),
        ("This month", stats::format_amount(f.current_month_revenue)),
        (
            "Growth",
            stats::format_percent(stats::growth(
                f.current_month_revenue,
                f.previous_month_revenue,
            )),
        ),
    ]
}

pub fn academic_card(p: &DashboardPayload) -> Vec<(&'static str, String)> {
    let a = &p.academic;
    vec![
        ("Levels", a.total_levels.to_string()),
        ("Classes", a.total_classes.to_string()),
        ("Average class size", format!("{:.1}", a.average_class_size)),
        ("Pass rate", stats::format_percent(a.pass_rate)),
    ]
}

/// One proportional bar per point, scaled to the largest value.
pub fn render_series(title: &str, points: &[ChartPoint]) -> String {
    let mut out = format!("{title}\n");
    if points.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }
    let max = points.iter().map(|p| p.value).fold(0.0, f64::max);
    let label_width = points.iter().map(|p| p.label.chars().count()).max().unwrap_or(0);
    for p in points {
        out.push_str(&format!(
            "  {:<label_width$} {:<BAR_WIDTH$} {}\n",
            p.label,
            stats::bar(p.value, max, BAR_WIDTH),
            p.value
        ));
    }
    out
}

pub fn render(p: &DashboardPayload) -> String {
    let mut sections = vec![
        render_card("Overview", &stat_cards(p)),
        render_card("Finance", &financial_card(p)),
        render_card("Academics", &academic_card(p)),
        render_card("Staff", &super::hr::summary_card(&p.hr)),
        render_series("Enrollment trend", &p.charts.enrollment_trend),
        render_series("Revenue trend", &p.charts.revenue_trend),
        render_series("Gender distribution", &p.charts.gender_distribution),
    ];

    let mut insights = String::from("Insights\n");
    let sorted = p.sorted_insights();
    if sorted.is_empty() {
        insights.push_str("  No insights right now.\n");
    }
    for i in sorted {
        let priority = if i.priority.is_empty() { "info" } else { i.priority.as_str() };
        insights.push_str(&format!("  [{priority}] {}: {}\n", i.title, i.message));
        if !i.action.is_empty() {
            insights.push_str(&format!("      -> {}\n", i.action));
        }
    }
    sections.push(insights);

    let mut activity = String::from("Recent activity\n");
    if p.activities.is_empty() {
        activity.push_str("  No recent activity.\n");
    }
    for a in &p.activities {
        activity.push_str(&format!("  {} {}\n", a.created_at, a.description));
    }
    sections.push(activity);

    sections.join("\n")
}

pub struct DashboardPage {
    client: ApiClient,
    pub dashboard: Page<DashboardPayload>,
}

impl DashboardPage {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            dashboard: Page::new("dashboard"),
        }
    }

    pub async fn refresh(&self) -> PageState<DashboardPayload> {
        let client = self.client.clone();
        self.dashboard
            .load(async move {
                let root: Value = client.send(ApiRequest::get("dashboard.php")).await?;
                let payload = envelope::payload_or_root(&root, &["dashboard"]);
                Ok(serde_json::from_value(payload.clone()).unwrap_or_default())
            })
            .await
    }
}
