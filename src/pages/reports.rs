use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, warn};

use super::{Page, PageData, PageState};
use crate::api::{envelope, ApiClient, ApiError, ApiRequest};
use crate::models::report::{
    AttendanceRow, ClassPerformanceRow, DailyRevenue, EnrollmentRow,
};
use crate::models::{Report, ReportBody, ReportKind};
use crate::output::{self, render_card, Record};
use crate::stats;
use crate::utils::DateRange;

pub const NO_DATA: &str = "No data available for this report.";

impl PageData for Report {
    /// A report always has a header to show; empty bodies render their
    /// own placeholder.
    fn is_empty(&self) -> bool {
        false
    }
}

impl Record for ClassPerformanceRow {
    const COLUMNS: &'static [&'static str] = &[
        "Class",
        "Students",
        "Average",
        "Pass rate",
        "Top student",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.class_name.clone(),
            self.student_count.to_string(),
            format!("{:.1}", self.average_score),
            stats::format_percent(self.pass_rate),
            self.top_student.clone(),
        ]
    }
}

impl Record for DailyRevenue {
    const COLUMNS: &'static [&'static str] = &["Date", "Payments", "Amount"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.count.to_string(),
            stats::format_amount(self.amount),
        ]
    }
}

impl Record for EnrollmentRow {
    const COLUMNS: &'static [&'static str] =
        &["Class", "Level", "Enrolled", "Capacity", "Utilisation", "Male", "Female"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.class_name.clone(),
            self.level.clone(),
            self.enrolled.to_string(),
            self.capacity.to_string(),
            stats::format_percent(stats::percentage(self.enrolled as f64, self.capacity as f64)),
            self.male.to_string(),
            self.female.to_string(),
        ]
    }
}

impl Record for AttendanceRow {
    const COLUMNS: &'static [&'static str] = &["Class", "Present", "Absent", "Late", "Rate"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.class_name.clone(),
            self.present.to_string(),
            self.absent.to_string(),
            self.late.to_string(),
            stats::format_percent(self.attendance_rate()),
        ]
    }
}

impl AttendanceRow {
    pub fn attendance_rate(&self) -> f64 {
        let total = self.present + self.absent + self.late;
        stats::percentage((self.present + self.late) as f64, total as f64)
    }
}

fn table<R: Record>(rows: &[R]) -> String {
    let refs: Vec<&R> = rows.iter().collect();
    String::from_utf8_lossy(&output::render_table(&refs, NO_DATA)).into_owned()
}

fn body_sections(body: &ReportBody) -> Vec<String> {
    match body {
        ReportBody::ClassPerformance { classes, summary } => vec![
            render_card(
                "Summary",
                &[
                    ("Students", summary.total_students.to_string()),
                    ("Average score", format!("{:.1}", summary.average_score)),
                    ("Pass rate", stats::format_percent(summary.pass_rate)),
                ],
            ),
            table(classes),
        ],
        ReportBody::Revenue {
            totals,
            payments,
            daily_breakdown,
        } => vec![
            render_card(
                "Totals",
                &[
                    ("Revenue", stats::format_amount(totals.total_revenue)),
                    ("Payments", totals.total_payments.to_string()),
                    ("Average payment", stats::format_amount(totals.average_payment)),
                ],
            ),
            format!("Daily breakdown\n{}", table(daily_breakdown)),
            format!("Payments\n{}", table(payments)),
        ],
        ReportBody::FeeCollection { totals, invoices } => vec![
            render_card(
                "Totals",
                &[
                    ("Invoiced", stats::format_amount(totals.total_invoiced)),
                    ("Collected", stats::format_amount(totals.total_collected)),
                    ("Outstanding", stats::format_amount(totals.outstanding)),
                    (
                        "Collection rate",
                        stats::format_percent(stats::collection_rate(
                            totals.total_collected,
                            totals.total_invoiced,
                        )),
                    ),
                ],
            ),
            table(invoices),
        ],
        ReportBody::Enrollment { classes, summary } => vec![
            render_card(
                "Summary",
                &[
                    ("Students", summary.total_students.to_string()),
                    ("Capacity", summary.total_capacity.to_string()),
                    (
                        "Utilisation",
                        stats::format_percent(stats::percentage(
                            summary.total_students as f64,
                            summary.total_capacity as f64,
                        )),
                    ),
                    ("New admissions", summary.new_admissions.to_string()),
                ],
            ),
            table(classes),
        ],
        ReportBody::Attendance { classes, summary } => {
            let marked = summary.total_present + summary.total_absent + summary.total_late;
            vec![
                render_card(
                    "Summary",
                    &[
                        ("School days", summary.school_days.to_string()),
                        ("Present", summary.total_present.to_string()),
                        ("Absent", summary.total_absent.to_string()),
                        (
                            "Attendance rate",
                            stats::format_percent(stats::percentage(
                                (summary.total_present + summary.total_late) as f64,
                                marked as f64,
                            )),
                        ),
                    ],
                ),
                table(classes),
            ]
        }
    }
}

/// Plain-text printable rendering of a report.
pub fn render(report: &Report) -> String {
    let mut out = format!("{}\n{}\n", report.title, "=".repeat(report.title.chars().count()));
    if !report.generated_at.is_empty() {
        out.push_str(&format!("Generated: {}\n", report.generated_at));
    }
    let period = report.period.describe();
    if !period.is_empty() {
        out.push_str(&format!("Period: {period}\n"));
    }
    out.push('\n');
    if report.body.is_empty() {
        out.push_str(NO_DATA);
        out.push('\n');
        return out;
    }
    out.push_str(&body_sections(&report.body).join("\n"));
    out
}

pub fn report_request(kind: ReportKind, range: Option<&DateRange>) -> ApiRequest {
    let mut request = ApiRequest::get("reports.php").query("type", kind.as_str());
    if let Some(range) = range {
        for (k, v) in range.query_pairs() {
            request = request.query(k, v);
        }
    }
    request
}

pub async fn fetch_report(
    client: &ApiClient,
    kind: ReportKind,
    range: Option<&DateRange>,
) -> Result<Report, ApiError> {
    let root: Value = client.send(report_request(kind, range)).await?;
    let payload = envelope::payload_or_root(&root, &["report"]);
    Ok(Report::from_value(kind, payload))
}

/// Every report type for one period, fetched concurrently. A failed type
/// is returned as its error without affecting the others.
pub async fn fetch_all(
    client: &ApiClient,
    range: Option<&DateRange>,
) -> Vec<(ReportKind, Result<Report, ApiError>)> {
    let results = join_all(
        ReportKind::ALL
            .iter()
            .map(|kind| fetch_report(client, *kind, range)),
    )
    .await;
    ReportKind::ALL.into_iter().zip(results).collect()
}

pub struct ReportsPage {
    client: ApiClient,
    pub report: Page<Report>,
}

impl ReportsPage {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            report: Page::new("reports"),
        }
    }

    /// Loads one report. Switching type or range while a load is in flight
    /// aborts the older request.
    pub async fn load(&self, kind: ReportKind, range: Option<DateRange>) -> PageState<Report> {
        let client = self.client.clone();
        let handle = self
            .report
            .spawn_load(async move { fetch_report(&client, kind, range.as_ref()).await });
        if let Err(e) = handle.await {
            if e.is_cancelled() {
                debug!(report = kind.as_str(), "superseded report load aborted");
            } else {
                warn!(report = kind.as_str(), error = %e, "report load task failed");
            }
        }
        self.report.state().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_kind_renders_its_empty_branch() {
        for kind in ReportKind::ALL {
            let out = render(&Report::from_value(kind, &json!({"success": true})));
            assert!(out.starts_with(kind.title()));
            assert!(out.contains(NO_DATA));
        }
    }

    #[test]
    fn partial_report_keeps_empty_tables() {
        let report = Report::from_value(
            ReportKind::FeeCollection,
            &json!({"totals": {"total_invoiced": 0, "total_collected": 0, "outstanding": 10}}),
        );
        let out = render(&report);
        assert!(out.contains("Collection rate : 0%"));
        assert!(out.contains(NO_DATA));
    }

    #[test]
    fn request_carries_type_and_range() {
        let range = DateRange::parse("2024-01-01", "2024-03-31").unwrap();
        let req = report_request(ReportKind::AttendanceReport, Some(&range));
        assert_eq!(req.query_value("type"), Some("attendance_report"));
        assert_eq!(req.query_value("start_date"), Some("2024-01-01"));
        assert_eq!(req.query_value("end_date"), Some("2024-03-31"));
    }

    #[test]
    fn attendance_rate_counts_late_as_present() {
        let row = AttendanceRow {
            present: 7,
            late: 1,
            absent: 2,
            ..Default::default()
        };
        assert_eq!(row.attendance_rate(), 80.0);
        assert_eq!(AttendanceRow::default().attendance_rate(), 0.0);
    }
}
