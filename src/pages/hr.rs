use serde_json::{json, Value};
use tracing::info;

use super::teachers::flipped_status;
use super::{MutationError, Page, PageData, PageState, Resource, ResourcePage};
use crate::api::{ApiClient, ApiRequest};
use crate::forms::EmployeeForm;
use crate::models::{Employee, HrSummary, LeaveRequest};
use crate::output::Record;
use crate::stats;

const HR_ENDPOINT: &str = "hr_management.php";

impl Resource for Employee {
    type Form = EmployeeForm;

    const ENDPOINT: &'static str = HR_ENDPOINT;
    const LIST_KEYS: &'static [&'static str] = &["employees"];
    const ACTION: Option<&'static str> = Some("employees");
    const NOUN: &'static str = "employee";

    fn id(&self) -> i64 {
        self.id
    }

    fn status_toggle(&self) -> Value {
        json!({ "status": flipped_status(self.is_active()) })
    }

    fn sort(rows: &mut [Self]) {
        rows.sort_by_cached_key(|e| (e.department.to_lowercase(), e.full_name().to_lowercase()));
    }
}

impl Record for Employee {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Name", "Email", "Department", "Position", "Salary", "Status"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.full_name(),
            self.email.clone(),
            self.department.clone(),
            self.position.clone(),
            stats::format_amount(self.salary),
            self.status.clone(),
        ]
    }
}

impl Record for LeaveRequest {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Employee", "Type", "From", "To", "Status", "Reason"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.employee_name.clone(),
            self.leave_type.clone(),
            self.start_date.clone(),
            self.end_date.clone(),
            if self.status.is_empty() {
                "pending".to_string()
            } else {
                self.status.clone()
            },
            self.reason.clone(),
        ]
    }
}

impl PageData for HrSummary {
    fn is_empty(&self) -> bool {
        *self == HrSummary::default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeaveDecision {
    Approve,
    Reject,
}

impl LeaveDecision {
    pub fn status(self) -> &'static str {
        match self {
            LeaveDecision::Approve => "approved",
            LeaveDecision::Reject => "rejected",
        }
    }
}

pub fn filter_leaves<'a>(
    leaves: &'a [LeaveRequest],
    status: Option<&str>,
) -> Vec<&'a LeaveRequest> {
    match status.map(str::trim).filter(|s| !s.is_empty()) {
        None => leaves.iter().collect(),
        Some(want) if want.eq_ignore_ascii_case("pending") => {
            leaves.iter().filter(|l| l.is_pending()).collect()
        }
        Some(want) => leaves
            .iter()
            .filter(|l| l.status.eq_ignore_ascii_case(want))
            .collect(),
    }
}

pub fn on_leave_percent(summary: &HrSummary) -> f64 {
    stats::percentage(summary.on_leave as f64, summary.total_employees as f64)
}

pub fn summary_card(summary: &HrSummary) -> Vec<(&'static str, String)> {
    vec![
        ("Employees", summary.total_employees.to_string()),
        ("Active", summary.active_employees.to_string()),
        (
            "On leave",
            format!(
                "{} ({})",
                summary.on_leave,
                stats::format_percent(on_leave_percent(summary))
            ),
        ),
        ("Pending leave", summary.pending_leaves.to_string()),
        ("Monthly payroll", stats::format_amount(summary.monthly_payroll)),
    ]
}

pub struct HrPage {
    pub employees: ResourcePage<Employee>,
    pub leaves: Page<Vec<LeaveRequest>>,
    pub summary: Page<HrSummary>,
}

impl HrPage {
    pub fn new(client: ApiClient) -> Self {
        Self {
            employees: ResourcePage::new(client),
            leaves: Page::new("leaves"),
            summary: Page::new("hr summary"),
        }
    }

    fn client(&self) -> ApiClient {
        self.employees.client().clone()
    }

    pub async fn refresh_leaves(&self) -> PageState<Vec<LeaveRequest>> {
        let client = self.client();
        self.leaves
            .load(async move {
                client
                    .fetch(
                        ApiRequest::get(HR_ENDPOINT).action(Some("leaves")),
                        &["leaves", "leave_requests"],
                    )
                    .await
            })
            .await
    }

    pub async fn refresh_summary(&self) -> PageState<HrSummary> {
        let client = self.client();
        self.summary
            .load(async move {
                client
                    .fetch(
                        ApiRequest::get(HR_ENDPOINT).action(Some("dashboard")),
                        &["summary", "dashboard", "stats"],
                    )
                    .await
            })
            .await
    }

    pub async fn refresh(&self) {
        tokio::join!(
            self.employees.refresh(),
            self.refresh_leaves(),
            self.refresh_summary()
        );
    }

    /// One POST with `{leave_id, status}`, then one refetch each of the
    /// leave list and the summary.
    pub async fn decide_leave(
        &self,
        leave_id: i64,
        decision: LeaveDecision,
    ) -> Result<Value, MutationError> {
        let request = ApiRequest::post(
            HR_ENDPOINT,
            json!({ "leave_id": leave_id, "status": decision.status() }),
        )
        .action(Some("update_leave_status"));
        let resp = self.client().send(request).await?;
        info!(leave_id, status = decision.status(), "leave request decided");
        tokio::join!(self.refresh_leaves(), self.refresh_summary());
        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leave(id: i64, status: &str) -> LeaveRequest {
        LeaveRequest {
            id,
            status: status.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn pending_filter_includes_blank_status() {
        let rows = vec![leave(1, ""), leave(2, "approved"), leave(3, "Pending")];
        let ids: Vec<i64> = filter_leaves(&rows, Some("pending")).iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(filter_leaves(&rows, Some("APPROVED")).len(), 1);
        assert_eq!(filter_leaves(&rows, None).len(), 3);
    }

    #[test]
    fn on_leave_share_guards_empty_staff() {
        assert_eq!(on_leave_percent(&HrSummary::default()), 0.0);
        let s = HrSummary {
            total_employees: 20,
            on_leave: 3,
            ..Default::default()
        };
        assert_eq!(on_leave_percent(&s), 15.0);
        assert!(summary_card(&s)[2].1.contains("15.0%"));
    }

    #[test]
    fn decisions_map_to_backend_status() {
        assert_eq!(LeaveDecision::Approve.status(), "approved");
        assert_eq!(LeaveDecision::Reject.status(), "rejected");
    }
}
