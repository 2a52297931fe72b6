use std::collections::BTreeMap;

use serde::Serialize;

use super::{Page, PageState};
use crate::api::{ApiClient, ApiRequest};
use crate::models::{Invoice, Payment};
use crate::output::Record;
use crate::stats;

impl Record for Invoice {
    const COLUMNS: &'static [&'static str] =
        &["Invoice", "Student", "Amount", "Paid", "Balance", "Status", "Due"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.invoice_no.clone(),
            self.student_name.clone(),
            stats::format_amount(self.amount),
            stats::format_amount(self.paid_amount),
            stats::format_amount(self.balance()),
            self.status.clone(),
            self.due_date.clone(),
        ]
    }
}

impl Record for Payment {
    const COLUMNS: &'static [&'static str] = &["Receipt", "Student", "Amount", "Method", "Date"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.receipt_no.clone(),
            self.student_name.clone(),
            stats::format_amount(self.amount),
            self.method.clone(),
            self.paid_at.clone(),
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct InvoiceSummary {
    pub count: usize,
    pub invoiced: f64,
    pub collected: f64,
    pub outstanding: f64,
    pub collection_rate: f64,
    pub by_status: BTreeMap<String, StatusTotal>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StatusTotal {
    pub count: usize,
    pub amount: f64,
}

pub fn summarize(invoices: &[Invoice]) -> InvoiceSummary {
    let invoiced = stats::sum_by(invoices, |i| i.amount);
    let collected = stats::sum_by(invoices, |i| i.paid_amount);
    let mut by_status: BTreeMap<String, StatusTotal> = BTreeMap::new();
    for inv in invoices {
        let key = match inv.status.trim() {
            "" => "unpaid".to_string(),
            s => s.to_lowercase(),
        };
        let entry = by_status.entry(key).or_default();
        entry.count += 1;
        entry.amount += inv.amount;
    }
    InvoiceSummary {
        count: invoices.len(),
        invoiced,
        collected,
        outstanding: stats::sum_by(invoices, Invoice::balance),
        collection_rate: stats::collection_rate(collected, invoiced),
        by_status,
    }
}

pub fn summary_card(s: &InvoiceSummary) -> Vec<(&'static str, String)> {
    vec![
        ("Invoices", s.count.to_string()),
        ("Invoiced", stats::format_amount(s.invoiced)),
        ("Collected", stats::format_amount(s.collected)),
        ("Outstanding", stats::format_amount(s.outstanding)),
        ("Collection rate", stats::format_percent(s.collection_rate)),
    ]
}

pub struct InvoicesPage {
    client: ApiClient,
    pub invoices: Page<Vec<Invoice>>,
}

impl InvoicesPage {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            invoices: Page::new("invoices"),
        }
    }

    pub async fn refresh(&self, status: Option<&str>) -> PageState<Vec<Invoice>> {
        let client = self.client.clone();
        let mut request = ApiRequest::get("invoices.php");
        if let Some(status) = status.map(str::trim).filter(|s| !s.is_empty()) {
            request = request.query("status", status);
        }
        self.invoices
            .load(async move { client.fetch(request, &["invoices"]).await })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice(amount: f64, paid: f64, status: &str) -> Invoice {
        Invoice {
            amount,
            paid_amount: paid,
            status: status.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn summary_totals_and_rate() {
        let rows = vec![
            invoice(100.0, 100.0, "paid"),
            invoice(200.0, 50.0, "Partial"),
            invoice(100.0, 0.0, ""),
        ];
        let s = summarize(&rows);
        assert_eq!(s.invoiced, 400.0);
        assert_eq!(s.collected, 150.0);
        assert_eq!(s.outstanding, 250.0);
        assert_eq!(s.collection_rate, 37.5);
        assert_eq!(s.by_status["partial"].amount, 200.0);
        assert_eq!(s.by_status["unpaid"].count, 1);
    }

    #[test]
    fn no_invoices_means_zero_rate() {
        let s = summarize(&[]);
        assert_eq!(s.collection_rate, 0.0);
        assert_eq!(summary_card(&s)[4].1, "0%");
    }
}
