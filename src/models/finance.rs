use serde::{Deserialize, Serialize};

use super::lenient;

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Invoice {
    #[serde(default, deserialize_with = "lenient::i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string", alias = "invoice_number")]
    pub invoice_no: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub student_name: String,
    #[serde(default, deserialize_with = "lenient::f64", alias = "total_amount")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient::f64", alias = "amount_paid")]
    pub paid_amount: f64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub due_date: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Payment {
    #[serde(default, deserialize_with = "lenient::i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string", alias = "receipt_number")]
    pub receipt_no: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub student_name: String,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient::string", alias = "payment_method")]
    pub method: String,
    #[serde(default, deserialize_with = "lenient::string", alias = "payment_date")]
    pub paid_at: String,
}

impl Invoice {
    /// Unpaid remainder, never negative.
    pub fn balance(&self) -> f64 {
        (self.amount - self.paid_amount).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overpaid_invoice_has_zero_balance() {
        let inv: Invoice = serde_json::from_value(json!({
            "invoice_number": "INV-7",
            "total_amount": "100",
            "amount_paid": 120
        }))
        .unwrap();
        assert_eq!(inv.invoice_no, "INV-7");
        assert_eq!(inv.balance(), 0.0);
    }
}
