//! Display statistics derived from fetched collections. Every function is
//! pure and guards its denominators, so none returns NaN or infinity.

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::Serialize;

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// `count / total * 100`, or `0.0` when `total <= 0`.
pub fn percentage(count: f64, total: f64) -> f64 {
    if !(total > 0.0) || !count.is_finite() {
        return 0.0;
    }
    finite_or_zero(count / total * 100.0)
}

/// Change from `previous` to `current` in percent, or `0.0` when
/// `previous <= 0`.
pub fn growth(current: f64, previous: f64) -> f64 {
    if !(previous > 0.0) || !current.is_finite() {
        return 0.0;
    }
    finite_or_zero((current - previous) / previous * 100.0)
}

pub fn collection_rate(collected: f64, invoiced: f64) -> f64 {
    percentage(collected, invoiced)
}

pub fn group_count<T, K, F>(rows: &[T], key_fn: F) -> BTreeMap<K, usize>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    rows.iter().fold(BTreeMap::new(), |mut acc, row| {
        *acc.entry(key_fn(row)).or_insert(0) += 1;
        acc
    })
}

pub fn sum_by<T, F>(rows: &[T], value_fn: F) -> f64
where
    F: Fn(&T) -> f64,
{
    finite_or_zero(rows.iter().map(|r| finite_or_zero(value_fn(r))).sum())
}

pub fn format_percent(value: f64) -> String {
    let value = finite_or_zero(value);
    if value == 0.0 {
        "0%".to_string()
    } else {
        format!("{value:.1}%")
    }
}

pub fn format_amount(value: f64) -> String {
    format!("{:.2}", finite_or_zero(value))
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Breakdown {
    pub label: String,
    pub count: usize,
    pub percent: f64,
}

/// Groups rows by a display label, largest group first. Blank labels are
/// reported as "Unspecified".
pub fn breakdown<T, F>(rows: &[T], label_fn: F) -> Vec<Breakdown>
where
    F: Fn(&T) -> String,
{
    let total = rows.len() as f64;
    group_count(rows, |row| {
        let label = label_fn(row);
        let label = label.trim();
        if label.is_empty() {
            "Unspecified".to_string()
        } else {
            label.to_string()
        }
    })
    .into_iter()
    .map(|(label, count)| Breakdown {
        percent: percentage(count as f64, total),
        label,
        count,
    })
    .sorted_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)))
    .collect()
}

/// Proportional text bar, `width` cells at `max`.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    let filled = (percentage(value, max) / 100.0 * width as f64).round() as usize;
    "#".repeat(filled.min(width))
}
