use std::collections::HashSet;

use chrono::NaiveDate;

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", value.trim()))
}

/// Inclusive reporting window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, String> {
        if start > end {
            return Err(format!("start date {start} is after end date {end}"));
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, String> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("start_date", self.start.format("%Y-%m-%d").to_string()),
            ("end_date", self.end.format("%Y-%m-%d").to_string()),
        ]
    }
}

pub fn parse_permissions_csv(value: &str) -> Result<Vec<String>, String> {
    let raw = value.trim();
    if raw.is_empty() {
        return Err("permissions list is empty".to_string());
    }
    let mut out: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for part in raw.split(',') {
        let item = part.trim();
        if item.is_empty() {
            continue;
        }
        if item.chars().any(char::is_whitespace) {
            return Err(format!("invalid permission '{item}'"));
        }
        if seen.insert(item.to_string()) {
            out.push(item.to_string());
        }
    }
    if out.is_empty() {
        return Err("permissions list is empty".to_string());
    }
    Ok(out)
}

pub fn parse_id(value: &str) -> Result<i64, String> {
    match value.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(format!("invalid id '{}', expected a positive integer", value.trim())),
    }
}

/// Parses reset categories such as `students,finance` or `all`.
pub fn parse_reset_csv(value: &str) -> Result<HashSet<String>, String> {
    const KNOWN: [&str; 6] = [
        "students",
        "teachers",
        "finance",
        "attendance",
        "reports",
        "settings",
    ];
    let mut out: HashSet<String> = HashSet::new();
    for part in value.split(',') {
        let item = part.trim().to_ascii_lowercase();
        if item.is_empty() {
            continue;
        }
        if item == "all" {
            out.extend(KNOWN.iter().map(|k| k.to_string()));
            continue;
        }
        if !KNOWN.contains(&item.as_str()) {
            return Err(format!(
                "unknown reset category '{item}', expected one of {}",
                KNOWN.join(", ")
            ));
        }
        out.insert(item);
    }
    if out.is_empty() {
        return Err("reset category list is empty".to_string());
    }
    Ok(out)
}
