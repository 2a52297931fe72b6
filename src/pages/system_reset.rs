//! The one destructive endpoint. A request can only be built from a
//! [`ResetConfirmation`], which only the exact phrase produces.

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError, ApiRequest};

pub const CONFIRMATION_PHRASE: &str = "RESET-CONFIRM";

const ENDPOINT: &str = "system_reset.php";

#[derive(Debug, Error)]
pub enum ResetError {
    #[error("confirmation does not match RESET-CONFIRM")]
    NotConfirmed,

    #[error("select at least one category to reset")]
    NothingSelected,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Proof that the operator typed the confirmation phrase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResetConfirmation(());

impl ResetConfirmation {
    /// Exact match only: no trimming, no case folding.
    pub fn parse(input: &str) -> Result<Self, ResetError> {
        if input == CONFIRMATION_PHRASE {
            Ok(Self(()))
        } else {
            Err(ResetError::NotConfirmed)
        }
    }
}

/// Whether the confirm action is enabled for the typed input.
pub fn confirm_enabled(input: &str) -> bool {
    ResetConfirmation::parse(input).is_ok()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResetOptions {
    pub students: bool,
    pub teachers: bool,
    pub finance: bool,
    pub attendance: bool,
    pub reports: bool,
    pub settings: bool,
}

impl ResetOptions {
    pub fn from_categories(categories: &HashSet<String>) -> Self {
        let has = |k: &str| categories.contains(k);
        Self {
            students: has("students"),
            teachers: has("teachers"),
            finance: has("finance"),
            attendance: has("attendance"),
            reports: has("reports"),
            settings: has("settings"),
        }
    }

    pub fn any(&self) -> bool {
        self.students
            || self.teachers
            || self.finance
            || self.attendance
            || self.reports
            || self.settings
    }

    pub fn selected(&self) -> Vec<&'static str> {
        [
            ("students", self.students),
            ("teachers", self.teachers),
            ("finance", self.finance),
            ("attendance", self.attendance),
            ("reports", self.reports),
            ("settings", self.settings),
        ]
        .into_iter()
        .filter_map(|(name, on)| on.then_some(name))
        .collect()
    }
}

/// Builds the reset request. Needs a confirmation value, so an unconfirmed
/// reset cannot be expressed.
pub fn reset_request(
    _confirmed: &ResetConfirmation,
    options: &ResetOptions,
) -> Result<ApiRequest, ResetError> {
    if !options.any() {
        return Err(ResetError::NothingSelected);
    }
    Ok(ApiRequest::post(
        ENDPOINT,
        json!({ "confirmation": CONFIRMATION_PHRASE, "options": options }),
    ))
}

pub async fn reset(
    client: &ApiClient,
    confirmation: &str,
    options: &ResetOptions,
) -> Result<Value, ResetError> {
    let confirmed = ResetConfirmation::parse(confirmation).map_err(|e| {
        warn!("reset refused: confirmation phrase mismatch");
        e
    })?;
    let request = reset_request(&confirmed, options)?;
    warn!(categories = ?options.selected(), "issuing system reset");
    let resp = client.send(request).await?;
    info!("system reset completed");
    Ok(resp)
}

/// Restores a database backup (`.sql` or `.zip`). Gated by the same phrase.
pub async fn restore(
    client: &ApiClient,
    confirmation: &str,
    backup: &Path,
) -> Result<String, ResetError> {
    ResetConfirmation::parse(confirmation)?;
    let url = client
        .upload(
            ENDPOINT,
            vec![
                ("action".to_string(), "restore".to_string()),
                ("confirmation".to_string(), CONFIRMATION_PHRASE.to_string()),
            ],
            "backup_file",
            backup,
        )
        .await?;
    info!(backup = %backup.display(), "backup restored");
    Ok(url)
}
