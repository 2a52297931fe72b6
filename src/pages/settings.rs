use std::path::Path;

use serde_json::Value;
use tracing::info;

use super::{MutationError, Page, PageData, PageState};
use crate::api::{encode_body, ApiClient, ApiRequest};
use crate::forms::{SettingsForm, Validate};
use crate::models::SchoolSettings;

impl PageData for SchoolSettings {
    fn is_empty(&self) -> bool {
        *self == SchoolSettings::default()
    }
}

pub struct SettingsPage {
    client: ApiClient,
    pub settings: Page<SchoolSettings>,
}

impl SettingsPage {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            settings: Page::new("settings"),
        }
    }

    pub async fn refresh(&self) -> PageState<SchoolSettings> {
        let client = self.client.clone();
        self.settings
            .load(async move {
                let raw: Value = client
                    .fetch(ApiRequest::get("settings.php"), &["settings"])
                    .await?;
                Ok(SchoolSettings::from_value(&raw))
            })
            .await
    }

    pub async fn save(&self, form: &SettingsForm) -> Result<Value, MutationError> {
        form.validate()?;
        let body = encode_body("settings.php", form)?;
        let resp = self
            .client
            .send(ApiRequest::put("settings.php", body))
            .await?;
        info!("settings saved");
        self.refresh().await;
        Ok(resp)
    }

    /// Uploads a new school logo and returns its URL.
    pub async fn upload_logo(&self, path: &Path) -> Result<String, MutationError> {
        let url = self
            .client
            .upload("upload_logo.php", Vec::new(), "logo", path)
            .await?;
        info!(%url, "logo uploaded");
        self.refresh().await;
        Ok(url)
    }
}
