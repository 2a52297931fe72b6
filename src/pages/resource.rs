//! Shared list/create/update/toggle/delete flow for the flat record pages.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use super::{Confirm, MutationError, Page, PageState};
use crate::api::{encode_body, ApiClient, ApiRequest};
use crate::forms::Validate;

pub trait Resource: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    type Form: Validate + Serialize + Send + Sync;

    const ENDPOINT: &'static str;
    const LIST_KEYS: &'static [&'static str];
    /// `action` query value for scripts that serve several resources.
    const ACTION: Option<&'static str> = None;
    const NOUN: &'static str;

    fn id(&self) -> i64;

    /// Fields to send to flip the record's active state.
    fn status_toggle(&self) -> Value;

    fn sort(_rows: &mut [Self]) {}
}

fn merge(base: &mut Value, extra: Value) {
    if let (Value::Object(base), Value::Object(extra)) = (base, extra) {
        base.extend(extra);
    }
}

pub struct ResourcePage<R: Resource> {
    client: ApiClient,
    page: Page<Vec<R>>,
}

impl<R: Resource> ResourcePage<R> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            page: Page::new(R::NOUN),
        }
    }

    pub fn page(&self) -> &Page<Vec<R>> {
        &self.page
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn request(method: reqwest::Method) -> ApiRequest {
        ApiRequest::new(method, R::ENDPOINT).action(R::ACTION)
    }

    pub async fn refresh(&self) -> PageState<Vec<R>> {
        let client = self.client.clone();
        self.page
            .load(async move {
                let mut rows: Vec<R> = client
                    .fetch(Self::request(reqwest::Method::GET), R::LIST_KEYS)
                    .await?;
                R::sort(&mut rows);
                Ok(rows)
            })
            .await
    }

    pub async fn rows(&self) -> Vec<R> {
        self.page.data().await.unwrap_or_default()
    }

    pub async fn find(&self, id: i64) -> Result<R, MutationError> {
        self.rows()
            .await
            .into_iter()
            .find(|r| r.id() == id)
            .ok_or(MutationError::NotFound { noun: R::NOUN, id })
    }

    pub async fn create(&self, form: &R::Form) -> Result<Value, MutationError> {
        form.validate()?;
        let body = encode_body(R::ENDPOINT, form)?;
        let resp = self
            .client
            .send(Self::request(reqwest::Method::POST).json(body))
            .await?;
        info!(resource = R::NOUN, "created");
        self.refresh().await;
        Ok(resp)
    }

    pub async fn update(&self, id: i64, form: &R::Form) -> Result<Value, MutationError> {
        form.validate()?;
        let mut body = encode_body(R::ENDPOINT, form)?;
        merge(&mut body, json!({ "id": id }));
        let resp = self
            .client
            .send(
                Self::request(reqwest::Method::PUT)
                    .query("id", id)
                    .json(body),
            )
            .await?;
        info!(resource = R::NOUN, id, "updated");
        self.refresh().await;
        Ok(resp)
    }

    /// Soft toggle through the status field; the full record is resent.
    pub async fn toggle_status(&self, record: &R) -> Result<Value, MutationError> {
        let mut body = encode_body(R::ENDPOINT, record)?;
        merge(&mut body, record.status_toggle());
        merge(&mut body, json!({ "id": record.id() }));
        let resp = self
            .client
            .send(
                Self::request(reqwest::Method::PUT)
                    .query("id", record.id())
                    .json(body),
            )
            .await?;
        info!(resource = R::NOUN, id = record.id(), "status toggled");
        self.refresh().await;
        Ok(resp)
    }

    /// Returns `Ok(false)` without sending anything when not confirmed.
    pub async fn delete(&self, id: i64, confirm: &dyn Confirm) -> Result<bool, MutationError> {
        let prompt = format!("Delete {} #{id}? This cannot be undone.", R::NOUN);
        if !confirm.confirm(&prompt) {
            return Ok(false);
        }
        self.client
            .send(Self::request(reqwest::Method::DELETE).query("id", id))
            .await?;
        info!(resource = R::NOUN, id, "deleted");
        self.refresh().await;
        Ok(true)
    }
}
