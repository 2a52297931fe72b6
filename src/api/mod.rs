pub mod envelope;
pub mod transport;

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub use transport::{ApiRequest, ApiResponse, FormPart, HttpTransport, RequestBody, Transport};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid header value for {name}")]
    InvalidHeader { name: String },

    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode request for {endpoint}: {source}")]
    Encode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{message}")]
    Backend { endpoint: String, message: String },

    #[error("failed to read upload file: {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot upload {path}: {message}")]
    InvalidUpload { path: String, message: String },
}

/// Credentials and identity for the signed-in operator.
///
/// Passed explicitly into every client; nothing reads a global store.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub token: Option<String>,
    pub user_name: Option<String>,
}

impl Session {
    pub fn new(token: Option<String>, user_name: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
            user_name: user_name.filter(|u| !u.trim().is_empty()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

#[derive(Clone, Debug)]
pub struct Options {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub proxy: Option<String>,
    pub session: Session,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_url: "http://localhost/school/api/".to_string(),
            timeout_seconds: 15,
            proxy: None,
            session: Session::default(),
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Session,
}

impl ApiClient {
    pub fn new(options: Options) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(
            &options.base_url,
            options.timeout_seconds,
            options.proxy.as_deref(),
        )?;
        Ok(Self::with_transport(Arc::new(transport), options.session))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, session: Session) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Sends a request and returns the decoded envelope root.
    pub async fn send(&self, mut request: ApiRequest) -> Result<Value, ApiError> {
        if let Some(token) = self.session.token.as_deref() {
            request
                .headers
                .push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        let endpoint = request.endpoint.clone();
        debug!(
            method = %request.method,
            endpoint = %endpoint,
            query = ?request.query,
            "sending request"
        );

        let resp = self.transport.send(request).await.map_err(|e| {
            warn!(endpoint = %endpoint, error = %e, "request failed");
            e
        })?;

        if !resp.is_success() {
            let message = serde_json::from_str::<Value>(&resp.body)
                .ok()
                .as_ref()
                .and_then(envelope::backend_message);
            warn!(endpoint = %endpoint, status = resp.status, "backend returned an error status");
            return Err(match message {
                Some(message) => ApiError::Backend { endpoint, message },
                None => ApiError::Status {
                    endpoint,
                    status: resp.status,
                },
            });
        }
        envelope::decode(&endpoint, &resp.body)
    }

    /// Sends a request and decodes the payload found under `keys`.
    pub async fn fetch<T>(&self, request: ApiRequest, keys: &[&str]) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Default,
    {
        let endpoint = request.endpoint.clone();
        let root = self.send(request).await?;
        envelope::extract(&endpoint, &root, keys)
    }

    /// Like [`ApiClient::fetch`], but substitutes `T::default()` on failure.
    pub async fn fetch_or_default<T>(&self, request: ApiRequest, keys: &[&str]) -> T
    where
        T: DeserializeOwned + Default,
    {
        let endpoint = request.endpoint.clone();
        match self.fetch(request, keys).await {
            Ok(v) => v,
            Err(e) => {
                warn!(endpoint = %endpoint, error = %e, "using empty fallback");
                T::default()
            }
        }
    }

    /// Uploads one file with extra form fields and returns the stored URL.
    pub async fn upload(
        &self,
        endpoint: &str,
        fields: Vec<(String, String)>,
        file_field: &str,
        path: &Path,
    ) -> Result<String, ApiError> {
        let display = path.display().to_string();
        let mime = upload_mime(path).ok_or_else(|| ApiError::InvalidUpload {
            path: display.clone(),
            message: "unsupported file type, expected png, jpg, gif, webp, sql or zip".to_string(),
        })?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::FileRead {
                path: display.clone(),
                source: e,
            })?;
        if bytes.is_empty() {
            return Err(ApiError::InvalidUpload {
                path: display,
                message: "file is empty".to_string(),
            });
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());

        let mut parts: Vec<FormPart> = fields
            .into_iter()
            .map(|(name, value)| FormPart::Text { name, value })
            .collect();
        parts.push(FormPart::File {
            name: file_field.to_string(),
            file_name,
            mime: mime.to_string(),
            bytes,
        });

        let root = self.send(ApiRequest::multipart(endpoint, parts)).await?;
        let url = root
            .get("url")
            .or_else(|| root.get("data").and_then(|d| d.get("url")))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        Ok(url)
    }
}

pub(crate) fn upload_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "sql" => Some("application/sql"),
        "zip" => Some("application/zip"),
        _ => None,
    }
}

/// Serializes a request body, naming the endpoint it was meant for.
pub(crate) fn encode_body<T: Serialize>(endpoint: &str, value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|source| ApiError::Encode {
        endpoint: endpoint.to_string(),
        source,
    })
}
