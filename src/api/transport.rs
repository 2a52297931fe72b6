use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;

use super::ApiError;

#[derive(Clone, Debug)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

#[derive(Clone, Debug)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FormPart>),
}

/// One call against a backend script, relative to the configured base URL.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub endpoint: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: &str) -> Self {
        Self {
            method,
            endpoint: endpoint.to_string(),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(endpoint: &str) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: &str, body: serde_json::Value) -> Self {
        Self::new(Method::POST, endpoint).json(body)
    }

    pub fn put(endpoint: &str, body: serde_json::Value) -> Self {
        Self::new(Method::PUT, endpoint).json(body)
    }

    pub fn delete(endpoint: &str) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    pub fn multipart(endpoint: &str, parts: Vec<FormPart>) -> Self {
        let mut req = Self::new(Method::POST, endpoint);
        req.body = RequestBody::Multipart(parts);
        req
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn action(self, action: Option<&str>) -> Self {
        match action {
            Some(action) => self.query("action", action),
            None => self,
        }
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn json_body(&self) -> Option<&serde_json::Value> {
        match &self.body {
            RequestBody::Json(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

impl HttpTransport {
    pub fn new(
        base_url: &str,
        timeout_seconds: u64,
        proxy: Option<&str>,
    ) -> Result<Self, ApiError> {
        let base_url = parse_base_url(base_url)?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(concat!(
                "schoolboard/",
                env!("CARGO_PKG_VERSION")
            )),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let timeout = Duration::from_secs(if timeout_seconds == 0 {
            15
        } else {
            timeout_seconds
        });
        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(timeout);

        if let Some(proxy) = proxy.filter(|p| !p.trim().is_empty()) {
            let proxy = reqwest::Proxy::all(proxy).map_err(|e| ApiError::ProxySetup {
                proxy: proxy.to_string(),
                source: e,
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| ApiError::HttpClientBuild { source: e })?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &reqwest::Url {
        &self.base_url
    }
}

pub(crate) fn parse_base_url(raw: &str) -> Result<reqwest::Url, ApiError> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    let url = reqwest::Url::parse(&normalized).map_err(|e| ApiError::InvalidBaseUrl {
        url: raw.to_string(),
        message: e.to_string(),
    })?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ApiError::InvalidBaseUrl {
            url: raw.to_string(),
            message: "expected an http or https URL".to_string(),
        });
    }
    Ok(url)
}

fn build_form(parts: Vec<FormPart>) -> Result<reqwest::multipart::Form, ApiError> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::File {
                name,
                file_name,
                mime,
                bytes,
            } => {
                let part = reqwest::multipart::Part::bytes(bytes)
                    .file_name(file_name.clone())
                    .mime_str(&mime)
                    .map_err(|e| ApiError::InvalidUpload {
                        path: file_name,
                        message: e.to_string(),
                    })?;
                form.part(name, part)
            }
        };
    }
    Ok(form)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let endpoint = request.endpoint.clone();
        let url = self
            .base_url
            .join(request.endpoint.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidBaseUrl {
                url: format!("{}{}", self.base_url, request.endpoint),
                message: e.to_string(),
            })?;

        let mut builder = self.client.request(request.method, url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (k, v) in request.headers.iter() {
            let key = reqwest::header::HeaderName::from_str(k.trim())
                .map_err(|_| ApiError::InvalidHeader { name: k.clone() })?;
            let value = reqwest::header::HeaderValue::from_str(v.trim())
                .map_err(|_| ApiError::InvalidHeader { name: k.clone() })?;
            builder = builder.header(key, value);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(parts) => builder.multipart(build_form(parts)?),
        };

        let resp = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    endpoint: endpoint.clone(),
                }
            } else {
                ApiError::Transport {
                    endpoint: endpoint.clone(),
                    source: e,
                }
            }
        })?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    endpoint: endpoint.clone(),
                }
            } else {
                ApiError::Transport {
                    endpoint: endpoint.clone(),
                    source: e,
                }
            }
        })?;
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let url = parse_base_url("https://school.example/api").unwrap();
        assert_eq!(url.as_str(), "https://school.example/api/");
        assert_eq!(
            url.join("students.php").unwrap().as_str(),
            "https://school.example/api/students.php"
        );
    }

    #[test]
    fn base_url_rejects_other_schemes() {
        assert!(parse_base_url("ftp://school.example/").is_err());
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn action_is_only_added_when_present() {
        let req = ApiRequest::get("hr_management.php").action(Some("leaves"));
        assert_eq!(req.query_value("action"), Some("leaves"));
        let req = ApiRequest::get("teachers.php").action(None);
        assert!(req.query.is_empty());
    }
}
